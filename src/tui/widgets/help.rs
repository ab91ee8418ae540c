use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::config::Config;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::confirm_delete::popup_area;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let kb = &config.key_bindings;

    let popup = popup_area(area, 55, 70);
    f.render_widget(Clear, popup);

    let entries: [(String, &str); 10] = [
        (kb.quit.clone(), "Quit"),
        (kb.new.clone(), "New note"),
        (kb.edit.clone(), "Edit selected note"),
        (kb.delete.clone(), "Delete selected note"),
        (format!("{}/{}", kb.column_left, kb.column_right), "Move between columns"),
        (format!("{}/{}", kb.list_up, kb.list_down), "Move within a column"),
        ("Mouse drag".to_string(), "Move a card to another column"),
        (kb.logout.clone(), "Log out"),
        (kb.help.clone(), "Toggle this help"),
        ("Esc".to_string(), "Close"),
    ];

    let mut lines = Vec::with_capacity(entries.len());
    for (key, action) in &entries {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", key), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(*action),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg).bg(bg)),
        )
        .style(Style::default().fg(fg).bg(bg));

    f.render_widget(paragraph, popup);
}
