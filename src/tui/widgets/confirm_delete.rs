use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::config::Config;
use crate::models::Note;
use crate::tui::widgets::color::parse_color;

pub fn render_confirm_delete(f: &mut Frame, area: Rect, note: &Note, config: &Config) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);

    let popup = popup_area(area, 50, 30);
    f.render_widget(Clear, popup);

    let lines = vec![
        Line::from(Span::raw("Delete this note?")),
        Line::from(Span::raw("")),
        Line::from(Span::styled(
            note.title.clone(),
            Style::default().add_modifier(ratatui::style::Modifier::BOLD),
        )),
        Line::from(Span::raw("")),
        Line::from(Span::raw("Enter: delete  •  Esc: cancel")),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Delete")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg).bg(bg)),
        )
        .style(Style::default().fg(fg).bg(bg))
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup);
}

/// Centered rect taking a percentage of the available area
/// Based on the ratatui popup example
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
