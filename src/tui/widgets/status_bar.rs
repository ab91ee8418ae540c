use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::config::Config;
use crate::tui::widgets::color::parse_color;

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&String>,
    key_hints: &[String],
    config: &Config,
) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = parse_color(&theme.highlight_fg);

    let (mut content, style) = if let Some(msg) = message {
        // Status messages get a highlighted background for visibility
        (
            msg.clone(),
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (key_hints.join(" • "), Style::default().fg(fg).bg(bg))
    };

    // Truncate to the bar width, leaving room for an ellipsis
    let max_width = area.width as usize;
    if content.chars().count() > max_width {
        content = content
            .chars()
            .take(max_width.saturating_sub(3))
            .collect::<String>()
            + "...";
    }

    f.render_widget(Paragraph::new(content).style(style), area);
}
