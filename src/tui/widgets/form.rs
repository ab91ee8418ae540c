use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::config::Config;
use crate::tui::app::{NoteField, NoteForm};
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::confirm_delete::popup_area;

/// Render the create/edit note form as a centered popup. The focused field
/// is highlighted; Status and Priority are cycled with Left/Right or Space
/// rather than typed.
pub fn render_note_form(f: &mut Frame, area: Rect, form: &NoteForm, config: &Config) {
    let theme = config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = parse_color(&theme.highlight_fg);

    let popup = popup_area(area, 60, 70);
    f.render_widget(Clear, popup);

    let title = if form.editing_id.is_some() {
        "Edit Note"
    } else {
        "New Note"
    };

    let field_style = |field: NoteField| {
        if form.current_field == field {
            Style::default().fg(highlight_fg).bg(highlight_bg)
        } else {
            Style::default().fg(fg)
        }
    };

    let priority_text = form
        .priority
        .map(|p| p.label().to_string())
        .unwrap_or_else(|| "None".to_string());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Title:       ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(field_value(&form.title, form.current_field == NoteField::Title), field_style(NoteField::Title)),
        ]),
        Line::from(Span::raw("")),
        Line::from(vec![
            Span::styled("Status:      ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("< {} >", form.status.label()), field_style(NoteField::Status)),
        ]),
        Line::from(Span::raw("")),
        Line::from(vec![
            Span::styled("Priority:    ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("< {} >", priority_text), field_style(NoteField::Priority)),
        ]),
        Line::from(Span::raw("")),
        Line::from(vec![
            Span::styled("Deadline:    ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(field_value(&form.deadline, form.current_field == NoteField::Deadline), field_style(NoteField::Deadline)),
        ]),
        Line::from(Span::raw("")),
        Line::from(vec![
            Span::styled("Description: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(field_value(&form.description, form.current_field == NoteField::Description), field_style(NoteField::Description)),
        ]),
    ];

    lines.push(Line::from(Span::raw("")));
    lines.push(Line::from(Span::styled(
        "Tab: next field  •  Space: cycle  •  Enter: save  •  Esc: cancel",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg).bg(bg)),
        )
        .style(Style::default().fg(fg).bg(bg));

    f.render_widget(paragraph, popup);
}

/// Show a cursor marker on the focused text field
fn field_value(value: &str, focused: bool) -> String {
    if focused {
        format!("{}_", value)
    } else if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}
