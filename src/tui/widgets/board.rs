use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::models::{Note, Status};
use crate::tui::app::{App, CardHit, Mode};
use crate::tui::layout::BoardLayout;
use crate::tui::widgets::color::{parse_color, priority_color};
use crate::utils;

/// Rows a card occupies, borders included
const CARD_HEIGHT: u16 = 6;

/// Render the four status columns and their cards, recording every card's
/// rect into `app.card_areas` so pointer-down events can be resolved
/// against exactly what is on screen. The card being dragged is left out of
/// its column and drawn as a floating overlay afterwards.
pub fn render_board(f: &mut Frame, layout: &BoardLayout, app: &mut App) {
    app.card_areas.clear();

    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let border = parse_color(&theme.column_border);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = parse_color(&theme.highlight_fg);

    let dragged_id = app.drag.as_ref().filter(|d| d.is_dragging()).map(|d| d.note_id);
    let now = utils::now_millis();

    for (col_idx, status) in Status::ALL.iter().enumerate() {
        let area = layout.column_rect(*status);
        let notes = app.store.notes_with_status(*status);

        let title = format!(" {} ({}) ", status.label(), notes.len());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(border));
        let inner = block.inner(area);
        f.render_widget(block, area);

        // Scroll the selected column so the keyboard cursor never points at
        // a card past the visible window
        let capacity = (inner.height / CARD_HEIGHT) as usize;
        let offset = if col_idx == app.ui.selected_column
            && capacity > 0
            && app.ui.selected_row >= capacity
        {
            app.ui.selected_row + 1 - capacity
        } else {
            0
        };

        let mut y = inner.y;
        for (row_idx, note) in notes.iter().enumerate().skip(offset) {
            if y + CARD_HEIGHT > inner.y + inner.height {
                break; // column full; remaining cards are off-screen
            }
            let card_area = Rect::new(inner.x, y, inner.width, CARD_HEIGHT);

            if note.id.is_some() && note.id == dragged_id {
                // dragged card renders detached, not in its column
                y += CARD_HEIGHT;
                continue;
            }

            let selected = app.ui.mode == Mode::Board
                && app.ui.selected_column == col_idx
                && app.ui.selected_row == row_idx;
            let style = if selected {
                Style::default().fg(highlight_fg).bg(highlight_bg)
            } else {
                Style::default().fg(fg)
            };
            render_card(f, card_area, note, style, now);
            if let Some(id) = note.id {
                app.card_areas.push(CardHit { note_id: id, area: card_area });
            }

            y += CARD_HEIGHT;
        }
    }

    // Floating overlay for the dragged card, dimmed to signal drag state
    if let Some(drag) = app.drag.as_ref().filter(|d| d.is_dragging()) {
        if let Some(note) = app.store.get(drag.note_id).cloned() {
            let overlay = drag.overlay_rect(f.area());
            if overlay.width > 2 && overlay.height > 2 {
                f.render_widget(Clear, overlay);
                let style = Style::default().fg(Color::DarkGray);
                render_card(f, overlay, &note, style, now);
            }
        }
    }
}

fn render_card(f: &mut Frame, area: Rect, note: &Note, style: Style, now: i64) {
    let block = Block::default().borders(Borders::ALL).style(style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::with_capacity(4);
    lines.push(Line::from(Span::styled(
        truncate(&note.title, inner.width),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    if let Some(ref description) = note.description {
        lines.push(Line::from(Span::raw(truncate(description, inner.width))));
    }

    let mut meta = Vec::new();
    if let Some(priority) = note.priority {
        meta.push(Span::styled(
            priority.label(),
            Style::default().fg(priority_color(priority)),
        ));
    }
    if let Some(ref deadline) = note.deadline {
        if !meta.is_empty() {
            meta.push(Span::raw("  "));
        }
        meta.push(Span::raw(format!("due {}", deadline)));
    }
    lines.push(Line::from(meta));

    lines.push(Line::from(Span::styled(
        utils::time_ago(note.created_at, now),
        Style::default().add_modifier(Modifier::DIM),
    )));

    f.render_widget(Paragraph::new(lines), inner);
}

fn truncate(s: &str, width: u16) -> String {
    let width = width as usize;
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
