use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::tui::layout::BoardLayout;
use crate::tui::widgets::{
    auth_form::render_auth_form,
    board::render_board,
    color::parse_color,
    confirm_delete::render_confirm_delete,
    form::render_note_form,
    help::render_help,
    status_bar::render_status_bar,
};

pub fn render(f: &mut Frame, app: &mut App, layout: &BoardLayout) {
    let theme = app.config.get_active_theme();
    let fg = parse_color(&theme.fg);
    let bg = parse_color(&theme.bg);

    // Header line: app name, logged-in user on the right
    let user = app
        .service
        .session()
        .map(|s| s.username.clone())
        .unwrap_or_default();
    let header = Line::from(vec![
        Span::styled("Workflo", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(if user.is_empty() {
            String::new()
        } else {
            format!("  •  {}", user)
        }),
    ]);
    f.render_widget(
        Paragraph::new(header)
            .alignment(Alignment::Center)
            .style(Style::default().fg(fg).bg(bg)),
        layout.header_area,
    );

    match app.ui.mode {
        Mode::Auth => {
            render_auth_form(f, f.area(), &app.auth_form, &app.config);
        }
        Mode::Board | Mode::NoteForm | Mode::Help => {
            render_board(f, layout, app);

            if app.ui.mode == Mode::NoteForm {
                if let Some(ref form) = app.note_form {
                    render_note_form(f, f.area(), form, &app.config);
                }
            }

            if app.ui.mode == Mode::Help {
                render_help(f, f.area(), &app.config);
            }
        }
    }

    // Delete confirmation sits above everything else
    if let Some(ref note) = app.delete_confirmation {
        render_confirm_delete(f, f.area(), note, &app.config);
    }

    let key_hints = get_key_hints(app);
    render_status_bar(
        f,
        layout.status_area,
        app.status.message.as_ref(),
        &key_hints,
        &app.config,
    );
}

fn get_key_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;
    match app.ui.mode {
        Mode::Auth => vec![
            "Tab: Next field".to_string(),
            "Enter: Submit".to_string(),
            "Ctrl+s: Login/Signup".to_string(),
            "Esc: Quit".to_string(),
        ],
        Mode::NoteForm => vec![
            "Tab: Next field".to_string(),
            "Space: Cycle value".to_string(),
            "Enter: Save".to_string(),
            "Esc: Cancel".to_string(),
        ],
        Mode::Help => vec!["Esc: Close help".to_string()],
        Mode::Board => {
            if app.delete_confirmation.is_some() {
                vec!["Enter: Delete".to_string(), "Esc: Cancel".to_string()]
            } else {
                vec![
                    format!("{}: Quit", kb.quit),
                    format!("{}: New", kb.new),
                    format!("{}: Edit", kb.edit),
                    format!("{}: Delete", kb.delete),
                    "Drag: Move card".to_string(),
                    format!("{}: Help", kb.help),
                ]
            }
        }
    }
}
