use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use std::io;

use crate::auth;
use crate::tui::app::{App, AuthScreen, Mode, NoteField, NoteForm};
use crate::tui::drag::{DragSession, DropOutcome};
use crate::tui::error::TuiError;
use crate::tui::layout::BoardLayout;
use crate::utils::key_matches;

/// Guard that ensures terminal state is restored even on panic.
/// If the terminal is left in raw mode, with mouse capture on, or in the
/// alternate screen, the user's shell is unusable afterwards.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
    mouse_capture_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
            mouse_capture_enabled: true,
        })
    }

    /// Manually restore terminal state (called on normal exit).
    /// After calling this, the guard does nothing on drop.
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.mouse_capture_enabled {
            execute!(io::stdout(), DisableMouseCapture)?;
            self.mouse_capture_enabled = false;
        }
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Ignore errors in drop - we're already in a cleanup path
        if self.mouse_capture_enabled {
            let _ = execute!(io::stdout(), DisableMouseCapture);
        }
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check terminal size before entering the alternate screen so the error
    // message lands in the normal terminal
    let (width, height) = terminal_size().map_err(TuiError::IoError)?;
    if width < BoardLayout::MIN_WIDTH || height < BoardLayout::MIN_HEIGHT {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, minimum required: {}x{}.",
            width, height, BoardLayout::MIN_WIDTH, BoardLayout::MIN_HEIGHT
        )));
    }

    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.check_status_message_timeout();

        let terminal_size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, terminal_size.width, terminal_size.height);
        // One layout per frame: the renderer and the drop resolution must
        // agree on where the columns are
        let layout = BoardLayout::calculate(terminal_rect);

        terminal.draw(|f| {
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(std::time::Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key_event) => {
                    // Only process Press events (Release would double-fire on Windows)
                    if key_event.kind == KeyEventKind::Press {
                        handle_key_event(&mut app, key_event);
                    }
                }
                Event::Mouse(mouse_event) => {
                    handle_mouse_event(&mut app, mouse_event, &layout);
                }
                Event::Resize(_, _) => {
                    // Layout is recomputed from the terminal size each frame
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    guard.restore()?;

    Ok(())
}

/// Route a mouse event through the drag controller.
///
/// Down arms a session on the card under the pointer; Drag/Moved feed the
/// session; Up consumes it. Every Up path leaves `app.drag` empty, which is
/// what keeps gesture state from leaking across cards.
fn handle_mouse_event(app: &mut App, mouse: MouseEvent, layout: &BoardLayout) {
    // The board is the only surface with pointer interactions
    if app.ui.mode != Mode::Board || app.delete_confirmation.is_some() {
        app.drag = None;
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let hit = app
                .card_areas
                .iter()
                .find(|hit| hit.area.contains(ratatui::layout::Position::new(mouse.column, mouse.row)))
                .copied();
            if let Some(hit) = hit {
                app.drag = Some(DragSession::press(hit.note_id, mouse.column, mouse.row, hit.area));
            }
        }
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            if let Some(session) = app.drag.as_mut() {
                session.update(mouse.column, mouse.row);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(session) = app.drag.take() {
                let note_id = session.note_id;
                let Some(current_status) = app.store.get(note_id).map(|n| n.status) else {
                    return;
                };
                match session.release(mouse.column, mouse.row, layout, current_status) {
                    DropOutcome::Commit(new_status) => {
                        app.commit_status_change(note_id, new_status);
                        app.clamp_selection();
                    }
                    DropOutcome::Click => {
                        select_card(app, note_id);
                    }
                    DropOutcome::Cancelled => {}
                }
            }
        }
        _ => {}
    }
}

/// Move the keyboard cursor to a clicked card
fn select_card(app: &mut App, note_id: i64) {
    let Some(note) = app.store.get(note_id) else {
        return;
    };
    let status = note.status;
    if let Some(col) = crate::models::Status::ALL.iter().position(|s| *s == status) {
        let row = app
            .store
            .notes_with_status(status)
            .iter()
            .position(|n| n.id == Some(note_id));
        if let Some(row) = row {
            app.ui.selected_column = col;
            app.ui.selected_row = row;
        }
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    if app.delete_confirmation.is_some() {
        handle_delete_confirmation(app, key);
        return;
    }

    match app.ui.mode {
        Mode::Auth => handle_auth_keys(app, key),
        Mode::Board => handle_board_keys(app, key),
        Mode::NoteForm => handle_note_form_keys(app, key),
        Mode::Help => {
            if key.code == KeyCode::Esc || key_matches(&key, &app.config.key_bindings.help) {
                app.ui.mode = Mode::Board;
            }
        }
    }
}

fn handle_delete_confirmation(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            if let Some(note) = app.delete_confirmation.take() {
                if let Some(id) = note.id {
                    app.delete_note(id);
                }
            }
        }
        KeyCode::Esc => {
            app.delete_confirmation = None;
        }
        _ => {}
    }
}

fn handle_auth_keys(app: &mut App, key: KeyEvent) {
    // Screen switcher first: it uses a Ctrl chord that must not be typed
    if key_matches(&key, "Ctrl+s") {
        app.auth_form.switch_screen();
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
        }
        KeyCode::Tab | KeyCode::Down => app.auth_form.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.auth_form.prev_field(),
        KeyCode::Backspace => {
            app.auth_form.current_value_mut().pop();
        }
        KeyCode::Char(c) => {
            if !key.modifiers.contains(event::KeyModifiers::CONTROL) {
                app.auth_form.current_value_mut().push(c);
            }
        }
        KeyCode::Enter => submit_auth_form(app),
        _ => {}
    }
}

fn submit_auth_form(app: &mut App) {
    let form = app.auth_form.clone();
    match form.screen {
        AuthScreen::Login => {
            match auth::login(app.service.db(), form.email.trim(), &form.password) {
                Ok(session) => app.complete_login(session),
                Err(e) => app.set_status_message(e.to_string()),
            }
        }
        AuthScreen::Signup => {
            match auth::signup(app.service.db(), &form.name, form.email.trim(), &form.password) {
                Ok(_) => {
                    // Log straight in with the credentials just registered
                    match auth::login(app.service.db(), form.email.trim(), &form.password) {
                        Ok(session) => app.complete_login(session),
                        Err(e) => app.set_status_message(e.to_string()),
                    }
                }
                Err(e) => app.set_status_message(e.to_string()),
            }
        }
    }
}

fn handle_board_keys(app: &mut App, key: KeyEvent) {
    let kb = app.config.key_bindings.clone();

    if key_matches(&key, &kb.quit) {
        app.should_quit = true;
    } else if key_matches(&key, &kb.help) {
        app.ui.mode = Mode::Help;
    } else if key_matches(&key, &kb.logout) {
        app.logout();
        app.set_status_message("Logged out".to_string());
    } else if key_matches(&key, &kb.new) {
        app.note_form = Some(NoteForm::new(app.selected_status()));
        app.ui.mode = Mode::NoteForm;
    } else if key_matches(&key, &kb.edit) || key_matches(&key, &kb.select) {
        if let Some(note) = app.selected_note() {
            app.note_form = Some(NoteForm::from_note(note));
            app.ui.mode = Mode::NoteForm;
        }
    } else if key_matches(&key, &kb.delete) {
        if let Some(note) = app.selected_note() {
            app.delete_confirmation = Some(note.clone());
        }
    } else if key_matches(&key, &kb.column_left) || key.code == KeyCode::Left {
        if app.ui.selected_column > 0 {
            app.ui.selected_column -= 1;
            app.clamp_selection();
        }
    } else if key_matches(&key, &kb.column_right) || key.code == KeyCode::Right {
        if app.ui.selected_column < 3 {
            app.ui.selected_column += 1;
            app.clamp_selection();
        }
    } else if key_matches(&key, &kb.list_up) || key.code == KeyCode::Up {
        if app.ui.selected_row > 0 {
            app.ui.selected_row -= 1;
        }
    } else if key_matches(&key, &kb.list_down) || key.code == KeyCode::Down {
        let len = app.store.notes_with_status(app.selected_status()).len();
        if len > 0 && app.ui.selected_row + 1 < len {
            app.ui.selected_row += 1;
        }
    }
}

fn handle_note_form_keys(app: &mut App, key: KeyEvent) {
    let Some(form) = app.note_form.as_mut() else {
        app.ui.mode = Mode::Board;
        return;
    };

    match key.code {
        KeyCode::Esc => {
            app.note_form = None;
            app.ui.mode = Mode::Board;
        }
        KeyCode::Enter => app.submit_note_form(),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left | KeyCode::Right => match form.current_field {
            NoteField::Status => form.cycle_status(),
            NoteField::Priority => form.cycle_priority(),
            _ => {}
        },
        KeyCode::Backspace => match form.current_field {
            NoteField::Title => {
                form.title.pop();
            }
            NoteField::Deadline => {
                form.deadline.pop();
            }
            NoteField::Description => {
                form.description.pop();
            }
            _ => {}
        },
        KeyCode::Char(c) if !key.modifiers.contains(event::KeyModifiers::CONTROL) => {
            match form.current_field {
                // Space cycles the picker fields; it types into text fields
                NoteField::Status => {
                    if c == ' ' {
                        form.cycle_status();
                    }
                }
                NoteField::Priority => {
                    if c == ' ' {
                        form.cycle_priority();
                    }
                }
                NoteField::Title => form.title.push(c),
                NoteField::Deadline => form.deadline.push(c),
                NoteField::Description => form.description.push(c),
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Session;
    use crate::config::Config;
    use crate::database::Database;
    use crate::models::{Note, Status};
    use crate::service::{NotesService, SqliteNotesService};
    use crate::tui::app::CardHit;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: event::KeyModifiers::NONE,
        }
    }

    /// Board-mode app with one todo card at a known rect
    fn app_with_card() -> (App, BoardLayout) {
        let db = Database::open_in_memory().unwrap();
        let mut service = SqliteNotesService::new(db);
        service.set_session(Session {
            user_id: 1,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
        });

        let mut app = App::new(Config::default(), service).unwrap();
        app.ui.mode = Mode::Board;

        let created = app
            .service
            .add_note(&crate::service::NoteFields {
                title: "card".to_string(),
                status: Status::Todo,
                priority: None,
                deadline: None,
                description: None,
            })
            .unwrap();
        let id = created.id.unwrap();
        app.store.replace_all(vec![created]);
        app.card_areas.push(CardHit {
            note_id: id,
            area: Rect::new(1, 2, 18, 5),
        });

        (app, BoardLayout::calculate(Rect::new(0, 0, 80, 24)))
    }

    fn card_id(app: &App) -> i64 {
        app.store.notes()[0].id.unwrap()
    }

    #[test]
    fn test_press_on_card_opens_a_session() {
        let (mut app, layout) = app_with_card();
        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 5, 3), &layout);
        assert!(app.drag.is_some());
    }

    #[test]
    fn test_press_on_empty_space_does_nothing() {
        let (mut app, layout) = app_with_card();
        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 60, 10), &layout);
        assert!(app.drag.is_none());
    }

    #[test]
    fn test_drag_to_another_column_commits_and_clears_the_session() {
        let (mut app, layout) = app_with_card();
        let id = card_id(&app);

        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 5, 3), &layout);
        handle_mouse_event(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 70, 3), &layout);
        handle_mouse_event(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 70, 3), &layout);

        assert!(app.drag.is_none());
        assert_eq!(app.store.get(id).map(|n| n.status), Some(Status::Completed));
        // the sqlite row agrees with the store
        let persisted = app.service.list_notes().unwrap();
        assert_eq!(persisted[0].status, Status::Completed);
    }

    #[test]
    fn test_release_on_own_column_cancels_and_clears_the_session() {
        let (mut app, layout) = app_with_card();
        let id = card_id(&app);
        let before = app.store.revision();

        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 5, 3), &layout);
        handle_mouse_event(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 15, 3), &layout);
        handle_mouse_event(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 5, 3), &layout);
        handle_mouse_event(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 5, 3), &layout);

        assert!(app.drag.is_none());
        assert_eq!(app.store.get(id).map(|n| n.status), Some(Status::Todo));
        assert_eq!(app.store.revision(), before);
    }

    #[test]
    fn test_release_without_crossing_the_threshold_selects_the_card() {
        let (mut app, layout) = app_with_card();
        app.ui.selected_column = 3;

        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 5, 3), &layout);
        handle_mouse_event(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), 8, 3), &layout);
        // over the Completed column, but the threshold was never crossed
        handle_mouse_event(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 8, 3), &layout);

        assert!(app.drag.is_none());
        assert_eq!(app.ui.selected_column, 0);
        assert_eq!(app.ui.selected_row, 0);
        assert_eq!(
            app.store.get(card_id(&app)).map(|n| n.status),
            Some(Status::Todo)
        );
    }

    #[test]
    fn test_modal_swallows_mouse_events() {
        let (mut app, layout) = app_with_card();
        app.delete_confirmation = Some(app.store.notes()[0].clone());

        handle_mouse_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 5, 3), &layout);
        assert!(app.drag.is_none());
    }
}
