use ratatui::layout::Rect;
use std::time::Instant;

use crate::auth::Session;
use crate::config::Config;
use crate::database::DatabaseError;
use crate::models::{Note, Priority, Status};
use crate::service::{NoteFields, NotesService, ServiceError, SqliteNotesService};
use crate::tui::drag::DragSession;
use crate::tui::store::NoteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Login / signup screen; no notes are loaded yet
    Auth,
    /// The four-column board
    Board,
    /// Create or edit form for a note
    NoteForm,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScreen {
    Login,
    Signup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Name,
    Email,
    Password,
}

#[derive(Debug, Clone)]
pub struct AuthForm {
    pub screen: AuthScreen,
    pub current_field: AuthField,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            screen: AuthScreen::Login,
            current_field: AuthField::Email,
            name: String::new(),
            email: String::new(),
            password: String::new(),
        }
    }
}

impl AuthForm {
    /// Field order differs per screen: signup has a name field, login does not
    pub fn fields(&self) -> &'static [AuthField] {
        match self.screen {
            AuthScreen::Login => &[AuthField::Email, AuthField::Password],
            AuthScreen::Signup => &[AuthField::Name, AuthField::Email, AuthField::Password],
        }
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.current_field).unwrap_or(0);
        self.current_field = fields[(idx + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.current_field).unwrap_or(0);
        self.current_field = fields[(idx + fields.len() - 1) % fields.len()];
    }

    pub fn current_value_mut(&mut self) -> &mut String {
        match self.current_field {
            AuthField::Name => &mut self.name,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }

    pub fn switch_screen(&mut self) {
        self.screen = match self.screen {
            AuthScreen::Login => AuthScreen::Signup,
            AuthScreen::Signup => AuthScreen::Login,
        };
        self.current_field = self.fields()[0];
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Title,
    Status,
    Priority,
    Deadline,
    Description,
}

impl NoteField {
    pub const ORDER: [NoteField; 5] = [
        NoteField::Title,
        NoteField::Status,
        NoteField::Priority,
        NoteField::Deadline,
        NoteField::Description,
    ];
}

/// Create/edit form. Status cycles through the four columns; priority
/// cycles through none/low/medium/urgent.
#[derive(Debug, Clone)]
pub struct NoteForm {
    pub current_field: NoteField,
    pub title: String,
    pub status: Status,
    pub priority: Option<Priority>,
    pub deadline: String,
    pub description: String,
    /// None for new notes, Some(id) when editing
    pub editing_id: Option<i64>,
}

impl NoteForm {
    pub fn new(status: Status) -> Self {
        Self {
            current_field: NoteField::Title,
            title: String::new(),
            status,
            priority: None,
            deadline: String::new(),
            description: String::new(),
            editing_id: None,
        }
    }

    pub fn from_note(note: &Note) -> Self {
        Self {
            current_field: NoteField::Title,
            title: note.title.clone(),
            status: note.status,
            priority: note.priority,
            deadline: note.deadline.clone().unwrap_or_default(),
            description: note.description.clone().unwrap_or_default(),
            editing_id: note.id,
        }
    }

    pub fn next_field(&mut self) {
        let idx = NoteField::ORDER
            .iter()
            .position(|f| *f == self.current_field)
            .unwrap_or(0);
        self.current_field = NoteField::ORDER[(idx + 1) % NoteField::ORDER.len()];
    }

    pub fn prev_field(&mut self) {
        let idx = NoteField::ORDER
            .iter()
            .position(|f| *f == self.current_field)
            .unwrap_or(0);
        self.current_field = NoteField::ORDER[(idx + NoteField::ORDER.len() - 1) % NoteField::ORDER.len()];
    }

    pub fn cycle_status(&mut self) {
        let idx = Status::ALL.iter().position(|s| *s == self.status).unwrap_or(0);
        self.status = Status::ALL[(idx + 1) % Status::ALL.len()];
    }

    pub fn cycle_priority(&mut self) {
        self.priority = match self.priority {
            None => Some(Priority::Low),
            Some(Priority::Low) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::Urgent),
            Some(Priority::Urgent) => None,
        };
    }

    pub fn fields(&self) -> NoteFields {
        NoteFields {
            title: self.title.clone(),
            status: self.status,
            priority: self.priority,
            deadline: if self.deadline.trim().is_empty() {
                None
            } else {
                Some(self.deadline.trim().to_string())
            },
            description: if self.description.trim().is_empty() {
                None
            } else {
                Some(self.description.clone())
            },
        }
    }
}

/// A card's rendered area for the frame just drawn, used to resolve which
/// card a pointer-down landed on. Rebuilt by the board renderer every frame.
#[derive(Debug, Clone, Copy)]
pub struct CardHit {
    pub note_id: i64,
    pub area: Rect,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: Mode,
    /// Keyboard cursor: column index into `Status::ALL` and row within it
    pub selected_column: usize,
    pub selected_row: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::Auth,
            selected_column: 0,
            selected_row: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

pub struct App {
    pub config: Config,
    pub service: SqliteNotesService,

    pub store: NoteStore,
    /// Live pointer gesture; `Some` only between press and release
    pub drag: Option<DragSession>,
    /// Card rects recorded by the last board render
    pub card_areas: Vec<CardHit>,

    pub ui: UiState,
    pub auth_form: AuthForm,
    pub note_form: Option<NoteForm>,
    pub delete_confirmation: Option<Note>,
    pub status: StatusState,

    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, service: SqliteNotesService) -> Result<Self, DatabaseError> {
        Ok(Self {
            config,
            service,
            store: NoteStore::new(),
            drag: None,
            card_areas: Vec::new(),
            ui: UiState::default(),
            auth_form: AuthForm::default(),
            note_form: None,
            delete_confirmation: None,
            status: StatusState::default(),
            should_quit: false,
        })
    }

    /// Session established: fetch everything and show the board.
    /// The fetch is blocking; the board renders only after it finishes.
    pub fn complete_login(&mut self, session: Session) {
        let username = session.username.clone();
        self.service.set_session(session);
        match self.service.list_notes() {
            Ok(notes) => {
                self.store.replace_all(notes);
                self.ui.mode = Mode::Board;
                self.auth_form = AuthForm::default();
                self.set_status_message(format!("Welcome back, {}", username));
            }
            Err(e) => {
                self.service.clear_session();
                self.set_status_message(format!("Failed to load notes: {}", e));
            }
        }
    }

    pub fn logout(&mut self) {
        self.service.clear_session();
        self.store.replace_all(Vec::new());
        self.drag = None;
        self.card_areas.clear();
        self.ui = UiState::default();
        self.auth_form = AuthForm::default();
        self.note_form = None;
        self.delete_confirmation = None;
    }

    /// Reload the whole collection from the service
    pub fn refresh_notes(&mut self) {
        match self.service.list_notes() {
            Ok(notes) => self.store.replace_all(notes),
            Err(e) => self.set_status_message(format!("Failed to reload notes: {}", e)),
        }
    }

    /// The status the keyboard cursor's column maps to
    pub fn selected_status(&self) -> Status {
        Status::ALL[self.ui.selected_column.min(Status::ALL.len() - 1)]
    }

    /// The note under the keyboard cursor, if any
    pub fn selected_note(&self) -> Option<&Note> {
        let column = self.store.notes_with_status(self.selected_status());
        column.get(self.ui.selected_row).copied()
    }

    pub fn clamp_selection(&mut self) {
        let len = self.store.notes_with_status(self.selected_status()).len();
        if len == 0 {
            self.ui.selected_row = 0;
        } else if self.ui.selected_row >= len {
            self.ui.selected_row = len - 1;
        }
    }

    /// Drag commit handler: optimistic store rewrite, then confirmation
    pub fn commit_status_change(&mut self, note_id: i64, new_status: Status) {
        commit_status_transition(&mut self.store, &self.service, note_id, new_status);
    }

    /// Submit the open note form (create or full-field edit)
    pub fn submit_note_form(&mut self) {
        let Some(form) = self.note_form.clone() else {
            return;
        };

        // Blocking validation before any service call
        if form.title.trim().is_empty() {
            self.set_status_message("Title cannot be empty".to_string());
            return;
        }
        if !form.deadline.trim().is_empty()
            && crate::utils::parse_date(form.deadline.trim()).is_err()
        {
            self.set_status_message("Deadline must be YYYY-MM-DD".to_string());
            return;
        }

        let fields = form.fields();
        let result = match form.editing_id {
            None => match self.service.add_note(&fields) {
                Ok(created) => {
                    let mut notes = self.store.notes().to_vec();
                    notes.insert(0, created);
                    self.store.replace_all(notes);
                    Ok("Note added".to_string())
                }
                Err(e) => Err(e),
            },
            Some(id) => match self.service.update_note(id, &fields) {
                Ok(()) => {
                    if let Some(existing) = self.store.get(id) {
                        let mut updated = existing.clone();
                        updated.title = fields.title.clone();
                        updated.status = fields.status;
                        updated.priority = fields.priority;
                        updated.deadline = fields.deadline.clone();
                        updated.description = fields.description.clone();
                        let notes = self.store.with_replaced(&updated);
                        self.store.replace_all(notes);
                    }
                    Ok("Note updated".to_string())
                }
                Err(e) => Err(e),
            },
        };

        match result {
            Ok(msg) => {
                self.note_form = None;
                self.ui.mode = Mode::Board;
                self.clamp_selection();
                self.set_status_message(msg);
            }
            Err(ServiceError::Unauthorized) => {
                self.set_status_message("Session expired, please log in again".to_string());
                self.logout();
            }
            Err(e) => self.set_status_message(format!("Failed to save note: {}", e)),
        }
    }

    /// Confirmed delete: optimistic removal, then the service call
    pub fn delete_note(&mut self, note_id: i64) {
        let remaining = self.store.without(note_id);
        self.store.replace_all(remaining);
        self.clamp_selection();

        match self.service.delete_note(note_id) {
            Ok(()) => self.set_status_message("Note deleted".to_string()),
            Err(e) => {
                log::warn!("delete confirmation failed for note {}: {}", note_id, e);
                self.set_status_message(format!("Failed to delete note: {}", e));
            }
        }
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    /// Auto-clear status messages after a few seconds
    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= 4 {
                self.status.message = None;
                self.status.message_time = None;
            }
        }
    }
}

/// The status-transition applier.
///
/// Rewrites the collection first (the optimistic update every reader sees
/// immediately), then sends the confirmation carrying the note's full field
/// set with the new status. A failed confirmation is logged and left alone:
/// the optimistic state stays the system of record.
///
/// Returns whether the confirmation call was dispatched.
pub fn commit_status_transition<S: NotesService>(
    store: &mut NoteStore,
    service: &S,
    note_id: i64,
    new_status: Status,
) -> bool {
    let Some(note) = store.get(note_id) else {
        log::warn!("status transition for unknown note {}", note_id);
        return false;
    };
    if note.status == new_status {
        return false;
    }

    let mut fields = NoteFields::from_note(note);
    fields.status = new_status;

    let updated = store.with_status(note_id, new_status);
    store.replace_all(updated);

    if let Err(e) = service.update_note(note_id, &fields) {
        log::warn!(
            "status confirmation failed for note {} -> {}: {}",
            note_id,
            new_status.as_str(),
            e
        );
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Fake service that records every confirmation call
    struct RecordingService {
        updates: RefCell<Vec<(i64, NoteFields)>>,
        fail: bool,
    }

    impl RecordingService {
        fn new() -> Self {
            Self {
                updates: RefCell::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                updates: RefCell::new(Vec::new()),
                fail: true,
            }
        }
    }

    impl NotesService for RecordingService {
        fn list_notes(&self) -> Result<Vec<Note>, ServiceError> {
            Ok(Vec::new())
        }

        fn add_note(&self, _fields: &NoteFields) -> Result<Note, ServiceError> {
            Err(ServiceError::Unauthorized)
        }

        fn update_note(&self, id: i64, fields: &NoteFields) -> Result<(), ServiceError> {
            self.updates.borrow_mut().push((id, fields.clone()));
            if self.fail {
                Err(ServiceError::NotFound)
            } else {
                Ok(())
            }
        }

        fn delete_note(&self, _id: i64) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    fn note(id: i64, title: &str, status: Status) -> Note {
        let mut n = Note::new(1, title.to_string(), status);
        n.id = Some(id);
        n
    }

    #[test]
    fn test_transition_moves_exactly_one_note() {
        let mut store = NoteStore::new();
        store.replace_all(vec![
            note(1, "first", Status::Todo),
            note(2, "second", Status::Todo),
            note(3, "third", Status::InProgress),
        ]);
        let service = RecordingService::new();

        let dispatched = commit_status_transition(&mut store, &service, 1, Status::Completed);

        assert!(dispatched);
        assert_eq!(store.get(1).map(|n| n.status), Some(Status::Completed));
        assert_eq!(store.get(2).map(|n| n.status), Some(Status::Todo));
        assert_eq!(store.get(3).map(|n| n.status), Some(Status::InProgress));
    }

    #[test]
    fn test_transition_sends_full_field_set() {
        let mut store = NoteStore::new();
        let mut n = note(7, "write report", Status::Todo);
        n.priority = Some(Priority::Urgent);
        n.deadline = Some("2026-09-01".to_string());
        n.description = Some("quarterly numbers".to_string());
        store.replace_all(vec![n]);
        let service = RecordingService::new();

        commit_status_transition(&mut store, &service, 7, Status::UnderReview);

        let updates = service.updates.borrow();
        assert_eq!(updates.len(), 1);
        let (id, fields) = &updates[0];
        assert_eq!(*id, 7);
        assert_eq!(fields.title, "write report");
        assert_eq!(fields.status, Status::UnderReview);
        assert_eq!(fields.priority, Some(Priority::Urgent));
        assert_eq!(fields.deadline.as_deref(), Some("2026-09-01"));
        assert_eq!(fields.description.as_deref(), Some("quarterly numbers"));
    }

    #[test]
    fn test_transition_to_same_status_is_a_noop() {
        let mut store = NoteStore::new();
        store.replace_all(vec![note(1, "first", Status::Todo)]);
        let before = store.revision();
        let service = RecordingService::new();

        let dispatched = commit_status_transition(&mut store, &service, 1, Status::Todo);

        assert!(!dispatched);
        assert_eq!(store.revision(), before);
        assert!(service.updates.borrow().is_empty());
    }

    #[test]
    fn test_transition_for_unknown_note_is_a_noop() {
        let mut store = NoteStore::new();
        store.replace_all(vec![note(1, "first", Status::Todo)]);
        let service = RecordingService::new();

        let dispatched = commit_status_transition(&mut store, &service, 99, Status::Completed);

        assert!(!dispatched);
        assert!(service.updates.borrow().is_empty());
    }

    #[test]
    fn test_failed_confirmation_keeps_optimistic_state() {
        let mut store = NoteStore::new();
        store.replace_all(vec![note(1, "first", Status::Todo)]);
        let service = RecordingService::failing();

        let dispatched = commit_status_transition(&mut store, &service, 1, Status::Completed);

        // No rollback: the collection keeps the new status
        assert!(dispatched);
        assert_eq!(store.get(1).map(|n| n.status), Some(Status::Completed));
        assert_eq!(service.updates.borrow().len(), 1);
    }

    #[test]
    fn test_transition_bumps_revision_once() {
        let mut store = NoteStore::new();
        store.replace_all(vec![note(1, "first", Status::Todo)]);
        let before = store.revision();
        let service = RecordingService::new();

        commit_status_transition(&mut store, &service, 1, Status::InProgress);

        assert_eq!(store.revision(), before + 1);
    }

    #[test]
    fn test_note_form_cycles_status_in_column_order() {
        let mut form = NoteForm::new(Status::Todo);
        form.cycle_status();
        assert_eq!(form.status, Status::InProgress);
        form.cycle_status();
        assert_eq!(form.status, Status::UnderReview);
        form.cycle_status();
        assert_eq!(form.status, Status::Completed);
        form.cycle_status();
        assert_eq!(form.status, Status::Todo);
    }

    #[test]
    fn test_note_form_fields_blank_optionals_become_none() {
        let mut form = NoteForm::new(Status::Todo);
        form.title = "hello".to_string();
        form.deadline = "   ".to_string();
        let fields = form.fields();
        assert_eq!(fields.deadline, None);
        assert_eq!(fields.description, None);
    }

    #[test]
    fn test_auth_form_switch_resets_focus() {
        let mut form = AuthForm::default();
        form.next_field();
        assert_eq!(form.current_field, AuthField::Password);
        form.switch_screen();
        assert_eq!(form.screen, AuthScreen::Signup);
        assert_eq!(form.current_field, AuthField::Name);
    }
}
