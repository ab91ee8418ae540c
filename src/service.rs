use thiserror::Error;

use crate::auth::Session;
use crate::database::{Database, DatabaseError};
use crate::models::{Note, Priority, Status};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not authenticated")]
    Unauthorized,
    #[error("Note not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// The full mutable field set of a note, carried whole on every add/update
/// (there is no partial-update call).
#[derive(Debug, Clone)]
pub struct NoteFields {
    pub title: String,
    pub status: Status,
    pub priority: Option<Priority>,
    pub deadline: Option<String>,
    pub description: Option<String>,
}

impl NoteFields {
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            status: note.status,
            priority: note.priority,
            deadline: note.deadline.clone(),
            description: note.description.clone(),
        }
    }
}

/// Backend contract the board talks to. The sqlite implementation below is
/// the production one; tests substitute a recording fake.
pub trait NotesService {
    /// All notes for the authenticated principal, newest first
    fn list_notes(&self) -> Result<Vec<Note>, ServiceError>;

    /// Create a note; the store assigns the identifier
    fn add_note(&self, fields: &NoteFields) -> Result<Note, ServiceError>;

    /// Full-field replace of a note's mutable fields by identifier
    fn update_note(&self, id: i64, fields: &NoteFields) -> Result<(), ServiceError>;

    fn delete_note(&self, id: i64) -> Result<(), ServiceError>;
}

fn validate(fields: &NoteFields) -> Result<(), ServiceError> {
    if fields.title.trim().is_empty() {
        return Err(ServiceError::Validation("Title cannot be empty".to_string()));
    }
    Ok(())
}

/// Notes backend over the local sqlite database, scoped to the logged-in
/// user. Every call checks for an open session first.
pub struct SqliteNotesService {
    db: Database,
    session: Option<Session>,
}

impl SqliteNotesService {
    pub fn new(db: Database) -> Self {
        Self { db, session: None }
    }

    /// Borrow the underlying database (used by the auth layer)
    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub fn clear_session(&mut self) {
        self.session = None;
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn require_session(&self) -> Result<&Session, ServiceError> {
        self.session.as_ref().ok_or(ServiceError::Unauthorized)
    }
}

impl NotesService for SqliteNotesService {
    fn list_notes(&self) -> Result<Vec<Note>, ServiceError> {
        let session = self.require_session()?;
        Ok(self.db.get_notes_for_user(session.user_id)?)
    }

    fn add_note(&self, fields: &NoteFields) -> Result<Note, ServiceError> {
        let session = self.require_session()?;
        validate(fields)?;

        let mut note = Note::new(session.user_id, fields.title.clone(), fields.status);
        note.priority = fields.priority;
        note.deadline = fields.deadline.clone();
        note.description = fields.description.clone();

        let id = self.db.insert_note(&note)?;
        note.id = Some(id);
        log::info!("note added: id={} status={}", id, note.status.as_str());
        Ok(note)
    }

    fn update_note(&self, id: i64, fields: &NoteFields) -> Result<(), ServiceError> {
        let session = self.require_session()?;
        validate(fields)?;

        // Full-field replace; a missing row falls through to an insert with
        // the same id (upsert), matching list/update symmetry for callers
        // that already hold the note.
        let note = Note {
            id: Some(id),
            user_id: session.user_id,
            title: fields.title.clone(),
            status: fields.status,
            priority: fields.priority,
            deadline: fields.deadline.clone(),
            description: fields.description.clone(),
            created_at: crate::utils::now_millis(),
        };

        let changed = self.db.update_note(&note)?;
        if changed == 0 {
            self.db.insert_note_with_id(id, &note)?;
        }
        log::info!("note updated: id={} status={}", id, fields.status.as_str());
        Ok(())
    }

    fn delete_note(&self, id: i64) -> Result<(), ServiceError> {
        let session = self.require_session()?;
        let deleted = self.db.delete_note(id, session.user_id)?;
        if deleted == 0 {
            return Err(ServiceError::NotFound);
        }
        log::info!("note deleted: id={}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_session() -> SqliteNotesService {
        let db = Database::open_in_memory().unwrap();
        let mut service = SqliteNotesService::new(db);
        service.set_session(Session {
            user_id: 1,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
        });
        service
    }

    fn fields(title: &str, status: Status) -> NoteFields {
        NoteFields {
            title: title.to_string(),
            status,
            priority: None,
            deadline: None,
            description: None,
        }
    }

    #[test]
    fn test_calls_require_a_session() {
        let db = Database::open_in_memory().unwrap();
        let service = SqliteNotesService::new(db);

        assert!(matches!(
            service.list_notes(),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            service.add_note(&fields("x", Status::Todo)),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            service.update_note(1, &fields("x", Status::Todo)),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            service.delete_note(1),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn test_add_rejects_blank_title() {
        let service = service_with_session();
        let result = service.add_note(&fields("   ", Status::Todo));
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_list_returns_newest_first() {
        let service = service_with_session();
        service.add_note(&fields("first", Status::Todo)).unwrap();
        service.add_note(&fields("second", Status::Todo)).unwrap();

        let notes = service.list_notes().unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].title, "second");
        assert_eq!(notes[1].title, "first");
    }

    #[test]
    fn test_update_replaces_every_field() {
        let service = service_with_session();
        let created = service.add_note(&fields("draft", Status::Todo)).unwrap();
        let id = created.id.unwrap();

        let mut changed = fields("final", Status::Completed);
        changed.priority = Some(Priority::Medium);
        changed.deadline = Some("2026-09-15".to_string());
        service.update_note(id, &changed).unwrap();

        let notes = service.list_notes().unwrap();
        assert_eq!(notes[0].title, "final");
        assert_eq!(notes[0].status, Status::Completed);
        assert_eq!(notes[0].priority, Some(Priority::Medium));
        assert_eq!(notes[0].deadline.as_deref(), Some("2026-09-15"));
    }

    #[test]
    fn test_update_of_missing_note_inserts_under_same_id() {
        let service = service_with_session();
        service
            .update_note(42, &fields("ghost", Status::InProgress))
            .unwrap();

        let notes = service.list_notes().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, Some(42));
        assert_eq!(notes[0].title, "ghost");
    }

    #[test]
    fn test_delete_of_missing_note_is_not_found() {
        let service = service_with_session();
        assert!(matches!(
            service.delete_note(99),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn test_notes_are_scoped_to_the_session_user() {
        let db = Database::open_in_memory().unwrap();
        let mut service = SqliteNotesService::new(db);

        service.set_session(Session {
            user_id: 1,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
        });
        service.add_note(&fields("mine", Status::Todo)).unwrap();

        service.set_session(Session {
            user_id: 2,
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
        });
        assert!(service.list_notes().unwrap().is_empty());
    }
}
