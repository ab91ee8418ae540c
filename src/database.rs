use rusqlite::Connection;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Note, Priority, Status, User};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;

        let db = Database { conn };
        db.initialize_schema()?;

        Ok(db)
    }

    /// Create an in-memory database (used by tests)
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                username        TEXT NOT NULL,
                email           TEXT NOT NULL UNIQUE,
                password_hash   TEXT NOT NULL,
                date_joined     TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id         INTEGER NOT NULL,
                title           TEXT NOT NULL,
                status          TEXT NOT NULL DEFAULT 'todo',
                priority        TEXT,
                deadline        TEXT,
                description     TEXT,
                created_at      INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_notes_user_id ON notes(user_id)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
            [],
        )?;

        Ok(())
    }

    /// Helper function to map a row to a Note
    fn row_to_note(row: &rusqlite::Row) -> Result<Note, rusqlite::Error> {
        let id: i64 = row.get(0)?;
        let status_str: String = row.get(3)?;
        let priority_str: Option<String> = row.get(4)?;

        let status = Status::parse(&status_str).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(3, "status".to_string(), rusqlite::types::Type::Text)
        })?;
        let priority = match priority_str {
            Some(p) => Some(Priority::parse(&p).ok_or_else(|| {
                rusqlite::Error::InvalidColumnType(
                    4,
                    "priority".to_string(),
                    rusqlite::types::Type::Text,
                )
            })?),
            None => None,
        };

        Ok(Note {
            id: Some(id),
            user_id: row.get(1)?,
            title: row.get(2)?,
            status,
            priority,
            deadline: row.get(5)?,
            description: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    /// Insert a note and return its ID
    pub fn insert_note(&self, note: &Note) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO notes (user_id, title, status, priority, deadline, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                note.user_id,
                note.title,
                note.status.as_str(),
                note.priority.map(|p| p.as_str()),
                note.deadline,
                note.description,
                note.created_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get all notes for a user, newest first
    pub fn get_notes_for_user(&self, user_id: i64) -> Result<Vec<Note>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, status, priority, deadline, description, created_at
             FROM notes WHERE user_id = ?1 ORDER BY id DESC",
        )?;
        let notes = stmt
            .query_map(rusqlite::params![user_id], Self::row_to_note)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    /// Full-field update of a note's mutable fields, scoped to a user.
    /// Returns the number of rows changed (0 when the note does not exist).
    pub fn update_note(&self, note: &Note) -> Result<usize, DatabaseError> {
        let id = note.id.ok_or_else(|| {
            DatabaseError::SqliteError(rusqlite::Error::InvalidColumnType(
                0,
                "id".to_string(),
                rusqlite::types::Type::Null,
            ))
        })?;

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE notes SET title = ?1, status = ?2, priority = ?3,
             deadline = ?4, description = ?5 WHERE id = ?6 AND user_id = ?7",
            rusqlite::params![
                note.title,
                note.status.as_str(),
                note.priority.map(|p| p.as_str()),
                note.deadline,
                note.description,
                id,
                note.user_id
            ],
        )?;
        tx.commit()?;
        Ok(changed)
    }

    /// Insert a note under an explicit ID (the upsert fallback when an
    /// update matched no row)
    pub fn insert_note_with_id(&self, id: i64, note: &Note) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO notes (id, user_id, title, status, priority, deadline, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                id,
                note.user_id,
                note.title,
                note.status.as_str(),
                note.priority.map(|p| p.as_str()),
                note.deadline,
                note.description,
                note.created_at
            ],
        )?;
        Ok(())
    }

    /// Delete a note by ID, scoped to a user.
    /// Returns the number of rows deleted (0 when the note does not exist).
    pub fn delete_note(&self, id: i64, user_id: i64) -> Result<usize, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        let deleted = tx.execute(
            "DELETE FROM notes WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id, user_id],
        )?;
        tx.commit()?;
        Ok(deleted)
    }

    /// Insert a user and return their ID
    pub fn insert_user(&self, user: &User) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO users (username, email, password_hash, date_joined)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                user.username,
                user.email,
                user.password_hash,
                user.date_joined
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Look up a user by email address
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, username, email, password_hash, date_joined
             FROM users WHERE email = ?1",
        )?;

        let result = stmt.query_row(rusqlite::params![email], |row| {
            Ok(User {
                id: Some(row.get(0)?),
                username: row.get(1)?,
                email: row.get(2)?,
                password_hash: row.get(3)?,
                date_joined: row.get(4)?,
            })
        });

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::from(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.db");
        let path_str = path.to_str().unwrap();

        {
            let db = Database::new(path_str).unwrap();
            let mut note = Note::new(1, "persisted".to_string(), Status::UnderReview);
            note.priority = Some(Priority::Low);
            db.insert_note(&note).unwrap();
        }

        let db = Database::new(path_str).unwrap();
        let notes = db.get_notes_for_user(1).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "persisted");
        assert_eq!(notes[0].status, Status::UnderReview);
        assert_eq!(notes[0].priority, Some(Priority::Low));
    }

    #[test]
    fn test_update_scoped_to_owner() {
        let db = Database::open_in_memory().unwrap();
        let mut note = Note::new(1, "mine".to_string(), Status::Todo);
        let id = db.insert_note(&note).unwrap();
        note.id = Some(id);

        // Another user's update must not touch the row
        let mut stolen = note.clone();
        stolen.user_id = 2;
        stolen.title = "theirs".to_string();
        assert_eq!(db.update_note(&stolen).unwrap(), 0);

        note.title = "renamed".to_string();
        assert_eq!(db.update_note(&note).unwrap(), 1);

        let notes = db.get_notes_for_user(1).unwrap();
        assert_eq!(notes[0].title, "renamed");
    }

    #[test]
    fn test_unknown_status_string_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO notes (user_id, title, status, created_at)
                 VALUES (1, 'bad', 'doing', 0)",
                [],
            )
            .unwrap();

        assert!(db.get_notes_for_user(1).is_err());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let db = Database::open_in_memory().unwrap();
        let user = User::new(
            "ada".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
        );
        db.insert_user(&user).unwrap();
        assert!(db.insert_user(&user).is_err());
    }
}
