use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::auth::{self, AuthError};
use crate::database::{Database, DatabaseError};
use crate::models::{Note, Priority, Status};
use crate::utils::parse_date;

#[derive(Parser)]
#[command(name = "workflo")]
#[command(about = "Workflo - a kanban board for tasks and notes in the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive board (default if no subcommand)
    Board,
    /// Quickly add a note without opening the board
    AddNote {
        /// Note title
        title: String,
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
        /// Initial column (todo, in_progress, under_review, completed)
        #[arg(long)]
        status: Option<String>,
        /// Priority (low, medium, urgent)
        #[arg(long)]
        priority: Option<String>,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Longer description
        #[arg(long)]
        description: Option<String>,
    },
    /// Register a new account
    Signup {
        /// Display name
        name: String,
        /// Email address (used to log in)
        email: String,
        /// Password
        password: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Authentication error: {0}")]
    AuthError(#[from] AuthError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Handle the add-note command
pub fn handle_add_note(
    title: String,
    email: String,
    password: String,
    status: Option<String>,
    priority: Option<String>,
    due: Option<String>,
    description: Option<String>,
    db: &Database,
) -> Result<(), CliError> {
    let session = auth::login(db, &email, &password)?;

    let status = match status {
        Some(s) => Status::parse(&s)
            .ok_or_else(|| CliError::InvalidValue(format!("unknown status '{}'", s)))?,
        None => Status::Todo,
    };

    let priority = match priority {
        Some(p) => Some(
            Priority::parse(&p)
                .ok_or_else(|| CliError::InvalidValue(format!("unknown priority '{}'", p)))?,
        ),
        None => None,
    };

    let deadline = if let Some(due_str) = due {
        parse_date(&due_str).map_err(|e| {
            CliError::DateParseError(format!("Invalid date format '{}': {}", due_str, e))
        })?;
        Some(due_str)
    } else {
        None
    };

    let mut note = Note::new(session.user_id, title, status);
    note.priority = priority;
    note.deadline = deadline;
    note.description = description;

    let id = db.insert_note(&note)?;
    println!("Note created successfully (ID: {})", id);

    Ok(())
}

/// Handle the signup command
pub fn handle_signup(
    name: String,
    email: String,
    password: String,
    db: &Database,
) -> Result<(), CliError> {
    let user_id = auth::signup(db, &name, &email, &password)?;
    println!("Account created for {} (ID: {})", email, user_id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_note_requires_valid_login() {
        let db = Database::open_in_memory().unwrap();
        let result = handle_add_note(
            "Buy milk".to_string(),
            "nobody@example.com".to_string(),
            "secret".to_string(),
            None,
            None,
            None,
            None,
            &db,
        );
        assert!(matches!(result, Err(CliError::AuthError(_))));
    }

    #[test]
    fn test_add_note_after_signup() {
        let db = Database::open_in_memory().unwrap();
        handle_signup(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "secret".to_string(),
            &db,
        )
        .unwrap();

        handle_add_note(
            "Buy milk".to_string(),
            "ada@example.com".to_string(),
            "secret".to_string(),
            Some("in_progress".to_string()),
            Some("urgent".to_string()),
            None,
            None,
            &db,
        )
        .unwrap();

        let session = auth::login(&db, "ada@example.com", "secret").unwrap();
        let notes = db.get_notes_for_user(session.user_id).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Buy milk");
        assert_eq!(notes[0].status, Status::InProgress);
        assert_eq!(notes[0].priority, Some(Priority::Urgent));
    }

    #[test]
    fn test_add_note_rejects_unknown_status() {
        let db = Database::open_in_memory().unwrap();
        handle_signup(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "secret".to_string(),
            &db,
        )
        .unwrap();

        let result = handle_add_note(
            "Buy milk".to_string(),
            "ada@example.com".to_string(),
            "secret".to_string(),
            Some("doing".to_string()),
            None,
            None,
            None,
            &db,
        );
        assert!(matches!(result, Err(CliError::InvalidValue(_))));
    }
}
