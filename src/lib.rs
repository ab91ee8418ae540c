pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod logging;
pub mod models;
pub mod service;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use database::Database;
pub use models::{Note, Priority, Status, User};
pub use service::{NoteFields, NotesService, ServiceError, SqliteNotesService};
pub use utils::Profile;
