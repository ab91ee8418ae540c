pub mod app;
pub mod drag;
pub mod error;
pub mod events;
pub mod layout;
pub mod render;
pub mod store;
pub mod widgets;

pub use app::{App, Mode};
pub use drag::{DragSession, DropOutcome};
pub use error::TuiError;
pub use events::run_event_loop;
pub use layout::BoardLayout;
pub use render::render;
pub use store::NoteStore;
