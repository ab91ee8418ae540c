pub mod auth_form;
pub mod board;
pub mod color;
pub mod confirm_delete;
pub mod form;
pub mod help;
pub mod status_bar;
