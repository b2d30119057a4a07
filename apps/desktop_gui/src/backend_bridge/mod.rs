//! Bridge between the UI thread and the backend worker thread.

pub mod commands;
pub mod runtime;
