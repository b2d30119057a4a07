//! UI layer for desktop GUI: app shell and the panels it draws.

pub mod app;
pub mod panels;

pub use app::AnalyzerApp;
