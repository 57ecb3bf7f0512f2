//! Interactive filter panel.

pub mod app;

pub use app::{App, Focus, run};
