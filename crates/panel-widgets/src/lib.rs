//! Widgets shared by the talent-scout filter panel: a single-line query
//! input, category tabs, match-highlighted rows and colour themes.

pub mod input;
pub mod rows;
pub mod tabs;
pub mod theme;

pub use input::QueryInput;
pub use rows::{highlight_cell, highlight_indices, highlight_line, highlighted_rows};
pub use tabs::render_tabs;
pub use theme::Theme;
