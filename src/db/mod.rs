//! Preferences store split across logical submodules: settings (theme and
//! font size), bookmarks, and the last-read pointer.

mod bookmarks;
mod connection;
mod last_read;
mod preferences;

pub use bookmarks::{fetch_bookmarks, toggle_bookmark};
pub use connection::{apply_schema, open_preferences};
pub use last_read::{load_last_read, save_last_read, LastRead};
pub use preferences::{load_font_size, load_theme, save_font_size, save_theme};
