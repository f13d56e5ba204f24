//! Ratatui front-end: navigation sidebar, reader pane, and the overlays
//! (search, resume prompt, bookmarks) layered on top.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::{App, Focus};
pub use terminal::run_app;
