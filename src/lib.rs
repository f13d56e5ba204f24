//! Core library surface for the Noble Quran terminal reader.
//!
//! The reader is split into a pure core (content index, view projector,
//! playback state machine) and the collaborators around it: the rodio audio
//! sink, the SQLite preferences store, the Ratatui shell, and the offline
//! data-preparation commands that produce the content file.
pub mod audio;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod playback;
pub mod prep;
pub mod projector;
pub mod ui;

pub use corpus::ContentIndex;
pub use error::{CorpusError, PrepError};
pub use models::{Ayah, FontSize, Surah, SurahMeta, Theme};

/// The view projector and its value types.
pub use projector::{project, BrowseMode, BrowseTarget, DisplayEntry, DisplaySequence, Projector};

/// The playback state machine and the seam the audio output plugs into.
pub use playback::{AudioSink, PlaybackController, PlaybackState, SinkEvent, Slot};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
