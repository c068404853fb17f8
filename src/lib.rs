//! Lyrics search that answers with playable clips.
//!
//! This library exposes the internal modules for the binaries and the
//! end-to-end tests.

pub mod clips;
pub mod config;
pub mod search;
pub mod sqlite_persistence;
pub mod transcription_import;
pub mod transcription_store;

// Re-export commonly used types for convenience
pub use search::{ClipSearch, QueryNormalizer, SearchOutcome, SongMatch};
pub use transcription_store::{SqliteTranscriptionStore, TranscriptionStore};
