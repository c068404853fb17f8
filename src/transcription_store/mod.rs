mod models;
mod schema;
mod sqlite_store;

pub use models::*;
pub use schema::TRANSCRIPTION_VERSIONED_SCHEMAS;
pub use sqlite_store::SqliteTranscriptionStore;

use crate::clips::{LineLookup, SongResolver, TranscriptionLine};
use anyhow::Result;

/// Storage of songs, albums and their transcribed lines.
///
/// Besides the two lookups the clip builder needs, it serves the full-text
/// search over phrases and keeps the query and song history.
pub trait TranscriptionStore: LineLookup + SongResolver + Send + Sync {
    // =========================================================================
    // Lines
    // =========================================================================

    /// All lines of a song ordered by start time.
    fn lines_for_song(&self, song_id: i64) -> Result<Vec<TranscriptionLine>>;

    /// Ids of the lines matching `query`, best match first.
    ///
    /// A line matches when it contains at least `min_match_ratio` of the
    /// distinct query words (rounded up, never less than one word).
    fn search_lines(&self, query: &str, min_match_ratio: f64, limit: usize) -> Result<Vec<i64>>;

    /// Groups the given lines by song, spans of each song ordered by line id.
    fn matched_spans_by_song(&self, line_ids: &[i64]) -> Result<Vec<SongSpans>>;

    // =========================================================================
    // Catalog
    // =========================================================================

    fn get_song(&self, song_id: i64) -> Result<Option<Song>>;

    fn get_album(&self, album_id: i64) -> Result<Option<Album>>;

    /// Songs ordered by title.
    fn list_songs(&self, offset: usize, limit: usize) -> Result<Vec<Song>>;

    fn get_songs_count(&self) -> Result<usize>;

    /// Inserts or replaces a song together with its album and lines.
    fn import_song(&self, record: &SongRecord) -> Result<()>;

    /// Rebuilds the full-text index from the stored lines. Returns the number
    /// of indexed lines.
    fn rebuild_search_index(&self) -> Result<usize>;

    // =========================================================================
    // History
    // =========================================================================

    fn add_query_history(&self, query: &str) -> Result<()>;

    fn add_song_history(&self, song_id: i64) -> Result<()>;

    fn popular_queries(&self, limit: usize) -> Result<Vec<PopularQuery>>;

    fn popular_songs(&self, limit: usize) -> Result<Vec<PopularSong>>;
}
