//! Read-only capabilities the clip builder needs from storage.

use super::models::TranscriptionLine;
use anyhow::Result;

pub trait LineLookup {
    /// Lines `line_id - 1`, `line_id` and `line_id + 1` of the given song,
    /// ordered by id. Missing neighbors are simply absent.
    fn lines_around(&self, song_id: i64, line_id: i64) -> Result<Vec<TranscriptionLine>>;
}

pub trait SongResolver {
    /// The song a transcription line belongs to, `None` if the line is unknown.
    fn song_id_for_line(&self, line_id: i64) -> Result<Option<i64>>;
}
