use crate::clips::{MatchedSpan, TranscriptionLine};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub cover_id: Option<String>,
    pub year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: i64,
    pub author: String,
    pub title: String,
    pub album_id: Option<i64>,
    /// Reference to the song's audio in whatever storage serves it.
    pub audio_ref: Option<String>,
}

/// A song with the lines that matched a query, as spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongSpans {
    pub song_id: i64,
    pub album_id: Option<i64>,
    pub audio_ref: Option<String>,
    pub spans: Vec<MatchedSpan>,
}

/// Everything needed to store one song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRecord {
    pub song: Song,
    pub album: Option<Album>,
    pub lines: Vec<TranscriptionLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularQuery {
    pub query: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularSong {
    pub song_id: i64,
    pub count: i64,
}
