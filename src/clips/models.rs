use serde::{Deserialize, Serialize};

/// One time-stamped unit of transcribed song text.
///
/// Line ids are monotonic within a song, so they double as the ordering of
/// the lines inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionLine {
    pub id: i64,
    pub song_id: i64,
    pub start_ms: i64,
    pub end_ms: i64,
    pub phrase: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl Interval {
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

/// A matched time span together with the transcription line it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedSpan {
    pub start_ms: i64,
    pub end_ms: i64,
    pub line_id: i64,
}

impl MatchedSpan {
    pub fn new(start_ms: i64, end_ms: i64, line_id: i64) -> Self {
        Self {
            start_ms,
            end_ms,
            line_id,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    pub fn interval(&self) -> Interval {
        Interval {
            start_ms: self.start_ms,
            end_ms: self.end_ms,
        }
    }
}

/// A playback interval with the lyric rows shown while it plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    pub start: i64,
    pub end: i64,
    pub lyrics: Vec<String>,
}

/// Whether a phrase may be shown to the user at all.
///
/// Blank lines and section markers such as "[Chorus]" never make it to the screen.
pub fn is_displayable_phrase(phrase: &str) -> bool {
    !phrase.trim().is_empty() && !phrase.to_lowercase().contains("chorus")
}
