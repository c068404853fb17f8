//! Loads a catalog of albums, songs and their transcriptions from a JSON file.
//!
//! The whole file is validated before anything is written, so a rejected
//! file leaves the store untouched. Each song is then stored in its own
//! transaction.

use crate::clips::TranscriptionLine;
use crate::transcription_store::{Album, Song, SongRecord, TranscriptionStore};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Album {0} appears more than once")]
    DuplicateAlbum(i64),

    #[error("Song {0} appears more than once")]
    DuplicateSong(i64),

    #[error("Line {0} appears more than once")]
    DuplicateLine(i64),

    #[error("Song {song_id} refers to unknown album {album_id}")]
    UnknownAlbum { song_id: i64, album_id: i64 },

    #[error("Line {line_id} of song {song_id} has invalid timing {start_ms}..{end_ms}")]
    InvalidTiming {
        song_id: i64,
        line_id: i64,
        start_ms: i64,
        end_ms: i64,
    },

    #[error("Failed to store song {song_id}: {source:#}")]
    Store {
        song_id: i64,
        source: anyhow::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub albums: Vec<CatalogAlbum>,
    #[serde(default)]
    pub songs: Vec<CatalogSong>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogAlbum {
    pub id: i64,
    pub title: String,
    pub cover_id: Option<String>,
    pub year: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSong {
    pub id: i64,
    pub author: String,
    pub title: String,
    pub album_id: Option<i64>,
    pub audio_ref: Option<String>,
    #[serde(default)]
    pub lines: Vec<CatalogLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogLine {
    pub id: i64,
    pub start_ms: i64,
    pub end_ms: i64,
    pub phrase: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub songs: usize,
    pub lines: usize,
}

impl CatalogFile {
    pub fn parse(json: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ImportError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Turns the file into one record per song, checking ids and timings.
    ///
    /// Songs may refer to albums missing from the file as long as
    /// `album_known` says the album is already stored.
    pub fn into_records(
        self,
        album_known: impl Fn(i64) -> bool,
    ) -> Result<Vec<SongRecord>, ImportError> {
        let mut albums: HashMap<i64, Album> = HashMap::new();
        for album in self.albums {
            let id = album.id;
            let album = Album {
                id: album.id,
                title: album.title,
                cover_id: album.cover_id,
                year: album.year,
            };
            if albums.insert(id, album).is_some() {
                return Err(ImportError::DuplicateAlbum(id));
            }
        }

        let mut song_ids = HashSet::new();
        let mut line_ids = HashSet::new();
        let mut records = Vec::with_capacity(self.songs.len());
        for song in self.songs {
            if !song_ids.insert(song.id) {
                return Err(ImportError::DuplicateSong(song.id));
            }

            let album = match song.album_id {
                Some(album_id) => match albums.get(&album_id) {
                    Some(album) => Some(album.clone()),
                    None if album_known(album_id) => None,
                    None => {
                        return Err(ImportError::UnknownAlbum {
                            song_id: song.id,
                            album_id,
                        })
                    }
                },
                None => None,
            };

            let mut lines = Vec::with_capacity(song.lines.len());
            for line in song.lines {
                if !line_ids.insert(line.id) {
                    return Err(ImportError::DuplicateLine(line.id));
                }
                if line.start_ms < 0 || line.end_ms < line.start_ms {
                    return Err(ImportError::InvalidTiming {
                        song_id: song.id,
                        line_id: line.id,
                        start_ms: line.start_ms,
                        end_ms: line.end_ms,
                    });
                }
                lines.push(TranscriptionLine {
                    id: line.id,
                    song_id: song.id,
                    start_ms: line.start_ms,
                    end_ms: line.end_ms,
                    phrase: line.phrase,
                });
            }

            records.push(SongRecord {
                song: Song {
                    id: song.id,
                    author: song.author,
                    title: song.title,
                    album_id: song.album_id,
                    audio_ref: song.audio_ref,
                },
                album,
                lines,
            });
        }
        Ok(records)
    }
}

/// Validates `catalog` and stores every song in it.
pub fn import_catalog(
    store: &dyn TranscriptionStore,
    catalog: CatalogFile,
) -> Result<ImportSummary, ImportError> {
    let records = catalog.into_records(|album_id| {
        matches!(store.get_album(album_id), Ok(Some(_)))
    })?;

    let mut summary = ImportSummary::default();
    for record in &records {
        store
            .import_song(record)
            .map_err(|source| ImportError::Store {
                song_id: record.song.id,
                source,
            })?;
        summary.songs += 1;
        summary.lines += record.lines.len();
    }
    info!(
        "Imported {} songs with {} lines",
        summary.songs, summary.lines
    );
    Ok(summary)
}

pub fn import_file(
    store: &dyn TranscriptionStore,
    path: &Path,
) -> Result<ImportSummary, ImportError> {
    import_catalog(store, CatalogFile::load(path)?)
}
