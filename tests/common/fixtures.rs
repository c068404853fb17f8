//! Test fixture creation for the lyrics database

use super::constants::*;
use anyhow::Result;
use cherrypick_lyrics::search::{ClipSearch, CoverUrls, QueryNormalizer, SearchSettings};
use cherrypick_lyrics::transcription_import::{import_file, ImportSummary};
use cherrypick_lyrics::transcription_store::SqliteTranscriptionStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn catalog_json() -> String {
    format!(
        r#"{{
    "albums": [
        {{"id": {album_1}, "title": "{album_1_title}", "cover_id": "{album_1_cover}", "year": 1995}}
    ],
    "songs": [
        {{
            "id": {song_1}, "author": "The Test Band", "title": "{song_1_title}",
            "album_id": {album_1}, "audio_ref": "audio/1.mp3",
            "lines": [
                {{"id": 1000, "start_ms": 0, "end_ms": 4000, "phrase": "When the night has come"}},
                {{"id": 1001, "start_ms": 4000, "end_ms": 8000, "phrase": "And the land is dark"}},
                {{"id": 1002, "start_ms": 8000, "end_ms": 12000, "phrase": "[Chorus]"}},
                {{"id": 1003, "start_ms": 12000, "end_ms": 16000, "phrase": "And the moon is the only light we see"}},
                {{"id": 1004, "start_ms": 16000, "end_ms": 20000, "phrase": "night has come again"}}
            ]
        }},
        {{
            "id": {song_2}, "author": "Jazz Ensemble", "title": "{song_2_title}",
            "audio_ref": "audio/2.mp3",
            "lines": [
                {{"id": 2000, "start_ms": 0, "end_ms": 25000, "phrase": "the night is long and the night is deep"}},
                {{"id": 2001, "start_ms": 25000, "end_ms": 29000, "phrase": null}}
            ]
        }},
        {{
            "id": {song_3}, "author": "The Test Band", "title": "{song_3_title}",
            "album_id": {album_1}, "audio_ref": "audio/3.mp3",
            "lines": [
                {{"id": 3000, "start_ms": 0, "end_ms": 5000, "phrase": "Sun is up"}},
                {{"id": 3001, "start_ms": 5000, "end_ms": 12000,
                  "phrase": "Sun goes down Over the quiet river And the city wakes up in neon"}}
            ]
        }}
    ]
}}"#,
        album_1 = ALBUM_1_ID,
        album_1_title = ALBUM_1_TITLE,
        album_1_cover = ALBUM_1_COVER_ID,
        song_1 = SONG_1_ID,
        song_1_title = SONG_1_TITLE,
        song_2 = SONG_2_ID,
        song_2_title = SONG_2_TITLE,
        song_3 = SONG_3_ID,
        song_3_title = SONG_3_TITLE,
    )
}

/// Writes the test catalog JSON into `dir` and returns its path.
pub fn write_catalog_file(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("catalog.json");
    std::fs::write(&path, catalog_json())?;
    Ok(path)
}

/// A lyrics database in a temporary directory, loaded with the test catalog.
pub struct TestCatalog {
    pub db_path: PathBuf,
    pub import_summary: ImportSummary,
    pub store: Arc<SqliteTranscriptionStore>,
    _temp_dir: TempDir,
}

impl TestCatalog {
    pub fn create() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("lyrics.db");
        let store = SqliteTranscriptionStore::new(&db_path)?;
        let import_summary = import_file(&store, &write_catalog_file(temp_dir.path())?)?;
        Ok(Self {
            db_path,
            import_summary,
            store: Arc::new(store),
            _temp_dir: temp_dir,
        })
    }

    pub fn search(&self) -> ClipSearch {
        self.search_with(QueryNormalizer::empty(), SearchSettings::default())
    }

    pub fn search_with(&self, normalizer: QueryNormalizer, settings: SearchSettings) -> ClipSearch {
        ClipSearch::new(
            self.store.clone(),
            normalizer,
            settings,
            CoverUrls::default(),
        )
    }
}
