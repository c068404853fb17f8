//! Turns a lyrics query into playable clips of the matching songs.

use super::query_normalizer::QueryNormalizer;
use super::song_info::{pack_song, pack_song_info, timed_lyrics, CoverUrls, SongInfo, TimedPhrase};
use crate::clips::{assemble, reorder, select_clips, Clip, Interval, SongKeyed};
use crate::transcription_store::{PopularQuery, SongSpans, TranscriptionStore};
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_MIN_MATCH_RATIO: f64 = 1.0;
pub const DEFAULT_MAX_MATCHES: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// Share of the query words a line must contain to match.
    pub min_match_ratio: f64,
    /// Upper bound on matched lines considered per query.
    pub max_matches: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_match_ratio: DEFAULT_MIN_MATCH_RATIO,
            max_matches: DEFAULT_MAX_MATCHES,
        }
    }
}

/// One song of a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongMatch {
    pub song_id: i64,
    pub album_id: Option<i64>,
    pub audio_ref: Option<String>,
    pub chunks: Vec<Interval>,
    pub clips: Vec<Clip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<SongInfo>,
}

impl SongKeyed for SongMatch {
    fn song_key(&self) -> String {
        self.song_id.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// The query as it was run, after transliteration.
    pub query: String,
    pub songs: Vec<SongMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongDetails {
    #[serde(flatten)]
    pub info: SongInfo,
    pub lyrics: Vec<TimedPhrase>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularSongInfo {
    pub count: i64,
    #[serde(flatten)]
    pub info: SongInfo,
}

pub struct ClipSearch {
    store: Arc<dyn TranscriptionStore>,
    normalizer: QueryNormalizer,
    settings: SearchSettings,
    covers: CoverUrls,
}

impl ClipSearch {
    pub fn new(
        store: Arc<dyn TranscriptionStore>,
        normalizer: QueryNormalizer,
        settings: SearchSettings,
        covers: CoverUrls,
    ) -> Self {
        Self {
            store,
            normalizer,
            settings,
            covers,
        }
    }

    pub fn store(&self) -> &Arc<dyn TranscriptionStore> {
        &self.store
    }

    /// Runs `query` and returns the matching songs, each with up to three clips.
    ///
    /// Songs are ordered by the relevance of their first matched line.
    pub fn search(&self, query: &str) -> Result<SearchOutcome> {
        let query = self.normalizer.normalize(query.trim());
        if query.trim().is_empty() {
            return Ok(SearchOutcome {
                query,
                songs: Vec::new(),
            });
        }

        if let Err(err) = self.store.add_query_history(&query) {
            warn!("Failed to record query {:?}: {:#}", query, err);
        }

        let matched_ids =
            self.store
                .search_lines(&query, self.settings.min_match_ratio, self.settings.max_matches)?;
        debug!("Query {:?} matched {} lines", query, matched_ids.len());

        let groups = self.store.matched_spans_by_song(&matched_ids)?;
        let songs: Vec<SongMatch> = groups
            .into_iter()
            .filter_map(|group| self.song_match(group))
            .collect();
        let songs = reorder(self.store.as_ref(), &matched_ids, songs);

        for song in &songs {
            if let Err(err) = self.store.add_song_history(song.song_id) {
                warn!("Failed to record song {}: {:#}", song.song_id, err);
            }
        }

        info!("Query {:?} found {} songs", query, songs.len());
        Ok(SearchOutcome { query, songs })
    }

    fn song_match(&self, group: SongSpans) -> Option<SongMatch> {
        let selected = select_clips(&group.spans);
        if selected.is_empty() {
            return None;
        }

        let clips = selected
            .iter()
            .map(|span| Clip {
                start: span.start_ms,
                end: span.end_ms,
                lyrics: assemble(self.store.as_ref(), group.song_id, span.line_id),
            })
            .collect();
        let info = match pack_song_info(self.store.as_ref(), group.song_id, &self.covers) {
            Ok(info) => info,
            Err(err) => {
                warn!("Failed to load info of song {}: {:#}", group.song_id, err);
                None
            }
        };

        Some(SongMatch {
            song_id: group.song_id,
            album_id: group.album_id,
            audio_ref: group.audio_ref,
            chunks: selected.iter().map(|span| span.interval()).collect(),
            clips,
            info,
        })
    }

    /// Song info with its full timed lyrics, `None` for an unknown song.
    pub fn song_details(&self, song_id: i64) -> Result<Option<SongDetails>> {
        let Some(info) = pack_song_info(self.store.as_ref(), song_id, &self.covers)? else {
            return Ok(None);
        };
        let lyrics = timed_lyrics(self.store.as_ref(), song_id)?;
        Ok(Some(SongDetails { info, lyrics }))
    }

    pub fn popular_queries(&self, limit: usize) -> Result<Vec<PopularQuery>> {
        self.store.popular_queries(limit)
    }

    /// Most returned songs; songs deleted since are left out.
    pub fn popular_songs(&self, limit: usize) -> Result<Vec<PopularSongInfo>> {
        let mut popular = Vec::new();
        for entry in self.store.popular_songs(limit)? {
            if let Some(info) = pack_song_info(self.store.as_ref(), entry.song_id, &self.covers)? {
                popular.push(PopularSongInfo {
                    count: entry.count,
                    info,
                });
            }
        }
        Ok(popular)
    }

    /// A page of the catalog ordered by title. Pages start at 1.
    pub fn list_songs(&self, page: usize, page_size: usize) -> Result<Vec<SongInfo>> {
        let offset = page
            .saturating_sub(1)
            .checked_mul(page_size)
            .ok_or_else(|| anyhow!("Page {} of size {} is out of range", page, page_size))?;
        self.store
            .list_songs(offset, page_size)?
            .into_iter()
            .map(|song| pack_song(self.store.as_ref(), song, &self.covers))
            .collect()
    }
}
