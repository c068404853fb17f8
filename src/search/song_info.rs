use crate::clips::is_displayable_phrase;
use crate::transcription_store::{Album, Song, TranscriptionStore};
use anyhow::Result;
use serde::Serialize;

pub const DEFAULT_COVER_BASE_URL: &str = "https://zsong.ru/api/v2/cover";
pub const DEFAULT_NO_COVER_BASE_URL: &str = "https://zsong.ru/static/no_cover";

/// Number of placeholder covers served under the no-cover base URL.
const NO_COVER_VARIANTS: i64 = 6;

/// Where cover images are served from.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverUrls {
    pub cover_base_url: String,
    pub no_cover_base_url: String,
}

impl Default for CoverUrls {
    fn default() -> Self {
        Self {
            cover_base_url: DEFAULT_COVER_BASE_URL.to_string(),
            no_cover_base_url: DEFAULT_NO_COVER_BASE_URL.to_string(),
        }
    }
}

impl CoverUrls {
    pub fn cover_url(&self, cover_id: &str) -> String {
        format!("{}?path={}", self.cover_base_url, cover_id)
    }

    /// Placeholder picked deterministically from the song id.
    pub fn placeholder_url(&self, song_id: i64) -> String {
        format!(
            "{}_{}.png",
            self.no_cover_base_url,
            song_id.rem_euclid(NO_COVER_VARIANTS) + 1
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumCard {
    pub id: i64,
    pub name: String,
    pub year: Option<i64>,
    pub cover_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongInfo {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub album: AlbumCard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedPhrase {
    pub start_ms: i64,
    pub phrase: String,
}

fn album_card(album: Option<Album>, song_id: i64, covers: &CoverUrls) -> AlbumCard {
    match album {
        Some(album) => AlbumCard {
            id: album.id,
            cover_url: match &album.cover_id {
                Some(cover_id) => covers.cover_url(cover_id),
                None => covers.placeholder_url(song_id),
            },
            name: album.title,
            year: album.year,
        },
        None => AlbumCard {
            id: 0,
            name: String::new(),
            year: None,
            cover_url: covers.placeholder_url(song_id),
        },
    }
}

/// Display information for an already fetched song.
pub fn pack_song(
    store: &dyn TranscriptionStore,
    song: Song,
    covers: &CoverUrls,
) -> Result<SongInfo> {
    let album = match song.album_id {
        Some(album_id) => store.get_album(album_id)?,
        None => None,
    };
    Ok(SongInfo {
        album: album_card(album, song.id, covers),
        id: song.id,
        title: song.title,
        author: song.author,
    })
}

/// Display information for a song, `None` when the song does not exist.
pub fn pack_song_info(
    store: &dyn TranscriptionStore,
    song_id: i64,
    covers: &CoverUrls,
) -> Result<Option<SongInfo>> {
    match store.get_song(song_id)? {
        Some(song) => pack_song(store, song, covers).map(Some),
        None => Ok(None),
    }
}

/// The displayable lines of a song keyed by start time.
pub fn timed_lyrics(store: &dyn TranscriptionStore, song_id: i64) -> Result<Vec<TimedPhrase>> {
    let mut lines = store.lines_for_song(song_id)?;
    lines.sort_by_key(|line| line.start_ms);

    let mut timed: Vec<TimedPhrase> = Vec::with_capacity(lines.len());
    for line in lines {
        let Some(phrase) = line.phrase else { continue };
        if !is_displayable_phrase(&phrase) {
            continue;
        }
        // one phrase per start time, the later line replaces the earlier one
        if let Some(last) = timed.last_mut().filter(|t| t.start_ms == line.start_ms) {
            last.phrase = phrase;
            continue;
        }
        timed.push(TimedPhrase {
            start_ms: line.start_ms,
            phrase,
        });
    }
    Ok(timed)
}
