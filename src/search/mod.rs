mod clip_search;
mod query_normalizer;
mod similarity;
mod song_info;
mod tokens;

pub use clip_search::{
    ClipSearch, PopularSongInfo, SearchOutcome, SearchSettings, SongDetails, SongMatch,
    DEFAULT_MAX_MATCHES, DEFAULT_MIN_MATCH_RATIO,
};
pub use query_normalizer::{QueryNormalizer, DEFAULT_TRANSLIT_CUTOFF};
pub use similarity::similarity_ratio;
pub use song_info::{
    pack_song_info, timed_lyrics, AlbumCard, CoverUrls, SongInfo, TimedPhrase,
    DEFAULT_COVER_BASE_URL, DEFAULT_NO_COVER_BASE_URL,
};
pub use tokens::word_tokens;
