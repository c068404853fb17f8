mod interval_merger;
mod line_wrapper;
mod lookup;
mod lyrics_assembler;
mod models;
mod sequencer;

pub use interval_merger::{
    select_clips, DEFINITIVE_SPAN_MS, MAX_CLIPS, MIN_PLAYABLE_MS, SHORT_SPAN_PADDING_MS,
};
pub use line_wrapper::{split_at_midpoint, wrap, LONG_LINE_CHARS};
pub use lookup::{LineLookup, SongResolver};
pub use lyrics_assembler::{assemble, MAX_LYRIC_ROWS};
pub use models::*;
pub use sequencer::{reorder, SongKeyed};
