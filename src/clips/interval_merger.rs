//! Picks the time spans of a song that are worth playing back.
//!
//! One long match wins outright. Otherwise the three longest matches are kept
//! and the short ones are padded so they still make a playable clip.

use super::models::MatchedSpan;
use tracing::debug;

/// A span longer than this is shown on its own.
pub const DEFINITIVE_SPAN_MS: i64 = 19_000;

/// Spans shorter than this get padded on both sides.
pub const MIN_PLAYABLE_MS: i64 = 6_000;

/// Padding added to each side of a short span.
pub const SHORT_SPAN_PADDING_MS: i64 = 4_000;

pub const MAX_CLIPS: usize = 3;

/// Selects up to [`MAX_CLIPS`] spans to play back, ordered by start time.
///
/// Padded spans may start before zero, clamping against the real audio
/// length is left to whoever cuts the audio.
pub fn select_clips(spans: &[MatchedSpan]) -> Vec<MatchedSpan> {
    let valid: Vec<MatchedSpan> = spans
        .iter()
        .filter(|span| {
            let keep = span.end_ms > span.start_ms;
            if !keep {
                debug!(
                    "Dropping degenerate span {}..{} of line {}",
                    span.start_ms, span.end_ms, span.line_id
                );
            }
            keep
        })
        .copied()
        .collect();

    if valid.is_empty() {
        return Vec::new();
    }

    if let Some(long_span) = valid
        .iter()
        .find(|span| span.duration_ms() > DEFINITIVE_SPAN_MS)
    {
        return vec![*long_span];
    }

    // sort_by_key is stable, equally long spans keep their input order
    let mut longest = valid;
    longest.sort_by_key(|span| span.start_ms - span.end_ms);
    longest.truncate(MAX_CLIPS);

    let mut selected: Vec<MatchedSpan> = longest
        .into_iter()
        .map(|span| {
            if span.duration_ms() < MIN_PLAYABLE_MS {
                MatchedSpan::new(
                    span.start_ms - SHORT_SPAN_PADDING_MS,
                    span.end_ms + SHORT_SPAN_PADDING_MS,
                    span.line_id,
                )
            } else {
                span
            }
        })
        .collect();

    selected.sort_by_key(|span| span.start_ms);
    selected
}
