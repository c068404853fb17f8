//! Builds the lyric rows shown next to a clip.
//!
//! A clip is represented by one transcription line; the rows come from that
//! line and its direct neighbors, wrapped when they are too long.

use super::line_wrapper::{wrap, LONG_LINE_CHARS};
use super::lookup::LineLookup;
use super::models::is_displayable_phrase;
use tracing::warn;

pub const MAX_LYRIC_ROWS: usize = 3;

/// Returns at most [`MAX_LYRIC_ROWS`] display rows around `line_id`.
///
/// A failed lookup is logged and yields no rows, the clip is then shown
/// without lyrics.
pub fn assemble<L: LineLookup + ?Sized>(lookup: &L, song_id: i64, line_id: i64) -> Vec<String> {
    let lines = match lookup.lines_around(song_id, line_id) {
        Ok(lines) => lines,
        Err(e) => {
            warn!(
                "Failed to fetch lyrics around line {} of song {}: {:#}",
                line_id, song_id, e
            );
            return Vec::new();
        }
    };

    let phrases: Vec<String> = lines
        .into_iter()
        .filter_map(|line| line.phrase)
        .map(|phrase| phrase.trim().to_string())
        .filter(|phrase| is_displayable_phrase(phrase))
        .collect();

    let mut rows: Vec<String> = Vec::with_capacity(MAX_LYRIC_ROWS);
    // counter is 1-based over the lines that survived filtering
    for (counter, phrase) in (1..).zip(phrases) {
        if rows.len() >= MAX_LYRIC_ROWS {
            break;
        }
        if phrase.chars().count() < LONG_LINE_CHARS {
            rows.push(phrase);
            continue;
        }

        let mut wrapped = wrap(&phrase);
        if wrapped.len() >= MAX_LYRIC_ROWS && counter == 2 {
            wrapped.truncate(MAX_LYRIC_ROWS);
            return wrapped;
        }
        match counter {
            1 => rows.extend(wrapped.pop()),
            2 => rows.extend(wrapped.into_iter().take(2)),
            _ => rows.extend(wrapped.into_iter().next()),
        }
    }

    rows.truncate(MAX_LYRIC_ROWS);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clips::TranscriptionLine;
    use anyhow::{bail, Result};

    struct FakeLines {
        lines: Vec<TranscriptionLine>,
    }

    impl FakeLines {
        fn new(phrases: &[(i64, Option<&str>)]) -> Self {
            Self {
                lines: phrases
                    .iter()
                    .map(|(id, phrase)| TranscriptionLine {
                        id: *id,
                        song_id: 1,
                        start_ms: id * 1000,
                        end_ms: id * 1000 + 900,
                        phrase: phrase.map(|p| p.to_string()),
                    })
                    .collect(),
            }
        }
    }

    impl LineLookup for FakeLines {
        fn lines_around(&self, song_id: i64, line_id: i64) -> Result<Vec<TranscriptionLine>> {
            Ok(self
                .lines
                .iter()
                .filter(|l| l.song_id == song_id && (l.id - line_id).abs() <= 1)
                .cloned()
                .collect())
        }
    }

    struct BrokenLookup;

    impl LineLookup for BrokenLookup {
        fn lines_around(&self, _song_id: i64, _line_id: i64) -> Result<Vec<TranscriptionLine>> {
            bail!("database is gone")
        }
    }

    const LONG_THREE_ROWS: &str =
        "When the night has come And the land is dark And the moon is the only light we see";
    const LONG_TWO_ROWS: &str =
        "Yesterday all my troubles seemed so far away now it looks as though they are here to stay";

    #[test]
    fn test_short_neighbors_are_kept_verbatim() {
        let lookup = FakeLines::new(&[
            (1, Some("first line")),
            (2, Some("second line")),
            (3, Some("third line")),
            (4, Some("fourth line")),
        ]);
        assert_eq!(
            assemble(&lookup, 1, 2),
            vec!["first line", "second line", "third line"]
        );
        assert_eq!(
            assemble(&lookup, 1, 4),
            vec!["third line", "fourth line"]
        );
    }

    #[test]
    fn test_blank_and_chorus_lines_are_dropped() {
        let lookup = FakeLines::new(&[
            (1, Some("[Chorus]")),
            (2, None),
            (3, Some("  ")),
            (4, Some("still here")),
        ]);
        assert!(assemble(&lookup, 1, 2).is_empty());
        assert_eq!(assemble(&lookup, 1, 3), vec!["still here"]);
    }

    #[test]
    fn test_long_middle_line_short_circuits() {
        let lookup = FakeLines::new(&[
            (1, Some("before")),
            (2, Some(LONG_THREE_ROWS)),
            (3, Some("after")),
        ]);
        assert_eq!(
            assemble(&lookup, 1, 2),
            vec![
                "When the night has come",
                "And the land is dark",
                "And the moon is the only light we see"
            ]
        );
    }

    #[test]
    fn test_long_lines_contribute_by_position() {
        let lookup = FakeLines::new(&[
            (1, Some(LONG_TWO_ROWS)),
            (2, Some(LONG_TWO_ROWS)),
            (3, Some(LONG_TWO_ROWS)),
        ]);
        // first line gives its last row, second gives two rows, then we are full
        assert_eq!(
            assemble(&lookup, 1, 2),
            vec![
                "now it looks as though they are here to stay",
                "Yesterday all my troubles seemed so far away",
                "now it looks as though they are here to stay",
            ]
        );
    }

    #[test]
    fn test_third_long_line_gives_its_first_row() {
        let lookup = FakeLines::new(&[
            (1, Some("one")),
            (2, Some("two")),
            (3, Some(LONG_THREE_ROWS)),
        ]);
        assert_eq!(
            assemble(&lookup, 1, 2),
            vec!["one", "two", "When the night has come"]
        );
    }

    #[test]
    fn test_counter_runs_over_filtered_lines() {
        // the chorus marker is dropped, so the long line becomes the first line
        let lookup = FakeLines::new(&[
            (1, Some("Chorus:")),
            (2, Some(LONG_THREE_ROWS)),
            (3, Some("after")),
        ]);
        assert_eq!(
            assemble(&lookup, 1, 2),
            vec!["And the moon is the only light we see", "after"]
        );
    }

    #[test]
    fn test_lookup_failure_yields_no_rows() {
        assert!(assemble(&BrokenLookup, 1, 2).is_empty());
    }
}
