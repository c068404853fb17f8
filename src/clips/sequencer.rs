//! Puts per-song results back into the order their songs were first matched.

use super::lookup::SongResolver;
use tracing::{debug, warn};

/// Anything that can be matched against a song id.
pub trait SongKeyed {
    fn song_key(&self) -> String;
}

/// Reorders `results` so songs appear in the order their lines show up in
/// `matched_line_ids`.
///
/// The ordering is a relevance hint only. If a line cannot be resolved, or the
/// reordered list does not account for every result, `results` is returned as is.
pub fn reorder<S, R>(resolver: &S, matched_line_ids: &[i64], results: Vec<R>) -> Vec<R>
where
    S: SongResolver + ?Sized,
    R: SongKeyed,
{
    let keys: Vec<String> = results.iter().map(|r| r.song_key()).collect();
    let mut seen_songs: Vec<String> = Vec::new();
    let mut order: Vec<usize> = Vec::with_capacity(results.len());

    for line_id in matched_line_ids {
        let song_id = match resolver.song_id_for_line(*line_id) {
            Ok(Some(song_id)) => song_id.to_string(),
            Ok(None) => {
                debug!("Line {} has no song, keeping original order", line_id);
                return results;
            }
            Err(e) => {
                warn!("Failed to resolve song of line {}: {:#}", line_id, e);
                return results;
            }
        };
        if seen_songs.contains(&song_id) {
            continue;
        }
        order.extend(
            keys.iter()
                .enumerate()
                .filter(|(_, key)| **key == song_id)
                .map(|(index, _)| index),
        );
        seen_songs.push(song_id);
    }

    if order.len() != results.len() {
        debug!(
            "Reordering covered {} of {} results, keeping original order",
            order.len(),
            results.len()
        );
        return results;
    }

    let mut slots: Vec<Option<R>> = results.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}
