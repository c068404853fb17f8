//! End-to-end tests for clip search
//!
//! Each test imports the fixture catalog into a fresh database file and
//! queries it through `ClipSearch`.

mod common;

use cherrypick_lyrics::clips::{Interval, SongResolver};
use cherrypick_lyrics::search::{QueryNormalizer, SearchSettings};
use cherrypick_lyrics::transcription_store::{SqliteTranscriptionStore, TranscriptionStore};
use common::*;
use std::collections::HashMap;

fn interval(start_ms: i64, end_ms: i64) -> Interval {
    Interval { start_ms, end_ms }
}

// =============================================================================
// Clip Building
// =============================================================================

#[test]
fn test_short_matches_are_padded_into_clips() {
    let catalog = TestCatalog::create().unwrap();
    let outcome = catalog.search().search("night has come").unwrap();

    assert_eq!(outcome.songs.len(), 1);
    let song = &outcome.songs[0];
    assert_eq!(song.song_id, SONG_1_ID);
    assert_eq!(song.album_id, Some(ALBUM_1_ID));
    assert_eq!(song.audio_ref.as_deref(), Some("audio/1.mp3"));
    assert_eq!(
        song.chunks,
        vec![interval(-4000, 8000), interval(12000, 24000)]
    );

    let lyrics: Vec<Vec<&str>> = song
        .clips
        .iter()
        .map(|clip| clip.lyrics.iter().map(String::as_str).collect())
        .collect();
    assert_eq!(
        lyrics,
        vec![
            vec!["When the night has come", "And the land is dark"],
            vec!["And the moon is the only light we see", "night has come again"],
        ]
    );
}

#[test]
fn test_long_match_is_the_only_clip() {
    let catalog = TestCatalog::create().unwrap();
    let outcome = catalog.search().search("night deep").unwrap();

    assert_eq!(outcome.songs.len(), 1);
    let song = &outcome.songs[0];
    assert_eq!(song.song_id, SONG_2_ID);
    assert_eq!(song.chunks, vec![interval(0, 25000)]);
    assert_eq!(
        song.clips[0].lyrics,
        vec!["the night is long and the night is deep".to_string()]
    );
}

#[test]
fn test_long_lyric_lines_are_wrapped() {
    let catalog = TestCatalog::create().unwrap();
    let outcome = catalog.search().search("quiet river").unwrap();

    assert_eq!(outcome.songs.len(), 1);
    let song = &outcome.songs[0];
    assert_eq!(song.song_id, SONG_3_ID);
    assert_eq!(song.chunks, vec![interval(5000, 12000)]);
    assert_eq!(
        song.clips[0].lyrics,
        vec![
            "Sun goes down".to_string(),
            "Over the quiet river".to_string(),
            "And the city wakes up in neon".to_string(),
        ]
    );
}

#[test]
fn test_section_markers_never_show_up_in_lyrics() {
    let catalog = TestCatalog::create().unwrap();
    let outcome = catalog.search().search("moon").unwrap();

    let clip_lyrics = &outcome.songs[0].clips[0].lyrics;
    assert_eq!(
        clip_lyrics,
        &vec![
            "And the moon is the only light we see".to_string(),
            "night has come again".to_string(),
        ]
    );
    assert!(clip_lyrics.iter().all(|row| !row.contains("Chorus")));
}

// =============================================================================
// Matching and Ordering
// =============================================================================

#[test]
fn test_songs_follow_the_order_of_matched_lines() {
    let catalog = TestCatalog::create().unwrap();
    let outcome = catalog.search().search("night").unwrap();

    let matched = catalog.store.search_lines("night", 1.0, 1000).unwrap();
    let mut expected: Vec<i64> = Vec::new();
    for line_id in matched {
        let song_id = catalog.store.song_id_for_line(line_id).unwrap().unwrap();
        if !expected.contains(&song_id) {
            expected.push(song_id);
        }
    }

    let found: Vec<i64> = outcome.songs.iter().map(|s| s.song_id).collect();
    assert_eq!(found.len(), 2);
    assert_eq!(found, expected);
}

#[test]
fn test_partial_word_quorum() {
    let catalog = TestCatalog::create().unwrap();

    let strict = catalog.search().search("night come deep").unwrap();
    assert!(strict.songs.is_empty());

    let relaxed = catalog
        .search_with(
            QueryNormalizer::empty(),
            SearchSettings {
                min_match_ratio: 0.5,
                max_matches: 100,
            },
        )
        .search("night come deep")
        .unwrap();
    let mut found: Vec<i64> = relaxed.songs.iter().map(|s| s.song_id).collect();
    found.sort();
    assert_eq!(found, vec![SONG_1_ID, SONG_2_ID]);
}

#[test]
fn test_transliterated_query() {
    let catalog = TestCatalog::create().unwrap();
    let normalizer = QueryNormalizer::new(
        HashMap::from([("rivver".to_string(), "river".to_string())]),
        0.7,
    );
    let outcome = catalog
        .search_with(normalizer, SearchSettings::default())
        .search("rivver")
        .unwrap();
    assert_eq!(outcome.query, "river");
    assert_eq!(outcome.songs[0].song_id, SONG_3_ID);
}

// =============================================================================
// Song Info and History
// =============================================================================

#[test]
fn test_results_carry_song_info() {
    let catalog = TestCatalog::create().unwrap();
    let outcome = catalog.search().search("night").unwrap();

    for song in &outcome.songs {
        let info = song.info.as_ref().unwrap();
        match song.song_id {
            SONG_1_ID => {
                assert_eq!(info.title, SONG_1_TITLE);
                assert_eq!(info.album.name, ALBUM_1_TITLE);
                assert_eq!(
                    info.album.cover_url,
                    format!("https://zsong.ru/api/v2/cover?path={}", ALBUM_1_COVER_ID)
                );
            }
            SONG_2_ID => {
                assert_eq!(info.title, SONG_2_TITLE);
                assert_eq!(info.album.id, 0);
                assert_eq!(info.album.cover_url, "https://zsong.ru/static/no_cover_3.png");
            }
            other => panic!("unexpected song {}", other),
        }
    }
}

#[test]
fn test_history_survives_reopening_the_database() {
    let catalog = TestCatalog::create().unwrap();
    {
        let search = catalog.search();
        search.search("night").unwrap();
        search.search("night").unwrap();
        search.search("quiet river").unwrap();
    }

    let reopened = SqliteTranscriptionStore::new(&catalog.db_path).unwrap();
    let queries = reopened.popular_queries(10).unwrap();
    assert_eq!(queries[0].query, "night");
    assert_eq!(queries[0].count, 2);
    assert_eq!(queries[1].query, "quiet river");

    let songs = catalog.search().popular_songs(10).unwrap();
    let counts: HashMap<i64, i64> = songs.iter().map(|s| (s.info.id, s.count)).collect();
    assert_eq!(counts[&SONG_1_ID], 2);
    assert_eq!(counts[&SONG_2_ID], 2);
    assert_eq!(counts[&SONG_3_ID], 1);
}

#[test]
fn test_song_details() {
    let catalog = TestCatalog::create().unwrap();
    let details = catalog.search().song_details(SONG_1_ID).unwrap().unwrap();

    assert_eq!(details.info.title, SONG_1_TITLE);
    let starts: Vec<i64> = details.lyrics.iter().map(|t| t.start_ms).collect();
    assert_eq!(starts, vec![0, 4000, 12000, 16000]);

    let json = serde_json::to_value(&details).unwrap();
    assert_eq!(json["title"], SONG_1_TITLE);
    assert_eq!(json["lyrics"][0]["phrase"], "When the night has come");
}
