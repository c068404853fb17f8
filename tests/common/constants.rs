//! Shared constants for end-to-end tests
//!
//! When the test catalog changes, update only this file and the fixture JSON.

// ============================================================================
// Test Catalog IDs
// ============================================================================

/// Album "Night Songs", has a cover
pub const ALBUM_1_ID: i64 = 1;

/// "Night Falls" by The Test Band, on Night Songs
pub const SONG_1_ID: i64 = 1;

/// "Long Night" by Jazz Ensemble, no album
pub const SONG_2_ID: i64 = 2;

/// "Daylight" by The Test Band, on Night Songs
pub const SONG_3_ID: i64 = 3;

// ============================================================================
// Test Catalog Texts
// ============================================================================

pub const ALBUM_1_TITLE: &str = "Night Songs";
pub const ALBUM_1_COVER_ID: &str = "covers/night.jpg";
pub const SONG_1_TITLE: &str = "Night Falls";
pub const SONG_2_TITLE: &str = "Long Night";
pub const SONG_3_TITLE: &str = "Daylight";

pub const TOTAL_SONGS: usize = 3;
pub const TOTAL_LINES: usize = 9;
