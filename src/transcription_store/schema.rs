//! SQLite schema of the transcription database.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};

// =============================================================================
// Version 1 - Catalog and transcription lines
// =============================================================================

const ALBUMS_TABLE_V1: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("cover_id", &SqlType::Text),
        sqlite_column!("year", &SqlType::Integer),
    ],
    indices: &[],
};

const SONG_ALBUM_FK: ForeignKey = ForeignKey {
    foreign_table: "albums",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::SetNull,
};

const SONGS_TABLE_V1: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("author", &SqlType::Text, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!(
            "album_id",
            &SqlType::Integer,
            foreign_key = Some(&SONG_ALBUM_FK)
        ),
        sqlite_column!("audio_ref", &SqlType::Text),
    ],
    indices: &[("idx_songs_title", "title")],
};

const LINE_SONG_FK: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const TRANSCRIPTION_TABLE_V1: Table = Table {
    name: "transcription",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&LINE_SONG_FK)
        ),
        sqlite_column!("start_ms", &SqlType::Integer, non_null = true),
        sqlite_column!("end_ms", &SqlType::Integer, non_null = true),
        sqlite_column!("phrase", &SqlType::Text),
    ],
    indices: &[
        ("idx_transcription_song_id", "song_id"),
        ("idx_transcription_song_start", "song_id, start_ms"),
    ],
};

// =============================================================================
// Version 2 - Query and song history
// =============================================================================

const QUERY_HISTORY_TABLE_V2: Table = Table {
    name: "query_history",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("query", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_query_history_query", "query")],
};

const SONG_HISTORY_TABLE_V2: Table = Table {
    name: "song_history",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("song_id", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_song_history_song_id", "song_id")],
};

fn migrate_v1_to_v2(conn: &rusqlite::Connection) -> anyhow::Result<()> {
    QUERY_HISTORY_TABLE_V2.create(conn)?;
    SONG_HISTORY_TABLE_V2.create(conn)?;
    Ok(())
}

pub const TRANSCRIPTION_VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 1,
        tables: &[ALBUMS_TABLE_V1, SONGS_TABLE_V1, TRANSCRIPTION_TABLE_V1],
        migration: None,
    },
    VersionedSchema {
        version: 2,
        tables: &[
            ALBUMS_TABLE_V1,
            SONGS_TABLE_V1,
            TRANSCRIPTION_TABLE_V1,
            QUERY_HISTORY_TABLE_V2,
            SONG_HISTORY_TABLE_V2,
        ],
        migration: Some(migrate_v1_to_v2),
    },
];

/// Full-text index over transcription phrases, kept outside the versioned
/// tables and rebuilt on demand.
pub const SEARCH_INDEX_SQL: &str = r#"
    CREATE VIRTUAL TABLE IF NOT EXISTS transcription_search USING fts5(
        line_id UNINDEXED,
        phrase,
        tokenize='unicode61'
    );
"#;
