use super::models::{Album, PopularQuery, PopularSong, Song, SongRecord, SongSpans};
use super::schema::{SEARCH_INDEX_SQL, TRANSCRIPTION_VERSIONED_SCHEMAS};
use super::TranscriptionStore;
use crate::clips::{LineLookup, MatchedSpan, SongResolver, TranscriptionLine};
use crate::search::word_tokens;
use crate::sqlite_persistence::open_versioned;
use anyhow::{anyhow, Context, Result};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

pub struct SqliteTranscriptionStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTranscriptionStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        info!("Opening transcription database at {:?}", path);
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open transcription database {:?}", path))?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON;", [])?;
        open_versioned(&mut conn, TRANSCRIPTION_VERSIONED_SCHEMAS, "transcription")?;
        conn.execute_batch(SEARCH_INDEX_SQL)
            .context("Failed to create the full-text search index")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("transcription database lock poisoned"))
    }

    fn row_to_line(row: &rusqlite::Row) -> rusqlite::Result<TranscriptionLine> {
        Ok(TranscriptionLine {
            id: row.get("id")?,
            song_id: row.get("song_id")?,
            start_ms: row.get("start_ms")?,
            end_ms: row.get("end_ms")?,
            phrase: row.get("phrase")?,
        })
    }

    fn row_to_song(row: &rusqlite::Row) -> rusqlite::Result<Song> {
        Ok(Song {
            id: row.get("id")?,
            author: row.get("author")?,
            title: row.get("title")?,
            album_id: row.get("album_id")?,
            audio_ref: row.get("audio_ref")?,
        })
    }

    /// Builds an FTS5 query matching any of the words.
    fn fts_query(tokens: &[String]) -> String {
        tokens
            .iter()
            .map(|token| format!("\"{}\"", token.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    /// SQLite reads negative limits as "no limit", so large values saturate.
    fn sql_count(n: usize) -> i64 {
        i64::try_from(n).unwrap_or(i64::MAX)
    }

    fn required_matches(min_match_ratio: f64, token_count: usize) -> usize {
        let ratio = min_match_ratio.clamp(0.0, 1.0);
        ((ratio * token_count as f64).ceil() as usize).clamp(1, token_count)
    }
}

impl LineLookup for SqliteTranscriptionStore {
    fn lines_around(&self, song_id: i64, line_id: i64) -> Result<Vec<TranscriptionLine>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, song_id, start_ms, end_ms, phrase FROM transcription
             WHERE song_id = ?1 AND id IN (?2, ?3, ?4)
             ORDER BY id",
        )?;
        let lines = stmt
            .query_map(
                params![song_id, line_id - 1, line_id, line_id + 1],
                Self::row_to_line,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lines)
    }
}

impl SongResolver for SqliteTranscriptionStore {
    fn song_id_for_line(&self, line_id: i64) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let song_id = conn
            .query_row(
                "SELECT song_id FROM transcription WHERE id = ?1",
                params![line_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(song_id)
    }
}

impl TranscriptionStore for SqliteTranscriptionStore {
    fn lines_for_song(&self, song_id: i64) -> Result<Vec<TranscriptionLine>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, song_id, start_ms, end_ms, phrase FROM transcription
             WHERE song_id = ?1
             ORDER BY start_ms, id",
        )?;
        let lines = stmt
            .query_map(params![song_id], Self::row_to_line)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lines)
    }

    fn search_lines(&self, query: &str, min_match_ratio: f64, limit: usize) -> Result<Vec<i64>> {
        let tokens = word_tokens(query);
        if tokens.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let required = Self::required_matches(min_match_ratio, tokens.len());

        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT line_id, phrase FROM transcription_search
             WHERE transcription_search MATCH ?1
             ORDER BY bm25(transcription_search)",
        )?;
        let rows = stmt.query_map(params![Self::fts_query(&tokens)], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut matched = Vec::new();
        for row in rows {
            let (line_id, phrase) = row?;
            let phrase_tokens = word_tokens(&phrase);
            let hits = tokens
                .iter()
                .filter(|token| phrase_tokens.contains(token))
                .count();
            if hits >= required {
                matched.push(line_id);
                if matched.len() >= limit {
                    break;
                }
            }
        }
        debug!(
            "Query {:?} matched {} lines (needing {} of {} words)",
            query,
            matched.len(),
            required,
            tokens.len()
        );
        Ok(matched)
    }

    fn matched_spans_by_song(&self, line_ids: &[i64]) -> Result<Vec<SongSpans>> {
        if line_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; line_ids.len()].join(",");
        let sql = format!(
            "SELECT t.song_id, s.album_id, s.audio_ref, t.start_ms, t.end_ms, t.id
             FROM transcription AS t
             JOIN songs AS s ON s.id = t.song_id
             WHERE t.id IN ({})
             ORDER BY t.song_id, t.id",
            placeholders
        );

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(line_ids.iter()), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<i64>>(1)?,
                row.get::<_, Option<String>>(2)?,
                MatchedSpan::new(row.get(3)?, row.get(4)?, row.get(5)?),
            ))
        })?;

        let mut grouped: Vec<SongSpans> = Vec::new();
        for row in rows {
            let (song_id, album_id, audio_ref, span) = row?;
            if let Some(group) = grouped.last_mut().filter(|g| g.song_id == song_id) {
                group.spans.push(span);
                continue;
            }
            grouped.push(SongSpans {
                song_id,
                album_id,
                audio_ref,
                spans: vec![span],
            });
        }
        Ok(grouped)
    }

    fn get_song(&self, song_id: i64) -> Result<Option<Song>> {
        let conn = self.conn()?;
        let song = conn
            .query_row(
                "SELECT id, author, title, album_id, audio_ref FROM songs WHERE id = ?1",
                params![song_id],
                Self::row_to_song,
            )
            .optional()?;
        Ok(song)
    }

    fn get_album(&self, album_id: i64) -> Result<Option<Album>> {
        let conn = self.conn()?;
        let album = conn
            .query_row(
                "SELECT id, title, cover_id, year FROM albums WHERE id = ?1",
                params![album_id],
                |row| {
                    Ok(Album {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        cover_id: row.get(2)?,
                        year: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(album)
    }

    fn list_songs(&self, offset: usize, limit: usize) -> Result<Vec<Song>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, author, title, album_id, audio_ref FROM songs
             ORDER BY title, id
             LIMIT ?1 OFFSET ?2",
        )?;
        let songs = stmt
            .query_map(
                params![Self::sql_count(limit), Self::sql_count(offset)],
                Self::row_to_song,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(songs)
    }

    fn get_songs_count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn import_song(&self, record: &SongRecord) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let song = &record.song;

        if let Some(album) = &record.album {
            tx.execute(
                "INSERT INTO albums (id, title, cover_id, year) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title, cover_id = excluded.cover_id, year = excluded.year",
                params![album.id, album.title, album.cover_id, album.year],
            )?;
        }

        // drop what a previous import of this song left behind
        tx.execute(
            "DELETE FROM transcription_search
             WHERE line_id IN (SELECT id FROM transcription WHERE song_id = ?1)",
            params![song.id],
        )?;
        tx.execute(
            "DELETE FROM transcription WHERE song_id = ?1",
            params![song.id],
        )?;

        tx.execute(
            "INSERT INTO songs (id, author, title, album_id, audio_ref) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                author = excluded.author, title = excluded.title,
                album_id = excluded.album_id, audio_ref = excluded.audio_ref",
            params![song.id, song.author, song.title, song.album_id, song.audio_ref],
        )
        .with_context(|| format!("Failed to store song {}", song.id))?;

        {
            let mut insert_line = tx.prepare(
                "INSERT INTO transcription (id, song_id, start_ms, end_ms, phrase)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            let mut insert_search =
                tx.prepare("INSERT INTO transcription_search (line_id, phrase) VALUES (?1, ?2)")?;
            for line in &record.lines {
                insert_line
                    .execute(params![
                        line.id,
                        song.id,
                        line.start_ms,
                        line.end_ms,
                        line.phrase
                    ])
                    .with_context(|| {
                        format!("Failed to store line {} of song {}", line.id, song.id)
                    })?;
                if let Some(phrase) = line.phrase.as_deref().filter(|p| !p.trim().is_empty()) {
                    insert_search.execute(params![line.id, phrase])?;
                }
            }
        }

        tx.commit()?;
        debug!(
            "Stored song {} with {} lines",
            song.id,
            record.lines.len()
        );
        Ok(())
    }

    fn rebuild_search_index(&self) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM transcription_search", [])?;
        let indexed = tx.execute(
            "INSERT INTO transcription_search (line_id, phrase)
             SELECT id, phrase FROM transcription
             WHERE phrase IS NOT NULL AND trim(phrase) != ''",
            [],
        )?;
        tx.commit()?;
        info!("Search index rebuilt with {} lines", indexed);
        Ok(indexed)
    }

    fn add_query_history(&self, query: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO query_history (query) VALUES (?1)",
            params![query],
        )?;
        Ok(())
    }

    fn add_song_history(&self, song_id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO song_history (song_id) VALUES (?1)",
            params![song_id],
        )?;
        Ok(())
    }

    fn popular_queries(&self, limit: usize) -> Result<Vec<PopularQuery>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT query, COUNT(*) AS hits FROM query_history
             GROUP BY query
             ORDER BY hits DESC, query
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![Self::sql_count(limit)], |row| {
                Ok(PopularQuery {
                    query: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn popular_songs(&self, limit: usize) -> Result<Vec<PopularSong>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT song_id, COUNT(*) AS hits FROM song_history
             GROUP BY song_id
             ORDER BY hits DESC, song_id
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![Self::sql_count(limit)], |row| {
                Ok(PopularSong {
                    song_id: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}
