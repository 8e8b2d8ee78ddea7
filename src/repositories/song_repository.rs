// src/repositories/song_repository.rs

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::domain::song::Song;
use crate::error::AppResult;
use crate::repositories::mapping::{
    format_timestamp, get_optional_timestamp, get_optional_u32, get_optional_uuid, get_timestamp,
    get_uuid, placeholders,
};

pub trait SongRepository {
    fn save(&self, song: &Song) -> AppResult<()>;

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Song>>;

    /// Songs among `ids` that exist, in no particular order
    fn list_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Song>>;

    /// Songs on an album, by track number
    fn list_by_album(&self, album_id: Uuid) -> AppResult<Vec<Song>>;

    /// Songs of an artist, by album then track number then title
    fn list_by_artist(&self, artist_id: Uuid) -> AppResult<Vec<Song>>;

    fn delete(&self, id: Uuid) -> AppResult<bool>;
}

const SONG_COLUMNS: &str = "id, user_id, title, artist_id, album_id, album_track_no,
    confidence, rehearsals, progress, last_time_played, created_at, updated_at";

pub struct SqliteSongRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteSongRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn row_to_song(row: &Row) -> rusqlite::Result<Song> {
        Ok(Song {
            id: get_uuid(row, "id")?,
            user_id: get_uuid(row, "user_id")?,
            title: row.get("title")?,
            artist_id: get_optional_uuid(row, "artist_id")?,
            album_id: get_optional_uuid(row, "album_id")?,
            album_track_no: get_optional_u32(row, "album_track_no")?,
            confidence: row.get("confidence")?,
            rehearsals: row.get("rehearsals")?,
            progress: row.get("progress")?,
            last_time_played: get_optional_timestamp(row, "last_time_played")?,
            created_at: get_timestamp(row, "created_at")?,
            updated_at: get_timestamp(row, "updated_at")?,
        })
    }

    fn list_where(&self, clause: &str, id: Uuid) -> AppResult<Vec<Song>> {
        let sql = format!("SELECT {} FROM songs WHERE {}", SONG_COLUMNS, clause);
        let mut stmt = self.conn.prepare(&sql)?;
        let songs = stmt
            .query_map(params![id.to_string()], Self::row_to_song)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(songs)
    }
}

impl SongRepository for SqliteSongRepository<'_> {
    fn save(&self, song: &Song) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO songs (
                id, user_id, title, artist_id, album_id, album_track_no,
                confidence, rehearsals, progress, last_time_played, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                artist_id = excluded.artist_id,
                album_id = excluded.album_id,
                album_track_no = excluded.album_track_no,
                confidence = excluded.confidence,
                rehearsals = excluded.rehearsals,
                progress = excluded.progress,
                last_time_played = excluded.last_time_played,
                updated_at = excluded.updated_at",
            params![
                song.id.to_string(),
                song.user_id.to_string(),
                song.title,
                song.artist_id.map(|id| id.to_string()),
                song.album_id.map(|id| id.to_string()),
                song.album_track_no.map(i64::from),
                song.confidence,
                song.rehearsals,
                song.progress,
                song.last_time_played.as_ref().map(format_timestamp),
                format_timestamp(&song.created_at),
                format_timestamp(&song.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Song>> {
        let sql = format!("SELECT {} FROM songs WHERE id = ?1", SONG_COLUMNS);
        let song = self
            .conn
            .query_row(&sql, params![id.to_string()], Self::row_to_song)
            .optional()?;
        Ok(song)
    }

    fn list_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Song>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM songs WHERE id IN ({})",
            SONG_COLUMNS,
            placeholders(ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let songs = stmt
            .query_map(
                params_from_iter(ids.iter().map(|id| id.to_string())),
                Self::row_to_song,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(songs)
    }

    fn list_by_album(&self, album_id: Uuid) -> AppResult<Vec<Song>> {
        self.list_where("album_id = ?1 ORDER BY album_track_no", album_id)
    }

    fn list_by_artist(&self, artist_id: Uuid) -> AppResult<Vec<Song>> {
        self.list_where(
            "artist_id = ?1 ORDER BY album_id IS NULL, album_id, album_track_no, title",
            artist_id,
        )
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM songs WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }
}
