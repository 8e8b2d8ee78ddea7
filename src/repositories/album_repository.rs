// src/repositories/album_repository.rs

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::domain::album::Album;
use crate::error::AppResult;
use crate::repositories::mapping::{
    format_timestamp, get_optional_timestamp, get_optional_uuid, get_timestamp, get_uuid,
};

pub trait AlbumRepository {
    fn save(&self, album: &Album) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Album>>;
    fn delete(&self, id: Uuid) -> AppResult<bool>;
}

pub struct SqliteAlbumRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteAlbumRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn row_to_album(row: &Row) -> rusqlite::Result<Album> {
        Ok(Album {
            id: get_uuid(row, "id")?,
            user_id: get_uuid(row, "user_id")?,
            title: row.get("title")?,
            artist_id: get_optional_uuid(row, "artist_id")?,
            release_date: get_optional_timestamp(row, "release_date")?,
            created_at: get_timestamp(row, "created_at")?,
            updated_at: get_timestamp(row, "updated_at")?,
        })
    }
}

impl AlbumRepository for SqliteAlbumRepository<'_> {
    fn save(&self, album: &Album) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO albums (id, user_id, title, artist_id, release_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                artist_id = excluded.artist_id,
                release_date = excluded.release_date,
                updated_at = excluded.updated_at",
            params![
                album.id.to_string(),
                album.user_id.to_string(),
                album.title,
                album.artist_id.map(|id| id.to_string()),
                album.release_date.as_ref().map(format_timestamp),
                format_timestamp(&album.created_at),
                format_timestamp(&album.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Album>> {
        let album = self
            .conn
            .query_row(
                "SELECT id, user_id, title, artist_id, release_date, created_at, updated_at
                 FROM albums WHERE id = ?1",
                params![id.to_string()],
                Self::row_to_album,
            )
            .optional()?;
        Ok(album)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM albums WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }
}
