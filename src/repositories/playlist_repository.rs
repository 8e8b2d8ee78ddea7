// src/repositories/playlist_repository.rs

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::domain::playlist::{Playlist, PlaylistSong};
use crate::error::AppResult;
use crate::repositories::mapping::{format_timestamp, get_timestamp, get_u32, get_uuid};

pub trait PlaylistRepository {
    fn save(&self, playlist: &Playlist) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Playlist>>;
    fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Memberships of a playlist, by track number
    fn list_songs(&self, playlist_id: Uuid) -> AppResult<Vec<PlaylistSong>>;
    fn save_song(&self, membership: &PlaylistSong) -> AppResult<()>;
    fn delete_song(&self, membership_id: Uuid) -> AppResult<bool>;

    /// Playlists holding `song_id` at least once
    fn list_playlist_ids_for_song(&self, song_id: Uuid) -> AppResult<Vec<Uuid>>;
}

pub struct SqlitePlaylistRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqlitePlaylistRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn row_to_playlist(row: &Row) -> rusqlite::Result<Playlist> {
        Ok(Playlist {
            id: get_uuid(row, "id")?,
            user_id: get_uuid(row, "user_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            created_at: get_timestamp(row, "created_at")?,
            updated_at: get_timestamp(row, "updated_at")?,
        })
    }

    fn row_to_membership(row: &Row) -> rusqlite::Result<PlaylistSong> {
        Ok(PlaylistSong {
            id: get_uuid(row, "id")?,
            playlist_id: get_uuid(row, "playlist_id")?,
            song_id: get_uuid(row, "song_id")?,
            song_track_no: get_u32(row, "song_track_no")?,
            created_at: get_timestamp(row, "created_at")?,
        })
    }
}

impl PlaylistRepository for SqlitePlaylistRepository<'_> {
    fn save(&self, playlist: &Playlist) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO playlists (id, user_id, title, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                updated_at = excluded.updated_at",
            params![
                playlist.id.to_string(),
                playlist.user_id.to_string(),
                playlist.title,
                playlist.description,
                format_timestamp(&playlist.created_at),
                format_timestamp(&playlist.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Playlist>> {
        let playlist = self
            .conn
            .query_row(
                "SELECT id, user_id, title, description, created_at, updated_at
                 FROM playlists WHERE id = ?1",
                params![id.to_string()],
                Self::row_to_playlist,
            )
            .optional()?;
        Ok(playlist)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM playlists WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }

    fn list_songs(&self, playlist_id: Uuid) -> AppResult<Vec<PlaylistSong>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, playlist_id, song_id, song_track_no, created_at
             FROM playlist_songs WHERE playlist_id = ?1 ORDER BY song_track_no",
        )?;
        let memberships = stmt
            .query_map(params![playlist_id.to_string()], Self::row_to_membership)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(memberships)
    }

    fn save_song(&self, membership: &PlaylistSong) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO playlist_songs (id, playlist_id, song_id, song_track_no, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET song_track_no = excluded.song_track_no",
            params![
                membership.id.to_string(),
                membership.playlist_id.to_string(),
                membership.song_id.to_string(),
                i64::from(membership.song_track_no),
                format_timestamp(&membership.created_at),
            ],
        )?;
        Ok(())
    }

    fn delete_song(&self, membership_id: Uuid) -> AppResult<bool> {
        let affected = self.conn.execute(
            "DELETE FROM playlist_songs WHERE id = ?1",
            params![membership_id.to_string()],
        )?;
        Ok(affected > 0)
    }

    fn list_playlist_ids_for_song(&self, song_id: Uuid) -> AppResult<Vec<Uuid>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT playlist_id FROM playlist_songs WHERE song_id = ?1",
        )?;
        let ids = stmt
            .query_map(params![song_id.to_string()], |row| get_uuid(row, "playlist_id"))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}
