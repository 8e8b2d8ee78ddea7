// src/repositories/arrangement_repository.rs

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::domain::arrangement::SongArrangement;
use crate::error::AppResult;
use crate::repositories::mapping::{format_timestamp, get_timestamp, get_u32, get_uuid};

pub trait ArrangementRepository {
    fn save(&self, arrangement: &SongArrangement) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<SongArrangement>>;
    fn list_by_song(&self, song_id: Uuid) -> AppResult<Vec<SongArrangement>>;
    fn delete(&self, id: Uuid) -> AppResult<bool>;
}

pub struct SqliteArrangementRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteArrangementRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn row_to_arrangement(row: &Row) -> rusqlite::Result<SongArrangement> {
        Ok(SongArrangement {
            id: get_uuid(row, "id")?,
            song_id: get_uuid(row, "song_id")?,
            name: row.get("name")?,
            order: get_u32(row, "position")?,
            created_at: get_timestamp(row, "created_at")?,
        })
    }
}

impl ArrangementRepository for SqliteArrangementRepository<'_> {
    fn save(&self, arrangement: &SongArrangement) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO song_arrangements (id, song_id, name, position, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                position = excluded.position",
            params![
                arrangement.id.to_string(),
                arrangement.song_id.to_string(),
                arrangement.name,
                i64::from(arrangement.order),
                format_timestamp(&arrangement.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<SongArrangement>> {
        let arrangement = self
            .conn
            .query_row(
                "SELECT id, song_id, name, position, created_at
                 FROM song_arrangements WHERE id = ?1",
                params![id.to_string()],
                Self::row_to_arrangement,
            )
            .optional()?;
        Ok(arrangement)
    }

    fn list_by_song(&self, song_id: Uuid) -> AppResult<Vec<SongArrangement>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, song_id, name, position, created_at
             FROM song_arrangements WHERE song_id = ?1 ORDER BY position",
        )?;
        let arrangements = stmt
            .query_map(params![song_id.to_string()], Self::row_to_arrangement)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(arrangements)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let affected = self.conn.execute(
            "DELETE FROM song_arrangements WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(affected > 0)
    }
}
