// src/repositories/artist_repository.rs

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::domain::artist::{Artist, BandMember};
use crate::error::AppResult;
use crate::repositories::mapping::{format_timestamp, get_timestamp, get_u32, get_uuid, invalid_data};

pub trait ArtistRepository {
    fn save(&self, artist: &Artist) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Artist>>;
    fn delete(&self, id: Uuid) -> AppResult<bool>;

    fn save_band_member(&self, member: &BandMember) -> AppResult<()>;
    fn get_band_member(&self, id: Uuid) -> AppResult<Option<BandMember>>;
    /// Band members of an artist, by order
    fn list_band_members(&self, artist_id: Uuid) -> AppResult<Vec<BandMember>>;
    /// Band members of any artist holding the role
    fn list_band_members_with_role(&self, role_id: Uuid) -> AppResult<Vec<BandMember>>;
    fn delete_band_member(&self, id: Uuid) -> AppResult<bool>;
}

const MEMBER_COLUMNS: &str = "id, artist_id, name, role_ids, position, created_at";

pub struct SqliteArtistRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteArtistRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn row_to_artist(row: &Row) -> rusqlite::Result<Artist> {
        Ok(Artist {
            id: get_uuid(row, "id")?,
            user_id: get_uuid(row, "user_id")?,
            name: row.get("name")?,
            is_band: row.get("is_band")?,
            created_at: get_timestamp(row, "created_at")?,
            updated_at: get_timestamp(row, "updated_at")?,
        })
    }

    fn row_to_member(row: &Row) -> rusqlite::Result<BandMember> {
        let role_ids_json: String = row.get("role_ids")?;
        let role_ids: Vec<Uuid> = serde_json::from_str(&role_ids_json)
            .map_err(|e| invalid_data(row, "role_ids", format!("Invalid role ids: {}", e)))?;

        Ok(BandMember {
            id: get_uuid(row, "id")?,
            artist_id: get_uuid(row, "artist_id")?,
            name: row.get("name")?,
            role_ids,
            order: get_u32(row, "position")?,
            created_at: get_timestamp(row, "created_at")?,
        })
    }
}

impl ArtistRepository for SqliteArtistRepository<'_> {
    fn save(&self, artist: &Artist) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO artists (id, user_id, name, is_band, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                is_band = excluded.is_band,
                updated_at = excluded.updated_at",
            params![
                artist.id.to_string(),
                artist.user_id.to_string(),
                artist.name,
                artist.is_band,
                format_timestamp(&artist.created_at),
                format_timestamp(&artist.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Artist>> {
        let artist = self
            .conn
            .query_row(
                "SELECT id, user_id, name, is_band, created_at, updated_at
                 FROM artists WHERE id = ?1",
                params![id.to_string()],
                Self::row_to_artist,
            )
            .optional()?;
        Ok(artist)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM artists WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }

    fn save_band_member(&self, member: &BandMember) -> AppResult<()> {
        let role_ids_json = serde_json::to_string(&member.role_ids)?;

        self.conn.execute(
            "INSERT INTO band_members (id, artist_id, name, role_ids, position, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                role_ids = excluded.role_ids,
                position = excluded.position",
            params![
                member.id.to_string(),
                member.artist_id.to_string(),
                member.name,
                role_ids_json,
                i64::from(member.order),
                format_timestamp(&member.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_band_member(&self, id: Uuid) -> AppResult<Option<BandMember>> {
        let sql = format!("SELECT {} FROM band_members WHERE id = ?1", MEMBER_COLUMNS);
        let member = self
            .conn
            .query_row(&sql, params![id.to_string()], Self::row_to_member)
            .optional()?;
        Ok(member)
    }

    fn list_band_members(&self, artist_id: Uuid) -> AppResult<Vec<BandMember>> {
        let sql = format!(
            "SELECT {} FROM band_members WHERE artist_id = ?1 ORDER BY position",
            MEMBER_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let members = stmt
            .query_map(params![artist_id.to_string()], Self::row_to_member)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(members)
    }

    fn list_band_members_with_role(&self, role_id: Uuid) -> AppResult<Vec<BandMember>> {
        let sql = format!(
            "SELECT {} FROM band_members
             WHERE EXISTS (SELECT 1 FROM json_each(band_members.role_ids) WHERE value = ?1)
             ORDER BY artist_id, position",
            MEMBER_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let members = stmt
            .query_map(params![role_id.to_string()], Self::row_to_member)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(members)
    }

    fn delete_band_member(&self, id: Uuid) -> AppResult<bool> {
        let affected = self.conn.execute(
            "DELETE FROM band_members WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_connection;

    #[test]
    fn test_band_members_keep_roles_and_order() {
        let conn = create_test_connection().unwrap();
        let repo = SqliteArtistRepository::new(&conn);
        let mut artist = Artist::new(Uuid::new_v4(), "Metallica".to_string());
        artist.is_band = true;
        repo.save(&artist).unwrap();

        let mut drummer = BandMember::new(artist.id, "Lars".to_string(), 1);
        drummer.role_ids = vec![Uuid::new_v4()];
        let singer = BandMember::new(artist.id, "James".to_string(), 0);
        repo.save_band_member(&drummer).unwrap();
        repo.save_band_member(&singer).unwrap();

        let members = repo.list_band_members(artist.id).unwrap();

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "James");
        assert_eq!(members[1].role_ids, drummer.role_ids);
        assert!(repo.get_by_id(artist.id).unwrap().unwrap().is_band);
    }

    #[test]
    fn test_members_are_found_by_role() {
        let conn = create_test_connection().unwrap();
        let repo = SqliteArtistRepository::new(&conn);
        let artist = Artist::new(Uuid::new_v4(), "Metallica".to_string());
        repo.save(&artist).unwrap();
        let guitar = Uuid::new_v4();
        let vocals = Uuid::new_v4();

        let mut james = BandMember::new(artist.id, "James".to_string(), 0);
        james.role_ids = vec![vocals, guitar];
        let mut kirk = BandMember::new(artist.id, "Kirk".to_string(), 1);
        kirk.role_ids = vec![guitar];
        let lars = BandMember::new(artist.id, "Lars".to_string(), 2);
        for member in [&james, &kirk, &lars] {
            repo.save_band_member(member).unwrap();
        }

        let guitarists = repo.list_band_members_with_role(guitar).unwrap();
        let singers = repo.list_band_members_with_role(vocals).unwrap();

        let names: Vec<&str> = guitarists.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["James", "Kirk"]);
        assert_eq!(singers.len(), 1);
        assert!(repo
            .list_band_members_with_role(Uuid::new_v4())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_deleting_artist_cascades_to_members() {
        let conn = create_test_connection().unwrap();
        let repo = SqliteArtistRepository::new(&conn);
        let artist = Artist::new(Uuid::new_v4(), "Band".to_string());
        repo.save(&artist).unwrap();
        let member = BandMember::new(artist.id, "Member".to_string(), 0);
        repo.save_band_member(&member).unwrap();

        repo.delete(artist.id).unwrap();

        assert!(repo.get_band_member(member.id).unwrap().is_none());
    }
}
