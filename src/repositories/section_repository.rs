// src/repositories/section_repository.rs

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::domain::song::SongSection;
use crate::error::AppResult;
use crate::repositories::mapping::{
    format_timestamp, get_optional_uuid, get_timestamp, get_u32, get_uuid,
};

pub trait SongSectionRepository {
    fn save(&self, section: &SongSection) -> AppResult<()>;

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<SongSection>>;

    /// Sections of a song, by order
    fn list_by_song(&self, song_id: Uuid) -> AppResult<Vec<SongSection>>;

    fn delete(&self, id: Uuid) -> AppResult<bool>;
}

const SECTION_COLUMNS: &str = "id, song_id, name, section_type_id, band_member_id, position,
    confidence, rehearsals, rehearsals_score, confidence_score, progress, created_at, updated_at";

pub struct SqliteSongSectionRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteSongSectionRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn row_to_section(row: &Row) -> rusqlite::Result<SongSection> {
        Ok(SongSection {
            id: get_uuid(row, "id")?,
            song_id: get_uuid(row, "song_id")?,
            name: row.get("name")?,
            section_type_id: get_optional_uuid(row, "section_type_id")?,
            band_member_id: get_optional_uuid(row, "band_member_id")?,
            order: get_u32(row, "position")?,
            confidence: get_u32(row, "confidence")?,
            rehearsals: get_u32(row, "rehearsals")?,
            rehearsals_score: row.get("rehearsals_score")?,
            confidence_score: row.get("confidence_score")?,
            progress: row.get("progress")?,
            created_at: get_timestamp(row, "created_at")?,
            updated_at: get_timestamp(row, "updated_at")?,
        })
    }
}

impl SongSectionRepository for SqliteSongSectionRepository<'_> {
    fn save(&self, section: &SongSection) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO song_sections (
                id, song_id, name, section_type_id, band_member_id, position,
                confidence, rehearsals, rehearsals_score, confidence_score, progress,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                section_type_id = excluded.section_type_id,
                band_member_id = excluded.band_member_id,
                position = excluded.position,
                confidence = excluded.confidence,
                rehearsals = excluded.rehearsals,
                rehearsals_score = excluded.rehearsals_score,
                confidence_score = excluded.confidence_score,
                progress = excluded.progress,
                updated_at = excluded.updated_at",
            params![
                section.id.to_string(),
                section.song_id.to_string(),
                section.name,
                section.section_type_id.map(|id| id.to_string()),
                section.band_member_id.map(|id| id.to_string()),
                i64::from(section.order),
                i64::from(section.confidence),
                i64::from(section.rehearsals),
                section.rehearsals_score,
                section.confidence_score,
                section.progress,
                format_timestamp(&section.created_at),
                format_timestamp(&section.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<SongSection>> {
        let sql = format!("SELECT {} FROM song_sections WHERE id = ?1", SECTION_COLUMNS);
        let section = self
            .conn
            .query_row(&sql, params![id.to_string()], Self::row_to_section)
            .optional()?;
        Ok(section)
    }

    fn list_by_song(&self, song_id: Uuid) -> AppResult<Vec<SongSection>> {
        let sql = format!(
            "SELECT {} FROM song_sections WHERE song_id = ?1 ORDER BY position",
            SECTION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let sections = stmt
            .query_map(params![song_id.to_string()], Self::row_to_section)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sections)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let affected = self.conn.execute(
            "DELETE FROM song_sections WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_connection;
    use crate::domain::song::Song;
    use crate::repositories::song_repository::{SongRepository, SqliteSongRepository};

    #[test]
    fn test_sections_listed_by_order() {
        let conn = create_test_connection().unwrap();
        let song = Song::new(Uuid::new_v4(), "Song".to_string());
        SqliteSongRepository::new(&conn).save(&song).unwrap();
        let repo = SqliteSongSectionRepository::new(&conn);

        let chorus = SongSection::new(song.id, "Chorus".to_string(), 1);
        let verse = SongSection::new(song.id, "Verse".to_string(), 0);
        repo.save(&chorus).unwrap();
        repo.save(&verse).unwrap();

        let names: Vec<String> = repo
            .list_by_song(song.id)
            .unwrap()
            .into_iter()
            .map(|section| section.name)
            .collect();
        assert_eq!(names, vec!["Verse", "Chorus"]);
    }

    #[test]
    fn test_deleting_song_cascades_to_sections() {
        let conn = create_test_connection().unwrap();
        let songs = SqliteSongRepository::new(&conn);
        let sections = SqliteSongSectionRepository::new(&conn);
        let song = Song::new(Uuid::new_v4(), "Song".to_string());
        songs.save(&song).unwrap();
        let section = SongSection::new(song.id, "Intro".to_string(), 0);
        sections.save(&section).unwrap();

        songs.delete(song.id).unwrap();

        assert!(sections.get_by_id(section.id).unwrap().is_none());
    }

    #[test]
    fn test_scores_persist() {
        let conn = create_test_connection().unwrap();
        let song = Song::new(Uuid::new_v4(), "Song".to_string());
        SqliteSongRepository::new(&conn).save(&song).unwrap();
        let repo = SqliteSongSectionRepository::new(&conn);
        let mut section = SongSection::new(song.id, "Solo".to_string(), 0);
        section.confidence = 70;
        section.rehearsals = 4;
        section.rehearsals_score = 4.0;
        section.confidence_score = 70.0;
        section.progress = 2.8;

        repo.save(&section).unwrap();
        let loaded = repo.get_by_id(section.id).unwrap().unwrap();

        assert_eq!(loaded.confidence, 70);
        assert_eq!(loaded.rehearsals, 4);
        assert_eq!(loaded.progress, 2.8);
    }
}
