// src/repositories/history_repository.rs
//
// Section history is append-only: there is no update and no delete here.
// Rows only disappear through the cascade from their section.

use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::domain::song::{HistoryProperty, SectionHistory};
use crate::error::AppResult;
use crate::repositories::mapping::{format_timestamp, get_timestamp, get_u32, get_uuid, invalid_data};

pub trait SectionHistoryRepository {
    fn append(&self, record: &SectionHistory) -> AppResult<()>;

    /// Full history of one property of a section, oldest first
    fn list_by_section(
        &self,
        section_id: Uuid,
        property: HistoryProperty,
    ) -> AppResult<Vec<SectionHistory>>;
}

pub struct SqliteSectionHistoryRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteSectionHistoryRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn row_to_record(row: &Row) -> rusqlite::Result<SectionHistory> {
        let property_raw: String = row.get("property")?;
        let property = property_raw
            .parse::<HistoryProperty>()
            .map_err(|e| invalid_data(row, "property", e.to_string()))?;

        Ok(SectionHistory {
            id: get_uuid(row, "id")?,
            section_id: get_uuid(row, "section_id")?,
            property,
            from: get_u32(row, "from_value")?,
            to: get_u32(row, "to_value")?,
            created_at: get_timestamp(row, "created_at")?,
        })
    }
}

impl SectionHistoryRepository for SqliteSectionHistoryRepository<'_> {
    fn append(&self, record: &SectionHistory) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO section_history (id, section_id, property, from_value, to_value, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id.to_string(),
                record.section_id.to_string(),
                record.property.as_str(),
                i64::from(record.from),
                i64::from(record.to),
                format_timestamp(&record.created_at),
            ],
        )?;
        Ok(())
    }

    fn list_by_section(
        &self,
        section_id: Uuid,
        property: HistoryProperty,
    ) -> AppResult<Vec<SectionHistory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, section_id, property, from_value, to_value, created_at
             FROM section_history
             WHERE section_id = ?1 AND property = ?2
             ORDER BY created_at, rowid",
        )?;
        let records = stmt
            .query_map(
                params![section_id.to_string(), property.as_str()],
                Self::row_to_record,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
