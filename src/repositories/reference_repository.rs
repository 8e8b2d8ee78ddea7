// src/repositories/reference_repository.rs
//
// One table backs every per-user reference list; (user_id, kind) is the
// collection key.

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::domain::reference::{ReferenceItem, ReferenceKind};
use crate::error::AppResult;
use crate::repositories::mapping::{format_timestamp, get_timestamp, get_u32, get_uuid, invalid_data};

pub trait ReferenceRepository {
    fn save(&self, item: &ReferenceItem) -> AppResult<()>;
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<ReferenceItem>>;
    /// Items of one list, by order
    fn list(&self, user_id: Uuid, kind: ReferenceKind) -> AppResult<Vec<ReferenceItem>>;
    fn delete(&self, id: Uuid) -> AppResult<bool>;
}

pub struct SqliteReferenceRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteReferenceRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn row_to_item(row: &Row) -> rusqlite::Result<ReferenceItem> {
        let kind_raw: String = row.get("kind")?;
        let kind = kind_raw
            .parse::<ReferenceKind>()
            .map_err(|e| invalid_data(row, "kind", e.to_string()))?;

        Ok(ReferenceItem {
            id: get_uuid(row, "id")?,
            user_id: get_uuid(row, "user_id")?,
            kind,
            name: row.get("name")?,
            order: get_u32(row, "position")?,
            created_at: get_timestamp(row, "created_at")?,
        })
    }
}

impl ReferenceRepository for SqliteReferenceRepository<'_> {
    fn save(&self, item: &ReferenceItem) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO reference_items (id, user_id, kind, name, position, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                position = excluded.position",
            params![
                item.id.to_string(),
                item.user_id.to_string(),
                item.kind.as_str(),
                item.name,
                i64::from(item.order),
                format_timestamp(&item.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<ReferenceItem>> {
        let item = self
            .conn
            .query_row(
                "SELECT id, user_id, kind, name, position, created_at
                 FROM reference_items WHERE id = ?1",
                params![id.to_string()],
                Self::row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    fn list(&self, user_id: Uuid, kind: ReferenceKind) -> AppResult<Vec<ReferenceItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, kind, name, position, created_at
             FROM reference_items WHERE user_id = ?1 AND kind = ?2 ORDER BY position",
        )?;
        let items = stmt
            .query_map(params![user_id.to_string(), kind.as_str()], Self::row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let affected = self.conn.execute(
            "DELETE FROM reference_items WHERE id = ?1",
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
    fn test_lists_are_scoped_by_user_and_kind() {
        let conn = create_test_connection().unwrap();
        let repo = SqliteReferenceRepository::new(&conn);
        let user = Uuid::new_v4();

        repo.save(&ReferenceItem::new(user, ReferenceKind::GuitarTuning, "Drop D".to_string(), 0))
            .unwrap();
        repo.save(&ReferenceItem::new(user, ReferenceKind::SectionType, "Chorus".to_string(), 0))
            .unwrap();
        repo.save(&ReferenceItem::new(
            Uuid::new_v4(),
            ReferenceKind::GuitarTuning,
            "E Standard".to_string(),
            0,
        ))
        .unwrap();

        let tunings = repo.list(user, ReferenceKind::GuitarTuning).unwrap();

        assert_eq!(tunings.len(), 1);
        assert_eq!(tunings[0].name, "Drop D");
        assert_eq!(tunings[0].kind, ReferenceKind::GuitarTuning);
    }
}
