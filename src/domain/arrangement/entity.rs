use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ordering::Positioned;

/// A named way of playing a song (acoustic, live, drop-D...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongArrangement {
    pub id: Uuid,
    pub song_id: Uuid,
    pub name: String,
    /// 0-based
    pub order: u32,
    pub created_at: DateTime<Utc>,
}

impl SongArrangement {
    pub fn new(song_id: Uuid, name: String, order: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            song_id,
            name,
            order,
            created_at: Utc::now(),
        }
    }
}

impl Positioned for SongArrangement {
    fn id(&self) -> Uuid {
        self.id
    }

    fn position(&self) -> u32 {
        self.order
    }

    fn set_position(&mut self, position: u32) {
        self.order = position;
    }
}
