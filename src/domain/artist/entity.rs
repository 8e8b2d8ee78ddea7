use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ordering::Positioned;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Whether the artist is a band (has band members)
    pub is_band: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Artist {
    pub fn new(user_id: Uuid, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            is_band: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A member of a band, ordered inside the artist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandMember {
    pub id: Uuid,
    pub artist_id: Uuid,
    pub name: String,
    /// Role ids from the user's band-member-role reference list
    pub role_ids: Vec<Uuid>,
    /// 0-based
    pub order: u32,
    pub created_at: DateTime<Utc>,
}

impl BandMember {
    pub fn new(artist_id: Uuid, name: String, order: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            artist_id,
            name,
            role_ids: Vec::new(),
            order,
            created_at: Utc::now(),
        }
    }
}

impl Positioned for BandMember {
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
