use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ordering::Positioned;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    pub fn new(user_id: Uuid, title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Join row between a playlist and a song, positioned inside the playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSong {
    /// Membership id (a song can be in the same playlist twice)
    pub id: Uuid,
    pub playlist_id: Uuid,
    pub song_id: Uuid,
    /// 1-based
    pub song_track_no: u32,
    pub created_at: DateTime<Utc>,
}

impl PlaylistSong {
    pub fn new(playlist_id: Uuid, song_id: Uuid, song_track_no: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            playlist_id,
            song_id,
            song_track_no,
            created_at: Utc::now(),
        }
    }
}

impl Positioned for PlaylistSong {
    fn id(&self) -> Uuid {
        self.id
    }

    fn position(&self) -> u32 {
        self.song_track_no
    }

    fn set_position(&mut self, position: u32) {
        self.song_track_no = position;
    }
}
