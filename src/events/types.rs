// events/types.rs
//
// Domain events. Each one is an immutable fact that has already been
// committed.
//
// Rules:
// - Events are facts, not commands
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::statistics::ParentStats;

pub trait DomainEvent: std::fmt::Debug + Clone {
    fn event_id(&self) -> Uuid;

    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! impl_domain_event {
    ($event:ident) => {
        impl DomainEvent for $event {
            fn event_id(&self) -> Uuid {
                self.event_id
            }
            fn occurred_at(&self) -> DateTime<Utc> {
                self.occurred_at
            }
            fn event_type(&self) -> &'static str {
                stringify!($event)
            }
        }
    };
}

// ============================================================================
// SONG EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub song_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
}

impl SongCreated {
    pub fn new(song_id: Uuid, user_id: Uuid, title: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            song_id,
            user_id,
            title,
        }
    }
}

impl_domain_event!(SongCreated);

/// Emitted after a song and everything it owned are gone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub song_id: Uuid,
    /// Album that was renumbered, if the song was on one
    pub album_id: Option<Uuid>,
    /// Playlists that were renumbered
    pub playlist_ids: Vec<Uuid>,
}

impl SongDeleted {
    pub fn new(song_id: Uuid, album_id: Option<Uuid>, playlist_ids: Vec<Uuid>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            song_id,
            album_id,
            playlist_ids,
        }
    }
}

impl_domain_event!(SongDeleted);

/// Emitted whenever a song's aggregate statistics were rewritten
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongStatsRecomputed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub song_id: Uuid,
    pub confidence: f64,
    pub rehearsals: f64,
    pub progress: f64,
}

impl SongStatsRecomputed {
    pub fn new(song_id: Uuid, stats: ParentStats) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            song_id,
            confidence: stats.confidence,
            rehearsals: stats.rehearsals,
            progress: stats.progress,
        }
    }
}

impl_domain_event!(SongStatsRecomputed);

/// Emitted once per perfect or bulk rehearsal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionsRehearsed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub song_ids: Vec<Uuid>,
    pub section_count: usize,
}

impl SectionsRehearsed {
    pub fn new(song_ids: Vec<Uuid>, section_count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            song_ids,
            section_count,
        }
    }
}

impl_domain_event!(SectionsRehearsed);

// ============================================================================
// ORDERING EVENTS
// ============================================================================

/// Positioned collections that can be reordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Album,
    Playlist,
    SongSections,
    Arrangements,
    BandMembers,
    /// Keyed by user id
    ReferenceList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReordered {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub collection: CollectionKind,
    pub collection_id: Uuid,
    /// Items whose position changed
    pub changed_ids: Vec<Uuid>,
}

impl CollectionReordered {
    pub fn new(collection: CollectionKind, collection_id: Uuid, changed_ids: Vec<Uuid>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            collection,
            collection_id,
            changed_ids,
        }
    }
}

impl_domain_event!(CollectionReordered);

// ============================================================================
// PLAYLIST EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSongsAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub playlist_id: Uuid,
    pub song_ids: Vec<Uuid>,
}

impl PlaylistSongsAdded {
    pub fn new(playlist_id: Uuid, song_ids: Vec<Uuid>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            playlist_id,
            song_ids,
        }
    }
}

impl_domain_event!(PlaylistSongsAdded);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSongsRemoved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub playlist_id: Uuid,
    /// Removed memberships
    pub membership_ids: Vec<Uuid>,
}

impl PlaylistSongsRemoved {
    pub fn new(playlist_id: Uuid, membership_ids: Vec<Uuid>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            playlist_id,
            membership_ids,
        }
    }
}

impl_domain_event!(PlaylistSongsRemoved);
