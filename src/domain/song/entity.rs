use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ordering::Positioned;
use crate::domain::statistics::{ParentStats, ScoredChild};
use crate::domain::{DomainError, DomainResult};

/// Upper bound of a section's confidence
pub const MAX_CONFIDENCE: u32 = 100;

/// A song in a user's repertoire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Internal immutable identifier
    pub id: Uuid,

    /// Owner of the song
    pub user_id: Uuid,

    pub title: String,

    pub artist_id: Option<Uuid>,

    /// Album the song is on, if any
    pub album_id: Option<Uuid>,

    /// 1-based track number inside `album_id` (present iff album_id is)
    pub album_track_no: Option<u32>,

    /// Mean confidence of the sections
    pub confidence: f64,

    /// Mean rehearsals of the sections
    pub rehearsals: f64,

    /// Mean progress of the sections
    pub progress: f64,

    /// Advanced whenever a section's rehearsal count increases
    pub last_time_played: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Song {
    pub fn new(user_id: Uuid, title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            artist_id: None,
            album_id: None,
            album_track_no: None,
            confidence: 0.0,
            rehearsals: 0.0,
            progress: 0.0,
            last_time_played: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Store a freshly computed rollup of the song's sections.
    ///
    /// `rehearsed_at` is set when the recomputation was caused by added
    /// rehearsals; plain edits leave `last_time_played` untouched.
    pub fn apply_stats(&mut self, stats: ParentStats, rehearsed_at: Option<DateTime<Utc>>) {
        self.confidence = stats.confidence;
        self.rehearsals = stats.rehearsals;
        self.progress = stats.progress;
        if let Some(at) = rehearsed_at {
            self.last_time_played = Some(at);
        }
        self.updated_at = Utc::now();
    }

    pub fn attach_to_album(&mut self, album_id: Uuid, track_no: u32) {
        self.album_id = Some(album_id);
        self.album_track_no = Some(track_no);
        self.updated_at = Utc::now();
    }

    pub fn detach_from_album(&mut self) {
        self.album_id = None;
        self.album_track_no = None;
        self.updated_at = Utc::now();
    }
}

/// Songs are positioned inside their album by track number
impl Positioned for Song {
    fn id(&self) -> Uuid {
        self.id
    }

    fn position(&self) -> u32 {
        self.album_track_no.unwrap_or(0)
    }

    fn set_position(&mut self, position: u32) {
        self.album_track_no = Some(position);
    }
}

/// A rehearsable part of a song (verse, chorus, solo...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongSection {
    pub id: Uuid,

    /// Back-reference to the owning song
    pub song_id: Uuid,

    pub name: String,

    /// Entry of the user's section-type reference list
    pub section_type_id: Option<Uuid>,

    /// Band member who plays this section
    pub band_member_id: Option<Uuid>,

    /// 0-based position inside the song
    pub order: u32,

    /// Self-assessed confidence, 0..=100
    pub confidence: u32,

    pub rehearsals: u32,

    pub rehearsals_score: f64,

    pub confidence_score: f64,

    pub progress: f64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl SongSection {
    pub fn new(song_id: Uuid, name: String, order: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            song_id,
            name,
            section_type_id: None,
            band_member_id: None,
            order,
            confidence: 0,
            rehearsals: 0,
            rehearsals_score: 0.0,
            confidence_score: 0.0,
            progress: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Raise the rehearsal count, returning the history record to persist.
    ///
    /// Lower values are rejected; an unchanged value records nothing.
    pub fn record_rehearsals(
        &mut self,
        rehearsals: u32,
        at: DateTime<Utc>,
    ) -> DomainResult<Option<SectionHistory>> {
        if rehearsals < self.rehearsals {
            return Err(DomainError::RehearsalsDecrease {
                current: self.rehearsals,
                requested: rehearsals,
            });
        }
        if rehearsals == self.rehearsals {
            return Ok(None);
        }

        let record = SectionHistory::new(
            self.id,
            HistoryProperty::Rehearsals,
            self.rehearsals,
            rehearsals,
            at,
        );
        self.rehearsals = rehearsals;
        self.updated_at = at;
        Ok(Some(record))
    }

    /// Change the confidence, returning the history record to persist.
    pub fn record_confidence(
        &mut self,
        confidence: u32,
        at: DateTime<Utc>,
    ) -> DomainResult<Option<SectionHistory>> {
        if confidence > MAX_CONFIDENCE {
            return Err(DomainError::InvariantViolation(format!(
                "Confidence {} exceeds {}",
                confidence, MAX_CONFIDENCE
            )));
        }
        if confidence == self.confidence {
            return Ok(None);
        }

        let record = SectionHistory::new(
            self.id,
            HistoryProperty::Confidence,
            self.confidence,
            confidence,
            at,
        );
        self.confidence = confidence;
        self.updated_at = at;
        Ok(Some(record))
    }
}

impl Positioned for SongSection {
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

impl ScoredChild for SongSection {
    fn confidence(&self) -> f64 {
        self.confidence as f64
    }

    fn rehearsals(&self) -> f64 {
        self.rehearsals as f64
    }

    fn progress(&self) -> f64 {
        self.progress
    }
}

/// Tracked section property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryProperty {
    Rehearsals,
    Confidence,
}

impl HistoryProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryProperty::Rehearsals => "rehearsals",
            HistoryProperty::Confidence => "confidence",
        }
    }
}

impl std::fmt::Display for HistoryProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HistoryProperty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rehearsals" => Ok(HistoryProperty::Rehearsals),
            "confidence" => Ok(HistoryProperty::Confidence),
            other => Err(DomainError::InvariantViolation(format!(
                "Unknown history property '{}'",
                other
            ))),
        }
    }
}

/// Immutable log entry of one property change on a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionHistory {
    pub id: Uuid,
    pub section_id: Uuid,
    pub property: HistoryProperty,
    pub from: u32,
    pub to: u32,
    pub created_at: DateTime<Utc>,
}

impl SectionHistory {
    pub fn new(
        section_id: Uuid,
        property: HistoryProperty,
        from: u32,
        to: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            section_id,
            property,
            from,
            to,
            created_at,
        }
    }
}
