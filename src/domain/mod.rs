// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// Entities, their invariants and the pure algorithms that keep them
// consistent. Nothing in here performs I/O.

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod album;
pub mod arrangement;
pub mod artist;
pub mod duplicates;
pub mod ordering;
pub mod playlist;
pub mod progress;
pub mod reference;
pub mod song;
pub mod statistics;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Catalogue
pub use album::{validate_album, Album};
pub use artist::{validate_artist, validate_band_member, Artist, BandMember};
pub use playlist::{validate_playlist, Playlist, PlaylistSong};

// Songs and rehearsal tracking
pub use arrangement::{validate_arrangement, SongArrangement};
pub use song::{
    validate_section, validate_song, HistoryProperty, SectionHistory, Song, SongSection,
    MAX_CONFIDENCE,
};

// Per-user reference lists
pub use reference::{validate_reference_item, ReferenceItem, ReferenceKind};

// Algorithms
pub use duplicates::{
    assign_playlist_positions, partition_and_filter, Candidate, DuplicateResolution,
};
pub use ordering::{
    append_at_end, is_contiguous, move_within_collection, renumber_after_removal, PositionBase,
    Positioned,
};
pub use progress::{HistoryProgressProcessor, ProgressProcessor};
pub use statistics::{recompute_parent_stats, ParentStats, ScoredChild};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Rehearsals cannot decrease from {current} to {requested}")]
    RehearsalsDecrease { current: u32, requested: u32 },

    #[error("Band member {band_member_id} does not belong to the song's artist")]
    InvalidBandMember { band_member_id: uuid::Uuid },

    #[error("Cannot force adding when there are no duplicates")]
    ForceAddWithoutDuplicates,

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
