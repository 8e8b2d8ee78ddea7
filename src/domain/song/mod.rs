//! Critical Song Invariants:
//!
//! 1. A section belongs to exactly one song (song_id is a lookup key, not ownership)
//! 2. The song owns its ordered list of sections, 0-based and contiguous
//! 3. Section confidence is within 0..=100
//! 4. Section rehearsals never decrease through an update
//! 5. Every confidence/rehearsals change appends an immutable history record
//! 6. Song statistics are the mean of its sections (see domain::statistics)
//! 7. Deleting a song cascades to its sections and their history

pub mod entity;
pub mod invariants;

pub use entity::{HistoryProperty, SectionHistory, Song, SongSection, MAX_CONFIDENCE};
pub use invariants::{validate_section, validate_song};
