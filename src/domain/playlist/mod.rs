//! Critical Playlist Invariants:
//!
//! 1. A playlist holds songs through memberships (a song can be in many playlists)
//! 2. Membership track numbers are 1-based and contiguous per playlist
//! 3. The same song may appear more than once only when force-added
//! 4. Deleting a playlist deletes its memberships, never the songs

pub mod entity;

pub use entity::{Playlist, PlaylistSong};

use crate::domain::{DomainError, DomainResult};

/// Validates Playlist invariants
pub fn validate_playlist(playlist: &Playlist) -> DomainResult<()> {
    if playlist.title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Playlist title cannot be empty".to_string(),
        ));
    }
    Ok(())
}
