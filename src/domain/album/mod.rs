//! Critical Album Invariants:
//!
//! 1. An album belongs to one user
//! 2. Songs on an album carry 1-based, contiguous track numbers
//! 3. Deleting an album detaches its songs, it never deletes them
//! 4. Album title cannot be empty

pub mod entity;

pub use entity::Album;

use crate::domain::{DomainError, DomainResult};

/// Validates Album invariants
pub fn validate_album(album: &Album) -> DomainResult<()> {
    if album.title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Album title cannot be empty".to_string(),
        ));
    }
    Ok(())
}
