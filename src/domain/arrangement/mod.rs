//! Critical Arrangement Invariants:
//!
//! 1. An arrangement belongs to exactly one song
//! 2. Arrangements are ordered 0-based and contiguously inside the song
//! 3. Arrangement name cannot be empty

pub mod entity;

pub use entity::SongArrangement;

use crate::domain::{DomainError, DomainResult};

/// Validates SongArrangement invariants
pub fn validate_arrangement(arrangement: &SongArrangement) -> DomainResult<()> {
    if arrangement.name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Arrangement name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
