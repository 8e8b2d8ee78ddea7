//! Critical Artist Invariants:
//!
//! 1. Band members belong to exactly one artist
//! 2. Band members are ordered 0-based and contiguously inside their artist
//! 3. A section can only be assigned a band member of its song's artist
//! 4. Names cannot be empty

pub mod entity;

pub use entity::{Artist, BandMember};

use crate::domain::{DomainError, DomainResult};

/// Validates Artist invariants
pub fn validate_artist(artist: &Artist) -> DomainResult<()> {
    if artist.name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Artist name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates BandMember invariants
pub fn validate_band_member(member: &BandMember) -> DomainResult<()> {
    if member.name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Band member name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_empty_names_fail() {
        let artist = Artist::new(Uuid::new_v4(), "".to_string());
        assert!(validate_artist(&artist).is_err());

        let member = BandMember::new(artist.id, " ".to_string(), 0);
        assert!(validate_band_member(&member).is_err());
    }
}
