use super::entity::{Song, SongSection, MAX_CONFIDENCE};
use crate::domain::{DomainError, DomainResult};

/// Validates all Song invariants
pub fn validate_song(song: &Song) -> DomainResult<()> {
    if song.title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Song title cannot be empty".to_string(),
        ));
    }
    if song.album_id.is_some() != song.album_track_no.is_some() {
        return Err(DomainError::InvariantViolation(
            "Album and album track number must be set together".to_string(),
        ));
    }
    validate_non_negative("song confidence", song.confidence)?;
    validate_non_negative("song rehearsals", song.rehearsals)?;
    validate_non_negative("song progress", song.progress)?;
    Ok(())
}

/// Validates all SongSection invariants
pub fn validate_section(section: &SongSection) -> DomainResult<()> {
    if section.name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Section name cannot be empty".to_string(),
        ));
    }
    if section.confidence > MAX_CONFIDENCE {
        return Err(DomainError::InvariantViolation(format!(
            "Confidence {} exceeds {}",
            section.confidence, MAX_CONFIDENCE
        )));
    }
    validate_non_negative("rehearsals score", section.rehearsals_score)?;
    validate_non_negative("confidence score", section.confidence_score)?;
    validate_non_negative("progress", section.progress)?;
    Ok(())
}

/// Derived scores are finite and never negative
fn validate_non_negative(field: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::InvariantViolation(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_valid_song() {
        let song = Song::new(Uuid::new_v4(), "Nothing Else Matters".to_string());
        assert!(validate_song(&song).is_ok());
    }

    #[test]
    fn test_empty_title_fails() {
        let song = Song::new(Uuid::new_v4(), "  ".to_string());
        assert!(validate_song(&song).is_err());
    }

    #[test]
    fn test_album_without_track_number_fails() {
        let mut song = Song::new(Uuid::new_v4(), "Song".to_string());
        song.album_id = Some(Uuid::new_v4());
        assert!(validate_song(&song).is_err());
    }

    #[test]
    fn test_negative_score_fails() {
        let mut section = SongSection::new(Uuid::new_v4(), "Intro".to_string(), 0);
        assert!(validate_section(&section).is_ok());

        section.progress = -1.0;
        assert!(validate_section(&section).is_err());

        section.progress = f64::NAN;
        assert!(validate_section(&section).is_err());
    }
}
