//! Critical Reference List Invariants:
//!
//! 1. Reference lists are scoped per user and per kind
//! 2. Items are ordered 0-based and contiguously inside (user, kind)
//! 3. A reference list is just another positioned collection whose parent is the user
//! 4. Item name cannot be empty

pub mod entity;

pub use entity::{ReferenceItem, ReferenceKind};

use crate::domain::{DomainError, DomainResult};

/// Validates ReferenceItem invariants
pub fn validate_reference_item(item: &ReferenceItem) -> DomainResult<()> {
    if item.name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(format!(
            "{} name cannot be empty",
            item.kind
        )));
    }
    Ok(())
}
