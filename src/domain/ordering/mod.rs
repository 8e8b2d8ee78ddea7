//! Critical Ordering Invariants:
//!
//! 1. Every positioned item belongs to exactly one collection
//! 2. Within a collection positions are unique
//! 3. Positions form the contiguous range [base, base + count - 1]
//! 4. Song sections, arrangements, band members and reference lists are 0-based
//! 5. Album and playlist track numbers are 1-based
//! 6. Positions are only ever rewritten by this module

pub mod engine;

pub use engine::{
    append_at_end, is_contiguous, move_within_collection, renumber_after_removal, PositionBase,
    Positioned,
};
