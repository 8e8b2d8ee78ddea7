//! Section scoring.
//!
//! Scores are derived from a section's history only. Any implementation must
//! return 0 for an empty history and never score more or better history lower.
//!
//! Call order on every confidence/rehearsals change:
//! 1. append the history record
//! 2. load the full history for that property
//! 3. compute the matching score
//! 4. compute the section's progress
//! 5. recompute the song aggregate over all its sections
//! 6. persist section and song together

pub mod processor;

pub use processor::{HistoryProgressProcessor, ProgressProcessor};

#[cfg(test)]
pub use processor::MockProgressProcessor;
