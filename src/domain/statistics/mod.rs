//! Critical Statistics Invariants:
//!
//! 1. A song's confidence, rehearsals and progress are the plain mean of its sections
//! 2. A song without sections has all three at zero
//! 3. Aggregates are recomputed synchronously in the same operation as the change
//! 4. Aggregates are persisted columns, never computed lazily on read
//! 5. last_time_played only advances when a rehearsal was added

pub mod aggregator;

pub use aggregator::{recompute_parent_stats, ParentStats, ScoredChild};
