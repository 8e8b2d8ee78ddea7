// src/events/mod.rs
//
// Internal event system: typed events plus a synchronous bus.
// Services emit only after their unit of work committed.

pub mod bus;
pub mod types;

pub use bus::{EventBus, EventLogEntry};

pub use types::{
    CollectionKind, CollectionReordered, DomainEvent, PlaylistSongsAdded, PlaylistSongsRemoved,
    SectionsRehearsed, SongCreated, SongDeleted, SongStatsRecomputed,
};

pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
