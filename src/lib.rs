// src/lib.rs
// Repertoire - rehearsal tracking core for a musician's repertoire
//
// Architecture:
// - Domain-centric: entities, invariants and the pure ordering, statistics
//   and duplicate-resolution algorithms live in `domain`
// - Repositories are plain SQLite data mappers
// - Services orchestrate inside a unit of work and emit events after commit
// - Explicit: no implicit behavior, no magic

pub mod application;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    // Algorithms
    append_at_end,
    is_contiguous,
    move_within_collection,
    partition_and_filter,
    recompute_parent_stats,
    renumber_after_removal,
    // Catalogue
    Album,
    Artist,
    BandMember,
    Candidate,
    DomainError,
    DuplicateResolution,
    HistoryProgressProcessor,
    HistoryProperty,
    ParentStats,
    Playlist,
    PlaylistSong,
    PositionBase,
    Positioned,
    ProgressProcessor,
    ReferenceItem,
    ReferenceKind,
    ScoredChild,
    SectionHistory,
    // Songs
    Song,
    SongArrangement,
    SongSection,
};

// ============================================================================
// PUBLIC API - Errors
// ============================================================================

pub use error::{AppError, AppResult, ErrorKind};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus, CollectionKind, CollectionReordered, DomainEvent, EventBus, EventLogEntry,
    PlaylistSongsAdded, PlaylistSongsRemoved, SectionsRehearsed, SongCreated, SongDeleted,
    SongStatsRecomputed,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{
    create_connection_pool, create_memory_pool, initialize_database, ConnectionPool,
    DatabaseConfig, SqliteUnitOfWork, UnitOfWork,
};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{RepositoryFactory, SqliteRepositoryFactory};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    AddToPlaylistRequest, AlbumService, ArrangementService, ArtistService, CreateAlbumRequest,
    CreateArtistRequest, CreateBandMemberRequest, CreatePlaylistRequest, CreateSectionRequest,
    CreateSongRequest, PlaylistService, ReferenceService, SongService, UpdateSectionRequest,
};

// ============================================================================
// PUBLIC API - Application
// ============================================================================

pub use application::AppState;
