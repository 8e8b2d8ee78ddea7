// src/repositories/mod.rs
//
// Repository layer
//
// Rules:
// - Repositories are plain data mappers over a borrowed connection
// - No business logic and no invariant enforcement
// - No event emission
// - No cross-repository calls
// - Explicit SQL only

pub mod album_repository;
pub mod arrangement_repository;
pub mod artist_repository;
pub mod factory;
pub mod history_repository;
pub(crate) mod mapping;
pub mod playlist_repository;
pub mod reference_repository;
pub mod section_repository;
pub mod song_repository;

pub use album_repository::{AlbumRepository, SqliteAlbumRepository};
pub use arrangement_repository::{ArrangementRepository, SqliteArrangementRepository};
pub use artist_repository::{ArtistRepository, SqliteArtistRepository};
pub use factory::{RepositoryFactory, SqliteRepositoryFactory};
pub use history_repository::{SectionHistoryRepository, SqliteSectionHistoryRepository};
pub use playlist_repository::{PlaylistRepository, SqlitePlaylistRepository};
pub use reference_repository::{ReferenceRepository, SqliteReferenceRepository};
pub use section_repository::{SongSectionRepository, SqliteSongSectionRepository};
pub use song_repository::{SongRepository, SqliteSongRepository};
