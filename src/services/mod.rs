// src/services/mod.rs
//
// Services - orchestration layer
//
// Each mutating operation runs inside one unit of work and emits its
// events only after the commit.

pub mod album_service;
pub mod arrangement_service;
pub mod artist_service;
pub mod playlist_service;
pub mod reference_service;
pub mod song_service;

pub use album_service::{AlbumService, CreateAlbumRequest};

pub use arrangement_service::ArrangementService;

pub use artist_service::{ArtistService, CreateArtistRequest, CreateBandMemberRequest};

pub use playlist_service::{AddToPlaylistRequest, CreatePlaylistRequest, PlaylistService};

pub use reference_service::ReferenceService;

pub use song_service::{
    CreateSectionRequest, CreateSongRequest, SongService, UpdateSectionRequest,
};
