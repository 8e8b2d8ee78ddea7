// src/application/state.rs

use std::sync::Arc;

use crate::db::{create_connection_pool, create_memory_pool, ConnectionPool, DatabaseConfig};
use crate::db::{SqliteUnitOfWork, UnitOfWork};
use crate::domain::progress::{HistoryProgressProcessor, ProgressProcessor};
use crate::error::AppResult;
use crate::events::EventBus;
use crate::services::{
    AlbumService, ArrangementService, ArtistService, PlaylistService, ReferenceService,
    SongService,
};

/// Shared application state.
/// All fields are Arc-wrapped so hosts can hand clones to request handlers.
#[derive(Clone)]
pub struct AppState {
    pub event_bus: Arc<EventBus>,
    pub unit_of_work: Arc<dyn UnitOfWork>,
    pub song_service: Arc<SongService>,
    pub album_service: Arc<AlbumService>,
    pub playlist_service: Arc<PlaylistService>,
    pub artist_service: Arc<ArtistService>,
    pub arrangement_service: Arc<ArrangementService>,
    pub reference_service: Arc<ReferenceService>,
}

impl AppState {
    /// Open (and migrate) the configured database with the default scoring
    pub fn open(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = create_connection_pool(config)?;
        Ok(Self::new(pool, Arc::new(HistoryProgressProcessor::new())))
    }

    /// Throwaway in-memory state
    pub fn in_memory() -> AppResult<Self> {
        let pool = create_memory_pool()?;
        Ok(Self::new(pool, Arc::new(HistoryProgressProcessor::new())))
    }

    pub fn new(pool: ConnectionPool, processor: Arc<dyn ProgressProcessor>) -> Self {
        // 1. INFRASTRUCTURE
        let event_bus = Arc::new(EventBus::new());
        let unit_of_work: Arc<dyn UnitOfWork> = Arc::new(SqliteUnitOfWork::new(pool));

        // 2. SERVICES
        let song_service = Arc::new(SongService::new(
            unit_of_work.clone(),
            processor,
            event_bus.clone(),
        ));
        let album_service = Arc::new(AlbumService::new(unit_of_work.clone(), event_bus.clone()));
        let playlist_service = Arc::new(PlaylistService::new(
            unit_of_work.clone(),
            event_bus.clone(),
        ));
        let artist_service = Arc::new(ArtistService::new(unit_of_work.clone(), event_bus.clone()));
        let arrangement_service = Arc::new(ArrangementService::new(
            unit_of_work.clone(),
            event_bus.clone(),
        ));
        let reference_service = Arc::new(ReferenceService::new(
            unit_of_work.clone(),
            event_bus.clone(),
        ));

        log::debug!("Application state initialised");

        Self {
            event_bus,
            unit_of_work,
            song_service,
            album_service,
            playlist_service,
            artist_service,
            arrangement_service,
            reference_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ordering::{is_contiguous, PositionBase};
    use crate::domain::reference::ReferenceKind;
    use crate::services::{
        AddToPlaylistRequest, CreateAlbumRequest, CreateArtistRequest, CreateBandMemberRequest,
        CreatePlaylistRequest, CreateSectionRequest, CreateSongRequest, UpdateSectionRequest,
    };
    use uuid::Uuid;

    #[test]
    fn test_album_move_scenario() {
        let app = AppState::in_memory().unwrap();
        let user = Uuid::new_v4();
        let album = app
            .album_service
            .create_album(CreateAlbumRequest {
                user_id: user,
                title: "Black Album".to_string(),
                artist_id: None,
                release_date: None,
            })
            .unwrap();
        let songs: Vec<Uuid> = (1..=5)
            .map(|track| {
                app.song_service
                    .create_song(CreateSongRequest {
                        user_id: user,
                        title: format!("Track {}", track),
                        artist_id: None,
                        album_id: Some(album.id),
                    })
                    .unwrap()
                    .id
            })
            .collect();

        app.album_service
            .move_song(album.id, songs[1], songs[3])
            .unwrap();

        let tracks = app.album_service.list_songs(album.id).unwrap();
        let position_of = |id: Uuid| {
            tracks
                .iter()
                .find(|song| song.id == id)
                .and_then(|song| song.album_track_no)
        };
        assert_eq!(position_of(songs[1]), Some(4));
        assert_eq!(position_of(songs[2]), Some(2));
        assert_eq!(position_of(songs[3]), Some(3));
        assert_eq!(position_of(songs[0]), Some(1));
        assert_eq!(position_of(songs[4]), Some(5));
        assert!(is_contiguous(&tracks, PositionBase::One));
    }

    #[test]
    fn test_band_rehearsal_flow() {
        let app = AppState::in_memory().unwrap();
        let user = Uuid::new_v4();
        let role = app
            .reference_service
            .create_item(user, ReferenceKind::BandMemberRole, "Guitar".to_string())
            .unwrap();
        let chorus = app
            .reference_service
            .create_item(user, ReferenceKind::SectionType, "Chorus".to_string())
            .unwrap();
        let artist = app
            .artist_service
            .create_artist(CreateArtistRequest {
                user_id: user,
                name: "Metallica".to_string(),
                is_band: true,
            })
            .unwrap();
        let kirk = app
            .artist_service
            .create_band_member(CreateBandMemberRequest {
                artist_id: artist.id,
                name: "Kirk".to_string(),
                role_ids: vec![role.id],
            })
            .unwrap();
        let song = app
            .song_service
            .create_song(CreateSongRequest {
                user_id: user,
                title: "Master of Puppets".to_string(),
                artist_id: Some(artist.id),
                album_id: None,
            })
            .unwrap();
        let solo = app
            .song_service
            .create_section(CreateSectionRequest {
                song_id: song.id,
                name: "Solo".to_string(),
                section_type_id: Some(chorus.id),
                band_member_id: Some(kirk.id),
                confidence: 20,
                rehearsals: 0,
            })
            .unwrap();

        app.song_service
            .update_section(UpdateSectionRequest {
                section_id: solo.id,
                rehearsals: Some(10),
                confidence: Some(50),
                ..Default::default()
            })
            .unwrap();
        let playlist = app
            .playlist_service
            .create_playlist(CreatePlaylistRequest {
                user_id: user,
                title: "Practice".to_string(),
                description: None,
            })
            .unwrap();
        let resolution = app
            .playlist_service
            .add_artists(AddToPlaylistRequest {
                playlist_id: playlist.id,
                ids: vec![artist.id],
                force_add: None,
            })
            .unwrap();

        let song = app.song_service.get_song(song.id).unwrap();
        assert_eq!(song.rehearsals, 10.0);
        assert_eq!(song.confidence, 50.0);
        // 10 rehearsals at 50% confidence
        assert_eq!(song.progress, 5.0);
        assert_eq!(resolution.added_song_ids, vec![song.id]);

        app.reference_service
            .delete_item(user, ReferenceKind::SectionType, chorus.id)
            .unwrap();
        let sections = app.song_service.list_sections(song.id).unwrap();
        assert_eq!(sections[0].section_type_id, None);
        assert_eq!(sections[0].band_member_id, Some(kirk.id));
    }
}
