// src/services/playlist_service.rs
//
// Playlists and their memberships. Bulk additions go through the duplicate
// resolver: songs already in the playlist are reported back and only added
// when the caller explicitly forces them in.
use crate::db::UnitOfWork;
use crate::domain::duplicates::{
    assign_playlist_positions, partition_and_filter, Candidate, DuplicateResolution,
};
use crate::domain::ordering::{move_within_collection, renumber_after_removal, PositionBase};
use crate::domain::playlist::{validate_playlist, Playlist, PlaylistSong};
use crate::error::{AppError, AppResult};
use crate::events::{
    CollectionKind, CollectionReordered, EventBus, PlaylistSongsAdded, PlaylistSongsRemoved,
};
use crate::repositories::RepositoryFactory;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreatePlaylistRequest {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

/// Bulk addition of songs, albums or artists.
///
/// `force_add` only applies when some songs are already in the playlist:
/// `None` adds nothing and reports them, `Some(true)` adds them again,
/// `Some(false)` skips them.
#[derive(Debug, Clone)]
pub struct AddToPlaylistRequest {
    pub playlist_id: Uuid,
    /// Song, album or artist ids depending on the operation
    pub ids: Vec<Uuid>,
    pub force_add: Option<bool>,
}

pub struct PlaylistService {
    uow: Arc<dyn UnitOfWork>,
    event_bus: Arc<EventBus>,
}

impl PlaylistService {
    pub fn new(uow: Arc<dyn UnitOfWork>, event_bus: Arc<EventBus>) -> Self {
        Self { uow, event_bus }
    }

    pub fn create_playlist(&self, request: CreatePlaylistRequest) -> AppResult<Playlist> {
        let mut playlist = Playlist::new(request.user_id, request.title);
        playlist.description = request.description;
        validate_playlist(&playlist)?;

        self.uow.run(|repos| repos.playlists().save(&playlist))?;

        log::info!("Created playlist {} ({})", playlist.id, playlist.title);
        Ok(playlist)
    }

    pub fn get_playlist(&self, playlist_id: Uuid) -> AppResult<Playlist> {
        self.uow.run(|repos| load_playlist(repos, playlist_id))
    }

    /// Memberships, by track number
    pub fn list_songs(&self, playlist_id: Uuid) -> AppResult<Vec<PlaylistSong>> {
        self.uow.run(|repos| {
            load_playlist(repos, playlist_id)?;
            repos.playlists().list_songs(playlist_id)
        })
    }

    /// Each song is its own group
    pub fn add_songs(&self, request: AddToPlaylistRequest) -> AppResult<DuplicateResolution> {
        self.add_candidates(&request, |repos, song_id| {
            repos
                .songs()
                .get_by_id(song_id)?
                .ok_or_else(|| AppError::not_found(format!("song {}", song_id)))?;
            Ok(vec![Candidate::new(song_id, song_id)])
        })
    }

    /// Every song of every album, grouped by album in track order
    pub fn add_albums(&self, request: AddToPlaylistRequest) -> AppResult<DuplicateResolution> {
        self.add_candidates(&request, |repos, album_id| {
            repos
                .albums()
                .get_by_id(album_id)?
                .ok_or_else(|| AppError::not_found(format!("album {}", album_id)))?;
            let songs = repos.songs().list_by_album(album_id)?;
            Ok(songs
                .iter()
                .map(|song| Candidate::new(song.id, album_id))
                .collect())
        })
    }

    /// Every song of every artist, grouped by artist
    pub fn add_artists(&self, request: AddToPlaylistRequest) -> AppResult<DuplicateResolution> {
        self.add_candidates(&request, |repos, artist_id| {
            repos
                .artists()
                .get_by_id(artist_id)?
                .ok_or_else(|| AppError::not_found(format!("artist {}", artist_id)))?;
            let songs = repos.songs().list_by_artist(artist_id)?;
            Ok(songs
                .iter()
                .map(|song| Candidate::new(song.id, artist_id))
                .collect())
        })
    }

    pub fn move_song(
        &self,
        playlist_id: Uuid,
        membership_id: Uuid,
        over_membership_id: Uuid,
    ) -> AppResult<()> {
        let changed = self.uow.run(|repos| {
            load_playlist(repos, playlist_id)?;
            let mut memberships = repos.playlists().list_songs(playlist_id)?;
            let changed = move_within_collection(&mut memberships, membership_id, over_membership_id)?;
            save_memberships(repos, &memberships, &changed)?;
            Ok(changed)
        })?;

        self.event_bus.emit(CollectionReordered::new(
            CollectionKind::Playlist,
            playlist_id,
            changed,
        ));
        Ok(())
    }

    /// Remove memberships and close the gaps
    pub fn remove_songs(&self, playlist_id: Uuid, membership_ids: &[Uuid]) -> AppResult<()> {
        let removing: HashSet<Uuid> = membership_ids.iter().copied().collect();

        let changed = self.uow.run(|repos| {
            load_playlist(repos, playlist_id)?;
            let memberships = repos.playlists().list_songs(playlist_id)?;

            for membership_id in &removing {
                if !memberships.iter().any(|m| m.id == *membership_id) {
                    return Err(AppError::not_found(format!(
                        "membership {} in playlist {}",
                        membership_id, playlist_id
                    )));
                }
                repos.playlists().delete_song(*membership_id)?;
            }

            let mut survivors: Vec<PlaylistSong> = memberships
                .into_iter()
                .filter(|m| !removing.contains(&m.id))
                .collect();
            let changed = renumber_after_removal(&mut survivors, PositionBase::One);
            save_memberships(repos, &survivors, &changed)?;
            Ok(changed)
        })?;

        self.event_bus.emit(PlaylistSongsRemoved::new(
            playlist_id,
            removing.into_iter().collect(),
        ));
        if !changed.is_empty() {
            self.event_bus.emit(CollectionReordered::new(
                CollectionKind::Playlist,
                playlist_id,
                changed,
            ));
        }
        Ok(())
    }

    pub fn delete_playlist(&self, playlist_id: Uuid) -> AppResult<()> {
        self.uow.run(|repos| {
            load_playlist(repos, playlist_id)?;
            repos.playlists().delete(playlist_id)?;
            Ok(())
        })?;

        log::info!("Deleted playlist {}", playlist_id);
        Ok(())
    }

    /// Expand each requested id into candidates, resolve duplicates against
    /// the playlist and append whatever the resolution selected.
    fn add_candidates<F>(
        &self,
        request: &AddToPlaylistRequest,
        mut expand: F,
    ) -> AppResult<DuplicateResolution>
    where
        F: FnMut(&dyn RepositoryFactory, Uuid) -> AppResult<Vec<Candidate>>,
    {
        let playlist_id = request.playlist_id;
        let resolution = self.uow.run(|repos| {
            load_playlist(repos, playlist_id)?;

            let mut candidates = Vec::new();
            for id in &request.ids {
                candidates.extend(expand(repos, *id)?);
            }

            let existing = repos.playlists().list_songs(playlist_id)?;
            let existing_song_ids: HashSet<Uuid> = existing.iter().map(|m| m.song_id).collect();
            let resolution = partition_and_filter(&candidates, &existing_song_ids, request.force_add)?;

            let memberships =
                assign_playlist_positions(playlist_id, &existing, &resolution.added_song_ids);
            for membership in &memberships {
                repos.playlists().save_song(membership)?;
            }
            Ok(resolution)
        })?;

        if resolution.success {
            log::debug!(
                "Added {} songs to playlist {} ({} duplicates)",
                resolution.added_song_ids.len(),
                playlist_id,
                resolution.duplicate_song_ids.len()
            );
        } else {
            log::debug!(
                "Playlist {} already holds {} of the requested songs, nothing added",
                playlist_id,
                resolution.duplicate_song_ids.len()
            );
        }

        if !resolution.added_song_ids.is_empty() {
            self.event_bus.emit(PlaylistSongsAdded::new(
                playlist_id,
                resolution.added_song_ids.clone(),
            ));
        }
        Ok(resolution)
    }
}

fn load_playlist(repos: &dyn RepositoryFactory, playlist_id: Uuid) -> AppResult<Playlist> {
    repos
        .playlists()
        .get_by_id(playlist_id)?
        .ok_or_else(|| AppError::not_found(format!("playlist {}", playlist_id)))
}

fn save_memberships(
    repos: &dyn RepositoryFactory,
    memberships: &[PlaylistSong],
    changed: &[Uuid],
) -> AppResult<()> {
    let playlists = repos.playlists();
    for membership in memberships.iter().filter(|m| changed.contains(&m.id)) {
        playlists.save_song(membership)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, SqliteUnitOfWork};
    use crate::domain::album::Album;
    use crate::domain::artist::Artist;
    use crate::domain::ordering::is_contiguous;
    use crate::domain::song::Song;
    use crate::error::ErrorKind;

    struct Fixture {
        uow: Arc<dyn UnitOfWork>,
        bus: Arc<EventBus>,
        service: PlaylistService,
        user: Uuid,
        playlist: Playlist,
    }

    fn fixture() -> Fixture {
        let uow: Arc<dyn UnitOfWork> =
            Arc::new(SqliteUnitOfWork::new(create_memory_pool().unwrap()));
        let bus = Arc::new(EventBus::new());
        let service = PlaylistService::new(Arc::clone(&uow), Arc::clone(&bus));
        let user = Uuid::new_v4();
        let playlist = service
            .create_playlist(CreatePlaylistRequest {
                user_id: user,
                title: "Friday gig".to_string(),
                description: None,
            })
            .unwrap();
        Fixture {
            uow,
            bus,
            service,
            user,
            playlist,
        }
    }

    fn songs(fx: &Fixture, count: usize) -> Vec<Uuid> {
        let songs: Vec<Song> = (0..count)
            .map(|index| Song::new(fx.user, format!("Song {}", index)))
            .collect();
        fx.uow
            .run(|repos| {
                for song in &songs {
                    repos.songs().save(song)?;
                }
                Ok(())
            })
            .unwrap();
        songs.iter().map(|song| song.id).collect()
    }

    /// Album holding `song_ids` in that track order
    fn album_with(fx: &Fixture, song_ids: &[Uuid]) -> Uuid {
        let album = Album::new(fx.user, "Album".to_string());
        fx.uow
            .run(|repos| {
                repos.albums().save(&album)?;
                for (index, song_id) in song_ids.iter().enumerate() {
                    let mut song = repos.songs().get_by_id(*song_id)?.unwrap();
                    song.attach_to_album(album.id, index as u32 + 1);
                    repos.songs().save(&song)?;
                }
                Ok(())
            })
            .unwrap();
        album.id
    }

    fn request(fx: &Fixture, ids: Vec<Uuid>, force_add: Option<bool>) -> AddToPlaylistRequest {
        AddToPlaylistRequest {
            playlist_id: fx.playlist.id,
            ids,
            force_add,
        }
    }

    fn playlist_song_ids(fx: &Fixture) -> Vec<Uuid> {
        fx.service
            .list_songs(fx.playlist.id)
            .unwrap()
            .iter()
            .map(|m| m.song_id)
            .collect()
    }

    #[test]
    fn test_add_songs_without_duplicates() {
        let fx = fixture();
        let s = songs(&fx, 3);

        let resolution = fx.service.add_songs(request(&fx, s.clone(), None)).unwrap();

        assert!(resolution.success);
        assert_eq!(resolution.added_song_ids, s);
        let memberships = fx.service.list_songs(fx.playlist.id).unwrap();
        assert!(is_contiguous(&memberships, PositionBase::One));
        assert_eq!(memberships[0].song_track_no, 1);
    }

    #[test]
    fn test_force_add_without_duplicates_is_bad_request() {
        let fx = fixture();
        let s = songs(&fx, 2);

        let result = fx.service.add_songs(request(&fx, s, Some(true)));

        assert_eq!(result.unwrap_err().kind(), ErrorKind::BadRequest);
        assert!(playlist_song_ids(&fx).is_empty());
    }

    #[test]
    fn test_duplicates_without_choice_add_nothing() {
        let fx = fixture();
        let s = songs(&fx, 2);
        fx.service.add_songs(request(&fx, vec![s[0]], None)).unwrap();

        let resolution = fx.service.add_songs(request(&fx, s.clone(), None)).unwrap();

        assert!(!resolution.success);
        assert_eq!(resolution.duplicate_song_ids, vec![s[0]]);
        assert_eq!(playlist_song_ids(&fx), vec![s[0]]);
    }

    #[test]
    fn test_add_albums_skips_duplicates() {
        let fx = fixture();
        let s = songs(&fx, 4);
        let first_album = album_with(&fx, &[s[0], s[1]]);
        let second_album = album_with(&fx, &[s[2]]);
        let third_album = album_with(&fx, &[s[3]]);
        fx.service
            .add_songs(request(&fx, vec![s[1], s[3]], None))
            .unwrap();

        let resolution = fx
            .service
            .add_albums(request(
                &fx,
                vec![first_album, second_album, third_album],
                Some(false),
            ))
            .unwrap();

        assert!(resolution.success);
        assert_eq!(resolution.added_song_ids, vec![s[0], s[2]]);
        assert_eq!(resolution.duplicate_song_ids, vec![s[1], s[3]]);
        assert_eq!(resolution.duplicate_group_ids, vec![third_album]);
        assert_eq!(playlist_song_ids(&fx), vec![s[1], s[3], s[0], s[2]]);
    }

    #[test]
    fn test_add_albums_force_adds_duplicates() {
        let fx = fixture();
        let s = songs(&fx, 2);
        let album = album_with(&fx, &s);
        fx.service.add_songs(request(&fx, vec![s[0]], None)).unwrap();

        let resolution = fx
            .service
            .add_albums(request(&fx, vec![album], Some(true)))
            .unwrap();

        assert!(resolution.success);
        assert_eq!(resolution.added_song_ids, s);
        assert_eq!(playlist_song_ids(&fx), vec![s[0], s[0], s[1]]);
    }

    #[test]
    fn test_add_artists_uses_artist_songs() {
        let fx = fixture();
        let artist = Artist::new(fx.user, "Metallica".to_string());
        let mut song = Song::new(fx.user, "Blackened".to_string());
        song.artist_id = Some(artist.id);
        fx.uow
            .run(|repos| {
                repos.artists().save(&artist)?;
                repos.songs().save(&song)
            })
            .unwrap();

        let resolution = fx
            .service
            .add_artists(request(&fx, vec![artist.id], None))
            .unwrap();

        assert_eq!(resolution.added_song_ids, vec![song.id]);
        assert_eq!(
            fx.bus.get_event_log().last().unwrap().event_type,
            "PlaylistSongsAdded"
        );
    }

    #[test]
    fn test_unknown_album_is_not_found() {
        let fx = fixture();

        let result = fx.service.add_albums(request(&fx, vec![Uuid::new_v4()], None));

        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_move_and_remove_keep_positions_contiguous() {
        let fx = fixture();
        let s = songs(&fx, 4);
        fx.service.add_songs(request(&fx, s.clone(), None)).unwrap();
        let memberships = fx.service.list_songs(fx.playlist.id).unwrap();

        fx.service
            .move_song(fx.playlist.id, memberships[3].id, memberships[0].id)
            .unwrap();
        assert_eq!(playlist_song_ids(&fx), vec![s[3], s[0], s[1], s[2]]);

        fx.service
            .remove_songs(fx.playlist.id, &[memberships[0].id])
            .unwrap();
        let remaining = fx.service.list_songs(fx.playlist.id).unwrap();
        assert_eq!(playlist_song_ids(&fx), vec![s[3], s[1], s[2]]);
        assert!(is_contiguous(&remaining, PositionBase::One));
    }

    #[test]
    fn test_delete_playlist() {
        let fx = fixture();

        fx.service.delete_playlist(fx.playlist.id).unwrap();

        assert_eq!(
            fx.service.get_playlist(fx.playlist.id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
