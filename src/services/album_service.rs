// src/services/album_service.rs
//
// Albums and their 1-based track listing. A song is on at most one album;
// the track number lives on the song.
use crate::db::UnitOfWork;
use crate::domain::album::{validate_album, Album};
use crate::domain::ordering::{
    append_at_end, move_within_collection, renumber_after_removal, PositionBase,
};
use crate::domain::song::Song;
use crate::error::{AppError, AppResult};
use crate::events::{CollectionKind, CollectionReordered, EventBus};
use crate::repositories::RepositoryFactory;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateAlbumRequest {
    pub user_id: Uuid,
    pub title: String,
    pub artist_id: Option<Uuid>,
    pub release_date: Option<DateTime<Utc>>,
}

pub struct AlbumService {
    uow: Arc<dyn UnitOfWork>,
    event_bus: Arc<EventBus>,
}

impl AlbumService {
    pub fn new(uow: Arc<dyn UnitOfWork>, event_bus: Arc<EventBus>) -> Self {
        Self { uow, event_bus }
    }

    pub fn create_album(&self, request: CreateAlbumRequest) -> AppResult<Album> {
        let mut album = Album::new(request.user_id, request.title);
        album.artist_id = request.artist_id;
        album.release_date = request.release_date;
        validate_album(&album)?;

        self.uow.run(|repos| {
            if let Some(artist_id) = album.artist_id {
                repos
                    .artists()
                    .get_by_id(artist_id)?
                    .ok_or_else(|| AppError::not_found(format!("artist {}", artist_id)))?;
            }
            repos.albums().save(&album)
        })?;

        log::info!("Created album {} ({})", album.id, album.title);
        Ok(album)
    }

    pub fn get_album(&self, album_id: Uuid) -> AppResult<Album> {
        self.uow.run(|repos| load_album(repos, album_id))
    }

    /// Songs of an album, by track number
    pub fn list_songs(&self, album_id: Uuid) -> AppResult<Vec<Song>> {
        self.uow.run(|repos| {
            load_album(repos, album_id)?;
            repos.songs().list_by_album(album_id)
        })
    }

    /// Append songs to the album in the given order.
    ///
    /// Songs already on an album are rejected; move them off it first.
    pub fn add_songs(&self, album_id: Uuid, song_ids: &[Uuid]) -> AppResult<Vec<Song>> {
        let mut seen = HashSet::new();
        let unique: Vec<Uuid> = song_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        self.uow.run(|repos| {
            load_album(repos, album_id)?;
            let mut next = append_at_end(&repos.songs().list_by_album(album_id)?, PositionBase::One);

            let mut added = Vec::with_capacity(unique.len());
            for song_id in &unique {
                let mut song = repos
                    .songs()
                    .get_by_id(*song_id)?
                    .ok_or_else(|| AppError::not_found(format!("song {}", song_id)))?;
                if let Some(current) = song.album_id {
                    return Err(AppError::Conflict(format!(
                        "Song {} is already on album {}",
                        song_id, current
                    )));
                }

                song.attach_to_album(album_id, next);
                repos.songs().save(&song)?;
                next += 1;
                added.push(song);
            }
            Ok(added)
        })
    }

    pub fn move_song(&self, album_id: Uuid, song_id: Uuid, over_song_id: Uuid) -> AppResult<()> {
        let changed = self.uow.run(|repos| {
            load_album(repos, album_id)?;
            let mut tracks = repos.songs().list_by_album(album_id)?;
            let changed = move_within_collection(&mut tracks, song_id, over_song_id)?;
            save_tracks(repos, &tracks, &changed)?;
            Ok(changed)
        })?;

        self.event_bus.emit(CollectionReordered::new(
            CollectionKind::Album,
            album_id,
            changed,
        ));
        Ok(())
    }

    /// Take songs off the album and close the gaps
    pub fn remove_songs(&self, album_id: Uuid, song_ids: &[Uuid]) -> AppResult<()> {
        let removing: HashSet<Uuid> = song_ids.iter().copied().collect();

        let changed = self.uow.run(|repos| {
            load_album(repos, album_id)?;
            let tracks = repos.songs().list_by_album(album_id)?;

            for song_id in &removing {
                let mut song = tracks
                    .iter()
                    .find(|track| track.id == *song_id)
                    .cloned()
                    .ok_or_else(|| {
                        AppError::not_found(format!("song {} on album {}", song_id, album_id))
                    })?;
                song.detach_from_album();
                repos.songs().save(&song)?;
            }

            let mut survivors: Vec<Song> = tracks
                .into_iter()
                .filter(|track| !removing.contains(&track.id))
                .collect();
            let changed = renumber_after_removal(&mut survivors, PositionBase::One);
            save_tracks(repos, &survivors, &changed)?;
            Ok(changed)
        })?;

        if !changed.is_empty() {
            self.event_bus.emit(CollectionReordered::new(
                CollectionKind::Album,
                album_id,
                changed,
            ));
        }
        Ok(())
    }

    /// Delete the album; its songs stay in the repertoire without an album
    pub fn delete_album(&self, album_id: Uuid) -> AppResult<()> {
        let detached = self.uow.run(|repos| {
            load_album(repos, album_id)?;
            let tracks = repos.songs().list_by_album(album_id)?;
            for mut song in tracks.iter().cloned() {
                song.detach_from_album();
                repos.songs().save(&song)?;
            }
            repos.albums().delete(album_id)?;
            Ok(tracks.len())
        })?;

        log::info!("Deleted album {} ({} songs detached)", album_id, detached);
        Ok(())
    }
}

fn load_album(repos: &dyn RepositoryFactory, album_id: Uuid) -> AppResult<Album> {
    repos
        .albums()
        .get_by_id(album_id)?
        .ok_or_else(|| AppError::not_found(format!("album {}", album_id)))
}

fn save_tracks(repos: &dyn RepositoryFactory, tracks: &[Song], changed: &[Uuid]) -> AppResult<()> {
    let songs = repos.songs();
    for track in tracks.iter().filter(|track| changed.contains(&track.id)) {
        songs.save(track)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, SqliteUnitOfWork};
    use crate::domain::ordering::is_contiguous;
    use crate::error::ErrorKind;

    struct Fixture {
        uow: Arc<dyn UnitOfWork>,
        bus: Arc<EventBus>,
        service: AlbumService,
        album: Album,
        songs: Vec<Song>,
    }

    /// Album with `count` songs at track numbers 1..=count
    fn fixture(count: usize) -> Fixture {
        let uow: Arc<dyn UnitOfWork> =
            Arc::new(SqliteUnitOfWork::new(create_memory_pool().unwrap()));
        let bus = Arc::new(EventBus::new());
        let service = AlbumService::new(Arc::clone(&uow), Arc::clone(&bus));
        let user = Uuid::new_v4();

        let album = service
            .create_album(CreateAlbumRequest {
                user_id: user,
                title: "Kill 'Em All".to_string(),
                artist_id: None,
                release_date: None,
            })
            .unwrap();

        let songs: Vec<Song> = (0..count)
            .map(|index| Song::new(user, format!("Track {}", index + 1)))
            .collect();
        uow.run(|repos| {
            for song in &songs {
                repos.songs().save(song)?;
            }
            Ok(())
        })
        .unwrap();
        let ids: Vec<Uuid> = songs.iter().map(|song| song.id).collect();
        let songs = service.add_songs(album.id, &ids).unwrap();

        Fixture {
            uow,
            bus,
            service,
            album,
            songs,
        }
    }

    fn track_ids(fx: &Fixture) -> Vec<Uuid> {
        fx.service
            .list_songs(fx.album.id)
            .unwrap()
            .iter()
            .map(|song| song.id)
            .collect()
    }

    #[test]
    fn test_add_songs_appends_in_order() {
        let fx = fixture(3);

        let tracks = fx.service.list_songs(fx.album.id).unwrap();

        let numbers: Vec<Option<u32>> = tracks.iter().map(|t| t.album_track_no).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(tracks[0].id, fx.songs[0].id);
    }

    #[test]
    fn test_adding_song_already_on_album_is_conflict() {
        let fx = fixture(1);

        let result = fx.service.add_songs(fx.album.id, &[fx.songs[0].id]);

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_move_song_over_later_track() {
        let fx = fixture(5);
        let s: Vec<Uuid> = fx.songs.iter().map(|song| song.id).collect();

        fx.service.move_song(fx.album.id, s[1], s[3]).unwrap();

        assert_eq!(track_ids(&fx), vec![s[0], s[2], s[3], s[1], s[4]]);
        let tracks = fx.service.list_songs(fx.album.id).unwrap();
        assert_eq!(tracks[3].album_track_no, Some(4));
        assert!(is_contiguous(&tracks, PositionBase::One));
        assert_eq!(
            fx.bus.get_event_log().last().unwrap().event_type,
            "CollectionReordered"
        );
    }

    #[test]
    fn test_move_song_not_on_album_is_not_found() {
        let fx = fixture(2);

        let result = fx.service.move_song(fx.album.id, fx.songs[0].id, Uuid::new_v4());

        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_remove_songs_renumbers() {
        let fx = fixture(4);
        let s: Vec<Uuid> = fx.songs.iter().map(|song| song.id).collect();

        fx.service.remove_songs(fx.album.id, &[s[0], s[2]]).unwrap();

        let tracks = fx.service.list_songs(fx.album.id).unwrap();
        assert_eq!(track_ids(&fx), vec![s[1], s[3]]);
        assert!(is_contiguous(&tracks, PositionBase::One));
        let removed = fx.uow.run(|repos| repos.songs().get_by_id(s[0])).unwrap().unwrap();
        assert_eq!(removed.album_id, None);
        assert_eq!(removed.album_track_no, None);
    }

    #[test]
    fn test_delete_album_detaches_songs() {
        let fx = fixture(2);

        fx.service.delete_album(fx.album.id).unwrap();

        let song = fx
            .uow
            .run(|repos| repos.songs().get_by_id(fx.songs[1].id))
            .unwrap()
            .unwrap();
        assert_eq!(song.album_id, None);
        assert_eq!(song.album_track_no, None);
        assert_eq!(
            fx.service.get_album(fx.album.id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
