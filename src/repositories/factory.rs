// src/repositories/factory.rs
//
// Hands out repositories that all share one connection, so that work done
// through them lands in the same transaction.

use rusqlite::Connection;

use crate::repositories::album_repository::{AlbumRepository, SqliteAlbumRepository};
use crate::repositories::arrangement_repository::{
    ArrangementRepository, SqliteArrangementRepository,
};
use crate::repositories::artist_repository::{ArtistRepository, SqliteArtistRepository};
use crate::repositories::history_repository::{
    SectionHistoryRepository, SqliteSectionHistoryRepository,
};
use crate::repositories::playlist_repository::{PlaylistRepository, SqlitePlaylistRepository};
use crate::repositories::reference_repository::{ReferenceRepository, SqliteReferenceRepository};
use crate::repositories::section_repository::{SongSectionRepository, SqliteSongSectionRepository};
use crate::repositories::song_repository::{SongRepository, SqliteSongRepository};

/// Repository handles scoped to a single unit of work
pub trait RepositoryFactory {
    fn songs(&self) -> Box<dyn SongRepository + '_>;
    fn sections(&self) -> Box<dyn SongSectionRepository + '_>;
    fn history(&self) -> Box<dyn SectionHistoryRepository + '_>;
    fn albums(&self) -> Box<dyn AlbumRepository + '_>;
    fn artists(&self) -> Box<dyn ArtistRepository + '_>;
    fn playlists(&self) -> Box<dyn PlaylistRepository + '_>;
    fn arrangements(&self) -> Box<dyn ArrangementRepository + '_>;
    fn references(&self) -> Box<dyn ReferenceRepository + '_>;
}

pub struct SqliteRepositoryFactory<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteRepositoryFactory<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl RepositoryFactory for SqliteRepositoryFactory<'_> {
    fn songs(&self) -> Box<dyn SongRepository + '_> {
        Box::new(SqliteSongRepository::new(self.conn))
    }

    fn sections(&self) -> Box<dyn SongSectionRepository + '_> {
        Box::new(SqliteSongSectionRepository::new(self.conn))
    }

    fn history(&self) -> Box<dyn SectionHistoryRepository + '_> {
        Box::new(SqliteSectionHistoryRepository::new(self.conn))
    }

    fn albums(&self) -> Box<dyn AlbumRepository + '_> {
        Box::new(SqliteAlbumRepository::new(self.conn))
    }

    fn artists(&self) -> Box<dyn ArtistRepository + '_> {
        Box::new(SqliteArtistRepository::new(self.conn))
    }

    fn playlists(&self) -> Box<dyn PlaylistRepository + '_> {
        Box::new(SqlitePlaylistRepository::new(self.conn))
    }

    fn arrangements(&self) -> Box<dyn ArrangementRepository + '_> {
        Box::new(SqliteArrangementRepository::new(self.conn))
    }

    fn references(&self) -> Box<dyn ReferenceRepository + '_> {
        Box::new(SqliteReferenceRepository::new(self.conn))
    }
}
