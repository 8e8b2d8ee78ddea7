// src/services/song_service.rs
//
// Songs, their sections and rehearsal tracking.
//
// Every change to a section's rehearsals or confidence follows the same
// sequence inside one unit of work:
//   1. append the history record
//   2. reload the section's history for that property
//   3. recompute the matching score
//   4. recompute the section's progress
//   5. recompute the song's aggregate over all its sections
//   6. persist section and song
use crate::db::UnitOfWork;
use crate::domain::ordering::{
    append_at_end, move_within_collection, renumber_after_removal, PositionBase,
};
use crate::domain::progress::ProgressProcessor;
use crate::domain::reference::ReferenceKind;
use crate::domain::song::{
    validate_section, validate_song, HistoryProperty, SectionHistory, Song, SongSection,
};
use crate::domain::statistics::{recompute_parent_stats, ParentStats};
use crate::domain::DomainError;
use crate::error::{AppError, AppResult};
use crate::events::{
    CollectionKind, CollectionReordered, EventBus, SectionsRehearsed, SongCreated, SongDeleted,
    SongStatsRecomputed,
};
use crate::repositories::RepositoryFactory;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateSongRequest {
    pub user_id: Uuid,
    pub title: String,
    pub artist_id: Option<Uuid>,
    /// Appended at the end of this album when set
    pub album_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CreateSectionRequest {
    pub song_id: Uuid,
    pub name: String,
    pub section_type_id: Option<Uuid>,
    pub band_member_id: Option<Uuid>,
    pub confidence: u32,
    pub rehearsals: u32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSectionRequest {
    pub section_id: Uuid,
    pub name: Option<String>,
    pub section_type_id: Option<Option<Uuid>>,
    pub band_member_id: Option<Option<Uuid>>,
    pub confidence: Option<u32>,
    /// Must not be lower than the current count
    pub rehearsals: Option<u32>,
}

pub struct SongService {
    uow: Arc<dyn UnitOfWork>,
    processor: Arc<dyn ProgressProcessor>,
    event_bus: Arc<EventBus>,
}

impl SongService {
    pub fn new(
        uow: Arc<dyn UnitOfWork>,
        processor: Arc<dyn ProgressProcessor>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            uow,
            processor,
            event_bus,
        }
    }

    pub fn create_song(&self, request: CreateSongRequest) -> AppResult<Song> {
        let song = self.uow.run(|repos| {
            let mut song = Song::new(request.user_id, request.title.clone());

            if let Some(artist_id) = request.artist_id {
                repos
                    .artists()
                    .get_by_id(artist_id)?
                    .ok_or_else(|| AppError::not_found(format!("artist {}", artist_id)))?;
                song.artist_id = Some(artist_id);
            }

            if let Some(album_id) = request.album_id {
                repos
                    .albums()
                    .get_by_id(album_id)?
                    .ok_or_else(|| AppError::not_found(format!("album {}", album_id)))?;
                let tracks = repos.songs().list_by_album(album_id)?;
                song.attach_to_album(album_id, append_at_end(&tracks, PositionBase::One));
            }

            validate_song(&song)?;
            repos.songs().save(&song)?;
            Ok(song)
        })?;

        log::info!("Created song {} ({})", song.id, song.title);
        self.event_bus
            .emit(SongCreated::new(song.id, song.user_id, song.title.clone()));
        Ok(song)
    }

    pub fn get_song(&self, song_id: Uuid) -> AppResult<Song> {
        self.uow.run(|repos| load_song(repos, song_id))
    }

    /// Sections of a song, in order
    pub fn list_sections(&self, song_id: Uuid) -> AppResult<Vec<SongSection>> {
        self.uow.run(|repos| {
            load_song(repos, song_id)?;
            repos.sections().list_by_song(song_id)
        })
    }

    /// Delete a song with its sections, history and arrangements.
    ///
    /// The album it was on and every playlist holding it are renumbered.
    pub fn delete_song(&self, song_id: Uuid) -> AppResult<()> {
        let (album_id, playlist_ids) = self.uow.run(|repos| {
            let song = load_song(repos, song_id)?;
            let playlist_ids = repos.playlists().list_playlist_ids_for_song(song_id)?;

            repos.songs().delete(song_id)?;

            if let Some(album_id) = song.album_id {
                let mut tracks = repos.songs().list_by_album(album_id)?;
                let changed = renumber_after_removal(&mut tracks, PositionBase::One);
                for track in tracks.iter().filter(|t| changed.contains(&t.id)) {
                    repos.songs().save(track)?;
                }
            }

            for playlist_id in &playlist_ids {
                let mut memberships = repos.playlists().list_songs(*playlist_id)?;
                let changed = renumber_after_removal(&mut memberships, PositionBase::One);
                for membership in memberships.iter().filter(|m| changed.contains(&m.id)) {
                    repos.playlists().save_song(membership)?;
                }
            }

            Ok((song.album_id, playlist_ids))
        })?;

        log::info!(
            "Deleted song {} (renumbered {} playlists)",
            song_id,
            playlist_ids.len()
        );
        self.event_bus
            .emit(SongDeleted::new(song_id, album_id, playlist_ids));
        Ok(())
    }

    /// Append a section; its initial values are recorded as history from 0
    pub fn create_section(&self, request: CreateSectionRequest) -> AppResult<SongSection> {
        let now = Utc::now();
        let (section, stats) = self.uow.run(|repos| {
            let song = load_song(repos, request.song_id)?;
            if let Some(member_id) = request.band_member_id {
                ensure_band_member(repos, &song, member_id)?;
            }
            if let Some(type_id) = request.section_type_id {
                ensure_section_type(repos, &song, type_id)?;
            }

            let existing = repos.sections().list_by_song(song.id)?;
            let mut section = SongSection::new(
                song.id,
                request.name.clone(),
                append_at_end(&existing, PositionBase::Zero),
            );
            section.section_type_id = request.section_type_id;
            section.band_member_id = request.band_member_id;

            let records: Vec<SectionHistory> = [
                section.record_rehearsals(request.rehearsals, now)?,
                section.record_confidence(request.confidence, now)?,
            ]
            .into_iter()
            .flatten()
            .collect();

            validate_section(&section)?;
            repos.sections().save(&section)?;
            self.apply_history(repos, &mut section, &records)?;

            let rehearsed_at = (request.rehearsals > 0).then_some(now);
            let stats = recompute_song_stats(repos, song.id, rehearsed_at)?;
            Ok((section, stats))
        })?;

        log::debug!("Created section {} on song {}", section.id, section.song_id);
        self.event_bus
            .emit(SongStatsRecomputed::new(section.song_id, stats));
        Ok(section)
    }

    /// Edit a section.
    ///
    /// A lower rehearsal count is rejected before anything else is looked
    /// at. Rehearsal and confidence changes require a band member that
    /// belongs to the song's artist, when one is assigned.
    pub fn update_section(&self, request: UpdateSectionRequest) -> AppResult<SongSection> {
        let now = Utc::now();
        let (section, stats) = self.uow.run(|repos| {
            let mut section = repos
                .sections()
                .get_by_id(request.section_id)?
                .ok_or_else(|| AppError::not_found(format!("section {}", request.section_id)))?;

            let mut records = Vec::new();
            if let Some(rehearsals) = request.rehearsals {
                records.extend(section.record_rehearsals(rehearsals, now)?);
            }
            if let Some(confidence) = request.confidence {
                records.extend(section.record_confidence(confidence, now)?);
            }

            let song = load_song(repos, section.song_id)?;
            if let Some(band_member_id) = request.band_member_id {
                section.band_member_id = band_member_id;
            }
            if request.band_member_id.is_some() || !records.is_empty() {
                if let Some(member_id) = section.band_member_id {
                    ensure_band_member(repos, &song, member_id)?;
                }
            }

            if let Some(name) = &request.name {
                section.name = name.clone();
            }
            if let Some(section_type_id) = request.section_type_id {
                if let Some(type_id) = section_type_id {
                    ensure_section_type(repos, &song, type_id)?;
                }
                section.section_type_id = section_type_id;
            }
            section.updated_at = now;

            validate_section(&section)?;
            repos.sections().save(&section)?;
            self.apply_history(repos, &mut section, &records)?;

            let rehearsed = records
                .iter()
                .any(|record| record.property == HistoryProperty::Rehearsals);
            let stats = recompute_song_stats(repos, song.id, rehearsed.then_some(now))?;
            Ok((section, stats))
        })?;

        self.event_bus
            .emit(SongStatsRecomputed::new(section.song_id, stats));
        Ok(section)
    }

    /// Delete sections of one song and close the gaps
    pub fn delete_sections(&self, song_id: Uuid, section_ids: &[Uuid]) -> AppResult<()> {
        let (changed, stats) = self.uow.run(|repos| {
            load_song(repos, song_id)?;
            let sections = repos.sections().list_by_song(song_id)?;
            let removing: HashSet<Uuid> = section_ids.iter().copied().collect();

            for section_id in &removing {
                if !sections.iter().any(|section| section.id == *section_id) {
                    return Err(AppError::not_found(format!(
                        "section {} on song {}",
                        section_id, song_id
                    )));
                }
                repos.sections().delete(*section_id)?;
            }

            let mut survivors: Vec<SongSection> = sections
                .into_iter()
                .filter(|section| !removing.contains(&section.id))
                .collect();
            let changed = renumber_after_removal(&mut survivors, PositionBase::Zero);
            for section in survivors.iter().filter(|s| changed.contains(&s.id)) {
                repos.sections().save(section)?;
            }

            let stats = recompute_song_stats(repos, song_id, None)?;
            Ok((changed, stats))
        })?;

        if !changed.is_empty() {
            self.event_bus.emit(CollectionReordered::new(
                CollectionKind::SongSections,
                song_id,
                changed,
            ));
        }
        self.event_bus.emit(SongStatsRecomputed::new(song_id, stats));
        Ok(())
    }

    pub fn move_section(
        &self,
        song_id: Uuid,
        section_id: Uuid,
        over_section_id: Uuid,
    ) -> AppResult<()> {
        let changed = self.uow.run(|repos| {
            let mut sections = repos.sections().list_by_song(song_id)?;
            let changed = move_within_collection(&mut sections, section_id, over_section_id)?;
            for section in sections.iter().filter(|s| changed.contains(&s.id)) {
                repos.sections().save(section)?;
            }
            Ok(changed)
        })?;

        self.event_bus.emit(CollectionReordered::new(
            CollectionKind::SongSections,
            song_id,
            changed,
        ));
        Ok(())
    }

    /// One more rehearsal on every section of a song
    pub fn add_perfect_rehearsal(&self, song_id: Uuid) -> AppResult<Song> {
        let now = Utc::now();
        let (song, stats, section_count) = self.uow.run(|repos| {
            let (stats, section_count) = self.rehearse_song(repos, song_id, now)?;
            Ok((load_song(repos, song_id)?, stats, section_count))
        })?;

        self.event_bus
            .emit(SectionsRehearsed::new(vec![song_id], section_count));
        self.event_bus.emit(SongStatsRecomputed::new(song_id, stats));
        Ok(song)
    }

    /// One more rehearsal on every section of every song, atomically
    pub fn bulk_rehearsals(&self, song_ids: &[Uuid]) -> AppResult<()> {
        let now = Utc::now();
        let mut seen = HashSet::new();
        let unique: Vec<Uuid> = song_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let outcomes = self.uow.run(|repos| {
            unique
                .iter()
                .map(|song_id| {
                    self.rehearse_song(repos, *song_id, now)
                        .map(|(stats, count)| (*song_id, stats, count))
                })
                .collect::<AppResult<Vec<_>>>()
        })?;

        let section_count: usize = outcomes.iter().map(|(_, _, count)| count).sum();
        log::info!(
            "Rehearsed {} sections across {} songs",
            section_count,
            outcomes.len()
        );
        self.event_bus
            .emit(SectionsRehearsed::new(unique.clone(), section_count));
        for (song_id, stats, _) in outcomes {
            self.event_bus.emit(SongStatsRecomputed::new(song_id, stats));
        }
        Ok(())
    }

    fn rehearse_song(
        &self,
        repos: &dyn RepositoryFactory,
        song_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<(ParentStats, usize)> {
        load_song(repos, song_id)?;
        let sections = repos.sections().list_by_song(song_id)?;
        let section_count = sections.len();

        for mut section in sections {
            let next = section.rehearsals.saturating_add(1);
            let records: Vec<SectionHistory> =
                section.record_rehearsals(next, now)?.into_iter().collect();
            repos.sections().save(&section)?;
            self.apply_history(repos, &mut section, &records)?;
        }

        let rehearsed_at = (section_count > 0).then_some(now);
        let stats = recompute_song_stats(repos, song_id, rehearsed_at)?;
        Ok((stats, section_count))
    }

    /// Steps 1 to 4 for freshly recorded changes; the section row must
    /// already exist.
    fn apply_history(
        &self,
        repos: &dyn RepositoryFactory,
        section: &mut SongSection,
        records: &[SectionHistory],
    ) -> AppResult<()> {
        let history = repos.history();
        for record in records {
            history.append(record)?;
            let full = history.list_by_section(section.id, record.property)?;
            match record.property {
                HistoryProperty::Rehearsals => {
                    section.rehearsals_score = self.processor.compute_rehearsals_score(&full);
                }
                HistoryProperty::Confidence => {
                    section.confidence_score = self.processor.compute_confidence_score(&full);
                }
            }
        }

        section.progress = self.processor.compute_progress(section);
        validate_section(section)?;
        repos.sections().save(section)
    }
}

fn load_song(repos: &dyn RepositoryFactory, song_id: Uuid) -> AppResult<Song> {
    repos
        .songs()
        .get_by_id(song_id)?
        .ok_or_else(|| AppError::not_found(format!("song {}", song_id)))
}

/// Step 5 and the song half of step 6
fn recompute_song_stats(
    repos: &dyn RepositoryFactory,
    song_id: Uuid,
    rehearsed_at: Option<DateTime<Utc>>,
) -> AppResult<ParentStats> {
    let mut song = load_song(repos, song_id)?;
    let sections = repos.sections().list_by_song(song_id)?;
    let stats = recompute_parent_stats(&sections);

    song.apply_stats(stats, rehearsed_at);
    validate_song(&song)?;
    repos.songs().save(&song)?;
    Ok(stats)
}

/// The member must exist and play for the song's artist
fn ensure_band_member(repos: &dyn RepositoryFactory, song: &Song, member_id: Uuid) -> AppResult<()> {
    let member = repos.artists().get_band_member(member_id)?;
    match (member, song.artist_id) {
        (Some(member), Some(artist_id)) if member.artist_id == artist_id => Ok(()),
        _ => Err(DomainError::InvalidBandMember {
            band_member_id: member_id,
        }
        .into()),
    }
}

/// The item must be a section type from the song owner's own list
fn ensure_section_type(repos: &dyn RepositoryFactory, song: &Song, item_id: Uuid) -> AppResult<()> {
    match repos.references().get_by_id(item_id)? {
        Some(item) if item.kind == ReferenceKind::SectionType && item.user_id == song.user_id => {
            Ok(())
        }
        Some(_) => Err(AppError::BadRequest(format!(
            "{} is not a section type of user {}",
            item_id, song.user_id
        ))),
        None => Err(AppError::not_found(format!("section type {}", item_id))),
    }
}
