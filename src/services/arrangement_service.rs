// src/services/arrangement_service.rs
use crate::db::UnitOfWork;
use crate::domain::arrangement::{validate_arrangement, SongArrangement};
use crate::domain::ordering::{
    append_at_end, move_within_collection, renumber_after_removal, PositionBase,
};
use crate::error::{AppError, AppResult};
use crate::events::{CollectionKind, CollectionReordered, EventBus};
use crate::repositories::RepositoryFactory;
use std::sync::Arc;
use uuid::Uuid;

pub struct ArrangementService {
    uow: Arc<dyn UnitOfWork>,
    event_bus: Arc<EventBus>,
}

impl ArrangementService {
    pub fn new(uow: Arc<dyn UnitOfWork>, event_bus: Arc<EventBus>) -> Self {
        Self { uow, event_bus }
    }

    pub fn create_arrangement(&self, song_id: Uuid, name: String) -> AppResult<SongArrangement> {
        self.uow.run(|repos| {
            repos
                .songs()
                .get_by_id(song_id)?
                .ok_or_else(|| AppError::not_found(format!("song {}", song_id)))?;

            let existing = repos.arrangements().list_by_song(song_id)?;
            let arrangement = SongArrangement::new(
                song_id,
                name.clone(),
                append_at_end(&existing, PositionBase::Zero),
            );
            validate_arrangement(&arrangement)?;
            repos.arrangements().save(&arrangement)?;
            Ok(arrangement)
        })
    }

    pub fn list_arrangements(&self, song_id: Uuid) -> AppResult<Vec<SongArrangement>> {
        self.uow.run(|repos| repos.arrangements().list_by_song(song_id))
    }

    pub fn move_arrangement(
        &self,
        song_id: Uuid,
        arrangement_id: Uuid,
        over_arrangement_id: Uuid,
    ) -> AppResult<()> {
        let changed = self.uow.run(|repos| {
            let mut arrangements = repos.arrangements().list_by_song(song_id)?;
            let changed =
                move_within_collection(&mut arrangements, arrangement_id, over_arrangement_id)?;
            save_arrangements(repos, &arrangements, &changed)?;
            Ok(changed)
        })?;

        self.event_bus.emit(CollectionReordered::new(
            CollectionKind::Arrangements,
            song_id,
            changed,
        ));
        Ok(())
    }

    pub fn delete_arrangement(&self, song_id: Uuid, arrangement_id: Uuid) -> AppResult<()> {
        let changed = self.uow.run(|repos| {
            let arrangements = repos.arrangements().list_by_song(song_id)?;
            if !arrangements.iter().any(|a| a.id == arrangement_id) {
                return Err(AppError::not_found(format!(
                    "arrangement {} of song {}",
                    arrangement_id, song_id
                )));
            }
            repos.arrangements().delete(arrangement_id)?;

            let mut survivors: Vec<SongArrangement> = arrangements
                .into_iter()
                .filter(|a| a.id != arrangement_id)
                .collect();
            let changed = renumber_after_removal(&mut survivors, PositionBase::Zero);
            save_arrangements(repos, &survivors, &changed)?;
            Ok(changed)
        })?;

        if !changed.is_empty() {
            self.event_bus.emit(CollectionReordered::new(
                CollectionKind::Arrangements,
                song_id,
                changed,
            ));
        }
        Ok(())
    }
}

fn save_arrangements(
    repos: &dyn RepositoryFactory,
    arrangements: &[SongArrangement],
    changed: &[Uuid],
) -> AppResult<()> {
    let repo = repos.arrangements();
    for arrangement in arrangements.iter().filter(|a| changed.contains(&a.id)) {
        repo.save(arrangement)?;
    }
    Ok(())
}
