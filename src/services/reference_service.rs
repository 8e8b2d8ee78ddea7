// src/services/reference_service.rs
//
// Per-user reference lists (band-member roles, guitar tunings, section
// types). Each (user, kind) pair is one 0-based positioned collection.
use crate::db::UnitOfWork;
use crate::domain::ordering::{
    append_at_end, move_within_collection, renumber_after_removal, PositionBase,
};
use crate::domain::reference::{validate_reference_item, ReferenceItem, ReferenceKind};
use crate::error::{AppError, AppResult};
use crate::events::{CollectionKind, CollectionReordered, EventBus};
use crate::repositories::RepositoryFactory;
use std::sync::Arc;
use uuid::Uuid;

pub struct ReferenceService {
    uow: Arc<dyn UnitOfWork>,
    event_bus: Arc<EventBus>,
}

impl ReferenceService {
    pub fn new(uow: Arc<dyn UnitOfWork>, event_bus: Arc<EventBus>) -> Self {
        Self { uow, event_bus }
    }

    pub fn create_item(
        &self,
        user_id: Uuid,
        kind: ReferenceKind,
        name: String,
    ) -> AppResult<ReferenceItem> {
        self.uow.run(|repos| {
            let existing = repos.references().list(user_id, kind)?;
            let item = ReferenceItem::new(
                user_id,
                kind,
                name.clone(),
                append_at_end(&existing, PositionBase::Zero),
            );
            validate_reference_item(&item)?;
            repos.references().save(&item)?;
            Ok(item)
        })
    }

    pub fn list_items(&self, user_id: Uuid, kind: ReferenceKind) -> AppResult<Vec<ReferenceItem>> {
        self.uow.run(|repos| repos.references().list(user_id, kind))
    }

    pub fn move_item(
        &self,
        user_id: Uuid,
        kind: ReferenceKind,
        item_id: Uuid,
        over_item_id: Uuid,
    ) -> AppResult<()> {
        let changed = self.uow.run(|repos| {
            let mut items = repos.references().list(user_id, kind)?;
            let changed = move_within_collection(&mut items, item_id, over_item_id)?;
            save_items(repos, &items, &changed)?;
            Ok(changed)
        })?;

        self.event_bus.emit(CollectionReordered::new(
            CollectionKind::ReferenceList,
            user_id,
            changed,
        ));
        Ok(())
    }

    /// Whatever referenced the item loses the reference. Sections drop a
    /// deleted section type through the schema; band members drop a deleted
    /// role here.
    pub fn delete_item(&self, user_id: Uuid, kind: ReferenceKind, item_id: Uuid) -> AppResult<()> {
        let changed = self.uow.run(|repos| {
            let items = repos.references().list(user_id, kind)?;
            if !items.iter().any(|item| item.id == item_id) {
                return Err(AppError::not_found(format!("{} {}", kind, item_id)));
            }
            if kind == ReferenceKind::BandMemberRole {
                strip_role(repos, item_id)?;
            }
            repos.references().delete(item_id)?;

            let mut survivors: Vec<ReferenceItem> =
                items.into_iter().filter(|item| item.id != item_id).collect();
            let changed = renumber_after_removal(&mut survivors, PositionBase::Zero);
            save_items(repos, &survivors, &changed)?;
            Ok(changed)
        })?;

        if !changed.is_empty() {
            self.event_bus.emit(CollectionReordered::new(
                CollectionKind::ReferenceList,
                user_id,
                changed,
            ));
        }
        Ok(())
    }
}

fn strip_role(repos: &dyn RepositoryFactory, role_id: Uuid) -> AppResult<()> {
    let artists = repos.artists();
    let members = artists.list_band_members_with_role(role_id)?;
    for mut member in members {
        member.role_ids.retain(|id| *id != role_id);
        artists.save_band_member(&member)?;
    }
    Ok(())
}

fn save_items(
    repos: &dyn RepositoryFactory,
    items: &[ReferenceItem],
    changed: &[Uuid],
) -> AppResult<()> {
    let references = repos.references();
    for item in items.iter().filter(|item| changed.contains(&item.id)) {
        references.save(item)?;
    }
    Ok(())
}
