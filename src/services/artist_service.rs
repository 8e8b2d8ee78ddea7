// src/services/artist_service.rs
use crate::db::UnitOfWork;
use crate::domain::artist::{validate_artist, validate_band_member, Artist, BandMember};
use crate::domain::ordering::{
    append_at_end, move_within_collection, renumber_after_removal, PositionBase,
};
use crate::domain::reference::ReferenceKind;
use crate::error::{AppError, AppResult};
use crate::events::{CollectionKind, CollectionReordered, EventBus};
use crate::repositories::RepositoryFactory;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateArtistRequest {
    pub user_id: Uuid,
    pub name: String,
    pub is_band: bool,
}

#[derive(Debug, Clone)]
pub struct CreateBandMemberRequest {
    pub artist_id: Uuid,
    pub name: String,
    /// Entries of the user's band-member-role list
    pub role_ids: Vec<Uuid>,
}

pub struct ArtistService {
    uow: Arc<dyn UnitOfWork>,
    event_bus: Arc<EventBus>,
}

impl ArtistService {
    pub fn new(uow: Arc<dyn UnitOfWork>, event_bus: Arc<EventBus>) -> Self {
        Self { uow, event_bus }
    }

    pub fn create_artist(&self, request: CreateArtistRequest) -> AppResult<Artist> {
        let mut artist = Artist::new(request.user_id, request.name);
        artist.is_band = request.is_band;
        validate_artist(&artist)?;

        self.uow.run(|repos| repos.artists().save(&artist))?;

        log::info!("Created artist {} ({})", artist.id, artist.name);
        Ok(artist)
    }

    pub fn get_artist(&self, artist_id: Uuid) -> AppResult<Artist> {
        self.uow.run(|repos| load_artist(repos, artist_id))
    }

    pub fn list_band_members(&self, artist_id: Uuid) -> AppResult<Vec<BandMember>> {
        self.uow.run(|repos| {
            load_artist(repos, artist_id)?;
            repos.artists().list_band_members(artist_id)
        })
    }

    /// Append a member; every role must be a band-member role of the
    /// artist's owner
    pub fn create_band_member(&self, request: CreateBandMemberRequest) -> AppResult<BandMember> {
        self.uow.run(|repos| {
            let artist = load_artist(repos, request.artist_id)?;

            for role_id in &request.role_ids {
                let role = repos.references().get_by_id(*role_id)?;
                match role {
                    Some(role)
                        if role.kind == ReferenceKind::BandMemberRole
                            && role.user_id == artist.user_id => {}
                    _ => {
                        return Err(AppError::BadRequest(format!(
                            "{} is not a band member role",
                            role_id
                        )))
                    }
                }
            }

            let members = repos.artists().list_band_members(artist.id)?;
            let mut member = BandMember::new(
                artist.id,
                request.name.clone(),
                append_at_end(&members, PositionBase::Zero),
            );
            member.role_ids = request.role_ids.clone();
            validate_band_member(&member)?;

            repos.artists().save_band_member(&member)?;
            Ok(member)
        })
    }

    pub fn move_band_member(
        &self,
        artist_id: Uuid,
        member_id: Uuid,
        over_member_id: Uuid,
    ) -> AppResult<()> {
        let changed = self.uow.run(|repos| {
            load_artist(repos, artist_id)?;
            let mut members = repos.artists().list_band_members(artist_id)?;
            let changed = move_within_collection(&mut members, member_id, over_member_id)?;
            save_members(repos, &members, &changed)?;
            Ok(changed)
        })?;

        self.event_bus.emit(CollectionReordered::new(
            CollectionKind::BandMembers,
            artist_id,
            changed,
        ));
        Ok(())
    }

    /// Sections played by the member lose their assignment
    pub fn delete_band_member(&self, artist_id: Uuid, member_id: Uuid) -> AppResult<()> {
        let changed = self.uow.run(|repos| {
            let members = repos.artists().list_band_members(artist_id)?;
            if !members.iter().any(|member| member.id == member_id) {
                return Err(AppError::not_found(format!(
                    "band member {} of artist {}",
                    member_id, artist_id
                )));
            }
            repos.artists().delete_band_member(member_id)?;

            let mut survivors: Vec<BandMember> = members
                .into_iter()
                .filter(|member| member.id != member_id)
                .collect();
            let changed = renumber_after_removal(&mut survivors, PositionBase::Zero);
            save_members(repos, &survivors, &changed)?;
            Ok(changed)
        })?;

        if !changed.is_empty() {
            self.event_bus.emit(CollectionReordered::new(
                CollectionKind::BandMembers,
                artist_id,
                changed,
            ));
        }
        Ok(())
    }
}

fn load_artist(repos: &dyn RepositoryFactory, artist_id: Uuid) -> AppResult<Artist> {
    repos
        .artists()
        .get_by_id(artist_id)?
        .ok_or_else(|| AppError::not_found(format!("artist {}", artist_id)))
}

fn save_members(
    repos: &dyn RepositoryFactory,
    members: &[BandMember],
    changed: &[Uuid],
) -> AppResult<()> {
    let artists = repos.artists();
    for member in members.iter().filter(|m| changed.contains(&m.id)) {
        artists.save_band_member(member)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, SqliteUnitOfWork};
    use crate::domain::ordering::is_contiguous;
    use crate::domain::reference::ReferenceItem;
    use crate::error::ErrorKind;

    fn service() -> (ArtistService, Arc<dyn UnitOfWork>) {
        let uow: Arc<dyn UnitOfWork> =
            Arc::new(SqliteUnitOfWork::new(create_memory_pool().unwrap()));
        let service = ArtistService::new(Arc::clone(&uow), Arc::new(EventBus::new()));
        (service, uow)
    }

    fn band(service: &ArtistService) -> Artist {
        service
            .create_artist(CreateArtistRequest {
                user_id: Uuid::new_v4(),
                name: "Metallica".to_string(),
                is_band: true,
            })
            .unwrap()
    }

    fn member(service: &ArtistService, artist_id: Uuid, name: &str) -> BandMember {
        service
            .create_band_member(CreateBandMemberRequest {
                artist_id,
                name: name.to_string(),
                role_ids: Vec::new(),
            })
            .unwrap()
    }

    #[test]
    fn test_members_are_appended_move_and_delete() {
        let (service, _) = service();
        let artist = band(&service);
        let names = ["James", "Lars", "Kirk", "Cliff"];
        let ids: Vec<Uuid> = names
            .iter()
            .map(|name| member(&service, artist.id, name).id)
            .collect();

        service.move_band_member(artist.id, ids[3], ids[1]).unwrap();
        let order: Vec<Uuid> = service
            .list_band_members(artist.id)
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(order, vec![ids[0], ids[3], ids[1], ids[2]]);

        service.delete_band_member(artist.id, ids[0]).unwrap();
        let members = service.list_band_members(artist.id).unwrap();
        assert_eq!(members.len(), 3);
        assert_eq!(members[0].id, ids[3]);
        assert!(is_contiguous(&members, PositionBase::Zero));
    }

    #[test]
    fn test_member_roles_must_be_band_member_roles() {
        let (service, uow) = service();
        let artist = band(&service);
        let tuning = ReferenceItem::new(
            artist.user_id,
            ReferenceKind::GuitarTuning,
            "Drop D".to_string(),
            0,
        );
        let role = ReferenceItem::new(
            artist.user_id,
            ReferenceKind::BandMemberRole,
            "Drums".to_string(),
            0,
        );
        uow.run(|repos| {
            repos.references().save(&tuning)?;
            repos.references().save(&role)
        })
        .unwrap();

        let rejected = service.create_band_member(CreateBandMemberRequest {
            artist_id: artist.id,
            name: "Lars".to_string(),
            role_ids: vec![tuning.id],
        });
        let accepted = service
            .create_band_member(CreateBandMemberRequest {
                artist_id: artist.id,
                name: "Lars".to_string(),
                role_ids: vec![role.id],
            })
            .unwrap();

        assert_eq!(rejected.unwrap_err().kind(), ErrorKind::BadRequest);
        assert_eq!(accepted.role_ids, vec![role.id]);
    }

    #[test]
    fn test_delete_unknown_member_is_not_found() {
        let (service, _) = service();
        let artist = band(&service);

        let result = service.delete_band_member(artist.id, Uuid::new_v4());

        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }
}
