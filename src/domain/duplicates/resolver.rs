use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ordering::{append_at_end, PositionBase};
use crate::domain::playlist::PlaylistSong;
use crate::domain::{DomainError, DomainResult};

/// A song offered for bulk insertion, tagged with the group it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub song_id: Uuid,
    /// Album or artist the song was pulled from
    pub group_id: Uuid,
}

impl Candidate {
    pub fn new(song_id: Uuid, group_id: Uuid) -> Self {
        Self { song_id, group_id }
    }
}

/// Outcome of a duplicate-aware bulk insertion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateResolution {
    pub success: bool,
    pub duplicate_group_ids: Vec<Uuid>,
    pub duplicate_song_ids: Vec<Uuid>,
    pub added_song_ids: Vec<Uuid>,
}

/// Split `candidates` against the songs already present and apply the
/// force-add policy.
///
/// `force_add`:
/// - `None`: add everything when there are no duplicates, otherwise add nothing
///   and report the duplicates
/// - `Some(true)`: add everything, duplicates included
/// - `Some(false)`: add only the non-duplicates
///
/// Setting `force_add` when nothing is duplicated is a usage error. A song
/// offered twice (for example by two overlapping groups) is considered once,
/// at its first occurrence. Added ids keep the candidates' relative order.
pub fn partition_and_filter(
    candidates: &[Candidate],
    existing_song_ids: &HashSet<Uuid>,
    force_add: Option<bool>,
) -> DomainResult<DuplicateResolution> {
    let mut group_order: Vec<Uuid> = Vec::new();
    let mut group_fully_duplicate: HashMap<Uuid, bool> = HashMap::new();
    for candidate in candidates {
        let is_duplicate = existing_song_ids.contains(&candidate.song_id);
        group_fully_duplicate
            .entry(candidate.group_id)
            .and_modify(|all| *all &= is_duplicate)
            .or_insert_with(|| {
                group_order.push(candidate.group_id);
                is_duplicate
            });
    }

    let mut seen = HashSet::new();
    let unique: Vec<Uuid> = candidates
        .iter()
        .map(|candidate| candidate.song_id)
        .filter(|song_id| seen.insert(*song_id))
        .collect();

    let duplicate_song_ids: Vec<Uuid> = unique
        .iter()
        .copied()
        .filter(|song_id| existing_song_ids.contains(song_id))
        .collect();

    let duplicate_group_ids: Vec<Uuid> = group_order
        .into_iter()
        .filter(|group_id| group_fully_duplicate.get(group_id).copied().unwrap_or(false))
        .collect();

    if duplicate_song_ids.is_empty() {
        if force_add.is_some() {
            return Err(DomainError::ForceAddWithoutDuplicates);
        }
        return Ok(DuplicateResolution {
            success: true,
            duplicate_group_ids,
            duplicate_song_ids,
            added_song_ids: unique,
        });
    }

    let (success, added_song_ids) = match force_add {
        None => (false, Vec::new()),
        Some(true) => (true, unique),
        Some(false) => (
            true,
            unique
                .into_iter()
                .filter(|song_id| !existing_song_ids.contains(song_id))
                .collect(),
        ),
    };

    Ok(DuplicateResolution {
        success,
        duplicate_group_ids,
        duplicate_song_ids,
        added_song_ids,
    })
}

/// Memberships for `song_ids` appended after `existing`, in the given order.
pub fn assign_playlist_positions(
    playlist_id: Uuid,
    existing: &[PlaylistSong],
    song_ids: &[Uuid],
) -> Vec<PlaylistSong> {
    let first = append_at_end(existing, PositionBase::One);
    song_ids
        .iter()
        .enumerate()
        .map(|(offset, song_id)| PlaylistSong::new(playlist_id, *song_id, first + offset as u32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(count: usize) -> Vec<Uuid> {
        (0..count).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_force_add_without_duplicates_is_rejected() {
        let songs = ids(3);
        let group = Uuid::new_v4();
        let candidates: Vec<Candidate> = songs.iter().map(|s| Candidate::new(*s, group)).collect();
        let existing = HashSet::from([Uuid::new_v4()]);

        for force in [Some(true), Some(false)] {
            let result = partition_and_filter(&candidates, &existing, force);
            assert!(matches!(result, Err(DomainError::ForceAddWithoutDuplicates)));
        }
    }

    #[test]
    fn test_no_duplicates_adds_everything_in_order() {
        let songs = ids(3);
        let group = Uuid::new_v4();
        let candidates: Vec<Candidate> = songs.iter().map(|s| Candidate::new(*s, group)).collect();

        let result = partition_and_filter(&candidates, &HashSet::new(), None).unwrap();

        assert!(result.success);
        assert!(result.duplicate_song_ids.is_empty());
        assert!(result.duplicate_group_ids.is_empty());
        assert_eq!(result.added_song_ids, songs);
    }

    fn two_groups() -> (Vec<Uuid>, Uuid, Uuid, Vec<Candidate>, HashSet<Uuid>) {
        let s = ids(4);
        let (first_group, second_group) = (Uuid::new_v4(), Uuid::new_v4());
        let candidates = vec![
            Candidate::new(s[0], first_group),
            Candidate::new(s[1], first_group),
            Candidate::new(s[2], first_group),
            Candidate::new(s[3], second_group),
        ];
        let existing = HashSet::from([s[1], s[3]]);
        (s, first_group, second_group, candidates, existing)
    }

    #[test]
    fn test_skip_duplicates() {
        let (s, _, second_group, candidates, existing) = two_groups();

        let result = partition_and_filter(&candidates, &existing, Some(false)).unwrap();

        assert!(result.success);
        assert_eq!(result.added_song_ids, vec![s[0], s[2]]);
        assert_eq!(result.duplicate_song_ids, vec![s[1], s[3]]);
        assert_eq!(result.duplicate_group_ids, vec![second_group]);
    }

    #[test]
    fn test_force_duplicates() {
        let (s, _, second_group, candidates, existing) = two_groups();

        let result = partition_and_filter(&candidates, &existing, Some(true)).unwrap();

        assert!(result.success);
        assert_eq!(result.added_song_ids, s);
        assert_eq!(result.duplicate_song_ids, vec![s[1], s[3]]);
        assert_eq!(result.duplicate_group_ids, vec![second_group]);
    }

    #[test]
    fn test_unset_force_with_duplicates_adds_nothing() {
        let (s, _, _, candidates, existing) = two_groups();

        let result = partition_and_filter(&candidates, &existing, None).unwrap();

        assert!(!result.success);
        assert!(result.added_song_ids.is_empty());
        assert_eq!(result.duplicate_song_ids, vec![s[1], s[3]]);
    }

    #[test]
    fn test_song_offered_by_two_groups_counts_once() {
        let song = Uuid::new_v4();
        let candidates = vec![
            Candidate::new(song, Uuid::new_v4()),
            Candidate::new(song, Uuid::new_v4()),
        ];

        let result = partition_and_filter(&candidates, &HashSet::new(), None).unwrap();

        assert_eq!(result.added_song_ids, vec![song]);
    }

    #[test]
    fn test_positions_continue_after_existing_members() {
        let playlist_id = Uuid::new_v4();
        let existing = vec![
            PlaylistSong::new(playlist_id, Uuid::new_v4(), 1),
            PlaylistSong::new(playlist_id, Uuid::new_v4(), 2),
        ];
        let added = ids(2);

        let memberships = assign_playlist_positions(playlist_id, &existing, &added);

        assert_eq!(memberships.len(), 2);
        assert_eq!(memberships[0].song_id, added[0]);
        assert_eq!(memberships[0].song_track_no, 3);
        assert_eq!(memberships[1].song_track_no, 4);
    }

    #[test]
    fn test_resolution_serializes_camel_case() {
        let value = serde_json::to_value(DuplicateResolution::default()).unwrap();

        assert!(value.get("duplicateGroupIds").is_some());
        assert!(value.get("addedSongIds").is_some());
    }
}
