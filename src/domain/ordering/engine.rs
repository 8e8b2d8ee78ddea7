use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

/// First position of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionBase {
    /// Song sections, arrangements, band members, reference lists
    Zero,
    /// Album and playlist track numbers
    One,
}

impl PositionBase {
    pub fn start(self) -> u32 {
        match self {
            PositionBase::Zero => 0,
            PositionBase::One => 1,
        }
    }
}

/// An entity whose order inside its parent collection is persisted.
pub trait Positioned {
    fn id(&self) -> Uuid;
    fn position(&self) -> u32;
    fn set_position(&mut self, position: u32);
}

/// Move `moving_id` onto the slot currently held by `target_id`.
///
/// Items between the two slide one step to close the gap. The slice is left
/// sorted by position and the ids whose position changed are returned so the
/// caller only persists those rows.
///
/// Both ids are expected to be present (callers check existence first); a
/// missing id is reported as `NotFound` instead of panicking.
pub fn move_within_collection<T: Positioned>(
    items: &mut [T],
    moving_id: Uuid,
    target_id: Uuid,
) -> DomainResult<Vec<Uuid>> {
    items.sort_by_key(|item| item.position());

    let from = index_of(items, moving_id)?;
    let to = index_of(items, target_id)?;
    if from == to {
        return Ok(Vec::new());
    }

    let target_position = items[to].position();
    let mut changed = Vec::with_capacity(from.abs_diff(to) + 1);

    if from < to {
        for item in &mut items[from + 1..=to] {
            item.set_position(item.position().saturating_sub(1));
            changed.push(item.id());
        }
    } else {
        for item in &mut items[to..from] {
            item.set_position(item.position() + 1);
            changed.push(item.id());
        }
    }

    items[from].set_position(target_position);
    changed.push(items[from].id());

    items.sort_by_key(|item| item.position());
    Ok(changed)
}

/// Close the gaps left behind by removed items.
///
/// `items` must already be filtered down to the survivors. Relative order
/// by previous position is preserved; returns the ids that were renumbered.
pub fn renumber_after_removal<T: Positioned>(items: &mut [T], base: PositionBase) -> Vec<Uuid> {
    items.sort_by_key(|item| item.position());

    let mut changed = Vec::new();
    for (index, item) in items.iter_mut().enumerate() {
        let expected = base.start() + index as u32;
        if item.position() != expected {
            item.set_position(expected);
            changed.push(item.id());
        }
    }
    changed
}

/// Position for a new item appended to the collection.
pub fn append_at_end<T>(items: &[T], base: PositionBase) -> u32 {
    base.start() + items.len() as u32
}

/// True when positions are exactly `{base, base + 1, .., base + n - 1}`.
pub fn is_contiguous<T: Positioned>(items: &[T], base: PositionBase) -> bool {
    let mut positions: Vec<u32> = items.iter().map(Positioned::position).collect();
    positions.sort_unstable();
    positions
        .iter()
        .enumerate()
        .all(|(index, position)| *position == base.start() + index as u32)
}

fn index_of<T: Positioned>(items: &[T], id: Uuid) -> DomainResult<usize> {
    items
        .iter()
        .position(|item| item.id() == id)
        .ok_or_else(|| DomainError::NotFound(format!("positioned item {}", id)))
}
