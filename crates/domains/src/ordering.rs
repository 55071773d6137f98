//! # Position ordering
//!
//! Lists within a board and cards within a list are ordered by a float
//! `position`. Positions are never normalized or compacted here; they only
//! need to be pairwise distinct among siblings.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, Result};
use crate::validation;

pub const DEFAULT_POSITION_STEP: f64 = 1000.0;

/// One entry of a reorder batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate<I> {
    pub id: I,
    pub position: f64,
}

impl<I> PositionUpdate<I> {
    pub fn new(id: I, position: f64) -> Self {
        Self { id, position }
    }
}

/// Allocates append positions: `max(existing) + step`, or `step` when empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionAllocator {
    step: f64,
}

impl Default for PositionAllocator {
    fn default() -> Self {
        Self {
            step: DEFAULT_POSITION_STEP,
        }
    }
}

impl PositionAllocator {
    pub fn new(step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(DomainError::validation(
                "Position step must be a positive finite number",
            ));
        }
        Ok(Self { step })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn next(&self, existing: impl IntoIterator<Item = f64>) -> f64 {
        existing
            .into_iter()
            .fold(None, |max: Option<f64>, p| Some(max.map_or(p, |m| m.max(p))))
            .map_or(self.step, |max| max + self.step)
    }
}

/// Bit pattern used for equality, with `-0.0` folded onto `0.0`.
fn position_key(position: f64) -> u64 {
    if position == 0.0 {
        0f64.to_bits()
    } else {
        position.to_bits()
    }
}

/// Rejects an explicit position already held by another sibling.
pub fn ensure_position_free(
    position: f64,
    siblings: impl IntoIterator<Item = f64>,
    container: impl Display,
) -> Result<f64> {
    let position = validation::position(position)?;
    let key = position_key(position);
    if siblings.into_iter().any(|p| position_key(p) == key) {
        return Err(DomainError::validation(format!(
            "Position {position} is already taken in {container}"
        )));
    }
    Ok(position)
}

/// Validates a reorder batch against the container's current children.
///
/// Membership is checked for every entry before any duplicate check, so a
/// batch that references a foreign id always fails with the membership
/// error. Input order does not matter.
pub fn validate_reorder<I>(
    updates: &[PositionUpdate<I>],
    children: &HashSet<I>,
    child_kind: &str,
    container: impl Display,
) -> Result<()>
where
    I: Eq + Hash + Display + Copy,
{
    for update in updates {
        if !children.contains(&update.id) {
            return Err(DomainError::validation(format!(
                "{child_kind} {} does not belong to {container}",
                update.id
            )));
        }
    }

    let mut seen_ids = HashSet::with_capacity(updates.len());
    let mut seen_positions = HashSet::with_capacity(updates.len());
    for update in updates {
        validation::position(update.position)?;
        if !seen_positions.insert(position_key(update.position)) {
            return Err(DomainError::validation(
                "Duplicate positions are not allowed",
            ));
        }
        if !seen_ids.insert(update.id) {
            return Err(DomainError::validation(format!(
                "{child_kind} {} appears more than once",
                update.id
            )));
        }
    }
    Ok(())
}

/// Rejects a batch that would land on a position still held by a sibling
/// left out of the batch.
pub fn ensure_batch_fits<I>(
    updates: &[PositionUpdate<I>],
    siblings: impl IntoIterator<Item = (I, f64)>,
    container: impl Display,
) -> Result<()>
where
    I: Eq + Hash + Copy,
{
    let moving: HashSet<I> = updates.iter().map(|u| u.id).collect();
    let held: HashSet<u64> = siblings
        .into_iter()
        .filter(|(id, _)| !moving.contains(id))
        .map(|(_, p)| position_key(p))
        .collect();

    match updates.iter().find(|u| held.contains(&position_key(u.position))) {
        Some(clash) => Err(DomainError::validation(format!(
            "Position {} is already taken in {container}",
            clash.position
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_position_appends_after_the_max() {
        let alloc = PositionAllocator::default();
        assert_eq!(alloc.next([]), 1000.0);
        assert_eq!(alloc.next([3000.0, -5.0, 1500.5]), 4000.0);
        assert_eq!(alloc.next([-4000.0]), -3000.0);
    }

    #[test]
    fn custom_step() {
        let alloc = PositionAllocator::new(16.0).unwrap();
        assert_eq!(alloc.next([]), 16.0);
        assert_eq!(alloc.next([16.0]), 32.0);
        assert!(PositionAllocator::new(0.0).is_err());
        assert!(PositionAllocator::new(f64::NAN).is_err());
    }

    #[test]
    fn duplicate_positions_fail_the_batch() {
        let children: HashSet<u32> = [1, 2, 3].into();
        let updates = [PositionUpdate::new(1, 1000.0), PositionUpdate::new(2, 1000.0)];
        let err = validate_reorder(&updates, &children, "List", "board B").unwrap_err();
        assert_eq!(err.to_string(), "Duplicate positions are not allowed");
    }

    #[test]
    fn repeated_entry_reports_the_duplicate_position() {
        let children: HashSet<&str> = ["L1"].into();
        let updates = [PositionUpdate::new("L1", 1000.0), PositionUpdate::new("L1", 1000.0)];
        let err = validate_reorder(&updates, &children, "List", "board B").unwrap_err();
        assert_eq!(err.to_string(), "Duplicate positions are not allowed");
    }

    #[test]
    fn repeated_id_at_distinct_positions_is_rejected() {
        let children: HashSet<u32> = [1, 2].into();
        let updates = [PositionUpdate::new(1, 10.0), PositionUpdate::new(1, 20.0)];
        let err = validate_reorder(&updates, &children, "List", "board B").unwrap_err();
        assert_eq!(err.to_string(), "List 1 appears more than once");
    }

    #[test]
    fn foreign_ids_fail_before_duplicates() {
        let children: HashSet<u32> = [1, 2].into();
        let updates = [PositionUpdate::new(1, 5.0), PositionUpdate::new(9, 5.0)];
        let err = validate_reorder(&updates, &children, "List", "board B").unwrap_err();
        assert_eq!(err.to_string(), "List 9 does not belong to board B");
    }

    #[test]
    fn unsorted_input_is_accepted() {
        let children: HashSet<u32> = [1, 2, 3].into();
        let updates = [
            PositionUpdate::new(3, 0.5),
            PositionUpdate::new(1, 9_000_000.0),
            PositionUpdate::new(2, -20.0),
        ];
        assert!(validate_reorder(&updates, &children, "Card", "list L").is_ok());
    }

    #[test]
    fn zero_and_negative_zero_collide() {
        assert!(ensure_position_free(-0.0, [0.0], "list L").is_err());
        assert_eq!(ensure_position_free(2.5, [0.0, 1.0], "list L").unwrap(), 2.5);
    }

    #[test]
    fn batch_cannot_land_on_an_untouched_sibling() {
        let siblings = [(1u32, 1000.0), (2, 2000.0), (3, 3000.0)];

        let clash = [PositionUpdate::new(1, 3000.0)];
        let err = ensure_batch_fits(&clash, siblings, "list L").unwrap_err();
        assert_eq!(err.to_string(), "Position 3000 is already taken in list L");

        let swap = [PositionUpdate::new(1, 3000.0), PositionUpdate::new(3, 1000.0)];
        assert!(ensure_batch_fits(&swap, siblings, "list L").is_ok());
    }
}
