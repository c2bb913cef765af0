// seating-chart: randomized group-scoped seat assignment

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::error::AppError;
use crate::layout::{self, Coord, LayoutGrid};
use crate::roster::{Roster, SeatedRecord};

/// Assign every student a desk in their group's cells.
///
/// Generator consumption order is fixed: one shuffle of the whole roster, then
/// one permutation per group in sorted group order. Coordinates and ranks are
/// both popped from the back of their per-group stacks, so the last cell of a
/// group in row-major order goes to the first student of that group in
/// shuffled roster order.
///
/// Remaining `e` cells become empty-desk records ranked 1..=k in pop order.
pub fn assign_seats<R: Rng + ?Sized>(
    roster: Roster,
    grid: &LayoutGrid,
    rng: &mut R,
) -> Result<Vec<SeatedRecord>, AppError> {
    let mut students = roster.into_students();
    students.shuffle(rng);

    let mut coords = grid.coords_by_group();
    let roster_counts = count_groups(students.iter().map(|s| s.group.as_str()));
    reconcile(&roster_counts, &coords)?;

    let mut rank_pools: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for (group, &count) in &roster_counts {
        let mut pool: Vec<u32> = (1..=count as u32).collect();
        pool.shuffle(rng);
        debug!(group = %group, count, "built rank pool");
        rank_pools.insert(group.clone(), pool);
    }

    let mut seated = Vec::with_capacity(students.len());
    for student in students {
        let rank = rank_pools
            .get_mut(&student.group)
            .and_then(Vec::pop)
            .ok_or_else(|| {
                AppError::AssignmentInvariant(format!(
                    "rank pool for group '{}' ran out",
                    student.group
                ))
            })?;
        let coord = coords
            .get_mut(&student.group)
            .and_then(Vec::pop)
            .ok_or_else(|| {
                AppError::AssignmentInvariant(format!(
                    "no desk left for group '{}'",
                    student.group
                ))
            })?;
        seated.push(SeatedRecord::seat(student, rank, coord));
    }

    if let Some((group, pool)) = rank_pools.iter().find(|(_, pool)| !pool.is_empty()) {
        return Err(AppError::AssignmentInvariant(format!(
            "rank pool for group '{}' has {} values left",
            group,
            pool.len()
        )));
    }

    let mut empty_coords = coords.remove(layout::EMPTY_DESK).unwrap_or_default();
    let mut rank = 1;
    while let Some(coord) = empty_coords.pop() {
        seated.push(SeatedRecord::empty_desk(rank, coord));
        rank += 1;
    }
    debug!(empty_desks = rank - 1, "synthesized empty desks");

    Ok(seated)
}

fn count_groups<'a>(groups: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for group in groups {
        *counts.entry(group.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Grid symbols must be exactly the roster groups plus `e` and `x`, with
/// matching counts for every non-reserved group.
fn reconcile(
    roster_counts: &BTreeMap<String, usize>,
    grid_coords: &BTreeMap<String, Vec<Coord>>,
) -> Result<(), AppError> {
    let expected: BTreeSet<&str> = roster_counts
        .keys()
        .map(String::as_str)
        .chain([layout::EMPTY_DESK, layout::NO_DESK])
        .collect();
    let grid_groups: BTreeSet<&str> = grid_coords.keys().map(String::as_str).collect();

    if expected != grid_groups {
        return Err(AppError::GroupSetMismatch {
            missing_from_layout: expected
                .difference(&grid_groups)
                .map(|g| g.to_string())
                .collect(),
            missing_from_roster: grid_groups
                .difference(&expected)
                .map(|g| g.to_string())
                .collect(),
        });
    }

    for (group, &roster) in roster_counts {
        let layout = grid_coords.get(group).map(Vec::len).unwrap_or(0);
        if roster != layout {
            return Err(AppError::GroupCountMismatch {
                group: group.clone(),
                roster,
                layout,
            });
        }
    }
    Ok(())
}
