//! Rotation engine: computes how a quarter turn permutes slice membership.
//!
//! Nothing here keeps state. [`plan_rotation`] reads a snapshot of the slice
//! index, moves the 9 affected cubelets' grid coordinates through the exact
//! quarter-turn matrix, and re-derives their slots from the new coordinates.

use std::fmt;

use nalgebra::Matrix3;

use crate::cube::{CubeletId, GridCoord};
use crate::error::{Error, Result};
use crate::math::quarter_turn;
use crate::slice::{Members, SliceId, SliceIndex, grid_position};

/// Grid permutation of a slice turned clockwise: `new[i] = old[CLOCKWISE_GRID[i]]`.
pub(crate) const CLOCKWISE_GRID: [usize; 9] = [6, 3, 0, 7, 4, 1, 8, 5, 2];

/// Inverse of [`CLOCKWISE_GRID`].
pub(crate) const COUNTER_CLOCKWISE_GRID: [usize; 9] = [2, 5, 8, 1, 4, 7, 0, 3, 6];

/// Turn direction, judged looking from the positive end of the slice axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
    /// `+1`
    Clockwise,
    /// `-1`
    CounterClockwise,
}

impl Direction {
    pub(crate) fn sign(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    pub(crate) fn inverse(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Slot permutation this direction applies to the turned slice.
    pub(crate) fn grid_permutation(self) -> &'static [usize; 9] {
        match self {
            Direction::Clockwise => &CLOCKWISE_GRID,
            Direction::CounterClockwise => &COUNTER_CLOCKWISE_GRID,
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            1 => Ok(Direction::Clockwise),
            -1 => Ok(Direction::CounterClockwise),
            other => Err(Error::InvalidDirection(other)),
        }
    }
}

/// A quarter turn of one slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Move {
    pub(crate) slice: SliceId,
    pub(crate) direction: Direction,
}

impl Move {
    /// Validates a raw `(slice, direction)` pair.
    pub(crate) fn new(slice: usize, direction: i32) -> Result<Self> {
        Ok(Self {
            slice: SliceId::new(slice)?,
            direction: Direction::try_from(direction)?,
        })
    }

    pub(crate) fn inverse(self) -> Self {
        Self {
            slice: self.slice,
            direction: self.direction.inverse(),
        }
    }

    /// All 18 quarter turns.
    #[cfg(test)]
    pub(crate) fn all() -> impl Iterator<Item = Move> {
        SliceId::all().flat_map(|slice| {
            [Direction::Clockwise, Direction::CounterClockwise]
                .into_iter()
                .map(move |direction| Move { slice, direction })
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.direction {
            Direction::Clockwise => "cw",
            Direction::CounterClockwise => "ccw",
        };
        write!(f, "{} {}", self.slice, arrow)
    }
}

/// Rewrite of 3 slots in a slice crossing the turned one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PartialUpdate {
    pub(crate) slice: SliceId,
    /// `(slot, new occupant)`, ordered by slot
    pub(crate) entries: [(usize, CubeletId); 3],
}

/// Everything a commit needs to make a quarter turn permanent.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SliceUpdatePlan {
    pub(crate) turn: Move,
    /// New ordering of the turned slice
    pub(crate) members: Members,
    /// One update per slice on the other two axes
    pub(crate) partial: Vec<PartialUpdate>,
    /// The turned cubelets and their resting coordinates after the turn
    pub(crate) moved: [(CubeletId, GridCoord); 9],
    /// Exact rotation to bake into the moved cubelets
    pub(crate) quarter: Matrix3<i32>,
}

impl SliceUpdatePlan {
    pub(crate) fn cubelets(&self) -> [CubeletId; 9] {
        self.moved.map(|(id, _)| id)
    }
}

/// Computes the membership changes of a quarter turn.
///
/// Only the 9 cubelets of the turned slice move. Their new coordinates give
/// the turned slice's new ordering directly; every slice on the other two
/// axes crosses the turned slice in exactly 3 slots, which receive whichever
/// moved cubelets now lie in them.
pub(crate) fn plan_rotation(index: &SliceIndex, turn: Move) -> Result<SliceUpdatePlan> {
    let axis = turn.slice.axis();
    let quarter = quarter_turn(axis, turn.direction);

    let mut moved = [(0, GridCoord::new(0, 0, 0)); 9];
    let mut members = [None::<CubeletId>; 9];
    for (n, &id) in index.members_of(turn.slice).iter().enumerate() {
        let coord = index.coord_of(id).ok_or_else(|| {
            Error::InvariantViolation(format!("cubelet {id} has no coordinate"))
        })?;
        let next = coord.transformed(&quarter);
        if members[grid_position(axis, next)].replace(id).is_some() {
            return Err(Error::InvariantViolation(format!(
                "two cubelets of slice {} land on {next}",
                turn.slice
            )));
        }
        moved[n] = (id, next);
    }
    let members = members.map(|id| id.unwrap_or_default());
    debug_assert_eq!(
        members,
        turn.direction
            .grid_permutation()
            .map(|p| index.members_of(turn.slice)[p]),
        "coordinate rule and grid permutation disagree for {turn}"
    );

    let mut partial = Vec::with_capacity(6);
    for slice in SliceId::all().filter(|s| s.axis() != axis) {
        let mut entries: Vec<_> = moved
            .iter()
            .filter(|(_, coord)| slice.contains(*coord))
            .map(|&(id, coord)| (grid_position(slice.axis(), coord), id))
            .collect();
        entries.sort_unstable();
        let entries: [(usize, CubeletId); 3] = entries.try_into().map_err(|e: Vec<_>| {
            Error::InvariantViolation(format!(
                "slice {slice} crosses slice {} in {} slots",
                turn.slice,
                e.len()
            ))
        })?;
        partial.push(PartialUpdate { slice, entries });
    }

    Ok(SliceUpdatePlan {
        turn,
        members,
        partial,
        moved,
        quarter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::{Axis, CUBELET_COUNT};

    fn turn(index: &SliceIndex, slice: usize, direction: i32) -> SliceIndex {
        let plan = plan_rotation(index, Move::new(slice, direction).unwrap()).unwrap();
        index.apply(&plan).unwrap()
    }

    #[test]
    fn raw_moves_are_validated() {
        assert_eq!(Move::new(9, 1), Err(Error::InvalidSlice(9)));
        assert_eq!(Move::new(0, 0), Err(Error::InvalidDirection(0)));
        assert_eq!(Move::new(3, 2), Err(Error::InvalidDirection(2)));
        assert_eq!(Move::all().count(), 18);
    }

    #[test]
    fn grid_permutations_are_inverse() {
        for i in 0..9 {
            assert_eq!(CLOCKWISE_GRID[COUNTER_CLOCKWISE_GRID[i]], i);
        }
    }

    #[test]
    fn front_face_turn_moves_coordinates_by_quarter_rule() {
        let index = SliceIndex::solved();
        let plan = plan_rotation(&index, Move::new(0, 1).unwrap()).unwrap();

        for (id, coord) in plan.moved {
            let old = GridCoord::from_home_id(id);
            assert_eq!(old.z, 1);
            assert_eq!(coord, GridCoord::new(old.y, -old.x, old.z));
        }

        let slices: Vec<_> = plan.partial.iter().map(|p| p.slice.index()).collect();
        assert_eq!(slices, vec![3, 4, 5, 6, 7, 8]);

        let next = index.apply(&plan).unwrap();
        for update in &plan.partial {
            let before = index.members_of(update.slice);
            let after = next.members_of(update.slice);
            let changed = (0..9).filter(|&p| before[p] != after[p]).count();
            // the centre row or column keeps its middle cubelet
            let expected = if update.slice.layer() == 0 { 2 } else { 3 };
            assert_eq!(changed, expected, "slice {}", update.slice);
            for (position, id) in update.entries {
                let slot = crate::slice::grid_coord(update.slice, position);
                assert_eq!(next.coord_of(id), Some(slot));
            }
        }
    }

    #[test]
    fn turned_slice_follows_fixed_grid_permutation() {
        let mut index = SliceIndex::solved();
        // scramble a little so the check is not only against the solved layout
        for (slice, direction) in [(0, 1), (4, -1), (7, 1), (2, 1)] {
            index = turn(&index, slice, direction);
        }

        for mv in Move::all() {
            let before = *index.members_of(mv.slice);
            let plan = plan_rotation(&index, mv).unwrap();
            let expected: Members = mv.direction.grid_permutation().map(|p| before[p]);
            assert_eq!(plan.members, expected, "{mv}");
        }
    }

    #[test]
    fn partial_updates_take_boundary_cubelets_of_turned_slice() {
        let index = SliceIndex::solved();
        for mv in Move::all() {
            let plan = plan_rotation(&index, mv).unwrap();
            for update in &plan.partial {
                for (position, id) in update.entries {
                    assert!(plan.members.contains(&id));
                    let slot = crate::slice::grid_coord(update.slice, position);
                    assert!(mv.slice.contains(slot));
                    assert!(plan.moved.contains(&(id, slot)));
                }
            }
        }
    }

    #[test]
    fn four_turns_restore_the_index() {
        let solved = SliceIndex::solved();
        for mv in Move::all() {
            let mut index = solved.clone();
            for _ in 0..4 {
                let plan = plan_rotation(&index, mv).unwrap();
                index = index.apply(&plan).unwrap();
            }
            assert_eq!(index, solved, "{mv}");
        }
    }

    #[test]
    fn inverse_turn_cancels() {
        let solved = SliceIndex::solved();
        for mv in Move::all() {
            let once = solved.apply(&plan_rotation(&solved, mv).unwrap()).unwrap();
            assert_ne!(once, solved);
            let back = once
                .apply(&plan_rotation(&once, mv.inverse()).unwrap())
                .unwrap();
            assert_eq!(back, solved, "{mv}");
        }
    }

    #[test]
    fn same_direction_on_all_layers_is_a_whole_cube_turn() {
        let mut index = SliceIndex::solved();
        for layer in [1, 0, -1] {
            let slice = SliceId::from_axis_layer(Axis::Y, layer);
            index = turn(&index, slice.index(), 1);
        }
        for id in 0..CUBELET_COUNT {
            let home = GridCoord::from_home_id(id);
            assert_eq!(index.coord_of(id), Some(GridCoord::new(-home.z, home.y, home.x)));
        }
    }
}
