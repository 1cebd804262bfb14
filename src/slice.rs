//! Slice index: which cubelet occupies which slot of each rotatable slice.
//!
//! The index is the permutation ground truth of the puzzle. Every cubelet
//! appears exactly once per axis, and the three slices it belongs to pin down
//! its grid coordinate. Mutation happens only through [`SliceIndex::apply`],
//! which validates the result before handing it back.

use std::fmt;

use crate::cube::{Axis, CUBELET_COUNT, CubeletId, GridCoord};
use crate::error::{Error, Result};
use crate::rotation::SliceUpdatePlan;

/// The 9 cubelet ids of a slice in row-major grid order.
pub(crate) type Members = [CubeletId; 9];

/// One of the 9 rotatable slices.
///
/// Ids 0..=2 are the Z slices, 3..=5 the Y slices and 6..=8 the X slices;
/// within each triple the layer runs +1, 0, -1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SliceId(u8);

impl SliceId {
    pub(crate) const COUNT: usize = 9;

    pub(crate) fn new(index: usize) -> Result<Self> {
        if index < Self::COUNT {
            Ok(Self(index as u8))
        } else {
            Err(Error::InvalidSlice(index))
        }
    }

    pub(crate) fn from_axis_layer(axis: Axis, layer: i32) -> Self {
        let base = match axis {
            Axis::Z => 0,
            Axis::Y => 3,
            Axis::X => 6,
        };
        Self(base + (1 - layer) as u8)
    }

    pub(crate) fn all() -> impl Iterator<Item = SliceId> {
        (0..Self::COUNT as u8).map(SliceId)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn axis(self) -> Axis {
        match self.0 / 3 {
            0 => Axis::Z,
            1 => Axis::Y,
            _ => Axis::X,
        }
    }

    pub(crate) fn layer(self) -> i32 {
        1 - (self.0 % 3) as i32
    }

    pub(crate) fn contains(self, coord: GridCoord) -> bool {
        coord.component(self.axis()) == self.layer()
    }
}

impl TryFrom<usize> for SliceId {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Self::new(index)
    }
}

impl fmt::Display for SliceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:+}", self.axis(), self.layer())
    }
}

/// Row-major slot of `coord` inside a slice perpendicular to `axis`.
///
/// Each grid is laid out as seen from the positive end of its axis:
/// Z rows run y = +1..-1 with columns x = -1..+1, Y rows run z = -1..+1 with
/// columns x = -1..+1, X rows run y = +1..-1 with columns z = +1..-1.
pub(crate) fn grid_position(axis: Axis, coord: GridCoord) -> usize {
    let (row, col) = match axis {
        Axis::Z => (1 - coord.y, coord.x + 1),
        Axis::Y => (coord.z + 1, coord.x + 1),
        Axis::X => (1 - coord.y, 1 - coord.z),
    };
    (row * 3 + col) as usize
}

/// Grid coordinate of slot `position` in `slice`; inverse of [`grid_position`].
pub(crate) fn grid_coord(slice: SliceId, position: usize) -> GridCoord {
    let row = (position / 3) as i32;
    let col = (position % 3) as i32;
    let layer = slice.layer();
    match slice.axis() {
        Axis::Z => GridCoord::new(col - 1, 1 - row, layer),
        Axis::Y => GridCoord::new(col - 1, layer, row - 1),
        Axis::X => GridCoord::new(layer, 1 - row, 1 - col),
    }
}

/// Authoritative record of cubelet-to-slot assignment for all 9 slices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SliceIndex {
    slices: [Members; SliceId::COUNT],
}

impl SliceIndex {
    /// Canonical membership of the solved puzzle.
    pub(crate) fn solved() -> Self {
        let slices = std::array::from_fn(|s| {
            let slice = SliceId(s as u8);
            std::array::from_fn(|p| grid_coord(slice, p).home_id())
        });
        Self { slices }
    }

    /// Rebuilds membership from each cubelet's grid coordinate.
    ///
    /// `coords[id]` is the coordinate of cubelet `id`. Fails if a coordinate
    /// is out of range or two cubelets share one.
    pub(crate) fn from_coords(coords: &[GridCoord]) -> Result<Self> {
        if coords.len() != CUBELET_COUNT {
            return Err(Error::InvariantViolation(format!(
                "expected {CUBELET_COUNT} coordinates, got {}",
                coords.len()
            )));
        }

        let mut slots = [[None::<CubeletId>; 9]; SliceId::COUNT];
        for (id, &coord) in coords.iter().enumerate() {
            if !coord.is_valid() {
                return Err(Error::InvariantViolation(format!(
                    "cubelet {id} at {coord} is outside the grid"
                )));
            }
            for axis in Axis::ALL {
                let slice = SliceId::from_axis_layer(axis, coord.component(axis));
                let slot = &mut slots[slice.index()][grid_position(axis, coord)];
                if let Some(other) = slot.replace(id) {
                    return Err(Error::InvariantViolation(format!(
                        "cubelets {other} and {id} both occupy {coord}"
                    )));
                }
            }
        }

        // 27 distinct in-range coordinates fill every slot
        let slices = slots.map(|members| members.map(|id| id.unwrap_or_default()));
        Ok(Self { slices })
    }

    pub(crate) fn members_of(&self, slice: SliceId) -> &Members {
        &self.slices[slice.index()]
    }

    fn set_members(&mut self, slice: SliceId, members: Members) {
        self.slices[slice.index()] = members;
    }

    /// Grid coordinate of a cubelet, derived from its three memberships.
    pub(crate) fn coord_of(&self, id: CubeletId) -> Option<GridCoord> {
        let mut layers = [0; 3];
        for (n, axis) in Axis::ALL.into_iter().enumerate() {
            let slice = SliceId::all()
                .filter(|s| s.axis() == axis)
                .find(|s| self.members_of(*s).contains(&id))?;
            layers[n] = slice.layer();
        }
        Some(GridCoord::new(layers[0], layers[1], layers[2]))
    }

    /// Coordinates of all cubelets, indexed by id.
    #[cfg(test)]
    pub(crate) fn coords(&self) -> Result<Vec<GridCoord>> {
        (0..CUBELET_COUNT)
            .map(|id| {
                self.coord_of(id).ok_or_else(|| {
                    Error::InvariantViolation(format!("cubelet {id} is missing from an axis"))
                })
            })
            .collect()
    }

    /// Returns the index that results from applying `plan`.
    ///
    /// `self` is left untouched; the result has passed [`SliceIndex::validate`].
    pub(crate) fn apply(&self, plan: &SliceUpdatePlan) -> Result<SliceIndex> {
        let mut next = self.clone();
        next.set_members(plan.turn.slice, plan.members);
        for update in &plan.partial {
            let mut members = *next.members_of(update.slice);
            for &(position, id) in &update.entries {
                members[position] = id;
            }
            next.set_members(update.slice, members);
        }
        next.validate()?;
        Ok(next)
    }

    /// Checks the global membership invariants.
    ///
    /// Every id must appear exactly once per axis, and its slot in each slice
    /// must agree with the coordinate implied by its three layers.
    pub(crate) fn validate(&self) -> Result<()> {
        for axis in Axis::ALL {
            let mut seen = [false; CUBELET_COUNT];
            for slice in SliceId::all().filter(|s| s.axis() == axis) {
                for &id in self.members_of(slice) {
                    if id >= CUBELET_COUNT {
                        return Err(Error::InvariantViolation(format!(
                            "slice {slice} holds unknown cubelet {id}"
                        )));
                    }
                    if std::mem::replace(&mut seen[id], true) {
                        return Err(Error::InvariantViolation(format!(
                            "cubelet {id} appears twice on axis {axis}"
                        )));
                    }
                }
            }
            if let Some(missing) = seen.iter().position(|&s| !s) {
                return Err(Error::InvariantViolation(format!(
                    "cubelet {missing} is missing from axis {axis}"
                )));
            }
        }

        for slice in SliceId::all() {
            for (position, &id) in self.members_of(slice).iter().enumerate() {
                let coord = self.coord_of(id).ok_or_else(|| {
                    Error::InvariantViolation(format!("cubelet {id} has no coordinate"))
                })?;
                if grid_position(slice.axis(), coord) != position {
                    return Err(Error::InvariantViolation(format!(
                        "cubelet {id} at {coord} sits in slot {position} of slice {slice}"
                    )));
                }
            }
        }
        Ok(())
    }
}
