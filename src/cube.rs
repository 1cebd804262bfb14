//! Cubelet data structures and geometry.
//!
//! This module defines the pieces the 3×3×3 puzzle is built from: the three
//! turn axes, integer grid coordinates, face colors, and the individual
//! cubelets with their resting geometry and per-frame transform.

use std::fmt;

use nalgebra::{Matrix3, Matrix4, Point3, Unit, Vector3, Vector4};

/// Stable identity of a cubelet, `0..27`.
pub(crate) type CubeletId = usize;

/// Number of cubelets in the puzzle.
pub(crate) const CUBELET_COUNT: usize = 27;

/// Distance between the centres of neighbouring cubelets.
pub(crate) const CUBELET_SPACING: f32 = 2.0;

/// Vertices per cubelet (6 faces × 4 corners, not shared between faces).
pub(crate) const VERTEX_COUNT: usize = 24;

/// One of the three turn axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub(crate) const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit vector along the positive end of the axis.
    pub(crate) fn unit(self) -> Unit<Vector3<f32>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

/// Integer position of a cubelet, each component in `{-1, 0, 1}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct GridCoord {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) z: i32,
}

impl GridCoord {
    pub(crate) const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Home coordinate of a cubelet id; the inverse of [`GridCoord::home_id`].
    pub(crate) fn from_home_id(id: CubeletId) -> Self {
        let id = id as i32;
        Self::new(id / 9 - 1, (id / 3) % 3 - 1, id % 3 - 1)
    }

    /// Id of the cubelet whose solved position is this coordinate.
    pub(crate) fn home_id(self) -> CubeletId {
        (9 * (self.x + 1) + 3 * (self.y + 1) + (self.z + 1)) as CubeletId
    }

    pub(crate) fn component(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub(crate) fn is_valid(self) -> bool {
        [self.x, self.y, self.z].iter().all(|c| (-1..=1).contains(c))
    }

    /// Applies an integer rotation matrix to the coordinate.
    pub(crate) fn transformed(self, rotation: &Matrix3<i32>) -> Self {
        let v = rotation * Vector3::new(self.x, self.y, self.z);
        Self::new(v.x, v.y, v.z)
    }

    /// World-space centre of a cubelet resting at this coordinate.
    pub(crate) fn center(self) -> Vector3<f32> {
        Vector3::new(self.x as f32, self.y as f32, self.z as f32) * CUBELET_SPACING
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Sticker colors, using the standard Rubik's cube scheme plus a dark
/// interior shade for faces hidden inside the puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    White,
    Orange,
    Green,
    Blue,
    Yellow,
    Red,
    Interior,
}

impl From<Color> for Vector4<f32> {
    /// Converts a color enum to RGBA color values.
    fn from(color: Color) -> Self {
        match color {
            Color::White => Vector4::new(0.953, 0.953, 0.953, 1.0),
            Color::Orange => Vector4::new(0.91, 0.62, 0.08, 1.0),
            Color::Green => Vector4::new(0.0, 0.62, 0.33, 1.0),
            Color::Blue => Vector4::new(0.24, 0.5, 0.96, 1.0),
            Color::Yellow => Vector4::new(0.95, 0.95, 0.08, 1.0),
            Color::Red => Vector4::new(0.93, 0.19, 0.19, 1.0),
            Color::Interior => Vector4::new(0.08, 0.08, 0.08, 1.0),
        }
    }
}

/// The six faces of a cubelet, in vertex-table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Face {
    Front,
    Back,
    Top,
    Bottom,
    Right,
    Left,
}

impl Face {
    pub(crate) const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Top,
        Face::Bottom,
        Face::Right,
        Face::Left,
    ];

    /// Axis the face is perpendicular to and the sign of its outward normal.
    pub(crate) fn normal(self) -> (Axis, i32) {
        match self {
            Face::Front => (Axis::Z, 1),
            Face::Back => (Axis::Z, -1),
            Face::Top => (Axis::Y, 1),
            Face::Bottom => (Axis::Y, -1),
            Face::Right => (Axis::X, 1),
            Face::Left => (Axis::X, -1),
        }
    }

    /// Sticker color shown by this face in the solved puzzle.
    pub(crate) fn sticker_color(self) -> Color {
        match self {
            Face::Front => Color::White,
            Face::Back => Color::Orange,
            Face::Top => Color::Green,
            Face::Bottom => Color::Blue,
            Face::Right => Color::Yellow,
            Face::Left => Color::Red,
        }
    }
}

/// 24 corners of a unit cubelet, 4 per face in [`Face::ALL`] order.
///
/// Each face is wound counter-clockwise seen from outside, so a projected face
/// with clockwise winding is facing away from the viewer.
#[rustfmt::skip]
pub(crate) const CUBELET_VERTICES: [[f32; 3]; VERTEX_COUNT] = [
    // Front
    [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0],
    // Back
    [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],
    // Top
    [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0],
    // Bottom
    [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
    // Right
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0],
    // Left
    [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],
];

/// A single sub-cube of the puzzle.
///
/// `base_vertices` holds the resting pose; `render_transform` is layered on
/// top while the cubelet is part of an animating slice and is the identity
/// otherwise.
#[derive(Clone, Debug)]
pub(crate) struct Cubelet {
    /// Stable identity, never reused
    pub(crate) id: CubeletId,
    /// Coordinate in the solved puzzle
    pub(crate) home: GridCoord,
    /// Coordinate in the current resting pose
    pub(crate) coord: GridCoord,
    /// Accumulated quarter turns since the solved state
    pub(crate) orientation: Matrix3<i32>,
    /// Vertex positions in the current resting pose
    pub(crate) base_vertices: [Point3<f32>; VERTEX_COUNT],
    /// Per-face colors, in [`Face::ALL`] order
    pub(crate) colors: [Color; 6],
    /// Animation transform applied on top of `base_vertices`
    pub(crate) render_transform: Matrix4<f32>,
}

impl Cubelet {
    /// Creates the cubelet with the given id in its solved position.
    ///
    /// Faces that lie on the outside of the puzzle get their sticker color,
    /// the rest are colored as interior.
    ///
    /// # Arguments
    /// * `id` - Stable identity in `0..27`; also encodes the home coordinate
    ///
    /// # Returns
    /// A cubelet at rest on its home coordinate with identity orientation
    pub(crate) fn new(id: CubeletId) -> Self {
        let home = GridCoord::from_home_id(id);
        let center = home.center();
        let base_vertices = std::array::from_fn(|i| {
            let [x, y, z] = CUBELET_VERTICES[i];
            Point3::new(x, y, z) + center
        });
        let colors = Face::ALL.map(|face| {
            let (axis, sign) = face.normal();
            if home.component(axis) == sign {
                face.sticker_color()
            } else {
                Color::Interior
            }
        });

        Self {
            id,
            home,
            coord: home,
            orientation: Matrix3::identity(),
            base_vertices,
            colors,
            render_transform: Matrix4::identity(),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_at_rest(&self) -> bool {
        self.render_transform == Matrix4::identity()
    }

    /// RGBA values for each face, in [`Face::ALL`] order.
    pub(crate) fn face_colors(&self) -> [Vector4<f32>; 6] {
        self.colors.map(Vector4::from)
    }

    /// Permanently applies a quarter turn to the resting pose.
    ///
    /// The integer rotation keeps vertex coordinates exact. Also clears the
    /// animation transform, so the cubelet is at rest afterwards.
    ///
    /// # Arguments
    /// * `quarter` - Exact quarter-turn matrix of the committed slice turn
    /// * `new_coord` - Resting coordinate after the turn; must equal
    ///   `self.coord` transformed by `quarter`
    pub(crate) fn bake(&mut self, quarter: &Matrix3<i32>, new_coord: GridCoord) {
        let rotation = quarter.map(|v| v as f32);
        for vertex in &mut self.base_vertices {
            *vertex = rotation * *vertex;
        }
        self.orientation = quarter * self.orientation;
        self.coord = new_coord;
        self.render_transform = Matrix4::identity();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::quarter_turn;
    use crate::rotation::Direction;

    #[test]
    fn home_id_round_trips() {
        for id in 0..CUBELET_COUNT {
            let coord = GridCoord::from_home_id(id);
            assert!(coord.is_valid());
            assert_eq!(coord.home_id(), id);
        }
    }

    #[test]
    fn corner_cubelet_has_three_stickers() {
        let corner = Cubelet::new(GridCoord::new(1, 1, 1).home_id());
        let stickers = corner
            .colors
            .iter()
            .filter(|&&c| c != Color::Interior)
            .count();
        assert_eq!(stickers, 3);
        assert_eq!(corner.colors[0], Color::White);
        assert_eq!(corner.colors[2], Color::Green);
        assert_eq!(corner.colors[4], Color::Yellow);

        let core = Cubelet::new(GridCoord::new(0, 0, 0).home_id());
        assert!(core.colors.iter().all(|&c| c == Color::Interior));
    }

    #[test]
    fn new_cubelet_is_centered_on_its_coordinate() {
        let cubelet = Cubelet::new(GridCoord::new(-1, 0, 1).home_id());
        let sum = cubelet
            .base_vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.coords);
        assert_eq!(sum / VERTEX_COUNT as f32, Vector3::new(-2.0, 0.0, 2.0));
        assert!(cubelet.is_at_rest());
    }

    #[test]
    fn bake_moves_vertices_exactly() {
        let mut cubelet = Cubelet::new(GridCoord::new(1, 0, 1).home_id());
        let quarter = quarter_turn(Axis::Z, Direction::Clockwise);
        let new_coord = cubelet.coord.transformed(&quarter);
        cubelet.bake(&quarter, new_coord);

        assert_eq!(new_coord, GridCoord::new(0, -1, 1));
        let sum = cubelet
            .base_vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.coords);
        assert_eq!(sum / VERTEX_COUNT as f32, new_coord.center());
        assert_eq!(cubelet.orientation, quarter);
    }
}
