//! Rendering backend for the puzzle.
//!
//! The puzzle pushes cubelet geometry through the [`Renderer`] trait and asks
//! for one draw per cubelet per frame. [`SceneRenderer`] is the backend used
//! by the application: it projects every cubelet face on the CPU and keeps
//! the visible ones sorted back to front, ready for a 2D canvas.

use std::collections::HashMap;

use nalgebra::{Matrix4, Point2, Point3, Vector4};

use crate::cube::CubeletId;

/// Faces closer than this to the eye plane are dropped rather than projected.
const MIN_CLIP_W: f32 = 1e-4;

/// What the puzzle consumes from a rendering backend.
pub(crate) trait Renderer {
    /// Replaces the resting geometry of a cubelet.
    ///
    /// `vertices` holds 4 corners per face; `colors` holds one color per face.
    fn upload_geometry(&mut self, id: CubeletId, vertices: &[Point3<f32>], colors: &[Vector4<f32>]);

    /// Draws a cubelet with `model` applied on top of its uploaded geometry.
    fn draw(&mut self, id: CubeletId, model: &Matrix4<f32>, view_projection: &Matrix4<f32>);
}

/// A projected, front-facing cubelet face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Facet {
    /// Corners in normalised device coordinates, counter-clockwise
    pub(crate) corners: [Point2<f32>; 4],
    /// Mean NDC depth, larger is farther
    pub(crate) depth: f32,
    pub(crate) color: Vector4<f32>,
}

#[derive(Debug, Clone)]
struct Mesh {
    vertices: Vec<Point3<f32>>,
    colors: Vec<Vector4<f32>>,
}

/// CPU renderer producing painter-ordered facets.
#[derive(Debug, Default)]
pub(crate) struct SceneRenderer {
    meshes: HashMap<CubeletId, Mesh>,
    facets: Vec<Facet>,
}

impl SceneRenderer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Discards the facets of the previous frame.
    pub(crate) fn begin_frame(&mut self) {
        self.facets.clear();
    }

    /// Sorts the frame's facets back to front.
    pub(crate) fn end_frame(&mut self) {
        self.facets
            .sort_by(|a, b| b.depth.total_cmp(&a.depth));
    }

    pub(crate) fn facets(&self) -> &[Facet] {
        &self.facets
    }
}

impl Renderer for SceneRenderer {
    fn upload_geometry(&mut self, id: CubeletId, vertices: &[Point3<f32>], colors: &[Vector4<f32>]) {
        self.meshes.insert(
            id,
            Mesh {
                vertices: vertices.to_vec(),
                colors: colors.to_vec(),
            },
        );
    }

    fn draw(&mut self, id: CubeletId, model: &Matrix4<f32>, view_projection: &Matrix4<f32>) {
        let Some(mesh) = self.meshes.get(&id) else {
            log::warn!("cubelet {id} drawn before its geometry was uploaded");
            return;
        };
        let mvp = view_projection * model;

        'faces: for (face, quad) in mesh.vertices.chunks_exact(4).enumerate() {
            let mut corners = [Point2::origin(); 4];
            let mut depth = 0.0;
            for (corner, vertex) in corners.iter_mut().zip(quad) {
                let clip = mvp * vertex.to_homogeneous();
                if clip.w < MIN_CLIP_W {
                    continue 'faces;
                }
                *corner = Point2::new(clip.x / clip.w, clip.y / clip.w);
                depth += clip.z / clip.w;
            }

            // back faces wind clockwise once projected
            if signed_area(&corners) <= 0.0 {
                continue;
            }

            let color = mesh
                .colors
                .get(face)
                .copied()
                .unwrap_or_else(|| Vector4::new(1.0, 0.0, 1.0, 1.0));
            self.facets.push(Facet {
                corners,
                depth: depth / 4.0,
                color,
            });
        }
    }
}

/// Twice the signed area of a polygon, positive when counter-clockwise.
fn signed_area(corners: &[Point2<f32>]) -> f32 {
    corners
        .iter()
        .zip(corners.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::{Color, Cubelet, GridCoord};

    fn front_view() -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(
            &Point3::new(0.0, 0.0, 10.0),
            &Point3::origin(),
            &nalgebra::Vector3::y(),
        );
        Matrix4::new_perspective(1.0, 45f32.to_radians(), 0.1, 100.0) * view
    }

    fn uploaded(cubelet: &Cubelet) -> SceneRenderer {
        let mut renderer = SceneRenderer::new();
        renderer.upload_geometry(cubelet.id, &cubelet.base_vertices, &cubelet.face_colors());
        renderer
    }

    #[test]
    fn head_on_view_shows_only_the_front_face() {
        let core = Cubelet::new(GridCoord::new(0, 0, 1).home_id());
        let mut renderer = uploaded(&core);
        renderer.begin_frame();
        renderer.draw(core.id, &Matrix4::identity(), &front_view());
        renderer.end_frame();

        let facets = renderer.facets();
        assert_eq!(facets.len(), 1);
        assert_eq!(facets[0].color, Vector4::from(Color::White));
        assert!(facets[0].corners.iter().all(|c| c.x.abs() < 1.0 && c.y.abs() < 1.0));
    }

    #[test]
    fn facets_are_sorted_back_to_front() {
        let near = Cubelet::new(GridCoord::new(1, 1, 1).home_id());
        let far = Cubelet::new(GridCoord::new(-1, -1, -1).home_id());
        let mut renderer = uploaded(&near);
        renderer.upload_geometry(far.id, &far.base_vertices, &far.face_colors());

        let view = Matrix4::look_at_rh(
            &Point3::new(12.0, 12.0, 12.0),
            &Point3::origin(),
            &nalgebra::Vector3::y(),
        );
        let vp = Matrix4::new_perspective(1.0, 45f32.to_radians(), 0.1, 100.0) * view;
        renderer.begin_frame();
        renderer.draw(near.id, &Matrix4::identity(), &vp);
        renderer.draw(far.id, &Matrix4::identity(), &vp);
        renderer.end_frame();

        let facets = renderer.facets();
        assert_eq!(facets.len(), 6);
        assert!(facets.windows(2).all(|w| w[0].depth >= w[1].depth));
    }

    #[test]
    fn draw_without_upload_is_skipped() {
        let mut renderer = SceneRenderer::new();
        renderer.draw(3, &Matrix4::identity(), &front_view());
        assert!(renderer.facets().is_empty());
    }

    #[test]
    fn signed_area_tracks_winding() {
        let ccw = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        assert_eq!(signed_area(&ccw), 2.0);
        let mut cw = ccw;
        cw.reverse();
        assert_eq!(signed_area(&cw), -2.0);
    }
}
