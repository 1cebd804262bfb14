//! Puzzle controller.
//!
//! [`PuzzleState`] owns the 27 cubelets, the slice index, the animation
//! scheduler and the camera. Every structural change goes through a single
//! animated (or fast-forwarded) quarter turn that is validated before it is
//! committed.

use std::time::Duration;

use nalgebra::{Matrix3, Matrix4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::{AnimationScheduler, Phase, RotationAnimation, Tick};
use crate::camera::{OrbitCamera, ViewCamera};
use crate::config::Config;
use crate::cube::{CUBELET_COUNT, Cubelet, GridCoord};
use crate::error::{Error, Result};
use crate::renderer::Renderer;
use crate::rotation::{Direction, Move, plan_rotation};
use crate::slice::{SliceId, SliceIndex};

/// Complete simulator state.
#[derive(Debug)]
pub(crate) struct PuzzleState {
    /// Indexed by cubelet id
    cubelets: Vec<Cubelet>,
    slices: SliceIndex,
    scheduler: AnimationScheduler,
    pub(crate) camera: OrbitCamera,
}

impl PuzzleState {
    /// Creates a solved puzzle.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            cubelets: (0..CUBELET_COUNT).map(Cubelet::new).collect(),
            slices: SliceIndex::solved(),
            scheduler: AnimationScheduler::new(config.turn_speed),
            camera: OrbitCamera::new(&config.camera),
        }
    }

    #[cfg(test)]
    pub(crate) fn cubelets(&self) -> &[Cubelet] {
        &self.cubelets
    }

    #[cfg(test)]
    pub(crate) fn slices(&self) -> &SliceIndex {
        &self.slices
    }

    pub(crate) fn phase(&self) -> Phase {
        self.scheduler.phase()
    }

    pub(crate) fn is_animating(&self) -> bool {
        !self.scheduler.is_idle()
    }

    /// Pushes every cubelet's resting geometry to the renderer.
    pub(crate) fn upload_all(&self, renderer: &mut impl Renderer) {
        for cubelet in &self.cubelets {
            renderer.upload_geometry(cubelet.id, &cubelet.base_vertices, &cubelet.face_colors());
        }
    }

    /// Starts an animated quarter turn of `slice` in `direction` (+1 or -1).
    ///
    /// Rejected without any effect if the arguments are invalid or another
    /// turn is still in flight.
    pub(crate) fn rotate(&mut self, slice: usize, direction: i32) -> Result<Move> {
        let turn = Move::new(slice, direction)?;
        self.start(turn)?;
        Ok(turn)
    }

    /// Starts an animated quarter turn.
    pub(crate) fn start(&mut self, turn: Move) -> Result<()> {
        if !self.scheduler.is_idle() {
            log::warn!("rejected {turn}: a rotation is already in progress");
            return Err(Error::AnimationInProgress);
        }
        let plan = plan_rotation(&self.slices, turn)?;
        self.scheduler.start(plan)?;
        log::debug!("turning {turn}");
        Ok(())
    }

    /// Advances the active turn by `dt` and commits it once complete.
    ///
    /// Returns whether anything changed that needs a redraw, or the
    /// [`Error::InvariantViolation`] of a turn whose commit was refused.
    pub(crate) fn tick(&mut self, dt: Duration, renderer: &mut impl Renderer) -> Result<bool> {
        match self.scheduler.tick(dt) {
            Tick::Nothing => Ok(false),
            Tick::Frame {
                angle,
                transform,
                cubelets,
            } => {
                log::trace!("frame at {:.1}°", angle.to_degrees());
                for id in cubelets {
                    self.cubelets[id].render_transform = transform;
                }
                Ok(true)
            }
            Tick::Complete => {
                if let Some(animation) = self.scheduler.finish() {
                    self.commit(animation, renderer)?;
                }
                Ok(true)
            }
        }
    }

    /// Runs the active turn, if any, straight to its commit.
    pub(crate) fn finish_rotation(&mut self, renderer: &mut impl Renderer) -> Result<()> {
        self.scheduler.skip_to_end();
        self.tick(Duration::ZERO, renderer).map(|_| ())
    }

    /// Applies a turn synchronously, commit included.
    pub(crate) fn perform(&mut self, turn: Move, renderer: &mut impl Renderer) -> Result<()> {
        self.start(turn)?;
        self.finish_rotation(renderer)
    }

    /// Applies `move_count` random turns, each fully committed before the next.
    ///
    /// The same seed always produces the same sequence, which is returned so
    /// the scramble can be replayed or undone. A refused commit stops the
    /// scramble with its error; turns already applied stay applied.
    pub(crate) fn scramble(
        &mut self,
        move_count: usize,
        seed: u64,
        renderer: &mut impl Renderer,
    ) -> Result<Vec<Move>> {
        if !self.scheduler.is_idle() {
            return Err(Error::AnimationInProgress);
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut moves = Vec::with_capacity(move_count);
        for _ in 0..move_count {
            let slice = SliceId::new(rng.gen_range(0..SliceId::COUNT))?;
            let direction = if rng.gen_bool(0.5) {
                Direction::Clockwise
            } else {
                Direction::CounterClockwise
            };
            let turn = Move { slice, direction };
            self.perform(turn, renderer)?;
            moves.push(turn);
        }
        log::info!("scrambled with {move_count} turns (seed {seed})");
        Ok(moves)
    }

    /// Returns to the solved state. Rejected while a turn is in flight.
    pub(crate) fn reset(&mut self, renderer: &mut impl Renderer) -> Result<()> {
        if !self.scheduler.is_idle() {
            return Err(Error::AnimationInProgress);
        }
        self.cubelets = (0..CUBELET_COUNT).map(Cubelet::new).collect();
        self.slices = SliceIndex::solved();
        self.upload_all(renderer);
        log::info!("puzzle reset");
        Ok(())
    }

    /// Issues one draw per cubelet with its current animation transform.
    pub(crate) fn render(&self, view_projection: &Matrix4<f32>, renderer: &mut impl Renderer) {
        for cubelet in &self.cubelets {
            renderer.draw(cubelet.id, &cubelet.render_transform, view_projection);
        }
    }

    /// Renders with the owned camera's current view.
    pub(crate) fn render_frame(&self, renderer: &mut impl Renderer) {
        self.render(&self.camera.current_view_projection(), renderer);
    }

    /// True when every cubelet is back in its solved position and orientation.
    pub(crate) fn is_solved(&self) -> bool {
        self.cubelets
            .iter()
            .all(|c| c.coord == c.home && c.orientation == Matrix3::identity())
    }

    /// Current grid coordinate of every cubelet, indexed by id.
    pub(crate) fn grid_coords(&self) -> Vec<GridCoord> {
        self.cubelets.iter().map(|c| c.coord).collect()
    }

    /// Makes a finished turn permanent, or discards it if it would break an
    /// invariant.
    ///
    /// A discarded turn leaves the slice index and resting geometry as they
    /// were and only snaps the turning cubelets back to rest.
    fn commit(&mut self, animation: RotationAnimation, renderer: &mut impl Renderer) -> Result<()> {
        let plan = &animation.plan;
        let next = self.slices.apply(plan).and_then(|next| {
            let mut coords = self.grid_coords();
            for &(id, coord) in &plan.moved {
                coords[id] = coord;
            }
            if SliceIndex::from_coords(&coords)? == next {
                Ok(next)
            } else {
                Err(Error::InvariantViolation(format!(
                    "membership after {} disagrees with cubelet coordinates",
                    plan.turn
                )))
            }
        });

        match next {
            Ok(next) => {
                self.slices = next;
                for &(id, coord) in &plan.moved {
                    let cubelet = &mut self.cubelets[id];
                    cubelet.bake(&plan.quarter, coord);
                    renderer.upload_geometry(id, &cubelet.base_vertices, &cubelet.face_colors());
                }
                log::debug!("committed {}", plan.turn);
                Ok(())
            }
            Err(err) => {
                for id in plan.cubelets() {
                    self.cubelets[id].render_transform = Matrix4::identity();
                }
                log::error!("discarding {}: {err}", plan.turn);
                if cfg!(debug_assertions) {
                    panic!("discarded {}: {err}", plan.turn);
                }
                Err(err)
            }
        }
    }
}
