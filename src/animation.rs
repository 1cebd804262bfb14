//! Animation scheduler for slice turns.
//!
//! At most one rotation is in flight. The scheduler moves it through
//! `Idle -> Animating -> Committing -> Idle`, advancing the angle by wall time
//! supplied from outside, and hands the finished rotation back to the owner
//! for the commit.

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use nalgebra::Matrix4;

use crate::cube::CubeletId;
use crate::error::{Error, Result};
use crate::math::partial_turn;
use crate::rotation::SliceUpdatePlan;

/// The single active rotation.
#[derive(Clone, Debug)]
pub(crate) struct RotationAnimation {
    /// Membership changes applied on commit
    pub(crate) plan: SliceUpdatePlan,
    /// Angle covered so far, in radians
    pub(crate) elapsed: f32,
    /// Angle at which the turn is complete
    pub(crate) target: f32,
}

impl RotationAnimation {
    pub(crate) fn new(plan: SliceUpdatePlan) -> Self {
        Self {
            plan,
            elapsed: 0.0,
            target: FRAC_PI_2,
        }
    }

    pub(crate) fn angle(&self) -> f32 {
        self.elapsed.min(self.target)
    }

    /// Transform for the turning cubelets at the current angle.
    pub(crate) fn transform(&self) -> Matrix4<f32> {
        let turn = self.plan.turn;
        partial_turn(turn.slice.axis(), turn.direction, self.angle())
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.elapsed >= self.target
    }
}

/// Externally visible state of the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Animating,
    Committing,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Animating(RotationAnimation),
    Committing(RotationAnimation),
}

/// Result of advancing the scheduler by one frame.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Tick {
    /// Nothing to draw
    Nothing,
    /// The turning cubelets should be drawn with `transform`
    Frame {
        angle: f32,
        transform: Matrix4<f32>,
        cubelets: [CubeletId; 9],
    },
    /// The turn reached its target; call [`AnimationScheduler::finish`]
    Complete,
}

/// Drives a single rotation from 0 to 90 degrees.
#[derive(Debug)]
pub(crate) struct AnimationScheduler {
    state: State,
    /// Radians per second
    angular_speed: f32,
}

impl AnimationScheduler {
    pub(crate) fn new(angular_speed: f32) -> Self {
        debug_assert!(angular_speed > 0.0);
        Self {
            state: State::Idle,
            angular_speed,
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::Animating(_) => Phase::Animating,
            State::Committing(_) => Phase::Committing,
        }
    }

    pub(crate) fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    #[cfg(test)]
    pub(crate) fn active(&self) -> Option<&RotationAnimation> {
        match &self.state {
            State::Idle => None,
            State::Animating(animation) | State::Committing(animation) => Some(animation),
        }
    }

    /// Begins animating `plan`. Rejected unless idle.
    pub(crate) fn start(&mut self, plan: SliceUpdatePlan) -> Result<()> {
        if !self.is_idle() {
            return Err(Error::AnimationInProgress);
        }
        self.state = State::Animating(RotationAnimation::new(plan));
        Ok(())
    }

    /// Advances the active rotation by `dt` of wall time.
    pub(crate) fn tick(&mut self, dt: Duration) -> Tick {
        match std::mem::take(&mut self.state) {
            State::Idle => Tick::Nothing,
            State::Animating(mut animation) => {
                animation.elapsed += dt.as_secs_f32() * self.angular_speed;
                if animation.is_complete() {
                    self.state = State::Committing(animation);
                    return Tick::Complete;
                }
                let tick = if animation.elapsed > 0.0 {
                    Tick::Frame {
                        angle: animation.angle(),
                        transform: animation.transform(),
                        cubelets: animation.plan.cubelets(),
                    }
                } else {
                    Tick::Nothing
                };
                self.state = State::Animating(animation);
                tick
            }
            State::Committing(animation) => {
                self.state = State::Committing(animation);
                Tick::Complete
            }
        }
    }

    /// Jumps the active rotation to its target without intermediate frames.
    pub(crate) fn skip_to_end(&mut self) {
        if let State::Animating(mut animation) = std::mem::take(&mut self.state) {
            animation.elapsed = animation.target;
            self.state = State::Committing(animation);
        }
    }

    /// Hands a completed rotation back for the commit and returns to idle.
    ///
    /// Returns `None`, leaving the state alone, if no rotation is committing.
    pub(crate) fn finish(&mut self) -> Option<RotationAnimation> {
        match std::mem::take(&mut self.state) {
            State::Committing(animation) => Some(animation),
            other => {
                self.state = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::{Move, plan_rotation};
    use crate::slice::SliceIndex;

    fn plan(slice: usize, direction: i32) -> SliceUpdatePlan {
        plan_rotation(&SliceIndex::solved(), Move::new(slice, direction).unwrap()).unwrap()
    }

    #[test]
    fn runs_through_all_phases() {
        let mut scheduler = AnimationScheduler::new(10.0);
        assert_eq!(scheduler.phase(), Phase::Idle);
        assert_eq!(scheduler.tick(Duration::from_millis(16)), Tick::Nothing);

        scheduler.start(plan(0, 1)).unwrap();
        assert_eq!(scheduler.phase(), Phase::Animating);

        let mut frames = Vec::new();
        loop {
            match scheduler.tick(Duration::from_millis(16)) {
                Tick::Frame { angle, .. } => frames.push(angle),
                Tick::Complete => break,
                Tick::Nothing => panic!("active rotation produced no frame"),
            }
        }
        assert_eq!(scheduler.phase(), Phase::Committing);
        assert!(!frames.is_empty());
        assert!(frames.iter().all(|&a| a > 0.0 && a < FRAC_PI_2));
        assert!(frames.windows(2).all(|w| w[0] < w[1]));

        let finished = scheduler.finish().unwrap();
        assert!(finished.is_complete());
        assert_eq!(scheduler.phase(), Phase::Idle);
        assert!(scheduler.finish().is_none());
    }

    #[test]
    fn rejects_second_rotation_while_busy() {
        let mut scheduler = AnimationScheduler::new(10.0);
        scheduler.start(plan(4, -1)).unwrap();
        assert_eq!(scheduler.start(plan(6, 1)), Err(Error::AnimationInProgress));
        assert_eq!(scheduler.active().unwrap().plan, plan(4, -1));

        scheduler.skip_to_end();
        assert_eq!(scheduler.phase(), Phase::Committing);
        assert_eq!(scheduler.start(plan(6, 1)), Err(Error::AnimationInProgress));
        // committing persists until finished
        assert_eq!(scheduler.tick(Duration::ZERO), Tick::Complete);
        assert!(scheduler.finish().is_some());
        assert!(scheduler.start(plan(6, 1)).is_ok());
    }

    #[test]
    fn zero_dt_does_not_draw_the_start_angle() {
        let mut scheduler = AnimationScheduler::new(10.0);
        scheduler.start(plan(2, 1)).unwrap();
        assert_eq!(scheduler.tick(Duration::ZERO), Tick::Nothing);
        assert_eq!(scheduler.phase(), Phase::Animating);
    }

    #[test]
    fn one_long_frame_completes_immediately() {
        let mut scheduler = AnimationScheduler::new(10.0);
        scheduler.start(plan(7, 1)).unwrap();
        assert_eq!(scheduler.tick(Duration::from_secs(1)), Tick::Complete);
        let finished = scheduler.finish().unwrap();
        assert_eq!(finished.angle(), FRAC_PI_2);
    }

    #[test]
    fn frame_transform_turns_the_slice_cubelets() {
        let mut scheduler = AnimationScheduler::new(10.0);
        let expected = plan(3, 1).cubelets();
        scheduler.start(plan(3, 1)).unwrap();
        match scheduler.tick(Duration::from_millis(50)) {
            Tick::Frame {
                angle,
                transform,
                cubelets,
            } => {
                assert!((angle - 0.5).abs() < 1e-5);
                assert_eq!(cubelets, expected);
                assert_ne!(transform, Matrix4::identity());
            }
            other => panic!("expected a frame, got {other:?}"),
        }
    }
}
