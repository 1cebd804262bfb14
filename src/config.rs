//! Runtime settings for the simulator.
//!
//! Defaults match the feel of a physical cube: a quarter turn takes about
//! 150 ms and a new game is scrambled with 20 random turns. A few values can
//! be overridden through environment variables.

use std::str::FromStr;

/// Quarter-turn speed override, in radians per second.
pub(crate) const TURN_SPEED_VAR: &str = "CUBESIM_TURN_SPEED";
/// Scramble length override.
pub(crate) const SCRAMBLE_MOVES_VAR: &str = "CUBESIM_SCRAMBLE_MOVES";
/// Initial camera distance override.
pub(crate) const CAMERA_DISTANCE_VAR: &str = "CUBESIM_CAMERA_DISTANCE";

/// Orbit camera defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CameraConfig {
    /// Distance from the puzzle centre
    pub(crate) distance: f32,
    /// Horizontal orbit angle in degrees
    pub(crate) yaw: f32,
    /// Vertical orbit angle in degrees, positive looks down on the top face
    pub(crate) pitch: f32,
    pub(crate) min_distance: f32,
    pub(crate) max_distance: f32,
    /// Vertical field of view in degrees
    pub(crate) fovy: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 20.0,
            yaw: 45.0,
            pitch: 30.0,
            min_distance: 8.0,
            max_distance: 60.0,
            fovy: 45.0,
        }
    }
}

/// Simulator settings.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    /// Angular speed of an animated turn, radians per second
    pub(crate) turn_speed: f32,
    /// Number of random turns applied by a scramble
    pub(crate) scramble_moves: usize,
    pub(crate) camera: CameraConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            turn_speed: 10.0,
            scramble_moves: 20,
            camera: CameraConfig::default(),
        }
    }
}

impl Config {
    /// Defaults with any overrides found in the process environment.
    pub(crate) fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by variable name.
    ///
    /// Values that fail to parse or are out of range are logged and ignored.
    pub(crate) fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        override_with(&lookup, TURN_SPEED_VAR, &mut self.turn_speed, |v| {
            v.is_finite() && *v > 0.0
        });
        override_with(&lookup, SCRAMBLE_MOVES_VAR, &mut self.scramble_moves, |_| true);
        let camera = &mut self.camera;
        let (min, max) = (camera.min_distance, camera.max_distance);
        override_with(&lookup, CAMERA_DISTANCE_VAR, &mut camera.distance, |v| {
            (min..=max).contains(v)
        });
        self
    }
}

fn override_with<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    slot: &mut T,
    valid: impl Fn(&T) -> bool,
) where
    T: FromStr + std::fmt::Debug,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => {
            log::info!("{key} = {value:?}");
            *slot = value;
        }
        Ok(value) => log::warn!("ignoring {key}: {value:?} is out of range"),
        Err(_) => log::warn!("ignoring {key}: cannot parse {raw:?}"),
    }
}
