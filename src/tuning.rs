//! Data-driven physics tuning
//!
//! Every field falls back to the value in [`crate::consts`] when absent from
//! the JSON, so a tuning file only needs the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` is out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

/// Physics constants for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Horizontal speed while a direction is held (units/s)
    pub run_speed: f32,
    /// Vertical velocity applied by a jump (negative is up)
    pub jump_impulse: f32,
    /// Proximity buffer that keeps a glue attachment alive
    pub glue_detach_buffer: f32,
    /// Units moved per frame while climbing a glue side
    pub glue_climb_step: f32,
    /// Longest frame the integrator will accept (seconds)
    pub max_delta_time: f32,
    pub world_width: f32,
    pub world_height: f32,
    /// Distance below the world bottom that counts as falling out
    pub death_margin: f32,
    /// Seconds before a pressure plate can fire again
    pub plate_cooldown: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            run_speed: RUN_SPEED,
            jump_impulse: JUMP_IMPULSE,
            glue_detach_buffer: GLUE_DETACH_BUFFER,
            glue_climb_step: GLUE_CLIMB_STEP,
            max_delta_time: MAX_DELTA_TIME,
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            death_margin: DEATH_MARGIN,
            plate_cooldown: PLATE_COOLDOWN,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let checks: [(&'static str, f32, fn(f32) -> bool); 10] = [
            ("gravity", self.gravity, |v| v.is_finite()),
            ("run_speed", self.run_speed, |v| v.is_finite() && v >= 0.0),
            ("jump_impulse", self.jump_impulse, |v| v.is_finite() && v < 0.0),
            ("glue_detach_buffer", self.glue_detach_buffer, |v| {
                v.is_finite() && v >= 0.0
            }),
            ("glue_climb_step", self.glue_climb_step, |v| v.is_finite() && v >= 0.0),
            ("max_delta_time", self.max_delta_time, |v| v.is_finite() && v > 0.0),
            ("world_width", self.world_width, |v| v.is_finite() && v > 0.0),
            ("world_height", self.world_height, |v| v.is_finite() && v > 0.0),
            ("death_margin", self.death_margin, |v| v.is_finite() && v >= 0.0),
            ("plate_cooldown", self.plate_cooldown, |v| v.is_finite() && v >= 0.0),
        ];

        for (field, value, ok) in checks {
            if !ok(value) {
                return Err(TuningError::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Y coordinate past which the entity has fallen out of the world
    #[inline]
    pub fn death_y(&self) -> f32 {
        self.world_height + self.death_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.glue_detach_buffer, 5.0);
        assert_eq!(tuning.glue_climb_step, 3.0);
        assert_eq!(tuning.death_y(), 800.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 980.0, "run_speed": 250.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 980.0);
        assert_eq!(tuning.run_speed, 250.0);
        assert_eq!(tuning.jump_impulse, JUMP_IMPULSE);
    }

    #[test]
    fn test_rejects_downward_jump() {
        let err = Tuning::from_json(r#"{ "jump_impulse": 600.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "jump_impulse",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            Tuning::from_json("{ gravity: }"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Tuning::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, TuningError::Io { .. }));
    }
}
