//! Level definitions
//!
//! Levels are plain JSON. Everything is validated here so the simulation
//! only ever sees finite, positive geometry and plates that point at real
//! surfaces and hazards.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{ENTITY_HEIGHT, ENTITY_WIDTH};
use crate::sim::{Aabb, Hazard, HazardTiming, LevelState, PressurePlate, Surface, SurfaceKind};
use crate::tuning::{Tuning, TuningError};

const DEMO_LEVEL: &str = include_str!("../levels/demo.json");

/// Errors loading or validating a level
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid level JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("spawn point or entity size is not usable")]
    BadSpawn,
    #[error("{what} {index} has non-finite or non-positive geometry")]
    BadGeometry { what: &'static str, index: usize },
    #[error("hazard {index} has a non-positive `{field}`")]
    BadTiming { index: usize, field: &'static str },
    #[error("plate {plate} refers to missing surface {surface}")]
    MissingSurface { plate: usize, surface: usize },
    #[error("plate {plate} triggers id {trigger_id}, which no hazard carries")]
    UnknownTrigger { plate: usize, trigger_id: u32 },
    #[error(transparent)]
    Tuning(#[from] TuningError),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            w: ENTITY_WIDTH,
            h: ENTITY_HEIGHT,
        }
    }
}

/// Axis-aligned rectangle as written in level files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectDef {
    pub fn to_aabb(self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// `"normal"` (default) or `"glue"`
    #[serde(rename = "type", default)]
    pub kind: SurfaceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardDef {
    pub x: f32,
    /// Top edge when fully exposed
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rise_time: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stay_time: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fall_time: Option<f32>,
}

impl HazardDef {
    /// Durations with unset ones filled from the defaults
    pub fn timing(&self) -> HazardTiming {
        let default = HazardTiming::default();
        HazardTiming {
            rise_time: self.rise_time.unwrap_or(default.rise_time),
            stay_time: self.stay_time.unwrap_or(default.stay_time),
            fall_time: self.fall_time.unwrap_or(default.fall_time),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateDef {
    /// Index into the level's surface list
    pub surface: usize,
    pub trigger_id: u32,
}

/// A complete level as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    pub spawn: Point,
    #[serde(default)]
    pub entity_size: Size,
    /// Resolved in this order every frame
    #[serde(default)]
    pub surfaces: Vec<SurfaceDef>,
    #[serde(default)]
    pub spikes: Vec<RectDef>,
    #[serde(default)]
    pub hazards: Vec<HazardDef>,
    #[serde(default)]
    pub plates: Vec<PlateDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<RectDef>,
}

fn well_formed(x: f32, y: f32, width: f32, height: f32) -> bool {
    Aabb::new(x, y, width, height).is_well_formed()
}

impl LevelDef {
    /// Parse and validate a level from JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelDef = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Read, parse and validate a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded level '{}' from {} ({} surfaces, {} hazards)",
            level.name,
            path.display(),
            level.surfaces.len(),
            level.hazards.len()
        );
        Ok(level)
    }

    /// The built-in level used when no file is given
    pub fn demo() -> Result<Self, LevelError> {
        Self::from_json(DEMO_LEVEL)
    }

    /// Reject anything the simulation cannot run with
    pub fn validate(&self) -> Result<(), LevelError> {
        let spawn_ok = self.spawn.x.is_finite() && self.spawn.y.is_finite();
        if !spawn_ok || !well_formed(0.0, 0.0, self.entity_size.w, self.entity_size.h) {
            return Err(LevelError::BadSpawn);
        }

        for (index, s) in self.surfaces.iter().enumerate() {
            if !well_formed(s.x, s.y, s.width, s.height) {
                return Err(LevelError::BadGeometry {
                    what: "surface",
                    index,
                });
            }
        }
        for (index, r) in self.spikes.iter().enumerate() {
            if !well_formed(r.x, r.y, r.width, r.height) {
                return Err(LevelError::BadGeometry {
                    what: "spike",
                    index,
                });
            }
        }
        for (index, h) in self.hazards.iter().enumerate() {
            if !well_formed(h.x, h.y, h.width, h.height) {
                return Err(LevelError::BadGeometry {
                    what: "hazard",
                    index,
                });
            }
            let timing = h.timing();
            for (field, value) in [
                ("rise_time", timing.rise_time),
                ("stay_time", timing.stay_time),
                ("fall_time", timing.fall_time),
            ] {
                if !(value.is_finite() && value > 0.0) {
                    return Err(LevelError::BadTiming { index, field });
                }
            }
        }
        if let Some(goal) = self.goal {
            if !well_formed(goal.x, goal.y, goal.width, goal.height) {
                return Err(LevelError::BadGeometry {
                    what: "goal",
                    index: 0,
                });
            }
        }

        for (plate, p) in self.plates.iter().enumerate() {
            if p.surface >= self.surfaces.len() {
                return Err(LevelError::MissingSurface {
                    plate,
                    surface: p.surface,
                });
            }
            if !self.hazards.iter().any(|h| h.id == Some(p.trigger_id)) {
                return Err(LevelError::UnknownTrigger {
                    plate,
                    trigger_id: p.trigger_id,
                });
            }
        }
        Ok(())
    }

    /// Validate and turn the definition into a fresh level run
    pub fn build(&self, tuning: Tuning) -> Result<LevelState, LevelError> {
        self.validate()?;
        tuning.validate()?;

        let spawn = Vec2::new(self.spawn.x, self.spawn.y);
        let size = Vec2::new(self.entity_size.w, self.entity_size.h);
        let mut state = LevelState::new(self.name.clone(), spawn, size, tuning);

        state.surfaces = self
            .surfaces
            .iter()
            .map(|s| Surface::new(s.x, s.y, s.width, s.height, s.kind))
            .collect();
        state.spikes = self.spikes.iter().map(|r| r.to_aabb()).collect();
        state.hazards = self
            .hazards
            .iter()
            .map(|h| Hazard::new(h.x, h.y, h.width, h.height, h.id, h.timing()))
            .collect();
        state.plates = self
            .plates
            .iter()
            .map(|p| PressurePlate::new(p.surface, p.trigger_id))
            .collect();
        state.goal = self.goal.map(RectDef::to_aabb);

        Ok(state)
    }
}
