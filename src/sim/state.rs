//! Level state and core simulation types
//!
//! Everything the per-frame tick mutates lives here as plain data. Surfaces
//! are referenced by index into `LevelState::surfaces`; nothing holds a
//! pointer into the level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::collision::ContactSide;
use super::glue::Attachment;
use super::hazard::{Hazard, HazardState};
use super::plate::PressurePlate;
use crate::tuning::Tuning;

/// Index of a surface in the level's surface list
pub type SurfaceId = usize;

/// Surface material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    #[default]
    Normal,
    /// Sticks the entity on bottom/side contact
    Glue,
}

/// A static platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub rect: Aabb,
    pub kind: SurfaceKind,
}

impl Surface {
    pub fn new(x: f32, y: f32, width: f32, height: f32, kind: SurfaceKind) -> Self {
        Self {
            rect: Aabb::new(x, y, width, height),
            kind,
        }
    }

    pub fn normal(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, width, height, SurfaceKind::Normal)
    }

    pub fn glue(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, width, height, SurfaceKind::Glue)
    }

    #[inline]
    pub fn is_glue(&self) -> bool {
        self.kind == SurfaceKind::Glue
    }
}

/// The controllable actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Velocity in units/s (+y is down)
    pub vel: Vec2,
    /// Resting on top of some surface this frame
    pub grounded: bool,
    /// Resting on top of a glue surface this frame
    pub on_glue: bool,
    /// Relationship to a glue surface
    pub attachment: Attachment,
    /// Last ground jump left from a glue surface; cleared on landing elsewhere
    pub jumped_from_glue: bool,
}

impl Entity {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            grounded: false,
            on_glue: false,
            attachment: Attachment::None,
            jumped_from_glue: false,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Put the entity back at `spawn` with every flag cleared
    pub fn respawn(&mut self, spawn: Vec2) {
        *self = Self::new(spawn, self.size);
    }
}

/// Why the entity died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Static spike strip
    Spikes,
    /// A retractable hazard, by index into `LevelState::hazards`
    Hazard(usize),
    /// Fell out of the bottom of the world
    Fell,
}

/// Something that happened during a tick, for audio/visual/UI consumers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ordinary jump from the ground
    Jumped { from_glue: bool },
    /// Jumped free of a glue surface the entity was stuck to
    EscapedGlue,
    /// Attachment to a glue surface began or changed side
    Attached { surface: SurfaceId, side: ContactSide },
    /// Attachment released by the proximity check
    Detached { surface: SurfaceId },
    /// Became grounded this frame
    Landed,
    /// A pressure plate fired its trigger id
    PlatePressed { plate: usize, trigger_id: u32 },
    /// A hazard changed state
    HazardChanged { index: usize, state: HazardState },
    Died(DeathCause),
    GoalReached,
}

/// Lifecycle of a level run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    Playing,
    /// Entity died; waiting for `reset`
    Dead,
    /// Goal reached
    Complete,
}

/// Complete state of one level run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelState {
    pub name: String,
    pub tuning: Tuning,
    pub spawn: Vec2,
    pub entity: Entity,
    /// Ordered surface list; resolution order follows this order
    pub surfaces: Vec<Surface>,
    /// Static lethal rectangles
    pub spikes: Vec<Aabb>,
    pub hazards: Vec<Hazard>,
    pub plates: Vec<PressurePlate>,
    pub goal: Option<Aabb>,
    pub phase: LevelPhase,
    /// Seconds of play since the last reset
    pub time: f32,
    /// Ticks since the last reset
    pub frame: u64,
    /// Events produced by the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Events raised between ticks, reported by the next tick
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl LevelState {
    /// Create an empty level with the entity at `spawn`
    pub fn new(name: impl Into<String>, spawn: Vec2, entity_size: Vec2, tuning: Tuning) -> Self {
        Self {
            name: name.into(),
            tuning,
            spawn,
            entity: Entity::new(spawn, entity_size),
            surfaces: Vec::new(),
            spikes: Vec::new(),
            hazards: Vec::new(),
            plates: Vec::new(),
            goal: None,
            phase: LevelPhase::Playing,
            time: 0.0,
            frame: 0,
            events: Vec::new(),
            pending_events: Vec::new(),
        }
    }

    /// Restart the level: entity back to spawn, hazards hidden, plates released
    pub fn reset(&mut self) {
        self.entity.respawn(self.spawn);
        for hazard in &mut self.hazards {
            hazard.reset();
        }
        for plate in &mut self.plates {
            plate.reset();
        }
        self.phase = LevelPhase::Playing;
        self.time = 0.0;
        self.frame = 0;
        self.events.clear();
        self.pending_events.clear();
        log::info!("Level '{}' reset", self.name);
    }

    /// Trigger every hazard carrying `id`. Returns how many were addressed.
    ///
    /// Hazards that start rising are reported as `HazardChanged` by the next
    /// tick.
    pub fn trigger(&mut self, id: u32) -> usize {
        let mut count = 0;
        for (index, hazard) in self.hazards.iter_mut().enumerate() {
            if hazard.id != Some(id) {
                continue;
            }
            count += 1;
            let before = hazard.state;
            hazard.trigger();
            if hazard.state != before {
                self.pending_events.push(GameEvent::HazardChanged {
                    index,
                    state: hazard.state,
                });
            }
        }
        count
    }
}
