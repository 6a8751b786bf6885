//! Glue Jump - A frame-driven 2D platformer core
//!
//! Core modules:
//! - `sim`: Per-frame simulation (collision, glue attachment, hazards, integration)
//! - `level`: Level definitions loaded from JSON and validated before play
//! - `tuning`: Data-driven physics constants

pub mod level;
pub mod sim;
pub mod tuning;

pub use level::{LevelDef, LevelError};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// World dimensions
    pub const WORLD_WIDTH: f32 = 1200.0;
    pub const WORLD_HEIGHT: f32 = 700.0;
    /// Falling this far below the world bottom counts as a death
    pub const DEATH_MARGIN: f32 = 100.0;

    /// Entity defaults
    pub const ENTITY_WIDTH: f32 = 40.0;
    pub const ENTITY_HEIGHT: f32 = 40.0;
    /// Horizontal run speed (units/s)
    pub const RUN_SPEED: f32 = 300.0;
    /// Jump impulse (units/s, negative is up)
    pub const JUMP_IMPULSE: f32 = -600.0;

    /// Gravity (units/s², positive is down)
    pub const GRAVITY: f32 = 1500.0;
    /// Cap on a single frame's delta time
    pub const MAX_DELTA_TIME: f32 = 0.1;

    /// Proximity buffer for staying attached to a glue surface
    pub const GLUE_DETACH_BUFFER: f32 = 5.0;
    /// Per-frame climb step while stuck to the side of a glue surface.
    /// Not scaled by delta time.
    pub const GLUE_CLIMB_STEP: f32 = 3.0;

    /// Retractable hazard defaults (seconds)
    pub const HAZARD_RISE_TIME: f32 = 0.3;
    pub const HAZARD_STAY_TIME: f32 = 2.0;
    pub const HAZARD_FALL_TIME: f32 = 0.3;

    /// Minimum time between two presses of the same plate
    pub const PLATE_COOLDOWN: f32 = 0.2;
}
