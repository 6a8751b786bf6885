//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One `tick` per rendered frame, variable `dt`
//! - Surfaces resolved in level list order
//! - No rendering, audio or platform dependencies

pub mod aabb;
pub mod collision;
pub mod glue;
pub mod hazard;
pub mod plate;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use collision::{Contact, ContactSide, resolve, resolve_moving};
pub use glue::{Attachment, JumpKind, StuckSide};
pub use hazard::{Hazard, HazardState, HazardTiming};
pub use plate::PressurePlate;
pub use state::{
    DeathCause, Entity, GameEvent, LevelPhase, LevelState, Surface, SurfaceId, SurfaceKind,
};
pub use tick::{TickInput, tick};
