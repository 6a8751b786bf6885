//! Pressure plates: surfaces that fire a trigger id when landed on

use serde::{Deserialize, Serialize};

use super::collision::{Contact, ContactSide};
use super::state::SurfaceId;

/// A plate bound to one surface of the level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressurePlate {
    pub surface: SurfaceId,
    /// Hazards with this id are triggered on press
    pub trigger_id: u32,
    /// Seconds until the plate can fire again
    pub cooldown: f32,
    /// Entity was standing on the plate last frame
    pub occupied: bool,
}

impl PressurePlate {
    pub fn new(surface: SurfaceId, trigger_id: u32) -> Self {
        Self {
            surface,
            trigger_id,
            cooldown: 0.0,
            occupied: false,
        }
    }

    /// Advance by one frame. Returns true if the plate fired.
    ///
    /// Fires on the frame the entity lands on the plate's surface, provided
    /// the cooldown has run out. Standing on it does not refire.
    pub fn update(&mut self, contacts: &[Contact], dt: f32, cooldown_time: f32) -> bool {
        if self.cooldown > 0.0 {
            self.cooldown -= dt;
        }

        let on_now = contacts
            .iter()
            .any(|c| c.surface == self.surface && c.side == ContactSide::Top);
        let fired = on_now && !self.occupied && self.cooldown <= 0.0;
        if fired {
            self.cooldown = cooldown_time;
        }
        self.occupied = on_now;
        fired
    }

    pub fn reset(&mut self) {
        self.cooldown = 0.0;
        self.occupied = false;
    }
}
