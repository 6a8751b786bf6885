//! Retractable spike hazards
//!
//! Each hazard cycles `Hidden -> Rising -> Active -> Falling -> Hidden`.
//! Only `trigger` leaves `Hidden`; the rest of the cycle is timer and
//! position driven. The hazard is lethal while `Rising` or `Active`.

use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::consts::{HAZARD_FALL_TIME, HAZARD_RISE_TIME, HAZARD_STAY_TIME};

/// Slack for float drift when a rise or fall reaches its end position
const POSITION_EPSILON: f32 = 1e-2;
/// Slack for float drift in the accumulated state timer
const TIME_EPSILON: f32 = 1e-3;

/// Hazard lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardState {
    Hidden,
    Rising,
    Active,
    Falling,
}

/// Phase durations in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardTiming {
    pub rise_time: f32,
    pub stay_time: f32,
    pub fall_time: f32,
}

impl Default for HazardTiming {
    fn default() -> Self {
        Self {
            rise_time: HAZARD_RISE_TIME,
            stay_time: HAZARD_STAY_TIME,
            fall_time: HAZARD_FALL_TIME,
        }
    }
}

/// A retractable hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    /// Correlates the hazard with a trigger source
    pub id: Option<u32>,
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Top edge when fully exposed
    pub base_y: f32,
    /// Top edge when fully retracted
    pub hidden_y: f32,
    /// Current top edge
    pub current_y: f32,
    pub state: HazardState,
    /// Seconds since the last transition
    pub state_timer: f32,
    pub timing: HazardTiming,
    /// Units/s while rising
    pub rise_speed: f32,
    /// Units/s while falling
    pub fall_speed: f32,
}

impl Hazard {
    pub fn new(x: f32, y: f32, width: f32, height: f32, id: Option<u32>, timing: HazardTiming) -> Self {
        let hidden_y = y + height;
        Self {
            id,
            x,
            width,
            height,
            base_y: y,
            hidden_y,
            current_y: hidden_y,
            state: HazardState::Hidden,
            state_timer: 0.0,
            timing,
            rise_speed: height / timing.rise_time,
            fall_speed: height / timing.fall_time,
        }
    }

    fn enter(&mut self, state: HazardState) {
        log::debug!("Hazard {:?}: {:?} -> {:?}", self.id, self.state, state);
        self.state = state;
        self.state_timer = 0.0;
    }

    /// Start (or restart) the rise. Ignored while already rising or active.
    pub fn trigger(&mut self) {
        match self.state {
            HazardState::Hidden | HazardState::Falling => self.enter(HazardState::Rising),
            HazardState::Rising | HazardState::Active => {}
        }
    }

    /// Advance by `dt` seconds. Returns the new state if a transition fired.
    pub fn update(&mut self, dt: f32) -> Option<HazardState> {
        self.state_timer += dt;
        let before = self.state;

        match self.state {
            HazardState::Hidden => {
                self.current_y = self.hidden_y;
            }
            HazardState::Rising => {
                self.current_y = (self.current_y - self.rise_speed * dt).max(self.base_y);
                if self.current_y <= self.base_y + POSITION_EPSILON {
                    self.current_y = self.base_y;
                    self.enter(HazardState::Active);
                }
            }
            HazardState::Active => {
                self.current_y = self.base_y;
                if self.state_timer + TIME_EPSILON >= self.timing.stay_time {
                    self.enter(HazardState::Falling);
                }
            }
            HazardState::Falling => {
                self.current_y = (self.current_y + self.fall_speed * dt).min(self.hidden_y);
                if self.current_y >= self.hidden_y - POSITION_EPSILON {
                    self.current_y = self.hidden_y;
                    self.enter(HazardState::Hidden);
                }
            }
        }

        (self.state != before).then_some(self.state)
    }

    /// Lethal while extending or fully extended
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.state, HazardState::Rising | HazardState::Active)
    }

    /// How far the hazard currently sticks out
    #[inline]
    pub fn visible_height(&self) -> f32 {
        (self.hidden_y - self.current_y).max(0.0)
    }

    /// The exposed part as a rectangle, `None` when fully retracted
    pub fn exposed_rect(&self) -> Option<Aabb> {
        let h = self.visible_height();
        (h > 0.0).then(|| Aabb::new(self.x, self.current_y, self.width, h))
    }

    /// Back to fully retracted with a zero timer
    pub fn reset(&mut self) {
        self.state = HazardState::Hidden;
        self.state_timer = 0.0;
        self.current_y = self.hidden_y;
    }
}
