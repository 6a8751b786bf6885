//! Per-frame simulation tick
//!
//! Frame order:
//! 1. input -> horizontal velocity, jump
//! 2. gravity (skipped while stuck), glue climb, integrate position
//! 3. collision resolution
//! 4. glue attachment from contacts, detach check, stuck velocity pins
//! 5. world bounds
//! 6. pressure plates, then hazards
//! 7. death and goal checks

use glam::Vec2;

use super::collision::{Contact, resolve_moving};
use super::glue::{self, JumpKind};
use super::state::{DeathCause, GameEvent, LevelPhase, LevelState};

/// Input snapshot for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Climb up while stuck to a glue side
    pub up: bool,
    /// Climb down while stuck to a glue side
    pub down: bool,
    /// Jump was pressed this frame (edge, not level)
    pub jump_pressed: bool,
}

/// Advance the level by one frame of `dt` seconds.
///
/// `dt` is capped at `tuning.max_delta_time`; a non-positive or non-finite
/// `dt` skips the frame. Events for the frame are left in `state.events`,
/// led by any raised through `LevelState::trigger` since the last tick.
pub fn tick(state: &mut LevelState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.events.append(&mut state.pending_events);

    if state.phase != LevelPhase::Playing {
        return;
    }
    if !(dt.is_finite() && dt > 0.0) {
        log::warn!("Skipping frame with invalid dt {dt}");
        return;
    }
    let dt = dt.min(state.tuning.max_delta_time);

    state.frame += 1;
    state.time += dt;

    let motion = integrate(state, input, dt);
    let contacts = resolve_frame(state, motion);
    update_triggers(state, &contacts, dt);
    check_outcome(state);
}

/// Input, gravity and position integration. Returns the frame's
/// displacement.
fn integrate(state: &mut LevelState, input: &TickInput, dt: f32) -> Vec2 {
    let tuning = &state.tuning;
    let entity = &mut state.entity;
    let start = entity.pos;

    entity.vel.x = if input.move_left {
        -tuning.run_speed
    } else if input.move_right {
        tuning.run_speed
    } else {
        0.0
    };

    if input.jump_pressed {
        match glue::try_jump(entity, tuning.jump_impulse) {
            Some(JumpKind::Ground { from_glue }) => {
                state.events.push(GameEvent::Jumped { from_glue });
            }
            Some(JumpKind::Escape) => state.events.push(GameEvent::EscapedGlue),
            None => {}
        }
    }

    if !entity.attachment.is_stuck() {
        entity.vel.y += tuning.gravity * dt;
    }
    glue::apply_overrides(entity);

    // Side climbing is a fixed step per frame, independent of dt
    if entity.attachment.is_side_stuck() {
        if input.up {
            entity.pos.y -= tuning.glue_climb_step;
        }
        if input.down {
            entity.pos.y += tuning.glue_climb_step;
        }
    }

    entity.pos += entity.vel * dt;
    entity.pos - start
}

/// Collision resolution and glue attachment. Returns the frame's contacts.
fn resolve_frame(state: &mut LevelState, motion: Vec2) -> Vec<Contact> {
    let entity = &mut state.entity;
    let was_grounded = entity.grounded;
    let before = entity.attachment;

    let contacts = resolve_moving(entity, &state.surfaces, motion);
    glue::apply_contacts(entity, &contacts);
    glue::refresh_jump_flag(entity);

    if let Some(surface) =
        glue::check_detach(entity, &state.surfaces, state.tuning.glue_detach_buffer)
    {
        log::debug!("Detached from glue surface {surface}");
        state.events.push(GameEvent::Detached { surface });
    }
    glue::apply_overrides(entity);

    let after = entity.attachment;
    if after != before {
        if let (Some(surface), Some(side)) = (after.surface(), after.side()) {
            log::debug!("Attached to glue surface {surface} on {side:?}");
            state.events.push(GameEvent::Attached { surface, side });
        }
    }
    if entity.grounded && !was_grounded {
        state.events.push(GameEvent::Landed);
    }

    enforce_world_bounds(state);
    contacts
}

/// Clamp to the left, right and top world edges. There is no floor.
fn enforce_world_bounds(state: &mut LevelState) {
    let width = state.tuning.world_width;
    let entity = &mut state.entity;

    if entity.pos.x < 0.0 {
        entity.pos.x = 0.0;
        entity.vel.x = 0.0;
    }
    if entity.pos.x + entity.size.x > width {
        entity.pos.x = width - entity.size.x;
        entity.vel.x = 0.0;
    }
    if entity.pos.y < 0.0 {
        entity.pos.y = 0.0;
        entity.vel.y = 0.0;
    }
}

/// Fire pressure plates landed on this frame, then advance every hazard
fn update_triggers(state: &mut LevelState, contacts: &[Contact], dt: f32) {
    let cooldown = state.tuning.plate_cooldown;
    let mut pressed = Vec::new();
    for (index, plate) in state.plates.iter_mut().enumerate() {
        if plate.update(contacts, dt, cooldown) {
            pressed.push(plate.trigger_id);
            state.events.push(GameEvent::PlatePressed {
                plate: index,
                trigger_id: plate.trigger_id,
            });
        }
    }
    for id in pressed {
        state.trigger(id);
    }
    state.events.append(&mut state.pending_events);

    for (index, hazard) in state.hazards.iter_mut().enumerate() {
        if let Some(new_state) = hazard.update(dt) {
            state.events.push(GameEvent::HazardChanged {
                index,
                state: new_state,
            });
        }
    }
}

/// Report death or goal; the level stops ticking until reset
fn check_outcome(state: &mut LevelState) {
    let body = state.entity.aabb();

    let cause = if state.spikes.iter().any(|s| body.overlaps(s)) {
        Some(DeathCause::Spikes)
    } else if let Some(index) = state.hazards.iter().position(|h| {
        h.is_active() && h.exposed_rect().is_some_and(|r| body.overlaps(&r))
    }) {
        Some(DeathCause::Hazard(index))
    } else if state.entity.pos.y > state.tuning.death_y() {
        Some(DeathCause::Fell)
    } else {
        None
    };

    if let Some(cause) = cause {
        log::info!("Died at {:?} ({cause:?})", state.entity.pos);
        state.events.push(GameEvent::Died(cause));
        state.phase = LevelPhase::Dead;
        return;
    }

    if state.goal.is_some_and(|g| body.overlaps(&g)) {
        log::info!("Goal reached in {:.2}s", state.time);
        state.events.push(GameEvent::GoalReached);
        state.phase = LevelPhase::Complete;
    }
}
