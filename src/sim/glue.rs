//! Glue surface attachment and jump eligibility
//!
//! Contacts against glue surfaces move the entity between these states:
//!
//! | contact | attachment     | effect                                    |
//! |---------|----------------|-------------------------------------------|
//! | top     | `OnTop`        | grounded, ordinary gravity and movement   |
//! | bottom  | `Stuck(Bottom)`| gravity off, vy pinned to 0, walks freely |
//! | left    | `Stuck(Left)`  | gravity off, vx and vy pinned, climbs     |
//! | right   | `Stuck(Right)` | gravity off, vx and vy pinned, climbs     |
//!
//! An attachment lasts until the entity's box, grown by the detach buffer,
//! stops touching the bound surface, or until an escape jump.

use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::collision::{Contact, ContactSide};
use super::state::{Entity, Surface, SurfaceId, SurfaceKind};

/// Face of a glue surface the entity is stuck to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StuckSide {
    Bottom,
    Left,
    Right,
}

impl From<StuckSide> for ContactSide {
    fn from(side: StuckSide) -> Self {
        match side {
            StuckSide::Bottom => ContactSide::Bottom,
            StuckSide::Left => ContactSide::Left,
            StuckSide::Right => ContactSide::Right,
        }
    }
}

/// Entity's relationship to a glue surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Attachment {
    #[default]
    None,
    /// Standing on top of a glue surface; not stuck
    OnTop { surface: SurfaceId },
    /// Stuck to the underside or a side of a glue surface
    Stuck { side: StuckSide, surface: SurfaceId },
}

impl Attachment {
    /// Bound glue surface, if any
    pub fn surface(&self) -> Option<SurfaceId> {
        match *self {
            Attachment::None => None,
            Attachment::OnTop { surface } | Attachment::Stuck { surface, .. } => Some(surface),
        }
    }

    /// Face of the bound surface, if any
    pub fn side(&self) -> Option<ContactSide> {
        match *self {
            Attachment::None => None,
            Attachment::OnTop { .. } => Some(ContactSide::Top),
            Attachment::Stuck { side, .. } => Some(side.into()),
        }
    }

    #[inline]
    pub fn is_stuck(&self) -> bool {
        matches!(self, Attachment::Stuck { .. })
    }

    /// Stuck to a side face (climbing)
    #[inline]
    pub fn is_side_stuck(&self) -> bool {
        matches!(
            self,
            Attachment::Stuck {
                side: StuckSide::Left | StuckSide::Right,
                ..
            }
        )
    }
}

/// Which jump fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// Jump from the ground
    Ground { from_glue: bool },
    /// Jump that tears the entity off a glue surface
    Escape,
}

/// Update the attachment from one contact. Normal-surface contacts leave it
/// untouched.
pub fn apply_contact(entity: &mut Entity, contact: &Contact) {
    if contact.kind != SurfaceKind::Glue {
        return;
    }

    let surface = contact.surface;
    entity.attachment = match contact.side {
        ContactSide::Top => {
            entity.on_glue = true;
            Attachment::OnTop { surface }
        }
        ContactSide::Bottom => {
            entity.vel.y = 0.0;
            Attachment::Stuck {
                side: StuckSide::Bottom,
                surface,
            }
        }
        ContactSide::Left => {
            entity.vel.x = 0.0;
            Attachment::Stuck {
                side: StuckSide::Left,
                surface,
            }
        }
        ContactSide::Right => {
            entity.vel.x = 0.0;
            Attachment::Stuck {
                side: StuckSide::Right,
                surface,
            }
        }
    };
}

/// Fold a frame's contacts into the attachment, in resolution order
pub fn apply_contacts(entity: &mut Entity, contacts: &[Contact]) {
    for contact in contacts {
        apply_contact(entity, contact);
    }
}

/// Proximity test: the entity's box grown by `buffer` on every side still
/// touches the glue surface.
#[inline]
pub fn is_near(entity: &Aabb, surface: &Aabb, buffer: f32) -> bool {
    entity.inflate(buffer).touches(surface)
}

/// Release the attachment if the entity has drifted out of range of the
/// bound surface. Returns the released surface.
///
/// A bound id that no longer resolves to a glue surface also releases.
pub fn check_detach(entity: &mut Entity, surfaces: &[Surface], buffer: f32) -> Option<SurfaceId> {
    let id = entity.attachment.surface()?;
    let near = surfaces
        .get(id)
        .filter(|surface| surface.is_glue())
        .is_some_and(|surface| is_near(&entity.aabb(), &surface.rect, buffer));

    if near {
        None
    } else {
        entity.attachment = Attachment::None;
        Some(id)
    }
}

/// Velocity pins for the stuck states
pub fn apply_overrides(entity: &mut Entity) {
    if let Attachment::Stuck { side, .. } = entity.attachment {
        entity.vel.y = 0.0;
        if side != StuckSide::Bottom {
            entity.vel.x = 0.0;
        }
    }
}

/// Landing on anything that is not glue re-arms the glue jump
pub fn refresh_jump_flag(entity: &mut Entity) {
    if entity.grounded && !entity.on_glue {
        entity.jumped_from_glue = false;
    }
}

/// Try to jump. `impulse` is the vertical velocity to apply.
///
/// A ground jump needs `grounded` and an unset `jumped_from_glue`; it
/// records whether it left from glue. Failing that, an entity stuck to a
/// glue surface may escape it. If both would apply the ground jump fires,
/// and it also releases any stuck attachment so the stuck velocity pins do
/// not cancel the impulse. Anything else is ignored.
pub fn try_jump(entity: &mut Entity, impulse: f32) -> Option<JumpKind> {
    if entity.grounded && !entity.jumped_from_glue {
        let from_glue = entity.on_glue;
        entity.vel.y = impulse;
        entity.grounded = false;
        entity.jumped_from_glue = from_glue;
        if entity.attachment.is_stuck() {
            entity.attachment = Attachment::None;
        }
        Some(JumpKind::Ground { from_glue })
    } else if entity.attachment.is_stuck() {
        entity.attachment = Attachment::None;
        entity.vel.y = impulse;
        Some(JumpKind::Escape)
    } else {
        None
    }
}
