//! Collision detection and response against static surfaces
//!
//! Each overlapping surface is resolved on its own, in list order, against
//! the entity's position as corrected by the surfaces before it. There is
//! no combined multi-surface solve: a later correction may undo an earlier
//! one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::state::{Entity, Surface, SurfaceId, SurfaceKind};

/// Which face of a surface the entity hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactSide {
    /// Entity landed on the surface
    Top,
    /// Entity hit the underside
    Bottom,
    /// Entity hit the left face (entity is to the left)
    Left,
    /// Entity hit the right face (entity is to the right)
    Right,
}

/// A resolved contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub surface: SurfaceId,
    pub side: ContactSide,
    pub kind: SurfaceKind,
}

/// Penetration depths of an entity into a surface along each face
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlaps {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Overlaps {
    pub fn between(entity: &Aabb, surface: &Aabb) -> Self {
        Self {
            left: entity.right() - surface.left(),
            right: surface.right() - entity.left(),
            top: entity.bottom() - surface.top(),
            bottom: surface.bottom() - entity.top(),
        }
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.left.min(self.right).min(self.top).min(self.bottom)
    }
}

/// Pick the contact side for an overlapping pair.
///
/// The face with the smallest penetration wins, checked in the order
/// top, bottom, left, right. `motion` is the entity's direction of travel
/// this frame: top is only accepted while moving down and bottom only
/// while moving up. When the minimum face is rejected by that gate and no
/// later face ties it, there is no contact.
pub fn contact_side(entity: &Aabb, surface: &Aabb, motion: Vec2) -> Option<ContactSide> {
    if !entity.overlaps(surface) {
        return None;
    }

    let o = Overlaps::between(entity, surface);
    let min = o.min();

    if min == o.top && motion.y > 0.0 {
        Some(ContactSide::Top)
    } else if min == o.bottom && motion.y < 0.0 {
        Some(ContactSide::Bottom)
    } else if min == o.left {
        Some(ContactSide::Left)
    } else if min == o.right {
        Some(ContactSide::Right)
    } else {
        None
    }
}

/// Resolve the entity against one surface, snapping it flush to the hit
/// face and zeroing the velocity and motion components into it.
pub fn resolve_surface(
    entity: &mut Entity,
    id: SurfaceId,
    surface: &Surface,
    motion: &mut Vec2,
) -> Option<Contact> {
    let rect = &surface.rect;
    let side = contact_side(&entity.aabb(), rect, *motion)?;

    match side {
        ContactSide::Top => {
            entity.pos.y = rect.top() - entity.size.y;
            entity.vel.y = 0.0;
            motion.y = 0.0;
            entity.grounded = true;
        }
        ContactSide::Bottom => {
            entity.pos.y = rect.bottom();
            entity.vel.y = 0.0;
            motion.y = 0.0;
        }
        ContactSide::Left => {
            entity.pos.x = rect.left() - entity.size.x;
            entity.vel.x = 0.0;
            motion.x = 0.0;
        }
        ContactSide::Right => {
            entity.pos.x = rect.right();
            entity.vel.x = 0.0;
            motion.x = 0.0;
        }
    }

    Some(Contact {
        surface: id,
        side,
        kind: surface.kind,
    })
}

/// Resolve the entity against every surface in order, gating on its
/// velocity.
pub fn resolve(entity: &mut Entity, surfaces: &[Surface]) -> Vec<Contact> {
    let motion = entity.vel;
    resolve_moving(entity, surfaces, motion)
}

/// Resolve the entity against every surface in order, gating on `motion`,
/// the displacement it made this frame. Glue climbing moves the entity
/// with zero velocity, so the frame's displacement is what tells a climb
/// down onto a floor from a climb up into a ceiling.
///
/// Clears the per-frame contact flags (`grounded`, `on_glue`) first; they
/// are re-derived from this frame's contacts.
pub fn resolve_moving(entity: &mut Entity, surfaces: &[Surface], motion: Vec2) -> Vec<Contact> {
    entity.grounded = false;
    entity.on_glue = false;

    let mut motion = motion;
    surfaces
        .iter()
        .enumerate()
        .filter_map(|(id, surface)| resolve_surface(entity, id, surface, &mut motion))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entity_at(x: f32, y: f32, vel: Vec2) -> Entity {
        let mut e = Entity::new(Vec2::new(x, y), Vec2::splat(40.0));
        e.vel = vel;
        e
    }

    #[test]
    fn test_landing_on_normal_surface() {
        let floor = Surface::normal(200.0, 450.0, 150.0, 20.0);
        // Bottom edge 5 units into the floor, falling
        let mut e = entity_at(250.0, 415.0, Vec2::new(0.0, 5.0));

        let contacts = resolve(&mut e, &[floor]);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].side, ContactSide::Top);
        assert_eq!(e.pos.y, 450.0 - 40.0);
        assert_eq!(e.vel.y, 0.0);
        assert!(e.grounded);
    }

    #[test]
    fn test_top_rejected_while_rising() {
        let floor = Surface::normal(200.0, 450.0, 150.0, 20.0);
        let mut e = entity_at(250.0, 415.0, Vec2::new(0.0, -5.0));

        let contacts = resolve(&mut e, &[floor]);
        assert!(contacts.is_empty());
        assert_eq!(e.pos.y, 415.0);
        assert!(!e.grounded);
    }

    #[test]
    fn test_head_bump() {
        let ceiling = Surface::normal(200.0, 100.0, 150.0, 20.0);
        let mut e = entity_at(250.0, 116.0, Vec2::new(0.0, -300.0));

        let contacts = resolve(&mut e, &[ceiling]);
        assert_eq!(contacts[0].side, ContactSide::Bottom);
        assert_eq!(e.pos.y, 120.0);
        assert_eq!(e.vel.y, 0.0);
        assert!(!e.grounded);
    }

    #[test]
    fn test_side_hits_ignore_vertical_velocity() {
        let wall = Surface::normal(300.0, 0.0, 20.0, 400.0);

        let mut e = entity_at(262.0, 100.0, Vec2::new(300.0, 0.0));
        let contacts = resolve(&mut e, &[wall]);
        assert_eq!(contacts[0].side, ContactSide::Left);
        assert_eq!(e.pos.x, 260.0);
        assert_eq!(e.vel.x, 0.0);

        let mut e = entity_at(318.0, 100.0, Vec2::new(-300.0, 0.0));
        let contacts = resolve(&mut e, &[wall]);
        assert_eq!(contacts[0].side, ContactSide::Right);
        assert_eq!(e.pos.x, 320.0);
    }

    #[test]
    fn test_tie_prefers_top() {
        // Equal penetration on the top and left faces
        let block = Surface::normal(100.0, 100.0, 100.0, 100.0);
        let mut e = entity_at(64.0, 64.0, Vec2::new(10.0, 10.0));

        let contacts = resolve(&mut e, &[block]);
        assert_eq!(contacts[0].side, ContactSide::Top);
        assert_eq!(e.pos, Vec2::new(64.0, 60.0));
    }

    #[test]
    fn test_tie_falls_through_when_gate_rejects() {
        // Top and left tie, but rising: top is rejected, left wins
        let block = Surface::normal(100.0, 100.0, 100.0, 100.0);
        let mut e = entity_at(64.0, 64.0, Vec2::new(10.0, -10.0));

        let contacts = resolve(&mut e, &[block]);
        assert_eq!(contacts[0].side, ContactSide::Left);
        assert_eq!(e.pos, Vec2::new(60.0, 64.0));
    }

    #[test]
    fn test_touching_edge_is_not_contact() {
        let floor = Surface::normal(200.0, 450.0, 150.0, 20.0);
        let mut e = entity_at(250.0, 410.0, Vec2::new(0.0, 5.0));
        assert!(resolve(&mut e, &[floor]).is_empty());
    }

    #[test]
    fn test_later_surface_overrides_earlier_correction() {
        // A floor and a small block sunk into it. Landing on the floor first
        // lifts the entity clear of the block; resolving the block first
        // pushes the entity sideways before it lands.
        let floor = Surface::normal(0.0, 100.0, 400.0, 20.0);
        let block = Surface::normal(138.0, 101.0, 20.0, 10.0);
        let start = entity_at(100.0, 64.0, Vec2::new(50.0, 50.0));

        let mut e = start.clone();
        let contacts = resolve(&mut e, &[floor, block]);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].side, ContactSide::Top);
        assert_eq!(e.pos, Vec2::new(100.0, 60.0));
        assert!(e.grounded);

        let mut e = start;
        let contacts = resolve(&mut e, &[block, floor]);
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].surface, 0);
        assert_eq!(contacts[0].side, ContactSide::Left);
        assert_eq!(contacts[1].side, ContactSide::Top);
        assert_eq!(e.pos, Vec2::new(98.0, 60.0));
    }

    #[test]
    fn test_resolve_clears_contact_flags() {
        let mut e = entity_at(0.0, 0.0, Vec2::ZERO);
        e.grounded = true;
        e.on_glue = true;
        assert!(resolve(&mut e, &[]).is_empty());
        assert!(!e.grounded);
        assert!(!e.on_glue);
    }

    /// Entity box that approached `rect` through `face` and now sits
    /// `depth` into it, with `slide` in 0..1 placing it along the face.
    /// The penetration on the other axis is at least `margin`.
    fn entered(rect: &Aabb, size: Vec2, face: usize, depth: f32, slide: f32, margin: f32) -> Vec2 {
        let x_span = (rect.left() - size.x + margin, rect.right() - margin);
        let y_span = (rect.top() - size.y + margin, rect.bottom() - margin);
        let sx = x_span.0 + (x_span.1 - x_span.0) * slide;
        let sy = y_span.0 + (y_span.1 - y_span.0) * slide;
        match face {
            0 => Vec2::new(sx, rect.top() - size.y + depth),
            1 => Vec2::new(sx, rect.bottom() - depth),
            2 => Vec2::new(rect.left() - size.x + depth, sy),
            _ => Vec2::new(rect.right() - depth, sy),
        }
    }

    /// Unit direction of travel into `face`
    fn inward(face: usize) -> Vec2 {
        match face {
            0 => Vec2::Y,
            1 => Vec2::NEG_Y,
            2 => Vec2::X,
            _ => Vec2::NEG_X,
        }
    }

    proptest! {
        /// Entity approaching a normal surface along the shallow axis never
        /// remains overlapping after resolution.
        #[test]
        fn prop_normal_surface_overlap_free(
            face in 0usize..4,
            depth in 0.01f32..8.0,
            slide in 0.0f32..1.0,
            speed in 1.0f32..900.0,
            drift in -200.0f32..200.0,
        ) {
            let surface = Surface::normal(200.0, 300.0, 150.0, 60.0);
            let pos = entered(&surface.rect, Vec2::splat(40.0), face, depth, slide, 9.0);
            let n = inward(face);
            // Drift runs along the face, speed into it
            let vel = n * speed + Vec2::new(n.y.abs(), n.x.abs()) * drift;
            let mut e = entity_at(pos.x, pos.y, vel);

            let contacts = resolve(&mut e, &[surface]);
            prop_assert_eq!(contacts.len(), 1);
            prop_assert!(!e.aabb().overlaps(&surface.rect));
        }

        /// Same invariant for arbitrary box sizes and for moves made with zero
        /// velocity (glue climbing), gated on the frame's displacement.
        #[test]
        fn prop_overlap_free_for_any_motion_source(
            face in 0usize..4,
            depth in 0.01f32..3.0,
            slide in 0.0f32..1.0,
            w in 10u16..80,
            h in 10u16..80,
            sw in 20u16..300,
            sh in 20u16..300,
            drift in -3.0f32..3.0,
            zero_velocity in any::<bool>(),
        ) {
            // Whole-unit sizes keep the snap exact in f32
            let surface = Surface::normal(100.0, 200.0, f32::from(sw), f32::from(sh));
            let size = Vec2::new(f32::from(w), f32::from(h));
            let pos = entered(&surface.rect, size, face, depth, slide, 4.0);
            let n = inward(face);
            let motion = n * 3.0 + Vec2::new(n.y.abs(), n.x.abs()) * drift;
            let vel = if zero_velocity { Vec2::ZERO } else { motion * 60.0 };

            let mut e = Entity::new(pos, size);
            e.vel = vel;
            let contacts = resolve_moving(&mut e, &[surface], motion);
            prop_assert_eq!(contacts.len(), 1);
            prop_assert!(!e.aabb().overlaps(&surface.rect));
            prop_assert_eq!(e.vel, vel - vel * n.abs());
        }
    }

    #[test]
    fn test_zero_velocity_climb_lands_and_bumps() {
        let floor = Surface::normal(0.0, 345.0, 300.0, 20.0);
        let mut e = entity_at(260.0, 306.0, Vec2::ZERO);
        let contacts = resolve_moving(&mut e, &[floor], Vec2::new(0.0, 3.0));
        assert_eq!(contacts[0].side, ContactSide::Top);
        assert_eq!(e.pos.y, 305.0);
        assert!(e.grounded);

        let ceiling = Surface::normal(0.0, 250.0, 300.0, 20.0);
        let mut e = entity_at(260.0, 268.0, Vec2::ZERO);
        let contacts = resolve_moving(&mut e, &[ceiling], Vec2::new(0.0, -3.0));
        assert_eq!(contacts[0].side, ContactSide::Bottom);
        assert_eq!(e.pos.y, 270.0);

        // Velocity gating alone would reject both
        let mut e = entity_at(260.0, 306.0, Vec2::ZERO);
        assert!(resolve(&mut e, &[floor]).is_empty());
    }
}
