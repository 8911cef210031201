//! Physics and collision world
//!
//! Axis-aligned boxes only. Bodies carry a collision category that decides,
//! per pair, whether they collide solidly, only report contact, or ignore
//! each other.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Closed set of collision categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionCategory {
    Player,
    Obstacle,
    Ground,
}

impl CollisionCategory {
    /// Pairs that are pushed apart physically
    pub fn collides_with(self, other: Self) -> bool {
        use CollisionCategory::*;
        matches!((self, other), (Player, Ground) | (Ground, Player))
    }

    /// Pairs that produce contact events
    pub fn reports_contact_with(self, other: Self) -> bool {
        use CollisionCategory::*;
        matches!((self, other), (Player, Obstacle) | (Obstacle, Player))
    }
}

/// How a body moves each step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    /// Gravity and velocity, resolved against solid bodies
    Dynamic,
    /// Velocity only
    Kinematic,
    /// Never moves
    Static,
}

/// Stable body handle (never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Strict overlap (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Penetration depth on each axis (only meaningful when overlapping)
    fn penetration(&self, other: &Aabb) -> Vec2 {
        Vec2::new(
            self.max.x.min(other.max.x) - self.min.x.max(other.min.x),
            self.max.y.min(other.max.y) - self.min.y.max(other.min.y),
        )
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// A rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub category: CollisionCategory,
    pub motion: Motion,
    pub pos: Vec2,
    pub vel: Vec2,
    pub half_extents: Vec2,
}

impl Body {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.half_extents)
    }
}

/// A contact that began during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
    pub a_category: CollisionCategory,
    pub b_category: CollisionCategory,
}

impl Contact {
    /// True if this contact is between the two categories, in either order
    pub fn is_between(&self, x: CollisionCategory, y: CollisionCategory) -> bool {
        (self.a_category == x && self.b_category == y)
            || (self.a_category == y && self.b_category == x)
    }
}

/// Owns every body and evaluates contacts
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    pub gravity: Vec2,
    /// Bodies sorted by id for deterministic iteration
    bodies: Vec<Body>,
    /// Reporting pairs overlapping at the end of the last step (a < b)
    touching: BTreeSet<(BodyId, BodyId)>,
    next_id: u32,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
            touching: BTreeSet::new(),
            next_id: 1,
        }
    }

    /// Register a body and return its handle
    pub fn register(
        &mut self,
        category: CollisionCategory,
        motion: Motion,
        pos: Vec2,
        half_extents: Vec2,
        vel: Vec2,
    ) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(Body {
            id,
            category,
            motion,
            pos,
            vel,
            half_extents,
        });
        id
    }

    /// Remove a body; returns false if it was not registered
    pub fn remove(&mut self, id: BodyId) -> bool {
        let before = self.bodies.len();
        self.bodies.retain(|b| b.id != id);
        self.touching.retain(|&(a, b)| a != id && b != id);
        self.bodies.len() != before
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        // Ids are allocated increasing and bodies are only appended
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        match self.bodies.binary_search_by_key(&id, |b| b.id) {
            Ok(i) => Some(&mut self.bodies[i]),
            Err(_) => None,
        }
    }

    pub fn velocity(&self, id: BodyId) -> Option<Vec2> {
        self.body(id).map(|b| b.vel)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Add an upward impulse if the body is effectively at rest vertically
    pub fn apply_jump_impulse(&mut self, id: BodyId, epsilon: f32, impulse: f32) -> bool {
        let Some(body) = self.body_mut(id) else {
            return false;
        };
        if body.vel.y.abs() < epsilon {
            body.vel.y += impulse;
            true
        } else {
            false
        }
    }

    /// Advance every body by `dt` and return contacts that began this step
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        let gravity = self.gravity;
        for body in &mut self.bodies {
            match body.motion {
                Motion::Dynamic => {
                    body.vel += gravity * dt;
                    body.pos += body.vel * dt;
                }
                Motion::Kinematic => body.pos += body.vel * dt,
                Motion::Static => {}
            }
        }

        self.resolve_solids();
        self.collect_contacts()
    }

    /// Push dynamic bodies out of solid bodies along the shallowest axis
    fn resolve_solids(&mut self) {
        for i in 0..self.bodies.len() {
            if self.bodies[i].motion != Motion::Dynamic {
                continue;
            }
            for j in 0..self.bodies.len() {
                if i == j || !self.bodies[i].category.collides_with(self.bodies[j].category) {
                    continue;
                }
                let other = self.bodies[j].aabb();
                let body = &mut self.bodies[i];
                let aabb = body.aabb();
                if !aabb.overlaps(&other) {
                    continue;
                }

                let pen = aabb.penetration(&other);
                let away = aabb.center() - other.center();
                if pen.y <= pen.x {
                    body.pos.y += if away.y >= 0.0 { pen.y } else { -pen.y };
                    body.vel.y = 0.0;
                } else {
                    body.pos.x += if away.x >= 0.0 { pen.x } else { -pen.x };
                    body.vel.x = 0.0;
                }
            }
        }
    }

    fn collect_contacts(&mut self) -> Vec<Contact> {
        let mut began = Vec::new();
        let mut touching = BTreeSet::new();

        for (i, a) in self.bodies.iter().enumerate() {
            for b in &self.bodies[i + 1..] {
                if !a.category.reports_contact_with(b.category) || !a.aabb().overlaps(&b.aabb()) {
                    continue;
                }
                let key = (a.id, b.id);
                if !self.touching.contains(&key) {
                    began.push(Contact {
                        a: a.id,
                        b: b.id,
                        a_category: a.category,
                        b_category: b.category,
                    });
                }
                touching.insert(key);
            }
        }

        self.touching = touching;
        began
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn world_with_ground() -> (PhysicsWorld, BodyId) {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -750.0));
        let ground = world.register(
            CollisionCategory::Ground,
            Motion::Static,
            Vec2::new(400.0, 50.0),
            Vec2::new(400.0, 50.0),
            Vec2::ZERO,
        );
        (world, ground)
    }

    #[test]
    fn test_category_rules() {
        use CollisionCategory::*;
        assert!(Player.collides_with(Ground));
        assert!(Ground.collides_with(Player));
        assert!(!Player.collides_with(Obstacle));
        assert!(Player.reports_contact_with(Obstacle));
        assert!(Obstacle.reports_contact_with(Player));
        assert!(!Obstacle.reports_contact_with(Ground));
        assert!(!Obstacle.reports_contact_with(Obstacle));
    }

    #[test]
    fn test_player_lands_on_ground() {
        let (mut world, _) = world_with_ground();
        let player = world.register(
            CollisionCategory::Player,
            Motion::Dynamic,
            Vec2::new(100.0, 200.0),
            Vec2::new(24.0, 24.0),
            Vec2::ZERO,
        );

        for _ in 0..240 {
            world.step(DT);
        }

        let body = world.body(player).unwrap();
        assert!((body.pos.y - 124.0).abs() < 1e-3);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_ground_never_moves() {
        let (mut world, ground) = world_with_ground();
        world.step(DT);
        assert_eq!(world.body(ground).unwrap().pos, Vec2::new(400.0, 50.0));
    }

    #[test]
    fn test_jump_requires_rest() {
        let (mut world, _) = world_with_ground();
        let player = world.register(
            CollisionCategory::Player,
            Motion::Dynamic,
            Vec2::new(100.0, 124.0),
            Vec2::new(24.0, 24.0),
            Vec2::ZERO,
        );

        assert!(world.apply_jump_impulse(player, 0.1, 700.0));
        assert_eq!(world.velocity(player).unwrap().y, 700.0);
        // Airborne: second press is rejected
        assert!(!world.apply_jump_impulse(player, 0.1, 700.0));
        assert_eq!(world.velocity(player).unwrap().y, 700.0);
    }

    #[test]
    fn test_jump_on_missing_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        assert!(!world.apply_jump_impulse(BodyId(42), 0.1, 700.0));
    }

    #[test]
    fn test_obstacle_overlap_reports_once() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let player = world.register(
            CollisionCategory::Player,
            Motion::Kinematic,
            Vec2::new(100.0, 100.0),
            Vec2::new(10.0, 10.0),
            Vec2::ZERO,
        );
        world.register(
            CollisionCategory::Obstacle,
            Motion::Kinematic,
            Vec2::new(125.0, 100.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-60.0, 0.0),
        );

        let mut reports = 0;
        for _ in 0..30 {
            let contacts = world.step(DT);
            for c in &contacts {
                assert!(c.is_between(CollisionCategory::Player, CollisionCategory::Obstacle));
            }
            reports += contacts.len();
        }
        assert_eq!(reports, 1);
        // Reported, not resolved
        assert_eq!(world.body(player).unwrap().pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_removed_body_forgets_contacts() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.register(
            CollisionCategory::Player,
            Motion::Static,
            Vec2::ZERO,
            Vec2::splat(10.0),
            Vec2::ZERO,
        );
        let obstacle = world.register(
            CollisionCategory::Obstacle,
            Motion::Static,
            Vec2::ZERO,
            Vec2::splat(10.0),
            Vec2::ZERO,
        );
        assert_eq!(world.step(DT).len(), 1);
        assert!(world.remove(obstacle));
        assert!(!world.remove(obstacle));
        assert!(world.step(DT).is_empty());
        assert_eq!(world.len(), 1);
        assert!(!world.is_empty());
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_center(Vec2::new(20.0, 0.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&b));
        let c = Aabb::from_center(Vec2::new(19.0, 0.0), Vec2::splat(10.0));
        assert!(a.overlaps(&c));
    }
}
