//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod input;
pub mod physics;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use input::handle_press;
pub use physics::{Aabb, Body, BodyId, CollisionCategory, Contact, Motion, PhysicsWorld};
pub use score::{ScoreTracker, collect_coins};
pub use spawner::{SpawnKind, Spawner};
pub use state::{
    Coin, EntityId, EntityKind, GameEvent, GamePhase, GameState, Obstacle, Player, RemovalReason,
    Snapshot,
};
pub use tick::tick;
