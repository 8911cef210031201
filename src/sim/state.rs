//! Game state and core simulation types
//!
//! The state machine lives here: `Playing` → `GameOver` on an obstacle
//! contact, `GameOver` → `Restarting` → `Playing` when the host's restart
//! timer fires.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::{Aabb, BodyId, CollisionCategory, Motion, PhysicsWorld};
use super::score::ScoreTracker;
use super::spawner::Spawner;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, waiting for the restart timer
    GameOver,
    /// Clearing the field before play resumes
    Restarting,
}

/// Stable entity handle (never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Kind of visual an entity needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle,
    Coin,
}

/// Why an entity left the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    OffScreen,
    Collected,
    Restart,
}

/// Notifications for presentation and audio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    CoinsChanged(u64),
    PhaseChanged(GamePhase),
    Jumped,
    EntitySpawned {
        id: EntityId,
        kind: EntityKind,
        pos: Vec2,
        size: Vec2,
    },
    EntityRemoved {
        id: EntityId,
        reason: RemovalReason,
    },
    CoinCollected {
        id: EntityId,
    },
}

/// The avatar (exactly one per game)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: BodyId,
    pub size: Vec2,
    pub spawn: Vec2,
}

/// An obstacle sliding toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub body: BodyId,
    /// Visual size (the body uses the scaled hitbox)
    pub size: Vec2,
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Coin {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size / 2.0)
    }
}

/// Serializable view of the state for presentation/debugging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub time_ticks: u64,
    pub score: u64,
    pub coins: u64,
    pub player: Vec2,
    pub obstacles: Vec<(EntityId, Vec2)>,
    pub pickups: Vec<(EntityId, Vec2)>,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter (Playing ticks only)
    pub time_ticks: u64,
    pub world: PhysicsWorld,
    pub player: Player,
    pub ground: BodyId,
    /// Live obstacles (spawn order)
    pub obstacles: Vec<Obstacle>,
    /// Live coins (spawn order)
    pub coins: Vec<Coin>,
    pub tracker: ScoreTracker,
    pub spawner: Spawner,
    /// Pending notifications, drained by the host each frame
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut world = PhysicsWorld::new(tuning.gravity);

        let field = tuning.playfield;
        let ground_half = Vec2::new(field.x / 2.0, tuning.ground_height / 2.0);
        let ground = world.register(
            CollisionCategory::Ground,
            Motion::Static,
            ground_half,
            ground_half,
            Vec2::ZERO,
        );

        let spawn = tuning.player_spawn();
        let body = world.register(
            CollisionCategory::Player,
            Motion::Dynamic,
            spawn,
            tuning.player_size * tuning.hitbox_scale / 2.0,
            Vec2::ZERO,
        );

        Self {
            seed,
            phase: GamePhase::Playing,
            time_ticks: 0,
            world,
            player: Player {
                body,
                size: tuning.player_size,
                spawn,
            },
            ground,
            obstacles: Vec::new(),
            coins: Vec::new(),
            tracker: ScoreTracker::new(),
            spawner: Spawner::new(seed, &tuning),
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Tick-driven simulation is halted outside `Playing`
    pub fn is_suspended(&self) -> bool {
        self.phase != GamePhase::Playing
    }

    pub fn score(&self) -> u64 {
        self.tracker.score()
    }

    pub fn coin_wallet(&self) -> u64 {
        self.tracker.coins()
    }

    pub fn player_pos(&self) -> Vec2 {
        self.world
            .body(self.player.body)
            .map(|b| b.pos)
            .unwrap_or(self.player.spawn)
    }

    pub fn player_velocity(&self) -> Vec2 {
        self.world.velocity(self.player.body).unwrap_or(Vec2::ZERO)
    }

    pub fn player_aabb(&self) -> Aabb {
        match self.world.body(self.player.body) {
            Some(body) => body.aabb(),
            None => Aabb::from_center(
                self.player.spawn,
                self.player.size * self.tuning.hitbox_scale / 2.0,
            ),
        }
    }

    pub fn obstacle_pos(&self, obstacle: &Obstacle) -> Option<Vec2> {
        self.world.body(obstacle.body).map(|b| b.pos)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every notification produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn an obstacle at the right edge, resting on the ground
    pub fn spawn_obstacle(&mut self) -> EntityId {
        let size = self.tuning.obstacle_size;
        let pos = Vec2::new(
            self.tuning.playfield.x + size.x / 2.0,
            self.tuning.ground_top() + size.y * self.tuning.hitbox_scale / 2.0,
        );
        let vel = self.tuning.obstacle_velocity();
        self.spawn_obstacle_at(pos, vel)
    }

    /// Spawn an obstacle with an explicit position and velocity
    pub fn spawn_obstacle_at(&mut self, pos: Vec2, vel: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let size = self.tuning.obstacle_size;
        let body = self.world.register(
            CollisionCategory::Obstacle,
            Motion::Kinematic,
            pos,
            size * self.tuning.hitbox_scale / 2.0,
            vel,
        );
        self.obstacles.push(Obstacle { id, body, size });
        self.push_event(GameEvent::EntitySpawned {
            id,
            kind: EntityKind::Obstacle,
            pos,
            size,
        });
        log::debug!("Spawned obstacle {:?} at {}", id, pos);
        id
    }

    /// Spawn a coin at the right edge with the given vertical center
    pub fn spawn_coin(&mut self, y: f32) -> EntityId {
        let size = self.tuning.coin_size;
        let pos = Vec2::new(self.tuning.playfield.x + size.x / 2.0, y);
        let vel = Vec2::new(-self.tuning.coin_speed, 0.0);
        self.spawn_coin_at(pos, vel)
    }

    pub fn spawn_coin_at(&mut self, pos: Vec2, vel: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let size = self.tuning.coin_size;
        self.coins.push(Coin {
            id,
            pos,
            vel,
            size,
        });
        self.push_event(GameEvent::EntitySpawned {
            id,
            kind: EntityKind::Coin,
            pos,
            size,
        });
        log::debug!("Spawned coin {:?} at {}", id, pos);
        id
    }

    /// Playing → GameOver. Returns false (and does nothing) in any other phase.
    pub fn enter_game_over(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.tracker.reset(&mut self.events);
        self.push_event(GameEvent::PhaseChanged(GamePhase::GameOver));
        log::info!("Game over after {} ticks", self.time_ticks);
        true
    }

    /// GameOver → Restarting → Playing. Returns false outside GameOver.
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::Restarting;
        self.push_event(GameEvent::PhaseChanged(GamePhase::Restarting));

        let spawn = self.player.spawn;
        if let Some(body) = self.world.body_mut(self.player.body) {
            body.pos = spawn;
            body.vel = Vec2::ZERO;
        }
        self.purge_entities();
        self.spawner.reset(&self.tuning);

        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::PhaseChanged(GamePhase::Playing));
        log::info!("Restarted (seed {})", self.seed);
        true
    }

    /// Remove every obstacle and coin
    fn purge_entities(&mut self) {
        for obstacle in std::mem::take(&mut self.obstacles) {
            self.world.remove(obstacle.body);
            self.events.push(GameEvent::EntityRemoved {
                id: obstacle.id,
                reason: RemovalReason::Restart,
            });
        }
        for coin in std::mem::take(&mut self.coins) {
            self.events.push(GameEvent::EntityRemoved {
                id: coin.id,
                reason: RemovalReason::Restart,
            });
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            time_ticks: self.time_ticks,
            score: self.score(),
            coins: self.coin_wallet(),
            player: self.player_pos(),
            obstacles: self
                .obstacles
                .iter()
                .filter_map(|o| self.obstacle_pos(o).map(|p| (o.id, p)))
                .collect(),
            pickups: self.coins.iter().map(|c| (c.id, c.pos)).collect(),
        }
    }
}
