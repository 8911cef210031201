//! Data-driven game balance
//!
//! Every simulation constant lives here so balance can be changed from a
//! JSON file without touching gameplay code.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Closed interval of seconds used for randomized spawn delays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRange {
    pub min: f32,
    pub max: f32,
}

impl SpawnRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    /// Visible playfield size (origin bottom-left, y up)
    pub playfield: Vec2,
    /// Height of the ground strip along the bottom edge
    pub ground_height: f32,

    // === Physics ===
    /// Constant gravity (units/s²)
    pub gravity: Vec2,
    /// Upward velocity added by a jump (units/s)
    pub jump_impulse: f32,
    /// |vy| below this counts as grounded for jumping
    pub jump_epsilon: f32,
    /// Hitbox size relative to the visual size
    pub hitbox_scale: f32,

    // === Player ===
    pub player_size: Vec2,
    /// Horizontal spawn coordinate (player center)
    pub player_spawn_x: f32,

    // === Obstacles ===
    pub obstacle_size: Vec2,
    /// Seconds to cross the playfield width plus its own width
    pub obstacle_traversal_secs: f32,
    /// Delay between obstacle spawns
    pub obstacle_interval: SpawnRange,

    // === Coins ===
    pub coin_size: Vec2,
    pub coin_interval_secs: f32,
    /// Vertical band as fractions of the open sky above the ground
    pub coin_band: SpawnRange,
    /// Leftward coin speed (units/s)
    pub coin_speed: f32,

    // === Flow ===
    /// Wall-clock delay between game over and restart
    pub restart_delay_secs: f32,
    /// Hold spawn schedules while the game is over
    pub pause_spawner_on_game_over: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield: Vec2::new(800.0, 600.0),
            ground_height: 100.0,

            gravity: Vec2::new(0.0, -1800.0),
            jump_impulse: 1000.0,
            jump_epsilon: 0.1,
            hitbox_scale: 0.8,

            player_size: Vec2::new(60.0, 60.0),
            player_spawn_x: 100.0,

            obstacle_size: Vec2::new(80.0, 80.0),
            obstacle_traversal_secs: 4.0,
            obstacle_interval: SpawnRange::new(1.5, 3.0),

            coin_size: Vec2::new(30.0, 30.0),
            coin_interval_secs: 1.5,
            coin_band: SpawnRange::new(0.15, 0.35),
            coin_speed: 220.0,

            restart_delay_secs: 3.0,
            pause_spawner_on_game_over: true,
        }
    }
}

impl Tuning {
    /// Slower obstacle cadence with a forgiving grounded check
    pub fn relaxed() -> Self {
        Self {
            jump_epsilon: 5.0,
            obstacle_interval: SpawnRange::new(2.0, 4.0),
            ..Self::default()
        }
    }

    /// Parse and validate tuning from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read tuning from a JSON file
    pub fn load(path: &std::path::Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.playfield.x <= 0.0 || self.playfield.y <= 0.0 {
            return invalid("playfield", "must be positive");
        }
        if self.ground_height < 0.0 || self.ground_height >= self.playfield.y {
            return invalid("ground_height", "must lie inside the playfield");
        }
        if self.jump_epsilon <= 0.0 {
            return invalid("jump_epsilon", "must be positive");
        }
        if self.hitbox_scale <= 0.0 || self.hitbox_scale > 1.0 {
            return invalid("hitbox_scale", "must be in (0, 1]");
        }
        if self.obstacle_traversal_secs <= 0.0 {
            return invalid("obstacle_traversal_secs", "must be positive");
        }
        let interval = self.obstacle_interval;
        if interval.min <= 0.0 || interval.min > interval.max {
            return invalid("obstacle_interval", "needs 0 < min <= max");
        }
        if self.coin_interval_secs <= 0.0 {
            return invalid("coin_interval_secs", "must be positive");
        }
        let band = self.coin_band;
        if band.min < 0.0 || band.max > 1.0 || band.min > band.max {
            return invalid("coin_band", "needs 0 <= min <= max <= 1");
        }
        if self.coin_speed <= 0.0 {
            return invalid("coin_speed", "must be positive");
        }
        if self.restart_delay_secs < 0.0 {
            return invalid("restart_delay_secs", "must not be negative");
        }
        Ok(())
    }

    /// Obstacle velocity that crosses width + obstacle width in the traversal time
    pub fn obstacle_velocity(&self) -> Vec2 {
        let distance = self.playfield.x + self.obstacle_size.x;
        Vec2::new(-distance / self.obstacle_traversal_secs, 0.0)
    }

    /// Player center at spawn, resting on the ground
    pub fn player_spawn(&self) -> Vec2 {
        Vec2::new(
            self.player_spawn_x,
            self.ground_height + self.player_size.y * self.hitbox_scale / 2.0,
        )
    }

    /// Top edge of the ground
    pub fn ground_top(&self) -> f32 {
        self.ground_height
    }

    /// Coin center for a band fraction, measured up from the ground top
    pub fn coin_y(&self, fraction: f32) -> f32 {
        let sky = self.playfield.y - self.ground_top();
        self.ground_top() + sky * fraction
    }
}
