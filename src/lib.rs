//! Side Runner - simulation core for a side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, scoring, game state)
//! - `game`: Fixed-timestep host that owns the state and the restart timer
//! - `scheduler`: Wall-clock deferred callbacks with liveness checks
//! - `presentation`: Observer seam for HUD/scene collaborators
//! - `audio`: Background music seam (failures are non-fatal)
//! - `assets`: Sprite loading with fallback visuals
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod game;
pub mod presentation;
pub mod scheduler;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use tuning::{SpawnRange, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one score point per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the accumulator will absorb
    pub const MAX_FRAME_DT: f32 = 0.1;
}
