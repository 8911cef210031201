//! Presentation seam
//!
//! The simulation never touches the scene. Renderers and HUDs implement
//! [`Presenter`] and receive the events the host drains each frame.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::sim::{EntityId, EntityKind, GameEvent, GamePhase, RemovalReason};

/// Observer for simulation events. Every hook defaults to a no-op.
pub trait Presenter {
    fn on_score(&mut self, _score: u64) {}
    fn on_coins(&mut self, _coins: u64) {}
    fn on_phase(&mut self, _phase: GamePhase) {}
    fn on_spawn(&mut self, _id: EntityId, _kind: EntityKind, _pos: Vec2, _size: Vec2) {}
    fn on_remove(&mut self, _id: EntityId, _reason: RemovalReason) {}
    fn on_jump(&mut self) {}
}

/// Route events to a presenter in order
pub fn dispatch(events: &[GameEvent], presenter: &mut dyn Presenter) {
    for event in events {
        match *event {
            GameEvent::ScoreChanged(score) => presenter.on_score(score),
            GameEvent::CoinsChanged(coins) => presenter.on_coins(coins),
            GameEvent::PhaseChanged(phase) => presenter.on_phase(phase),
            GameEvent::Jumped => presenter.on_jump(),
            GameEvent::EntitySpawned {
                id,
                kind,
                pos,
                size,
            } => presenter.on_spawn(id, kind, pos, size),
            GameEvent::EntityRemoved { id, reason } => presenter.on_remove(id, reason),
            // Removal follows as its own event
            GameEvent::CoinCollected { .. } => {}
        }
    }
}

/// On-screen text the HUD shows
#[derive(Debug, Clone)]
pub struct TextHud {
    pub score_label: String,
    pub coin_label: String,
    pub game_over_visible: bool,
    /// Live visuals the scene would be drawing
    pub visuals: BTreeMap<EntityId, EntityKind>,
}

impl Default for TextHud {
    fn default() -> Self {
        Self {
            score_label: Self::score_text(0),
            coin_label: Self::coin_text(0),
            game_over_visible: false,
            visuals: BTreeMap::new(),
        }
    }
}

impl TextHud {
    pub fn score_text(score: u64) -> String {
        format!("Score: {score}")
    }

    pub fn coin_text(coins: u64) -> String {
        format!("Coins: {coins}")
    }
}

impl Presenter for TextHud {
    fn on_score(&mut self, score: u64) {
        self.score_label = Self::score_text(score);
    }

    fn on_coins(&mut self, coins: u64) {
        self.coin_label = Self::coin_text(coins);
    }

    fn on_phase(&mut self, phase: GamePhase) {
        self.game_over_visible = match phase {
            GamePhase::GameOver => true,
            GamePhase::Restarting | GamePhase::Playing => false,
        };
    }

    fn on_spawn(&mut self, id: EntityId, kind: EntityKind, _pos: Vec2, _size: Vec2) {
        self.visuals.insert(id, kind);
    }

    fn on_remove(&mut self, id: EntityId, _reason: RemovalReason) {
        self.visuals.remove(&id);
    }
}
