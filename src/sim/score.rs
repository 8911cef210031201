//! Score and coin wallet bookkeeping
//!
//! Counters never change silently: every mutation pushes a notification
//! event that presentation consumes to refresh its labels.

use serde::{Deserialize, Serialize};

use super::physics::Aabb;
use super::state::{Coin, EntityId, GameEvent, RemovalReason};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    score: u64,
    coins: u64,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    /// One simulation tick survived
    pub fn advance_tick(&mut self, events: &mut Vec<GameEvent>) {
        self.score += 1;
        events.push(GameEvent::ScoreChanged(self.score));
    }

    pub fn add_coin(&mut self, events: &mut Vec<GameEvent>) {
        self.coins += 1;
        events.push(GameEvent::CoinsChanged(self.coins));
    }

    /// Zero both counters (notifies even if already zero so labels resync)
    pub fn reset(&mut self, events: &mut Vec<GameEvent>) {
        self.score = 0;
        self.coins = 0;
        events.push(GameEvent::ScoreChanged(0));
        events.push(GameEvent::CoinsChanged(0));
    }
}

/// Collect every coin overlapping the player, removing it in place.
///
/// Iterates in reverse so removing by index never skips an element.
/// Returns the ids collected this call.
pub fn collect_coins(
    coins: &mut Vec<Coin>,
    player: &Aabb,
    tracker: &mut ScoreTracker,
    events: &mut Vec<GameEvent>,
) -> Vec<EntityId> {
    let mut collected = Vec::new();
    for i in (0..coins.len()).rev() {
        if !coins[i].aabb().overlaps(player) {
            continue;
        }
        let coin = coins.remove(i);
        tracker.add_coin(events);
        events.push(GameEvent::CoinCollected { id: coin.id });
        events.push(GameEvent::EntityRemoved {
            id: coin.id,
            reason: RemovalReason::Collected,
        });
        collected.push(coin.id);
    }
    collected
}
