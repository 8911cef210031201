//! Timed entity generators
//!
//! Two independent schedules: obstacles on a randomized delay, coins on a
//! fixed interval. Randomness comes from a seeded PCG stream so a run seed
//! reproduces the exact spawn sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::SIM_DT;
use crate::tuning::{SpawnRange, Tuning};

/// Shortest rearm delay, bounding how often a schedule can fire per tick
const MIN_DELAY: f32 = SIM_DT;

/// What a schedule asked to spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnKind {
    Obstacle,
    /// Coin with its vertical center
    Coin { y: f32 },
}

/// Countdown to the next firing
#[derive(Debug, Clone, Copy, PartialEq)]
struct Schedule {
    remaining: f32,
}

#[derive(Debug, Clone)]
pub struct Spawner {
    obstacle: Schedule,
    coin: Schedule,
    rng: Pcg32,
    /// Disabled spawners never fire (tests, attract screens)
    pub enabled: bool,
}

impl Spawner {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut spawner = Self {
            obstacle: Schedule { remaining: 0.0 },
            coin: Schedule { remaining: 0.0 },
            rng: Pcg32::seed_from_u64(seed),
            enabled: true,
        };
        spawner.reset(tuning);
        spawner
    }

    /// Rearm both schedules: the first obstacle fires immediately, the first
    /// coin one interval later
    pub fn reset(&mut self, tuning: &Tuning) {
        self.obstacle.remaining = 0.0;
        self.coin.remaining = tuning.coin_interval_secs;
    }

    /// Seconds until the next obstacle
    pub fn next_obstacle_in(&self) -> f32 {
        self.obstacle.remaining
    }

    /// Seconds until the next coin
    pub fn next_coin_in(&self) -> f32 {
        self.coin.remaining
    }

    /// Advance both schedules by `dt` and return everything that fired
    pub fn update(&mut self, dt: f32, tuning: &Tuning) -> Vec<SpawnKind> {
        let mut spawns = Vec::new();
        if !self.enabled {
            return spawns;
        }

        self.obstacle.remaining -= dt;
        while self.obstacle.remaining <= 0.0 {
            spawns.push(SpawnKind::Obstacle);
            let delay = self.draw(tuning.obstacle_interval);
            self.obstacle.remaining += delay.max(MIN_DELAY);
        }

        self.coin.remaining -= dt;
        while self.coin.remaining <= 0.0 {
            let fraction = self.draw(tuning.coin_band);
            spawns.push(SpawnKind::Coin {
                y: tuning.coin_y(fraction),
            });
            self.coin.remaining += tuning.coin_interval_secs.max(MIN_DELAY);
        }

        spawns
    }

    /// Uniform draw from `range`, tolerating inverted or empty ranges
    fn draw(&mut self, range: SpawnRange) -> f32 {
        let (lo, hi) = if range.min <= range.max {
            (range.min, range.max)
        } else {
            (range.max, range.min)
        };
        if lo < hi {
            self.rng.random_range(lo..=hi)
        } else {
            lo
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_obstacle_is_immediate() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::new(7, &tuning);
        let spawns = spawner.update(SIM_DT, &tuning);
        assert_eq!(spawns, vec![SpawnKind::Obstacle]);
        let delay = spawner.next_obstacle_in() + SIM_DT;
        assert!(delay >= tuning.obstacle_interval.min - 1e-4);
        assert!(delay <= tuning.obstacle_interval.max + 1e-4);
    }

    #[test]
    fn test_coin_cadence_is_fixed() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::new(7, &tuning);
        let mut coin_ticks = Vec::new();
        // Coins near ticks 90, 180, 270, 360
        for tick in 1..=400u32 {
            for spawn in spawner.update(SIM_DT, &tuning) {
                if let SpawnKind::Coin { y } = spawn {
                    let band = tuning.coin_band;
                    assert!(y >= tuning.coin_y(band.min) - 1e-3);
                    assert!(y <= tuning.coin_y(band.max) + 1e-3);
                    coin_ticks.push(tick);
                }
            }
        }
        assert_eq!(coin_ticks.len(), 4);
        for pair in coin_ticks.windows(2) {
            let gap = pair[1] - pair[0];
            assert!((89..=91).contains(&gap), "gap {gap}");
        }
    }

    #[test]
    fn test_disabled_never_fires() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::new(7, &tuning);
        spawner.enabled = false;
        for _ in 0..600 {
            assert!(spawner.update(SIM_DT, &tuning).is_empty());
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let tuning = Tuning::default();
        let mut a = Spawner::new(99, &tuning);
        let mut b = Spawner::new(99, &tuning);
        for _ in 0..1000 {
            assert_eq!(a.update(SIM_DT, &tuning), b.update(SIM_DT, &tuning));
        }
    }

    #[test]
    fn test_reset_rearms() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::new(1, &tuning);
        for _ in 0..50 {
            spawner.update(SIM_DT, &tuning);
        }
        spawner.reset(&tuning);
        assert_eq!(spawner.next_obstacle_in(), 0.0);
        assert_eq!(spawner.next_coin_in(), tuning.coin_interval_secs);
    }

    #[test]
    fn test_degenerate_ranges_stay_bounded() {
        let tuning = Tuning {
            obstacle_interval: SpawnRange::new(0.0, 0.0),
            coin_interval_secs: 0.0,
            coin_band: SpawnRange::new(0.35, 0.15),
            ..Tuning::default()
        };
        let mut spawner = Spawner::new(3, &tuning);
        for _ in 0..10 {
            let spawns = spawner.update(SIM_DT, &tuning);
            let obstacles = spawns.iter().filter(|s| **s == SpawnKind::Obstacle).count();
            assert!(obstacles <= 2, "{obstacles} obstacles in one tick");
            for spawn in spawns {
                if let SpawnKind::Coin { y } = spawn {
                    assert!(y >= tuning.coin_y(0.15) - 1e-3);
                    assert!(y <= tuning.coin_y(0.35) + 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_inverted_interval_does_not_panic() {
        let tuning = Tuning {
            obstacle_interval: SpawnRange::new(4.0, 2.0),
            ..Tuning::default()
        };
        let mut spawner = Spawner::new(3, &tuning);
        assert_eq!(spawner.update(SIM_DT, &tuning), vec![SpawnKind::Obstacle]);
        let delay = spawner.next_obstacle_in() + SIM_DT;
        assert!((2.0 - 1e-4..=4.0 + 1e-4).contains(&delay));
    }

    proptest! {
        #[test]
        fn prop_obstacle_delays_within_range(seed in any::<u64>(), relaxed in any::<bool>()) {
            let tuning = if relaxed { Tuning::relaxed() } else { Tuning::default() };
            let mut spawner = Spawner::new(seed, &tuning);
            let mut last_spawn: Option<u32> = None;
            for tick in 0..3000u32 {
                let fired = spawner
                    .update(SIM_DT, &tuning)
                    .iter()
                    .any(|s| *s == SpawnKind::Obstacle);
                if fired {
                    if let Some(prev) = last_spawn {
                        let secs = (tick - prev) as f32 * SIM_DT;
                        prop_assert!(secs >= tuning.obstacle_interval.min - SIM_DT * 1.5);
                        prop_assert!(secs <= tuning.obstacle_interval.max + SIM_DT * 1.5);
                    }
                    last_spawn = Some(tick);
                }
            }
        }
    }
}
