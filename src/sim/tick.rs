//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::physics::CollisionCategory;
use super::score::collect_coins;
use super::spawner::SpawnKind;
use super::state::{GameEvent, GamePhase, GameState, RemovalReason};

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, dt: f32) {
    // Spawn schedules keep running during GameOver only when configured to
    let spawner_runs = !state.is_suspended() || !state.tuning.pause_spawner_on_game_over;
    if spawner_runs {
        run_spawner(state, dt);
    }

    match state.phase {
        GamePhase::Playing => {}
        GamePhase::GameOver | GamePhase::Restarting => return,
    }

    state.time_ticks += 1;
    state.tracker.advance_tick(&mut state.events);

    let contacts = state.world.step(dt);
    let hit_obstacle = contacts
        .iter()
        .any(|c| c.is_between(CollisionCategory::Player, CollisionCategory::Obstacle));
    if hit_obstacle {
        state.enter_game_over();
        return;
    }

    for coin in &mut state.coins {
        coin.pos += coin.vel * dt;
    }

    let player = state.player_aabb();
    collect_coins(
        &mut state.coins,
        &player,
        &mut state.tracker,
        &mut state.events,
    );

    prune_off_screen(state);
}

fn run_spawner(state: &mut GameState, dt: f32) {
    let spawns = state.spawner.update(dt, &state.tuning);
    for spawn in spawns {
        match spawn {
            SpawnKind::Obstacle => {
                state.spawn_obstacle();
            }
            SpawnKind::Coin { y } => {
                state.spawn_coin(y);
            }
        }
    }
}

/// Remove entities whose visual extent has passed the left edge
fn prune_off_screen(state: &mut GameState) {
    let mut removed = Vec::new();

    let world = &mut state.world;
    state.obstacles.retain(|obstacle| {
        let gone = world
            .body(obstacle.body)
            .is_none_or(|b| b.pos.x + obstacle.size.x / 2.0 <= 0.0);
        if gone {
            world.remove(obstacle.body);
            removed.push(obstacle.id);
        }
        !gone
    });

    state.coins.retain(|coin| {
        let gone = coin.pos.x + coin.size.x / 2.0 <= 0.0;
        if gone {
            removed.push(coin.id);
        }
        !gone
    });

    for id in removed {
        state.push_event(GameEvent::EntityRemoved {
            id,
            reason: RemovalReason::OffScreen,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{Aabb, handle_press};
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn quiet_state() -> GameState {
        let mut state = GameState::new(Tuning::default(), 12345);
        state.spawner.enabled = false;
        state
    }

    /// Press whenever an obstacle is about to reach the player
    fn autopilot(state: &mut GameState) {
        let player_x = state.player_pos().x;
        let danger = state.obstacles.iter().any(|o| {
            state
                .obstacle_pos(o)
                .is_some_and(|p| p.x > player_x && p.x - player_x < 110.0)
        });
        if danger {
            handle_press(state);
        }
    }

    #[test]
    fn test_idle_run_scores_every_tick() {
        let mut state = quiet_state();
        for _ in 0..100 {
            tick(&mut state, SIM_DT);
        }
        assert_eq!(state.score(), 100);
        assert_eq!(state.coin_wallet(), 0);
        assert!(state.obstacles.is_empty());
        assert!(state.coins.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_obstacle_contact_ends_run() {
        let mut state = quiet_state();
        let obstacle_y = state.tuning.ground_top()
            + state.tuning.obstacle_size.y * state.tuning.hitbox_scale / 2.0;
        state.spawn_obstacle_at(Vec2::new(800.0, obstacle_y), Vec2::new(-220.0, 0.0));
        let body = state.obstacles[0].body;

        let mut overlapped = false;
        for _ in 0..400 {
            tick(&mut state, SIM_DT);
            let hit = state
                .world
                .body(body)
                .unwrap()
                .aabb()
                .overlaps(&state.player_aabb());
            if hit {
                overlapped = true;
                break;
            }
            assert_eq!(state.phase, GamePhase::Playing);
        }

        assert!(overlapped);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score(), 0);
        state.drain_events();

        // Further contact while over has no effect
        for _ in 0..30 {
            tick(&mut state, SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score(), 0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_coin_collected_on_overlap_tick() {
        let mut state = quiet_state();
        let coin = state.spawn_coin_at(Vec2::new(800.0, 150.0), Vec2::new(-220.0, 0.0));
        state.drain_events();

        let mut collected_at = None;
        for n in 1..=400u32 {
            let before = state.coins.iter().find(|c| c.id == coin).map(|c| c.pos);
            tick(&mut state, SIM_DT);
            let events = state.drain_events();
            let still_live = state.coins.iter().any(|c| c.id == coin);

            if still_live {
                assert_eq!(state.coin_wallet(), 0);
                assert!(!events.contains(&GameEvent::CoinCollected { id: coin }));
            } else {
                let Some(before) = before else { break };
                let moved = before + Vec2::new(-220.0, 0.0) * SIM_DT;
                let aabb = Aabb::from_center(moved, state.tuning.coin_size / 2.0);
                assert!(aabb.overlaps(&state.player_aabb()));
                assert_eq!(state.coin_wallet(), 1);
                assert!(events.contains(&GameEvent::CoinCollected { id: coin }));
                assert!(events.contains(&GameEvent::CoinsChanged(1)));
                collected_at = Some(n);
                break;
            }
        }
        assert!(collected_at.is_some());
    }

    #[test]
    fn test_jump_reaches_both_ends_of_coin_band() {
        let band = Tuning::default().coin_band;
        for fraction in [band.min, band.max] {
            let mut state = quiet_state();
            let x = state.player_pos().x;
            let y = state.tuning.coin_y(fraction);
            state.spawn_coin_at(Vec2::new(x, y), Vec2::ZERO);

            // Out of reach while grounded
            tick(&mut state, SIM_DT);
            assert_eq!(state.coin_wallet(), 0, "fraction {fraction}");

            assert!(handle_press(&mut state));
            for _ in 0..120 {
                tick(&mut state, SIM_DT);
                if state.coin_wallet() == 1 {
                    break;
                }
            }
            assert_eq!(state.coin_wallet(), 1, "fraction {fraction}");
            assert!(state.coins.is_empty());
        }
    }

    #[test]
    fn test_high_coin_passes_and_is_pruned() {
        let mut state = quiet_state();
        let coin = state.spawn_coin(500.0);
        let mut removed = false;
        for _ in 0..400 {
            tick(&mut state, SIM_DT);
            if state.drain_events().contains(&GameEvent::EntityRemoved {
                id: coin,
                reason: RemovalReason::OffScreen,
            }) {
                removed = true;
                break;
            }
        }
        assert!(removed);
        assert!(state.coins.is_empty());
        assert_eq!(state.coin_wallet(), 0);
    }

    #[test]
    fn test_obstacle_removed_after_traversal() {
        let mut state = quiet_state();
        // Player airborne forever so the obstacle passes underneath
        state.world.gravity = Vec2::ZERO;
        state.world.body_mut(state.player.body).unwrap().pos.y = 400.0;
        let id = state.spawn_obstacle();

        let mut removed_at = None;
        for n in 1..=300u32 {
            tick(&mut state, SIM_DT);
            if state.drain_events().contains(&GameEvent::EntityRemoved {
                id,
                reason: RemovalReason::OffScreen,
            }) {
                removed_at = Some(n);
                break;
            }
        }
        // 4.0 s traversal at 60 Hz
        let n = removed_at.unwrap();
        assert!((239..=241).contains(&n), "removed at tick {n}");
        assert_eq!(state.world.len(), 2);
    }

    #[test]
    fn test_spawner_held_during_game_over() {
        let mut state = GameState::new(Tuning::default(), 5);
        tick(&mut state, SIM_DT);
        assert_eq!(state.obstacles.len(), 1);
        state.enter_game_over();
        for _ in 0..600 {
            tick(&mut state, SIM_DT);
        }
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.coins.is_empty());
    }

    #[test]
    fn test_spawner_runs_during_game_over_when_configured() {
        let tuning = Tuning {
            pause_spawner_on_game_over: false,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, 5);
        tick(&mut state, SIM_DT);
        state.enter_game_over();
        for _ in 0..600 {
            tick(&mut state, SIM_DT);
        }
        assert!(state.obstacles.len() > 1);
        assert!(!state.coins.is_empty());
        // Nothing moves and nothing scores while over
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_score_restarts_from_zero_after_restart() {
        let mut state = quiet_state();
        for _ in 0..10 {
            tick(&mut state, SIM_DT);
        }
        state.enter_game_over();
        tick(&mut state, SIM_DT);
        assert_eq!(state.score(), 0);
        state.restart();
        assert_eq!(state.score(), 0);
        tick(&mut state, SIM_DT);
        assert_eq!(state.score(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_entities_move_left_every_tick(seed in any::<u64>()) {
            let mut state = GameState::new(Tuning::default(), seed);
            for _ in 0..900 {
                let was_playing = state.phase == GamePhase::Playing;
                let score_before = state.score();
                let obstacles: HashMap<_, _> = state
                    .obstacles
                    .iter()
                    .filter_map(|o| state.obstacle_pos(o).map(|p| (o.id, p.x)))
                    .collect();
                let coins: HashMap<_, _> = state.coins.iter().map(|c| (c.id, c.pos.x)).collect();

                autopilot(&mut state);
                tick(&mut state, SIM_DT);

                if !was_playing {
                    continue;
                }
                for o in &state.obstacles {
                    if let (Some(prev), Some(now)) = (obstacles.get(&o.id), state.obstacle_pos(o)) {
                        prop_assert!(now.x < *prev);
                    }
                }
                if state.phase == GamePhase::Playing {
                    // Coins stop on the tick that ends the run
                    for c in &state.coins {
                        if let Some(prev) = coins.get(&c.id) {
                            prop_assert!(c.pos.x < *prev);
                        }
                    }
                    prop_assert_eq!(state.score(), score_before + 1);
                } else {
                    prop_assert_eq!(state.score(), 0);
                }
            }
        }
    }
}
