//! Press-to-jump input handling
//!
//! A press either jumps right now or is dropped. Nothing is queued.

use super::state::{GameEvent, GamePhase, GameState};

/// Handle one "press began" event. Returns true if the player jumped.
pub fn handle_press(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Playing {
        log::debug!("Press ignored ({:?})", state.phase);
        return false;
    }

    let vy = state.player_velocity().y;
    let epsilon = state.tuning.jump_epsilon;
    let impulse = state.tuning.jump_impulse;
    if state.world.apply_jump_impulse(state.player.body, epsilon, impulse) {
        log::debug!("Jump applied (vy was {vy:.3})");
        state.push_event(GameEvent::Jumped);
        true
    } else {
        log::debug!("Jump not applied, player airborne (vy {vy:.3})");
        false
    }
}
