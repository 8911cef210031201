//! Fixed-timestep host
//!
//! Owns the shared game state, feeds it fixed ticks from a frame-time
//! accumulator and arms the restart timer on the wall clock.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::scheduler::Scheduler;
use crate::sim::{GameEvent, GamePhase, GameState, handle_press, tick};
use crate::tuning::{Tuning, TuningError};

pub struct Game {
    state: Rc<RefCell<GameState>>,
    scheduler: Scheduler<GameState>,
    accumulator: f32,
    restart_delay: f64,
}

impl Game {
    /// Validate `tuning` and start a run
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        log::info!("New run with seed {}", seed);
        let restart_delay = f64::from(tuning.restart_delay_secs);
        Ok(Self {
            state: Rc::new(RefCell::new(GameState::new(tuning, seed))),
            scheduler: Scheduler::new(),
            accumulator: 0.0,
            restart_delay,
        })
    }

    pub fn state(&self) -> Ref<'_, GameState> {
        self.state.borrow()
    }

    /// Mutable access for harnesses and debug tooling
    pub fn with_state<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        let mut state = self.state.borrow_mut();
        f(&mut *state)
    }

    /// Pending restart timers
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// A "press began" event from the input collaborator
    pub fn press(&mut self) -> bool {
        handle_press(&mut self.state.borrow_mut())
    }

    /// Advance by one host frame of `dt` wall-clock seconds
    pub fn frame(&mut self, dt: f32) -> Vec<GameEvent> {
        let dt = dt.max(0.0);

        // Timers run on wall-clock time, even while the simulation is suspended
        self.scheduler.advance(f64::from(dt));
        let mut events = self.state.borrow_mut().drain_events();

        self.accumulator += dt.min(MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state.borrow_mut(), SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        events.extend(self.state.borrow_mut().drain_events());

        // One timer per Playing -> GameOver transition, whatever caused it
        let game_overs = events
            .iter()
            .filter(|e| **e == GameEvent::PhaseChanged(GamePhase::GameOver))
            .count();
        for _ in 0..game_overs {
            self.arm_restart();
        }
        events
    }

    fn arm_restart(&mut self) {
        log::info!(
            "Restarting in {:.1}s (clock {:.2}s)",
            self.restart_delay,
            self.scheduler.now()
        );
        self.scheduler
            .after(self.restart_delay, &self.state, "restart", |state| {
                state.restart();
            });
    }
}
