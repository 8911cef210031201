//! Side Runner entry point
//!
//! Native builds run a headless demo: an autopilot presses whenever an
//! obstacle gets close, events drive a text HUD, and the final snapshot is
//! printed as JSON.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;
    use side_runner::assets::{NoAssets, SpriteSet};
    use side_runner::audio::{BackgroundMusic, SilentAudio};
    use side_runner::presentation::{TextHud, dispatch};
    use side_runner::sim::GamePhase;
    use side_runner::{Game, Tuning};

    env_logger::init();
    log::info!("Side Runner (native) starting...");

    let options = Options::parse();
    let tuning = match &options.tuning {
        Some(path) => Tuning::load(path).unwrap_or_else(|e| {
            log::warn!("Ignoring tuning file {}: {}", path.display(), e);
            Tuning::default()
        }),
        None => Tuning::default(),
    };
    if options.seconds.is_nan() || options.seconds <= 0.0 {
        log::error!("--seconds must be positive, got {}", options.seconds);
        std::process::exit(2);
    }

    let sprites = SpriteSet::load(&mut NoAssets);
    if sprites.is_fallback_only() {
        log::info!("No sprite assets, using solid colors");
    }
    let mut music = BackgroundMusic::start(SilentAudio, "bgm.mp3");
    let mut hud = TextHud::default();
    let mut game = match Game::new(tuning, options.seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            std::process::exit(2);
        }
    };

    // Host frames at 60 fps
    let frame_dt = 1.0 / 60.0;
    let frames = (options.seconds / frame_dt).ceil() as u32;
    let mut runs = 1u32;
    let mut best = 0u64;

    for _ in 0..frames {
        if obstacle_close(&game) {
            game.press();
        }
        let events = game.frame(frame_dt);
        let score = game.state().score();
        best = best.max(score);
        if events
            .iter()
            .any(|e| *e == side_runner::sim::GameEvent::PhaseChanged(GamePhase::GameOver))
        {
            log::info!("{} | {} (run {})", hud.score_label, hud.coin_label, runs);
            runs += 1;
        }
        dispatch(&events, &mut hud);
        dispatch(&events, &mut music);
    }

    log::info!("{} | {}", hud.score_label, hud.coin_label);
    println!("Runs: {runs}, best score: {best}");
    match serde_json::to_string_pretty(&game.state().snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("Could not serialize snapshot: {}", e),
    }

    fn obstacle_close(game: &side_runner::Game) -> bool {
        let state = game.state();
        let player_x = state.player_pos().x;
        state.obstacles.iter().any(|o| {
            state
                .obstacle_pos(o)
                .is_some_and(|p| p.x > player_x && p.x - player_x < 110.0)
        })
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `side_runner::Game` directly
}

/// Headless Side Runner demo
#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Parser, Debug)]
#[command(name = "side-runner")]
#[command(about = "Run the endless runner headless with an autopilot")]
struct Options {
    /// JSON tuning file (missing fields use defaults)
    #[arg(long)]
    tuning: Option<std::path::PathBuf>,
    /// Run seed for the spawn sequence
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Simulated wall-clock seconds to run
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,
}
