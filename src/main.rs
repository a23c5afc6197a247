//! Space Run - headless native driver
//!
//! Plays a scripted session: a single finger sweeps the ship back and forth
//! across the lower third of the screen until the ship is destroyed or time
//! runs out.

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

/// Run a scripted Space Run session and print the final HUD
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "space-run", version, about)]
struct Args {
    /// Settings JSON file (defaults are used when omitted)
    settings: Option<std::path::PathBuf>,

    /// Override the gameplay seed from the settings
    #[arg(long)]
    seed: Option<u64>,

    /// Stop the session after this many seconds
    #[arg(long, default_value_t = 120.0, value_parser = positive_seconds)]
    max_seconds: f64,

    /// Seconds per full left-right sweep of the finger
    #[arg(long, default_value_t = 4.0, value_parser = positive_seconds)]
    sweep_period: f64,
}

#[cfg(not(target_arch = "wasm32"))]
fn positive_seconds(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("expected a positive number of seconds, got {}", s))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Space Run (native) starting...");

    let args = Args::parse();
    let mut settings = load_settings(args.settings.as_deref());
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    let summary = run_session(&settings, args.max_seconds, args.sweep_period);

    println!(
        "score {} | survived {} | frames {} | game over: {}",
        summary.hud.score_text, summary.hud.elapsed_text, summary.frames, summary.ended
    );
    match serde_json::to_string_pretty(&summary.hud) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize HUD: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host; the library is driven by an embedding shell
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings(path: Option<&std::path::Path>) -> space_run::Settings {
    use space_run::Settings;

    let Some(path) = path else {
        log::info!("Using default settings");
        return Settings::default();
    };
    match Settings::load(path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!(
                "Could not load settings from {}: {}; using defaults",
                path.display(),
                e
            );
            Settings::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
struct Summary {
    hud: space_run::sim::Hud,
    frames: u64,
    ended: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn run_session(settings: &space_run::Settings, max_seconds: f64, sweep_period: f64) -> Summary {
    use glam::Vec2;
    use space_run::AudioManager;
    use space_run::audio::LogPlayer;
    use space_run::sim::{FrameInput, GameState, tick};

    /// Host frame period (seconds)
    const FRAME: f64 = 1.0 / 60.0;

    let mut state = GameState::from_settings(settings);
    let mut audio = AudioManager::from_settings(LogPlayer, settings);

    let (width, height) = settings.screen_size();
    let y = height / 3.0;

    let mut frame = 0u64;
    while state.is_running() && frame as f64 * FRAME < max_seconds {
        let now = frame as f64 * FRAME;
        let phase = (now / sweep_period * std::f64::consts::TAU).sin() as f32;
        let finger = Vec2::new(width / 2.0 + phase * width * 0.4, y);
        let input = if frame == 0 {
            FrameInput::press(1, finger)
        } else {
            FrameInput::hold(1, finger)
        };

        tick(&mut state, &input, now);
        audio.play_events(&state.drain_events());
        frame += 1;
    }

    Summary {
        hud: state.hud.clone(),
        frames: state.frame,
        ended: !state.is_running(),
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["space-run"]).expect("no args is valid");
        assert!(args.settings.is_none());
        assert!(args.seed.is_none());
        assert_eq!(args.max_seconds, 120.0);
        assert_eq!(args.sweep_period, 4.0);
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::try_parse_from([
            "space-run",
            "settings.json",
            "--seed",
            "42",
            "--max-seconds",
            "10",
            "--sweep-period",
            "2.5",
        ])
        .expect("valid args");
        assert_eq!(args.settings.as_deref(), Some(std::path::Path::new("settings.json")));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.max_seconds, 10.0);
        assert_eq!(args.sweep_period, 2.5);
    }

    #[test]
    fn test_args_rejects_bad_input() {
        assert!(Args::try_parse_from(["space-run", "--max-seconds", "0"]).is_err());
        assert!(Args::try_parse_from(["space-run", "--sweep-period", "-1"]).is_err());
        assert!(Args::try_parse_from(["space-run", "a.json", "b.json"]).is_err());
    }

    #[test]
    fn test_session_is_bounded() {
        let summary = run_session(&space_run::Settings::default(), 1.0, 4.0);
        assert!(summary.frames <= 61);
    }
}
