//! Process Arcade headless runner
//!
//! Plays a level with a scripted autopilot and logs how it went. Useful for
//! soak-testing level files and checking determinism across seeds.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use process_arcade::audio::LogAudio;
#[cfg(not(target_arch = "wasm32"))]
use process_arcade::consts::*;
#[cfg(not(target_arch = "wasm32"))]
use process_arcade::publish::{PublishPort, StateDiff};
#[cfg(not(target_arch = "wasm32"))]
use process_arcade::sim::{DialogueChoice, DialogueResult, GamePhase, GameState, InputSnapshot};
#[cfg(not(target_arch = "wasm32"))]
use process_arcade::{ConfigResult, Session, SessionConfig};

/// Ten minutes of play at 60 Hz
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_FRAMES: u32 = 60 * 60 * 10;

/// Play a level headless with a scripted autopilot
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "process-arcade", version, about)]
struct Args {
    /// Level configuration (JSON). Uses the built-in level when omitted.
    #[arg(value_name = "LEVEL")]
    level: Option<PathBuf>,
    /// Override the RNG seed from the configuration.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Stop after this many 60 Hz frames.
    #[arg(
        long,
        value_name = "COUNT",
        default_value_t = DEFAULT_FRAMES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    frames: u32,
    /// Print the resolved configuration as JSON and exit.
    #[arg(long)]
    dump_config: bool,
}

/// Logs the fields that changed each frame
#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
struct LogPublisher {
    diffs: u64,
}

#[cfg(not(target_arch = "wasm32"))]
impl PublishPort for LogPublisher {
    fn publish(&mut self, diff: &StateDiff) {
        self.diffs += 1;
        if let Ok(json) = serde_json::to_string(diff) {
            log::debug!("state: {}", json);
        }
    }
}

/// Walk right, throw at whoever is closest, hop over props
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(state: &GameState, frame: u32) -> InputSnapshot {
    let player = &state.player;
    let x = player.pos().x;
    let mut input = InputSnapshot::default();

    let nearest = state.enemies.iter().min_by(|a, b| {
        (a.pos().x - x)
            .abs()
            .partial_cmp(&(b.pos().x - x).abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    match nearest {
        Some(enemy) => {
            let dx = enemy.pos().x - x;
            let facing_target = dx.signum() == player.facing;
            if !facing_target || dx.abs() > 260.0 {
                input.left = dx < 0.0;
                input.right = dx > 0.0;
            }
            // Alternate short and long holds for a mix of tiers
            let hold = if (frame / 200) % 2 == 0 { 30 } else { 110 };
            input.action_a = frame % (hold + 10) < hold;
        }
        None => input.right = true,
    }

    if player.body.blocked.wall() {
        input.up = true;
    }
    input
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: Args) -> ConfigResult<()> {
    let mut config = match &args.level {
        Some(path) => SessionConfig::from_path(path)?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.dump_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let mut session = Session::new(config, LogAudio::new(), LogPublisher::default());
    let mut frame = 0;
    while frame < args.frames {
        if let Some(payload) = session.state().dialogue.payload() {
            // Take the last option, which the built-in level marks as the good one
            let choice_index = payload.options.len().saturating_sub(1);
            let result = payload
                .options
                .get(choice_index)
                .map_or(DialogueResult::Good, |o| o.result);
            session.resolve_dialogue(DialogueChoice {
                choice_index,
                result,
            });
        }

        let input = autopilot(session.state(), frame);
        session.tick(&input, FRAME_DT);
        frame += 1;

        if session.state().promo_shown || session.phase() == GamePhase::GameOver {
            break;
        }
    }

    let state = session.state();
    let outcome = match state.phase {
        GamePhase::Complete => "level complete",
        GamePhase::GameOver => "game over",
        _ => "out of frames",
    };
    println!(
        "{}: score {} after {:.1}s ({} frames), {} lives left, x={:.0}",
        outcome,
        state.score(),
        state.time,
        frame,
        state.player.lives,
        state.player.pos().x
    );
    let (audio, publisher) = session.into_ports();
    log::info!(
        "{} audio cues, {} state diffs published",
        audio.played(),
        publisher.diffs
    );
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Process Arcade (headless) starting...");

    let args = Args::parse();
    if let Err(err) = run(args) {
        log::error!("{}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}


#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive `Session` directly on the web; nothing to run here
}
