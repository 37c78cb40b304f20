//! Headless runner
//!
//! Drives the game with a fixed-step accumulator and the autopilot, logging
//! frames through the text renderer and sounds through the log sink.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use space_shooter::audio::{AudioManager, LogSink};
use space_shooter::consts::{MAX_SUBSTEPS, SIM_HZ};
use space_shooter::platform::{Clock, ManualClock, SystemClock, UiAction};
use space_shooter::renderer::{Renderer, TextRenderer};
use space_shooter::sim::TickInput;
use space_shooter::{Game, GamePhase, Settings};

#[derive(Debug, Parser)]
#[command(name = "space-shooter", version, about = "Wave-based arcade shooter (headless runner)")]
struct Args {
    /// Simulation steps to run
    #[arg(long, default_value_t = 3_600)]
    frames: u64,

    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Settings JSON file
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Pace steps against the wall clock instead of a simulated one
    #[arg(long)]
    realtime: bool,

    /// Hold fire without autopilot steering
    #[arg(long)]
    manual: bool,

    /// Runs to play before stopping (0 = until frames run out)
    #[arg(long, default_value_t = 0)]
    runs: u32,

    /// Log the HUD every N playing steps
    #[arg(long, default_value_t = 60)]
    hud_every: u64,
}

/// Per-step milliseconds for the simulated clock, spreading the remainder
/// so 60 steps add up to exactly one second
fn step_ms(step: u64) -> u64 {
    let hz = SIM_HZ as u64;
    (step + 1) * 1000 / hz - step * 1000 / hz
}

struct Runner<C: Clock> {
    game: Game<C>,
    audio: AudioManager<LogSink>,
    renderer: TextRenderer,
    input: TickInput,
    runs_finished: u32,
    max_runs: u32,
}

impl<C: Clock> Runner<C> {
    fn new(game: Game<C>, args: &Args) -> Self {
        let audio = AudioManager::from_settings(LogSink, game.settings());
        let input = if args.manual {
            TickInput {
                fire: true,
                ..Default::default()
            }
        } else {
            TickInput {
                autopilot: true,
                ..Default::default()
            }
        };
        Self {
            game,
            audio,
            renderer: TextRenderer::new(args.hud_every),
            input,
            runs_finished: 0,
            max_runs: args.runs,
        }
    }

    /// One simulation step. Returns false once the runner should stop.
    fn step(&mut self) -> bool {
        match self.game.phase() {
            GamePhase::Menu => self.game.handle(UiAction::Play),
            GamePhase::GameOver => {
                self.runs_finished += 1;
                log::info!(
                    "Run {} over: score {}, level {}, rank {:?}",
                    self.runs_finished,
                    self.game.world.score,
                    self.game.world.level,
                    self.game.last_rank()
                );
                if self.max_runs > 0 && self.runs_finished >= self.max_runs {
                    return false;
                }
                self.game.handle(UiAction::Retry);
            }
            GamePhase::Countdown | GamePhase::Playing | GamePhase::ShipBuilder => {}
        }

        let events = self.game.frame(&self.input);
        self.audio.handle_events(&events);
        !self.game.quit_requested()
    }

    fn draw(&mut self) {
        self.renderer.draw(&self.game.view());
    }

    fn finish(self) {
        log::info!("Drew {} frames", self.renderer.frames_drawn());
        println!("High scores:");
        if self.game.high_scores.is_empty() {
            println!("  (none)");
        }
        for (i, e) in self.game.high_scores.entries.iter().enumerate() {
            println!("  {:>2}. {:>6}  level {:>3}  {:>8.1}s", i + 1, e.score, e.level, e.time_secs);
        }
    }
}

/// Deterministic run: every step advances the simulated clock by one tick
fn run_simulated(args: &Args, settings: Settings) {
    let clock = ManualClock::new(0);
    let mut runner = Runner::new(Game::new(settings, clock.clone()), args);
    for step in 0..args.frames {
        clock.advance(step_ms(step));
        if !runner.step() {
            break;
        }
        runner.draw();
    }
    runner.finish();
}

/// Wall-clock run with a fixed-step accumulator
fn run_realtime(args: &Args, settings: Settings) {
    let clock = SystemClock::new();
    let mut runner = Runner::new(Game::new(settings, clock.clone()), args);
    let step_len = 1000.0 / SIM_HZ as f64;

    let mut accumulator = 0.0;
    let mut last_ms = clock.now_ms();
    let mut steps = 0;
    'outer: while steps < args.frames {
        let now = clock.now_ms();
        // Cap long stalls
        accumulator += (now - last_ms).min(100) as f64;
        last_ms = now;

        let mut substeps = 0;
        while accumulator >= step_len && substeps < MAX_SUBSTEPS {
            if !runner.step() {
                break 'outer;
            }
            accumulator -= step_len;
            substeps += 1;
            steps += 1;
        }
        if substeps > 0 {
            runner.draw();
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    runner.finish();
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    log::info!("Space Shooter (headless) starting...");

    let mut settings = Settings::load(&args.settings);
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    if args.realtime {
        run_realtime(&args, settings);
    } else {
        run_simulated(&args, settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_ms_sums_to_one_second() {
        let total: u64 = (0..SIM_HZ as u64).map(step_ms).sum();
        assert_eq!(total, 1000);
        assert!((0..120).map(step_ms).all(|ms| ms == 16 || ms == 17));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["space-shooter", "--frames", "10", "--seed", "5", "--manual"]);
        assert_eq!(args.frames, 10);
        assert_eq!(args.seed, Some(5));
        assert!(args.manual);
        assert!(!args.realtime);
    }
}
