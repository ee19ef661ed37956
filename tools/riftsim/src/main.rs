mod console;
mod script;

use std::ops::ControlFlow::Break;

use anyhow::{bail, ensure};
use clap::Parser;
use rand_core::SeedableRng;
use rift::{Galois16, GameLoop, Halt};
use tracing::{info, warn};

use crate::{
    console::SimConsole,
    script::{ScriptEvent, ScriptedGame},
};

#[derive(Parser)]
#[command(name = "riftsim")]
#[command(version, about = "Run the Rift main loop headless, with a scripted player", long_about = None)]
struct Cli {
    /// Main loop passes to run before giving up
    #[arg(short, long, default_value_t = 3600)]
    passes: u32,

    /// Seed the PRNG from this at the start of each game, instead of the frame counter
    #[arg(long)]
    seed: Option<u64>,

    /// Scripted event as FRAME:EVENT (scroll, text, pause, quit, die, win, layer=N).
    /// Frames count gameplay frames. Replaces the built-in demo when given.
    #[arg(short, long = "event", value_name = "FRAME:EVENT")]
    events: Vec<ScriptEvent>,

    /// Frames each fade in/out takes
    #[arg(long, default_value_t = 4)]
    fade_frames: u8,

    /// error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

/// What happened over a run.
#[derive(Debug)]
struct Summary {
    halt: Option<Halt>,
    passes: u32,
    vblanks: u64,
    gameplay_frames: u32,
    bank_switches: u32,
    corrupted_frames: u32,
}

fn simulate(cli: &Cli) -> Summary {
    let seeded = cli.seed.map(Galois16::seed_from_u64);
    let events = if cli.events.is_empty() {
        script::demo()
    } else {
        cli.events.clone()
    };

    let console = SimConsole::new(cli.fade_frames, seeded);
    let mut game = GameLoop::new(console, ScriptedGame::new(events));

    game.boot();
    let mut halt = None;
    let mut passes = 0;
    while passes < cli.passes {
        passes += 1;
        if let Break(h) = game.step() {
            halt = Some(h);
            break;
        }
    }

    Summary {
        halt,
        passes,
        vblanks: game.console.vblanks,
        gameplay_frames: game.banked.gameplay_frames(),
        bank_switches: game.banked.bank_switches,
        corrupted_frames: game.console.raster.corrupted_frames,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level).init();

    ensure!(cli.passes > 0, "--passes must be at least 1");

    let summary = simulate(&cli);
    info!(
        passes = summary.passes,
        vblanks = summary.vblanks,
        gameplay_frames = summary.gameplay_frames,
        bank_switches = summary.bank_switches,
        corrupted_frames = summary.corrupted_frames,
        "simulation finished"
    );

    match summary.halt {
        Some(Halt::Reset) => Ok(()),
        Some(Halt::Crashed(err)) => bail!("main loop crashed: {err}"),
        None => {
            warn!("ran out of passes before the credits");
            Ok(())
        }
    }
}
