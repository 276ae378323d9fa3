//! Rampart CLI - headless match runner.
//!
//! Loads a scenario, joins it as one player, replays a script of intents and
//! drives the match with a ticker until it is decided or the tick budget runs
//! out.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod script;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rampart_core::{BattleEvent, Game, GameResult, ScenarioConfig, Team, Ticker};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::script::Script;

/// Rampart - run a territorial conquest match headlessly
#[derive(Parser, Debug)]
#[command(name = "rampart")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario JSON file (default: built-in skirmish map)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Intent script JSON file
    #[arg(long)]
    script: Option<PathBuf>,

    /// Team of the local player
    #[arg(long, value_enum, default_value = "blue")]
    team: TeamArg,

    /// Name of the local player
    #[arg(long, default_value = "player1")]
    name: String,

    /// Ticks per second
    #[arg(long, default_value_t = rampart_core::constants::DEFAULT_TPS)]
    tps: u32,

    /// Stop after this many ticks even if the match is undecided
    #[arg(long, default_value = "36000")]
    max_ticks: u64,

    /// Pace ticks with the wall clock instead of running as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Print the final battlefield snapshot as JSON on stdout
    #[arg(long)]
    snapshot: bool,
}

/// Playable teams accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TeamArg {
    Red,
    Blue,
    Green,
    Magenta,
}

impl From<TeamArg> for Team {
    fn from(team: TeamArg) -> Self {
        match team {
            TeamArg::Red => Team::Red,
            TeamArg::Blue => Team::Blue,
            TeamArg::Green => Team::Green,
            TeamArg::Magenta => Team::Magenta,
        }
    }
}

/// Source of the timestamps fed to the ticker.
enum Clock {
    /// Timestamps derived from the tick counter: every poll is due.
    Simulated,
    /// Wall-clock seconds since the match started.
    Realtime(Instant),
}

impl Clock {
    fn now(&self, ticker: &Ticker) -> f64 {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Simulated => (ticker.tick() + 1) as f64 * ticker.interval(),
            Self::Realtime(start) => start.elapsed().as_secs_f64(),
        }
    }

    fn idle(&self, ticker: &Ticker) {
        if let Self::Realtime(_) = self {
            std::thread::sleep(Duration::from_secs_f64(ticker.interval() / 4.0));
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let scenario = match &args.scenario {
        Some(path) => ScenarioConfig::from_path(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        None => ScenarioConfig::default(),
    };
    let mut script = match &args.script {
        Some(path) => Script::from_path(path)?,
        None => Script::default(),
    };

    let mut game = Game::new(&args.name, args.team.into(), &scenario)?;
    let mut ticker = Ticker::new(args.tps);
    let clock = if args.realtime {
        Clock::Realtime(Instant::now())
    } else {
        Clock::Simulated
    };

    info!(
        buildings = scenario.buildings.len(),
        player = %args.name,
        team = %Team::from(args.team),
        tps = ticker.tps(),
        realtime = args.realtime,
        "Match starting"
    );

    ticker.start(0.0);
    while ticker.is_running() && ticker.tick() < args.max_ticks {
        for scripted in script.due(game.battlefield().tick()) {
            game.handle_intent(scripted.intent);
        }

        let Some(dt) = ticker.poll(clock.now(&ticker)) else {
            clock.idle(&ticker);
            continue;
        };
        for event in game.update(dt) {
            log_event(&event);
        }

        if game.result().is_terminal() {
            ticker.stop();
        }
    }

    report(&game, &ticker, script.remaining());

    if args.snapshot {
        let json = serde_json::to_string_pretty(&game.battlefield().snapshot())
            .context("failed to serialize snapshot")?;
        println!("{json}");
    }
    Ok(())
}

fn log_event(event: &BattleEvent) {
    match event {
        BattleEvent::TroopArrived {
            troop,
            to,
            team,
            outcome,
            ..
        } => debug!(%troop, building = %to, %team, %outcome, "Troop arrived"),
        BattleEvent::TroopDestroyed { troop, team } => {
            debug!(%troop, %team, "Troop destroyed");
        }
        BattleEvent::UpgradeCompleted { building, level } => {
            debug!(%building, %level, "Upgrade completed");
        }
        BattleEvent::ProjectileFired { .. } | BattleEvent::ProjectileResolved { .. } => {}
    }
}

fn report(game: &Game, ticker: &Ticker, unused_intents: usize) {
    let field = game.battlefield();
    let tally: Vec<String> = game
        .soldiers_per_team()
        .iter()
        .map(|(team, soldiers)| format!("{team}={soldiers}"))
        .collect();
    let outcome = match game.result() {
        GameResult::Ongoing => "undecided".to_owned(),
        GameResult::Victory { winner } => format!("victory for {winner}"),
        GameResult::Defeat => "defeat".to_owned(),
    };

    info!(
        ticks = ticker.tick(),
        troops = field.troops().count(),
        unused_intents,
        "Match finished"
    );
    eprintln!(
        "{outcome} after {} ticks ({})",
        field.tick(),
        tally.join(", ")
    );
}
