use std::fs;
use std::io::{self, stdout, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::{cursor, terminal, ExecutableCommand};
use elevator_core::config::{DispatchStrategy, SystemConfig};
use elevator_core::export::{write_events_jsonl_file, write_snapshot_json};
use elevator_core::scenario::{run_scenario_with_hook, ScenarioParams};
use elevator_core::session_log::SessionLogger;
use elevator_core::system::ElevatorSystem;
use elevator_core::visualizer::{render, RenderOptions};
use log::LevelFilter;

mod logging;
mod script;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "elevator",
    about = "Zoned elevator bank simulator",
    long_about = "Drives the tick-based elevator dispatcher: random traffic runs,\n\
                  scripted command files, status rendering and config inspection."
)]
struct Cli {
    /// JSON building configuration; the 50-floor reference building when omitted
    #[arg(long, global = true, env = "ELEVATOR_CONFIG")]
    config: Option<PathBuf>,
    /// Write a timestamped session log into this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    /// Session logs to keep in the log directory
    #[arg(long, global = true, default_value_t = 10)]
    keep_logs: usize,
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run seeded random traffic
    Run(RunArgs),
    /// Apply a command file (`call F up|down`, `go E F`, `step N`, `emergency`, `resume`, `status`)
    Script {
        path: PathBuf,
        #[command(flatten)]
        export: ExportArgs,
    },
    /// Render the building before any traffic
    Status,
    /// Print the effective configuration as JSON
    Config,
}

#[derive(Args)]
struct RunArgs {
    #[arg(long, default_value_t = 200)]
    ticks: u64,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Chance of a new hall call each tick
    #[arg(long, default_value_t = 0.2)]
    call_probability: f64,
    /// Share of calls that are lobby up-calls
    #[arg(long, default_value_t = 0.5)]
    lobby_share: f64,
    /// Override the configured dispatch policy
    #[arg(long, value_enum)]
    dispatch: Option<DispatchArg>,
    /// Redraw the building after every tick
    #[arg(long)]
    live: bool,
    /// Delay between live frames
    #[arg(long, default_value_t = 100)]
    delay_ms: u64,
    #[command(flatten)]
    export: ExportArgs,
}

#[derive(Clone, Copy, ValueEnum)]
enum DispatchArg {
    ZonedScan,
    NearestCar,
}

impl From<DispatchArg> for DispatchStrategy {
    fn from(arg: DispatchArg) -> Self {
        match arg {
            DispatchArg::ZonedScan => DispatchStrategy::ZonedScan,
            DispatchArg::NearestCar => DispatchStrategy::NearestCar,
        }
    }
}

#[derive(Args)]
struct ExportArgs {
    /// Write all journaled events as JSON Lines
    #[arg(long)]
    export_events: Option<PathBuf>,
    /// Write the final snapshot as JSON
    #[arg(long)]
    export_snapshot: Option<PathBuf>,
}

// ── helpers ────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> anyhow::Result<SystemConfig> {
    match path {
        Some(path) => SystemConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display())),
        None => Ok(SystemConfig::default()),
    }
}

fn build_system(config: SystemConfig) -> anyhow::Result<ElevatorSystem> {
    let mut system = ElevatorSystem::new(config).context("invalid configuration")?;
    system.subscribe(Box::new(SessionLogger));
    Ok(system)
}

fn export(system: &mut ElevatorSystem, args: &ExportArgs) -> anyhow::Result<()> {
    if let Some(path) = &args.export_events {
        let dropped = system.journal().dropped();
        let events = system.drain_events();
        let written = write_events_jsonl_file(path, &events)
            .with_context(|| format!("writing events to {}", path.display()))?;
        println!("wrote {written} events to {}", path.display());
        if dropped > 0 {
            log::warn!("event journal overflowed; {dropped} oldest events were not exported");
        }
    }
    if let Some(path) = &args.export_snapshot {
        write_snapshot_json(path, &system.get_status())
            .with_context(|| format!("writing snapshot to {}", path.display()))?;
        println!("wrote snapshot to {}", path.display());
    }
    Ok(())
}

fn draw_frame(text: &str) -> io::Result<()> {
    let mut out = stdout();
    out.execute(terminal::Clear(terminal::ClearType::All))?;
    out.execute(cursor::MoveTo(0, 0))?;
    out.write_all(text.as_bytes())?;
    out.flush()
}

// ── commands ───────────────────────────────────────────────────────

fn run(config: SystemConfig, args: &RunArgs) -> anyhow::Result<()> {
    let config = match args.dispatch {
        Some(dispatch) => config.with_dispatch(dispatch.into()),
        None => config,
    };
    let mut system = build_system(config)?;
    log::info!("dispatch policy: {}", system.policy_name());
    let params = ScenarioParams::default()
        .with_ticks(args.ticks)
        .with_seed(args.seed)
        .with_call_probability(args.call_probability)
        .with_lobby_share(args.lobby_share);
    let options = RenderOptions::default();
    let delay = Duration::from_millis(args.delay_ms);

    let mut frame_error = None;
    let report = run_scenario_with_hook(&mut system, &params, |system| {
        if !args.live || frame_error.is_some() {
            return;
        }
        if let Err(err) = draw_frame(&render(&system.get_status(), &options)) {
            frame_error = Some(err);
            return;
        }
        thread::sleep(delay);
    });
    if let Some(err) = frame_error {
        return Err(err).context("drawing live view");
    }

    if !args.live {
        print!("{}", render(&system.get_status(), &options));
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!("{}", serde_json::to_string_pretty(&system.stats())?);
    export(&mut system, &args.export)
}

fn run_script_file(config: SystemConfig, path: &Path, args: &ExportArgs) -> anyhow::Result<()> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?;
    let commands =
        script::parse_script(&text).with_context(|| format!("parsing {}", path.display()))?;
    let mut system = build_system(config)?;

    let summary = script::run_script(&mut system, &commands, &mut stdout())?;
    println!(
        "{} accepted, {} rejected, {} ticks",
        summary.accepted, summary.rejected, summary.ticks
    );
    export(&mut system, args)
}

// ── main ───────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = logging::LogSettings {
        level: if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        dir: cli.log_dir.clone(),
        keep: cli.keep_logs,
        max_age: Duration::from_secs(7 * 24 * 60 * 60),
    };
    if let Some(path) = logging::init(&settings)? {
        eprintln!("session log: {}", path.display());
    }

    let config = load_config(cli.config.as_deref())?;
    match &cli.command {
        Commands::Run(args) => run(config, args),
        Commands::Script { path, export } => run_script_file(config, path, export),
        Commands::Status => {
            let system = build_system(config)?;
            print!("{}", render(&system.get_status(), &RenderOptions::default()));
            Ok(())
        }
        Commands::Config => {
            config.validate()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatch_of(args: &[&str]) -> Option<DispatchStrategy> {
        let cli = Cli::try_parse_from(args).expect("valid arguments");
        match cli.command {
            Commands::Run(run) => run.dispatch.map(DispatchStrategy::from),
            _ => panic!("expected the run command"),
        }
    }

    #[test]
    fn run_accepts_a_dispatch_override() {
        assert_eq!(
            dispatch_of(&["elevator", "run", "--dispatch", "nearest-car"]),
            Some(DispatchStrategy::NearestCar)
        );
        assert_eq!(
            dispatch_of(&["elevator", "run", "--dispatch", "zoned-scan"]),
            Some(DispatchStrategy::ZonedScan)
        );
        assert_eq!(dispatch_of(&["elevator", "run"]), None);
        assert!(Cli::try_parse_from(["elevator", "run", "--dispatch", "random"]).is_err());
    }
}
