use std::path::Path;
use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the elevator workspace",
    long_about = "A unified CLI for running demos, benchmarks, load tests,\n\
                  and CI checks in the elevator workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run random traffic on the reference building
    Run {
        #[arg(long, default_value_t = 500)]
        ticks: u64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Redraw the building after every tick
        #[arg(long)]
        live: bool,
    },
    /// Replay the scripted demos under demos/
    Demo,
    /// Run Criterion benchmarks
    Bench,
    /// Run the same seeded traffic under each dispatch policy
    CompareDispatch {
        #[arg(long, default_value_t = 1000)]
        ticks: u64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Run CI checks (fmt, clippy, tests, demos, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run load tests (ignored tests in elevator_core)
    LoadTest,
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Replay the scripted demos
    Demos,
    /// Run benchmarks
    Bench,
    /// Run check + demos + bench
    All,
}

const DEMO_DIR: &str = "demos";

// ── helpers ────────────────────────────────────────────────────────

const POLICIES: [&str; 2] = ["zoned-scan", "nearest-car"];

fn banner(label: &str) {
    eprintln!("\n=== {label} ===");
}

/// Runs cargo and exits with its status on failure.
fn cargo(args: &[&str]) {
    eprintln!("+ cargo {}", args.join(" "));
    match Command::new("cargo").args(args).status() {
        Ok(status) if status.success() => {}
        Ok(status) => exit(status.code().unwrap_or(1)),
        Err(err) => {
            eprintln!("cannot start cargo: {err}");
            exit(1);
        }
    }
}

/// Runs the `elevator` binary in release mode with `args`.
fn elevator(args: &[&str]) {
    let mut full = vec!["run", "-p", "elevator_cli", "--release", "--"];
    full.extend_from_slice(args);
    cargo(&full);
}

fn demo_scripts() -> Vec<String> {
    let entries = match std::fs::read_dir(Path::new(DEMO_DIR)) {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!("cannot read {DEMO_DIR}/: {err}");
            exit(1);
        }
    };
    let mut scripts: Vec<String> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .map(|path| path.display().to_string())
        .collect();
    scripts.sort();
    scripts
}

fn run_demos() {
    for script in demo_scripts() {
        banner(&format!("Replay {script}"));
        elevator(&["script", &script]);
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    banner("Check formatting");
    cargo(&["fmt", "--all", "--", "--check"]);

    banner("Clippy");
    cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    banner("Test elevator_core");
    cargo(&["test", "-p", "elevator_core"]);

    banner("Test elevator_cli");
    cargo(&["test", "-p", "elevator_cli"]);
}

fn ci_bench() {
    banner("Run benchmarks");
    cargo(&["bench", "--package", "elevator_core", "--bench", "performance"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { ticks, seed, live } => {
            let ticks = ticks.to_string();
            let seed = seed.to_string();
            let mut args = vec!["run", "--ticks", &ticks, "--seed", &seed];
            if live {
                args.push("--live");
            }
            elevator(&args);
        }
        Commands::Demo => run_demos(),
        Commands::Bench => ci_bench(),
        Commands::CompareDispatch { ticks, seed } => {
            let ticks = ticks.to_string();
            let seed = seed.to_string();
            for policy in POLICIES {
                banner(&format!("Dispatch policy {policy}"));
                elevator(&[
                    "run",
                    "--ticks",
                    &ticks,
                    "--seed",
                    &seed,
                    "--dispatch",
                    policy,
                ]);
            }
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Demos => run_demos(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    run_demos();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LoadTest => {
            cargo(&[
                "test",
                "-p",
                "elevator_core",
                "--test",
                "load_tests",
                "--",
                "--ignored",
            ]);
        }
    }
}
