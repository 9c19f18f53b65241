//! Line-oriented command scripts for driving a dispatcher by hand.
//!
//! ```text
//! # comments and blank lines are ignored
//! call 12 down     # hall call
//! go 3 25          # car call inside elevator 3
//! step 10
//! emergency
//! resume
//! status
//! ```

use std::io::Write;

use anyhow::{anyhow, bail, Context};
use elevator_core::request::{Direction, ElevatorId};
use elevator_core::system::{CallOutcome, ElevatorSystem};
use elevator_core::visualizer::{render, RenderOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Call { floor: u32, direction: Direction },
    Go { elevator: ElevatorId, floor: u32 },
    Step(u64),
    Emergency,
    Resume,
    Status,
}

impl ScriptCommand {
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.split('#').next().unwrap_or_default().trim();
        let words: Vec<&str> = line.split_whitespace().collect();
        let command = match words.as_slice() {
            [] => return Ok(None),
            ["call", floor, direction] => ScriptCommand::Call {
                floor: number(floor, "floor")?,
                direction: direction.parse().map_err(|err: String| anyhow!(err))?,
            },
            ["go", elevator, floor] => ScriptCommand::Go {
                elevator: number(elevator, "elevator")?,
                floor: number(floor, "floor")?,
            },
            ["step"] => ScriptCommand::Step(1),
            ["step", ticks] => ScriptCommand::Step(number(ticks, "tick count")?),
            ["emergency"] => ScriptCommand::Emergency,
            ["resume"] => ScriptCommand::Resume,
            ["status"] => ScriptCommand::Status,
            _ => bail!("unrecognised command `{line}`"),
        };
        Ok(Some(command))
    }
}

fn number<T: std::str::FromStr>(word: &str, what: &str) -> anyhow::Result<T> {
    word.parse()
        .map_err(|_| anyhow!("expected a {what}, got `{word}`"))
}

pub fn parse_script(text: &str) -> anyhow::Result<Vec<ScriptCommand>> {
    let mut commands = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let parsed = ScriptCommand::parse(line).with_context(|| format!("line {}", index + 1))?;
        commands.extend(parsed);
    }
    Ok(commands)
}

/// Counts of what a script did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScriptSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub ticks: u64,
}

/// Applies `commands` in order. Rejected calls are reported and do not stop the script.
pub fn run_script<W: Write>(
    system: &mut ElevatorSystem,
    commands: &[ScriptCommand],
    out: &mut W,
) -> anyhow::Result<ScriptSummary> {
    let mut summary = ScriptSummary::default();
    for command in commands {
        match command {
            ScriptCommand::Call { floor, direction } => {
                match system.add_external_request(*floor, *direction) {
                    Ok(CallOutcome::Assigned { elevator, .. }) => {
                        summary.accepted += 1;
                        writeln!(out, "call F{floor} {direction}: assigned to E{elevator}")?;
                    }
                    Ok(CallOutcome::Queued(request)) => {
                        summary.accepted += 1;
                        writeln!(out, "call F{floor} {direction}: queued (seq {})", request.seq)?;
                    }
                    Ok(CallOutcome::AlreadyRequested) => {
                        writeln!(out, "call F{floor} {direction}: already requested")?;
                    }
                    Err(err) => {
                        summary.rejected += 1;
                        writeln!(out, "call F{floor} {direction}: rejected ({err})")?;
                    }
                }
            }
            ScriptCommand::Go { elevator, floor } => {
                match system.add_internal_request(*elevator, *floor) {
                    Ok(_) => {
                        summary.accepted += 1;
                        writeln!(out, "go E{elevator} F{floor}: accepted")?;
                    }
                    Err(err) => {
                        summary.rejected += 1;
                        writeln!(out, "go E{elevator} F{floor}: rejected ({err})")?;
                    }
                }
            }
            ScriptCommand::Step(ticks) => {
                for _ in 0..*ticks {
                    system.step();
                }
                summary.ticks += ticks;
            }
            ScriptCommand::Emergency => {
                system.emergency_stop();
                writeln!(out, "emergency stop")?;
            }
            ScriptCommand::Resume => {
                system.resume_service();
                writeln!(out, "service resumed")?;
            }
            ScriptCommand::Status => {
                write!(out, "{}", render(&system.get_status(), &RenderOptions::default()))?;
            }
        }
    }
    Ok(summary)
}
