mod config;
mod scheduler;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Args, SimulationConfig};
use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use env_logger::Builder;
use rand::{rngs::StdRng, SeedableRng};
use scheduler::{ProcessRunner, Session, Tick, TickOutcome};
use std::{
    io::{self, Write},
    thread,
};

fn main() -> Result<()> {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    let args = Args::parse();
    let config = SimulationConfig::from(&args);
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut session = Session::new(config, rng);
    session.generate();

    if args.headless {
        return run_headless(session);
    }

    execute!(io::stdout(), Clear(ClearType::All)).context("failed to clear the screen")?;

    let mut runner = ProcessRunner::new(session)?;
    while runner.run()? {}
    drop(runner);

    execute!(io::stdout(), Clear(ClearType::All)).context("failed to clear the screen")?;
    Ok(())
}

/// Runs one simulation to completion and prints a line per tick.
fn run_headless(mut session: Session<StdRng>) -> Result<()> {
    let mut out = io::stdout().lock();
    let interval = session.config().tick_interval();

    writeln!(out, "{}", session.engine_name())?;
    for process in session.snapshot().processes {
        writeln!(
            out,
            "{:>3}  arrival {}  burst {}  {}",
            process.id().to_string(),
            process.arrival(),
            process.burst_time(),
            process.color().name()
        )?;
    }

    let Some(token) = session.start() else {
        return Ok(());
    };
    if session.is_finishing() {
        writeln!(out, "complete after 0 ticks (100.0%)")?;
        return Ok(());
    }
    loop {
        let outcome = session.tick(token);
        match outcome {
            TickOutcome::Advanced(tick) => {
                let progress = session.snapshot().execution_progress;
                match tick {
                    Tick::Executed { time, process } => {
                        writeln!(out, "t={:<3} {:>3}  {:>5.1}%", time, process.to_string(), progress)?
                    }
                    Tick::Idle { time } => writeln!(out, "t={:<3} idle  {:>5.1}%", time, progress)?,
                }
            }
            TickOutcome::Completed => {
                let snapshot = session.snapshot();
                writeln!(
                    out,
                    "complete after {} ticks ({:.1}%)",
                    snapshot.current_time, snapshot.execution_progress
                )?;
                // The completion pause only matters to an animated display.
                break;
            }
            _ => break,
        }
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }

    Ok(())
}
