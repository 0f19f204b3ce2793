mod clock;
mod color;
mod display;
mod generator;
mod process;
mod round_robin;
mod runner;
mod session;
mod stcf;

use std::time::Duration;

pub use clock::SimClock;
pub use color::{ColorTable, ProcessColor, DEFAULT_PALETTE};
pub use generator::ProcessGenerator;
pub use process::{Process, ProcessId};
pub use round_robin::RoundRobinScheduler;
pub use runner::ProcessRunner;
pub use session::{Session, TickOutcome, TickToken};
pub use stcf::StcfScheduler;

/// Real time between two simulated ticks when nothing else is configured.
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(500);

/// What a single call to [`Scheduler::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// `process` ran during the tick that started at `time`.
    Executed { time: u32, process: ProcessId },
    /// Nothing was eligible; the clock moved without running anything.
    Idle { time: u32 },
}

/// Read-only view of an engine, handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub processes: Vec<Process>,
    pub current_time: u32,
    pub execution_progress: f64,
    pub running: Option<ProcessId>,
}

impl Snapshot {
    pub fn idle(processes: &[Process]) -> Self {
        Self {
            processes: processes.to_vec(),
            current_time: 0,
            execution_progress: 0.0,
            running: None,
        }
    }
}

pub trait Scheduler {
    const NAME: &'static str;

    fn processes(&self) -> &[Process];
    fn into_processes(self) -> Vec<Process>;
    fn plan(&mut self);
    /// Advances the simulation by one tick, or returns `None` once every
    /// process has finished.
    fn step(&mut self) -> Option<Tick>;
    fn is_complete(&self) -> bool;
    fn clock(&self) -> &SimClock;
    fn current_process(&self) -> Option<&Process>;

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            processes: self.processes().to_vec(),
            current_time: self.clock().current_time(),
            execution_progress: self.clock().progress(),
            running: self.current_process().map(Process::id),
        }
    }
}
