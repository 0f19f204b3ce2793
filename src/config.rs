use clap::{Parser, ValueEnum};
use log::warn;
use std::{num::NonZeroU32, ops::RangeInclusive, time::Duration};

pub const PROCESS_COUNT_RANGE: RangeInclusive<usize> = 1..=10;
pub const QUANTUM_RANGE: RangeInclusive<u32> = 1..=5;

const DEFAULT_PROCESS_COUNT: usize = 3;
const DEFAULT_QUANTUM: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    RoundRobin,
    Stcf,
}

impl Algorithm {
    pub fn toggled(self) -> Self {
        match self {
            Algorithm::RoundRobin => Algorithm::Stcf,
            Algorithm::Stcf => Algorithm::RoundRobin,
        }
    }
}

/// Visualize Round Robin and STCF CPU scheduling.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// Scheduling algorithm to simulate.
    #[arg(short, long, value_enum, default_value_t = Algorithm::RoundRobin)]
    pub algorithm: Algorithm,

    /// Number of processes to generate.
    #[arg(short = 'n', long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub processes: u8,

    /// Round Robin time quantum, in ticks.
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub quantum: u8,

    /// Real time per simulated tick, in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub tick_ms: u64,

    /// Seed for the process generator. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run a single simulation and print it instead of opening the terminal UI.
    #[arg(long)]
    pub headless: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    algorithm: Algorithm,
    num_processes: usize,
    quantum: NonZeroU32,
    tick_interval: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::RoundRobin,
            num_processes: DEFAULT_PROCESS_COUNT,
            quantum: NonZeroU32::MIN.saturating_add(DEFAULT_QUANTUM - 1),
            tick_interval: crate::scheduler::DEFAULT_TICK_RATE,
        }
    }
}

impl SimulationConfig {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn num_processes(&self) -> usize {
        self.num_processes
    }

    pub fn quantum(&self) -> NonZeroU32 {
        self.quantum
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    pub fn set_num_processes(&mut self, count: usize) {
        let clamped = count.clamp(*PROCESS_COUNT_RANGE.start(), *PROCESS_COUNT_RANGE.end());
        if clamped != count {
            warn!("process count {} clamped to {}", count, clamped);
        }
        self.num_processes = clamped;
    }

    pub fn set_quantum(&mut self, quantum: u32) {
        let clamped = quantum.clamp(*QUANTUM_RANGE.start(), *QUANTUM_RANGE.end());
        if clamped != quantum {
            warn!("time quantum {} clamped to {}", quantum, clamped);
        }
        self.quantum = NonZeroU32::MIN.saturating_add(clamped - 1);
    }

    pub fn set_tick_interval(&mut self, interval: Duration) {
        self.tick_interval = interval;
    }
}

impl From<&Args> for SimulationConfig {
    fn from(args: &Args) -> Self {
        let mut config = SimulationConfig::default();
        config.set_algorithm(args.algorithm);
        config.set_num_processes(args.processes.into());
        config.set_quantum(args.quantum.into());
        config.set_tick_interval(Duration::from_millis(args.tick_ms));
        config
    }
}
