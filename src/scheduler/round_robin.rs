use super::{Process, ProcessId, Scheduler, SimClock, Tick};
use log::{debug, trace};
use std::{collections::VecDeque, num::NonZeroU32};

/// A slice of CPU time committed to one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionUnit {
    pub process_id: ProcessId,
    pub execution_time: u32,
}

#[derive(Debug)]
struct ActiveUnit {
    unit: ExecutionUnit,
    process_index: usize,
    executed: u32,
}

impl ActiveUnit {
    fn is_exhausted(&self) -> bool {
        self.executed >= self.unit.execution_time
    }
}

/// Builds the full Round Robin plan up front.
///
/// Processes are visited in list order on every pass, each getting at most
/// `quantum` ticks, until no work is left. Arrival times are not consulted:
/// every process is treated as present from tick 0.
pub fn generate_execution_queue(
    processes: &[Process],
    quantum: NonZeroU32,
) -> VecDeque<ExecutionUnit> {
    let mut queue = VecDeque::new();
    let mut remaining: Vec<u32> = processes.iter().map(Process::burst_time).collect();

    while remaining.iter().any(|&burst| burst > 0) {
        for (process, burst) in processes.iter().zip(remaining.iter_mut()) {
            if *burst == 0 {
                continue;
            }
            let execution_time = quantum.get().min(*burst);
            queue.push_back(ExecutionUnit {
                process_id: process.id(),
                execution_time,
            });
            *burst -= execution_time;
        }
    }

    queue
}

pub struct RoundRobinScheduler {
    processes: Vec<Process>,
    quantum: NonZeroU32,
    queue: VecDeque<ExecutionUnit>,
    active: Option<ActiveUnit>,
    clock: SimClock,
}

impl RoundRobinScheduler {
    pub fn with_processes(processes: Vec<Process>, quantum: NonZeroU32) -> Self {
        Self {
            processes,
            quantum,
            queue: VecDeque::new(),
            active: None,
            clock: SimClock::default(),
        }
    }

    fn poll_unit(&mut self) -> Option<&mut ActiveUnit> {
        if self.active.as_ref().map_or(true, ActiveUnit::is_exhausted) {
            self.active = None;
            while let Some(unit) = self.queue.pop_front() {
                debug_assert!(unit.execution_time <= self.quantum.get());
                if unit.execution_time == 0 {
                    continue;
                }
                let process_index = self
                    .processes
                    .iter()
                    .position(|process| process.id() == unit.process_id)
                    .expect("execution unit refers to a process outside the plan");
                trace!("{} takes a {} tick slice", unit.process_id, unit.execution_time);
                self.active = Some(ActiveUnit {
                    unit,
                    process_index,
                    executed: 0,
                });
                break;
            }
        }
        self.active.as_mut()
    }
}

impl Scheduler for RoundRobinScheduler {
    const NAME: &'static str = "Round Robin Scheduler";

    fn processes(&self) -> &[Process] {
        &self.processes
    }

    fn into_processes(self) -> Vec<Process> {
        self.processes
    }

    fn plan(&mut self) {
        self.queue = generate_execution_queue(&self.processes, self.quantum);
        self.active = None;
        self.clock = SimClock::new(self.processes.iter().map(Process::burst_time).sum());
        debug!(
            "planned {} units with quantum {} for {} ticks of work",
            self.queue.len(),
            self.quantum,
            self.clock.total_burst()
        );
    }

    fn step(&mut self) -> Option<Tick> {
        let time = self.clock.current_time();
        let active = self.poll_unit()?;
        active.executed += 1;
        let index = active.process_index;

        let process = &mut self.processes[index];
        process.run_tick();
        self.clock.advance();

        Some(Tick::Executed {
            time,
            process: process.id(),
        })
    }

    fn is_complete(&self) -> bool {
        self.queue.is_empty() && self.active.as_ref().map_or(true, ActiveUnit::is_exhausted)
    }

    fn clock(&self) -> &SimClock {
        &self.clock
    }

    fn current_process(&self) -> Option<&Process> {
        self.active
            .as_ref()
            .and_then(|active| self.processes.get(active.process_index))
    }
}
