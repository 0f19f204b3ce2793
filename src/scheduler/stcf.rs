use super::{Process, Scheduler, SimClock, Tick};
use log::{debug, trace};

/// Preemptive shortest-time-to-completion-first.
///
/// The choice is remade at every tick, so a shorter job that arrives while
/// another is running takes over at the next tick boundary.
pub struct StcfScheduler {
    processes: Vec<Process>,
    current_process: Option<usize>,
    clock: SimClock,
}

impl StcfScheduler {
    pub fn with_processes(processes: Vec<Process>) -> Self {
        Self {
            processes,
            current_process: None,
            clock: SimClock::default(),
        }
    }

    /// Index of the eligible process with the least remaining work. Ties go
    /// to the earlier arrival, then to the earlier position in the list.
    fn poll_process(&self) -> Option<usize> {
        let time = self.clock.current_time();
        self.processes
            .iter()
            .enumerate()
            .filter(|(_, process)| process.is_eligible(time))
            .min_by_key(|&(index, process)| (process.burst_time(), process.arrival(), index))
            .map(|(index, _)| index)
    }
}

impl Scheduler for StcfScheduler {
    const NAME: &'static str = "STCF Scheduler";

    fn processes(&self) -> &[Process] {
        &self.processes
    }

    fn into_processes(self) -> Vec<Process> {
        self.processes
    }

    fn plan(&mut self) {
        self.current_process = None;
        self.clock = SimClock::new(self.processes.iter().map(Process::burst_time).sum());
        debug!(
            "{} processes with {} ticks of work",
            self.processes.len(),
            self.clock.total_burst()
        );
    }

    fn step(&mut self) -> Option<Tick> {
        if self.is_complete() {
            return None;
        }

        let time = self.clock.current_time();
        let Some(index) = self.poll_process() else {
            trace!("idle at tick {}", time);
            self.current_process = None;
            self.clock.idle();
            return Some(Tick::Idle { time });
        };

        if let Some(previous) = self.current_process {
            if previous != index && !self.processes[previous].is_complete() {
                trace!(
                    "{} preempts {}",
                    self.processes[index].id(),
                    self.processes[previous].id()
                );
            }
        }

        let process = &mut self.processes[index];
        debug_assert!(process.is_eligible(time));
        process.run_tick();
        self.current_process = Some(index);
        self.clock.advance();

        Some(Tick::Executed {
            time,
            process: process.id(),
        })
    }

    fn is_complete(&self) -> bool {
        self.processes.iter().all(Process::is_complete)
    }

    fn clock(&self) -> &SimClock {
        &self.clock
    }

    fn current_process(&self) -> Option<&Process> {
        self.current_process
            .and_then(|index| self.processes.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ProcessId;

    fn process(number: u32, arrival: u32, burst: u32) -> Process {
        Process::new(ProcessId::new(number), arrival, burst)
    }

    fn run(processes: Vec<Process>) -> (StcfScheduler, Vec<Tick>) {
        let mut scheduler = StcfScheduler::with_processes(processes);
        scheduler.plan();
        let mut ticks = Vec::new();
        while let Some(tick) = scheduler.step() {
            ticks.push(tick);
        }
        (scheduler, ticks)
    }

    fn executed(ticks: &[Tick]) -> Vec<ProcessId> {
        ticks
            .iter()
            .filter_map(|tick| match tick {
                Tick::Executed { process, .. } => Some(*process),
                Tick::Idle { .. } => None,
            })
            .collect()
    }

    #[test]
    fn shorter_job_runs_first() {
        let (scheduler, ticks) = run(vec![process(1, 0, 4), process(2, 0, 2)]);
        let p1 = ProcessId::new(1);
        let p2 = ProcessId::new(2);

        assert_eq!(executed(&ticks), vec![p2, p2, p1, p1, p1, p1]);
        assert_eq!(scheduler.clock().executed(), 6);
        assert!(scheduler.is_complete());
    }

    #[test]
    fn equal_bursts_fall_back_to_list_order() {
        let (_, ticks) = run(vec![process(1, 0, 3), process(2, 0, 3)]);
        let order = executed(&ticks);
        assert_eq!(order[0], ProcessId::new(1));
        assert_eq!(&order[..3], &[ProcessId::new(1); 3]);
    }

    #[test]
    fn equal_bursts_prefer_the_earlier_arrival() {
        // P2 is listed first but arrives later; both have two ticks left at t=1.
        let (_, ticks) = run(vec![process(2, 1, 2), process(1, 0, 3)]);
        let p1 = ProcessId::new(1);
        let p2 = ProcessId::new(2);
        assert_eq!(executed(&ticks), vec![p1, p1, p1, p2, p2]);
    }

    #[test]
    fn late_shorter_arrival_preempts_the_running_job() {
        let (_, ticks) = run(vec![process(1, 0, 5), process(2, 3, 1)]);
        let p1 = ProcessId::new(1);
        let p2 = ProcessId::new(2);
        assert_eq!(executed(&ticks), vec![p1, p1, p1, p2, p1, p1]);
    }

    #[test]
    fn selection_is_recomputed_at_every_tick_boundary() {
        let p1 = ProcessId::new(1);
        let p2 = ProcessId::new(2);

        // At t=2 P1 has one tick left and P2 arrives with one; P1 arrived first.
        let (_, ticks) = run(vec![process(1, 0, 3), process(2, 2, 1)]);
        assert_eq!(executed(&ticks), vec![p1, p1, p1, p2]);

        // At t=2 P1 has two ticks left and P2 only one, so P2 takes over.
        let (_, ticks) = run(vec![process(1, 0, 4), process(2, 2, 1)]);
        assert_eq!(executed(&ticks), vec![p1, p1, p2, p1, p1]);

        // Already complete entries are never picked.
        let (_, ticks) = run(vec![process(1, 0, 0), process(2, 0, 1)]);
        assert_eq!(executed(&ticks), vec![p2]);
    }

    #[test]
    fn every_executed_tick_picks_the_shortest_eligible() {
        let processes = vec![
            process(4, 0, 6),
            process(2, 1, 3),
            process(5, 2, 7),
            process(1, 3, 1),
            process(3, 5, 2),
        ];
        let mut scheduler = StcfScheduler::with_processes(processes);
        scheduler.plan();

        loop {
            let time = scheduler.clock().current_time();
            let shortest = scheduler
                .processes()
                .iter()
                .filter(|process| process.is_eligible(time))
                .map(Process::burst_time)
                .min();
            let before = scheduler.processes().to_vec();

            match scheduler.step() {
                Some(Tick::Executed { process, .. }) => {
                    let chosen = before
                        .iter()
                        .find(|candidate| candidate.id() == process)
                        .unwrap();
                    assert!(chosen.is_eligible(time));
                    assert_eq!(Some(chosen.burst_time()), shortest);
                }
                Some(Tick::Idle { .. }) => assert_eq!(shortest, None),
                None => break,
            }
        }
        assert!(scheduler.processes().iter().all(Process::is_complete));
    }

    #[test]
    fn idles_until_the_first_arrival() {
        let (scheduler, ticks) = run(vec![process(1, 3, 2)]);
        assert_eq!(
            ticks,
            vec![
                Tick::Idle { time: 0 },
                Tick::Idle { time: 1 },
                Tick::Idle { time: 2 },
                Tick::Executed { time: 3, process: ProcessId::new(1) },
                Tick::Executed { time: 4, process: ProcessId::new(1) },
            ]
        );
        assert_eq!(scheduler.clock().current_time(), 5);
        assert_eq!(scheduler.clock().executed(), 2);
        assert_eq!(scheduler.clock().progress(), 100.0);
    }

    #[test]
    fn idles_in_a_gap_between_arrivals() {
        let (_, ticks) = run(vec![process(1, 0, 2), process(2, 4, 2)]);
        assert_eq!(ticks[2], Tick::Idle { time: 2 });
        assert_eq!(ticks[3], Tick::Idle { time: 3 });
        assert_eq!(executed(&ticks).len(), 4);
    }

    #[test]
    fn total_ticks_match_total_burst() {
        let processes = vec![
            process(1, 0, 5),
            process(2, 0, 2),
            process(3, 1, 7),
            process(4, 3, 4),
            process(5, 5, 3),
        ];
        let total: u32 = processes.iter().map(Process::initial_burst).sum();
        let (scheduler, ticks) = run(processes);

        assert_eq!(executed(&ticks).len() as u32, total);
        assert!(scheduler.processes().iter().all(Process::is_complete));
    }

    #[test]
    fn empty_set_completes_immediately() {
        let (scheduler, ticks) = run(Vec::new());
        assert!(ticks.is_empty());
        assert!(scheduler.is_complete());
        assert_eq!(scheduler.snapshot().execution_progress, 100.0);
        assert_eq!(scheduler.snapshot().current_time, 0);
    }
}
