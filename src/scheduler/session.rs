use super::{
    ColorTable, Process, ProcessColor, ProcessGenerator, RoundRobinScheduler, Scheduler, Snapshot,
    StcfScheduler, Tick, DEFAULT_PALETTE,
};
use crate::config::{Algorithm, SimulationConfig};
use log::{debug, info, trace};
use rand::Rng;

/// Driver ticks spent showing a finished run before the clock is cleared.
const RESET_DELAY_TICKS: u32 = 1;

/// Permission for a driver to deliver ticks to one particular run.
///
/// Stopping or restarting a session invalidates every token handed out
/// before, so ticks a timer had already scheduled do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced(Tick),
    /// The engine ran out of work on this tick.
    Completed,
    /// The post-run pause is still showing the finished state.
    Finishing,
    /// Clock and progress went back to zero; a new run may start.
    Reset,
    /// The token belongs to a run that is no longer active.
    Suppressed,
}

impl TickOutcome {
    /// Whether the driver should keep delivering ticks.
    pub fn wants_more(self) -> bool {
        !matches!(self, TickOutcome::Reset | TickOutcome::Suppressed)
    }
}

enum Engine {
    RoundRobin(RoundRobinScheduler),
    Stcf(StcfScheduler),
}

impl Engine {
    fn new(algorithm: Algorithm, processes: Vec<Process>, config: &SimulationConfig) -> Self {
        let mut engine = match algorithm {
            Algorithm::RoundRobin => {
                Engine::RoundRobin(RoundRobinScheduler::with_processes(processes, config.quantum()))
            }
            Algorithm::Stcf => Engine::Stcf(StcfScheduler::with_processes(processes)),
        };
        match &mut engine {
            Engine::RoundRobin(scheduler) => scheduler.plan(),
            Engine::Stcf(scheduler) => scheduler.plan(),
        }
        engine
    }

    fn name(&self) -> &'static str {
        match self {
            Engine::RoundRobin(_) => RoundRobinScheduler::NAME,
            Engine::Stcf(_) => StcfScheduler::NAME,
        }
    }

    fn step(&mut self) -> Option<Tick> {
        match self {
            Engine::RoundRobin(scheduler) => scheduler.step(),
            Engine::Stcf(scheduler) => scheduler.step(),
        }
    }

    fn is_complete(&self) -> bool {
        match self {
            Engine::RoundRobin(scheduler) => scheduler.is_complete(),
            Engine::Stcf(scheduler) => scheduler.is_complete(),
        }
    }

    fn snapshot(&self) -> Snapshot {
        match self {
            Engine::RoundRobin(scheduler) => scheduler.snapshot(),
            Engine::Stcf(scheduler) => scheduler.snapshot(),
        }
    }

    fn into_processes(self) -> Vec<Process> {
        match self {
            Engine::RoundRobin(scheduler) => scheduler.into_processes(),
            Engine::Stcf(scheduler) => scheduler.into_processes(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
    Finishing { ticks_left: u32 },
}

/// Owns the process set and the engine running over it.
///
/// The process list lives here while idle and is moved into the engine for
/// the length of a run, so only one writer ever exists.
pub struct Session<R> {
    config: SimulationConfig,
    generator: ProcessGenerator<R>,
    palette: Vec<ProcessColor>,
    colors: ColorTable,
    processes: Vec<Process>,
    engine: Option<Engine>,
    state: RunState,
    epoch: u64,
}

impl<R> Session<R> {
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SimulationConfig {
        &mut self.config
    }

    pub fn is_running(&self) -> bool {
        self.state != RunState::Idle
    }

    pub fn is_finishing(&self) -> bool {
        matches!(self.state, RunState::Finishing { .. })
    }

    /// Name of the engine shown to the user: the active one during a run,
    /// otherwise the configured one.
    pub fn engine_name(&self) -> &'static str {
        match (&self.engine, self.config.algorithm()) {
            (Some(engine), _) => engine.name(),
            (None, Algorithm::RoundRobin) => RoundRobinScheduler::NAME,
            (None, Algorithm::Stcf) => StcfScheduler::NAME,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        match &self.engine {
            Some(engine) => engine.snapshot(),
            None => Snapshot::idle(&self.processes),
        }
    }
}

impl<R: Rng> Session<R> {
    pub fn new(config: SimulationConfig, rng: R) -> Self {
        Self {
            config,
            generator: ProcessGenerator::new(rng),
            palette: DEFAULT_PALETTE.to_vec(),
            colors: ColorTable::new(),
            processes: Vec::new(),
            engine: None,
            state: RunState::Idle,
            epoch: 0,
        }
    }

    /// Replaces the process set without generating one.
    pub fn with_processes(mut self, processes: Vec<Process>) -> Self {
        self.processes = processes;
        self
    }

    /// Throws away any run in progress and draws a fresh process set.
    pub fn generate(&mut self) {
        self.stop();
        let colors = std::mem::take(&mut self.colors);
        let (processes, colors) =
            self.generator
                .generate(self.config.num_processes(), colors, &self.palette);
        self.colors = colors;
        self.processes = processes;
        info!("generated {} processes", self.processes.len());
    }

    /// Begins a run over the current process set. Does nothing while a run or
    /// its completion pause is still active.
    pub fn start(&mut self) -> Option<TickToken> {
        if self.is_running() {
            debug!("start ignored, a run is already active");
            return None;
        }

        let processes = std::mem::take(&mut self.processes);
        let engine = Engine::new(self.config.algorithm(), processes, &self.config);
        info!("starting {}", engine.name());

        self.state = if engine.is_complete() {
            info!("{} complete, nothing to run", engine.name());
            RunState::Finishing {
                ticks_left: RESET_DELAY_TICKS,
            }
        } else {
            RunState::Running
        };
        self.engine = Some(engine);
        self.epoch += 1;
        Some(TickToken(self.epoch))
    }

    /// Ends the current run at this tick boundary. Ticks issued for it are
    /// suppressed from now on.
    pub fn stop(&mut self) {
        self.epoch += 1;
        if self.state != RunState::Idle {
            debug!("run stopped");
        }
        self.reset();
    }

    /// Delivers one driver tick.
    pub fn tick(&mut self, token: TickToken) -> TickOutcome {
        if token.0 != self.epoch {
            trace!("suppressed stale tick");
            return TickOutcome::Suppressed;
        }

        match self.state {
            RunState::Idle => TickOutcome::Suppressed,
            RunState::Running => {
                let Some(engine) = self.engine.as_mut() else {
                    self.state = RunState::Idle;
                    return TickOutcome::Suppressed;
                };
                match engine.step() {
                    Some(tick) => {
                        trace!("{:?}", tick);
                        TickOutcome::Advanced(tick)
                    }
                    None => {
                        let snapshot = engine.snapshot();
                        info!(
                            "{} complete after {} ticks",
                            engine.name(),
                            snapshot.current_time
                        );
                        self.state = RunState::Finishing {
                            ticks_left: RESET_DELAY_TICKS,
                        };
                        TickOutcome::Completed
                    }
                }
            }
            RunState::Finishing { ticks_left } if ticks_left > 1 => {
                self.state = RunState::Finishing {
                    ticks_left: ticks_left - 1,
                };
                TickOutcome::Finishing
            }
            RunState::Finishing { .. } => {
                self.reset();
                TickOutcome::Reset
            }
        }
    }

    fn reset(&mut self) {
        if let Some(engine) = self.engine.take() {
            self.processes = engine.into_processes();
        }
        self.state = RunState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ProcessId;
    use rand::{rngs::StdRng, SeedableRng};

    fn session(algorithm: Algorithm) -> Session<StdRng> {
        let mut config = SimulationConfig::default();
        config.set_algorithm(algorithm);
        config.set_quantum(2);
        Session::new(config, StdRng::seed_from_u64(11)).with_processes(vec![
            Process::new(ProcessId::new(1), 0, 4),
            Process::new(ProcessId::new(2), 0, 2),
        ])
    }

    fn drive(session: &mut Session<StdRng>, token: TickToken) -> Vec<TickOutcome> {
        let mut outcomes = Vec::new();
        loop {
            let outcome = session.tick(token);
            outcomes.push(outcome);
            if !outcome.wants_more() {
                return outcomes;
            }
        }
    }

    fn executed(outcomes: &[TickOutcome]) -> Vec<ProcessId> {
        outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                TickOutcome::Advanced(Tick::Executed { process, .. }) => Some(*process),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn round_robin_run_completes_then_resets() {
        let mut session = session(Algorithm::RoundRobin);
        let token = session.start().unwrap();
        let outcomes = drive(&mut session, token);

        let p1 = ProcessId::new(1);
        let p2 = ProcessId::new(2);
        assert_eq!(executed(&outcomes), vec![p1, p1, p2, p2, p1, p1]);
        assert_eq!(
            &outcomes[outcomes.len() - 2..],
            &[TickOutcome::Completed, TickOutcome::Reset]
        );

        let snapshot = session.snapshot();
        assert_eq!(snapshot.current_time, 0);
        assert_eq!(snapshot.execution_progress, 0.0);
        assert!(snapshot.processes.iter().all(Process::is_complete));
        assert!(!session.is_running());
    }

    #[test]
    fn stcf_run_executes_the_short_job_first() {
        let mut session = session(Algorithm::Stcf);
        let token = session.start().unwrap();
        let outcomes = drive(&mut session, token);

        let p1 = ProcessId::new(1);
        let p2 = ProcessId::new(2);
        assert_eq!(executed(&outcomes), vec![p2, p2, p1, p1, p1, p1]);
    }

    #[test]
    fn completion_holds_the_final_state_for_the_pause() {
        let mut session = session(Algorithm::RoundRobin);
        let token = session.start().unwrap();
        for _ in 0..6 {
            assert!(matches!(session.tick(token), TickOutcome::Advanced(_)));
        }
        assert_eq!(session.tick(token), TickOutcome::Completed);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.execution_progress, 100.0);
        assert_eq!(snapshot.current_time, 6);
        assert!(session.is_finishing());

        assert_eq!(session.start(), None);
        assert_eq!(session.tick(token), TickOutcome::Reset);
        assert!(session.start().is_some());
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let mut session = session(Algorithm::RoundRobin);
        let token = session.start().unwrap();
        session.tick(token);

        assert_eq!(session.start(), None);
        assert_eq!(session.snapshot().current_time, 1);
        assert!(matches!(session.tick(token), TickOutcome::Advanced(_)));
    }

    #[test]
    fn stale_ticks_are_suppressed_after_stop() {
        let mut session = session(Algorithm::Stcf);
        let token = session.start().unwrap();
        session.tick(token);
        session.tick(token);
        session.stop();

        let before = session.snapshot();
        assert_eq!(session.tick(token), TickOutcome::Suppressed);
        assert_eq!(session.snapshot(), before);
        assert!(!session.is_running());
        // Work done before the stop is kept on the process set.
        assert_eq!(before.processes[1].burst_time(), 0);
    }

    #[test]
    fn tokens_from_an_earlier_run_do_not_drive_a_new_one() {
        let mut session = session(Algorithm::RoundRobin);
        let old = session.start().unwrap();
        session.stop();
        let new = session.start().unwrap();

        assert_ne!(old, new);
        assert_eq!(session.tick(old), TickOutcome::Suppressed);
        assert_eq!(session.snapshot().current_time, 0);
        assert!(matches!(session.tick(new), TickOutcome::Advanced(_)));
    }

    #[test]
    fn empty_set_completes_immediately() {
        let mut session = session(Algorithm::Stcf).with_processes(Vec::new());
        let token = session.start().unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.execution_progress, 100.0);
        assert_eq!(snapshot.current_time, 0);
        assert!(session.is_finishing());
        assert_eq!(drive(&mut session, token), vec![TickOutcome::Reset]);
    }

    #[test]
    fn generate_replaces_the_set_and_cancels_the_run() {
        let mut session = session(Algorithm::RoundRobin);
        session.config_mut().set_num_processes(6);
        let token = session.start().unwrap();
        session.tick(token);

        session.generate();
        assert!(!session.is_running());
        assert_eq!(session.tick(token), TickOutcome::Suppressed);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.processes.len(), 6);
        assert_eq!(snapshot.current_time, 0);
        assert!(snapshot
            .processes
            .iter()
            .all(|process| process.burst_time() == process.initial_burst()));
    }

    #[test]
    fn generated_runs_execute_the_total_burst() {
        for algorithm in [Algorithm::RoundRobin, Algorithm::Stcf] {
            let mut session = session(algorithm);
            session.config_mut().set_num_processes(10);
            session.generate();
            let total: u32 = session
                .snapshot()
                .processes
                .iter()
                .map(Process::initial_burst)
                .sum();

            let token = session.start().unwrap();
            let outcomes = drive(&mut session, token);
            assert_eq!(executed(&outcomes).len() as u32, total);
            assert!(session
                .snapshot()
                .processes
                .iter()
                .all(Process::is_complete));
        }
    }

    #[test]
    fn engine_name_follows_the_config_while_idle() {
        let mut session = session(Algorithm::RoundRobin);
        assert_eq!(session.engine_name(), RoundRobinScheduler::NAME);

        session.start();
        session.config_mut().set_algorithm(Algorithm::Stcf);
        assert_eq!(session.engine_name(), RoundRobinScheduler::NAME);

        session.stop();
        assert_eq!(session.engine_name(), StcfScheduler::NAME);
    }
}
