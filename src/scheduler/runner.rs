use super::{display::DisplayTerminal, Session, Tick, TickOutcome, TickToken};
use anyhow::{Context, Result};
use log::info;
use rand::Rng;
use std::time::Instant;

pub enum RunnerEvent {
    Quit,
    Generate,
    Start,
    Stop,
    ToggleAlgorithm,
    MoreProcesses,
    FewerProcesses,
    LongerQuantum,
    ShorterQuantum,
    None,
}

/// Drives a [`Session`] from a wall-clock timer and draws it to the terminal.
pub struct ProcessRunner<R> {
    terminal: DisplayTerminal,
    session: Session<R>,
    next_tick: Option<(Instant, TickToken)>,
    status: String,
}

impl<R: Rng> ProcessRunner<R> {
    pub fn new(session: Session<R>) -> Result<Self> {
        let terminal = DisplayTerminal::new().context("failed to set up the terminal")?;

        Ok(Self {
            terminal,
            session,
            next_tick: None,
            status: "Ready".to_owned(),
        })
    }

    fn deliver_due_tick(&mut self) {
        let Some((due, token)) = self.next_tick else {
            return;
        };
        let now = Instant::now();
        if now < due {
            return;
        }

        let outcome = self.session.tick(token);
        self.next_tick = outcome
            .wants_more()
            .then(|| (now + self.session.config().tick_interval(), token));

        match outcome {
            TickOutcome::Advanced(Tick::Idle { .. }) => self.status = "CPU idle".to_owned(),
            TickOutcome::Advanced(Tick::Executed { .. }) => self.status = "Running".to_owned(),
            TickOutcome::Completed => self.status = "Simulation complete".to_owned(),
            TickOutcome::Reset => self.status = "Ready".to_owned(),
            TickOutcome::Finishing | TickOutcome::Suppressed => {}
        }
    }

    fn handle(&mut self, event: RunnerEvent) {
        match event {
            RunnerEvent::Generate => {
                self.session.generate();
                self.next_tick = None;
                self.status = "Ready".to_owned();
            }
            RunnerEvent::Start => match self.session.start() {
                Some(token) => {
                    let due = Instant::now() + self.session.config().tick_interval();
                    self.next_tick = Some((due, token));
                    self.status = "Running".to_owned();
                }
                None => info!("start ignored while a run is active"),
            },
            RunnerEvent::Stop => {
                self.session.stop();
                self.next_tick = None;
                self.status = "Stopped".to_owned();
            }
            RunnerEvent::ToggleAlgorithm => {
                let config = self.session.config_mut();
                config.set_algorithm(config.algorithm().toggled());
            }
            RunnerEvent::MoreProcesses => {
                let config = self.session.config_mut();
                config.set_num_processes(config.num_processes() + 1);
            }
            RunnerEvent::FewerProcesses => {
                let config = self.session.config_mut();
                config.set_num_processes(config.num_processes() - 1);
            }
            RunnerEvent::LongerQuantum => {
                let config = self.session.config_mut();
                config.set_quantum(config.quantum().get() + 1);
            }
            RunnerEvent::ShorterQuantum => {
                let config = self.session.config_mut();
                config.set_quantum(config.quantum().get() - 1);
            }
            RunnerEvent::Quit | RunnerEvent::None => {}
        }
    }

    // Returns false if the program should quit
    pub fn run(&mut self) -> Result<bool> {
        self.deliver_due_tick();
        self.terminal
            .draw(&self.session, &self.status)
            .context("failed to draw frame")?;

        match self.terminal.get_input() {
            RunnerEvent::Quit => return Ok(false),
            event => self.handle(event),
        }
        Ok(true)
    }
}
