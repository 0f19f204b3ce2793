use super::color::ProcessColor;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(u32);

impl ProcessId {
    pub fn new(number: u32) -> Self {
        Self(number)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    id: ProcessId,
    arrival: u32,
    burst_time: u32,
    initial_burst: u32,
    color: ProcessColor,
}

impl Process {
    pub fn new(id: ProcessId, arrival: u32, burst_time: u32) -> Self {
        Process::with_color(id, arrival, burst_time, ProcessColor::default())
    }

    pub fn with_color(id: ProcessId, arrival: u32, burst_time: u32, color: ProcessColor) -> Self {
        Self {
            id,
            arrival,
            burst_time,
            initial_burst: burst_time,
            color,
        }
    }

    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn arrival(&self) -> u32 {
        self.arrival
    }

    /// Remaining work, in ticks.
    pub fn burst_time(&self) -> u32 {
        self.burst_time
    }

    pub fn initial_burst(&self) -> u32 {
        self.initial_burst
    }

    pub fn color(&self) -> ProcessColor {
        self.color
    }

    pub fn is_complete(&self) -> bool {
        self.burst_time == 0
    }

    pub fn is_eligible(&self, time: u32) -> bool {
        self.arrival <= time && !self.is_complete()
    }

    /// Runs the process for a single tick.
    ///
    /// Panics if the process has no work left, since no engine may ever
    /// schedule a complete process.
    pub fn run_tick(&mut self) {
        assert!(
            !self.is_complete(),
            "{} was scheduled after completing",
            self.id
        );
        self.burst_time -= 1;
    }

    /// Share of the initial burst already executed, as a percentage.
    pub fn completion_percentage(&self) -> String {
        if self.initial_burst == 0 {
            return "100%".to_owned();
        }
        let done = self.initial_burst - self.burst_time;
        format!(
            "{}%",
            (done as f64 / self.initial_burst as f64 * 100.0).round()
        )
    }
}
