/// Discrete simulation time plus the work done so far in the current run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimClock {
    current_time: u32,
    executed: u32,
    total_burst: u32,
}

impl SimClock {
    pub fn new(total_burst: u32) -> Self {
        Self {
            current_time: 0,
            executed: 0,
            total_burst,
        }
    }

    pub fn current_time(&self) -> u32 {
        self.current_time
    }

    pub fn executed(&self) -> u32 {
        self.executed
    }

    pub fn total_burst(&self) -> u32 {
        self.total_burst
    }

    /// Records one tick of real work.
    pub fn advance(&mut self) {
        debug_assert!(self.executed < self.total_burst, "ran past the planned work");
        self.current_time += 1;
        self.executed += 1;
    }

    /// Records one tick in which no process could run.
    pub fn idle(&mut self) {
        self.current_time += 1;
    }

    /// Percentage of the run's work that has been executed. A run with no
    /// work at all is complete by definition.
    pub fn progress(&self) -> f64 {
        if self.total_burst == 0 {
            return 100.0;
        }
        self.executed as f64 / self.total_burst as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_reaches_exactly_one_hundred() {
        let mut clock = SimClock::new(7);
        let mut last = clock.progress();
        for _ in 0..7 {
            clock.advance();
            assert!(clock.progress() >= last);
            last = clock.progress();
        }
        assert_eq!(clock.progress(), 100.0);
        assert_eq!(clock.current_time(), 7);
    }

    #[test]
    fn idle_ticks_move_time_but_not_progress() {
        let mut clock = SimClock::new(2);
        clock.idle();
        clock.idle();
        assert_eq!(clock.current_time(), 2);
        assert_eq!(clock.executed(), 0);
        assert_eq!(clock.progress(), 0.0);
    }

    #[test]
    fn empty_run_is_vacuously_complete() {
        assert_eq!(SimClock::new(0).progress(), 100.0);
    }
}
