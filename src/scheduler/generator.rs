use super::{
    color::{assign_color, ColorTable, ProcessColor},
    process::{Process, ProcessId},
};
use rand::Rng;
use std::ops::Range;

pub const ARRIVAL_RANGE: Range<u32> = 0..6;
pub const BURST_RANGE: Range<u32> = 2..8;

/// Produces random process sets, sorted by arrival.
pub struct ProcessGenerator<R> {
    rng: R,
}

impl<R: Rng> ProcessGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Creates `count` processes named `P1..Pn` in creation order, then sorts
    /// them by arrival. The sort is stable, so processes arriving on the same
    /// tick stay in creation order.
    pub fn generate(
        &mut self,
        count: usize,
        mut colors: ColorTable,
        palette: &[ProcessColor],
    ) -> (Vec<Process>, ColorTable) {
        let mut processes = Vec::with_capacity(count);

        for number in 1..=count as u32 {
            let id = ProcessId::new(number);
            let (table, color) = assign_color(colors, palette, id);
            colors = table;

            let arrival = self.rng.random_range(ARRIVAL_RANGE);
            let burst_time = self.rng.random_range(BURST_RANGE);
            processes.push(Process::with_color(id, arrival, burst_time, color));
        }

        processes.sort_by_key(|process| process.arrival());
        (processes, colors)
    }
}
