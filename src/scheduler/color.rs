use super::process::ProcessId;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProcessColor {
    #[default]
    Red,
    Blue,
    Green,
    Orange,
    Purple,
    Cyan,
    Pink,
    Brown,
    Lime,
    Magenta,
}

impl ProcessColor {
    pub fn name(self) -> &'static str {
        match self {
            ProcessColor::Red => "red",
            ProcessColor::Blue => "blue",
            ProcessColor::Green => "green",
            ProcessColor::Orange => "orange",
            ProcessColor::Purple => "purple",
            ProcessColor::Cyan => "cyan",
            ProcessColor::Pink => "pink",
            ProcessColor::Brown => "brown",
            ProcessColor::Lime => "lime",
            ProcessColor::Magenta => "magenta",
        }
    }
}

pub const DEFAULT_PALETTE: [ProcessColor; 10] = [
    ProcessColor::Red,
    ProcessColor::Blue,
    ProcessColor::Green,
    ProcessColor::Orange,
    ProcessColor::Purple,
    ProcessColor::Cyan,
    ProcessColor::Pink,
    ProcessColor::Brown,
    ProcessColor::Lime,
    ProcessColor::Magenta,
];

/// Colors handed out so far, keyed by process id.
///
/// A color is fixed the first time an id is seen and never changes for the
/// lifetime of the table. New ids walk the palette in order and wrap around
/// once it is exhausted.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    assigned: HashMap<ProcessId, ProcessColor>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ProcessId) -> Option<ProcessColor> {
        self.assigned.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }
}

/// Returns the table with `id` assigned, together with the color it maps to.
pub fn assign_color(
    mut table: ColorTable,
    palette: &[ProcessColor],
    id: ProcessId,
) -> (ColorTable, ProcessColor) {
    assert!(!palette.is_empty(), "color palette must not be empty");

    if let Some(color) = table.get(id) {
        return (table, color);
    }
    let color = palette[table.len() % palette.len()];
    table.assigned.insert(id, color);
    (table, color)
}
