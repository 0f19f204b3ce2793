use super::{runner::RunnerEvent, ProcessColor, Session};
use crate::config::Algorithm;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::{
    io::{self, Stdout},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, BorderType, Borders, Cell, Gauge, Paragraph, Row, Table},
    Terminal,
};

pub enum DisplayEvent {
    Input(KeyEvent),
    Tick,
}

/// How often the screen is redrawn, independent of the simulation speed.
pub const REFRESH_RATE: Duration = Duration::from_millis(50);

const BAR_FILLED: &str = "█";
const BAR_EMPTY: &str = "░";

pub fn terminal_color(color: ProcessColor) -> Color {
    match color {
        ProcessColor::Red => Color::Red,
        ProcessColor::Blue => Color::Blue,
        ProcessColor::Green => Color::Green,
        ProcessColor::Orange => Color::Rgb(255, 165, 0),
        ProcessColor::Purple => Color::Rgb(128, 0, 128),
        ProcessColor::Cyan => Color::Cyan,
        ProcessColor::Pink => Color::Rgb(255, 192, 203),
        ProcessColor::Brown => Color::Rgb(165, 42, 42),
        ProcessColor::Lime => Color::LightGreen,
        ProcessColor::Magenta => Color::Magenta,
    }
}

pub struct DisplayTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input_rx: Receiver<DisplayEvent>,
}

impl DisplayTerminal {
    pub fn new() -> Result<Self, io::Error> {
        crossterm::terminal::enable_raw_mode()?;

        // Set up the input handling thread
        let (input_tx, input_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = REFRESH_RATE
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        if let Ok(Event::Key(key)) = event::read() {
                            if input_tx.send(DisplayEvent::Input(key)).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => break,
                }

                if last_tick.elapsed() >= REFRESH_RATE {
                    if input_tx.send(DisplayEvent::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        // Set up the terminal-user-interface
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, input_rx })
    }

    pub fn draw<R>(&mut self, session: &Session<R>, status: &str) -> Result<(), io::Error> {
        let snapshot = session.snapshot();
        let config = session.config();
        let title = session.engine_name();

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Min(5),
                    Constraint::Length(4),
                ])
                .split(f.size());

            let running = snapshot
                .running
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_owned());
            let clock = Paragraph::new(format!(
                "Time: {} | Running: {} | {}",
                snapshot.current_time, running, status
            ))
            .style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::LightBlue),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Clock")
                    .border_type(BorderType::Rounded),
            );
            f.render_widget(clock, chunks[0]);

            let progress = Gauge::default()
                .block(Block::default().borders(Borders::ALL).title("Completion"))
                .gauge_style(Style::default().fg(Color::LightGreen))
                .ratio((snapshot.execution_progress / 100.0).clamp(0.0, 1.0))
                .label(format!("{:.1}%", snapshot.execution_progress));
            f.render_widget(progress, chunks[1]);

            let items = snapshot.processes.iter().map(|process| {
                let color = terminal_color(process.color());
                let done = (process.initial_burst() - process.burst_time()) as usize;
                let bar = Spans::from(vec![
                    Span::styled(BAR_FILLED.repeat(done), Style::default().fg(color)),
                    Span::styled(
                        BAR_EMPTY.repeat(process.burst_time() as usize),
                        Style::default().fg(color),
                    ),
                ]);
                let mut style = Style::default();
                if snapshot.running == Some(process.id()) && !process.is_complete() {
                    style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                }

                Row::new(vec![
                    Cell::from(process.id().to_string())
                        .style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
                    Cell::from("|"),
                    Cell::from(process.arrival().to_string()),
                    Cell::from("|"),
                    Cell::from(format!("{}/{}", process.burst_time(), process.initial_burst())),
                    Cell::from("|"),
                    Cell::from(bar),
                    Cell::from("|"),
                    Cell::from(process.completion_percentage()),
                ])
                .style(style)
            });

            let table = Table::new(items)
                .header(
                    Row::new(vec!["PID", "|", "Arrival", "|", "Burst", "|", "Work", "|", "Done"])
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .widths(&[
                    Constraint::Length(3),
                    Constraint::Length(1),
                    Constraint::Length(7),
                    Constraint::Length(1),
                    Constraint::Length(5),
                    Constraint::Length(1),
                    Constraint::Length(8),
                    Constraint::Length(1),
                    Constraint::Length(4),
                ])
                .block(Block::default().title(title).borders(Borders::ALL))
                .column_spacing(1);
            f.render_widget(table, chunks[2]);

            let quantum = match config.algorithm() {
                Algorithm::RoundRobin => config.quantum().to_string(),
                Algorithm::Stcf => "n/a".to_owned(),
            };
            let help = Paragraph::new(vec![
                Spans::from(format!(
                    "Processes: {} | Quantum: {} | Tick: {} ms",
                    config.num_processes(),
                    quantum,
                    config.tick_interval().as_millis()
                )),
                Spans::from(
                    "g generate | s start | c stop | a algorithm | +/- processes | ]/[ quantum | q quit",
                ),
            ])
            .block(Block::default().borders(Borders::ALL).title("Controls"));
            f.render_widget(help, chunks[3]);
        })?;

        Ok(())
    }

    pub fn get_input(&self) -> RunnerEvent {
        // Get the user's input and return a matching event
        let Ok(event) = self.input_rx.recv() else {
            return RunnerEvent::Quit;
        };

        if let DisplayEvent::Input(key) = event {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                match key.code {
                    KeyCode::Char('q') => return RunnerEvent::Quit,
                    KeyCode::Char('g') => return RunnerEvent::Generate,
                    KeyCode::Char('s') => return RunnerEvent::Start,
                    KeyCode::Char('c') => return RunnerEvent::Stop,
                    KeyCode::Char('a') => return RunnerEvent::ToggleAlgorithm,
                    KeyCode::Char('+') => return RunnerEvent::MoreProcesses,
                    KeyCode::Char('-') => return RunnerEvent::FewerProcesses,
                    KeyCode::Char(']') => return RunnerEvent::LongerQuantum,
                    KeyCode::Char('[') => return RunnerEvent::ShorterQuantum,
                    _ => {}
                };
            }
        }
        RunnerEvent::None
    }
}

impl Drop for DisplayTerminal {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::DEFAULT_PALETTE;

    #[test]
    fn palette_colors_map_to_distinct_terminal_colors() {
        let colors: Vec<_> = DEFAULT_PALETTE.iter().copied().map(terminal_color).collect();
        for (index, color) in colors.iter().enumerate() {
            assert!(!colors[index + 1..].contains(color));
        }
    }
}
