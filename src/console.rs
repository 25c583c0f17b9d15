use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue, terminal,
};
use lifegrid::{
    Coord, GridWindow, PendingStep, Result, Simulation,
    config::{GRID_SIZE_PRESETS, STEP_INTERVAL_INCREMENT_MS},
};
use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

/// Lines reserved below the board for the status footer
const FOOTER_LINES: u16 = 2;
/// How far `[` and `]` move the randomize density
const DENSITY_INCREMENT: f64 = 0.05;

pub enum ConsoleCommand {
    Exit,
    Handled,
    /// The simulation was started and its first step is pending
    Schedule(PendingStep),
}

pub struct ConsoleRender {
    cursor: Coord,
    tl: Coord,
    report: String,
    notice: Option<String>,
}
impl ConsoleRender {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self {
            cursor: Coord::default(),
            tl: Coord::default(),
            report: String::new(),
            notice: None,
        })
    }

    /// Scrolls the view so the edit cursor stays on screen
    fn follow_cursor(&mut self, view_rows: usize, view_cols: usize) {
        if self.cursor.row < self.tl.row {
            self.tl.row = self.cursor.row;
        } else if view_rows > 0 && self.cursor.row >= self.tl.row + view_rows {
            self.tl.row = self.cursor.row + 1 - view_rows;
        }
        if self.cursor.col < self.tl.col {
            self.tl.col = self.cursor.col;
        } else if view_cols > 0 && self.cursor.col >= self.tl.col + view_cols {
            self.tl.col = self.cursor.col + 1 - view_cols;
        }
    }

    pub fn render(&mut self, sim: &Simulation) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let view_rows = rows.saturating_sub(FOOTER_LINES) as usize;
        self.follow_cursor(view_rows, cols as usize);

        let window = GridWindow::new(sim.grid(), self.tl, view_rows, cols as usize);
        let mut stdout = io::stdout();
        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
        // raw mode needs explicit positioning for every line
        for (y, line) in window.to_string().lines().enumerate() {
            queue!(stdout, cursor::MoveTo(0, y as u16))?;
            stdout.write_all(line.as_bytes())?;
        }

        // write footer
        let config = sim.config();
        let state = if sim.is_running() { "RUNNING" } else { "STOPPED" };
        let origin = window.top_left();
        let (shown_rows, shown_cols) = window.size();
        let status = format!(
            "{state} gen:{} size:{}x{} delay:{}ms density:{:.2} view:{},{}+{}x{} visible:{} | {}",
            sim.generation(),
            sim.grid().rows(),
            sim.grid().cols(),
            config.step_interval_ms(),
            config.live_probability(),
            origin.row,
            origin.col,
            shown_rows,
            shown_cols,
            window.iter().count(),
            self.notice.as_deref().unwrap_or(&self.report),
        );
        queue!(stdout, cursor::MoveTo(0, rows.saturating_sub(FOOTER_LINES)))?;
        stdout.write_all(status.as_bytes())?;
        queue!(stdout, cursor::MoveTo(0, rows.saturating_sub(1)))?;
        stdout.write_all(
            b"arrows move  space toggle  enter start/stop  n step  r random  c clear  1-4 size  +/- speed  [/] density  q quit",
        )?;

        // only show the edit cursor while the board can be edited
        if sim.is_running() {
            queue!(stdout, cursor::Hide)?;
        } else {
            let (dy, dx) = (self.cursor.row - self.tl.row, self.cursor.col - self.tl.col);
            queue!(stdout, cursor::MoveTo(dx as u16, dy as u16), cursor::Show)?;
        }

        stdout.flush()
    }

    /// Waits up to `timeout` for a key and applies it to `sim`
    pub fn poll_events(
        &mut self,
        sim: &mut Simulation,
        timeout: Duration,
    ) -> Result<Option<ConsoleCommand>> {
        // make sure event is present for us to take
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let event::Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event::read()?
        else {
            return Ok(Some(ConsoleCommand::Handled));
        };

        let (rows, cols) = (sim.grid().rows(), sim.grid().cols());
        let outcome = match code {
            // CTRL+C
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(Some(ConsoleCommand::Exit));
            }
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(ConsoleCommand::Exit)),
            // arrows to move the edit cursor
            KeyCode::Up => {
                self.cursor.row = self.cursor.row.saturating_sub(1);
                Ok(())
            }
            KeyCode::Down => {
                self.cursor.row = (self.cursor.row + 1).min(rows.saturating_sub(1));
                Ok(())
            }
            KeyCode::Left => {
                self.cursor.col = self.cursor.col.saturating_sub(1);
                Ok(())
            }
            KeyCode::Right => {
                self.cursor.col = (self.cursor.col + 1).min(cols.saturating_sub(1));
                Ok(())
            }
            KeyCode::Enter => {
                if let Some(pending) = sim.toggle_running(Instant::now()) {
                    self.notice = None;
                    return Ok(Some(ConsoleCommand::Schedule(pending)));
                }
                Ok(())
            }
            KeyCode::Char(' ') => sim.toggle(self.cursor),
            KeyCode::Char('n') => sim.step_once(),
            KeyCode::Char('r') => sim.randomize(),
            KeyCode::Char('c') => sim.clear(),
            KeyCode::Char(c @ '1'..='4') => {
                let size = GRID_SIZE_PRESETS[c as usize - '1' as usize];
                let result = sim.resize(size);
                if result.is_ok() {
                    self.cursor = Coord::default();
                    self.tl = Coord::default();
                }
                result
            }
            KeyCode::Char('+' | '=') => {
                sim.nudge_step_interval(-(STEP_INTERVAL_INCREMENT_MS as i64));
                Ok(())
            }
            KeyCode::Char('-') => {
                sim.nudge_step_interval(STEP_INTERVAL_INCREMENT_MS as i64);
                Ok(())
            }
            KeyCode::Char(c @ ('[' | ']')) => {
                let delta = if c == '[' { -DENSITY_INCREMENT } else { DENSITY_INCREMENT };
                let p = (sim.config().live_probability() + delta).clamp(0.0, 1.0);
                sim.set_live_probability(p)
            }
            _ => Ok(()),
        };

        // edits rejected by the simulation are shown in the footer
        self.notice = outcome.err().map(|e| e.to_string());
        Ok(Some(ConsoleCommand::Handled))
    }

    pub fn set_report(&mut self, report: String) {
        self.report = report;
    }
}
impl Drop for ConsoleRender {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("failed to disable raw mode: {e}");
        }
        if let Err(e) = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen) {
            log::error!("failed to restore terminal: {e}");
        }
    }
}
