//! Terminal surface
//!
//! The single owned handle to the process-wide screen state. Raw mode and
//! the alternate screen are entered on construction and left on
//! [`Surface::restore`]; the `Drop` impl restores as well, so a failure
//! unwinding past the run loop cannot leave the user's terminal raw.

use std::io::{self, Stdout};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::input::Key;
use crate::ui::error::Result;

/// Owned terminal handle; all drawing goes through here.
pub struct Surface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
}

impl Surface {
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error when the terminal cannot be put into raw mode.
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    /// Leave the alternate screen and cooked-mode the terminal. Safe to call
    /// more than once.
    ///
    /// # Errors
    ///
    /// Returns an error when the terminal state cannot be restored.
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        Ok(())
    }

    /// Current terminal dimensions as `(cols, rows)`.
    ///
    /// # Errors
    ///
    /// Returns an error when the size query fails.
    pub fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }

    /// Render one full frame.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend write fails.
    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// Block for the next normalized key.
    #[must_use]
    pub fn read_key(&self) -> Key {
        Key::read()
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
