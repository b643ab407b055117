//! Application shell
//!
//! Owns the terminal surface, the palette, and the named panes, and drives
//! the single-threaded run loop: the focused pane runs to completion, its
//! outcome goes through command dispatch, dispatch names the next pane.
//! Resize notifications arrive as ordinary key events and are handled here
//! on behalf of whichever pane has focus.

mod commands;

use std::collections::HashMap;

use ratatui::widgets::Paragraph;
use tracing::{debug, info};

use crate::BibrError;
use crate::config::BibrConfig;
use crate::input::Key;
use crate::store::Library;
use crate::ui::{
    BrowseAction, BrowsePane, CommandPane, Flow, ModalState, Outcome, PaneLayout, Surface, Theme,
    detail,
};

pub use commands::Handler;

/// The named panes a command can hand focus to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneId {
    Browse,
    Command,
}

/// Where dispatch sends the shell next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Keep the current pane.
    Stay,
    /// Switch focus to the named pane.
    To(PaneId),
    /// Tear down and leave.
    Exit,
}

/// The application: panes, palette, layout, and the command table.
pub struct App {
    surface: Surface,
    theme: Theme,
    layout: PaneLayout,
    pub(crate) browse: BrowsePane,
    pub(crate) command: CommandPane,
    pub(crate) library: Library,
    pub(crate) search: String,
    pub(crate) output: String,
    active: PaneId,
    handlers: HashMap<&'static str, Handler>,
}

impl App {
    /// Build the shell: load the library, seed the panes and key tables,
    /// then take over the terminal.
    ///
    /// # Errors
    ///
    /// Fails when the library cannot be loaded, the palette is invalid, or
    /// the terminal cannot enter raw mode. The terminal is only touched
    /// last, so earlier failures report cleanly.
    pub fn new(cfg: &BibrConfig, library: Library) -> Result<Self, BibrError> {
        let mut theme = Theme::dark();
        theme.apply_overrides(&cfg.colors)?;

        let mut browse = BrowsePane::new(cfg.format.clone(), cfg.page_key_step);
        browse
            .bindings_mut()
            .bind(":", BrowseAction::Command("shell".to_string()));
        browse
            .bindings_mut()
            .bind("/", BrowseAction::Command("shell search ".to_string()));
        browse.bindings_mut().bind("q", BrowseAction::Quit);
        browse.bindings_mut().bind("o", BrowseAction::Open);

        let command = CommandPane::new(": ", cfg.history_max);

        let records = library.load()?;
        let output = format!(
            "{} ({} pdfs) bibtex entries loaded",
            records.len(),
            library.document_count()
        );
        browse.set_records(records);
        browse.ensure_subset();

        let surface = Surface::new()?;

        Ok(Self {
            surface,
            theme,
            layout: PaneLayout::new(cfg.split_size),
            browse,
            command,
            library,
            search: String::new(),
            output,
            active: PaneId::Browse,
            handlers: commands::registry(),
        })
    }

    /// Apply a search query before the run loop starts (the CLI's initial
    /// query). Parse errors land on the output line like any other search.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice; kept fallible to match dispatch.
    pub fn apply_search(&mut self, query: &str) -> Result<(), BibrError> {
        self.dispatch(&format!("search {query}"))?;
        Ok(())
    }

    /// Run until a handler or the interrupt key asks to exit, then restore
    /// the terminal. On error the terminal is restored before the error is
    /// handed back.
    ///
    /// # Errors
    ///
    /// Propagates store and terminal failures out of the loop.
    pub fn run(&mut self) -> Result<(), BibrError> {
        let (cols, rows) = self.surface.size()?;
        self.layout.resize(cols, rows);
        self.browse.set_viewport(self.layout.list_viewport());
        info!("entering run loop");

        let result = self.run_loop();
        let restore = self.surface.restore();
        result?;
        restore?;
        Ok(())
    }

    fn run_loop(&mut self) -> Result<(), BibrError> {
        loop {
            let outcome = self.run_active()?;
            let transition = match outcome {
                Outcome::Exit => Transition::Exit,
                Outcome::Command(line) => self.dispatch(&line)?,
            };
            match transition {
                Transition::Exit => {
                    info!("exiting");
                    return Ok(());
                }
                Transition::To(pane) => self.active = pane,
                Transition::Stay => {}
            }
        }
    }

    /// Drive the focused pane: read a key, dispatch it through the pane's
    /// action table, redraw, until the pane stops.
    fn run_active(&mut self) -> Result<Outcome, BibrError> {
        self.draw()?;
        loop {
            let key = self.surface.read_key();
            if key == Key::RESIZE {
                self.handle_resize()?;
                self.draw()?;
                continue;
            }

            let flow = match self.active {
                PaneId::Browse => self.browse.handle_key(&key),
                PaneId::Command => self.command.handle_key(&key),
            };
            self.draw()?;

            if let Flow::Stop(outcome) = flow {
                return Ok(outcome);
            }
        }
    }

    /// Split a submitted line into command and argument rest, and run the
    /// registered handler. Unknown commands are reported, not raised; an
    /// empty line returns to the list.
    fn dispatch(&mut self, line: &str) -> Result<Transition, BibrError> {
        let line = line.trim_start();
        if line.trim().is_empty() {
            return Ok(Transition::To(PaneId::Browse));
        }

        let (name, args) = match line.split_once(' ') {
            Some((name, rest)) => (name, rest),
            None => (line, ""),
        };

        let Some(handler) = self.handlers.get(name).copied() else {
            debug!(command = name, "unrecognized command");
            self.output = format!("Don't understand '{}'", line.trim_end());
            return Ok(Transition::To(PaneId::Browse));
        };

        debug!(command = name, args, "dispatch");
        handler(self, args)
    }

    /// Recompute the pane layout for new terminal dimensions. A resize
    /// event that changed nothing changes nothing here either.
    fn handle_resize(&mut self) -> Result<(), BibrError> {
        let (cols, rows) = self.surface.size()?;
        if self.layout.resize(cols, rows) {
            self.browse.set_viewport(self.layout.list_viewport());
            debug!(cols, rows, "layout recomputed");
        }
        Ok(())
    }

    /// Render every pane; the browse list and the detail pane always move
    /// together, and the cursor only shows while the command line has focus.
    fn draw(&mut self) -> Result<(), BibrError> {
        let Self {
            surface,
            theme,
            layout,
            browse,
            command,
            search,
            output,
            active,
            ..
        } = self;

        surface.draw(|frame| {
            frame.render_widget(
                Paragraph::new(format!(" {search}")).style(theme.search),
                layout.search,
            );
            frame.render_widget(
                Paragraph::new(output.as_str()).style(theme.output),
                layout.output,
            );
            browse.draw(frame, layout.list, theme);
            detail::draw(frame, layout.detail, browse.selected(), theme);
            command.draw(frame, layout.command, theme);

            if *active == PaneId::Command && command.cursor_visible() {
                frame.set_cursor_position(command.cursor_position(layout.command));
            }
        })?;
        Ok(())
    }
}
