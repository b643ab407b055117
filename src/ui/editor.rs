//! Command line editor
//!
//! Single-line input with a prompt prefix, cursor movement, and a
//! most-recent-first history. History slot 0 is the not-yet-submitted
//! buffer: it is stashed when the user starts cycling and restored when the
//! cycle wraps back around.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::input::Key;
use crate::ui::modal::{Flow, KeyBindings, ModalState, Outcome};
use crate::ui::theme::Theme;

/// Actions available in the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    HistoryPrev,
    HistoryNext,
    Left,
    Right,
    Home,
    End,
    Backspace,
    Delete,
    Submit,
    Cancel,
    Interrupt,
}

/// The single-line command editor pane.
#[derive(Debug)]
pub struct CommandPane {
    prompt: String,
    buffer: String,
    cursor: usize,
    history: Vec<String>,
    history_id: usize,
    history_max: Option<usize>,
    stash: String,
    bindings: KeyBindings<EditorAction>,
}

impl CommandPane {
    /// Create an editor with the default key table seeded.
    #[must_use]
    pub fn new(prompt: impl Into<String>, history_max: Option<usize>) -> Self {
        let mut bindings = KeyBindings::new();
        bindings.bind(Key::UP, EditorAction::HistoryPrev);
        bindings.bind(Key::DOWN, EditorAction::HistoryNext);
        bindings.bind(Key::LEFT, EditorAction::Left);
        bindings.bind(Key::RIGHT, EditorAction::Right);
        bindings.bind(Key::HOME, EditorAction::Home);
        bindings.bind(Key::END, EditorAction::End);
        bindings.bind(Key::BACKSPACE, EditorAction::Backspace);
        bindings.bind(Key::DELETE, EditorAction::Delete);
        bindings.bind(Key::RETURN, EditorAction::Submit);
        bindings.bind(Key::ESCAPE, EditorAction::Cancel);
        bindings.bind(Key::INTERRUPT, EditorAction::Interrupt);

        Self {
            prompt: prompt.into(),
            buffer: String::new(),
            cursor: 0,
            history: Vec::new(),
            history_id: 0,
            history_max,
            stash: String::new(),
            bindings,
        }
    }

    /// Current buffer content.
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Submitted lines, most recent first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Preload the buffer (the `shell <text>` command) with the cursor at
    /// the end.
    pub fn prefill(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.chars().count();
        self.history_id = 0;
    }

    fn byte_index(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor)
            .map_or(self.buffer.len(), |(i, _)| i)
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_index();
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index();
        let prev = self.buffer[..at]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i);
        self.buffer.remove(prev);
        self.cursor -= 1;
    }

    fn delete(&mut self) {
        let at = self.byte_index();
        if at < self.buffer.len() {
            self.buffer.remove(at);
        }
    }

    /// Load the history slot under `history_id` into the buffer, stashing or
    /// restoring the in-progress line as slot 0.
    fn load_history(&mut self, leaving_zero: bool) {
        if leaving_zero {
            self.stash = std::mem::take(&mut self.buffer);
        }
        self.buffer = if self.history_id == 0 {
            std::mem::take(&mut self.stash)
        } else {
            self.history[self.history_id - 1].clone()
        };
        self.cursor = self.buffer.chars().count();
    }

    fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let slots = self.history.len() + 1;
        let leaving_zero = self.history_id == 0;
        self.history_id = (self.history_id + 1) % slots;
        self.load_history(leaving_zero);
    }

    fn history_next(&mut self) {
        if self.history_id == 0 {
            return;
        }
        self.history_id -= 1;
        self.load_history(false);
    }

    fn submit(&mut self) -> String {
        let text = self.buffer.trim().to_string();
        self.history.insert(0, text.clone());
        if let Some(max) = self.history_max {
            self.history.truncate(max);
        }
        self.buffer.clear();
        self.stash.clear();
        self.cursor = 0;
        self.history_id = 0;
        text
    }

    fn cancel(&mut self) {
        self.buffer.clear();
        self.stash.clear();
        self.cursor = 0;
        self.history_id = 0;
    }

    /// Draw the bordered command box.
    pub fn draw(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let width = inner.width as usize;
        let visible: String = self
            .buffer
            .chars()
            .take(width.saturating_sub(self.prompt.chars().count()))
            .collect();
        let line = Line::from(vec![
            Span::styled(self.prompt.clone(), theme.prompt),
            Span::styled(visible, theme.command),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }

    /// Where the terminal cursor belongs while this pane has focus.
    #[must_use]
    pub fn cursor_position(&self, area: Rect) -> Position {
        let col = self.prompt.chars().count() + self.cursor;
        let max = area.width.saturating_sub(2);
        #[allow(clippy::cast_possible_truncation)]
        let col = (col as u16).min(max.saturating_sub(1));
        Position::new(area.x + 1 + col, area.y + 1)
    }
}

impl ModalState for CommandPane {
    type Action = EditorAction;

    fn bindings(&self) -> &KeyBindings<EditorAction> {
        &self.bindings
    }

    fn bindings_mut(&mut self) -> &mut KeyBindings<EditorAction> {
        &mut self.bindings
    }

    fn cursor_visible(&self) -> bool {
        true
    }

    fn apply(&mut self, action: EditorAction) -> Flow {
        match action {
            EditorAction::HistoryPrev => {
                self.history_prev();
                Flow::Continue
            }
            EditorAction::HistoryNext => {
                self.history_next();
                Flow::Continue
            }
            EditorAction::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                Flow::Continue
            }
            EditorAction::Right => {
                let len = self.buffer.chars().count();
                if self.cursor < len {
                    self.cursor += 1;
                }
                Flow::Continue
            }
            EditorAction::Home => {
                self.cursor = 0;
                Flow::Continue
            }
            EditorAction::End => {
                self.cursor = self.buffer.chars().count();
                Flow::Continue
            }
            EditorAction::Backspace => {
                self.backspace();
                Flow::Continue
            }
            EditorAction::Delete => {
                self.delete();
                Flow::Continue
            }
            EditorAction::Submit => Flow::Stop(Outcome::Command(self.submit())),
            EditorAction::Cancel => {
                self.cancel();
                Flow::Stop(Outcome::Command(String::new()))
            }
            EditorAction::Interrupt => Flow::Stop(Outcome::Exit),
        }
    }

    fn fallback(&mut self, key: &Key) -> Flow {
        if !key.is_special() {
            for c in key.value().chars() {
                self.insert_char(c);
            }
        }
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(pane: &mut CommandPane, text: &str) {
        for c in text.chars() {
            pane.fallback(&Key::plain(c.to_string()));
        }
    }

    fn submit_line(pane: &mut CommandPane, text: &str) -> Flow {
        type_text(pane, text);
        pane.apply(EditorAction::Submit)
    }

    #[test]
    fn test_submit_trims_and_records_history() {
        let mut pane = CommandPane::new(": ", None);
        let flow = submit_line(&mut pane, "  search year=2021  ");
        assert_eq!(
            flow,
            Flow::Stop(Outcome::Command("search year=2021".to_string()))
        );
        assert_eq!(pane.history(), &["search year=2021"]);
        assert_eq!(pane.buffer(), "");
    }

    #[test]
    fn test_history_cycling_reaches_second_most_recent() {
        let mut pane = CommandPane::new(": ", None);
        submit_line(&mut pane, "x");
        submit_line(&mut pane, "y");
        submit_line(&mut pane, "z");

        pane.apply(EditorAction::HistoryPrev);
        pane.apply(EditorAction::HistoryPrev);
        pane.apply(EditorAction::HistoryPrev);
        pane.apply(EditorAction::HistoryNext);
        assert_eq!(pane.buffer(), "y");
    }

    #[test]
    fn test_history_wraps_modulo_len_plus_one() {
        let mut pane = CommandPane::new(": ", None);
        submit_line(&mut pane, "a");
        submit_line(&mut pane, "b");

        // Three slots (current, "b", "a"); three steps up wraps to current.
        pane.apply(EditorAction::HistoryPrev);
        assert_eq!(pane.buffer(), "b");
        pane.apply(EditorAction::HistoryPrev);
        assert_eq!(pane.buffer(), "a");
        pane.apply(EditorAction::HistoryPrev);
        assert_eq!(pane.buffer(), "");
    }

    #[test]
    fn test_unsubmitted_line_survives_cycling() {
        let mut pane = CommandPane::new(": ", None);
        submit_line(&mut pane, "old");
        type_text(&mut pane, "draft");

        pane.apply(EditorAction::HistoryPrev);
        assert_eq!(pane.buffer(), "old");
        pane.apply(EditorAction::HistoryNext);
        assert_eq!(pane.buffer(), "draft");
    }

    #[test]
    fn test_history_prev_with_no_history_keeps_buffer() {
        let mut pane = CommandPane::new(": ", None);
        type_text(&mut pane, "draft");
        pane.apply(EditorAction::HistoryPrev);
        assert_eq!(pane.buffer(), "draft");
    }

    #[test]
    fn test_history_next_clamps_at_current() {
        let mut pane = CommandPane::new(": ", None);
        submit_line(&mut pane, "a");
        pane.apply(EditorAction::HistoryNext);
        assert_eq!(pane.buffer(), "");
    }

    #[test]
    fn test_history_max_drops_oldest() {
        let mut pane = CommandPane::new(": ", Some(2));
        submit_line(&mut pane, "one");
        submit_line(&mut pane, "two");
        submit_line(&mut pane, "three");
        assert_eq!(pane.history(), &["three", "two"]);
    }

    #[test]
    fn test_cursor_editing() {
        let mut pane = CommandPane::new(": ", None);
        type_text(&mut pane, "lod");

        pane.apply(EditorAction::Left);
        pane.fallback(&Key::plain("a"));
        assert_eq!(pane.buffer(), "load");

        pane.apply(EditorAction::Home);
        pane.apply(EditorAction::Delete);
        assert_eq!(pane.buffer(), "oad");

        pane.apply(EditorAction::End);
        pane.apply(EditorAction::Backspace);
        assert_eq!(pane.buffer(), "oa");

        // Backspace at the start column is a no-op.
        pane.apply(EditorAction::Home);
        pane.apply(EditorAction::Backspace);
        assert_eq!(pane.buffer(), "oa");
    }

    #[test]
    fn test_cancel_yields_empty_command() {
        let mut pane = CommandPane::new(": ", None);
        type_text(&mut pane, "half a comm");
        let flow = pane.apply(EditorAction::Cancel);
        assert_eq!(flow, Flow::Stop(Outcome::Command(String::new())));
        assert_eq!(pane.buffer(), "");
        assert!(pane.history().is_empty());
    }

    #[test]
    fn test_special_keys_do_not_insert() {
        let mut pane = CommandPane::new(": ", None);
        pane.fallback(&Key::special(Key::PGUP));
        pane.fallback(&Key::none());
        assert_eq!(pane.buffer(), "");
    }
}
