//! Scrollable record list
//!
//! The browse pane owns the record collection and a subset of record indices
//! that is currently visible and filterable. Navigation keeps two invariants
//! at all times: the selection stays inside the subset, and the scroll
//! offset moves exactly as far as needed to keep the selection in view,
//! never further.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::input::Key;
use crate::record::Record;
use crate::ui::format;
use crate::ui::modal::{Flow, KeyBindings, ModalState, Outcome};
use crate::ui::theme::Theme;

/// Actions available in the browse pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseAction {
    Up,
    Down,
    PageUp,
    PageDown,
    /// Confirm the selection and drop into the command line.
    Accept,
    /// Open the selected entry's attachment.
    Open,
    /// Stop and dispatch the given command text.
    Command(String),
    /// Leave the application through the `exit` command.
    Quit,
    /// Stop with the exit sentinel.
    Interrupt,
}

/// The scrollable, selectable record list.
#[derive(Debug)]
pub struct BrowsePane {
    records: Vec<Record>,
    subset: Option<Vec<usize>>,
    index: usize,
    offset: usize,
    viewport: usize,
    page_step: usize,
    template: String,
    bindings: KeyBindings<BrowseAction>,
}

impl BrowsePane {
    /// Create a pane with the default key table seeded.
    #[must_use]
    pub fn new(template: impl Into<String>, page_step: usize) -> Self {
        let mut bindings = KeyBindings::new();
        bindings.bind(Key::UP, BrowseAction::Up);
        bindings.bind(Key::DOWN, BrowseAction::Down);
        bindings.bind(Key::PGUP, BrowseAction::PageUp);
        bindings.bind(Key::PGDN, BrowseAction::PageDown);
        bindings.bind(Key::RETURN, BrowseAction::Accept);
        bindings.bind(Key::INTERRUPT, BrowseAction::Interrupt);

        Self {
            records: Vec::new(),
            subset: None,
            index: 0,
            offset: 0,
            viewport: 1,
            page_step: page_step.max(1),
            template: template.into(),
            bindings,
        }
    }

    /// Replace the record collection; the subset resets to all records in
    /// insertion order and the selection returns to the top.
    pub fn set_records(&mut self, records: Vec<Record>) {
        self.subset = Some((0..records.len()).collect());
        self.records = records;
        self.index = 0;
        self.offset = 0;
    }

    /// Replace the visible subset (a filter result); the selection resets to
    /// the top to keep the invariants.
    pub fn set_subset(&mut self, subset: Vec<usize>) {
        self.subset = Some(subset);
        self.index = 0;
        self.offset = 0;
    }

    /// Seed the subset to "all records" if nothing has set one yet. Called
    /// before the pane's first run.
    pub fn ensure_subset(&mut self) {
        if self.subset.is_none() {
            self.subset = Some((0..self.records.len()).collect());
        }
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn subset(&self) -> &[usize] {
        self.subset.as_deref().unwrap_or(&[])
    }

    /// Position of the selection within the subset.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// First visible row within the subset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The selected record, if the subset is non-empty.
    #[must_use]
    pub fn selected(&self) -> Option<&Record> {
        self.subset()
            .get(self.index)
            .and_then(|&i| self.records.get(i))
    }

    /// Record behind a given subset position.
    #[must_use]
    pub fn record_at(&self, subset_index: usize) -> Option<&Record> {
        self.subset()
            .get(subset_index)
            .and_then(|&i| self.records.get(i))
    }

    /// Set the viewport height (rows inside the border), re-clamping the
    /// scroll so the selection stays visible after a resize.
    pub fn set_viewport(&mut self, height: usize) {
        self.viewport = height.max(1);
        if self.index >= self.offset + self.viewport {
            self.offset = self.index + 1 - self.viewport;
        }
    }

    fn up(&mut self, step: usize) {
        self.index = self.index.saturating_sub(step);
        if self.index < self.offset {
            self.offset = self.index;
        }
    }

    fn down(&mut self, step: usize) {
        let len = self.subset().len();
        if len == 0 {
            return;
        }
        self.index = (self.index + step).min(len - 1);
        if self.index >= self.offset + self.viewport {
            self.offset = self.index + 1 - self.viewport;
        }
    }

    /// Render the visible subset rows through the list template.
    pub fn draw(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let width = inner.width as usize;
        let rows = (inner.height as usize).min(self.viewport);

        let mut lines = Vec::with_capacity(rows);
        for (row, &record_id) in self.subset().iter().skip(self.offset).take(rows).enumerate() {
            let Some(record) = self.records.get(record_id) else {
                continue;
            };
            let index = self.offset + row;
            let text = format::render(&self.template, |name| match name {
                "index" => Some(index.to_string()),
                "row" => Some(row.to_string()),
                "id" => Some(record_id.to_string()),
                field => record.get(field).map(str::to_string),
            });
            let flat = text.replace('\n', " ");
            let clipped: String = flat.chars().take(width).collect();

            let style = if index == self.index {
                theme.selected
            } else {
                theme.standard
            };
            lines.push(Line::styled(format!("{clipped:<width$}"), style));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl ModalState for BrowsePane {
    type Action = BrowseAction;

    fn bindings(&self) -> &KeyBindings<BrowseAction> {
        &self.bindings
    }

    fn bindings_mut(&mut self) -> &mut KeyBindings<BrowseAction> {
        &mut self.bindings
    }

    fn apply(&mut self, action: BrowseAction) -> Flow {
        match action {
            BrowseAction::Up => {
                self.up(1);
                Flow::Continue
            }
            BrowseAction::Down => {
                self.down(1);
                Flow::Continue
            }
            BrowseAction::PageUp => {
                self.up(self.page_step);
                Flow::Continue
            }
            BrowseAction::PageDown => {
                self.down(self.page_step);
                Flow::Continue
            }
            BrowseAction::Accept => Flow::Stop(Outcome::Command("shell".to_string())),
            BrowseAction::Open => Flow::Stop(Outcome::Command(format!("open {}", self.index))),
            BrowseAction::Command(cmd) => Flow::Stop(Outcome::Command(cmd)),
            BrowseAction::Quit => Flow::Stop(Outcome::Command("exit".to_string())),
            BrowseAction::Interrupt => Flow::Stop(Outcome::Exit),
        }
    }

    fn fallback(&mut self, _key: &Key) -> Flow {
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pane(records: usize, viewport: usize) -> BrowsePane {
        let mut pane = BrowsePane::new("{index} {ID}", 10);
        let records = (0..records)
            .map(|i| {
                let mut r = Record::new("article");
                r.set("ID", format!("entry{i}"));
                r
            })
            .collect();
        pane.set_records(records);
        pane.set_viewport(viewport);
        pane
    }

    fn check_invariants(pane: &BrowsePane) {
        let len = pane.subset().len();
        if len > 0 {
            assert!(pane.index() < len, "index {} out of {len}", pane.index());
        }
        assert!(pane.offset() <= pane.index());
        assert!(pane.index() < pane.offset() + pane.viewport);
    }

    #[test]
    fn test_invariants_hold_under_navigation() {
        let mut pane = pane(50, 10);
        let script = [
            BrowseAction::Down,
            BrowseAction::PageDown,
            BrowseAction::PageDown,
            BrowseAction::Up,
            BrowseAction::PageUp,
            BrowseAction::PageDown,
            BrowseAction::Down,
            BrowseAction::Down,
            BrowseAction::PageUp,
            BrowseAction::PageUp,
            BrowseAction::Up,
        ];
        for action in script {
            pane.apply(action);
            check_invariants(&pane);
        }
    }

    #[test]
    fn test_clamping_at_both_ends() {
        let mut pane = pane(5, 10);
        pane.apply(BrowseAction::Up);
        assert_eq!(pane.index(), 0);

        for _ in 0..20 {
            pane.apply(BrowseAction::Down);
        }
        assert_eq!(pane.index(), 4);

        pane.apply(BrowseAction::PageDown);
        assert_eq!(pane.index(), 4);
        pane.apply(BrowseAction::PageUp);
        assert_eq!(pane.index(), 0);
    }

    #[test]
    fn test_scrolling_is_minimal() {
        let mut pane = pane(50, 10);

        // Walk to the bottom edge of the viewport; no scroll yet.
        for _ in 0..9 {
            pane.apply(BrowseAction::Down);
        }
        assert_eq!(pane.index(), 9);
        assert_eq!(pane.offset(), 0);

        // One more step scrolls by exactly one row.
        pane.apply(BrowseAction::Down);
        assert_eq!(pane.index(), 10);
        assert_eq!(pane.offset(), 1);

        // A page jump scrolls by exactly the overflow distance.
        pane.apply(BrowseAction::PageDown);
        assert_eq!(pane.index(), 20);
        assert_eq!(pane.offset(), 11);

        // Walking back up inside the viewport does not scroll.
        pane.apply(BrowseAction::Up);
        assert_eq!(pane.offset(), 11);

        // Crossing the top edge scrolls up by exactly the underflow.
        for _ in 0..9 {
            pane.apply(BrowseAction::Up);
        }
        assert_eq!(pane.index(), 10);
        assert_eq!(pane.offset(), 10);
    }

    #[test]
    fn test_empty_subset_navigation_is_safe() {
        let mut pane = pane(0, 10);
        pane.apply(BrowseAction::Down);
        pane.apply(BrowseAction::PageDown);
        pane.apply(BrowseAction::Up);
        assert_eq!(pane.index(), 0);
        assert_eq!(pane.offset(), 0);
        assert!(pane.selected().is_none());
    }

    #[test]
    fn test_set_subset_resets_position() {
        let mut pane = pane(50, 10);
        for _ in 0..30 {
            pane.apply(BrowseAction::Down);
        }
        pane.set_subset(vec![4, 2, 2, 40]);
        assert_eq!(pane.index(), 0);
        assert_eq!(pane.offset(), 0);
        // Duplicates and arbitrary order are allowed in a subset.
        assert_eq!(pane.subset(), &[4, 2, 2, 40]);
        assert_eq!(pane.selected().unwrap().get("ID"), Some("entry4"));
    }

    #[test]
    fn test_subset_seeded_on_first_run() {
        let mut pane = BrowsePane::new("{ID}", 10);
        pane.records = vec![Record::new("article"), Record::new("book")];
        pane.subset = None;
        pane.ensure_subset();
        assert_eq!(pane.subset(), &[0, 1]);
    }

    #[test]
    fn test_viewport_shrink_keeps_selection_visible() {
        let mut pane = pane(50, 10);
        for _ in 0..9 {
            pane.apply(BrowseAction::Down);
        }
        pane.set_viewport(4);
        check_invariants(&pane);
        assert_eq!(pane.index(), 9);
        assert_eq!(pane.offset(), 6);
    }

    #[test]
    fn test_stop_actions() {
        let mut pane = pane(5, 10);
        pane.apply(BrowseAction::Down);

        assert_eq!(
            pane.apply(BrowseAction::Open),
            Flow::Stop(Outcome::Command("open 1".to_string()))
        );
        assert_eq!(
            pane.apply(BrowseAction::Accept),
            Flow::Stop(Outcome::Command("shell".to_string()))
        );
        assert_eq!(
            pane.apply(BrowseAction::Interrupt),
            Flow::Stop(Outcome::Exit)
        );
    }
}
