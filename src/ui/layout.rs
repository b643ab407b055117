//! Pane geometry
//!
//! Splits the terminal grid into the five fixed surfaces: the search line
//! and output line across the top, the list and detail panes side by side,
//! and the command box along the bottom. Recomputation happens only when the
//! terminal dimensions actually change.

use ratatui::layout::Rect;

/// Height of the bordered command box.
const COMMAND_HEIGHT: u16 = 3;

/// Height of the search/output status row.
const STATUS_HEIGHT: u16 = 1;

/// Computed pane rectangles for the current terminal size.
#[derive(Debug, Clone)]
pub struct PaneLayout {
    cols: u16,
    rows: u16,
    split: f32,
    pub search: Rect,
    pub output: Rect,
    pub list: Rect,
    pub detail: Rect,
    pub command: Rect,
}

impl PaneLayout {
    /// Create an empty layout; call [`PaneLayout::resize`] with real
    /// dimensions before drawing.
    #[must_use]
    pub fn new(split: f32) -> Self {
        Self {
            cols: 0,
            rows: 0,
            split: split.clamp(0.1, 0.9),
            search: Rect::default(),
            output: Rect::default(),
            list: Rect::default(),
            detail: Rect::default(),
            command: Rect::default(),
        }
    }

    /// Recompute pane rectangles for new terminal dimensions. Returns
    /// `false` without touching anything when the dimensions are unchanged,
    /// making repeated resize events idempotent.
    pub fn resize(&mut self, cols: u16, rows: u16) -> bool {
        if cols == self.cols && rows == self.rows {
            return false;
        }
        self.cols = cols;
        self.rows = rows;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let list_w =
            ((f32::from(cols) * self.split) as u16).clamp(1, cols.saturating_sub(1).max(1));
        let list_w = list_w.min(cols);
        let detail_w = cols.saturating_sub(list_w);

        let status_h = STATUS_HEIGHT.min(rows);
        let body_h = rows.saturating_sub(COMMAND_HEIGHT + STATUS_HEIGHT);
        let command_y = status_h + body_h;
        let command_h = rows.saturating_sub(command_y).min(COMMAND_HEIGHT);

        self.search = Rect::new(0, 0, list_w, status_h);
        self.output = Rect::new(list_w, 0, detail_w, status_h);
        self.list = Rect::new(0, status_h, list_w, body_h);
        self.detail = Rect::new(list_w, status_h, detail_w, body_h);
        self.command = Rect::new(0, command_y, cols, command_h);
        true
    }

    /// Rows available inside the list border for record rows.
    #[must_use]
    pub fn list_viewport(&self) -> usize {
        self.list.height.saturating_sub(2) as usize
    }
}
