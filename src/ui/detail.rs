//! Record detail pane
//!
//! Renders every field of the selected record as `name: value` rows next to
//! the list. Long values word-wrap to the pane width; a single word longer
//! than a line is hyphenated at the break. Fields that no longer fit
//! vertically are dropped; the pane does not scroll.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::record::{KEY_FIELD, PDF_FIELD, Record};
use crate::ui::theme::Theme;

/// Greedy word wrap. Words longer than `width` are split across lines with
/// a trailing hyphen at each break.
#[must_use]
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let chars: Vec<char> = word.chars().collect();
            let step = width.saturating_sub(1).max(1);
            let mut start = 0;
            while chars.len() - start > width {
                let mut piece: String = chars[start..start + step].iter().collect();
                if width > 1 {
                    piece.push('-');
                }
                lines.push(piece);
                start += step;
            }
            line = chars[start..].iter().collect();
            continue;
        }

        let fits = if line.is_empty() {
            word_len <= width
        } else {
            line.chars().count() + 1 + word_len <= width
        };
        if !fits {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Draw the detail pane for the given record; an empty pane when nothing is
/// selected.
pub fn draw(frame: &mut Frame, area: Rect, record: Option<&Record>, theme: &Theme) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border);
    if let Some(record) = record {
        block = block.title(format!(" {} ", record.key()));
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(record) = record else {
        return;
    };

    let width = inner.width as usize;
    let height = inner.height as usize;
    let mut lines: Vec<Line> = Vec::with_capacity(height);

    'fields: for (name, value) in record.fields() {
        // Bookkeeping fields are shown elsewhere (title bar, list marker).
        if name == KEY_FIELD || name == PDF_FIELD {
            continue;
        }

        let label = format!("{name}: ");
        let label_len = label.chars().count();
        let wrapped = wrap_words(&value.replace('\n', " "), width.saturating_sub(label_len).max(1));

        if wrapped.is_empty() {
            if lines.len() >= height {
                break;
            }
            lines.push(Line::from(Span::styled(label, theme.detail_key)));
            continue;
        }

        for (i, piece) in wrapped.into_iter().enumerate() {
            if lines.len() >= height {
                break 'fields;
            }
            let line = if i == 0 {
                Line::from(vec![
                    Span::styled(label.clone(), theme.detail_key),
                    Span::styled(piece, theme.detail_value),
                ])
            } else {
                Line::from(vec![
                    Span::raw(" ".repeat(label_len)),
                    Span::styled(piece, theme.detail_value),
                ])
            };
            lines.push(line);
        }
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
