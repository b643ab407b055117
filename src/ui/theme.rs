//! Color palette
//!
//! Maps the semantic surface names (list rows, selection, detail fields,
//! prompt, status lines) to ratatui styles. The built-in dark palette can be
//! overridden per name from the configuration file.

use std::collections::HashMap;

use ratatui::style::{Color, Modifier, Style};

use crate::ui::error::UiError;

/// Semantic styles for every drawn surface.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Ordinary list rows and pane backgrounds.
    pub standard: Style,
    /// The selected list row.
    pub selected: Style,
    /// Pane borders.
    pub border: Style,
    /// The search line above the list.
    pub search: Style,
    /// The command-output line above the detail pane.
    pub output: Style,
    /// The command prompt prefix.
    pub prompt: Style,
    /// Text typed into the command line.
    pub command: Style,
    /// Field names in the detail pane.
    pub detail_key: Style,
    /// Field values in the detail pane.
    pub detail_value: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// The built-in dark palette.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            standard: Style::default(),
            selected: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::DarkGray),
            search: Style::default().fg(Color::Black).bg(Color::Cyan),
            output: Style::default().fg(Color::Yellow),
            prompt: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            command: Style::default(),
            detail_key: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            detail_value: Style::default(),
        }
    }

    /// Apply configured color overrides. Each entry maps a semantic name to
    /// `"fg"` or `"fg,bg"`, where colors use ratatui's color syntax (names,
    /// `#rrggbb`, or indexed).
    ///
    /// # Errors
    ///
    /// Returns [`UiError::Palette`] for an unknown semantic name or an
    /// unparsable color.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Result<(), UiError> {
        for (name, value) in overrides {
            let style = parse_style(value)
                .ok_or_else(|| UiError::Palette(format!("bad color value '{value}' for {name}")))?;
            let slot = match name.as_str() {
                "standard" => &mut self.standard,
                "selected" => &mut self.selected,
                "border" => &mut self.border,
                "search" => &mut self.search,
                "output" => &mut self.output,
                "prompt" => &mut self.prompt,
                "command" => &mut self.command,
                "detail-key" => &mut self.detail_key,
                "detail-value" => &mut self.detail_value,
                other => {
                    return Err(UiError::Palette(format!("unknown palette entry '{other}'")));
                }
            };
            *slot = style;
        }
        Ok(())
    }
}

fn parse_style(value: &str) -> Option<Style> {
    let mut parts = value.splitn(2, ',');
    let fg: Color = parts.next()?.trim().parse().ok()?;
    let mut style = Style::default().fg(fg);
    if let Some(bg) = parts.next() {
        style = style.bg(bg.trim().parse().ok()?);
    }
    Some(style)
}
