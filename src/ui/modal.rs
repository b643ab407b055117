//! Modal input dispatch
//!
//! Every pane is a mode: an action table keyed by canonical key strings, an
//! `apply` step for bound actions, and a `fallback` for everything else.
//! Dispatch is uniform across modes and lives here; the shell's scheduler
//! drives whichever mode holds focus until it stops with an [`Outcome`].

use std::collections::HashMap;

use crate::input::Key;

/// What a finished mode hands back to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A command line to dispatch.
    Command(String),
    /// The exit sentinel; the shell tears down immediately.
    Exit,
}

/// Per-key verdict of a mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading keys.
    Continue,
    /// Stop the mode's loop and yield an outcome.
    Stop(Outcome),
}

/// Action table: canonical key string to mode action.
///
/// Each mode seeds its own defaults; callers may rebind or extend entries
/// before the mode runs. The interrupt key is part of every seed.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings<A> {
    map: HashMap<String, A>,
}

impl<A: Clone> KeyBindings<A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Bind a canonical key string to an action, replacing any prior entry.
    pub fn bind(&mut self, key: impl Into<String>, action: A) {
        self.map.insert(key.into(), action);
    }

    /// Look up the action bound to a canonical key string.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&A> {
        self.map.get(key)
    }

    /// Remove a binding.
    pub fn unbind(&mut self, key: &str) -> Option<A> {
        self.map.remove(key)
    }
}

/// A focused, exclusively-active unit of input handling.
pub trait ModalState {
    /// The mode's action vocabulary.
    type Action: Clone;

    fn bindings(&self) -> &KeyBindings<Self::Action>;

    fn bindings_mut(&mut self) -> &mut KeyBindings<Self::Action>;

    /// Execute a bound action.
    fn apply(&mut self, action: Self::Action) -> Flow;

    /// Handle a key with no table entry.
    fn fallback(&mut self, key: &Key) -> Flow;

    /// Whether the terminal cursor should be shown while this mode runs.
    fn cursor_visible(&self) -> bool {
        false
    }

    /// Uniform dispatch: render the key canonically, run the bound action
    /// if there is one, otherwise hand the key to `fallback`.
    fn handle_key(&mut self, key: &Key) -> Flow {
        let rendered = key.to_string();
        match self.bindings().get(&rendered).cloned() {
            Some(action) => self.apply(action),
            None => self.fallback(key),
        }
    }
}
