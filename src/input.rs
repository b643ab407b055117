//! Canonical key input
//!
//! Normalizes crossterm terminal events into backend-independent [`Key`]
//! values. Printable characters come through verbatim; control and
//! navigation input is mapped to named special keys. Anything the codec
//! cannot place degrades to an empty special key, which no action table
//! binds, so unknown input is a no-op rather than an error.

use std::fmt;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// One normalized terminal input unit.
///
/// Equality is by `(value, special)`; comparison against strings uses the
/// canonical rendering (`<up>`, `^C`, `a`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    value: String,
    special: bool,
}

impl Key {
    pub const BACKSPACE: &'static str = "<backspace>";
    pub const DELETE: &'static str = "<del>";
    pub const LEFT: &'static str = "<left>";
    pub const RIGHT: &'static str = "<right>";
    pub const UP: &'static str = "<up>";
    pub const DOWN: &'static str = "<down>";
    pub const HOME: &'static str = "<home>";
    pub const END: &'static str = "<end>";
    pub const PGUP: &'static str = "<pgup>";
    pub const PGDN: &'static str = "<pgdn>";
    pub const RETURN: &'static str = "<return>";
    pub const ESCAPE: &'static str = "<escape>";
    pub const TAB: &'static str = "<tab>";
    pub const RESIZE: &'static str = "<resize>";

    /// Canonical rendering of the interrupt key; every mode binds it.
    pub const INTERRUPT: &'static str = "^C";

    /// A printable key holding `value` verbatim.
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            special: false,
        }
    }

    /// A special (control/navigation) key.
    #[must_use]
    pub fn special(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            special: true,
        }
    }

    /// The empty special key: recognized by nothing, bound to nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::special("")
    }

    /// The interrupt key (`^C`).
    #[must_use]
    pub fn interrupt() -> Self {
        Self::special("C")
    }

    /// Whether this is a control/navigation key rather than printable text.
    #[must_use]
    pub fn is_special(&self) -> bool {
        self.special
    }

    /// The raw key value without canonical decoration.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Block until the next input unit arrives and normalize it.
    ///
    /// Never fails: a read error is surfaced as the interrupt key, which
    /// action tables route to their exit handler.
    #[must_use]
    pub fn read() -> Self {
        match event::read() {
            Ok(ev) => Self::from_event(&ev),
            Err(_) => Self::interrupt(),
        }
    }

    /// Normalize a crossterm event. Resize notifications become the RESIZE
    /// key; events that carry no key press become the empty no-op key.
    #[must_use]
    pub fn from_event(event: &Event) -> Self {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::from_key_event(key),
            Event::Resize(_, _) => Self::special(Self::RESIZE),
            _ => Self::none(),
        }
    }

    fn from_key_event(key: &KeyEvent) -> Self {
        match key.code {
            KeyCode::Enter => Self::special(Self::RETURN),
            KeyCode::Backspace => Self::special(Self::BACKSPACE),
            KeyCode::Delete => Self::special(Self::DELETE),
            KeyCode::Left => Self::special(Self::LEFT),
            KeyCode::Right => Self::special(Self::RIGHT),
            KeyCode::Up => Self::special(Self::UP),
            KeyCode::Down => Self::special(Self::DOWN),
            KeyCode::Home => Self::special(Self::HOME),
            KeyCode::End => Self::special(Self::END),
            KeyCode::PageUp => Self::special(Self::PGUP),
            KeyCode::PageDown => Self::special(Self::PGDN),
            KeyCode::Esc => Self::special(Self::ESCAPE),
            KeyCode::Tab => Self::special(Self::TAB),
            KeyCode::F(n) if (1..=12).contains(&n) => Self::special(format!("<f{n}>")),
            KeyCode::Char(c) => Self::from_char(c, key.modifiers),
            _ => Self::none(),
        }
    }

    fn from_char(c: char, modifiers: KeyModifiers) -> Self {
        if modifiers.contains(KeyModifiers::CONTROL) {
            // ^H is backspace by terminal convention.
            return match c.to_ascii_uppercase() {
                'H' => Self::special(Self::BACKSPACE),
                up => Self::special(up.to_string()),
            };
        }
        if modifiers.contains(KeyModifiers::ALT) {
            return Self::none();
        }
        match c {
            '\n' | '\r' => Self::special(Self::RETURN),
            // DEL arrives on some terminals as a raw char.
            '\u{7f}' => Self::special(Self::BACKSPACE),
            c => Self::plain(c.to_string()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.special && !self.value.starts_with('<') {
            write!(f, "^{}", self.value)
        } else {
            f.write_str(&self.value)
        }
    }
}

impl PartialEq<str> for Key {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for Key {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}
