//! Keystroke and UI-state types the Key Handler state machine exchanges
//! with its host: a `Key` in, an `InputState` out.

/// A named (non-printable) key the host may deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Enter,
    Esc,
    Backspace,
    Delete,
    Space,
    Unknown,
}

/// The physical key pressed: either a printable ASCII character or one of
/// the named control keys, plus the modifiers held while pressing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub code: KeyCode,
    pub shift: bool,
    pub ctrl: bool,
    pub num_pad: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Ascii(char),
    Named(NamedKey),
}

impl Key {
    pub fn ascii(c: char) -> Self {
        Key { code: KeyCode::Ascii(c), shift: false, ctrl: false, num_pad: false }
    }

    pub fn named(key: NamedKey) -> Self {
        Key { code: KeyCode::Named(key), shift: false, ctrl: false, num_pad: false }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_num_pad(mut self) -> Self {
        self.num_pad = true;
        self
    }

    pub fn is_printable_ascii(&self) -> bool {
        matches!(self.code, KeyCode::Ascii(c) if c.is_ascii_graphic() || c == ' ')
    }

    pub fn as_ascii(&self) -> Option<char> {
        match self.code {
            KeyCode::Ascii(c) => Some(c),
            KeyCode::Named(_) => None,
        }
    }
}

/// A candidate enumerated for a `ChoosingCandidate` panel: one `(reading,
/// value)` pair from [`bopomofo_core::grid::ReadingGrid::candidates_at`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub reading: String,
    pub value: String,
}

/// Tagged UI state the Key Handler emits after every keystroke. Immutable
/// value objects: a previous state is consulted only long enough to decide
/// commit behavior, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub enum InputState {
    /// Ground state; entering it from a non-empty previous state commits
    /// that state's composing buffer (see [`InputState::commit_text`]).
    Empty,
    /// Ground state that discards any pending commit from the state it replaces.
    EmptyIgnoringPrevious,
    /// One-shot: emit `text`, then the engine settles into `Empty`.
    Committing { text: String },
    /// An in-progress composition: the rendered buffer, its UTF-8 cursor
    /// offset, an optional tooltip (e.g. an error hint), and the reading
    /// evicted from the grid by the space the insertion made, if any.
    Inputting {
        composing: String,
        cursor_utf8: usize,
        tooltip: Option<String>,
        evicted: Option<String>,
    },
    /// A candidate panel is open at a snapshot of the composing buffer.
    ChoosingCandidate {
        composing: String,
        cursor_utf8: usize,
        candidates: Vec<Candidate>,
        /// The grid position the candidates were enumerated at.
        position: usize,
    },
    /// The user is marking a reading range (Shift+cursor) to add as a
    /// user phrase.
    Marking {
        composing: String,
        cursor_utf8: usize,
        tooltip: Option<String>,
        grid_start: usize,
        head: String,
        marked: String,
        tail: String,
        reading: String,
        acceptable: bool,
    },
}

impl InputState {
    /// Whether this state carries composition the host is currently
    /// displaying (and that a transition to `Empty` should commit).
    pub fn is_composing(&self) -> bool {
        matches!(
            self,
            InputState::Inputting { .. } | InputState::ChoosingCandidate { .. } | InputState::Marking { .. }
        )
    }

    pub fn composing_text(&self) -> Option<&str> {
        match self {
            InputState::Inputting { composing, .. } => Some(composing),
            InputState::ChoosingCandidate { composing, .. } => Some(composing),
            InputState::Marking { composing, .. } => Some(composing),
            _ => None,
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        InputState::Empty
    }
}
