//! Value types exchanged across the FFI boundary: keys in, responses out.

use bopomofo_session::{Candidate, InputState, Key, KeyCode, KeyHandlerError, NamedKey};

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum BopomofoError {
    #[error("IO error: {msg}")]
    Io { msg: String },
    #[error("invalid data: {msg}")]
    InvalidData { msg: String },
}

impl From<std::io::Error> for BopomofoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { msg: e.to_string() }
    }
}

impl From<bopomofo_core::DictError> for BopomofoError {
    fn from(e: bopomofo_core::DictError) -> Self {
        Self::InvalidData { msg: e.to_string() }
    }
}

#[derive(uniffi::Enum)]
pub enum BopomofoNamedKey {
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

impl From<BopomofoNamedKey> for NamedKey {
    fn from(key: BopomofoNamedKey) -> Self {
        match key {
            BopomofoNamedKey::Left => NamedKey::Left,
            BopomofoNamedKey::Right => NamedKey::Right,
            BopomofoNamedKey::Up => NamedKey::Up,
            BopomofoNamedKey::Down => NamedKey::Down,
            BopomofoNamedKey::Home => NamedKey::Home,
            BopomofoNamedKey::End => NamedKey::End,
            BopomofoNamedKey::Enter => NamedKey::Enter,
            BopomofoNamedKey::Esc => NamedKey::Esc,
            BopomofoNamedKey::Backspace => NamedKey::Backspace,
            BopomofoNamedKey::Delete => NamedKey::Delete,
            BopomofoNamedKey::Space => NamedKey::Space,
            BopomofoNamedKey::Unknown => NamedKey::Unknown,
        }
    }
}

/// A platform-independent keystroke. `Ascii.text` carries exactly one
/// character; hosts are expected to split multi-character input upstream.
#[derive(uniffi::Enum)]
pub enum BopomofoKey {
    Ascii { text: String, shift: bool, ctrl: bool, num_pad: bool },
    Named { key: BopomofoNamedKey, shift: bool, ctrl: bool, num_pad: bool },
}

impl From<BopomofoKey> for Key {
    fn from(key: BopomofoKey) -> Self {
        match key {
            BopomofoKey::Ascii { text, shift, ctrl, num_pad } => {
                let c = text.chars().next().unwrap_or('\0');
                Key { code: KeyCode::Ascii(c), shift, ctrl, num_pad }
            }
            BopomofoKey::Named { key, shift, ctrl, num_pad } => {
                Key { code: KeyCode::Named(key.into()), shift, ctrl, num_pad }
            }
        }
    }
}

#[derive(Clone, uniffi::Record)]
pub struct BopomofoCandidate {
    pub reading: String,
    pub value: String,
}

impl From<Candidate> for BopomofoCandidate {
    fn from(c: Candidate) -> Self {
        Self { reading: c.reading, value: c.value }
    }
}

/// Mirrors [`InputState`] one-to-one for the FFI boundary; `cursor_utf8`,
/// `grid_start`, and `position` are widened to `u32` since uniffi has no
/// native `usize`.
#[derive(Clone, uniffi::Enum)]
pub enum BopomofoState {
    Empty,
    EmptyIgnoringPrevious,
    Committing {
        text: String,
    },
    Inputting {
        composing: String,
        cursor_utf8: u32,
        tooltip: Option<String>,
        evicted: Option<String>,
    },
    ChoosingCandidate {
        composing: String,
        cursor_utf8: u32,
        candidates: Vec<BopomofoCandidate>,
        position: u32,
    },
    Marking {
        composing: String,
        cursor_utf8: u32,
        tooltip: Option<String>,
        grid_start: u32,
        head: String,
        marked: String,
        tail: String,
        reading: String,
        acceptable: bool,
    },
}

impl From<InputState> for BopomofoState {
    fn from(state: InputState) -> Self {
        match state {
            InputState::Empty => BopomofoState::Empty,
            InputState::EmptyIgnoringPrevious => BopomofoState::EmptyIgnoringPrevious,
            InputState::Committing { text } => BopomofoState::Committing { text },
            InputState::Inputting { composing, cursor_utf8, tooltip, evicted } => {
                BopomofoState::Inputting { composing, cursor_utf8: cursor_utf8 as u32, tooltip, evicted }
            }
            InputState::ChoosingCandidate { composing, cursor_utf8, candidates, position } => {
                BopomofoState::ChoosingCandidate {
                    composing,
                    cursor_utf8: cursor_utf8 as u32,
                    candidates: candidates.into_iter().map(Into::into).collect(),
                    position: position as u32,
                }
            }
            InputState::Marking { composing, cursor_utf8, tooltip, grid_start, head, marked, tail, reading, acceptable } => {
                BopomofoState::Marking {
                    composing,
                    cursor_utf8: cursor_utf8 as u32,
                    tooltip,
                    grid_start: grid_start as u32,
                    head,
                    marked,
                    tail,
                    reading,
                    acceptable,
                }
            }
        }
    }
}

#[derive(Clone, uniffi::Enum)]
pub enum BopomofoKeyError {
    InvalidReading,
    EmptyComposition,
    BoundaryHit,
    NoCandidates,
}

impl From<KeyHandlerError> for BopomofoKeyError {
    fn from(e: KeyHandlerError) -> Self {
        match e {
            KeyHandlerError::InvalidReading => BopomofoKeyError::InvalidReading,
            KeyHandlerError::EmptyComposition => BopomofoKeyError::EmptyComposition,
            KeyHandlerError::BoundaryHit => BopomofoKeyError::BoundaryHit,
            KeyHandlerError::NoCandidates => BopomofoKeyError::NoCandidates,
        }
    }
}

/// Response from `handle` / `candidate_selected` / `reset`: whether the
/// keystroke was absorbed, the state to display next, and an optional
/// non-fatal error the host may surface as a tooltip or beep.
#[derive(Clone, uniffi::Record)]
pub struct BopomofoResponse {
    pub absorbed: bool,
    pub state: BopomofoState,
    pub error: Option<BopomofoKeyError>,
}
