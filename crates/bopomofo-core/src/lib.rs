//! Core of a Mandarin (Bopomofo/zhuyin) phonetic input method: the
//! Reading Buffer, the Reading Grid lattice and its Walker, the
//! language-model query capability, and the peripheral pure helpers
//! (numerals, macros, dictionary dispatch, Big5 hex, settings,
//! timestamp polling) everything above is built on.
//!
//! The Key Handler state machine that drives these pieces against a
//! UI-facing `InputState` lives one layer up, in `bopomofo-session`.

pub mod big5;
pub mod dict;
pub mod dictionary_service;
pub mod grid;
pub mod macros;
pub mod numeric;
pub mod settings;
pub mod syllable;
pub mod timestamp;
pub mod user_override;

pub use dict::{DictError, LanguageModel, ScoreRankedLanguageModel, Unigram};
pub use grid::{OverridePolicy, OverrideStatus, ReadingGrid, WalkResult, WalkedNode, MAX_SPAN};
pub use settings::{CtrlEnterBehavior, Settings, SettingsError};
pub use syllable::{BopomofoReadingBuffer, KeyboardLayout, ReceiveResult};
pub use user_override::UserOverrideRecall;
