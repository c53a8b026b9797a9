//! The Key Handler state machine layered over `bopomofo-core`: turns
//! keystrokes and UI-facing `InputState` transitions into Reading Buffer
//! and Reading Grid operations.

mod commit;
mod composing;
mod error;
mod key_handlers;
mod types;

pub use error::KeyHandlerError;
pub use key_handlers::KeyHandler;
pub use types::{Candidate, InputState, Key, KeyCode, NamedKey};
