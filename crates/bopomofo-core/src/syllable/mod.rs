//! Reading Buffer: assembles single keystrokes into one Bopomofo syllable
//! at a time, per the active keyboard layout.

mod buffer;
mod layout;

pub use buffer::{BopomofoReadingBuffer, ReceiveResult};
pub use layout::KeyboardLayout;
