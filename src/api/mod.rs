//! UniFFI export layer: a thin, `Arc`-held binding surface over the
//! plain-Rust engine (`KeyHandler`, `ReadingGrid`, LM types) for native
//! hosts generated by `uniffi-bindgen`.

mod resources;
mod session;
mod types;

pub use resources::{BopomofoLanguageModel, BopomofoUserPhraseStore};
pub use session::BopomofoSession;
pub use types::{
    BopomofoCandidate, BopomofoError, BopomofoKey, BopomofoKeyError, BopomofoNamedKey, BopomofoResponse, BopomofoState,
};

use std::path::Path;

#[uniffi::export]
fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[uniffi::export]
fn settings_default_config() -> String {
    bopomofo_core::settings::default_toml().to_string()
}

#[uniffi::export]
fn trace_init(log_dir: String) {
    crate::trace_init::init_tracing(Path::new(&log_dir));
}
