//! The host-facing crate: wraps `bopomofo-core` and `bopomofo-session` in
//! a `uniffi`-exported surface so native hosts (Swift/Kotlin/etc.) get a
//! concrete binding target generated by `uniffi-bindgen`.

mod api;
mod trace_init;

pub use api::*;

uniffi::setup_scaffolding!();
