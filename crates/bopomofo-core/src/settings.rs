//! Global settings loaded from TOML.
//!
//! Unlike a strict all-or-nothing parse, this loader applies recognized
//! keys field-by-field: an unknown key is ignored and a malformed value
//! keeps the prior default, each logged via `tracing::warn!`.

use std::sync::OnceLock;

use serde::Deserialize;

use crate::syllable::KeyboardLayout;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CtrlEnterBehavior {
    Disabled,
    OutputBpmfReadings,
    OutputHtmlRubyText,
}

impl Default for CtrlEnterBehavior {
    fn default() -> Self {
        CtrlEnterBehavior::Disabled
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub select_phrase_after_cursor_as_candidate: bool,
    pub move_cursor_after_selection: bool,
    pub put_lowercase_letters_to_composing_buffer: bool,
    pub esc_key_clears_entire_composing_buffer: bool,
    pub ctrl_enter_behavior: CtrlEnterBehavior,
    pub keyboard_layout: KeyboardLayout,
    pub reading_separator: String,
    pub override_recall_capacity: usize,
    pub override_recall_decay_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("default settings TOML must be valid")
    }
}

/// Raw, all-optional mirror of [`Settings`] used purely to decode whatever
/// a TOML document provides; every field is applied independently so one
/// bad value cannot poison the rest of the document.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    select_phrase_after_cursor_as_candidate: Option<bool>,
    move_cursor_after_selection: Option<bool>,
    put_lowercase_letters_to_composing_buffer: Option<bool>,
    esc_key_clears_entire_composing_buffer: Option<bool>,
    ctrl_enter_behavior: Option<String>,
    keyboard_layout: Option<String>,
    reading_separator: Option<String>,
    override_recall_capacity: Option<usize>,
    override_recall_decay_seconds: Option<u64>,
}

fn parse_ctrl_enter_behavior(raw: &str) -> Option<CtrlEnterBehavior> {
    match raw {
        "disabled" => Some(CtrlEnterBehavior::Disabled),
        "output_bpmf_readings" => Some(CtrlEnterBehavior::OutputBpmfReadings),
        "output_html_ruby_text" => Some(CtrlEnterBehavior::OutputHtmlRubyText),
        _ => None,
    }
}

fn parse_keyboard_layout(raw: &str) -> Option<KeyboardLayout> {
    match raw {
        "standard" => Some(KeyboardLayout::Standard),
        "eten" => Some(KeyboardLayout::Eten),
        "hsu" => Some(KeyboardLayout::Hsu),
        "eten26" => Some(KeyboardLayout::Eten26),
        "hanyu_pinyin" => Some(KeyboardLayout::HanyuPinyin),
        "ibm" => Some(KeyboardLayout::Ibm),
        _ => None,
    }
}

/// Hard-coded fallback used only to seed fields before the embedded
/// default TOML (itself parsed through this same machinery) is applied.
fn bootstrap_defaults() -> Settings {
    Settings {
        select_phrase_after_cursor_as_candidate: false,
        move_cursor_after_selection: false,
        put_lowercase_letters_to_composing_buffer: false,
        esc_key_clears_entire_composing_buffer: false,
        ctrl_enter_behavior: CtrlEnterBehavior::Disabled,
        keyboard_layout: KeyboardLayout::Standard,
        reading_separator: "-".to_string(),
        override_recall_capacity: 500,
        override_recall_decay_seconds: 5400,
    }
}

/// Applies `raw` onto `base` field-by-field. Unknown keys were already
/// dropped by serde's default-ignore-unknown-fields behavior; malformed
/// string-enum values are logged and skipped here, keeping `base`'s value.
fn apply_raw(base: &mut Settings, raw: RawSettings) {
    if let Some(v) = raw.select_phrase_after_cursor_as_candidate {
        base.select_phrase_after_cursor_as_candidate = v;
    }
    if let Some(v) = raw.move_cursor_after_selection {
        base.move_cursor_after_selection = v;
    }
    if let Some(v) = raw.put_lowercase_letters_to_composing_buffer {
        base.put_lowercase_letters_to_composing_buffer = v;
    }
    if let Some(v) = raw.esc_key_clears_entire_composing_buffer {
        base.esc_key_clears_entire_composing_buffer = v;
    }
    if let Some(raw_value) = raw.ctrl_enter_behavior {
        match parse_ctrl_enter_behavior(&raw_value) {
            Some(v) => base.ctrl_enter_behavior = v,
            None => tracing::warn!(value = %raw_value, "ignoring malformed ctrl_enter_behavior"),
        }
    }
    if let Some(raw_value) = raw.keyboard_layout {
        match parse_keyboard_layout(&raw_value) {
            Some(v) => base.keyboard_layout = v,
            None => tracing::warn!(value = %raw_value, "ignoring malformed keyboard_layout"),
        }
    }
    if let Some(v) = raw.reading_separator {
        if v.is_empty() {
            tracing::warn!("ignoring empty reading_separator");
        } else {
            base.reading_separator = v;
        }
    }
    if let Some(v) = raw.override_recall_capacity {
        if v == 0 {
            tracing::warn!("ignoring zero override_recall_capacity");
        } else {
            base.override_recall_capacity = v;
        }
    }
    if let Some(v) = raw.override_recall_decay_seconds {
        base.override_recall_decay_seconds = v;
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let raw: RawSettings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    let mut settings = bootstrap_defaults();
    apply_raw(&mut settings, raw);
    Ok(settings)
}

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let mut base = parse_settings_toml(DEFAULT_SETTINGS_TOML)
            .expect("embedded default settings TOML must be valid");
        if let Some(custom) = CUSTOM_TOML.get() {
            match toml::from_str::<RawSettings>(custom) {
                Ok(raw) => apply_raw(&mut base, raw),
                Err(e) => tracing::warn!(error = %e, "custom settings TOML failed to parse; using defaults"),
            }
        }
        base
    })
}

pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}
