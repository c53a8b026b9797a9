use std::sync::{Arc, Mutex};

use bopomofo_core::Settings;
use bopomofo_session::{InputState, KeyHandler};

use super::resources::BopomofoLanguageModel;
use super::types::{BopomofoKey, BopomofoResponse};
use super::BopomofoError;

struct SessionInner {
    handler: KeyHandler,
    state: InputState,
}

/// One composing session exposed to the host via UniFFI. Owns the Key
/// Handler and the `InputState` it hands back on every call, so the host
/// only ever passes in keystrokes and reads responses back out.
#[derive(uniffi::Object)]
pub struct BopomofoSession {
    inner: Mutex<SessionInner>,
}

#[uniffi::export]
impl BopomofoSession {
    #[uniffi::constructor]
    fn new(lm: Arc<BopomofoLanguageModel>) -> Arc<Self> {
        Self::with_settings_toml(lm, None).expect("Settings::default() is always valid")
    }

    #[uniffi::constructor]
    fn with_settings(lm: Arc<BopomofoLanguageModel>, settings_toml: String) -> Result<Arc<Self>, BopomofoError> {
        Self::with_settings_toml(lm, Some(settings_toml))
    }

    fn handle(&self, key: BopomofoKey) -> BopomofoResponse {
        let mut inner = self.inner.lock().expect("session poisoned");
        let SessionInner { handler, state } = &mut *inner;
        let mut next_state = state.clone();
        let mut error = None;
        let absorbed = handler.handle(key.into(), state, |s| next_state = s, |e| error = Some(e));
        *state = next_state.clone();
        BopomofoResponse { absorbed, state: next_state.into(), error: error.map(Into::into) }
    }

    fn candidate_selected(&self, index: u32) -> BopomofoResponse {
        let mut inner = self.inner.lock().expect("session poisoned");
        let SessionInner { handler, state } = &mut *inner;
        let mut next_state = state.clone();
        let mut error = None;
        let absorbed = handler.candidate_selected(state, index as usize, |s| next_state = s, |e| error = Some(e));
        *state = next_state.clone();
        BopomofoResponse { absorbed, state: next_state.into(), error: error.map(Into::into) }
    }

    fn candidate_panel_cancelled(&self) -> BopomofoResponse {
        let mut inner = self.inner.lock().expect("session poisoned");
        let SessionInner { handler, state } = &mut *inner;
        let mut next_state = state.clone();
        let absorbed = handler.candidate_panel_cancelled(state, |s| next_state = s);
        *state = next_state.clone();
        BopomofoResponse { absorbed, state: next_state.into(), error: None }
    }

    fn reset(&self) -> BopomofoResponse {
        let mut inner = self.inner.lock().expect("session poisoned");
        inner.state = inner.handler.reset();
        BopomofoResponse { absorbed: true, state: inner.state.clone().into(), error: None }
    }

    /// Atomically swaps the language model backing future compositions.
    fn replace_language_model(&self, lm: Arc<BopomofoLanguageModel>) {
        let mut inner = self.inner.lock().expect("session poisoned");
        inner.handler.replace_language_model(Arc::clone(&lm.inner));
    }

    fn current_state(&self) -> BopomofoResponse {
        let inner = self.inner.lock().expect("session poisoned");
        BopomofoResponse { absorbed: false, state: inner.state.clone().into(), error: None }
    }
}

impl BopomofoSession {
    fn with_settings_toml(lm: Arc<BopomofoLanguageModel>, settings_toml: Option<String>) -> Result<Arc<Self>, BopomofoError> {
        let settings = match settings_toml {
            Some(toml) => bopomofo_core::settings::parse_settings_toml(&toml)
                .map_err(|e| BopomofoError::InvalidData { msg: e.to_string() })?,
            None => Settings::default(),
        };
        let handler = KeyHandler::new(Arc::clone(&lm.inner), settings);
        Ok(Arc::new(Self { inner: Mutex::new(SessionInner { handler, state: InputState::Empty }) }))
    }
}
