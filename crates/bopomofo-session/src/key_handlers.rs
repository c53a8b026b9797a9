//! The Key Handler state machine: interprets one `Key` against the current
//! `InputState`, driving the Reading Buffer and Reading Grid underneath and
//! emitting the next state through `state_cb`/`error_cb`.
//!
//! Dispatch follows the ten-step order from the Inputting state (reading
//! buffer feed, cursor keys, delete keys, space/candidate-open, enter, esc,
//! punctuation, uppercase letter, shift-cursor marking, pass-through);
//! ChoosingCandidate and Marking are narrower states dispatched separately.

use std::sync::Arc;

use tracing::debug_span;

use bopomofo_core::grid::{OverridePolicy, ReadingGrid, WalkResult, MAX_SPAN};
use bopomofo_core::{BopomofoReadingBuffer, CtrlEnterBehavior, LanguageModel, ReceiveResult, Settings, UserOverrideRecall};

use crate::commit;
use crate::composing;
use crate::error::KeyHandlerError;
use crate::types::{Candidate, InputState, Key, KeyCode, NamedKey};

const MARKING_MIN_SPAN: usize = 2;

fn punctuation_reading(key: &Key) -> Option<String> {
    let KeyCode::Ascii(c) = key.code else { return None };
    if c.is_ascii_alphanumeric() || c == ' ' {
        return None;
    }
    let prefix = if key.shift { "Shift_" } else { "" };
    Some(format!("_punctuation_{prefix}{c}"))
}

fn order_pair(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn marking_range_acceptable(span: usize) -> bool {
    (MARKING_MIN_SPAN..=MAX_SPAN).contains(&span)
}

fn default_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Drives a Reading Buffer and a Reading Grid against keystrokes, emitting
/// `InputState` transitions. Owns no UI; the host owns `InputState` between
/// calls and hands it back on the next keystroke.
pub struct KeyHandler {
    settings: Settings,
    lm: Arc<dyn LanguageModel>,
    buffer: BopomofoReadingBuffer,
    grid: ReadingGrid,
    user_override: UserOverrideRecall,
    on_add_new_phrase: Option<Box<dyn FnMut(&str, &str) + Send>>,
    now_fn: Box<dyn Fn() -> u64 + Send>,
}

impl KeyHandler {
    pub fn new(lm: Arc<dyn LanguageModel>, settings: Settings) -> Self {
        let mut grid = ReadingGrid::new(lm.clone());
        grid.set_separator(settings.reading_separator.clone());
        let buffer = BopomofoReadingBuffer::new(settings.keyboard_layout);
        let user_override = UserOverrideRecall::new(
            settings.override_recall_capacity,
            settings.override_recall_decay_seconds,
        );
        Self {
            settings,
            lm,
            buffer,
            grid,
            user_override,
            on_add_new_phrase: None,
            now_fn: Box::new(default_now),
        }
    }

    /// Swaps in a clock used instead of the system clock; tests use this to
    /// control `UserOverrideRecall` decay deterministically.
    pub fn set_clock(&mut self, now_fn: impl Fn() -> u64 + Send + 'static) {
        self.now_fn = Box::new(now_fn);
    }

    pub fn set_on_add_new_phrase(&mut self, callback: impl FnMut(&str, &str) + Send + 'static) {
        self.on_add_new_phrase = Some(Box::new(callback));
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.buffer.set_layout(settings.keyboard_layout);
        self.grid.set_separator(settings.reading_separator.clone());
        self.settings = settings;
    }

    /// Atomically swaps the language model backing future grid mutations.
    /// Existing node content in the live grid is left as-is; only readings
    /// inserted after the swap consult the new snapshot.
    pub fn replace_language_model(&mut self, lm: Arc<dyn LanguageModel>) {
        self.lm = lm.clone();
        self.grid.set_language_model(lm);
    }

    pub fn reset(&mut self) -> InputState {
        self.clear_all();
        InputState::Empty
    }

    fn clear_all(&mut self) {
        self.buffer.clear();
        self.grid = ReadingGrid::new(self.lm.clone());
        self.grid.set_separator(self.settings.reading_separator.clone());
    }

    fn now(&self) -> u64 {
        (self.now_fn)()
    }

    pub fn handle(
        &mut self,
        key: Key,
        state: &InputState,
        mut state_cb: impl FnMut(InputState),
        mut error_cb: impl FnMut(KeyHandlerError),
    ) -> bool {
        let _span = debug_span!("key_handler_handle").entered();
        let now = self.now();
        let sc: &mut dyn FnMut(InputState) = &mut state_cb;
        let ec: &mut dyn FnMut(KeyHandlerError) = &mut error_cb;
        match state {
            InputState::ChoosingCandidate { candidates, position, .. } => {
                self.handle_choosing_candidate(key, candidates.as_slice(), *position, now, sc, ec)
            }
            InputState::Marking { grid_start, .. } => self.handle_marking(key, *grid_start, now, sc, ec),
            _ => self.handle_inputting(key, now, sc, ec),
        }
    }

    pub fn candidate_selected(
        &mut self,
        state: &InputState,
        index: usize,
        mut state_cb: impl FnMut(InputState),
        mut error_cb: impl FnMut(KeyHandlerError),
    ) -> bool {
        let InputState::ChoosingCandidate { candidates, position, .. } = state else {
            return false;
        };
        let now = self.now();
        match candidates.get(index).cloned() {
            Some(candidate) => {
                self.select_candidate(candidate, *position, now, &mut state_cb);
                true
            }
            None => {
                error_cb(KeyHandlerError::NoCandidates);
                false
            }
        }
    }

    pub fn candidate_panel_cancelled(&self, state: &InputState, mut state_cb: impl FnMut(InputState)) -> bool {
        if !matches!(state, InputState::ChoosingCandidate { .. }) {
            return false;
        }
        self.emit_unchanged(&mut state_cb);
        true
    }

    // -- Inputting ---------------------------------------------------

    fn handle_inputting(
        &mut self,
        key: Key,
        now: u64,
        sc: &mut dyn FnMut(InputState),
        ec: &mut dyn FnMut(KeyHandlerError),
    ) -> bool {
        // 1. Feed the key to the Reading Buffer if the active layout maps
        // it to a syllable component. NoOp means it doesn't, so dispatch
        // continues below (this also covers a fresh syllable's first key,
        // since `receive` itself tolerates an empty buffer).
        let fed_char = match key.code {
            KeyCode::Ascii(c) if !key.ctrl && !key.num_pad => Some(c),
            KeyCode::Named(NamedKey::Space) if !key.ctrl => Some(' '),
            _ => None,
        };
        if let Some(c) = fed_char {
            match self.buffer.receive(c) {
                ReceiveResult::Composed(reading) => {
                    if self.grid.insert_reading(&reading) {
                        let position = self.grid.cursor() - 1;
                        self.rewalk_and_emit(now, Some(position), sc, None);
                    } else {
                        ec(KeyHandlerError::InvalidReading);
                        self.emit_unchanged(sc);
                    }
                    return true;
                }
                ReceiveResult::Updated => {
                    self.emit_unchanged(sc);
                    return true;
                }
                ReceiveResult::Invalid => {
                    ec(KeyHandlerError::InvalidReading);
                    return true;
                }
                ReceiveResult::NoOp => {}
            }
        }

        // 2 & 3. Cursor and delete keys.
        if let KeyCode::Named(named) = key.code {
            match named {
                NamedKey::Left | NamedKey::Right | NamedKey::Home | NamedKey::End => {
                    return self.handle_cursor_key(named, key.shift, None, sc, ec);
                }
                NamedKey::Backspace | NamedKey::Delete => {
                    return self.handle_delete_key(named, now, sc, ec);
                }
                // 4. SPACE with an empty reading buffer opens the panel
                // (a non-empty buffer was already consumed by step 1 above).
                NamedKey::Space => {
                    return self.enter_choosing_candidate(sc, ec);
                }
                // 5. ENTER commits.
                NamedKey::Enter => {
                    return self.handle_enter(key.ctrl, sc, ec);
                }
                // 6. ESC clears per setting.
                NamedKey::Esc => {
                    return self.handle_esc(now, sc);
                }
                _ => {}
            }
        }

        if let KeyCode::Ascii(c) = key.code {
            if !key.ctrl {
                // 7. Punctuation alias.
                if let Some(reading) = punctuation_reading(&key) {
                    if self.grid.insert_reading(&reading) {
                        let position = self.grid.cursor() - 1;
                        self.rewalk_and_emit(now, Some(position), sc, None);
                        return true;
                    }
                }
                // 8. Uppercase ASCII letter.
                if c.is_ascii_uppercase() {
                    return self.handle_uppercase_letter(c, now, sc);
                }
            }
        }

        // 9. SHIFT+cursor is already handled in step 2; nothing else to do.
        // 10. Pass-through.
        false
    }

    fn handle_cursor_key(
        &mut self,
        named: NamedKey,
        shift: bool,
        existing_marking_anchor: Option<usize>,
        sc: &mut dyn FnMut(InputState),
        ec: &mut dyn FnMut(KeyHandlerError),
    ) -> bool {
        if !self.buffer.is_empty() {
            ec(KeyHandlerError::InvalidReading);
            return true;
        }
        let cursor_before = self.grid.cursor();
        let moved = match named {
            NamedKey::Left => self.move_cursor(-1),
            NamedKey::Right => self.move_cursor(1),
            NamedKey::Home => {
                self.grid.set_cursor(0);
                true
            }
            NamedKey::End => {
                self.grid.set_cursor(self.grid.length());
                true
            }
            _ => unreachable!("only cursor-movement NamedKeys reach handle_cursor_key"),
        };
        if !moved {
            ec(KeyHandlerError::BoundaryHit);
            return true;
        }
        if shift {
            let grid_start = existing_marking_anchor.unwrap_or(cursor_before);
            self.emit_marking(grid_start, sc);
        } else {
            self.emit_unchanged(sc);
        }
        true
    }

    fn move_cursor(&mut self, delta: i32) -> bool {
        let current = self.grid.cursor() as i32;
        let target = current + delta;
        if target < 0 || target as usize > self.grid.length() {
            return false;
        }
        self.grid.set_cursor(target as usize);
        true
    }

    fn handle_delete_key(
        &mut self,
        named: NamedKey,
        now: u64,
        sc: &mut dyn FnMut(InputState),
        ec: &mut dyn FnMut(KeyHandlerError),
    ) -> bool {
        match named {
            NamedKey::Backspace => {
                if !self.buffer.is_empty() {
                    self.buffer.backspace();
                    self.emit_unchanged(sc);
                    return true;
                }
                if !self.grid.delete_reading_before_cursor() {
                    ec(KeyHandlerError::BoundaryHit);
                    return true;
                }
            }
            NamedKey::Delete => {
                if !self.buffer.is_empty() {
                    ec(KeyHandlerError::InvalidReading);
                    return true;
                }
                if !self.grid.delete_reading_after_cursor() {
                    ec(KeyHandlerError::BoundaryHit);
                    return true;
                }
            }
            _ => unreachable!("only delete NamedKeys reach handle_delete_key"),
        }
        if self.grid.length() == 0 {
            sc(InputState::Empty);
        } else {
            self.rewalk_and_emit(now, None, sc, None);
        }
        true
    }

    fn handle_enter(
        &mut self,
        ctrl: bool,
        sc: &mut dyn FnMut(InputState),
        ec: &mut dyn FnMut(KeyHandlerError),
    ) -> bool {
        if self.grid.length() == 0 {
            ec(KeyHandlerError::EmptyComposition);
            return true;
        }
        let walk = self.grid.walk();
        let text = if ctrl {
            match self.settings.ctrl_enter_behavior {
                CtrlEnterBehavior::Disabled => commit::plain_text(&walk),
                CtrlEnterBehavior::OutputBpmfReadings => commit::bpmf_readings(&walk, &self.settings.reading_separator),
                CtrlEnterBehavior::OutputHtmlRubyText => commit::html_ruby(&walk),
            }
        } else {
            commit::plain_text(&walk)
        };
        self.clear_all();
        sc(InputState::Committing { text });
        true
    }

    fn handle_esc(&mut self, now: u64, sc: &mut dyn FnMut(InputState)) -> bool {
        if self.buffer.is_empty() && self.grid.length() == 0 {
            return false;
        }
        if self.settings.esc_key_clears_entire_composing_buffer {
            self.clear_all();
            sc(InputState::Empty);
            return true;
        }
        self.buffer.clear();
        if self.grid.length() == 0 {
            sc(InputState::Empty);
        } else {
            self.rewalk_and_emit(now, None, sc, None);
        }
        true
    }

    fn handle_uppercase_letter(&mut self, c: char, now: u64, sc: &mut dyn FnMut(InputState)) -> bool {
        if self.settings.put_lowercase_letters_to_composing_buffer {
            let reading = c.to_ascii_lowercase().to_string();
            if self.grid.insert_reading(&reading) {
                let position = self.grid.cursor() - 1;
                self.rewalk_and_emit(now, Some(position), sc, None);
                return true;
            }
            false
        } else {
            let mut text = if self.grid.length() > 0 {
                commit::plain_text(&self.grid.walk())
            } else {
                String::new()
            };
            text.push(c);
            self.clear_all();
            sc(InputState::Committing { text });
            true
        }
    }

    fn enter_choosing_candidate(&mut self, sc: &mut dyn FnMut(InputState), ec: &mut dyn FnMut(KeyHandlerError)) -> bool {
        if self.grid.length() == 0 {
            ec(KeyHandlerError::EmptyComposition);
            return true;
        }
        let position = self.effective_candidate_position();
        let candidates = self.grid.candidates_at(position);
        if candidates.is_empty() {
            ec(KeyHandlerError::NoCandidates);
            return true;
        }
        let walk = self.grid.walk();
        let (composing, cursor_utf8) = composing::render(&walk.nodes, self.grid.cursor(), "");
        let candidates = candidates
            .into_iter()
            .map(|(reading, value)| Candidate { reading, value })
            .collect();
        sc(InputState::ChoosingCandidate { composing, cursor_utf8, candidates, position });
        true
    }

    fn effective_candidate_position(&self) -> usize {
        if self.settings.select_phrase_after_cursor_as_candidate {
            self.grid.cursor()
        } else {
            self.grid.cursor().saturating_sub(1)
        }
    }

    // -- ChoosingCandidate --------------------------------------------

    fn handle_choosing_candidate(
        &mut self,
        key: Key,
        candidates: &[Candidate],
        position: usize,
        now: u64,
        sc: &mut dyn FnMut(InputState),
        ec: &mut dyn FnMut(KeyHandlerError),
    ) -> bool {
        match key.code {
            KeyCode::Named(NamedKey::Esc) => {
                self.emit_unchanged(sc);
                true
            }
            KeyCode::Ascii(c) if c.is_ascii_digit() && c != '0' => {
                let index = c.to_digit(10).unwrap() as usize - 1;
                match candidates.get(index).cloned() {
                    Some(candidate) => self.select_candidate(candidate, position, now, sc),
                    None => ec(KeyHandlerError::NoCandidates),
                }
                true
            }
            // The host drives panel navigation itself (arrow keys, mouse,
            // scrolling); any other key is simply absorbed without change.
            _ => true,
        }
    }

    fn select_candidate(&mut self, candidate: Candidate, position: usize, now: u64, sc: &mut dyn FnMut(InputState)) {
        let preceding = self.preceding_values_before(position);
        let preceding_refs: Vec<&str> = preceding.iter().map(String::as_str).collect();
        self.grid.override_candidate(position, &candidate.value, OverridePolicy::Specified);
        let context = UserOverrideRecall::context_key(&preceding_refs, &candidate.reading);
        self.user_override.observe(&context, &candidate.value, now);
        if self.settings.move_cursor_after_selection {
            let walk = self.grid.walk();
            let span = node_span_length_at(&walk, position).unwrap_or(1);
            self.grid.set_cursor(position + span);
        }
        self.rewalk_and_emit(now, None, sc, None);
    }

    fn preceding_values_before(&self, position: usize) -> Vec<String> {
        let walk = self.grid.walk();
        let mut out = Vec::new();
        let mut pos = 0;
        for node in &walk.nodes {
            if pos >= position {
                break;
            }
            out.push(node.value.clone());
            pos += node.span_length;
        }
        out
    }

    // -- Marking --------------------------------------------------------

    fn handle_marking(
        &mut self,
        key: Key,
        grid_start: usize,
        now: u64,
        sc: &mut dyn FnMut(InputState),
        ec: &mut dyn FnMut(KeyHandlerError),
    ) -> bool {
        if let KeyCode::Named(named @ (NamedKey::Left | NamedKey::Right)) = key.code {
            return self.handle_cursor_key(named, key.shift, Some(grid_start), sc, ec);
        }
        if key.code == KeyCode::Named(NamedKey::Esc) {
            self.emit_unchanged(sc);
            return true;
        }
        if key.code == KeyCode::Named(NamedKey::Enter) {
            let cursor = self.grid.cursor();
            let (start, end) = order_pair(grid_start, cursor);
            if !marking_range_acceptable(end - start) {
                ec(KeyHandlerError::NoCandidates);
                return true;
            }
            let reading = self.grid.readings()[start..end].join(&self.settings.reading_separator);
            let walk = self.grid.walk();
            let (_, value, _) = composing::split_marking(&walk.nodes, start, end);
            if let Some(callback) = self.on_add_new_phrase.as_mut() {
                callback(&value, &reading);
            }
            self.rewalk_and_emit(now, None, sc, None);
            return true;
        }
        // Any other key cancels marking and is reprocessed as if typed
        // directly against Inputting.
        self.handle_inputting(key, now, sc, ec)
    }

    fn emit_marking(&self, grid_start: usize, sc: &mut dyn FnMut(InputState)) {
        let cursor = self.grid.cursor();
        let (start, end) = order_pair(grid_start, cursor);
        let walk = self.grid.walk();
        let (composing, cursor_utf8) = composing::render(&walk.nodes, cursor, "");
        let (head, marked, tail) = composing::split_marking(&walk.nodes, start, end);
        let reading = self.grid.readings()[start..end].join(&self.settings.reading_separator);
        let acceptable = marking_range_acceptable(end - start);
        sc(InputState::Marking {
            composing,
            cursor_utf8,
            tooltip: None,
            grid_start,
            head,
            marked,
            tail,
            reading,
            acceptable,
        });
    }

    // -- Shared rendering -------------------------------------------------

    fn emit_unchanged(&self, sc: &mut dyn FnMut(InputState)) {
        let walk = self.grid.walk();
        let (composing, cursor_utf8) = composing::render(&walk.nodes, self.grid.cursor(), self.buffer.composing_text().as_str());
        sc(InputState::Inputting { composing, cursor_utf8, tooltip: None, evicted: None });
    }

    /// Re-walks the grid (first applying any recall suggestion whose context
    /// is now valid) and emits the resulting Inputting state. `position_hint`
    /// names the position a fresh reading just landed at, so the common case
    /// of composing a new syllable only checks that one context; every other
    /// caller passes `None` and every grid position is checked instead, since
    /// a delete/esc/candidate-selection rewalk can make a recall suggestion's
    /// context valid at a position that wasn't just touched.
    fn rewalk_and_emit(
        &mut self,
        now: u64,
        position_hint: Option<usize>,
        sc: &mut dyn FnMut(InputState),
        evicted: Option<String>,
    ) {
        if !self.user_override.is_empty() {
            match position_hint {
                Some(position) => self.apply_recall_suggestion_at(position, now),
                None => {
                    for position in 0..self.grid.length() {
                        self.apply_recall_suggestion_at(position, now);
                    }
                }
            }
        }
        let walk = self.grid.walk();
        let (composing, cursor_utf8) = composing::render(&walk.nodes, self.grid.cursor(), self.buffer.composing_text().as_str());
        sc(InputState::Inputting { composing, cursor_utf8, tooltip: None, evicted });
    }

    fn apply_recall_suggestion_at(&mut self, position: usize, now: u64) {
        if position >= self.grid.length() {
            return;
        }
        let probe = self.grid.walk();
        let mut preceding = Vec::new();
        let mut reading_at_position = None;
        let mut pos = 0;
        for node in &probe.nodes {
            if pos == position {
                reading_at_position = Some(node.reading.clone());
            }
            if pos < position {
                preceding.push(node.value.clone());
            }
            pos += node.span_length;
        }
        let Some(reading) = reading_at_position else { return };
        let preceding_refs: Vec<&str> = preceding.iter().map(String::as_str).collect();
        let context = UserOverrideRecall::context_key(&preceding_refs, &reading);
        if let Some(value) = self.user_override.suggest(&context, now).map(str::to_string) {
            self.grid.override_candidate(position, &value, OverridePolicy::HighScore);
        }
    }
}

fn node_span_length_at(walk: &WalkResult, position: usize) -> Option<usize> {
    let mut pos = 0;
    for node in &walk.nodes {
        if pos == position {
            return Some(node.span_length);
        }
        pos += node.span_length;
    }
    None
}
