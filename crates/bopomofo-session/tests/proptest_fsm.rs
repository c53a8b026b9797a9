//! Property-based tests for the `KeyHandler` state machine.
//!
//! Grounded on the reference workspace's `lex-session` crate, which drives
//! its own `InputSession` through random `Action` sequences in
//! `src/tests/proptest_fsm.rs` and checks structural invariants after every
//! step. This does the same against `KeyHandler`/`InputState`.

use std::sync::Arc;

use proptest::prelude::*;

use bopomofo_core::{LanguageModel, Settings, Unigram as U};
use bopomofo_session::{InputState, Key, KeyHandler, NamedKey};

struct Fixed(Vec<(&'static str, Vec<U>)>);

impl LanguageModel for Fixed {
    fn unigrams(&self, reading: &str) -> Vec<U> {
        self.0.iter().find(|(r, _)| *r == reading).map(|(_, u)| u.clone()).unwrap_or_default()
    }

    fn has_unigrams(&self, reading: &str) -> bool {
        !self.unigrams(reading).is_empty()
    }
}

fn fsm_lm() -> Arc<dyn LanguageModel> {
    Arc::new(Fixed(vec![
        ("ㄓㄨㄥ", vec![U { value: "中".into(), score: -0.02 }]),
        ("ㄨㄣˊ", vec![U { value: "文".into(), score: -0.02 }]),
        ("ㄓㄨㄥ-ㄨㄣˊ", vec![U { value: "中文".into(), score: -0.03 }]),
        ("ㄋㄧㄢˊ", vec![U { value: "年".into(), score: -0.02 }]),
        ("ㄓㄨㄥ-ㄋㄧㄢˊ", vec![U { value: "終年".into(), score: -0.03 }]),
    ]))
}

/// Readings the fixture LM knows, spelled out in Standard-layout ASCII keys
/// (see `bopomofo_char_to_ascii` in `tests/scenarios.rs` for the same map).
/// "ㄓㄨㄥ" carries no tone mark, so its keystrokes end with a literal space
/// to finalize it (toneless syllables commit on Space, not a tone key); the
/// other two already end on a tone key and need no trailing space.
const KNOWN_READINGS: &[&str] = &["5j/ ", "jp6", "su06"];

#[derive(Debug, Clone)]
enum Action {
    TypeKnownReading(usize),
    TypeStrayKey(char),
    Left,
    Right,
    ShiftLeft,
    ShiftRight,
    Home,
    End,
    Backspace,
    Delete,
    Space,
    Enter,
    CtrlEnter,
    Esc,
    DigitSelect(char),
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        10 => (0..KNOWN_READINGS.len()).prop_map(Action::TypeKnownReading),
        3 => prop::sample::select(vec!['a', 'z', 'x', 'q']).prop_map(Action::TypeStrayKey),
        6 => Just(Action::Left),
        6 => Just(Action::Right),
        3 => Just(Action::ShiftLeft),
        3 => Just(Action::ShiftRight),
        2 => Just(Action::Home),
        2 => Just(Action::End),
        5 => Just(Action::Backspace),
        3 => Just(Action::Delete),
        4 => Just(Action::Space),
        4 => Just(Action::Enter),
        1 => Just(Action::CtrlEnter),
        4 => Just(Action::Esc),
        2 => prop::sample::select(vec!['1', '2', '3']).prop_map(Action::DigitSelect),
    ]
}

fn drive(handler: &mut KeyHandler, state: &mut InputState, key: Key) {
    let mut next = state.clone();
    handler.handle(key, state, |s| next = s, |_| {});
    *state = next;
}

/// Structural invariants that must hold after *every* keystroke, regardless
/// of which action produced the current state.
fn assert_invariants(state: &InputState) {
    match state {
        InputState::Empty | InputState::EmptyIgnoringPrevious => {
            assert!(state.composing_text().is_none(), "an idle state must carry no composing text");
        }
        InputState::Inputting { composing, cursor_utf8, .. } => {
            assert!(*cursor_utf8 <= composing.len(), "cursor must not run past the composing text");
            assert!(composing.is_char_boundary(*cursor_utf8), "cursor must land on a UTF-8 char boundary");
        }
        InputState::ChoosingCandidate { composing, cursor_utf8, candidates, position } => {
            assert!(*cursor_utf8 <= composing.len(), "cursor must not run past the composing text");
            assert!(!candidates.is_empty(), "an open candidate panel must offer at least one candidate");
            assert!(*position <= composing.chars().count(), "candidate position must fall within the composing text");
        }
        InputState::Marking { composing, cursor_utf8, head, marked, tail, .. } => {
            assert!(*cursor_utf8 <= composing.len(), "cursor must not run past the composing text");
            let rejoined = format!("{head}{marked}{tail}");
            assert_eq!(&rejoined, composing, "head+marked+tail must reconstruct the composing text exactly");
        }
        InputState::Committing { .. } => {}
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn key_handler_invariants_hold_under_random_keystrokes(actions in prop::collection::vec(arb_action(), 1..80)) {
        let mut handler = KeyHandler::new(fsm_lm(), Settings::default());
        let mut state = InputState::Empty;

        for action in &actions {
            match action {
                Action::TypeKnownReading(idx) => {
                    for c in KNOWN_READINGS[*idx].chars() {
                        drive(&mut handler, &mut state, Key::ascii(c));
                    }
                }
                Action::TypeStrayKey(c) => drive(&mut handler, &mut state, Key::ascii(*c)),
                Action::Left => drive(&mut handler, &mut state, Key::named(NamedKey::Left)),
                Action::Right => drive(&mut handler, &mut state, Key::named(NamedKey::Right)),
                Action::ShiftLeft => drive(&mut handler, &mut state, Key::named(NamedKey::Left).with_shift()),
                Action::ShiftRight => drive(&mut handler, &mut state, Key::named(NamedKey::Right).with_shift()),
                Action::Home => drive(&mut handler, &mut state, Key::named(NamedKey::Home)),
                Action::End => drive(&mut handler, &mut state, Key::named(NamedKey::End)),
                Action::Backspace => drive(&mut handler, &mut state, Key::named(NamedKey::Backspace)),
                Action::Delete => drive(&mut handler, &mut state, Key::named(NamedKey::Delete)),
                Action::Space => drive(&mut handler, &mut state, Key::named(NamedKey::Space)),
                Action::Enter => drive(&mut handler, &mut state, Key::named(NamedKey::Enter)),
                Action::CtrlEnter => drive(&mut handler, &mut state, Key::named(NamedKey::Enter).with_ctrl()),
                Action::Esc => drive(&mut handler, &mut state, Key::named(NamedKey::Esc)),
                Action::DigitSelect(c) => drive(&mut handler, &mut state, Key::ascii(*c)),
            }
            assert_invariants(&state);

            // Committing is one-shot (the handler has already cleared its
            // internal buffer/grid by the time it emits one); folding it back
            // to Empty here mirrors how a host settles the UI between commits.
            if let InputState::Committing { .. } = state {
                state = InputState::Empty;
            }
        }
    }
}
