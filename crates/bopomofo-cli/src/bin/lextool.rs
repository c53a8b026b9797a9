//! Interactive REPL: each stdin line is a sequence of whitespace-separated
//! tokens fed through a `KeyHandler` one keystroke at a time. A token is
//! either a single printable character or a bracketed named key, optionally
//! modifier-prefixed, e.g. `a`, `[space]`, `[enter]`, `[shift+left]`,
//! `[ctrl+enter]`. Prints the resulting state after every line.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;

use bopomofo_core::dict::{ColumnMode, TextLanguageModel};
use bopomofo_core::{LanguageModel, Settings};
use bopomofo_session::{InputState, Key, KeyHandler, NamedKey};

#[derive(Parser)]
#[command(name = "lextool", about = "Bopomofo interactive keystroke REPL")]
struct Cli {
    /// LM text file to load
    lm_file: String,
    /// Column order: "reading-first" (default) or "value-first"
    #[arg(long, default_value = "reading-first")]
    order: String,
}

fn parse_token(token: &str) -> Option<Key> {
    if let Some(inner) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        let mut parts: Vec<&str> = inner.split('+').collect();
        let name = parts.pop()?;
        let mut key = Key::named(match name {
            "left" => NamedKey::Left,
            "right" => NamedKey::Right,
            "up" => NamedKey::Up,
            "down" => NamedKey::Down,
            "home" => NamedKey::Home,
            "end" => NamedKey::End,
            "enter" => NamedKey::Enter,
            "esc" => NamedKey::Esc,
            "backspace" => NamedKey::Backspace,
            "delete" => NamedKey::Delete,
            "space" => NamedKey::Space,
            _ => NamedKey::Unknown,
        });
        for modifier in parts {
            key = match modifier {
                "shift" => key.with_shift(),
                "ctrl" => key.with_ctrl(),
                "num" => key.with_num_pad(),
                _ => key,
            };
        }
        return Some(key);
    }
    let mut chars = token.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(Key::ascii(c))
}

fn describe(state: &InputState) -> String {
    match state {
        InputState::Empty => "empty".to_string(),
        InputState::EmptyIgnoringPrevious => "empty (ignoring previous)".to_string(),
        InputState::Committing { text } => format!("committing {text:?}"),
        InputState::Inputting { composing, cursor_utf8, tooltip, .. } => {
            let mut line = format!("inputting {composing:?} cursor={cursor_utf8}");
            if let Some(tooltip) = tooltip {
                line.push_str(&format!(" tooltip={tooltip:?}"));
            }
            line
        }
        InputState::ChoosingCandidate { composing, candidates, position, .. } => {
            let values: Vec<&str> = candidates.iter().map(|c| c.value.as_str()).collect();
            format!("choosing {composing:?} at position={position} candidates={values:?}")
        }
        InputState::Marking { head, marked, tail, acceptable, .. } => {
            format!("marking {head:?}|{marked:?}|{tail:?} acceptable={acceptable}")
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let order = match cli.order.as_str() {
        "value-first" => ColumnMode::ValueFirst,
        _ => ColumnMode::ReadingFirst,
    };
    let lm: Arc<dyn LanguageModel> = match TextLanguageModel::open(&cli.lm_file, order) {
        Ok(lm) => Arc::new(lm),
        Err(err) => {
            eprintln!("failed to open {}: {err}", cli.lm_file);
            std::process::exit(1);
        }
    };

    let mut handler = KeyHandler::new(lm, Settings::default());
    let mut state = InputState::Empty;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("read error: {err}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        for token in line.split_whitespace() {
            let Some(key) = parse_token(token) else {
                println!("? unrecognized token: {token}");
                continue;
            };
            let mut next = state.clone();
            let mut error = None;
            handler.handle(key, &state, |s| next = s, |e| error = Some(e));
            state = next;
            if let Some(error) = error {
                println!("! {error}");
            }
            println!("{}", describe(&state));
        }
        let _ = stdout.flush();
    }
}
