//! Per-keyboard-layout key → Bopomofo component tables.
//!
//! Each layout is shipped as an embedded TOML table (`[consonant]`,
//! `[medial]`, `[vowel]`, `[tone]`) mapping a single ASCII key to the
//! Bopomofo component it produces. Tables are parsed once into a
//! process-wide registry on first use.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

/// The Bopomofo keyboard layouts this engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyboardLayout {
    Standard,
    Eten,
    Hsu,
    Eten26,
    HanyuPinyin,
    Ibm,
}

impl KeyboardLayout {
    fn raw_toml(self) -> &'static str {
        match self {
            KeyboardLayout::Standard => include_str!("tables/standard.toml"),
            KeyboardLayout::Eten => include_str!("tables/eten.toml"),
            KeyboardLayout::Hsu => include_str!("tables/hsu.toml"),
            KeyboardLayout::Eten26 => include_str!("tables/eten26.toml"),
            KeyboardLayout::HanyuPinyin => include_str!("tables/hanyu_pinyin.toml"),
            KeyboardLayout::Ibm => include_str!("tables/ibm.toml"),
        }
    }

    fn index(self) -> usize {
        match self {
            KeyboardLayout::Standard => 0,
            KeyboardLayout::Eten => 1,
            KeyboardLayout::Hsu => 2,
            KeyboardLayout::Eten26 => 3,
            KeyboardLayout::HanyuPinyin => 4,
            KeyboardLayout::Ibm => 5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LayoutConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("key {0:?} in [{1}] is not a single ASCII character")]
    InvalidKey(String, &'static str),
    #[error("duplicate key {0:?} appears in more than one section")]
    DuplicateKey(char),
}

#[derive(Deserialize)]
struct RawLayoutToml {
    #[serde(default)]
    consonant: HashMap<String, String>,
    #[serde(default)]
    medial: HashMap<String, String>,
    #[serde(default)]
    vowel: HashMap<String, String>,
    #[serde(default)]
    tone: HashMap<String, String>,
}

/// Which of the four Reading Buffer slots a component belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Consonant,
    Medial,
    Vowel,
    Tone,
}

pub(crate) struct LayoutTable {
    entries: HashMap<char, (Slot, String)>,
}

impl LayoutTable {
    fn parse(toml_str: &str) -> Result<Self, LayoutConfigError> {
        let raw: RawLayoutToml =
            toml::from_str(toml_str).map_err(|e| LayoutConfigError::Parse(e.to_string()))?;
        let mut entries = HashMap::new();
        for (section, map) in [
            ("consonant", &raw.consonant),
            ("medial", &raw.medial),
            ("vowel", &raw.vowel),
            ("tone", &raw.tone),
        ] {
            let slot = match section {
                "consonant" => Slot::Consonant,
                "medial" => Slot::Medial,
                "vowel" => Slot::Vowel,
                "tone" => Slot::Tone,
                _ => unreachable!(),
            };
            for (key, value) in map {
                let mut chars = key.chars();
                let c = match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii() => c,
                    _ => return Err(LayoutConfigError::InvalidKey(key.clone(), section)),
                };
                if entries.insert(c, (slot, value.clone())).is_some() {
                    return Err(LayoutConfigError::DuplicateKey(c));
                }
            }
        }
        Ok(Self { entries })
    }

    pub(crate) fn lookup(&self, key: char) -> Option<(Slot, &str)> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(|(slot, value)| (*slot, value.as_str()))
    }
}

static TABLES: OnceLock<[LayoutTable; 6]> = OnceLock::new();

fn tables() -> &'static [LayoutTable; 6] {
    TABLES.get_or_init(|| {
        [
            KeyboardLayout::Standard,
            KeyboardLayout::Eten,
            KeyboardLayout::Hsu,
            KeyboardLayout::Eten26,
            KeyboardLayout::HanyuPinyin,
            KeyboardLayout::Ibm,
        ]
        .map(|layout| {
            LayoutTable::parse(layout.raw_toml())
                .unwrap_or_else(|e| panic!("embedded layout table is invalid: {e}"))
        })
    })
}

pub(crate) fn table_for(layout: KeyboardLayout) -> &'static LayoutTable {
    &tables()[layout.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_embedded_tables_parse() {
        for layout in [
            KeyboardLayout::Standard,
            KeyboardLayout::Eten,
            KeyboardLayout::Hsu,
            KeyboardLayout::Eten26,
            KeyboardLayout::HanyuPinyin,
            KeyboardLayout::Ibm,
        ] {
            let table = table_for(layout);
            assert!(table.entries.len() >= 37);
        }
    }

    #[test]
    fn standard_matches_scenario_keys() {
        let table = table_for(KeyboardLayout::Standard);
        assert_eq!(table.lookup('5'), Some((Slot::Consonant, "ㄓ")));
        assert_eq!(table.lookup('j'), Some((Slot::Medial, "ㄨ")));
        assert_eq!(table.lookup('/'), Some((Slot::Vowel, "ㄥ")));
        assert_eq!(table.lookup('p'), Some((Slot::Vowel, "ㄣ")));
        assert_eq!(table.lookup('6'), Some((Slot::Tone, "ˊ")));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let table = table_for(KeyboardLayout::Standard);
        assert_eq!(table.lookup('J'), table.lookup('j'));
    }

    #[test]
    fn unknown_key_is_none() {
        let table = table_for(KeyboardLayout::Standard);
        assert_eq!(table.lookup('!'), None);
    }
}
