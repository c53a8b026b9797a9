//! File-backed user phrase overlay: additions (`data.txt`), exclusions
//! (`exclude-phrases.txt`), and an optional phrase-replacement map
//! (`phrases-replacement.txt`). Each file is `<value> <reading>` per line
//! (`<from> <to>` for the replacement map), comments start with `#`.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{DictError, LanguageModel, Unigram};

/// One user-added `(value, reading)` pair, with a synthetic score that
/// ranks user phrases above typical built-in unigrams.
const USER_PHRASE_SCORE: f64 = 0.0;

pub struct UserPhraseStore {
    data_path: PathBuf,
    exclude_path: PathBuf,
    replacement_path: PathBuf,
    additions: HashMap<String, Vec<String>>,
    exclusions: HashSet<(String, String)>,
    replacements: HashMap<String, String>,
}

impl UserPhraseStore {
    pub fn open(
        data_path: impl Into<PathBuf>,
        exclude_path: impl Into<PathBuf>,
        replacement_path: impl Into<PathBuf>,
    ) -> Result<Self, DictError> {
        let data_path = data_path.into();
        let exclude_path = exclude_path.into();
        let replacement_path = replacement_path.into();
        let additions = load_pairs(&data_path)?
            .into_iter()
            .fold(HashMap::new(), |mut map, (value, reading)| {
                map.entry(reading).or_insert_with(Vec::new).push(value);
                map
            });
        let exclusions = load_pairs(&exclude_path)?.into_iter().collect();
        let replacements = load_pairs(&replacement_path)?.into_iter().collect();
        Ok(Self {
            data_path,
            exclude_path,
            replacement_path,
            additions,
            exclusions,
            replacements,
        })
    }

    /// Reloads all three overlay files from disk in place, discarding
    /// whatever was previously loaded. Used when the host's timestamp
    /// polling detects a change.
    pub fn reload(&mut self) -> Result<(), DictError> {
        *self = Self::open(
            self.data_path.clone(),
            self.exclude_path.clone(),
            self.replacement_path.clone(),
        )?;
        Ok(())
    }

    /// Appends `value reading` to `data.txt`, preceded by a newline if the
    /// file doesn't already end with one. Also clears any matching exclusion.
    pub fn add_phrase(&mut self, value: &str, reading: &str) -> Result<(), DictError> {
        append_line(&self.data_path, value, reading)?;
        self.additions
            .entry(reading.to_string())
            .or_insert_with(Vec::new)
            .push(value.to_string());
        self.exclusions.remove(&(value.to_string(), reading.to_string()));
        Ok(())
    }

    /// Removes a `value reading` pair via a sibling `.tmp` + atomic rename.
    /// If nothing matched, the temp file is deleted and this is a no-op.
    pub fn remove_phrase(&mut self, value: &str, reading: &str) -> Result<bool, DictError> {
        let removed = remove_pair_from_file(&self.data_path, value, reading)?;
        if removed {
            if let Some(values) = self.additions.get_mut(reading) {
                values.retain(|v| v != value);
            }
        }
        Ok(removed)
    }

    pub fn replacement_for(&self, value: &str) -> Option<&str> {
        self.replacements.get(value).map(String::as_str)
    }

    /// Whether `(value, reading)` has been excluded, regardless of which
    /// layer originally supplied it.
    pub fn is_excluded(&self, value: &str, reading: &str) -> bool {
        self.exclusions
            .contains(&(value.to_string(), reading.to_string()))
    }
}

impl LanguageModel for UserPhraseStore {
    fn unigrams(&self, reading: &str) -> Vec<Unigram> {
        self.additions
            .get(reading)
            .map(|values| {
                values
                    .iter()
                    .filter(|v| !self.exclusions.contains(&((*v).clone(), reading.to_string())))
                    .map(|v| Unigram {
                        value: v.clone(),
                        score: USER_PHRASE_SCORE,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn has_unigrams(&self, reading: &str) -> bool {
        !self.unigrams(reading).is_empty()
    }
}

fn load_pairs(path: &Path) -> Result<Vec<(String, String)>, DictError> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Ok(Vec::new());
    };
    let mut pairs = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut columns = trimmed.split_whitespace();
        if let (Some(a), Some(b)) = (columns.next(), columns.next()) {
            pairs.push((a.to_string(), b.to_string()));
        }
    }
    Ok(pairs)
}

fn append_line(path: &Path, first: &str, second: &str) -> Result<(), DictError> {
    let existing = std::fs::read_to_string(path).unwrap_or_default();
    let needs_leading_newline = !existing.is_empty() && !existing.ends_with('\n');
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    if needs_leading_newline {
        writeln!(file)?;
    }
    writeln!(file, "{first} {second}")?;
    Ok(())
}

fn remove_pair_from_file(path: &Path, first: &str, second: &str) -> Result<bool, DictError> {
    let Ok(existing) = std::fs::read_to_string(path) else {
        return Ok(false);
    };
    let mut removed = false;
    let mut kept_lines = Vec::new();
    for line in existing.lines() {
        let trimmed = line.trim();
        let mut columns = trimmed.split_whitespace();
        let matches = columns.next() == Some(first) && columns.next() == Some(second);
        if matches && !trimmed.starts_with('#') {
            removed = true;
        } else {
            kept_lines.push(line);
        }
    }

    if !removed {
        return Ok(false);
    }

    let tmp_path = path.with_extension("tmp");
    let mut joined = kept_lines.join("\n");
    if !joined.is_empty() {
        joined.push('\n');
    }
    std::fs::write(&tmp_path, joined)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = UserPhraseStore::open(
            dir.path().join("data.txt"),
            dir.path().join("exclude-phrases.txt"),
            dir.path().join("phrases-replacement.txt"),
        )
        .unwrap();
        store.add_phrase("年終", "ㄋㄧㄢˊㄓㄨㄥ").unwrap();
        assert!(store.has_unigrams("ㄋㄧㄢˊㄓㄨㄥ"));
        assert_eq!(store.unigrams("ㄋㄧㄢˊㄓㄨㄥ")[0].value, "年終");
    }

    #[test]
    fn append_precedes_with_newline_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("data.txt");
        std::fs::write(&data_path, "existing line without trailing newline").unwrap();
        let mut store = UserPhraseStore::open(
            data_path.clone(),
            dir.path().join("exclude-phrases.txt"),
            dir.path().join("phrases-replacement.txt"),
        )
        .unwrap();
        store.add_phrase("年終", "ㄋㄧㄢˊㄓㄨㄥ").unwrap();
        let content = std::fs::read_to_string(&data_path).unwrap();
        assert_eq!(
            content,
            "existing line without trailing newline\n年終 ㄋㄧㄢˊㄓㄨㄥ\n"
        );
    }

    #[test]
    fn remove_rewrites_via_tmp_and_rename() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("data.txt");
        std::fs::write(&data_path, "年終 ㄋㄧㄢˊㄓㄨㄥ\n年中 ㄋㄧㄢˊㄓㄨㄥ\n").unwrap();
        let mut store = UserPhraseStore::open(
            data_path.clone(),
            dir.path().join("exclude-phrases.txt"),
            dir.path().join("phrases-replacement.txt"),
        )
        .unwrap();
        let removed = store.remove_phrase("年終", "ㄋㄧㄢˊㄓㄨㄥ").unwrap();
        assert!(removed);
        assert!(!dir.path().join("data.tmp").exists());
        let content = std::fs::read_to_string(&data_path).unwrap();
        assert_eq!(content, "年中 ㄋㄧㄢˊㄓㄨㄥ\n");
        let values = store.unigrams("ㄋㄧㄢˊㄓㄨㄥ");
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].value, "年中");
    }

    #[test]
    fn remove_no_match_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("data.txt");
        std::fs::write(&data_path, "年中 ㄋㄧㄢˊㄓㄨㄥ\n").unwrap();
        let mut store = UserPhraseStore::open(
            data_path.clone(),
            dir.path().join("exclude-phrases.txt"),
            dir.path().join("phrases-replacement.txt"),
        )
        .unwrap();
        let removed = store.remove_phrase("不存在", "ㄅㄨˋㄘㄨㄣˊㄗㄞˋ").unwrap();
        assert!(!removed);
    }

    #[test]
    fn exclusions_filter_out_additions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.txt"), "年終 ㄋㄧㄢˊㄓㄨㄥ\n").unwrap();
        std::fs::write(
            dir.path().join("exclude-phrases.txt"),
            "年終 ㄋㄧㄢˊㄓㄨㄥ\n",
        )
        .unwrap();
        let store = UserPhraseStore::open(
            dir.path().join("data.txt"),
            dir.path().join("exclude-phrases.txt"),
            dir.path().join("phrases-replacement.txt"),
        )
        .unwrap();
        assert!(!store.has_unigrams("ㄋㄧㄢˊㄓㄨㄥ"));
    }

    #[test]
    fn replacement_map_is_queryable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("phrases-replacement.txt"), "年終 年终\n").unwrap();
        let store = UserPhraseStore::open(
            dir.path().join("data.txt"),
            dir.path().join("exclude-phrases.txt"),
            dir.path().join("phrases-replacement.txt"),
        )
        .unwrap();
        assert_eq!(store.replacement_for("年終"), Some("年终"));
        assert_eq!(store.replacement_for("無"), None);
    }
}
