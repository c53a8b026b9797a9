//! A [`LanguageModel`] backed by a two-column text file, mapped read-only
//! and parsed once into an in-memory index.
//!
//! File format: one entry per line, `<reading> <value> <score>` or
//! `<value> <reading> <score>` depending on [`ColumnMode`]. Lines starting
//! with `#` and blank lines are ignored. A trailing NUL byte is tolerated.

use std::collections::HashMap;
use std::path::Path;

use memmap2::Mmap;

use super::{DictError, LanguageModel, Unigram};

/// Column order used by a given LM text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMode {
    /// `<reading> <value> <score>`
    ReadingFirst,
    /// `<value> <reading> <score>`
    ValueFirst,
}

/// Maximum number of [`ParseIssue`]s a single parse run will collect.
pub const MAX_ISSUES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseIssueKind {
    NullCharacterInText,
    MissingSecondColumn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    pub kind: ParseIssueKind,
    pub line: usize,
}

/// A text-file-backed language model. Holds the mmap alive for the
/// model's lifetime and an index of `reading -> unigrams` built on load.
pub struct TextLanguageModel {
    _mmap: Option<Mmap>,
    index: HashMap<String, Vec<Unigram>>,
    issues: Vec<ParseIssue>,
}

impl TextLanguageModel {
    /// Loads and parses a LM text file, memory-mapping it read-only.
    pub fn open(path: impl AsRef<Path>, mode: ColumnMode) -> Result<Self, DictError> {
        let file = std::fs::File::open(path.as_ref())?;
        // SAFETY: the file is treated as immutable for the lifetime of this
        // model; callers are expected not to mutate it out from under us.
        let mmap = unsafe { Mmap::map(&file)? };
        let text = String::from_utf8_lossy(&mmap).into_owned();
        let (index, issues) = parse_text(&text, mode);
        Ok(Self {
            _mmap: Some(mmap),
            index,
            issues,
        })
    }

    /// Parses an in-memory string directly, without mapping a file. Used
    /// by tests and by callers that already hold the text in memory.
    pub fn from_str(text: &str, mode: ColumnMode) -> Self {
        let (index, issues) = parse_text(text, mode);
        Self {
            _mmap: None,
            index,
            issues,
        }
    }

    /// Issues collected while parsing, capped at [`MAX_ISSUES`].
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    pub fn entry_count(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }

    pub fn reading_count(&self) -> usize {
        self.index.len()
    }

    /// Iterates every `(reading, unigram)` pair held by this model, in
    /// unspecified order. Used by tooling that re-serializes a model to a
    /// text file (e.g. merging two LM files down to their shared readings).
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Unigram)> {
        self.index.iter().flat_map(|(reading, unigrams)| unigrams.iter().map(move |u| (reading.as_str(), u)))
    }
}

fn parse_text(text: &str, mode: ColumnMode) -> (HashMap<String, Vec<Unigram>>, Vec<ParseIssue>) {
    let mut index: HashMap<String, Vec<Unigram>> = HashMap::new();
    let mut issues = Vec::new();

    for (line_idx, raw_line) in text.lines().enumerate() {
        let line_no = line_idx + 1;
        // A trailing NUL is tolerated; strip it before further parsing.
        let line = raw_line.trim_end_matches('\0');
        if line.contains('\0') {
            push_issue(&mut issues, ParseIssueKind::NullCharacterInText, line_no);
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut columns = trimmed.split_whitespace();
        let first = columns.next();
        let second = columns.next();
        let third = columns.next();

        let (Some(first), Some(second)) = (first, second) else {
            push_issue(&mut issues, ParseIssueKind::MissingSecondColumn, line_no);
            continue;
        };
        let score: f64 = third.and_then(|s| s.parse().ok()).unwrap_or(0.0);

        let (reading, value) = match mode {
            ColumnMode::ReadingFirst => (first, second),
            ColumnMode::ValueFirst => (second, first),
        };

        index
            .entry(reading.to_string())
            .or_default()
            .push(Unigram {
                value: value.to_string(),
                score,
            });
    }

    (index, issues)
}

fn push_issue(issues: &mut Vec<ParseIssue>, kind: ParseIssueKind, line: usize) {
    if issues.len() < MAX_ISSUES {
        issues.push(ParseIssue { kind, line });
    }
}

impl LanguageModel for TextLanguageModel {
    fn unigrams(&self, reading: &str) -> Vec<Unigram> {
        self.index.get(reading).cloned().unwrap_or_default()
    }

    fn has_unigrams(&self, reading: &str) -> bool {
        self.index.contains_key(reading)
    }
}
