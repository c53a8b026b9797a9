//! The Reading Grid: a dynamic lattice of candidate word nodes spanning
//! contiguous reading positions, plus the best-path Walker over it.
//!
//! Mirrors how the reference workspace keeps lattice construction
//! (`converter::lattice`) and best-path search (`converter::viterbi`)
//! as siblings operating on one shared graph, except here the graph is
//! mutated incrementally (insert/delete/override) rather than rebuilt
//! from scratch per conversion.

mod walker;

pub use walker::{WalkResult, WalkedNode};

use std::collections::HashSet;
use std::sync::Arc;

use tracing::trace;

use crate::dict::{LanguageModel, ScoreRankedLanguageModel, Unigram};

/// Upper bound on how many consecutive readings a single Node may span.
/// Keeps span maintenance and the Walker linear in grid length.
pub const MAX_SPAN: usize = 8;

/// Sentinel score that dominates any ordinary unigram score, used so an
/// overridden Node always wins the Walker's argmax at its position.
pub const OVERRIDE_SCORE: f64 = 42.0;

/// Why a Node's active value differs from its highest-scoring unigram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideStatus {
    /// Not pinned; the active unigram is whichever the LM ranked best.
    None,
    /// The user explicitly chose this value; survives until overlapped.
    Specified,
    /// A recall suggestion elevated this value; yields to later mutation.
    HighScore,
}

/// A candidate word spanning `span_length` consecutive reading positions.
#[derive(Debug, Clone)]
pub struct Node {
    reading: String,
    span_length: usize,
    unigrams: Vec<Unigram>,
    current_index: usize,
    override_status: OverrideStatus,
    /// Construction order, used only to break Walker ties in favor of
    /// whichever node was built earlier.
    seq: u64,
}

impl Node {
    fn new(reading: String, span_length: usize, unigrams: Vec<Unigram>, seq: u64) -> Self {
        Self {
            reading,
            span_length,
            unigrams,
            current_index: 0,
            override_status: OverrideStatus::None,
            seq,
        }
    }

    pub fn reading(&self) -> &str {
        &self.reading
    }

    pub fn span_length(&self) -> usize {
        self.span_length
    }

    pub fn unigrams(&self) -> &[Unigram] {
        &self.unigrams
    }

    pub fn override_status(&self) -> OverrideStatus {
        self.override_status
    }

    pub fn active_value(&self) -> &str {
        &self.unigrams[self.current_index].value
    }

    pub fn active_score(&self) -> f64 {
        match self.override_status {
            OverrideStatus::None => self.unigrams[self.current_index].score,
            OverrideStatus::Specified | OverrideStatus::HighScore => OVERRIDE_SCORE,
        }
    }

    fn reset_override(&mut self) {
        self.override_status = OverrideStatus::None;
        self.current_index = 0;
    }
}

/// The set of Nodes starting at one reading position, keyed by length.
#[derive(Debug, Clone, Default)]
pub struct Span {
    nodes: Vec<Option<Node>>,
}

impl Span {
    fn new() -> Self {
        Self {
            nodes: vec![None; MAX_SPAN],
        }
    }

    fn get(&self, length: usize) -> Option<&Node> {
        self.nodes.get(length - 1).and_then(|n| n.as_ref())
    }

    fn get_mut(&mut self, length: usize) -> Option<&mut Node> {
        self.nodes.get_mut(length - 1).and_then(|n| n.as_mut())
    }

    fn set(&mut self, length: usize, node: Option<Node>) {
        self.nodes[length - 1] = node;
    }

    /// Largest span length with a Node present, or 0 if the span is empty.
    pub fn max_length(&self) -> usize {
        self.nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, n)| n.is_some())
            .map(|(i, _)| i + 1)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|node| (i + 1, node)))
    }
}

/// Override policy applied by [`ReadingGrid::override_candidate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverridePolicy {
    Specified,
    HighScore,
}

impl From<OverridePolicy> for OverrideStatus {
    fn from(p: OverridePolicy) -> Self {
        match p {
            OverridePolicy::Specified => OverrideStatus::Specified,
            OverridePolicy::HighScore => OverrideStatus::HighScore,
        }
    }
}

/// The dynamic lattice: a sequence of readings, each backed by a [`Span`]
/// of candidate Nodes, walked for the best segmentation after every edit.
pub struct ReadingGrid {
    lm: ScoreRankedLanguageModel<Arc<dyn LanguageModel>>,
    separator: String,
    readings: Vec<String>,
    spans: Vec<Span>,
    cursor: usize,
    seq_counter: u64,
}

impl ReadingGrid {
    pub fn new(lm: Arc<dyn LanguageModel>) -> Self {
        Self {
            lm: ScoreRankedLanguageModel::new(lm),
            separator: "-".to_string(),
            readings: Vec::new(),
            spans: Vec::new(),
            cursor: 0,
            seq_counter: 0,
        }
    }

    pub fn set_separator(&mut self, separator: impl Into<String>) {
        self.separator = separator.into();
    }

    /// Swaps the language model backing future `rebuild_node` calls.
    /// Existing Nodes are left untouched; only subsequent insertions and
    /// overrides consult the new snapshot.
    pub fn set_language_model(&mut self, lm: Arc<dyn LanguageModel>) {
        self.lm = ScoreRankedLanguageModel::new(lm);
    }

    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = position.min(self.length());
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn length(&self) -> usize {
        self.readings.len()
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn readings(&self) -> &[String] {
        &self.readings
    }

    fn join(&self, start: usize, len: usize) -> String {
        self.readings[start..start + len].join(&self.separator)
    }

    /// Builds (or clears) the Node at `(j, length)` from the current
    /// reading sequence, replacing whatever was there before.
    fn rebuild_node(&mut self, j: usize, length: usize) {
        let key = self.join(j, length);
        let unigrams = self.lm.unigrams(&key);
        if unigrams.is_empty() {
            self.spans[j].set(length, None);
            return;
        }
        self.seq_counter += 1;
        self.spans[j].set(length, Some(Node::new(key, length, unigrams, self.seq_counter)));
    }

    /// Inserts `reading` at the cursor. Fails without mutating the grid
    /// if `reading` is empty, equal to the separator, or unknown to the LM.
    pub fn insert_reading(&mut self, reading: &str) -> bool {
        if reading.is_empty() || reading == self.separator || !self.lm.has_unigrams(reading) {
            return false;
        }
        let i = self.cursor;
        self.readings.insert(i, reading.to_string());
        self.spans.insert(i, Span::new());
        self.cursor = i + 1;

        let n = self.length();
        let start_j = i.saturating_sub(MAX_SPAN - 1);
        for j in start_j..=i {
            for length in 1..=MAX_SPAN {
                if j + length > n || !(j <= i && i < j + length) {
                    continue;
                }
                self.rebuild_node(j, length);
            }
        }
        trace!(reading, i, "inserted reading into grid");
        true
    }

    /// Removes the reading immediately before the cursor.
    pub fn delete_reading_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let i = self.cursor - 1;
        self.remove_reading_at(i);
        self.cursor -= 1;
        true
    }

    /// Removes the reading immediately after the cursor.
    pub fn delete_reading_after_cursor(&mut self) -> bool {
        if self.cursor >= self.length() {
            return false;
        }
        self.remove_reading_at(self.cursor);
        true
    }

    fn remove_reading_at(&mut self, i: usize) {
        // The bound below is expressed against the length *before* removal
        // (one larger than `n`): otherwise deleting the last reading in the
        // grid (`i == n`) yields an empty `j` range and leaves now-stale
        // longer nodes at position 0 uncleared.
        let old_n = self.length();
        self.readings.remove(i);
        self.spans.remove(i);
        let n = self.length();

        let start_j = i.saturating_sub(MAX_SPAN - 1);
        let end_j = i.min(old_n - 1);
        for j in start_j..end_j {
            let min_len_removed = i - j + 1;
            for length in min_len_removed..=MAX_SPAN {
                self.spans[j].set(length, None);
            }
            for length in 1..=MAX_SPAN {
                if j + length <= n {
                    self.rebuild_node(j, length);
                }
            }
        }
        trace!(i, "removed reading from grid");
    }

    /// Pins the Node at `position` whose active-or-alternate unigram value
    /// equals `value`, choosing the shortest matching span length.
    pub fn override_candidate(&mut self, position: usize, value: &str, policy: OverridePolicy) -> bool {
        if position >= self.spans.len() {
            return false;
        }
        let mut matched_length = None;
        for length in 1..=MAX_SPAN {
            if let Some(node) = self.spans[position].get(length) {
                if let Some(idx) = node.unigrams.iter().position(|u| u.value == value) {
                    matched_length = Some((length, idx));
                    break;
                }
            }
        }
        let Some((length, idx)) = matched_length else {
            return false;
        };
        {
            let node = self.spans[position].get_mut(length).unwrap();
            node.current_index = idx;
            node.override_status = policy.into();
        }
        self.reset_overlapping_overrides(position, length);
        trace!(position, value, length, "overrode candidate");
        true
    }

    /// Clears `override_status` on every Node (other than the one just
    /// set) whose span intersects `[position, position + length)`.
    fn reset_overlapping_overrides(&mut self, position: usize, length: usize) {
        let new_start = position;
        let new_end = position + length;
        for (j, span) in self.spans.iter_mut().enumerate() {
            for l in 1..=MAX_SPAN {
                if j == position && l == length {
                    continue;
                }
                if let Some(node) = span.get_mut(l) {
                    if node.override_status == OverrideStatus::None {
                        continue;
                    }
                    let start = j;
                    let end = j + l;
                    if start < new_end && new_start < end {
                        node.reset_override();
                    }
                }
            }
        }
    }

    /// Every `(reading_key, value)` candidate covering `position`,
    /// shortest span first, then by descending score within a Node.
    pub fn candidates_at(&self, position: usize) -> Vec<(String, String)> {
        let n = self.length();
        if position >= n {
            return Vec::new();
        }
        let mut qualifying: Vec<(usize, usize)> = Vec::new();
        let start_j = position.saturating_sub(MAX_SPAN - 1);
        for j in start_j..=position {
            for length in 1..=MAX_SPAN {
                if j + length > n || position >= j + length {
                    continue;
                }
                if self.spans[j].get(length).is_some() {
                    qualifying.push((j, length));
                }
            }
        }
        qualifying.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (j, length) in qualifying {
            let node = self.spans[j].get(length).unwrap();
            for unigram in &node.unigrams {
                let key = (node.reading.clone(), unigram.value.clone());
                if seen.insert(key.clone()) {
                    out.push(key);
                }
            }
        }
        out
    }

    /// Computes the best segmentation over the full grid.
    pub fn walk(&self) -> WalkResult {
        walker::walk(&self.spans, self.length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::Unigram as U;
    use std::sync::Arc;

    struct Fixed(Vec<(&'static str, Vec<U>)>);
    impl LanguageModel for Fixed {
        fn unigrams(&self, reading: &str) -> Vec<U> {
            self.0
                .iter()
                .find(|(r, _)| *r == reading)
                .map(|(_, u)| u.clone())
                .unwrap_or_default()
        }
        fn has_unigrams(&self, reading: &str) -> bool {
            !self.unigrams(reading).is_empty()
        }
    }

    fn demo_lm() -> Arc<dyn LanguageModel> {
        Arc::new(Fixed(vec![
            ("ㄍㄠ", vec![U { value: "高".into(), score: -5.0 }]),
            ("ㄎㄜ", vec![U { value: "科".into(), score: -5.0 }]),
            ("ㄐㄧˋ", vec![U { value: "技".into(), score: -5.0 }]),
            (
                "ㄍㄠ-ㄎㄜ-ㄐㄧˋ",
                vec![U { value: "高科技".into(), score: -9.84 }],
            ),
            ("ㄍㄨㄥ", vec![U { value: "公".into(), score: -5.0 }]),
            ("ㄙ", vec![U { value: "司".into(), score: -5.0 }]),
            ("ㄍㄨㄥ-ㄙ", vec![U { value: "公司".into(), score: -6.30 }]),
            ("ㄉㄜ˙", vec![U { value: "的".into(), score: -3.0 }]),
            ("ㄋㄧㄢˊ", vec![U { value: "年".into(), score: -5.0 }]),
            ("ㄓㄨㄥ", vec![U { value: "中".into(), score: -5.0 }]),
            (
                "ㄋㄧㄢˊ-ㄓㄨㄥ",
                vec![
                    U { value: "年中".into(), score: -11.37 },
                    U { value: "年終".into(), score: -11.67 },
                ],
            ),
            ("ㄐㄧㄤˇ", vec![U { value: "獎".into(), score: -5.0 }]),
            ("ㄐㄧㄣ", vec![U { value: "金".into(), score: -5.0 }]),
            (
                "ㄐㄧㄤˇ-ㄐㄧㄣ",
                vec![U { value: "獎金".into(), score: -10.34 }],
            ),
        ]))
    }

    fn push_all(grid: &mut ReadingGrid, readings: &[&str]) {
        for r in readings {
            assert!(grid.insert_reading(r), "insert {r} should succeed");
        }
    }

    #[test]
    fn insert_rejects_unknown_reading() {
        let mut grid = ReadingGrid::new(demo_lm());
        assert!(!grid.insert_reading("ㄅㄨˋㄘㄨㄣˊㄗㄞˋ"));
        assert_eq!(grid.length(), 0);
    }

    #[test]
    fn insert_rejects_empty_and_separator() {
        let mut grid = ReadingGrid::new(demo_lm());
        assert!(!grid.insert_reading(""));
        assert!(!grid.insert_reading("-"));
    }

    #[test]
    fn span_bound_never_exceeds_max_span() {
        let mut grid = ReadingGrid::new(demo_lm());
        push_all(
            &mut grid,
            &[
                "ㄍㄠ", "ㄎㄜ", "ㄐㄧˋ", "ㄍㄨㄥ", "ㄙ", "ㄉㄜ˙", "ㄋㄧㄢˊ", "ㄓㄨㄥ", "ㄐㄧㄤˇ", "ㄐㄧㄣ",
            ],
        );
        for span in grid.spans() {
            assert!(span.max_length() <= MAX_SPAN);
        }
    }

    #[test]
    fn walk_produces_expected_segmentation() {
        let mut grid = ReadingGrid::new(demo_lm());
        push_all(
            &mut grid,
            &[
                "ㄍㄠ", "ㄎㄜ", "ㄐㄧˋ", "ㄍㄨㄥ", "ㄙ", "ㄉㄜ˙", "ㄋㄧㄢˊ", "ㄓㄨㄥ", "ㄐㄧㄤˇ", "ㄐㄧㄣ",
            ],
        );
        let result = grid.walk();
        let values: Vec<&str> = result.nodes.iter().map(|n| n.value.as_str()).collect();
        assert_eq!(values, vec!["高科技", "公司", "的", "年中", "獎金"]);
    }

    #[test]
    fn override_pins_value_and_resets_overlap() {
        let mut grid = ReadingGrid::new(demo_lm());
        push_all(
            &mut grid,
            &[
                "ㄍㄠ", "ㄎㄜ", "ㄐㄧˋ", "ㄍㄨㄥ", "ㄙ", "ㄉㄜ˙", "ㄋㄧㄢˊ", "ㄓㄨㄥ", "ㄐㄧㄤˇ", "ㄐㄧㄣ",
            ],
        );
        // position of 年中/年終 is index 6 (0-based: ㄍㄠ ㄎㄜ ㄐㄧˋ ㄍㄨㄥ ㄙ ㄉㄜ˙ ㄋㄧㄢˊ ...)
        let position = 6;
        assert!(grid.override_candidate(position, "年終", OverridePolicy::Specified));
        let result = grid.walk();
        let values: Vec<&str> = result.nodes.iter().map(|n| n.value.as_str()).collect();
        assert_eq!(values, vec!["高科技", "公司", "的", "年終", "獎金"]);

        // A single-syllable override at the same start position overlaps
        // the two-syllable node and must clear it back to NONE.
        assert!(grid.override_candidate(position, "年", OverridePolicy::Specified));
        let node = grid.spans()[position].get(2).unwrap();
        assert_eq!(node.override_status(), OverrideStatus::None);
    }

    #[test]
    fn delete_before_cursor_shrinks_grid_and_rewalks_cleanly() {
        let mut grid = ReadingGrid::new(demo_lm());
        push_all(&mut grid, &["ㄍㄨㄥ", "ㄙ"]);
        assert_eq!(grid.length(), 2);
        assert!(grid.delete_reading_before_cursor());
        assert_eq!(grid.length(), 1);
        let result = grid.walk();
        assert_eq!(result.nodes.len(), 1);
        assert_eq!(result.nodes[0].value, "公");
    }

    #[test]
    fn empty_grid_walks_to_empty_covering() {
        let grid = ReadingGrid::new(demo_lm());
        let result = grid.walk();
        assert!(result.nodes.is_empty());
    }

    #[test]
    fn candidates_at_lists_shortest_span_first() {
        let mut grid = ReadingGrid::new(demo_lm());
        push_all(&mut grid, &["ㄋㄧㄢˊ", "ㄓㄨㄥ"]);
        let candidates = grid.candidates_at(0);
        // length-1 node ("年") must precede the length-2 node's entries.
        assert_eq!(candidates[0], ("ㄋㄧㄢˊ".to_string(), "年".to_string()));
        assert!(candidates
            .iter()
            .any(|(reading, value)| reading == "ㄋㄧㄢˊ-ㄓㄨㄥ" && value == "年中"));
    }

    #[test]
    fn large_repeated_reading_walks_quickly() {
        let lm: Arc<dyn LanguageModel> = Arc::new(Fixed(vec![
            ("ㄧ", vec![U { value: "一".into(), score: -2.08 }]),
            (
                "ㄧ-ㄧ",
                vec![U { value: "一一".into(), score: -4.38 }],
            ),
        ]));
        let mut grid = ReadingGrid::new(lm);
        for _ in 0..8001 {
            assert!(grid.insert_reading("ㄧ"));
        }
        let start = std::time::Instant::now();
        let result = grid.walk();
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
        let covered: usize = result.nodes.iter().map(|n| n.span_length).sum();
        assert_eq!(covered, 8001);
    }
}
