//! Recall of recently selected candidates, applied as HIGH_SCORE grid
//! overrides so identical context reproduces a past user choice without
//! pinning it as hard as an explicit [`crate::grid::OverridePolicy::Specified`]
//! selection would.
//!
//! The eviction discipline (bounded map, drop the least-recently-observed
//! entry once at capacity) mirrors how the reference workspace bounds its
//! own conversion-history store; unlike that store this is a pure
//! recency/decay hint cache, not a frequency-weighted statistical model,
//! so there is no persisted format and no boost scoring — only "still
//! fresh, or not".

use std::collections::HashMap;

/// Default LRU capacity, matching the reference recall model's sizing.
pub const DEFAULT_CAPACITY: usize = 500;

/// Default decay window, in seconds, past which a suggestion is stale.
pub const DEFAULT_DECAY_SECONDS: u64 = 5400;

struct Entry {
    value: String,
    timestamp: u64,
    /// Monotonic sequence number refreshed on every `observe`; eviction
    /// removes whichever entry has the smallest `seq`.
    seq: u64,
}

/// A bounded LRU from context signature to the last value observed there.
pub struct UserOverrideRecall {
    capacity: usize,
    decay_seconds: u64,
    entries: HashMap<String, Entry>,
    seq_counter: u64,
}

impl UserOverrideRecall {
    pub fn new(capacity: usize, decay_seconds: u64) -> Self {
        Self {
            capacity,
            decay_seconds,
            entries: HashMap::new(),
            seq_counter: 0,
        }
    }

    /// Builds the context key from the preceding walked node values plus
    /// the reading being selected at. `preceding` is typically the tail of
    /// the prior walk's node values immediately before the selection point.
    pub fn context_key(preceding: &[&str], reading: &str) -> String {
        let mut key = preceding.join("\u{1}");
        if !key.is_empty() {
            key.push('\u{1}');
        }
        key.push_str(reading);
        key
    }

    /// Records that `value` was chosen for `context` at `now` (unix seconds).
    pub fn observe(&mut self, context: &str, value: &str, now: u64) {
        self.seq_counter += 1;
        let seq = self.seq_counter;
        if let Some(entry) = self.entries.get_mut(context) {
            entry.value = value.to_string();
            entry.timestamp = now;
            entry.seq = seq;
            return;
        }
        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(
            context.to_string(),
            Entry {
                value: value.to_string(),
                timestamp: now,
                seq,
            },
        );
    }

    /// Returns the recalled value for `context`, unless it predates the
    /// decay window measured from `now`.
    pub fn suggest(&self, context: &str, now: u64) -> Option<&str> {
        let entry = self.entries.get(context)?;
        if now.saturating_sub(entry.timestamp) > self.decay_seconds {
            return None;
        }
        Some(&entry.value)
    }

    fn evict_oldest(&mut self) {
        let Some(oldest_key) = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.seq)
            .map(|(key, _)| key.clone())
        else {
            return;
        };
        self.entries.remove(&oldest_key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for UserOverrideRecall {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_DECAY_SECONDS)
    }
}
