//! Polls a path's modification time without holding a file watcher open.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Tracks whether a path's mtime has changed since the last [`check`](Self::check).
///
/// The first call to `check` after construction always reports "not
/// different", even if the path already exists, so opening a file at
/// startup never triggers a spurious reload.
pub struct TimestampedPath {
    path: PathBuf,
    last_seen: Option<SystemTime>,
    has_checked: bool,
}

impl TimestampedPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_seen: None,
            has_checked: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mtime(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// Updates the tracked mtime and returns whether it differs from the
    /// mtime observed on the previous call (always `false` on the first call).
    pub fn check(&mut self) -> bool {
        let current = self.mtime();
        let different = if self.has_checked {
            current != self.last_seen
        } else {
            false
        };
        self.last_seen = current;
        self.has_checked = true;
        different
    }

    /// Same as `check` but without mutating state; compares against the
    /// value recorded by the most recent `check`.
    pub fn is_different_from_last_check(&self) -> bool {
        if !self.has_checked {
            return false;
        }
        self.mtime() != self.last_seen
    }
}
