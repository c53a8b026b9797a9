//! Language-model storage: the two-method query capability the Grid
//! consumes, a text-file-backed implementation, and a composing layer
//! that merges built-in data with user overlays.

mod composite;
mod text_model;
mod user_phrases;

pub use composite::CompositeLanguageModel;
pub use text_model::{ColumnMode, ParseIssue, ParseIssueKind, TextLanguageModel, MAX_ISSUES};
pub use user_phrases::UserPhraseStore;

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("parse error: {0}")]
    Parse(String),
}

/// A value under a reading, with a log-probability score; more negative
/// is worse. Values under a given reading are returned in arbitrary order.
#[derive(Debug, Clone, PartialEq)]
pub struct Unigram {
    pub value: String,
    pub score: f64,
}

/// The minimal language-model contract consumed by the Reading Grid.
pub trait LanguageModel: Send + Sync {
    fn unigrams(&self, reading: &str) -> Vec<Unigram>;
    fn has_unigrams(&self, reading: &str) -> bool;
}

/// Lets the Grid hold a model behind an `Arc` (shared, possibly a trait
/// object) without needing a second, parallel set of bounds everywhere.
impl<T: LanguageModel + ?Sized> LanguageModel for std::sync::Arc<T> {
    fn unigrams(&self, reading: &str) -> Vec<Unigram> {
        (**self).unigrams(reading)
    }

    fn has_unigrams(&self, reading: &str) -> bool {
        (**self).has_unigrams(reading)
    }
}

/// Decorator that re-sorts an inner model's unigrams by descending score,
/// stable within equal scores.
pub struct ScoreRankedLanguageModel<L> {
    inner: L,
}

impl<L> ScoreRankedLanguageModel<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

impl<L: LanguageModel> LanguageModel for ScoreRankedLanguageModel<L> {
    fn unigrams(&self, reading: &str) -> Vec<Unigram> {
        let mut unigrams = self.inner.unigrams(reading);
        unigrams.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        unigrams
    }

    fn has_unigrams(&self, reading: &str) -> bool {
        self.inner.has_unigrams(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<(&'static str, Vec<Unigram>)>);
    impl LanguageModel for Fixed {
        fn unigrams(&self, reading: &str) -> Vec<Unigram> {
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

    #[test]
    fn score_ranked_sorts_descending() {
        let model = ScoreRankedLanguageModel::new(Fixed(vec![(
            "a",
            vec![
                Unigram { value: "low".into(), score: -5.0 },
                Unigram { value: "high".into(), score: -1.0 },
                Unigram { value: "mid".into(), score: -3.0 },
            ],
        )]));
        let ranked = model.unigrams("a");
        let values: Vec<&str> = ranked.iter().map(|u| u.value.as_str()).collect();
        assert_eq!(values, vec!["high", "mid", "low"]);
    }
}
