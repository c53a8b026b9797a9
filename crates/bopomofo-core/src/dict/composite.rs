//! Merges a built-in [`LanguageModel`] with a user-phrase overlay.
//!
//! Layers are consulted in priority order — user overlay first, then the
//! exclusion set (applied to every layer's output), then the built-in
//! model — mirroring how the reference workspace composes a
//! `CompositeDictionary` out of independent `Dictionary` layers rather
//! than hard-coding the merge into one monolithic type.

use std::sync::{Arc, RwLock};

use super::{LanguageModel, Unigram, UserPhraseStore};

pub struct CompositeLanguageModel {
    builtin: Arc<dyn LanguageModel>,
    overlay: Arc<RwLock<UserPhraseStore>>,
}

impl CompositeLanguageModel {
    pub fn new(builtin: Arc<dyn LanguageModel>, overlay: Arc<RwLock<UserPhraseStore>>) -> Self {
        Self { builtin, overlay }
    }
}

impl LanguageModel for CompositeLanguageModel {
    fn unigrams(&self, reading: &str) -> Vec<Unigram> {
        let overlay = self.overlay.read().expect("user phrase overlay poisoned");

        let mut seen = std::collections::HashSet::new();
        let mut merged: Vec<Unigram> = Vec::new();

        for u in overlay.unigrams(reading) {
            if seen.insert(u.value.clone()) {
                merged.push(u);
            }
        }
        for u in self.builtin.unigrams(reading) {
            if overlay.is_excluded(&u.value, reading) {
                continue;
            }
            if let Some(replacement) = overlay.replacement_for(&u.value) {
                if seen.insert(replacement.to_string()) {
                    merged.push(Unigram {
                        value: replacement.to_string(),
                        score: u.score,
                    });
                }
                continue;
            }
            if seen.insert(u.value.clone()) {
                merged.push(u);
            }
        }
        merged
    }

    fn has_unigrams(&self, reading: &str) -> bool {
        !self.unigrams(reading).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::Unigram as U;

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

    fn empty_overlay() -> Arc<RwLock<UserPhraseStore>> {
        overlay_in(&tempfile::tempdir().unwrap())
    }

    fn overlay_in(dir: &tempfile::TempDir) -> Arc<RwLock<UserPhraseStore>> {
        Arc::new(RwLock::new(
            UserPhraseStore::open(
                dir.path().join("data.txt"),
                dir.path().join("exclude-phrases.txt"),
                dir.path().join("phrases-replacement.txt"),
            )
            .unwrap(),
        ))
    }

    #[test]
    fn user_overlay_takes_priority_and_builtin_fills_in() {
        let builtin: Arc<dyn LanguageModel> = Arc::new(Fixed(vec![(
            "ㄋㄧㄢˊㄓㄨㄥ",
            vec![
                U { value: "年中".into(), score: -11.37 },
                U { value: "年終".into(), score: -11.67 },
            ],
        )]));
        let overlay = empty_overlay();
        overlay
            .write()
            .unwrap()
            .add_phrase("年終", "ㄋㄧㄢˊㄓㄨㄥ")
            .unwrap();

        let composite = CompositeLanguageModel::new(builtin, overlay);
        let values: Vec<&str> = composite
            .unigrams("ㄋㄧㄢˊㄓㄨㄥ")
            .iter()
            .map(|u| u.value.as_str())
            .collect();
        assert_eq!(values, vec!["年終", "年中"]);
    }

    #[test]
    fn excluded_builtin_entries_are_dropped() {
        let builtin: Arc<dyn LanguageModel> = Arc::new(Fixed(vec![(
            "ㄋㄧㄢˊㄓㄨㄥ",
            vec![U { value: "年終".into(), score: -11.67 }],
        )]));
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("exclude-phrases.txt"), "年終 ㄋㄧㄢˊㄓㄨㄥ\n").unwrap();
        let overlay = overlay_in(&dir);

        let composite = CompositeLanguageModel::new(builtin, overlay);
        assert!(!composite.has_unigrams("ㄋㄧㄢˊㄓㄨㄥ"));
    }
}
