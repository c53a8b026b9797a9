use std::sync::{Arc, RwLock};

use bopomofo_core::dict::{ColumnMode, CompositeLanguageModel, TextLanguageModel, UserPhraseStore};
use bopomofo_core::LanguageModel;

use super::BopomofoError;

#[derive(uniffi::Object)]
pub struct BopomofoLanguageModel {
    pub(crate) inner: Arc<dyn LanguageModel>,
}

#[uniffi::export]
impl BopomofoLanguageModel {
    /// Opens a two-column LM text file. `value_first` selects the column
    /// order; `false` (the default on disk) is `<reading> <value> <score>`.
    #[uniffi::constructor]
    fn open_text(path: String, value_first: bool) -> Result<Arc<Self>, BopomofoError> {
        let mode = if value_first { ColumnMode::ValueFirst } else { ColumnMode::ReadingFirst };
        let lm = TextLanguageModel::open(&path, mode)?;
        Ok(Arc::new(Self { inner: Arc::new(lm) }))
    }

    /// Layers a user-phrase overlay in front of this model.
    fn with_overlay(&self, overlay: Arc<BopomofoUserPhraseStore>) -> Arc<Self> {
        Arc::new(Self {
            inner: Arc::new(CompositeLanguageModel::new(Arc::clone(&self.inner), Arc::clone(&overlay.inner))),
        })
    }
}

/// File-backed user phrase overlay (additions, exclusions, replacements).
#[derive(uniffi::Object)]
pub struct BopomofoUserPhraseStore {
    pub(crate) inner: Arc<RwLock<UserPhraseStore>>,
}

#[uniffi::export]
impl BopomofoUserPhraseStore {
    #[uniffi::constructor]
    fn open(data_path: String, exclude_path: String, replacement_path: String) -> Result<Arc<Self>, BopomofoError> {
        let store = UserPhraseStore::open(data_path, exclude_path, replacement_path)?;
        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(store)) }))
    }

    fn add_phrase(&self, value: String, reading: String) -> Result<(), BopomofoError> {
        self.inner.write().expect("user phrase overlay poisoned").add_phrase(&value, &reading)?;
        Ok(())
    }

    fn remove_phrase(&self, value: String, reading: String) -> Result<bool, BopomofoError> {
        Ok(self.inner.write().expect("user phrase overlay poisoned").remove_phrase(&value, &reading)?)
    }

    fn reload(&self) -> Result<(), BopomofoError> {
        self.inner.write().expect("user phrase overlay poisoned").reload()?;
        Ok(())
    }
}
