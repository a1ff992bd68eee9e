//! Translation model boundary.
//!
//! The model maps a `[1, N]` token-id tensor to an output id sequence. Resources are
//! loaded once through a [`ModelLoader`].

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::vocab::Vocabulary;
use crate::constants::{SOURCE_VOCAB_FILE, TARGET_VOCAB_FILE, TRANSLATOR_MODEL_FILE};
use crate::error::TranslationError;

/// Sequence-to-sequence inference over token ids.
pub trait TranslationModel: Send + Sync {
    fn infer(&self, input_ids: &[i64]) -> Result<Vec<i64>>;
}

/// Everything the model path needs, loaded together.
pub struct LoadedModel {
    pub model: Box<dyn TranslationModel>,
    pub source_vocab: Vocabulary,
    pub target_vocab: Vocabulary,
}

/// Loads model resources. Called at most once per translation service.
pub trait ModelLoader: Send + Sync {
    fn load(&self) -> Result<LoadedModel, TranslationError>;
}

/// Loads `translator.onnx` and the two vocabulary tables from one directory.
#[derive(Debug, Clone)]
pub struct FileModelLoader {
    dir: PathBuf,
}

impl FileModelLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(TRANSLATOR_MODEL_FILE)
    }
}

impl ModelLoader for FileModelLoader {
    fn load(&self) -> Result<LoadedModel, TranslationError> {
        let model_path = self.model_path();
        if !model_path.exists() {
            return Err(TranslationError::ModelMissing(model_path));
        }

        let source_vocab = Vocabulary::load(&self.dir.join(SOURCE_VOCAB_FILE))?;
        let target_vocab = Vocabulary::load(&self.dir.join(TARGET_VOCAB_FILE))?;
        let model = open_model(&model_path)?;

        Ok(LoadedModel {
            model,
            source_vocab,
            target_vocab,
        })
    }
}

#[cfg(feature = "onnx")]
fn open_model(path: &Path) -> Result<Box<dyn TranslationModel>, TranslationError> {
    let model = onnx::OnnxTranslator::load(path).map_err(TranslationError::Inference)?;
    Ok(Box::new(model))
}

#[cfg(not(feature = "onnx"))]
fn open_model(_path: &Path) -> Result<Box<dyn TranslationModel>, TranslationError> {
    Err(TranslationError::BackendUnavailable)
}

#[cfg(feature = "onnx")]
pub use onnx::OnnxTranslator;

#[cfg(feature = "onnx")]
mod onnx {
    use std::borrow::Cow;
    use std::path::Path;

    use anyhow::{Context, Result};
    use ort::session::{Session, SessionInputs};
    use ort::value::TensorRef;
    use parking_lot::Mutex;

    use super::TranslationModel;
    use crate::constants::{MODEL_INPUT_NAME, MODEL_OUTPUT_NAME};

    /// ONNX Runtime session for the translator model.
    pub struct OnnxTranslator {
        session: Mutex<Session>,
    }

    impl OnnxTranslator {
        pub fn load(path: &Path) -> Result<Self> {
            let session = Session::builder()?
                .commit_from_file(path)
                .with_context(|| format!("failed to create ONNX session from {}", path.display()))?;
            Ok(Self {
                session: Mutex::new(session),
            })
        }
    }

    impl TranslationModel for OnnxTranslator {
        fn infer(&self, input_ids: &[i64]) -> Result<Vec<i64>> {
            let dims = vec![1_i64, input_ids.len() as i64];
            let tensor = TensorRef::from_array_view((dims, input_ids))?;
            let inputs: SessionInputs<'_, '_, 0> =
                SessionInputs::ValueMap(vec![(Cow::Borrowed(MODEL_INPUT_NAME), tensor.into())]);

            let mut session = self.session.lock();
            let outputs = session.run(inputs)?;
            let value = &outputs[MODEL_OUTPUT_NAME];

            // Exported models differ in id width.
            if let Ok((_, ids)) = value.try_extract_tensor::<i64>() {
                return Ok(ids.to_vec());
            }
            let (_, ids) = value.try_extract_tensor::<i32>()?;
            Ok(ids.iter().map(|&id| i64::from(id)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_file_is_reported() {
        let dir = std::env::temp_dir().join(format!("sc_snip_no_model_{}", std::process::id()));
        let loader = FileModelLoader::new(&dir);
        match loader.load() {
            Err(TranslationError::ModelMissing(path)) => {
                assert_eq!(path, dir.join(TRANSLATOR_MODEL_FILE))
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("model should be missing"),
        }
    }

    #[test]
    fn missing_vocabulary_is_reported() {
        let dir = std::env::temp_dir().join(format!("sc_snip_no_vocab_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(TRANSLATOR_MODEL_FILE), b"not a model").unwrap();

        let result = FileModelLoader::new(&dir).load();
        assert!(matches!(result, Err(TranslationError::Vocabulary { .. })));
        let _ = std::fs::remove_dir_all(dir);
    }
}
