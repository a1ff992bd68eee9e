//! Offline translation: ONNX model with dictionary fallback.

pub mod dictionary;
pub mod model;
pub mod service;
pub mod tokenizer;
pub mod vocab;

pub use dictionary::{Dictionary, Direction};
pub use model::{FileModelLoader, LoadedModel, ModelLoader, TranslationModel};
#[cfg(feature = "onnx")]
pub use model::OnnxTranslator;
pub use service::{TranslationMethod, TranslationResult, TranslationService};
pub use tokenizer::{contains_cjk, tokenize};
pub use vocab::Vocabulary;
