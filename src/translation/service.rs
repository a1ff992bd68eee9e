//! Layered translation: model inference first, dictionary substitution second.
//!
//! Resources are loaded at most once per service. A failed load puts the service in
//! permanent dictionary mode; a failed inference only falls back for that call.
//! None of the public translate calls return an error.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use anyhow::{Result, anyhow};
use tokio_util::sync::CancellationToken;

use super::dictionary::{Dictionary, Direction};
use super::model::{LoadedModel, ModelLoader};
use super::tokenizer::{contains_cjk, tokenize};
use crate::constants::TRANSLATION_FAILED_TAG;
use crate::error::TranslationError;

/// Which layer produced a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationMethod {
    Model,
    Dictionary,
    /// Every layer failed; the text is a tagged echo of the input.
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub source: String,
    pub translated: String,
    pub method: TranslationMethod,
}

enum Backend {
    Ready(LoadedModel),
    Degraded,
}

static SHUT_DOWN: Backend = Backend::Degraded;

/// Loader for builds or setups without a model: always unavailable.
struct NoModel;

impl ModelLoader for NoModel {
    fn load(&self) -> Result<LoadedModel, TranslationError> {
        Err(TranslationError::BackendUnavailable)
    }
}

/// Translation service with an explicit `initialize`/`shutdown` lifecycle.
///
/// Share it behind an `Arc`; `translate_async` needs one to move work onto the
/// blocking pool.
pub struct TranslationService {
    loader: Box<dyn ModelLoader>,
    dictionary: Dictionary,
    backend: OnceLock<Backend>,
    shut_down: AtomicBool,
}

impl TranslationService {
    pub fn new(loader: Box<dyn ModelLoader>, dictionary: Dictionary) -> Self {
        Self {
            loader,
            dictionary,
            backend: OnceLock::new(),
            shut_down: AtomicBool::new(false),
        }
    }

    /// A service that never loads a model and always uses `dictionary`.
    pub fn dictionary_only(dictionary: Dictionary) -> Self {
        Self::new(Box::new(NoModel), dictionary)
    }

    /// Load model resources. Concurrent callers block until the single load
    /// finishes and then observe its outcome. Never retried after a failure.
    pub fn initialize(&self) {
        self.backend();
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.get().is_some()
    }

    /// True once a load has failed (or the service was shut down).
    pub fn is_degraded(&self) -> bool {
        self.is_shut_down() || matches!(self.backend.get(), Some(Backend::Degraded))
    }

    /// Stop using the model. The service keeps working in dictionary mode and never
    /// loads again; the model itself is freed when the last handle is dropped.
    pub fn shutdown(&self) {
        if !self.shut_down.swap(true, Ordering::AcqRel) {
            log::info!("translation service shut down");
        }
    }

    fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    fn backend(&self) -> &Backend {
        if self.is_shut_down() {
            return &SHUT_DOWN;
        }

        self.backend.get_or_init(|| {
            let started = Instant::now();
            // 加载器 panic 也算失败，不能让 OnceLock 留空后重试
            let loaded = catch_unwind(AssertUnwindSafe(|| self.loader.load()));
            match loaded {
                Ok(Ok(model)) => {
                    log::info!(
                        "translation model loaded ({} source / {} target tokens) in {:?}",
                        model.source_vocab.len(),
                        model.target_vocab.len(),
                        started.elapsed()
                    );
                    Backend::Ready(model)
                }
                Ok(Err(e)) => {
                    log::warn!("translation model unavailable, using dictionary: {e}");
                    Backend::Degraded
                }
                Err(_) => {
                    log::warn!("translation model loader panicked, using dictionary");
                    Backend::Degraded
                }
            }
        })
    }

    /// Translate on the current thread. Blank input is `None`.
    pub fn translate_detailed(&self, text: &str) -> Option<TranslationResult> {
        if text.trim().is_empty() {
            return None;
        }

        if let Backend::Ready(model) = self.backend() {
            match run_model(model, text) {
                Ok(translated) => {
                    return Some(TranslationResult {
                        source: text.to_string(),
                        translated,
                        method: TranslationMethod::Model,
                    });
                }
                Err(e) => log::warn!("model translation failed, falling back: {e:#}"),
            }
        }

        Some(self.fallback(text))
    }

    /// Translate on the current thread. Never fails; blank input gives `""`.
    pub fn translate_blocking(&self, text: &str) -> String {
        self.translate_detailed(text)
            .map(|r| r.translated)
            .unwrap_or_default()
    }

    /// Translate on a background worker.
    pub async fn translate_async(self: &Arc<Self>, text: impl Into<String>) -> String {
        self.translate_detailed_async(text)
            .await
            .map(|r| r.translated)
            .unwrap_or_default()
    }

    /// Background variant of [`translate_detailed`](Self::translate_detailed).
    pub async fn translate_detailed_async(
        self: &Arc<Self>,
        text: impl Into<String>,
    ) -> Option<TranslationResult> {
        let text = text.into();
        // 空输入不触发初始化
        if text.trim().is_empty() {
            return None;
        }

        let service = Arc::clone(self);
        let source = text.clone();
        let joined =
            tokio::task::spawn_blocking(move || service.translate_detailed(&source)).await;
        settle_worker(joined, &text)
    }

    /// Like [`translate_async`](Self::translate_async); `None` when `cancel` fires first.
    pub async fn translate_with_cancel(
        self: &Arc<Self>,
        text: impl Into<String>,
        cancel: CancellationToken,
    ) -> Option<String> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            translated = self.translate_async(text) => Some(translated),
        }
    }

    fn fallback(&self, text: &str) -> TranslationResult {
        let direction = if contains_cjk(text) {
            Direction::Forward
        } else {
            Direction::Reverse
        };

        match catch_unwind(AssertUnwindSafe(|| self.dictionary.substitute(text, direction))) {
            Ok(translated) => TranslationResult {
                source: text.to_string(),
                translated,
                method: TranslationMethod::Dictionary,
            },
            Err(_) => {
                log::warn!("dictionary substitution panicked");
                degraded(text)
            }
        }
    }
}

fn run_model(model: &LoadedModel, text: &str) -> Result<String> {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let tokens = tokenize(text);
        let input_ids = model.source_vocab.encode(&tokens);
        let output_ids = model.model.infer(&input_ids)?;
        Ok::<_, anyhow::Error>(model.target_vocab.decode(&output_ids))
    }))
    .map_err(|_| anyhow!("inference panicked"))??;

    if outcome.is_empty() {
        return Err(anyhow!("model produced no tokens"));
    }
    Ok(outcome)
}

/// A worker that died (panic or runtime shutdown) still yields the tagged echo.
fn settle_worker(
    joined: Result<Option<TranslationResult>, tokio::task::JoinError>,
    text: &str,
) -> Option<TranslationResult> {
    match joined {
        Ok(result) => result,
        Err(e) => {
            log::warn!("translation worker failed: {e}");
            Some(degraded(text))
        }
    }
}

fn degraded(text: &str) -> TranslationResult {
    TranslationResult {
        source: text.to_string(),
        translated: format!("{TRANSLATION_FAILED_TAG} {text}"),
        method: TranslationMethod::Degraded,
    }
}
