//! Background recognition pipeline.
//!
//! Engine calls run on the blocking pool; the caller awaits the returned future and
//! is never blocked by the engine itself.

use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;
use tokio_util::sync::CancellationToken;

use super::engine::TextRecognizer;
use super::layout;
use super::types::OcrOutcome;
use crate::constants::PARAGRAPH_GAP_THRESHOLD;
use crate::error::RecognitionError;

/// Runs the recognition engine and reconstructs reading order.
#[derive(Clone)]
pub struct RecognitionPipeline {
    engine: Arc<dyn TextRecognizer>,
    paragraph_gap: f32,
}

impl RecognitionPipeline {
    pub fn new(engine: Arc<dyn TextRecognizer>) -> Self {
        Self {
            engine,
            paragraph_gap: PARAGRAPH_GAP_THRESHOLD,
        }
    }

    /// Recognize text in `image` on a background worker.
    ///
    /// An empty or all-blank detection is `Ok(OcrOutcome::NoText)`. Engine failures
    /// come back as `RecognitionError::Engine` with the original cause.
    pub async fn recognize(&self, image: RgbaImage) -> Result<OcrOutcome, RecognitionError> {
        let engine = Arc::clone(&self.engine);
        let gap = self.paragraph_gap;

        tokio::task::spawn_blocking(move || recognize_blocking(engine.as_ref(), &image, gap))
            .await
            .map_err(|e| RecognitionError::Worker(e.to_string()))?
    }

    /// Like [`recognize`](Self::recognize), but resolves to `Cancelled` as soon as
    /// `cancel` fires. The engine call itself runs to completion and its result is dropped.
    pub async fn recognize_with_cancel(
        &self,
        image: RgbaImage,
        cancel: CancellationToken,
    ) -> Result<OcrOutcome, RecognitionError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RecognitionError::Cancelled),
            result = self.recognize(image) => result,
        }
    }
}

fn recognize_blocking(
    engine: &dyn TextRecognizer,
    image: &RgbaImage,
    paragraph_gap: f32,
) -> Result<OcrOutcome, RecognitionError> {
    let started = Instant::now();
    let regions = engine.detect(image).map_err(RecognitionError::Engine)?;
    let region_count = regions.len();
    let outcome = layout::compose(regions, paragraph_gap);

    log::info!(
        "recognized {} region(s) in {}x{} buffer in {:?}",
        region_count,
        image.width(),
        image.height(),
        started.elapsed()
    );
    Ok(outcome)
}
