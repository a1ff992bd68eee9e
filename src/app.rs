//! Capture controller.
//!
//! Wires the data flow: frame grab → selection session → extraction → background
//! recognition/translation. Background results come back as [`AppEvent`]s over an
//! mpsc channel and are filtered by a [`ResultInbox`] on the interaction side.

use std::sync::Arc;

use image::RgbaImage;
use tokio::sync::mpsc;

use crate::error::{AppError, AppResult, CaptureError, RecognitionError};
use crate::ocr::{OcrOutcome, RecognitionPipeline};
use crate::screenshot::{
    CaptureCompleted, CompletionReceiver, FrameGrabber, RegionExtractor, SelectionSession,
};
use crate::translation::{TranslationResult, TranslationService};
use crate::types::SelectionRect;

/// Identifies one capture session.
pub type SessionId = u64;

/// Results delivered from background workers.
pub enum AppEvent {
    RecognitionCompleted {
        session: SessionId,
        result: Result<OcrOutcome, RecognitionError>,
    },
    TranslationCompleted {
        session: SessionId,
        result: Option<TranslationResult>,
    },
}

impl AppEvent {
    pub fn session(&self) -> SessionId {
        match self {
            AppEvent::RecognitionCompleted { session, .. }
            | AppEvent::TranslationCompleted { session, .. } => *session,
        }
    }
}

impl std::fmt::Debug for AppEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppEvent::RecognitionCompleted { session, result } => f
                .debug_struct("RecognitionCompleted")
                .field("session", session)
                .field("ok", &result.is_ok())
                .finish(),
            AppEvent::TranslationCompleted { session, .. } => f
                .debug_struct("TranslationCompleted")
                .field("session", session)
                .finish(),
        }
    }
}

/// A live session handed to the interaction thread.
pub struct ActiveCapture {
    pub id: SessionId,
    pub session: SelectionSession,
    pub completion: CompletionReceiver,
}

/// A cropped selection ready for downstream work.
#[derive(Debug, Clone)]
pub struct Snip {
    pub session: SessionId,
    pub selection: SelectionRect,
    pub image: RgbaImage,
}

/// Owns the capture pipeline for the application.
pub struct CaptureController {
    grabber: Box<dyn FrameGrabber>,
    extractor: RegionExtractor,
    recognition: Option<RecognitionPipeline>,
    translation: Arc<TranslationService>,
    events: mpsc::UnboundedSender<AppEvent>,
    next_session: SessionId,
}

impl CaptureController {
    /// `recognition` is `None` when no engine could be loaded; recognition requests
    /// then complete with `EngineUnavailable`.
    pub fn new(
        grabber: Box<dyn FrameGrabber>,
        recognition: Option<RecognitionPipeline>,
        translation: Arc<TranslationService>,
    ) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            grabber,
            extractor: RegionExtractor::new(),
            recognition,
            translation,
            events,
            next_session: 1,
        };
        (controller, rx)
    }

    /// Freeze the screen and open a selection session over it.
    ///
    /// Synchronous: one block transfer on the calling thread.
    pub fn start_capture(&mut self) -> Result<ActiveCapture, CaptureError> {
        let frame = self.grabber.capture_full_screen()?;
        let id = self.next_session;
        self.next_session += 1;

        let origin = frame.origin();
        log::debug!(
            "session {id}: frozen {}x{} frame at ({}, {})",
            frame.width(),
            frame.height(),
            origin.x,
            origin.y
        );
        let (session, completion) = SelectionSession::new(frame);
        Ok(ActiveCapture {
            id,
            session,
            completion,
        })
    }

    /// Turn a session's completion into a snip.
    ///
    /// Aborted sessions are `Ok(None)`; a degenerate crop is an error like a capture failure.
    pub fn finish(&self, id: SessionId, completed: CaptureCompleted) -> AppResult<Option<Snip>> {
        let selection = completed.selection;
        let (frame, area) = match completed.into_capture() {
            Ok(capture) => capture,
            Err(reason) => {
                log::debug!("session {id}: aborted ({reason})");
                return Ok(None);
            }
        };

        let image = self.extractor.extract(&frame, area).map_err(AppError::from)?;
        let age = frame.captured_at().elapsed().unwrap_or_default();
        log::debug!(
            "session {id}: extracted {}x{} from a frame frozen {age:?} ago",
            image.width(),
            image.height()
        );
        Ok(Some(Snip {
            session: id,
            selection,
            image,
        }))
    }

    /// Run recognition on a worker; the result arrives as `AppEvent::RecognitionCompleted`.
    pub fn request_recognition(&self, snip: &Snip) {
        let session = snip.session;
        let events = self.events.clone();

        let Some(pipeline) = self.recognition.clone() else {
            send(
                &events,
                AppEvent::RecognitionCompleted {
                    session,
                    result: Err(RecognitionError::EngineUnavailable(
                        "no recognition engine loaded".to_string(),
                    )),
                },
            );
            return;
        };

        let image = snip.image.clone();
        tokio::spawn(async move {
            let result = pipeline.recognize(image).await;
            send(&events, AppEvent::RecognitionCompleted { session, result });
        });
    }

    /// Translate on a worker; the result arrives as `AppEvent::TranslationCompleted`.
    pub fn request_translation(&self, session: SessionId, text: impl Into<String>) {
        let text = text.into();
        let service = Arc::clone(&self.translation);
        let events = self.events.clone();

        tokio::spawn(async move {
            let result = service.translate_detailed_async(text).await;
            send(&events, AppEvent::TranslationCompleted { session, result });
        });
    }
}

fn send(events: &mpsc::UnboundedSender<AppEvent>, event: AppEvent) {
    if events.send(event).is_err() {
        log::debug!("app event dropped: receiver is gone");
    }
}

/// Accepts results only for the session that is still on screen.
#[derive(Debug, Default)]
pub struct ResultInbox {
    active: Option<SessionId>,
}

impl ResultInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, session: SessionId) {
        self.active = Some(session);
    }

    /// The session's UI was torn down; later results for it are dropped.
    pub fn close(&mut self) {
        self.active = None;
    }

    pub fn accept(&self, event: AppEvent) -> Option<AppEvent> {
        if self.active == Some(event.session()) {
            Some(event)
        } else {
            log::warn!("discarding stale result for session {}", event.session());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{RecognizedRegion, TextRecognizer};
    use crate::screenshot::Action;
    use crate::translation::Dictionary;
    use crate::types::{Point, ScreenFrame};
    use image::Rgba;

    struct SolidGrabber;

    impl FrameGrabber for SolidGrabber {
        fn capture_full_screen(&self) -> Result<ScreenFrame, CaptureError> {
            Ok(ScreenFrame::now(RgbaImage::from_pixel(
                400,
                300,
                Rgba([10, 20, 30, 255]),
            )))
        }
    }

    struct OneLine;

    impl TextRecognizer for OneLine {
        fn detect(&self, _image: &RgbaImage) -> anyhow::Result<Vec<RecognizedRegion>> {
            Ok(vec![RecognizedRegion::from_box("你好", 0.0, 0.0, 20.0, 10.0, 0.9)])
        }
    }

    fn controller(
        recognition: Option<RecognitionPipeline>,
    ) -> (CaptureController, mpsc::UnboundedReceiver<AppEvent>) {
        let translation = Arc::new(TranslationService::dictionary_only(Dictionary::builtin()));
        CaptureController::new(Box::new(SolidGrabber), recognition, translation)
    }

    fn drag(capture: &mut ActiveCapture, from: (i32, i32), to: (i32, i32)) {
        capture.session.reduce(Action::PointerDown(Point::new(from.0, from.1)));
        capture.session.reduce(Action::PointerMove(Point::new(to.0, to.1)));
        capture.session.reduce(Action::PointerUp(Point::new(to.0, to.1)));
    }

    #[test]
    fn sessions_get_increasing_ids() {
        let (mut c, _rx) = controller(None);
        let a = c.start_capture().unwrap();
        let b = c.start_capture().unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn completed_drag_yields_inset_snip() {
        let (mut c, _rx) = controller(None);
        let mut capture = c.start_capture().unwrap();
        drag(&mut capture, (100, 100), (300, 250));

        let completed = capture.completion.await.unwrap();
        let snip = c.finish(capture.id, completed).unwrap().unwrap();
        assert_eq!(snip.selection, SelectionRect::new(100, 100, 200, 150));
        assert_eq!((snip.image.width(), snip.image.height()), (198, 148));
    }

    #[tokio::test]
    async fn tiny_drag_produces_no_snip() {
        let (mut c, _rx) = controller(None);
        let mut capture = c.start_capture().unwrap();
        drag(&mut capture, (10, 10), (12, 12));

        let completed = capture.completion.await.unwrap();
        assert!(c.finish(capture.id, completed).unwrap().is_none());
    }

    #[tokio::test]
    async fn recognition_then_translation_events() {
        let pipeline = RecognitionPipeline::new(Arc::new(OneLine));
        let (mut c, mut rx) = controller(Some(pipeline));
        let mut capture = c.start_capture().unwrap();
        drag(&mut capture, (0, 0), (50, 50));
        let snip = c.finish(capture.id, capture.completion.await.unwrap()).unwrap().unwrap();

        c.request_recognition(&snip);
        let text = match rx.recv().await.unwrap() {
            AppEvent::RecognitionCompleted { session, result } => {
                assert_eq!(session, snip.session);
                result.unwrap().text().to_string()
            }
            other => panic!("unexpected event {other:?}"),
        };
        assert_eq!(text, "你好");

        c.request_translation(snip.session, text);
        match rx.recv().await.unwrap() {
            AppEvent::TranslationCompleted { result, .. } => {
                assert_eq!(result.unwrap().translated, "Hello");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_engine_reports_unavailable() {
        let (mut c, mut rx) = controller(None);
        let mut capture = c.start_capture().unwrap();
        drag(&mut capture, (0, 0), (50, 50));
        let snip = c.finish(capture.id, capture.completion.await.unwrap()).unwrap().unwrap();

        c.request_recognition(&snip);
        match rx.recv().await.unwrap() {
            AppEvent::RecognitionCompleted { result, .. } => {
                assert!(matches!(result, Err(RecognitionError::EngineUnavailable(_))));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn inbox_discards_results_of_closed_sessions() {
        let mut inbox = ResultInbox::new();
        inbox.open(7);

        let stale = AppEvent::TranslationCompleted { session: 6, result: None };
        assert!(inbox.accept(stale).is_none());

        let current = AppEvent::TranslationCompleted { session: 7, result: None };
        assert!(inbox.accept(current).is_some());

        inbox.close();
        let late = AppEvent::TranslationCompleted { session: 7, result: None };
        assert!(inbox.accept(late).is_none());
    }
}
