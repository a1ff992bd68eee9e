//! Interactive selection over a frozen frame.
//!
//! `SelectionSession` is a pure reducer driven by pointer and keyboard input on the
//! interaction thread. It never blocks; every transition returns the view effects the
//! host should apply, and the terminal transition resolves the session's completion
//! channel exactly once.

use tokio::sync::oneshot;

use crate::constants::{MIN_SELECTION_SIZE, SELECTION_BORDER_INSET, SIZE_LABEL_OFFSET};
use crate::error::SelectionAborted;
use crate::types::{Point, ScreenFrame, SelectionRect};

/// Session phase.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Dragging {
        anchor: Point,
        candidate: SelectionRect,
    },
    Completed,
    Cancelled,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Cancelled)
    }
}

/// Input actions (pure).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    Escape,
}

/// The viewport minus the candidate rectangle, as four bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InverseMask {
    pub top: SelectionRect,
    pub left: SelectionRect,
    pub right: SelectionRect,
    pub bottom: SelectionRect,
}

impl InverseMask {
    pub fn new(viewport: SelectionRect, hole: SelectionRect) -> Self {
        Self {
            top: SelectionRect::new(
                viewport.x,
                viewport.y,
                viewport.width,
                hole.y.saturating_sub(viewport.y),
            ),
            left: SelectionRect::new(
                viewport.x,
                hole.y,
                hole.x.saturating_sub(viewport.x),
                hole.height,
            ),
            right: SelectionRect::new(
                hole.right(),
                hole.y,
                viewport.right().saturating_sub(hole.right()),
                hole.height,
            ),
            bottom: SelectionRect::new(
                viewport.x,
                hole.bottom(),
                viewport.width,
                viewport.bottom().saturating_sub(hole.bottom()),
            ),
        }
    }

    pub fn bands(&self) -> [SelectionRect; 4] {
        [self.top, self.left, self.right, self.bottom]
    }
}

/// Live feedback for the overlay while dragging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    pub candidate: SelectionRect,
    pub mask: InverseMask,
    pub label: String,
    pub label_anchor: Point,
}

/// Effects requested by the session (executed by the host).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SelectionChanged(SelectionChanged),
    /// The session reached a terminal phase; the overlay can close.
    Finished,
}

/// The single completion event of a session.
///
/// A completed session carries the frame, the rectangle the user dragged and the
/// inset area to crop. A cancelled one carries no frame and empty rectangles.
#[derive(Debug)]
pub struct CaptureCompleted {
    pub frame: Option<ScreenFrame>,
    pub selection: SelectionRect,
    pub capture_area: SelectionRect,
    pub aborted: Option<SelectionAborted>,
}

impl CaptureCompleted {
    fn cancelled(reason: SelectionAborted) -> Self {
        Self {
            frame: None,
            selection: SelectionRect::EMPTY,
            capture_area: SelectionRect::EMPTY,
            aborted: Some(reason),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.frame.is_none()
    }

    /// Frame and crop area, or why there are none.
    pub fn into_capture(self) -> Result<(ScreenFrame, SelectionRect), SelectionAborted> {
        match self.frame {
            Some(frame) => Ok((frame, self.capture_area)),
            None => Err(self.aborted.unwrap_or(SelectionAborted::Cancelled)),
        }
    }
}

pub type CompletionReceiver = oneshot::Receiver<CaptureCompleted>;

/// Selection state machine for one capture session.
#[derive(Debug)]
pub struct SelectionSession {
    phase: Phase,
    viewport: SelectionRect,
    frame: Option<ScreenFrame>,
    completion: Option<oneshot::Sender<CaptureCompleted>>,
}

impl SelectionSession {
    /// Start a session over `frame`. The receiver resolves once, when the session ends.
    pub fn new(frame: ScreenFrame) -> (Self, CompletionReceiver) {
        let (tx, rx) = oneshot::channel();
        let session = Self {
            phase: Phase::Idle,
            viewport: frame.bounds(),
            frame: Some(frame),
            completion: Some(tx),
        };
        (session, rx)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn viewport(&self) -> SelectionRect {
        self.viewport
    }

    /// The frozen frame, until the session ends.
    pub fn frame(&self) -> Option<&ScreenFrame> {
        self.frame.as_ref()
    }

    pub fn reduce(&mut self, action: Action) -> Vec<Effect> {
        if self.phase.is_terminal() {
            return Vec::new();
        }

        match action {
            Action::PointerDown(p) => {
                if let Phase::Idle = self.phase {
                    log::debug!("selection anchor at ({}, {})", p.x, p.y);
                    self.phase = Phase::Dragging {
                        anchor: p,
                        candidate: SelectionRect::new(p.x, p.y, 0, 0),
                    };
                }
                Vec::new()
            }

            Action::PointerMove(p) => {
                let Phase::Dragging { anchor, candidate } = &mut self.phase else {
                    return Vec::new();
                };
                *candidate = SelectionRect::from_points(*anchor, p);
                let rect = *candidate;

                vec![Effect::SelectionChanged(SelectionChanged {
                    candidate: rect,
                    mask: InverseMask::new(self.viewport, rect),
                    label: rect.size_label(),
                    label_anchor: Point::new(rect.x, rect.y.saturating_sub(SIZE_LABEL_OFFSET)),
                })]
            }

            Action::PointerUp(p) => {
                let Phase::Dragging { anchor, .. } = self.phase else {
                    return Vec::new();
                };

                let selection = SelectionRect::from_points(anchor, p);
                let capture_area = selection.deflate(SELECTION_BORDER_INSET);

                if capture_area.width <= MIN_SELECTION_SIZE
                    || capture_area.height <= MIN_SELECTION_SIZE
                {
                    log::debug!(
                        "selection {}x{} discarded as too small",
                        capture_area.width,
                        capture_area.height
                    );
                    self.cancel(SelectionAborted::TooSmall {
                        width: capture_area.width,
                        height: capture_area.height,
                    });
                } else {
                    self.phase = Phase::Completed;
                    let event = CaptureCompleted {
                        frame: self.frame.take(),
                        selection,
                        capture_area,
                        aborted: None,
                    };
                    self.resolve(event);
                }

                vec![Effect::Finished]
            }

            Action::Escape => {
                self.cancel(SelectionAborted::Cancelled);
                vec![Effect::Finished]
            }
        }
    }

    fn cancel(&mut self, reason: SelectionAborted) {
        self.phase = Phase::Cancelled;
        // 取消时释放冻结帧
        self.frame = None;
        self.resolve(CaptureCompleted::cancelled(reason));
    }

    fn resolve(&mut self, event: CaptureCompleted) {
        if let Some(tx) = self.completion.take()
            && tx.send(event).is_err()
        {
            log::debug!("capture completion dropped: receiver is gone");
        }
    }
}

impl Drop for SelectionSession {
    fn drop(&mut self) {
        // A session torn down mid-flight still reports exactly one completion.
        if self.completion.is_some() {
            self.cancel(SelectionAborted::Cancelled);
        }
    }
}
