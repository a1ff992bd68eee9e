use std::time::SystemTime;

use image::RgbaImage;

/// Pointer position in frame coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Normalized rectangle in frame coordinates (width and height never negative).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl SelectionRect {
    /// The empty rectangle reported with a cancelled session.
    pub const EMPTY: SelectionRect = SelectionRect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Normalized box spanning two points.
    #[inline]
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: saturating_span(a.x, b.x),
            height: saturating_span(a.y, b.y),
        }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Shrink by `inset` on every side. Dimensions bottom out at zero.
    pub fn deflate(&self, inset: i32) -> Self {
        let width = self.width.saturating_sub(inset.saturating_mul(2)).max(0);
        let height = self.height.saturating_sub(inset.saturating_mul(2)).max(0);
        Self {
            x: self.x.saturating_add(inset),
            y: self.y.saturating_add(inset),
            width,
            height,
        }
    }

    /// "W × H" label drawn next to the selection.
    pub fn size_label(&self) -> String {
        format!("{} × {}", self.width, self.height)
    }
}

/// Distance between two coordinates, capped at `i32::MAX`.
fn saturating_span(a: i32, b: i32) -> i32 {
    i32::try_from(a.abs_diff(b)).unwrap_or(i32::MAX)
}

/// One frozen snapshot of the whole virtual screen.
///
/// Pixels are RGBA, top-down. The frame cannot be modified after capture; crops
/// are taken as independent copies.
#[derive(Debug, Clone)]
pub struct ScreenFrame {
    image: RgbaImage,
    origin: Point,
    captured_at: SystemTime,
}

impl ScreenFrame {
    pub fn new(image: RgbaImage, origin: Point, captured_at: SystemTime) -> Self {
        Self {
            image,
            origin,
            captured_at,
        }
    }

    /// Frame stamped with the current time and a zero origin.
    pub fn now(image: RgbaImage) -> Self {
        Self::new(image, Point::default(), SystemTime::now())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Virtual-screen position of the frame's top-left pixel.
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[inline]
    pub fn captured_at(&self) -> SystemTime {
        self.captured_at
    }

    /// Full viewport rectangle in frame coordinates.
    pub fn bounds(&self) -> SelectionRect {
        SelectionRect::new(0, 0, self.width() as i32, self.height() as i32)
    }
}
