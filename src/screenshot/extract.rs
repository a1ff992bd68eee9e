//! Region cropping over a frozen frame.
//!
//! Pure functions: pixel data in, an independent pixel copy out.

use image::RgbaImage;
use image::imageops;

use crate::error::ExtractionError;
use crate::types::{ScreenFrame, SelectionRect};

/// Clamp `rect` into a `frame_width` x `frame_height` frame.
///
/// The origin is clamped into the frame first, then width and height are reduced so
/// the rectangle ends inside the frame. The result may be empty.
pub fn clamp_to_frame(rect: SelectionRect, frame_width: u32, frame_height: u32) -> SelectionRect {
    let (fw, fh) = (frame_width as i32, frame_height as i32);
    if fw <= 0 || fh <= 0 {
        return SelectionRect::EMPTY;
    }

    let x = rect.x.clamp(0, fw - 1);
    let y = rect.y.clamp(0, fh - 1);
    SelectionRect::new(x, y, rect.width.min(fw - x), rect.height.min(fh - y))
}

/// Crops frames to finished selections.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegionExtractor;

impl RegionExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Copy the clamped `rect` out of `frame`.
    ///
    /// The returned buffer does not borrow from the frame and can be moved to a worker.
    pub fn extract(
        &self,
        frame: &ScreenFrame,
        rect: SelectionRect,
    ) -> Result<RgbaImage, ExtractionError> {
        let clamped = clamp_to_frame(rect, frame.width(), frame.height());
        if clamped.is_empty() {
            return Err(ExtractionError::EmptyArea {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                frame_width: frame.width(),
                frame_height: frame.height(),
            });
        }

        let view = imageops::crop_imm(
            frame.image(),
            clamped.x as u32,
            clamped.y as u32,
            clamped.width as u32,
            clamped.height as u32,
        );
        Ok(view.to_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn frame(w: u32, h: u32) -> ScreenFrame {
        let img = RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        ScreenFrame::now(img)
    }

    #[test]
    fn crop_inside_frame_copies_pixels() {
        let f = frame(100, 80);
        let out = RegionExtractor::new()
            .extract(&f, SelectionRect::new(10, 20, 30, 40))
            .unwrap();
        assert_eq!(out.dimensions(), (30, 40));
        assert_eq!(out.get_pixel(0, 0), &Rgba([10, 20, 0, 255]));
        assert_eq!(out.get_pixel(29, 39), &Rgba([39, 59, 0, 255]));
    }

    #[test]
    fn crop_past_edges_is_clamped() {
        let f = frame(100, 80);
        let out = RegionExtractor::new()
            .extract(&f, SelectionRect::new(90, 70, 50, 50))
            .unwrap();
        assert_eq!(out.dimensions(), (10, 10));
    }

    #[test]
    fn clamped_rect_stays_inside_frame() {
        let cases = [
            SelectionRect::new(-20, -5, 50, 50),
            SelectionRect::new(150, 10, 20, 20),
            SelectionRect::new(0, 0, 1000, 1000),
            SelectionRect::new(99, 79, 1, 1),
        ];
        for rect in cases {
            let c = clamp_to_frame(rect, 100, 80);
            assert!(c.x >= 0 && c.y >= 0);
            assert!(c.right() <= 100 && c.bottom() <= 80, "{rect:?} -> {c:?}");
        }
    }

    #[test]
    fn empty_area_is_an_error() {
        let f = frame(100, 80);
        let err = RegionExtractor::new()
            .extract(&f, SelectionRect::new(10, 10, 0, 10))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyArea { .. }));

        let empty = ScreenFrame::now(RgbaImage::new(0, 0));
        assert!(
            RegionExtractor::new()
                .extract(&empty, SelectionRect::new(0, 0, 10, 10))
                .is_err()
        );
    }
}
