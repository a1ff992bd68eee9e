// 屏幕捕获功能
//
// One block transfer of the whole virtual screen into an owned RGBA frame.

use crate::error::CaptureError;
use crate::types::ScreenFrame;

/// Source of frozen full-screen frames.
pub trait FrameGrabber: Send + Sync {
    /// Capture every monitor as a single consistent instant.
    fn capture_full_screen(&self) -> Result<ScreenFrame, CaptureError>;
}

/// Convert GDI's BGRA rows into RGBA in place. GDI leaves alpha undefined, so it is forced opaque.
pub fn bgra_to_rgba(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
        px[3] = 255;
    }
}

/// The grabber for the current platform.
pub fn default_grabber() -> Box<dyn FrameGrabber> {
    #[cfg(target_os = "windows")]
    {
        Box::new(GdiFrameGrabber::new())
    }
    #[cfg(not(target_os = "windows"))]
    {
        Box::new(UnsupportedFrameGrabber)
    }
}

/// Grabber used where no capture backend exists; every call fails with `Unsupported`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedFrameGrabber;

impl FrameGrabber for UnsupportedFrameGrabber {
    fn capture_full_screen(&self) -> Result<ScreenFrame, CaptureError> {
        Err(CaptureError::Unsupported)
    }
}

#[cfg(target_os = "windows")]
pub use gdi::GdiFrameGrabber;

#[cfg(target_os = "windows")]
mod gdi {
    use std::time::{Instant, SystemTime};

    use image::RgbaImage;
    use windows::Win32::Graphics::Gdi::{
        BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BitBlt, CAPTUREBLT, DIB_RGB_COLORS, GetDIBits,
        ROP_CODE, SRCCOPY,
    };

    use super::{FrameGrabber, bgra_to_rgba};
    use crate::error::CaptureError;
    use crate::platform::windows::{ManagedBitmap, ManagedDC, ScreenDc, get_virtual_screen};
    use crate::types::{Point, ScreenFrame};

    /// GDI `BitBlt` grabber covering the full virtual screen.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct GdiFrameGrabber;

    impl GdiFrameGrabber {
        pub fn new() -> Self {
            Self
        }
    }

    impl FrameGrabber for GdiFrameGrabber {
        fn capture_full_screen(&self) -> Result<ScreenFrame, CaptureError> {
            let started = Instant::now();
            let screen = get_virtual_screen();
            if screen.width <= 0 || screen.height <= 0 {
                return Err(CaptureError::InvalidDimensions {
                    width: screen.width,
                    height: screen.height,
                });
            }

            // Guards drop in reverse order: selection, bitmap, memory DC, screen DC.
            let screen_dc = ScreenDc::acquire()?;
            let mem_dc = ManagedDC::compatible_with(&screen_dc)?;
            let bitmap = ManagedBitmap::compatible_with(&screen_dc, screen.width, screen.height)?;
            let captured_at = SystemTime::now();

            {
                let _selected = mem_dc.select(&bitmap);
                // 包含分层窗口，保证一次性拷贝整个虚拟屏幕
                unsafe {
                    BitBlt(
                        mem_dc.handle(),
                        0,
                        0,
                        screen.width,
                        screen.height,
                        Some(screen_dc.handle()),
                        screen.left,
                        screen.top,
                        ROP_CODE(SRCCOPY.0 | CAPTUREBLT.0),
                    )
                }
                .map_err(|e| CaptureError::BlockTransfer(e.to_string()))?;
            }

            // GetDIBits requires the bitmap to be deselected, which the scope above guarantees.
            let mut bmi = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: screen.width,
                    biHeight: -screen.height, // 负值表示自顶向下的位图
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    biSizeImage: 0,
                    biXPelsPerMeter: 0,
                    biYPelsPerMeter: 0,
                    biClrUsed: 0,
                    biClrImportant: 0,
                },
                bmiColors: [Default::default(); 1],
            };

            let mut pixels = vec![0u8; screen.width as usize * screen.height as usize * 4];
            let lines = unsafe {
                GetDIBits(
                    screen_dc.handle(),
                    bitmap.handle(),
                    0,
                    screen.height as u32,
                    Some(pixels.as_mut_ptr() as *mut std::ffi::c_void),
                    &mut bmi,
                    DIB_RGB_COLORS,
                )
            };
            if lines != screen.height {
                return Err(CaptureError::PixelReadback);
            }

            bgra_to_rgba(&mut pixels);
            let image = RgbaImage::from_raw(screen.width as u32, screen.height as u32, pixels)
                .ok_or(CaptureError::PixelReadback)?;

            log::debug!(
                "captured {}x{} virtual screen at ({}, {}) in {:?}",
                screen.width,
                screen.height,
                screen.left,
                screen.top,
                started.elapsed()
            );

            Ok(ScreenFrame::new(
                image,
                Point::new(screen.left, screen.top),
                captured_at,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bgra_pixels_become_opaque_rgba() {
        let mut px = vec![10, 20, 30, 0, 1, 2, 3, 4];
        bgra_to_rgba(&mut px);
        assert_eq!(px, vec![30, 20, 10, 255, 3, 2, 1, 255]);
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn unsupported_platform_reports_capture_error() {
        let grabber = default_grabber();
        assert!(matches!(
            grabber.capture_full_screen(),
            Err(CaptureError::Unsupported)
        ));
    }
}
