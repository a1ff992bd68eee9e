//! Windows GDI 资源的 RAII 封装
//!
//! Every handle acquired during a capture is wrapped here so it is released on
//! every exit path, including early returns and panics.
//!
//! ## 使用示例
//! ```ignore
//! let screen = ScreenDc::acquire()?;
//! let mem_dc = ManagedDC::compatible_with(&screen)?;
//! let bitmap = ManagedBitmap::compatible_with(&screen, width, height)?;
//! let _selected = mem_dc.select(&bitmap);
//! // 离开作用域时按相反顺序释放
//! ```

use windows::Win32::Graphics::Gdi::{
    CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC, HBITMAP, HDC,
    HGDIOBJ, ReleaseDC, SelectObject,
};

use crate::error::CaptureError;

/// `GetDC(NULL)` 返回的屏幕 DC，离开作用域时调用 `ReleaseDC`。
#[derive(Debug)]
pub struct ScreenDc(HDC);

impl ScreenDc {
    /// Acquire the device context of the whole virtual screen.
    pub fn acquire() -> Result<Self, CaptureError> {
        // SAFETY: GetDC(None) has no preconditions; the result is checked before use.
        let dc = unsafe { GetDC(None) };
        if dc.is_invalid() {
            return Err(CaptureError::DeviceContext);
        }
        Ok(Self(dc))
    }

    pub fn handle(&self) -> HDC {
        self.0
    }
}

impl Drop for ScreenDc {
    fn drop(&mut self) {
        // SAFETY: self.0 came from GetDC(None) and is released exactly once.
        unsafe {
            ReleaseDC(None, self.0);
        }
    }
}

/// HDC 的 RAII 封装（用于 CreateCompatibleDC 创建的 DC）
///
/// 当 `ManagedDC` 离开作用域时，会自动调用 `DeleteDC` 释放设备上下文。
/// 不要用于 `GetDC` 返回的 HDC，那些由 [`ScreenDc`] 管理。
#[derive(Debug)]
pub struct ManagedDC(HDC);

impl ManagedDC {
    /// Create a memory DC compatible with the screen.
    pub fn compatible_with(screen: &ScreenDc) -> Result<Self, CaptureError> {
        // SAFETY: screen holds a live DC for the duration of the call.
        let dc = unsafe { CreateCompatibleDC(Some(screen.handle())) };
        if dc.is_invalid() {
            return Err(CaptureError::CompatibleResource("device context"));
        }
        Ok(Self(dc))
    }

    pub fn handle(&self) -> HDC {
        self.0
    }

    /// Select `bitmap` into this DC until the returned guard is dropped.
    pub fn select<'a>(&'a self, bitmap: &'a ManagedBitmap) -> SelectedObject<'a> {
        // SAFETY: both handles are alive for 'a; the previous object is restored on drop.
        let previous = unsafe { SelectObject(self.0, bitmap.handle().into()) };
        SelectedObject {
            dc: self,
            previous,
        }
    }
}

impl Drop for ManagedDC {
    fn drop(&mut self) {
        if !self.0.is_invalid() {
            // SAFETY: self.0 是由 CreateCompatibleDC 创建的有效 HDC，且只释放一次。
            unsafe {
                let _ = DeleteDC(self.0);
            }
        }
    }
}

/// HBITMAP 的 RAII 封装
///
/// 当 `ManagedBitmap` 离开作用域时，会自动调用 `DeleteObject` 释放位图资源。
/// A bitmap must be deselected from its DC before it is dropped; declare the
/// [`SelectedObject`] guard after the bitmap so it drops first.
#[derive(Debug)]
pub struct ManagedBitmap(HBITMAP);

impl ManagedBitmap {
    pub fn compatible_with(
        screen: &ScreenDc,
        width: i32,
        height: i32,
    ) -> Result<Self, CaptureError> {
        // SAFETY: screen holds a live DC; dimensions were validated by the caller.
        let bitmap = unsafe { CreateCompatibleBitmap(screen.handle(), width, height) };
        if bitmap.is_invalid() {
            return Err(CaptureError::CompatibleResource("bitmap"));
        }
        Ok(Self(bitmap))
    }

    pub fn handle(&self) -> HBITMAP {
        self.0
    }
}

impl Drop for ManagedBitmap {
    fn drop(&mut self) {
        if !self.0.is_invalid() {
            // SAFETY: self.0 是有效的 HBITMAP，我们拥有其所有权。
            unsafe {
                let _ = DeleteObject(self.0.into());
            }
        }
    }
}

/// Restores the DC's previously selected object on drop.
#[derive(Debug)]
pub struct SelectedObject<'a> {
    dc: &'a ManagedDC,
    previous: HGDIOBJ,
}

impl Drop for SelectedObject<'_> {
    fn drop(&mut self) {
        if !self.previous.is_invalid() {
            // SAFETY: previous was returned by SelectObject on this same DC.
            unsafe {
                SelectObject(self.dc.handle(), self.previous);
            }
        }
    }
}
