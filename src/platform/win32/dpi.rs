// ── DPI awareness ─────────────────────────────────────────────────────────────
//
// Configured window sizes are 96-DPI units; the render target follows the
// DPI of the monitor the window is on.

#![allow(unsafe_code)]

use windows::Win32::UI::HiDpi::{
    GetDpiForSystem, GetDpiForWindow, SetProcessDpiAwarenessContext,
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};

use super::hwnd;
use crate::{geometry::PixelSize, window::WindowId};

pub(crate) const BASE_DPI: u32 = 96;

/// Opt into Per-Monitor v2 awareness.  Call before the first window exists.
pub(crate) fn init() {
    // SAFETY: no arguments to validate.  The call fails harmlessly when the
    // manifest has already chosen an awareness mode.
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

/// DPI of the monitor `window` is on.
pub(crate) fn for_window(window: WindowId) -> u32 {
    // SAFETY: window is live; an invalid handle makes the call return 0.
    or_base(unsafe { GetDpiForWindow(hwnd(window)) })
}

/// Outer window dimensions for a 96-DPI `size`, scaled to the system DPI.
pub(crate) fn window_extent(size: PixelSize) -> (i32, i32) {
    // SAFETY: takes no parameters.
    let dpi = or_base(unsafe { GetDpiForSystem() });
    (scale(size.width, dpi), scale(size.height, dpi))
}

fn or_base(dpi: u32) -> u32 {
    if dpi == 0 {
        BASE_DPI
    } else {
        dpi
    }
}

/// `px` at 96 DPI, expressed at `dpi`.  Saturates at `i32::MAX`.
fn scale(px: u32, dpi: u32) -> i32 {
    let scaled = u64::from(px) * u64::from(dpi) / u64::from(BASE_DPI);
    i32::try_from(scaled).unwrap_or(i32::MAX)
}
