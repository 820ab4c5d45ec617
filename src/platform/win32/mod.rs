// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the only module in the codebase where `unsafe` code is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub mod direct2d; // Direct2D factory, HWND render target, solid brush
pub mod window; // window class, WndProc, message loop

pub(crate) mod dpi; // per-monitor DPI v2 helpers

use std::ffi::c_void;

use windows::Win32::Foundation::HWND;

use crate::window::WindowId;

/// The native handle behind `window`.
pub(crate) fn hwnd(window: WindowId) -> HWND {
    HWND(window.0 as *mut c_void)
}

pub(crate) fn window_id(hwnd: HWND) -> WindowId {
    WindowId(hwnd.0 as isize)
}

/// Null-terminated UTF-16 copy of `s` for `PCWSTR` parameters.
pub(crate) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
