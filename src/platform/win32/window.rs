// ── Native windows ────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register one window class per handler class name.
//   • Create top-level windows, passing the router ticket as lpCreateParams.
//   • Run the Win32 message loop.
//   • WndProc: bind the ticket on WM_NCCREATE, decode WM_CREATE / WM_DESTROY /
//     WM_PAINT / WM_SIZE, route through `SharedRouter`, release on WM_NCDESTROY.
//   • `Win32Host`: the per-window services handlers call back into.

#![allow(unsafe_code)]

use std::{collections::HashSet, ffi::c_void};

use log::debug;
use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{GetLastError, FALSE, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM},
        Graphics::Gdi::{BeginPaint, EndPaint, InvalidateRect, UpdateWindow, HBRUSH, PAINTSTRUCT},
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::{
            CreateWindowExW, DefWindowProcW, DispatchMessageW, GetClientRect, GetMessageW,
            LoadCursorW, LoadIconW, PostQuitMessage, RegisterClassExW, ShowWindow,
            TranslateMessage, CREATESTRUCTW, CS_HREDRAW, CS_VREDRAW,
            CW_USEDEFAULT, HMENU, IDC_ARROW, IDI_APPLICATION, MSG, SW_SHOW, WINDOW_EX_STYLE,
            WINDOW_STYLE, WM_CREATE, WM_DESTROY, WM_NCCREATE, WM_NCDESTROY, WM_PAINT, WM_SIZE,
            WNDCLASSEXW, WS_MAXIMIZEBOX, WS_OVERLAPPEDWINDOW, WS_THICKFRAME,
        },
    },
};

use super::{dpi, hwnd, wide, window_id};
use crate::{
    error::{HaloError, Result},
    geometry::PixelSize,
    platform::{Host, Platform, WindowSpec},
    router::{Lifecycle, Router, SharedRouter, Ticket},
    window::{Message, WindowHandler, WindowId},
};

// ── Router storage ────────────────────────────────────────────────────────────

// WndProc is a free function, so the handle → handler map lives in
// thread-local storage.  All windows belong to the UI thread.
thread_local! {
    static ROUTER: SharedRouter = SharedRouter::new();
}

/// Run `f` on this thread's router; `None` if it is busy or already torn down.
fn with_router<R>(f: impl FnOnce(&mut Router) -> R) -> Option<R> {
    ROUTER.try_with(|shared| shared.with(f)).ok().flatten()
}

/// ERROR_BUSY, reported when a window is created from inside a WndProc.
const ERROR_BUSY: u32 = 170;

// ── Platform ──────────────────────────────────────────────────────────────────

pub(crate) struct Win32Platform {
    hinstance: HINSTANCE,
    registered: HashSet<&'static str>,
}

impl Win32Platform {
    /// Opt into per-monitor DPI awareness and capture the module handle.
    pub(crate) fn new() -> Result<Self> {
        dpi::init();

        // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
        // always valid for the process lifetime and never fails in practice.
        let hmodule = unsafe { GetModuleHandleW(None) }?;

        Ok(Self {
            // HINSTANCE and HMODULE represent the same underlying value.
            hinstance: HINSTANCE(hmodule.0),
            registered: HashSet::new(),
        })
    }

    fn register_class(&mut self, class_name: &'static str) -> Result<()> {
        if self.registered.contains(class_name) {
            return Ok(());
        }

        // SAFETY: LoadIconW with IDI_APPLICATION loads the built-in application
        // icon resource, which exists on all Windows versions.
        let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }?;

        // SAFETY: LoadCursorW with IDC_ARROW loads the built-in arrow cursor.
        let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }?;

        let class_wide = wide(class_name);
        let wndclass = WNDCLASSEXW {
            // WNDCLASSEXW is ~72 bytes; the cast to u32 is always lossless.
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: self.hinstance,
            hIcon: icon,
            hCursor: cursor,
            // No background brush: Direct2D clears the whole client area.
            hbrBackground: HBRUSH::default(),
            lpszMenuName: PCWSTR::null(),
            lpszClassName: PCWSTR(class_wide.as_ptr()),
            hIconSm: icon,
        };

        // SAFETY: wndclass is fully initialised with valid handles; class_wide
        // is a null-terminated UTF-16 string alive for the call (the class name
        // is copied by RegisterClassExW).
        let atom = unsafe { RegisterClassExW(&wndclass) };
        if atom == 0 {
            return Err(last_error("RegisterClassExW"));
        }

        self.registered.insert(class_name);
        Ok(())
    }
}

impl Platform for Win32Platform {
    fn create_window(
        &mut self,
        spec: &WindowSpec,
        handler: Box<dyn WindowHandler>,
    ) -> Result<WindowId> {
        let class_name = handler.class_name();
        self.register_class(class_name)?;

        let style = window_style(spec.resizable);
        let (width, height) = match spec.size {
            Some(size) => dpi::window_extent(size),
            None => (CW_USEDEFAULT, CW_USEDEFAULT),
        };

        let ticket = with_router(|router| router.stage(handler)).ok_or(HaloError::Win32 {
            function: "CreateWindowExW",
            code: ERROR_BUSY,
        })?;

        let class_wide = wide(class_name);
        let title_wide = wide(&spec.title);

        // SAFETY: the class was registered above with this hinstance; both
        // strings are null-terminated and outlive the call.  The ticket is a
        // plain integer smuggled through lpCreateParams, never dereferenced.
        // WM_NCCREATE / WM_CREATE are delivered to wnd_proc before this returns.
        let created = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                PCWSTR(class_wide.as_ptr()),
                PCWSTR(title_wide.as_ptr()),
                style,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                width,
                height,
                HWND::default(),
                HMENU::default(),
                self.hinstance,
                Some(ticket.into_raw() as *const c_void),
            )
        };

        match created {
            Ok(hwnd) => Ok(window_id(hwnd)),
            Err(e) => {
                // The handler is still staged if WM_NCCREATE never arrived;
                // otherwise WM_NCDESTROY has already released it.
                with_router(|router| router.discard(ticket));
                Err(HaloError::Win32 {
                    function: "CreateWindowExW",
                    code: e.code().0 as u32,
                })
            }
        }
    }

    fn show(&mut self, window: WindowId) {
        // SAFETY: window was returned by create_window and is still alive.
        // ShowWindow returns the previous visibility state; UpdateWindow returns
        // a success BOOL; both are intentionally ignored here.
        unsafe {
            let _ = ShowWindow(hwnd(window), SW_SHOW);
            let _ = UpdateWindow(hwnd(window));
        }
    }

    fn run_message_loop(&mut self) -> Result<i32> {
        let mut msg = MSG::default();

        loop {
            // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
            // messages for all windows on this thread; 0,0 filter accepts all.
            let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };

            match ret.0 {
                // GetMessageW returns -1 on error.
                -1 => return Err(last_error("GetMessageW")),
                // Returns 0 when WM_QUIT is retrieved; wParam carries the code
                // given to PostQuitMessage.
                0 => return Ok(msg.wParam.0 as i32),
                _ => unsafe {
                    // SAFETY: msg was populated by a successful GetMessageW call.
                    // TranslateMessage return value (whether it generated WM_CHAR)
                    // and DispatchMessageW's LRESULT are intentionally unused.
                    let _ = TranslateMessage(&msg);
                    let _ = DispatchMessageW(&msg);
                },
            }
        }
    }
}

fn window_style(resizable: bool) -> WINDOW_STYLE {
    if resizable {
        WS_OVERLAPPEDWINDOW
    } else {
        WS_OVERLAPPEDWINDOW & !(WS_THICKFRAME | WS_MAXIMIZEBOX)
    }
}

// ── Host ──────────────────────────────────────────────────────────────────────

/// Handler-facing services for the window whose message is being dispatched.
struct Win32Host;

impl Host for Win32Host {
    fn client_size(&self, window: WindowId) -> PixelSize {
        let mut rect = RECT::default();
        // SAFETY: rect is a valid out-pointer; window is the live window whose
        // message is being handled.
        match unsafe { GetClientRect(hwnd(window), &mut rect) } {
            Ok(()) => PixelSize::new(
                (rect.right - rect.left).max(0) as u32,
                (rect.bottom - rect.top).max(0) as u32,
            ),
            Err(e) => {
                debug!("GetClientRect failed: {e}");
                PixelSize::default()
            }
        }
    }

    fn paint(&mut self, window: WindowId, draw: &mut dyn FnMut()) {
        let hwnd = hwnd(window);
        let mut ps = PAINTSTRUCT::default();
        // SAFETY: called while handling WM_PAINT for hwnd; every BeginPaint is
        // paired with EndPaint on the same PAINTSTRUCT.
        unsafe {
            BeginPaint(hwnd, &mut ps);
        }
        draw();
        // SAFETY: see above.
        unsafe {
            let _ = EndPaint(hwnd, &ps);
        }
    }

    fn request_repaint(&mut self, window: WindowId) {
        // SAFETY: None invalidates the whole client area of a live window.
        unsafe {
            let _ = InvalidateRect(hwnd(window), None, FALSE);
        }
    }

    fn post_quit(&mut self, exit_code: i32) {
        // SAFETY: PostQuitMessage posts WM_QUIT to this thread's queue.
        unsafe { PostQuitMessage(exit_code) }
    }
}

// ── Window procedure ──────────────────────────────────────────────────────────

/// Decode the four messages handlers care about.
fn decode(msg: u32, lparam: LPARAM) -> Message {
    match msg {
        WM_CREATE => Message::Create,
        WM_DESTROY => Message::Destroy,
        WM_PAINT => Message::Paint,
        WM_SIZE => {
            // lparam low word = new client width, high word = new client height.
            let width = (lparam.0 & 0xFFFF) as u32;
            let height = ((lparam.0 >> 16) & 0xFFFF) as u32;
            Message::Resize(PixelSize::new(width, height))
        }
        other => Message::Other(other),
    }
}

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let lifecycle = match msg {
        WM_NCCREATE => {
            // SAFETY: for WM_NCCREATE, lparam points at the CREATESTRUCTW built
            // by CreateWindowExW, valid for the duration of this message.
            let create = &*(lparam.0 as *const CREATESTRUCTW);
            Lifecycle::Creating(Ticket::from_raw(create.lpCreateParams as usize))
        }
        WM_NCDESTROY => Lifecycle::Final,
        _ => Lifecycle::Live,
    };

    let window = window_id(hwnd);
    let message = decode(msg, lparam);
    let reply = ROUTER
        .try_with(|shared| shared.deliver(window, lifecycle, message, &mut Win32Host))
        .ok();

    match reply.and_then(|reply| reply.result()) {
        Some(result) => LRESULT(result),
        // SAFETY: hwnd and message parameters are valid, provided by Windows.
        None => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a `HaloError`.
///
/// Call immediately after a Win32 function that signals failure: `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
fn last_error(function: &'static str) -> HaloError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    HaloError::Win32 {
        function,
        code: code.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_splits_size_words() {
        let lparam = LPARAM((480 << 16) | 640);
        assert_eq!(decode(WM_SIZE, lparam), Message::Resize(PixelSize::new(640, 480)));
    }

    #[test]
    fn decode_maps_lifecycle_messages() {
        assert_eq!(decode(WM_CREATE, LPARAM(0)), Message::Create);
        assert_eq!(decode(WM_DESTROY, LPARAM(0)), Message::Destroy);
        assert_eq!(decode(WM_PAINT, LPARAM(0)), Message::Paint);
        assert_eq!(decode(WM_NCCREATE, LPARAM(0)), Message::Other(WM_NCCREATE));
    }

    #[test]
    fn fixed_style_drops_sizing_border() {
        let fixed = window_style(false);
        assert_eq!(fixed & WS_THICKFRAME, WINDOW_STYLE(0));
        assert_eq!(window_style(true), WS_OVERLAPPEDWINDOW);
    }
}
