// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the interface that the rest of the codebase uses to talk
// to the OS.  No `unsafe` lives here; all Win32 FFI is confined to the `win32`
// sub-module and never leaks outward.

#[cfg(windows)]
pub mod win32;

use crate::{
    error::Result,
    geometry::PixelSize,
    window::{WindowHandler, WindowId},
};

/// A native window creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowSpec {
    /// Title bar text.
    pub(crate) title: String,
    /// Outer window size at 96 DPI, or `None` for the OS default.
    pub(crate) size: Option<PixelSize>,
    /// `false` removes the sizing border and maximise box.
    pub(crate) resizable: bool,
}

/// Process-level windowing services used by `app::run`.
pub(crate) trait Platform {
    /// Create a top-level window whose messages are routed to `handler`.
    ///
    /// Fails if the native request fails or the handler rejects creation.
    fn create_window(
        &mut self,
        spec: &WindowSpec,
        handler: Box<dyn WindowHandler>,
    ) -> Result<WindowId>;

    fn show(&mut self, window: WindowId);

    /// Pump messages until a quit request arrives; returns its exit code.
    fn run_message_loop(&mut self) -> Result<i32>;
}

/// Per-window services a handler may call back into while handling a message.
pub(crate) trait Host {
    /// Current client-area size of `window` in pixels.
    fn client_size(&self, window: WindowId) -> PixelSize;

    /// Run `draw` inside the native paint bracket, validating the window.
    fn paint(&mut self, window: WindowId, draw: &mut dyn FnMut());

    /// Mark the whole client area of `window` as needing a repaint.
    fn request_repaint(&mut self, window: WindowId);

    /// Ask the message loop to finish with `exit_code`.
    fn post_quit(&mut self, exit_code: i32);
}
