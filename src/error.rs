// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in Halo return `error::Result<T>`.  No panics in
// production paths; fatal errors end the process with exit status 1 (see
// `main`), recoverable ones are logged and absorbed by the window handler.

/// Every error that Halo can produce.
#[derive(Debug, thiserror::Error)]
pub enum HaloError {
    /// A Win32 API call returned a failure code.
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// A rendering-API call (factory, render target, brush, draw) failed.
    #[error("{operation} failed (HRESULT {code:#010x})")]
    Graphics {
        /// The rendering operation that failed.
        operation: &'static str,
        /// The HRESULT reported by the rendering API.
        code: u32,
    },

    /// A standard I/O error (config file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for `Config`.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Halo was started on an OS without a Win32 windowing layer.
    #[cfg_attr(windows, allow(dead_code))]
    #[error("Halo only runs on Windows")]
    Unsupported,
}

impl HaloError {
    /// Wrap a windows-crate error raised by the rendering API.
    #[cfg(windows)]
    pub(crate) fn graphics(operation: &'static str, e: &windows::core::Error) -> Self {
        Self::Graphics {
            operation,
            code: e.code().0 as u32,
        }
    }
}

// Convert a windows-crate error (HRESULT) directly into a HaloError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for HaloError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        // Win32 errors appear as 0x8007xxxx HRESULTs.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HaloError>;
