// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 and
// Direct2D FFI).  Each unsafe block in that module MUST carry a `// SAFETY:`
// comment.
#![deny(unsafe_code)]

// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that log output is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
// Off Windows only the platform-independent core (and its tests) is built.
#![cfg_attr(not(windows), allow(dead_code))]

mod app;
mod config;
mod error;
mod geometry;
mod platform;
mod render;
mod router;
mod window;

#[cfg(test)]
mod testing;

fn main() {
    // RUST_LOG overrides the default filter, e.g. `RUST_LOG=halo=debug`.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = config::load();

    match start(&config) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // Startup failed before or during the message loop.
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}

#[cfg(windows)]
fn start(config: &config::Config) -> error::Result<i32> {
    use platform::win32::{direct2d::Direct2D, window::Win32Platform};

    let mut platform = Win32Platform::new()?;
    let handler = window::EllipseWindow::new(Direct2D, config.palette());
    app::run(&mut platform, &config.window_spec(), Box::new(handler))
}

#[cfg(not(windows))]
fn start(_config: &config::Config) -> error::Result<i32> {
    Err(error::HaloError::Unsupported)
}
