// ── Geometry & colour ─────────────────────────────────────────────────────────
//
// Pure Rust value types shared by the handler logic and the Direct2D backend.
// No Win32 imports; usable (and tested) on every target.

use serde::Deserialize;

/// A client-area size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct PixelSize {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl PixelSize {
    pub(crate) const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A surface size in device-independent units, as reported by a render target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct SizeF {
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl From<PixelSize> for SizeF {
    fn from(size: PixelSize) -> Self {
        Self {
            width: size.width as f32,
            height: size.height as f32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Point {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

/// The one shape Halo draws.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Ellipse {
    pub(crate) center: Point,
    pub(crate) radius_x: f32,
    pub(crate) radius_y: f32,
}

impl Ellipse {
    /// The largest circle centred in `size`: centre `(w/2, h/2)`,
    /// radius `min(w/2, h/2)`.
    pub(crate) fn centered_in(size: SizeF) -> Self {
        let x = size.width / 2.0;
        let y = size.height / 2.0;
        let radius = x.min(y);
        Self {
            center: Point { x, y },
            radius_x: radius,
            radius_y: radius,
        }
    }
}

/// Straight-alpha RGBA colour with components in `0.0..=1.0`.
///
/// Read from config as `{"r": 0.1, "g": 0.1, "b": 0.1}`; `a` defaults to opaque.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub(crate) struct Color {
    pub(crate) r: f32,
    pub(crate) g: f32,
    pub(crate) b: f32,
    #[serde(default = "opaque")]
    pub(crate) a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub(crate) const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Clamp every component into `0.0..=1.0`.  NaN becomes `0.0`.
    pub(crate) fn clamped(self) -> Self {
        let c = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            r: c(self.r),
            g: c(self.g),
            b: c(self.b),
            a: c(self.a),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
