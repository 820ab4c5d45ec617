// ── Rendering-API boundary ────────────────────────────────────────────────────
//
// The handler in `window` talks to the 2D rendering API only through these
// traits.  The Direct2D implementation lives in `platform::win32::direct2d`;
// tests substitute an in-memory fake.
//
// Resource ownership: every factory, target and brush is an owned value whose
// `Drop` releases the underlying API object, so release happens on every exit
// path without explicit release calls.

use crate::{
    error::Result,
    geometry::{Color, Ellipse, PixelSize, SizeF},
    window::WindowId,
};

/// Outcome of one begin/clear/fill/end-draw sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DrawStatus {
    /// The frame reached the window.
    Presented,
    /// The draw failed for an ordinary reason.
    Failed,
    /// The device was lost; the target must be discarded and recreated.
    RecreateTarget,
}

/// Creates the process-wide factory and window-bound render targets.
pub(crate) trait Graphics {
    type Factory;
    type Target: RenderTarget;

    fn create_factory(&mut self) -> Result<Self::Factory>;

    /// Create a target bound to `window`'s client area of `size` pixels.
    fn create_target(
        &mut self,
        factory: &Self::Factory,
        window: WindowId,
        size: PixelSize,
    ) -> Result<Self::Target>;
}

/// A drawable surface bound to a window's client area.
pub(crate) trait RenderTarget {
    type Brush;

    /// Current surface size in device-independent units.
    fn size(&self) -> SizeF;

    fn resize(&mut self, size: PixelSize) -> Result<()>;

    fn create_solid_brush(&mut self, color: Color) -> Result<Self::Brush>;

    /// Clear to `background`, fill `ellipse` with `brush`, and present.
    fn draw(&mut self, background: Color, ellipse: &Ellipse, brush: &Self::Brush) -> DrawStatus;
}

/// The render target and its brush, created and released together.
pub(crate) struct DeviceResources<T: RenderTarget> {
    pub(crate) target: T,
    pub(crate) brush: T::Brush,
}

impl<T: RenderTarget> DeviceResources<T> {
    /// Create a target via `graphics` and a `fill` brush on it.
    ///
    /// If the brush cannot be created the target is dropped before returning,
    /// so a caller never holds one without the other.
    pub(crate) fn create<G>(
        graphics: &mut G,
        factory: &G::Factory,
        window: WindowId,
        size: PixelSize,
        fill: Color,
    ) -> Result<Self>
    where
        G: Graphics<Target = T>,
    {
        let mut target = graphics.create_target(factory, window, size)?;
        let brush = target.create_solid_brush(fill)?;
        Ok(Self { target, brush })
    }

    pub(crate) fn draw(&mut self, background: Color, ellipse: &Ellipse) -> DrawStatus {
        self.target.draw(background, ellipse, &self.brush)
    }
}
