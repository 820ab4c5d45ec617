// ── Direct2D backend ──────────────────────────────────────────────────────────
//
// Implements `render::Graphics` / `render::RenderTarget` on top of Direct2D.
// The COM interfaces are used directly as the factory, target and brush types;
// the windows crate releases each one when it is dropped.

use windows::Win32::{
    Foundation::D2DERR_RECREATE_TARGET,
    Graphics::Direct2D::{
        Common::{D2D1_COLOR_F, D2D_POINT_2F, D2D_SIZE_U},
        D2D1CreateFactory, ID2D1Factory, ID2D1HwndRenderTarget, ID2D1SolidColorBrush,
        D2D1_ELLIPSE, D2D1_FACTORY_TYPE_SINGLE_THREADED, D2D1_HWND_RENDER_TARGET_PROPERTIES,
        D2D1_PRESENT_OPTIONS_NONE, D2D1_RENDER_TARGET_PROPERTIES,
    },
};

use super::{dpi, hwnd};
use crate::{
    error::{HaloError, Result},
    geometry::{Color, Ellipse, PixelSize, SizeF},
    render::{DrawStatus, Graphics, RenderTarget},
    window::WindowId,
};

/// Single-threaded Direct2D.
pub(crate) struct Direct2D;

impl Graphics for Direct2D {
    type Factory = ID2D1Factory;
    type Target = ID2D1HwndRenderTarget;

    fn create_factory(&mut self) -> Result<ID2D1Factory> {
        // SAFETY: no options pointer is passed; the returned interface is
        // owned by the caller.
        unsafe { D2D1CreateFactory(D2D1_FACTORY_TYPE_SINGLE_THREADED, None) }
            .map_err(|e| HaloError::graphics("D2D1CreateFactory", &e))
    }

    fn create_target(
        &mut self,
        factory: &ID2D1Factory,
        window: WindowId,
        size: PixelSize,
    ) -> Result<ID2D1HwndRenderTarget> {
        // Match the window's DPI so the target's size is in DIPs.
        let dpi = dpi::for_window(window) as f32;

        let render_props = D2D1_RENDER_TARGET_PROPERTIES {
            dpiX: dpi,
            dpiY: dpi,
            ..Default::default()
        };
        let hwnd_props = D2D1_HWND_RENDER_TARGET_PROPERTIES {
            hwnd: hwnd(window),
            pixelSize: D2D_SIZE_U {
                width: size.width,
                height: size.height,
            },
            presentOptions: D2D1_PRESENT_OPTIONS_NONE,
        };

        // SAFETY: both property structs live across the call; hwnd belongs to
        // the window currently being painted.
        unsafe { factory.CreateHwndRenderTarget(&render_props, &hwnd_props) }
            .map_err(|e| HaloError::graphics("CreateHwndRenderTarget", &e))
    }
}

impl RenderTarget for ID2D1HwndRenderTarget {
    type Brush = ID2D1SolidColorBrush;

    fn size(&self) -> SizeF {
        // SAFETY: GetSize only reads the target's current size.
        let size = unsafe { self.GetSize() };
        SizeF {
            width: size.width,
            height: size.height,
        }
    }

    fn resize(&mut self, size: PixelSize) -> Result<()> {
        let pixels = D2D_SIZE_U {
            width: size.width,
            height: size.height,
        };
        // SAFETY: pixels outlives the call.
        unsafe { self.Resize(&pixels) }.map_err(|e| HaloError::graphics("Resize", &e))
    }

    fn create_solid_brush(&mut self, color: Color) -> Result<ID2D1SolidColorBrush> {
        let color = d2d_color(color);
        // SAFETY: color outlives the call; no brush properties are passed.
        unsafe { self.CreateSolidColorBrush(&color, None) }
            .map_err(|e| HaloError::graphics("CreateSolidColorBrush", &e))
    }

    fn draw(
        &mut self,
        background: Color,
        ellipse: &Ellipse,
        brush: &ID2D1SolidColorBrush,
    ) -> DrawStatus {
        let clear = d2d_color(background);
        let shape = d2d_ellipse(ellipse);

        // SAFETY: BeginDraw/EndDraw bracket every drawing call on this target;
        // clear and shape outlive the calls; brush was created by this target.
        let result = unsafe {
            self.BeginDraw();
            self.Clear(Some(&clear));
            self.FillEllipse(&shape, brush);
            self.EndDraw(None, None)
        };

        match result {
            Ok(()) => DrawStatus::Presented,
            Err(e) if e.code() == D2DERR_RECREATE_TARGET => DrawStatus::RecreateTarget,
            Err(e) => {
                log::debug!("EndDraw failed: {e}");
                DrawStatus::Failed
            }
        }
    }
}

fn d2d_ellipse(e: &Ellipse) -> D2D1_ELLIPSE {
    D2D1_ELLIPSE {
        point: D2D_POINT_2F {
            x: e.center.x,
            y: e.center.y,
        },
        radiusX: e.radius_x,
        radiusY: e.radius_y,
    }
}

fn d2d_color(c: Color) -> D2D1_COLOR_F {
    D2D1_COLOR_F {
        r: c.r,
        g: c.g,
        b: c.b,
        a: c.a,
    }
}
