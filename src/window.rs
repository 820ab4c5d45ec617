// ── Window handlers ───────────────────────────────────────────────────────────
//
// `WindowHandler` is the capability the router dispatches to.  `EllipseWindow`
// is the one concrete window: it owns the rendering resources and reacts to
// create / destroy / paint / resize.  No Win32 imports; all OS interaction goes
// through `platform::Host` and all drawing through `render::Graphics`.

use log::{debug, error};

use crate::{
    geometry::{Color, Ellipse, PixelSize},
    platform::Host,
    render::{DeviceResources, DrawStatus, Graphics, RenderTarget},
};

/// Opaque identifier of a native window (the raw handle value on Win32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct WindowId(pub(crate) isize);

/// A window message, already decoded from its native parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Message {
    Create,
    Destroy,
    Paint,
    /// New client-area size.
    Resize(PixelSize),
    /// Any other native message, identified by its raw code.
    Other(u32),
}

/// How the router should complete a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reply {
    /// The handler processed the message.
    Handled,
    /// Abort window creation (only meaningful for `Message::Create`).
    FailCreate,
    /// Fall through to the OS default processing.
    Default,
}

impl Reply {
    /// The window-procedure return value for this reply, or `None` when the
    /// message must go to default processing instead.
    pub(crate) fn result(self) -> Option<isize> {
        match self {
            Reply::Handled => Some(0),
            // -1 from the creation message makes the native creation call fail.
            Reply::FailCreate => Some(-1),
            Reply::Default => None,
        }
    }
}

/// Something that can own a native window's behaviour.
pub(crate) trait WindowHandler {
    /// Name of the native window class this handler's windows are created with.
    fn class_name(&self) -> &'static str;

    fn handle_message(&mut self, host: &mut dyn Host, message: Message) -> Reply;

    /// Called once, when the router associates this handler with `window`.
    fn attach(&mut self, _window: WindowId) {}
}

// ── EllipseWindow ─────────────────────────────────────────────────────────────

pub(crate) const ELLIPSE_CLASS_NAME: &str = "HaloRenderWindow";

/// Colours used for every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Palette {
    pub(crate) background: Color,
    pub(crate) fill: Color,
}

/// A window that clears its client area and fills one centred ellipse.
///
/// Resource lifecycle:
///   • factory: created on `Create`, dropped on `Destroy`
///   • target + brush: created lazily on `Paint`, dropped together on
///     `Destroy`, on a failed or lost draw, and on a failed resize
pub(crate) struct EllipseWindow<G: Graphics> {
    graphics: G,
    palette: Palette,
    window: Option<WindowId>,
    factory: Option<G::Factory>,
    resources: Option<DeviceResources<G::Target>>,
    /// Always reflects the current target size.
    ellipse: Ellipse,
}

impl<G: Graphics> EllipseWindow<G> {
    pub(crate) fn new(graphics: G, palette: Palette) -> Self {
        Self {
            graphics,
            palette,
            window: None,
            factory: None,
            resources: None,
            ellipse: Ellipse::default(),
        }
    }

    fn on_create(&mut self) -> Reply {
        match self.graphics.create_factory() {
            Ok(factory) => {
                self.factory = Some(factory);
                Reply::Handled
            }
            Err(e) => {
                error!("graphics factory unavailable: {e}");
                Reply::FailCreate
            }
        }
    }

    fn on_destroy(&mut self, host: &mut dyn Host) -> Reply {
        self.discard_device_resources();
        self.factory = None;
        host.post_quit(0);
        Reply::Handled
    }

    fn on_paint(&mut self, host: &mut dyn Host) -> Reply {
        if let Err(e) = self.create_device_resources(&*host) {
            // Try again on the next WM_PAINT.
            debug!("skipping frame: {e}");
            return Reply::Handled;
        }
        let (Some(window), Some(resources)) = (self.window, self.resources.as_mut()) else {
            return Reply::Handled;
        };

        let background = self.palette.background;
        let ellipse = self.ellipse;
        let mut status = DrawStatus::Presented;
        host.paint(window, &mut || status = resources.draw(background, &ellipse));

        if status != DrawStatus::Presented {
            debug!("draw returned {status:?}; discarding device resources");
            self.discard_device_resources();
        }
        Reply::Handled
    }

    fn on_resize(&mut self, host: &mut dyn Host, size: PixelSize) -> Reply {
        let (Some(window), Some(resources)) = (self.window, self.resources.as_mut()) else {
            return Reply::Handled;
        };

        match resources.target.resize(size) {
            Ok(()) => self.ellipse = Ellipse::centered_in(resources.target.size()),
            Err(e) => {
                debug!("resize to {}x{} failed: {e}", size.width, size.height);
                self.discard_device_resources();
            }
        }
        host.request_repaint(window);
        Reply::Handled
    }

    /// Create the target and brush if they are absent, and lay out the
    /// ellipse for the new target.
    fn create_device_resources(&mut self, host: &dyn Host) -> crate::error::Result<()> {
        if self.resources.is_some() {
            return Ok(());
        }
        let (Some(factory), Some(window)) = (self.factory.as_ref(), self.window) else {
            return Ok(());
        };

        let size = host.client_size(window);
        let resources = DeviceResources::create(
            &mut self.graphics,
            factory,
            window,
            size,
            self.palette.fill,
        )?;
        self.ellipse = Ellipse::centered_in(resources.target.size());
        self.resources = Some(resources);
        debug!("device resources created for {}x{}", size.width, size.height);
        Ok(())
    }

    fn discard_device_resources(&mut self) {
        if self.resources.take().is_some() {
            debug!("device resources released");
        }
    }
}

impl<G: Graphics> WindowHandler for EllipseWindow<G> {
    fn class_name(&self) -> &'static str {
        ELLIPSE_CLASS_NAME
    }

    fn handle_message(&mut self, host: &mut dyn Host, message: Message) -> Reply {
        match message {
            Message::Create => self.on_create(),
            Message::Destroy => self.on_destroy(host),
            Message::Paint => self.on_paint(host),
            Message::Resize(size) => self.on_resize(host, size),
            Message::Other(_) => Reply::Default,
        }
    }

    fn attach(&mut self, window: WindowId) {
        self.window = Some(window);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
