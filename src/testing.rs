// ── Test doubles ──────────────────────────────────────────────────────────────
//
// In-memory stand-ins for the rendering API and the windowing host.  Every
// fake resource bumps a live counter in the shared `Ledger` on creation and
// decrements it on drop, so tests can assert that nothing leaks.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

use crate::{
    error::{HaloError, Result},
    geometry::{Color, Ellipse, PixelSize, SizeF},
    platform::Host,
    render::{DrawStatus, Graphics, RenderTarget},
    window::{Message, Reply, WindowHandler, WindowId},
};

pub(crate) const WINDOW: WindowId = WindowId(0x1234);

fn fake_failure(operation: &'static str) -> HaloError {
    HaloError::Graphics {
        operation,
        code: 0x8000_4005, // E_FAIL
    }
}

/// One presented frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Frame {
    pub(crate) background: Color,
    pub(crate) fill: Color,
    pub(crate) ellipse: Ellipse,
}

/// Failure knobs and observations shared between a test and its fakes.
#[derive(Default)]
pub(crate) struct Ledger {
    pub(crate) fail_factory: Cell<bool>,
    /// Number of upcoming target creations that fail.
    pub(crate) fail_targets: Cell<u32>,
    /// Number of upcoming brush creations that fail.
    pub(crate) fail_brushes: Cell<u32>,
    pub(crate) fail_resize: Cell<bool>,
    draw_script: RefCell<VecDeque<DrawStatus>>,

    pub(crate) factories_live: Cell<i32>,
    pub(crate) targets_live: Cell<i32>,
    pub(crate) brushes_live: Cell<i32>,
    pub(crate) targets_created: Cell<u32>,
    pub(crate) frames: RefCell<Vec<Frame>>,
}

impl Ledger {
    pub(crate) fn shared() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Queue the status returned by the next draw (later draws present).
    pub(crate) fn script(&self, status: DrawStatus) {
        self.draw_script.borrow_mut().push_back(status);
    }

    fn take(counter: &Cell<u32>) -> bool {
        let n = counter.get();
        if n > 0 {
            counter.set(n - 1);
        }
        n > 0
    }
}

fn bump(counter: &Cell<i32>, by: i32) {
    counter.set(counter.get() + by);
}

// ── Graphics ──────────────────────────────────────────────────────────────────

pub(crate) struct FakeGraphics {
    ledger: Rc<Ledger>,
}

impl FakeGraphics {
    pub(crate) fn new(ledger: &Rc<Ledger>) -> Self {
        Self {
            ledger: Rc::clone(ledger),
        }
    }
}

pub(crate) struct FakeFactory(Rc<Ledger>);

impl Drop for FakeFactory {
    fn drop(&mut self) {
        bump(&self.0.factories_live, -1);
    }
}

pub(crate) struct FakeTarget {
    ledger: Rc<Ledger>,
    size: PixelSize,
}

impl Drop for FakeTarget {
    fn drop(&mut self) {
        bump(&self.ledger.targets_live, -1);
    }
}

pub(crate) struct FakeBrush {
    ledger: Rc<Ledger>,
    color: Color,
}

impl Drop for FakeBrush {
    fn drop(&mut self) {
        bump(&self.ledger.brushes_live, -1);
    }
}

impl Graphics for FakeGraphics {
    type Factory = FakeFactory;
    type Target = FakeTarget;

    fn create_factory(&mut self) -> Result<FakeFactory> {
        if self.ledger.fail_factory.get() {
            return Err(fake_failure("D2D1CreateFactory"));
        }
        bump(&self.ledger.factories_live, 1);
        Ok(FakeFactory(Rc::clone(&self.ledger)))
    }

    fn create_target(
        &mut self,
        _factory: &FakeFactory,
        _window: WindowId,
        size: PixelSize,
    ) -> Result<FakeTarget> {
        if Ledger::take(&self.ledger.fail_targets) {
            return Err(fake_failure("CreateHwndRenderTarget"));
        }
        bump(&self.ledger.targets_live, 1);
        self.ledger
            .targets_created
            .set(self.ledger.targets_created.get() + 1);
        Ok(FakeTarget {
            ledger: Rc::clone(&self.ledger),
            size,
        })
    }
}

impl RenderTarget for FakeTarget {
    type Brush = FakeBrush;

    fn size(&self) -> SizeF {
        self.size.into()
    }

    fn resize(&mut self, size: PixelSize) -> Result<()> {
        if self.ledger.fail_resize.get() {
            return Err(fake_failure("Resize"));
        }
        self.size = size;
        Ok(())
    }

    fn create_solid_brush(&mut self, color: Color) -> Result<FakeBrush> {
        if Ledger::take(&self.ledger.fail_brushes) {
            return Err(fake_failure("CreateSolidColorBrush"));
        }
        bump(&self.ledger.brushes_live, 1);
        Ok(FakeBrush {
            ledger: Rc::clone(&self.ledger),
            color,
        })
    }

    fn draw(&mut self, background: Color, ellipse: &Ellipse, brush: &FakeBrush) -> DrawStatus {
        self.ledger.frames.borrow_mut().push(Frame {
            background,
            fill: brush.color,
            ellipse: *ellipse,
        });
        self.ledger
            .draw_script
            .borrow_mut()
            .pop_front()
            .unwrap_or(DrawStatus::Presented)
    }
}

// ── Host ──────────────────────────────────────────────────────────────────────

pub(crate) struct FakeHost {
    pub(crate) client: PixelSize,
    /// Completed paint brackets.
    pub(crate) paints: u32,
    pub(crate) repaints: u32,
    pub(crate) quit: Option<i32>,
}

impl FakeHost {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            client: PixelSize::new(width, height),
            paints: 0,
            repaints: 0,
            quit: None,
        }
    }
}

impl Host for FakeHost {
    fn client_size(&self, _window: WindowId) -> PixelSize {
        self.client
    }

    fn paint(&mut self, _window: WindowId, draw: &mut dyn FnMut()) {
        draw();
        self.paints += 1;
    }

    fn request_repaint(&mut self, _window: WindowId) {
        self.repaints += 1;
    }

    fn post_quit(&mut self, exit_code: i32) {
        self.quit = Some(exit_code);
    }
}

// ── Handler ───────────────────────────────────────────────────────────────────

/// Records what the router delivers to it.
#[derive(Default)]
pub(crate) struct Recording {
    pub(crate) attached: Cell<Option<WindowId>>,
    pub(crate) seen: RefCell<Vec<Message>>,
    pub(crate) dropped: Cell<bool>,
}

pub(crate) struct RecordingHandler(pub(crate) Rc<Recording>);

impl Drop for RecordingHandler {
    fn drop(&mut self) {
        self.0.dropped.set(true);
    }
}

impl WindowHandler for RecordingHandler {
    fn class_name(&self) -> &'static str {
        "RecordingWindow"
    }

    fn handle_message(&mut self, _host: &mut dyn Host, message: Message) -> Reply {
        self.0.seen.borrow_mut().push(message);
        match message {
            Message::Other(_) => Reply::Default,
            _ => Reply::Handled,
        }
    }

    fn attach(&mut self, window: WindowId) {
        self.0.attached.set(Some(window));
    }
}
