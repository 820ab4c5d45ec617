// ── Application lifecycle ─────────────────────────────────────────────────────
//
// Platform-independent program flow: create the window, show it, pump
// messages until quit.  `main` supplies the Win32 platform and the Direct2D
// ellipse handler; tests supply fakes.

use log::debug;

use crate::{
    error::Result,
    platform::{Platform, WindowSpec},
    window::WindowHandler,
};

/// Run one window to completion and return the process exit code.
///
/// A creation failure (including the handler rejecting `Message::Create`) is
/// returned as an error before anything is shown.
pub(crate) fn run<P: Platform>(
    platform: &mut P,
    spec: &WindowSpec,
    handler: Box<dyn WindowHandler>,
) -> Result<i32> {
    let started = std::time::Instant::now();

    let window = platform.create_window(spec, handler)?;
    platform.show(window);
    debug!(
        "window visible in {:.1} ms",
        started.elapsed().as_secs_f64() * 1000.0
    );

    platform.run_message_loop()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        error::HaloError,
        geometry::PixelSize,
        router::Router,
        testing::{FakeGraphics, FakeHost, Ledger, WINDOW},
        window::{EllipseWindow, Message, Reply, WindowId},
    };
    use std::rc::Rc;

    /// Delivers messages through a real `Router`, the way the Win32 window
    /// procedure does.
    struct FakePlatform {
        router: Router,
        host: FakeHost,
        shown: Vec<WindowId>,
        /// Delivered by the message loop, after which the window is destroyed.
        script: Vec<Message>,
    }

    impl FakePlatform {
        fn new(script: Vec<Message>) -> Self {
            Self {
                router: Router::new(),
                host: FakeHost::new(640, 480),
                shown: Vec::new(),
                script,
            }
        }

        fn destroy(&mut self, window: WindowId) {
            self.router.dispatch(window, Message::Destroy, &mut self.host);
            self.router.release(window);
        }
    }

    impl Platform for FakePlatform {
        fn create_window(
            &mut self,
            _spec: &WindowSpec,
            handler: Box<dyn WindowHandler>,
        ) -> Result<WindowId> {
            let ticket = self.router.stage(handler);
            self.router.associate(ticket, WINDOW);
            if self.router.dispatch(WINDOW, Message::Create, &mut self.host) == Reply::FailCreate {
                self.destroy(WINDOW);
                return Err(HaloError::Win32 {
                    function: "CreateWindowExW",
                    code: 0x8000_4005,
                });
            }
            Ok(WINDOW)
        }

        fn show(&mut self, window: WindowId) {
            self.shown.push(window);
            let size = self.host.client;
            self.router.dispatch(window, Message::Resize(size), &mut self.host);
            self.router.dispatch(window, Message::Paint, &mut self.host);
        }

        fn run_message_loop(&mut self) -> Result<i32> {
            for message in std::mem::take(&mut self.script) {
                if let Message::Resize(size) = message {
                    self.host.client = size;
                }
                self.router.dispatch(WINDOW, message, &mut self.host);
            }
            self.destroy(WINDOW);
            Ok(self.host.quit.unwrap_or(-1))
        }
    }

    fn handler(ledger: &Rc<Ledger>) -> Box<dyn WindowHandler> {
        Box::new(EllipseWindow::new(
            FakeGraphics::new(ledger),
            Config::default().palette(),
        ))
    }

    #[test]
    fn factory_failure_aborts_before_the_window_is_shown() {
        let ledger = Ledger::shared();
        ledger.fail_factory.set(true);
        let mut platform = FakePlatform::new(vec![Message::Paint]);

        let result = run(&mut platform, &Config::default().window_spec(), handler(&ledger));

        assert!(result.is_err());
        assert!(platform.shown.is_empty());
        assert!(ledger.frames.borrow().is_empty());
        assert!(platform.router.is_empty());
    }

    #[test]
    fn normal_run_exits_zero_and_releases_everything() {
        let ledger = Ledger::shared();
        let mut platform = FakePlatform::new(vec![
            Message::Resize(PixelSize::new(200, 100)),
            Message::Paint,
        ]);

        let code = run(&mut platform, &Config::default().window_spec(), handler(&ledger));

        assert_eq!(code.ok(), Some(0));
        assert_eq!(platform.shown, vec![WINDOW]);
        let frames = ledger.frames.borrow();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].ellipse.radius_x, 240.0);
        assert_eq!(frames[1].ellipse.center.x, 100.0);
        assert_eq!(frames[1].ellipse.radius_x, 50.0);
        assert_eq!(ledger.factories_live.get(), 0);
        assert_eq!(ledger.targets_live.get(), 0);
        assert_eq!(ledger.brushes_live.get(), 0);
        assert!(platform.router.is_empty());
    }

    #[test]
    fn unrecognised_messages_pass_through_the_loop() {
        let ledger = Ledger::shared();
        let mut platform = FakePlatform::new(vec![Message::Other(0x0020), Message::Other(0x0084)]);

        let code = run(&mut platform, &Config::default().window_spec(), handler(&ledger));

        assert_eq!(code.ok(), Some(0));
        assert_eq!(ledger.frames.borrow().len(), 1, "only the initial paint drew");
        assert_eq!(ledger.targets_created.get(), 1);
    }
}
