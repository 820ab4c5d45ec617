// ── Window message router ─────────────────────────────────────────────────────
//
// Maps each native window to the handler that owns it.  A handler is staged
// before the native creation request and identified by a `Ticket`; the ticket
// travels through the OS as the creation parameter and is redeemed on the
// first creation message, when the window id becomes known.  The mapping is
// removed on the final destruction message.
//
// Messages for windows with no associated handler get default processing, as
// do messages delivered while the router is already handling one.

use std::{cell::RefCell, collections::HashMap};

use log::{debug, warn};

use crate::{
    platform::Host,
    window::{Message, Reply, WindowHandler, WindowId},
};

/// Creation parameter identifying a staged handler.  Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Ticket(usize);

impl Ticket {
    pub(crate) fn into_raw(self) -> usize {
        self.0
    }

    pub(crate) fn from_raw(raw: usize) -> Self {
        Self(raw)
    }
}

#[derive(Default)]
pub(crate) struct Router {
    last_ticket: usize,
    staged: HashMap<Ticket, Box<dyn WindowHandler>>,
    windows: HashMap<WindowId, Box<dyn WindowHandler>>,
}

impl Router {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Park `handler` until its window's first creation message.
    pub(crate) fn stage(&mut self, handler: Box<dyn WindowHandler>) -> Ticket {
        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);
        self.staged.insert(ticket, handler);
        ticket
    }

    /// Bind the handler staged under `ticket` to `window`.
    ///
    /// Returns `false` if no handler is staged under `ticket`.
    pub(crate) fn associate(&mut self, ticket: Ticket, window: WindowId) -> bool {
        let Some(mut handler) = self.staged.remove(&ticket) else {
            return false;
        };
        handler.attach(window);
        debug!("window {:#x} bound to {}", window.0, handler.class_name());
        self.windows.insert(window, handler);
        true
    }

    /// Forward `message` to `window`'s handler, or `Reply::Default` if none.
    pub(crate) fn dispatch(
        &mut self,
        window: WindowId,
        message: Message,
        host: &mut dyn Host,
    ) -> Reply {
        match self.windows.get_mut(&window) {
            Some(handler) => handler.handle_message(host, message),
            None => Reply::Default,
        }
    }

    /// Remove `window`'s mapping, dropping its handler.
    pub(crate) fn release(&mut self, window: WindowId) {
        if self.windows.remove(&window).is_some() {
            debug!("window {:#x} released", window.0);
        }
    }

    /// Drop a handler whose window was never created.
    pub(crate) fn discard(&mut self, ticket: Ticket) {
        self.staged.remove(&ticket);
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.staged.is_empty() && self.windows.is_empty()
    }
}

// ── Shared router ─────────────────────────────────────────────────────────────

/// Where a message falls in its window's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    /// First creation message; carries the ticket from the creation parameter.
    Creating(Ticket),
    Live,
    /// Final destruction message; the mapping goes away after it is handled.
    Final,
}

/// A `Router` reachable from a free-standing window procedure.
///
/// The OS can deliver a message synchronously while another one is still
/// being handled.  Such nested deliveries find the router borrowed and get
/// `Reply::Default` instead of a second mutable borrow.
#[derive(Default)]
pub(crate) struct SharedRouter(RefCell<Router>);

impl SharedRouter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Run `f` on the router, or return `None` if it is already borrowed.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut Router) -> R) -> Option<R> {
        let mut router = self.0.try_borrow_mut().ok()?;
        Some(f(&mut router))
    }

    /// Deliver one message to `window`'s handler.
    pub(crate) fn deliver(
        &self,
        window: WindowId,
        lifecycle: Lifecycle,
        message: Message,
        host: &mut dyn Host,
    ) -> Reply {
        self.with(|router| {
            if let Lifecycle::Creating(ticket) = lifecycle {
                if !router.associate(ticket, window) {
                    warn!("window {:#x} created without a staged handler", window.0);
                }
            }
            let reply = router.dispatch(window, message, host);
            if lifecycle == Lifecycle::Final {
                router.release(window);
            }
            reply
        })
        .unwrap_or_else(|| {
            debug!("nested message for window {:#x} gets default processing", window.0);
            Reply::Default
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
