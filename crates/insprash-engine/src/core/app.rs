use std::time::Instant;

use crate::input::InputEvent;
use crate::window::RuntimeCtx;

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Every callback runs on the event-loop thread. Work that must come back
/// from other threads arrives as [`App::Event`] through a
/// [`crate::window::RuntimeProxy`].
pub trait App {
    /// User event type carried by the event loop proxy.
    type Event: 'static;

    /// Called once the window and GPU context exist, before the first frame.
    fn on_start(&mut self, window: &WindowCtx<'_>, runtime: &mut RuntimeCtx) -> AppControl;

    /// Called for translated keyboard/focus input.
    fn on_input(&mut self, event: &InputEvent, runtime: &mut RuntimeCtx) -> AppControl {
        let _ = (event, runtime);
        AppControl::Continue
    }

    /// Called for every event sent through the proxy.
    fn on_user_event(&mut self, event: Self::Event, runtime: &mut RuntimeCtx) -> AppControl;

    /// Earliest instant the app wants [`App::on_wake`] to run.
    ///
    /// The runtime sleeps until then (`ControlFlow::WaitUntil`) or until
    /// another event arrives.
    fn next_wake(&self) -> Option<Instant> {
        None
    }

    /// Called when `next_wake` has passed.
    fn on_wake(&mut self, now: Instant, runtime: &mut RuntimeCtx) -> AppControl {
        let _ = (now, runtime);
        AppControl::Continue
    }

    /// Called after the drawable size changed (physical pixels).
    fn on_resize(&mut self, width: u32, height: u32, runtime: &mut RuntimeCtx) -> AppControl {
        let _ = (width, height, runtime);
        AppControl::Continue
    }

    /// Called when the platform asks the window to close.
    fn on_close_requested(&mut self, runtime: &mut RuntimeCtx) -> AppControl {
        let _ = runtime;
        AppControl::Exit
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
