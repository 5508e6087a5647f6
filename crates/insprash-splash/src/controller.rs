use std::time::{Duration, Instant};

use image::RgbaImage;
use insprash_engine::input::Key;
use insprash_engine::time::{Clock, Scheduler};

use crate::acquisition::AcquisitionResult;
use crate::render::Renderer;

/// Message painted before any text has been acquired.
pub const PLACEHOLDER_MESSAGE: &str = "Welcome back.";

/// Where finished frames go.
pub trait Surface {
    /// Drawable size in physical pixels.
    fn size(&self) -> (u32, u32);

    /// Replaces the displayed image.
    fn present(&mut self, image: &RgbaImage);

    /// Tears the surface down. Called at most once.
    fn close(&mut self);
}

/// Starts an asynchronous acquisition whose result comes back through
/// [`SplashController::deliver`].
pub trait AcquisitionLauncher {
    fn launch(&mut self);
}

/// Lifecycle of one splash.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SplashPhase {
    Created,
    /// Placeholder painted, acquisition pending.
    Placeholder,
    /// Acquired message painted.
    Final,
    Closed,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum SplashTask {
    Refresh,
    Close,
}

/// What is on screen right now.
#[derive(Debug)]
pub struct SplashState {
    pub message: String,
    pub image: RgbaImage,
    pub width: u32,
    pub height: u32,
}

/// Drives one splash from first paint to close.
///
/// The controller owns the surface and every timer; nothing here blocks.
/// The runtime calls [`tick`](Self::tick) when [`next_deadline`](Self::next_deadline)
/// passes and forwards keys and acquisition results as they arrive.
pub struct SplashController<S, L, C>
where
    S: Surface,
    L: AcquisitionLauncher,
    C: Clock,
{
    renderer: Renderer,
    launcher: L,
    clock: C,
    duration: Duration,

    scheduler: Scheduler<SplashTask>,
    surface: Option<S>,
    state: Option<SplashState>,
    phase: SplashPhase,
    refreshed: bool,
}

impl<S, L, C> SplashController<S, L, C>
where
    S: Surface,
    L: AcquisitionLauncher,
    C: Clock,
{
    pub fn new(renderer: Renderer, launcher: L, clock: C, duration: Duration) -> Self {
        Self {
            renderer,
            launcher,
            clock,
            duration,
            scheduler: Scheduler::new(),
            surface: None,
            state: None,
            phase: SplashPhase::Created,
            refreshed: false,
        }
    }

    /// Paints `initial_message`, then queues the refresh for the next turn
    /// and the close for `duration` from now.
    pub fn open(&mut self, mut surface: S, initial_message: &str) {
        if self.phase != SplashPhase::Created {
            log::warn!("splash already opened; ignoring second open");
            return;
        }

        let (width, height) = surface.size();
        let image = self.renderer.render(width, height, initial_message);
        surface.present(&image);

        self.surface = Some(surface);
        self.state = Some(SplashState { message: initial_message.to_string(), image, width, height });
        self.phase = SplashPhase::Placeholder;

        let now = self.clock.now();
        self.scheduler.schedule_after(now, Duration::ZERO, SplashTask::Refresh);
        self.scheduler.schedule_after(now, self.duration, SplashTask::Close);

        log::info!("splash open at {width}x{height}; closing in {:?}", self.duration);
    }

    /// Launches the acquisition. Runs at most once and never after close.
    pub fn refresh(&mut self) -> bool {
        if self.refreshed || self.phase != SplashPhase::Placeholder {
            return false;
        }
        self.refreshed = true;
        log::debug!("launching text acquisition");
        self.launcher.launch();
        true
    }

    /// Shows an acquired message. Only the first delivery while the
    /// placeholder is up has any effect.
    pub fn deliver(&mut self, result: AcquisitionResult) -> bool {
        if self.phase != SplashPhase::Placeholder {
            log::debug!("discarding {} message in phase {:?}", result.source(), self.phase);
            return false;
        }

        let source = result.source();
        self.repaint(result.into_text());
        self.phase = SplashPhase::Final;

        if let Some(state) = &self.state {
            log::info!("showing {source} message: {}", state.message);
        }
        true
    }

    /// Closes the surface. Idempotent; returns whether this call closed it.
    pub fn close(&mut self) -> bool {
        if self.phase == SplashPhase::Closed {
            return false;
        }
        self.phase = SplashPhase::Closed;
        self.scheduler.clear();
        self.state = None;
        if let Some(mut surface) = self.surface.take() {
            surface.close();
        }
        log::info!("splash closed");
        true
    }

    /// Escape closes; every other key is ignored.
    pub fn on_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape => self.close(),
            _ => false,
        }
    }

    /// Re-renders the current message for a new surface size.
    pub fn resize(&mut self, width: u32, height: u32) {
        let Some(state) = &self.state else { return };
        if (state.width, state.height) == (width, height) {
            return;
        }
        let message = state.message.clone();
        self.repaint(message);
    }

    /// Runs every due task in deadline order and returns the next deadline.
    pub fn tick(&mut self) -> Option<Instant> {
        let now = self.clock.now();
        while let Some(task) = self.scheduler.pop_due(now) {
            match task {
                SplashTask::Refresh => {
                    self.refresh();
                }
                SplashTask::Close => {
                    self.close();
                }
            }
        }
        self.scheduler.next_deadline()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn phase(&self) -> SplashPhase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        self.phase == SplashPhase::Closed
    }

    pub fn state(&self) -> Option<&SplashState> {
        self.state.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.message.as_str())
    }

    fn repaint(&mut self, message: String) {
        let Some(surface) = self.surface.as_mut() else { return };
        let (width, height) = surface.size();
        let image = self.renderer.render(width, height, &message);
        surface.present(&image);
        self.state = Some(SplashState { message, image, width, height });
    }
}
