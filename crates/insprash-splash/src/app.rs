use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use image::RgbaImage;
use insprash_config::SplashConfig;
use insprash_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use insprash_engine::device::GpuInit;
use insprash_engine::input::InputEvent;
use insprash_engine::paint::Color;
use insprash_engine::render::ImageRenderer;
use insprash_engine::time::SystemClock;
use insprash_engine::window::{Runtime, RuntimeConfig, RuntimeCtx, RuntimeProxy};

use crate::acquisition::{AcquisitionResult, TextAcquisition};
use crate::controller::{AcquisitionLauncher, SplashController, Surface, PLACEHOLDER_MESSAGE};
use crate::render::{gradient_from, Renderer, SplashFont};
use crate::service::TextService;

/// Window title of the overlay.
pub const WINDOW_TITLE: &str = "Insprash";

/// Events marshalled onto the event loop from the worker runtime.
#[derive(Debug)]
pub enum SplashEvent {
    Acquired(AcquisitionResult),
}

/// Builder that assembles and runs the splash.
///
/// ```no_run
/// use insprash_config::SplashConfig;
/// use insprash_splash::Splash;
///
/// Splash::new(SplashConfig::default()).run().unwrap();
/// ```
pub struct Splash {
    config: SplashConfig,
    font: Option<Vec<u8>>,
    service: Option<Arc<dyn TextService>>,
}

impl Splash {
    pub fn new(config: SplashConfig) -> Self {
        Self { config, font: None, service: None }
    }

    /// TrueType/OpenType bytes for the message. Without them (or when they do
    /// not parse) the built-in bitmap font is used.
    pub fn font(mut self, bytes: Vec<u8>) -> Self {
        self.font = Some(bytes);
        self
    }

    /// Text service to race against the timeout. Ignored unless generation
    /// is available in the config.
    pub fn service(mut self, service: Arc<dyn TextService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Shows the splash and blocks until it closes.
    pub fn run(self) -> Result<()> {
        let Splash { config, font, service } = self;

        let workers = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("insprash-worker")
            .enable_time()
            .build()
            .context("failed to start the worker runtime")?;

        let acquisition = Arc::new(match service {
            Some(service) if config.generation_available() => {
                TextAcquisition::new(service, config.fallbacks.clone())
            }
            _ => TextAcquisition::disabled(config.fallbacks.clone()),
        });

        if config.settings.multi_monitor {
            log::info!("multi_monitor requested; the splash covers the primary display only");
        }

        let gradient = gradient_from(&config.gradient);
        let renderer = Renderer::new(gradient, SplashFont::load(font.as_deref()));
        let clear = Color::from(gradient.top);

        let handle = workers.handle().clone();
        let launch_acquisition = Arc::clone(&acquisition);
        let prompt: Arc<str> = Arc::from(config.prompt.as_str());
        let timeout = config.api_timeout();
        let duration = config.duration();

        let overlay = RuntimeConfig::overlay(WINDOW_TITLE);
        let result = Runtime::run::<SplashApp, _>(overlay, GpuInit::default(), move |proxy| {
            let launcher = TokioLauncher {
                handle,
                acquisition: launch_acquisition,
                prompt,
                timeout,
                proxy,
            };
            SplashApp::new(SplashController::new(renderer, launcher, SystemClock, duration), clear)
        });

        // Abandoned generation threads are not joined; the process may exit.
        workers.shutdown_background();
        drop(acquisition);
        result
    }
}

/// Spawns the acquisition on the worker runtime and posts the result back.
struct TokioLauncher {
    handle: tokio::runtime::Handle,
    acquisition: Arc<TextAcquisition>,
    prompt: Arc<str>,
    timeout: Duration,
    proxy: RuntimeProxy<SplashEvent>,
}

impl AcquisitionLauncher for TokioLauncher {
    fn launch(&mut self) {
        let acquisition = Arc::clone(&self.acquisition);
        let prompt = Arc::clone(&self.prompt);
        let timeout = self.timeout;
        let proxy = self.proxy.clone();

        self.handle.spawn(async move {
            let result = acquisition.acquire(&prompt, timeout).await;
            if !proxy.send(SplashEvent::Acquired(result)) {
                log::debug!("event loop gone before the message arrived");
            }
        });
    }
}

/// Surface state shared between the controller and the frame loop.
#[derive(Default)]
struct SurfaceSlot {
    size: (u32, u32),
    pending: Option<RgbaImage>,
    closed: bool,
}

/// The controller's view of the window: frames are parked until the next
/// redraw uploads them.
struct DisplaySurface {
    slot: Rc<RefCell<SurfaceSlot>>,
}

impl Surface for DisplaySurface {
    fn size(&self) -> (u32, u32) {
        self.slot.borrow().size
    }

    fn present(&mut self, image: &RgbaImage) {
        self.slot.borrow_mut().pending = Some(image.clone());
    }

    fn close(&mut self) {
        self.slot.borrow_mut().closed = true;
    }
}

type Controller = SplashController<DisplaySurface, TokioLauncher, SystemClock>;

struct SplashApp {
    controller: Controller,
    slot: Rc<RefCell<SurfaceSlot>>,
    blit: ImageRenderer,
    clear: Color,
}

impl SplashApp {
    fn new(controller: Controller, clear: Color) -> Self {
        Self {
            controller,
            slot: Rc::new(RefCell::new(SurfaceSlot::default())),
            blit: ImageRenderer::new(),
            clear,
        }
    }

    /// Turns surface changes made by the controller into runtime commands.
    fn sync(&self, runtime: &mut RuntimeCtx) -> AppControl {
        let slot = self.slot.borrow();
        if slot.closed {
            return AppControl::Exit;
        }
        if slot.pending.is_some() {
            runtime.request_redraw();
        }
        AppControl::Continue
    }
}

impl App for SplashApp {
    type Event = SplashEvent;

    fn on_start(&mut self, window: &WindowCtx<'_>, runtime: &mut RuntimeCtx) -> AppControl {
        self.slot.borrow_mut().size = window.physical_size();
        let surface = DisplaySurface { slot: Rc::clone(&self.slot) };
        self.controller.open(surface, PLACEHOLDER_MESSAGE);
        self.sync(runtime)
    }

    fn on_input(&mut self, event: &InputEvent, runtime: &mut RuntimeCtx) -> AppControl {
        if let Some(key) = event.pressed_key() {
            self.controller.on_key(key);
        }
        self.sync(runtime)
    }

    fn on_user_event(&mut self, event: SplashEvent, runtime: &mut RuntimeCtx) -> AppControl {
        match event {
            SplashEvent::Acquired(result) => {
                self.controller.deliver(result);
            }
        }
        self.sync(runtime)
    }

    fn next_wake(&self) -> Option<Instant> {
        self.controller.next_deadline()
    }

    fn on_wake(&mut self, _now: Instant, runtime: &mut RuntimeCtx) -> AppControl {
        self.controller.tick();
        self.sync(runtime)
    }

    fn on_resize(&mut self, width: u32, height: u32, runtime: &mut RuntimeCtx) -> AppControl {
        if width == 0 || height == 0 {
            return AppControl::Continue;
        }
        self.slot.borrow_mut().size = (width, height);
        self.controller.resize(width, height);
        self.sync(runtime)
    }

    fn on_close_requested(&mut self, runtime: &mut RuntimeCtx) -> AppControl {
        self.controller.close();
        self.sync(runtime)
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let mut pending = self.slot.borrow_mut().pending.take();
        let blit = &mut self.blit;

        let control = ctx.render(self.clear, |rctx, target| {
            if let Some(image) = pending.take() {
                blit.upload(rctx, &image);
            }
            blit.render(rctx, target);
        });

        // The frame was skipped; keep the image for the next redraw.
        if let Some(image) = pending {
            self.slot.borrow_mut().pending.get_or_insert(image);
        }
        control
    }
}
