use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId, WindowLevel};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputEvent, Modifiers};

/// How the window occupies the display.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WindowMode {
    Windowed,
    /// Borderless fullscreen on the primary display.
    BorderlessFullscreen,
}

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub mode: WindowMode,
    pub always_on_top: bool,
    pub decorations: bool,
    pub cursor_visible: bool,
    /// Used in windowed mode, or when no monitor size is known.
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "insprash".to_string(),
            mode: WindowMode::Windowed,
            always_on_top: false,
            decorations: true,
            cursor_visible: true,
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

impl RuntimeConfig {
    /// Full-screen, borderless, always-on-top overlay with a hidden cursor.
    pub fn overlay(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            mode: WindowMode::BorderlessFullscreen,
            always_on_top: true,
            decorations: false,
            cursor_visible: false,
            ..Self::default()
        }
    }

    fn window_attributes(&self, monitor_size: Option<PhysicalSize<u32>>) -> WindowAttributes {
        let mut attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_decorations(self.decorations);

        attrs = match (self.mode, monitor_size) {
            (WindowMode::BorderlessFullscreen, Some(size)) => attrs
                .with_inner_size(size)
                .with_fullscreen(Some(Fullscreen::Borderless(None))),
            (WindowMode::BorderlessFullscreen, None) => attrs
                .with_inner_size(self.initial_size)
                .with_fullscreen(Some(Fullscreen::Borderless(None))),
            (WindowMode::Windowed, _) => attrs.with_inner_size(self.initial_size),
        };

        if self.always_on_top {
            attrs = attrs.with_window_level(WindowLevel::AlwaysOnTop);
        }
        attrs
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    /// Schedules a redraw of the window.
    pub fn request_redraw(&mut self) {
        self.commands.push(Command::RequestRedraw);
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    RequestRedraw,
    Exit,
}

/// Cloneable, thread-safe handle for sending events into the loop.
pub struct RuntimeProxy<E: 'static> {
    inner: EventLoopProxy<E>,
}

impl<E: 'static> Clone for RuntimeProxy<E> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<E: 'static> RuntimeProxy<E> {
    /// Wakes the loop and delivers `event` to [`CoreApp::on_user_event`].
    ///
    /// Returns `false` when the loop has already exited.
    pub fn send(&self, event: E) -> bool {
        self.inner.send_event(event).is_ok()
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop until the app exits.
    ///
    /// `build` receives the proxy before the loop starts, so the app can hand
    /// it to background work. Window or GPU creation failures end the loop
    /// and are returned as errors.
    pub fn run<A, F>(config: RuntimeConfig, gpu_init: GpuInit, build: F) -> Result<()>
    where
        A: CoreApp + 'static,
        F: FnOnce(RuntimeProxy<A::Event>) -> A,
    {
        let event_loop = EventLoop::<A::Event>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let proxy = RuntimeProxy { inner: event_loop.create_proxy() };
        let mut state = AppState::new(config, gpu_init, build(proxy));

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    modifiers: Modifiers,
    started: bool,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            modifiers: Modifiers::default(),
            started: false,
            exit_requested: false,
            fatal: None,
        }
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let monitor_size = event_loop.primary_monitor().map(|m| m.size());
        let attrs = self.config.window_attributes(monitor_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        window.set_cursor_visible(self.config.cursor_visible);

        let gpu_init = self.gpu_init.clone();
        WindowEntryTryBuilder {
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    /// Applies buffered commands plus the callback's own verdict.
    fn apply(&mut self, event_loop: &ActiveEventLoop, ctx: RuntimeCtx, control: AppControl) {
        if control == AppControl::Exit {
            self.exit_requested = true;
        }

        for cmd in ctx.commands {
            match cmd {
                Command::RequestRedraw => {
                    if let Some(entry) = self.window.as_ref() {
                        entry.with_window(|w| w.request_redraw());
                    }
                }
                Command::Exit => self.exit_requested = true,
            }
        }

        if self.exit_requested {
            // Dropping the window entry tears down the surface before the loop ends.
            self.window = None;
            event_loop.exit();
        }
    }

    fn dispatch_input(&mut self, event_loop: &ActiveEventLoop, event: InputEvent) {
        if let InputEvent::ModifiersChanged(m) = event {
            self.modifiers = m;
        }
        let mut ctx = RuntimeCtx::default();
        let control = self.app.on_input(&event, &mut ctx);
        self.apply(event_loop, ctx, control);
    }
}

impl<A> ApplicationHandler<A::Event> for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exit_requested {
            return;
        }

        let entry = match self.create_window_entry(event_loop) {
            Ok(entry) => entry,
            Err(e) => return self.fail(event_loop, e),
        };

        let mut ctx = RuntimeCtx::default();
        let mut control = AppControl::Continue;
        if !self.started {
            self.started = true;
            let app = &mut self.app;
            control = entry.with_window(|window| {
                let wctx = WindowCtx { id: window.id(), window };
                app.on_start(&wctx, &mut ctx)
            });
        }

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
        self.apply(event_loop, ctx, control);
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: A::Event) {
        if self.exit_requested {
            return;
        }
        let mut ctx = RuntimeCtx::default();
        let control = self.app.on_user_event(event, &mut ctx);
        self.apply(event_loop, ctx, control);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let now = Instant::now();
        if self.app.next_wake().is_some_and(|at| at <= now) {
            let mut ctx = RuntimeCtx::default();
            let control = self.app.on_wake(now, &mut ctx);
            self.apply(event_loop, ctx, control);
            if self.exit_requested {
                return;
            }
        }

        event_loop.set_control_flow(match self.app.next_wake() {
            Some(at) => ControlFlow::WaitUntil(at),
            None => ControlFlow::Wait,
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if let Some(input) = translate_window_event(self.modifiers, &event) {
            self.dispatch_input(event_loop, input);
            if self.exit_requested {
                return;
            }
        }

        match &event {
            WindowEvent::CloseRequested => {
                let mut ctx = RuntimeCtx::default();
                let control = self.app.on_close_requested(&mut ctx);
                self.apply(event_loop, ctx, control);
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                let Some(entry) = self.window.as_mut() else { return };
                let size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(size));
                entry.with_window(|w| w.request_redraw());

                let mut ctx = RuntimeCtx::default();
                let control = self.app.on_resize(size.width, size.height, &mut ctx);
                self.apply(event_loop, ctx, control);
            }

            WindowEvent::RedrawRequested => {
                let mut ctx = RuntimeCtx::default();
                let mut control = AppControl::Continue;

                // Split borrows to avoid `self` capture inside `ouroboros` closures.
                let (app, window) = (&mut self.app, &mut self.window);
                if let Some(entry) = window.as_mut() {
                    entry.with_mut(|fields| {
                        let mut frame = FrameCtx {
                            window: WindowCtx { id: fields.window.id(), window: fields.window },
                            gpu: fields.gpu,
                            now: Instant::now(),
                            runtime: &mut ctx,
                        };
                        control = app.on_frame(&mut frame);
                    });
                }

                self.apply(event_loop, ctx, control);
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_config_is_borderless_and_on_top() {
        let cfg = RuntimeConfig::overlay("Insprash");
        assert_eq!(cfg.title, "Insprash");
        assert_eq!(cfg.mode, WindowMode::BorderlessFullscreen);
        assert!(cfg.always_on_top);
        assert!(!cfg.decorations);
        assert!(!cfg.cursor_visible);
    }

    #[test]
    fn default_config_is_windowed() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.mode, WindowMode::Windowed);
        assert!(cfg.decorations);
    }

    #[test]
    fn commands_are_buffered_in_order() {
        let mut ctx = RuntimeCtx::default();
        ctx.request_redraw();
        ctx.exit();
        assert!(matches!(ctx.commands.as_slice(), [Command::RequestRedraw, Command::Exit]));
    }
}
