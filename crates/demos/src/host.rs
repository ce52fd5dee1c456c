//! Shared window and GL-context plumbing for the demo binaries.
//!
//! Each demo implements [`Scene`] and hands it to [`run_scene`]; the host
//! owns the winit event loop, the glutin context/surface pair, and the
//! [`glow::Context`] the scene draws through. The window is 1280x720,
//! vsynced, and closes on Escape or the window close button.

use std::num::NonZeroU32;
use std::sync::Arc;

use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::error::DemoError;

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

/// One demo's rendering logic, window plumbing excluded.
pub trait Scene {
    /// Creates GL resources. Called once, with the context current.
    fn init(&mut self, gl: &glow::Context) -> Result<(), DemoError>;

    /// Renders one frame into a viewport of `width` x `height` pixels.
    /// The host has already set the GL viewport to that extent.
    fn frame(&mut self, gl: &glow::Context, width: u32, height: u32) -> Result<(), DemoError>;

    /// Releases GL resources. Called once, before the window goes away.
    fn destroy(&mut self, gl: &glow::Context);
}

struct GlWindow {
    window: Arc<Window>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    gl: glow::Context,
}

impl GlWindow {
    #[allow(unsafe_code)]
    fn new(event_loop: &ActiveEventLoop, title: &str) -> Result<Self, DemoError> {
        let window_attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH as f64, WINDOW_HEIGHT as f64));

        let (window, config) = glutin_winit::DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(event_loop, ConfigTemplateBuilder::new(), |mut configs| {
                configs.next().unwrap()
            })
            .map_err(|e| DemoError::Window(format!("could not pick a GL config: {e}")))?;
        let window = window
            .ok_or_else(|| DemoError::Window("display builder produced no window".into()))?;
        let window = Arc::new(window);

        let raw_handle = window
            .window_handle()
            .map_err(|e| DemoError::Window(format!("window has no native handle: {e}")))?
            .as_raw();

        let context_attributes = ContextAttributesBuilder::new().build(Some(raw_handle));
        // SAFETY: the raw handle belongs to `window`, which outlives both
        // the context and the surface built from it.
        let context = unsafe {
            config
                .display()
                .create_context(&config, &context_attributes)
                .map_err(|e| DemoError::Window(format!("could not create GL context: {e}")))?
        };

        let size = window.inner_size();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_handle,
            NonZeroU32::new(size.width.max(1)).unwrap(),
            NonZeroU32::new(size.height.max(1)).unwrap(),
        );
        // SAFETY: as above, the handle stays valid for the surface's life.
        let surface = unsafe {
            config
                .display()
                .create_window_surface(&config, &surface_attributes)
                .map_err(|e| DemoError::Window(format!("could not create GL surface: {e}")))?
        };

        let context = context
            .make_current(&surface)
            .map_err(|e| DemoError::Window(format!("could not make GL context current: {e}")))?;

        if let Err(e) =
            surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::new(1).unwrap()))
        {
            log::warn!("vsync unavailable: {e}");
        }

        // SAFETY: the loader queries the display that owns the current
        // context, so every returned pointer is valid for it.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|s| {
                config.display().get_proc_address(s).cast()
            })
        };

        Ok(Self {
            window,
            surface,
            context,
            gl,
        })
    }

    fn resize(&self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.surface.resize(
                &self.context,
                NonZeroU32::new(width).unwrap(),
                NonZeroU32::new(height).unwrap(),
            );
        }
    }

    fn swap(&self) -> Result<(), DemoError> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|e| DemoError::Window(format!("could not swap buffers: {e}")))
    }
}

#[allow(unsafe_code)]
fn apply_viewport(gl: &glow::Context, width: u32, height: u32) {
    use glow::HasContext;

    // SAFETY: plain state change against the current context.
    unsafe { gl.viewport(0, 0, width as i32, height as i32) };
}

struct App<S: Scene> {
    title: String,
    scene: S,
    window: Option<GlWindow>,
    failure: Option<DemoError>,
}

impl<S: Scene> App<S> {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: DemoError) {
        if let Some(win) = &self.window {
            self.scene.destroy(&win.gl);
        }
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl<S: Scene> ApplicationHandler for App<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let win = match GlWindow::new(event_loop, &self.title) {
            Ok(win) => win,
            Err(err) => {
                self.failure = Some(err);
                event_loop.exit();
                return;
            }
        };
        if let Err(err) = self.scene.init(&win.gl) {
            self.failure = Some(err);
            event_loop.exit();
            return;
        }
        win.window.request_redraw();
        self.window = Some(win);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(win) = self.window.as_ref() else {
            return;
        };

        match event {
            WindowEvent::Resized(size) => {
                win.resize(size.width, size.height);
                win.window.request_redraw();
            }
            WindowEvent::CloseRequested => {
                self.scene.destroy(&win.gl);
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.logical_key == Key::Named(NamedKey::Escape) {
                    self.scene.destroy(&win.gl);
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                let size = win.window.inner_size();
                if size.width > 0 && size.height > 0 {
                    apply_viewport(&win.gl, size.width, size.height);
                    if let Err(err) = self.scene.frame(&win.gl, size.width, size.height) {
                        self.fail(event_loop, err);
                        return;
                    }
                    if let Err(err) = win.swap() {
                        self.fail(event_loop, err);
                        return;
                    }
                }
                win.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(win) = &self.window {
            win.window.request_redraw();
        }
    }
}

/// Opens a window titled `title` and runs `scene` until it is closed.
///
/// Blocks for the life of the window. Scene and windowing failures end
/// the loop and surface as the returned error.
pub fn run_scene<S: Scene>(title: &str, scene: S) -> Result<(), DemoError> {
    let event_loop = EventLoop::new()
        .map_err(|e| DemoError::Window(format!("could not create event loop: {e}")))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        title: title.to_owned(),
        scene,
        window: None,
        failure: None,
    };
    event_loop
        .run_app(&mut app)
        .map_err(|e| DemoError::Window(format!("event loop failed: {e}")))?;

    match app.failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
