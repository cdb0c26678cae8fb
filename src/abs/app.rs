//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application, and the
//! [`Surface`] trait the render loop talks to.

use std::sync::Arc;

use glow::HasContext;
use sdl2::event::{Event, WindowEvent};
use sdl2::video::{GLProfile, SwapInterval};

use crate::error::AppError;

/// Something that can be presented to and polled for window events.
pub trait Surface {
    /// Drawable size in pixels.
    fn size(&self) -> (u32, u32);

    /// Presents the back buffer.
    fn swap_buffers(&mut self);

    /// Drains the pending window events.
    fn poll_events(&mut self) -> Vec<SurfaceEvent>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    CloseRequested,
    Resized(u32, u32),
}

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Creates a new [`App`] instance with the specified title, width, and height, and makes
    /// its OpenGL 3.3 core context current.
    pub fn new(title: &str, width: u32, height: u32, vsync: bool) -> Result<Self, AppError> {
        let sdl = sdl2::init().map_err(AppError::Window)?;
        let video_subsystem = sdl.video().map_err(AppError::Window)?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(3, 3);

        let window = video_subsystem
            .window(title, width, height)
            .opengl()
            .resizable()
            .build()
            .map_err(|e| AppError::Window(e.to_string()))?;

        let gl_context = window.gl_create_context().map_err(AppError::Driver)?;
        window
            .gl_make_current(&gl_context)
            .map_err(AppError::Driver)?;

        let interval = if vsync {
            SwapInterval::VSync
        } else {
            SwapInterval::Immediate
        };
        if let Err(e) = video_subsystem.gl_set_swap_interval(interval) {
            log::warn!("could not set swap interval: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let version = gl.version();
        if version.major < 3 || (version.major == 3 && version.minor < 3) {
            return Err(AppError::Driver(format!(
                "OpenGL 3.3 or newer is required, got {}.{}",
                version.major, version.minor
            )));
        }
        let renderer = unsafe { gl.get_parameter_string(glow::RENDERER) };
        log::info!(
            "OpenGL {}.{} on {renderer} {}",
            version.major,
            version.minor,
            version.vendor_info
        );

        let event_pump = sdl.event_pump().map_err(AppError::Window)?;
        let gl = Arc::new(gl);

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl,
            event_pump,
        })
    }
}

impl Surface for App {
    fn size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }

    fn swap_buffers(&mut self) {
        self.window.gl_swap_window();
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        self.event_pump
            .poll_iter()
            .filter_map(|event| match event {
                Event::Quit { .. }
                | Event::Window {
                    win_event: WindowEvent::Close,
                    ..
                } => Some(SurfaceEvent::CloseRequested),
                Event::Window {
                    win_event: WindowEvent::SizeChanged(width, height),
                    ..
                } => Some(SurfaceEvent::Resized(
                    width.max(0) as u32,
                    height.max(0) as u32,
                )),
                _ => None,
            })
            .collect()
    }
}
