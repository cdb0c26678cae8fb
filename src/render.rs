//! The render loop.
//!
//! Each frame clears the color buffer, binds the program, presents, then polls window
//! events. Nothing is drawn, so the window shows the clear color.

use std::sync::Arc;

use glam::Vec4;

use crate::abs::{GraphicsDriver, ShaderProgram, Surface, SurfaceEvent};

/// Integer uniforms written every frame when the program declares them.
pub const TARGET_WIDTH_UNIFORM: &str = "target_width";
pub const TARGET_HEIGHT_UNIFORM: &str = "target_height";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

pub struct Renderer<D: GraphicsDriver = glow::Context> {
    gl: Arc<D>,
    clear_color: Vec4,
    target_size: (u32, u32),
}

impl<D: GraphicsDriver> Renderer<D> {
    pub fn new(gl: &Arc<D>, clear_color: Vec4, target_size: (u32, u32)) -> Self {
        let renderer = Self {
            gl: Arc::clone(gl),
            clear_color,
            target_size,
        };
        renderer.apply_viewport();
        renderer
    }

    pub fn target_size(&self) -> (u32, u32) {
        self.target_size
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.target_size = (width, height);
        self.apply_viewport();
    }

    fn apply_viewport(&self) {
        let (width, height) = self.target_size;
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    /// Clears the screen and binds `program`.
    pub fn render_frame(&self, program: &ShaderProgram<D>) {
        let color = self.clear_color;
        self.gl.clear_color(color.x, color.y, color.z, color.w);
        self.gl.clear();

        program.use_program();
        let (width, height) = self.target_size;
        program.set_uniform(TARGET_WIDTH_UNIFORM, width as i32);
        program.set_uniform(TARGET_HEIGHT_UNIFORM, height as i32);
    }

    /// Applies window events, returning the state the loop should be in afterwards.
    pub fn handle_events(&mut self, events: &[SurfaceEvent]) -> LoopState {
        let mut state = LoopState::Running;
        for event in events {
            match *event {
                SurfaceEvent::CloseRequested => state = LoopState::Terminated,
                SurfaceEvent::Resized(width, height) => {
                    log::debug!("resized to {width}x{height}");
                    self.resize(width, height);
                }
            }
        }
        state
    }
}

/// Runs frames until the surface reports a close request. Returns the number of frames
/// presented.
pub fn run_frames<D, S>(surface: &mut S, renderer: &mut Renderer<D>, program: &ShaderProgram<D>) -> u64
where
    D: GraphicsDriver,
    S: Surface,
{
    let mut state = LoopState::Running;
    let mut frames = 0;

    while state == LoopState::Running {
        renderer.render_frame(program);
        surface.swap_buffers();
        frames += 1;

        let events = surface.poll_events();
        state = renderer.handle_events(&events);
    }

    log::info!("window closed after {frames} frames");
    frames
}
