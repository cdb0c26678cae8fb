//! Opens a window, builds a shader program from a vertex/fragment source pair on disk,
//! and clears the screen with that program bound until the window is closed.

use std::sync::Arc;

pub mod abs;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod source;

use crate::abs::{App, GraphicsDriver, ShaderProgram, Surface};
use crate::config::Config;
use crate::error::AppError;
use crate::render::Renderer;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = -1;

/// Loads the configuration, installs the logger and runs the demo window. Returns the
/// process exit code.
pub fn run() -> i32 {
    let (config, loaded) = match Config::load() {
        Ok((config, path)) => (config, Ok(path)),
        Err(e) => (Config::default(), Err(e)),
    };

    if logging::init(config.log_level).is_err() {
        log::warn!("a logger was already installed");
    }

    match loaded {
        Ok(Some(path)) => log::info!("using config {}", path.display()),
        Ok(None) => log::debug!("no config file found, using defaults"),
        Err(e) => log::error!("{e}, using defaults"),
    }

    run_with(&config, |config| {
        let app = App::new(&config.title, config.width, config.height, config.vsync)?;
        let gl = Arc::clone(&app.gl);
        Ok((app, gl))
    })
}

/// Runs the demo on whatever surface and driver `open` produces.
///
/// Nothing touches the driver when `open` fails. The shader program is deleted before
/// the surface is dropped.
pub fn run_with<S, D, F>(config: &Config, open: F) -> i32
where
    S: Surface,
    D: GraphicsDriver,
    F: FnOnce(&Config) -> Result<(S, Arc<D>), AppError>,
{
    match try_run(config, open) {
        Ok(frames) => {
            log::debug!("presented {frames} frames");
            EXIT_SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            EXIT_FAILURE
        }
    }
}

fn try_run<S, D, F>(config: &Config, open: F) -> error::Result<u64>
where
    S: Surface,
    D: GraphicsDriver,
    F: FnOnce(&Config) -> Result<(S, Arc<D>), AppError>,
{
    let (mut surface, gl) = open(config)?;

    let program = ShaderProgram::from_files(
        &gl,
        &config.vertex_shader,
        &config.fragment_shader,
        config.glsl_version.as_deref(),
    )?;
    log::info!(
        "built shader program from {} and {}",
        config.vertex_shader.display(),
        config.fragment_shader.display()
    );

    let mut renderer = Renderer::new(&gl, config.clear_color(), surface.size());
    let frames = render::run_frames(&mut surface, &mut renderer, &program);

    drop(program);
    Ok(frames)
}
