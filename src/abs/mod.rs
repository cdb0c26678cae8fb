//! This module contains the thin layer over SDL2 and OpenGL: application setup,
//! the graphics driver handle, and shader management.

pub mod app;
pub mod driver;
#[cfg(test)]
pub mod mock;
pub mod shader;

pub use app::*;
pub use driver::*;
pub use shader::*;
