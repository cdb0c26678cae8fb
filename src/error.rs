//! Error types.
//!
//! Each concern gets its own enum so callers can match on what actually went wrong.
//! [`Error`] wraps all of them for the top-level runner.

use std::path::PathBuf;

use thiserror::Error;

use crate::abs::ShaderStage;

/// Failure to read a shader source file.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("shader source not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read shader source {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    /// The path that could not be read.
    pub fn path(&self) -> &std::path::Path {
        match self {
            SourceError::NotFound { path } | SourceError::Read { path, .. } => path,
        }
    }
}

/// Failure while building a shader program.
#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("driver refused to create object: {0}")]
    Create(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("{stage} shader compilation failed: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("shader program linking failed: {log}")]
    Link { log: String },
}

/// Failure while opening the window or bringing up the GL context.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("failed to create window: {0}")]
    Window(String),

    #[error("failed to initialize OpenGL: {0}")]
    Driver(String),
}

/// Failure while reading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
