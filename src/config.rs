//! Runtime configuration.
//!
//! Every field has a default, so a config file only needs the keys it changes. Without
//! a config file the program opens an 800x600 window and loads `shader.vert` and
//! `shader.frag` from the working directory.

use std::path::{Path, PathBuf};

use glam::Vec4;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name of the config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "shader-demo.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    /// RGBA, each in `0.0..=1.0`.
    pub clear_color: [f32; 4],
    /// Prepended as `#version <glsl_version>` to sources that lack a version line.
    pub glsl_version: Option<String>,
    pub vsync: bool,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "GLSL Shader Example".to_string(),
            width: 800,
            height: 600,
            vertex_shader: PathBuf::from("shader.vert"),
            fragment_shader: PathBuf::from("shader.frag"),
            clear_color: [0.0, 0.0, 0.0, 0.0],
            glsl_version: None,
            vsync: true,
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    /// Loads the first config file found in [`Config::search_paths`], or the defaults
    /// when there is none.
    pub fn load() -> Result<(Self, Option<PathBuf>), ConfigError> {
        for path in Self::search_paths() {
            if path.is_file() {
                let config = Self::from_path(&path)?;
                return Ok((config, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }

    /// Reads a config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// `./shader-demo.json`, then `<config dir>/glsl-shader-demo/config.json`.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("glsl-shader-demo").join("config.json"));
        }
        paths
    }

    pub fn clear_color(&self) -> Vec4 {
        Vec4::from_array(self.clear_color)
    }
}
