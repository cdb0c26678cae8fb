//! Shader source loading.
//!
//! Files are read line by line and every line is re-terminated with `\n`, so a file
//! that ends in a newline gains one trailing blank line.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::SourceError;

/// GLSL source text read from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    path: PathBuf,
    text: String,
}

impl ShaderSource {
    /// Reads the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => SourceError::NotFound {
                path: path.to_path_buf(),
            },
            _ => SourceError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let text = terminate_lines(&String::from_utf8_lossy(&bytes));
        log::debug!("read {} bytes of shader source from {}", text.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    /// Prepends `#version <version>` unless the source already starts with a `#version` line.
    pub fn with_version_header(mut self, version: &str) -> Self {
        if !self.text.trim_start().starts_with("#version") {
            self.text.insert_str(0, &format!("#version {version}\n"));
        }
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Reads a shader source file, returning an empty string if it cannot be read.
///
/// Prefer [`ShaderSource::load`] where the caller can act on the failure.
pub fn read_shader_source(path: impl AsRef<Path>) -> String {
    match ShaderSource::load(path) {
        Ok(source) => source.into_string(),
        Err(e) => {
            log::warn!("{e}");
            String::new()
        }
    }
}

fn terminate_lines(content: &str) -> String {
    let mut out = String::with_capacity(content.len() + 1);
    for line in content.split('\n') {
        out.push_str(line);
        out.push('\n');
    }
    out
}
