//! Errors surfaced to the command line.

use std::fmt;
use std::path::PathBuf;

use geoform::{ConfigError, ImportError, ProjectorError};

#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Projector(ProjectorError),
    /// The input file could not be read.
    Read(PathBuf, std::io::Error),
    Import(PathBuf, ImportError),
    /// The JSON dump could not be written.
    Write(PathBuf, std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Projector(e) => write!(f, "invalid projection: {e}"),
            Self::Read(path, e) => write!(f, "failed to read {}: {e}", path.display()),
            Self::Import(path, e) => write!(f, "{}: {e}", path.display()),
            Self::Write(path, e) => write!(f, "failed to write {}: {e}", path.display()),
            Self::Json(e) => write!(f, "failed to encode output: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Projector(e) => Some(e),
            Self::Read(_, e) | Self::Write(_, e) => Some(e),
            Self::Import(_, e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ProjectorError> for CliError {
    fn from(e: ProjectorError) -> Self {
        Self::Projector(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
