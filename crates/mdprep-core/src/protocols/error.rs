use crate::core::io::pdb::PdbError;
use crate::core::selection::SelectionError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter '{field}' must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("Flat-bottom box {axis} bounds are inverted: min {min} > max {max}")]
    InvertedBox { axis: char, min: f64, max: f64 },

    #[error("Parameter '{0}' is required when the flat-bottom force constant is positive")]
    MissingRestraintSelection(&'static str),

    #[error("Unknown ACEMD configuration key: '{0}'")]
    UnknownEngineKey(String),

    #[error("Input file '{0}' must be a plain path relative to the input directory")]
    UnsafeFileName(String),
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Input and output directories are the same: '{0}'")]
    SameDirectory(PathBuf),

    #[error("Output directory '{output}' contains the input directory '{input}'")]
    OutputContainsInput { input: PathBuf, output: PathBuf },

    #[error("Output directory '{0}' already exists")]
    OutputExists(PathBuf),

    #[error("Required input file '{path}' does not exist")]
    MissingInputFile { path: PathBuf },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to load structure: {source}")]
    Structure {
        #[from]
        source: PdbError,
    },

    #[error("Invalid atom selection '{expr}': {source}")]
    Selection {
        expr: String,
        source: SelectionError,
    },
}

impl ProtocolError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
