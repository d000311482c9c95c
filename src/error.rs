//! Error types for the conversion steps.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading a project descriptor.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The descriptor could not be read from disk.
    #[error("Failed to read project file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The descriptor is not well-formed XML.
    #[error("Failed to parse XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A structural element the conversion cannot do without is absent.
    #[error("No <{0}> element found in project file")]
    MissingElement(&'static str),

    /// `--target` named a target the project does not define.
    #[error("Target '{name}' not found (available: {available})")]
    UnknownTarget { name: String, available: String },
}

/// Failures while writing generated artifacts.
#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid compile database JSON: {0}")]
    Json(#[from] serde_json::Error),
}
