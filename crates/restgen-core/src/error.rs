//! Error handling for the restgen code generation library.
//!
//! Generation itself never fails: malformed metadata degrades to defaults.
//! The errors below cover the edges of the pipeline, loading a symbol table or
//! configuration and writing generated units to disk.
//!
//! # Examples
//!
//! ```
//! use restgen_core::error::{Error, Result};
//!
//! fn load() -> Result<()> {
//!     Err(Error::symbols("no types declared"))
//! }
//!
//! assert!(load().is_err());
//! ```

use thiserror::Error;

/// Result type for restgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for restgen operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Symbol table error
    #[error("Symbol table error: {0}")]
    Symbols(String),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new symbol table error
    pub fn symbols<S: Into<String>>(msg: S) -> Self {
        Self::Symbols(msg.into())
    }
}
