//! Configuration management for restgen code generation.
//!
//! This module defines the `Config` struct, which names the symbol table to read
//! and the directory to write into, and the nested `GenerationOptions` that shape
//! the emitted code. Configuration files may be YAML, JSON or TOML; the format
//! is chosen by file extension.
//!
//! # Examples
//!
//! ```no_run
//! use restgen_core::config::Config;
//!
//! # #[tokio::main]
//! # async fn main() -> restgen_core::Result<()> {
//! // Create a new config programmatically
//! let mut config = Config::new("symbols.yaml", "Generated");
//! config.options.nullable_enabled = true;
//!
//! // Or load it from a file
//! let config = Config::from_file("restgen.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Configuration for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the exported symbol table (YAML or JSON)
    pub symbols_path: String,

    /// Output directory for generated sources
    pub output_dir: String,

    /// Options controlling the emitted code
    #[serde(default)]
    pub options: GenerationOptions,
}

/// Options controlling the emitted code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Namespace the marker attributes are declared in
    #[serde(default = "default_attribute_namespace")]
    pub attribute_namespace: String,

    /// Client member name used when `RestClient` does not name one
    #[serde(default = "default_client_name")]
    pub default_client_name: String,

    /// One level of indentation
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Whether the consuming project already enables nullable reference types
    #[serde(default)]
    pub nullable_enabled: bool,

    /// Emit XML documentation comments on generated endpoints
    #[serde(default = "default_true")]
    pub doc_comments: bool,

    /// Namespace of the emitted URL builder
    #[serde(default = "default_runtime_namespace")]
    pub runtime_namespace: String,

    /// Emit the URL builder support unit alongside the clients
    #[serde(default = "default_true")]
    pub emit_runtime: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            attribute_namespace: default_attribute_namespace(),
            default_client_name: default_client_name(),
            indent: default_indent(),
            nullable_enabled: false,
            doc_comments: true,
            runtime_namespace: default_runtime_namespace(),
            emit_runtime: true,
        }
    }
}

impl GenerationOptions {
    /// Attributes from the configured namespace, or declared without one.
    pub fn owns_attribute(&self, namespace: &str) -> bool {
        namespace.is_empty() || namespace == self.attribute_namespace
    }
}

/// On-disk encoding of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

impl Config {
    /// Create a new Config with default options
    pub fn new(symbols_path: impl Into<String>, output_dir: impl Into<String>) -> Self {
        Self {
            symbols_path: symbols_path.into(),
            output_dir: output_dir.into(),
            options: GenerationOptions::default(),
        }
    }

    /// Load configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let config = match Format::of(path) {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
            Format::Yaml => serde_yaml::from_str(&content)?,
        };
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        let content = match Format::of(path) {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
            Format::Yaml => serde_yaml::to_string(self)?,
        };
        fs::write(path, content).await?;
        Ok(())
    }
}

fn default_attribute_namespace() -> String {
    "RestGen.Attributes".to_string()
}

fn default_client_name() -> String {
    "Client".to_string()
}

fn default_indent() -> String {
    "\t".to_string()
}

fn default_runtime_namespace() -> String {
    "RestGen.Runtime".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_roundtrip() -> crate::Result<()> {
        let dir = tempdir()?;

        let mut config = Config::new("symbols.yaml", "Generated");
        config.options.indent = "    ".to_string();

        for name in ["restgen.yaml", "restgen.json", "restgen.toml"] {
            let file_path = dir.path().join(name);
            config.save(&file_path).await?;
            let loaded = Config::from_file(&file_path).await?;
            assert_eq!(loaded, config, "roundtrip through {name}");
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_options_use_defaults() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("restgen.yaml");
        fs::write(&file_path, "symbols_path: a.yaml\noutput_dir: out\n").await?;

        let loaded = Config::from_file(&file_path).await?;
        assert_eq!(loaded.options, GenerationOptions::default());
        assert_eq!(loaded.options.default_client_name, "Client");
        assert!(loaded.options.owns_attribute(""));
        assert!(loaded.options.owns_attribute("RestGen.Attributes"));
        assert!(!loaded.options.owns_attribute("System.Text.Json.Serialization"));
        Ok(())
    }
}
