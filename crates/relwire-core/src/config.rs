//! Plan configuration that downstream crates can serialize/deserialize.
//!
//! Encoding itself takes no configuration; these settings only shape the
//! plan envelope (extension URI, producer) and the CLI output.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default extension URI declared for registered functions.
pub const DEFAULT_EXTENSION_URI: &str = "/functions.yaml";

/// How the CLI renders an encoded plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Raw protobuf wire bytes.
    #[default]
    Binary,
    /// Lowercase hex of the wire bytes.
    Hex,
    /// Pretty JSON of the message structure.
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" | "bin" => Ok(OutputFormat::Binary),
            "hex" => Ok(OutputFormat::Hex),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::Config(format!("unknown output format '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// URI of the extension file that declares registered functions.
    pub extension_uri: String,

    /// Producer name recorded in the plan version block.
    pub producer: String,

    /// Output rendering used by the CLI.
    pub output_format: OutputFormat,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            extension_uri: DEFAULT_EXTENSION_URI.to_string(),
            producer: format!("relwire/{}", crate::VERSION),
            output_format: OutputFormat::default(),
        }
    }
}

impl PlanConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `RELWIRE_EXTENSION_URI`: extension URI for function declarations
    /// - `RELWIRE_PRODUCER`: producer name in the plan version block
    /// - `RELWIRE_OUTPUT_FORMAT`: `binary`, `hex` or `json`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("RELWIRE_EXTENSION_URI") {
            if !s.trim().is_empty() {
                cfg.extension_uri = s;
            }
        }

        if let Ok(s) = std::env::var("RELWIRE_PRODUCER") {
            if !s.trim().is_empty() {
                cfg.producer = s;
            }
        }

        if let Ok(s) = std::env::var("RELWIRE_OUTPUT_FORMAT") {
            if let Ok(v) = s.parse::<OutputFormat>() {
                cfg.output_format = v;
            }
        }

        cfg
    }

    /// Apply overrides; `None` keeps the current value.
    pub fn merge(&mut self, overrides: &PlanConfigOverrides) {
        if let Some(uri) = &overrides.extension_uri {
            self.extension_uri = uri.clone();
        }
        if let Some(producer) = &overrides.producer {
            self.producer = producer.clone();
        }
        if let Some(fmt) = overrides.output_format {
            self.output_format = fmt;
        }
    }
}

/// Partial config as found in a pipeline file or on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfigOverrides {
    pub extension_uri: Option<String>,
    pub producer: Option<String>,
    pub output_format: Option<OutputFormat>,
}
