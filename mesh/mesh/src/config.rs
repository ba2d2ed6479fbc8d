//! TOML pipeline documents.
//!
//! ```toml
//! center_on_load = true
//!
//! [hole_fill]
//! max_hole_edges = 500
//!
//! [[operations]]
//! op = "repair"
//!
//! [[operations]]
//! op = "simplify"
//! factor = 0.5
//! ```

use std::path::{Path, PathBuf};

use mesh_repair::HoleFillParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::operation::Operation;
use crate::session::SessionSettings;

/// Errors reading or writing a pipeline document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("failed to access config file {path}: {source}")]
    File {
        /// The config path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The document is not a valid pipeline.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The pipeline could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Settings plus an ordered list of operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Center meshes on the origin when loaded, repaired or decimated.
    pub center_on_load: bool,
    /// Built-in repairer and hole-fill settings.
    pub hole_fill: HoleFillParams,
    /// Operations run in order.
    pub operations: Vec<Operation>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            center_on_load: true,
            hole_fill: HoleFillParams::default(),
            operations: vec![Operation::Repair],
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for invalid TOML or unknown operations.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::File`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not a valid pipeline.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Save configuration to file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Serialize`] or [`ConfigError::File`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| ConfigError::File {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Session settings described by this document.
    #[must_use]
    pub fn settings(&self) -> SessionSettings {
        SessionSettings {
            center_on_load: self.center_on_load,
            hole_fill: self.hole_fill.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_shell::{RimStyle, SolidifyParams};

    #[test]
    fn parses_a_pipeline() {
        let config = PipelineConfig::from_toml_str(
            r#"
center_on_load = false

[hole_fill]
max_hole_edges = 500

[[operations]]
op = "repair"

[[operations]]
op = "weld"
threshold = 1e-6

[[operations]]
op = "solidify"
thickness = 2.0
rim = "triangles"
"#,
        )
        .unwrap();

        assert!(!config.center_on_load);
        assert_eq!(config.hole_fill.max_hole_edges, 500);
        assert_eq!(config.hole_fill.weld_epsilon, HoleFillParams::default().weld_epsilon);
        assert_eq!(
            config.operations,
            vec![
                Operation::Repair,
                Operation::Weld { threshold: 1e-6 },
                Operation::Solidify(SolidifyParams::with_thickness(2.0).with_rim(RimStyle::Triangles)),
            ]
        );
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(PipelineConfig::from_toml_str("").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let err = PipelineConfig::from_toml_str("[[operations]]\nop = \"explode\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        let config = PipelineConfig {
            operations: vec![
                Operation::Repair,
                Operation::Simplify { factor: 0.25 },
                Operation::SmoothShade,
            ],
            ..PipelineConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(PipelineConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = PipelineConfig::from_file("no/such/pipeline.toml").unwrap_err();
        assert!(err.to_string().contains("no/such/pipeline.toml"));
    }
}
