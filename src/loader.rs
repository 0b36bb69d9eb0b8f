//! Document loader - condition trees and data records from JSON or YAML
//!
//! The format is chosen from the file extension: `.yaml`/`.yml` are read as
//! YAML, everything else as JSON.

use crate::condition::{ConditionNode, DataRecord};
use crate::error::ConditionError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick the format for a path from its extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Format::Yaml
            }
            _ => Format::Json,
        }
    }
}

/// Loads condition trees and data records
pub struct DocumentLoader;

impl DocumentLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a condition tree from a file
    pub fn load_condition<P: AsRef<Path>>(&self, path: P) -> Result<ConditionNode, ConditionError> {
        Self::load(path.as_ref())
    }

    /// Load a data record from a file
    pub fn load_record<P: AsRef<Path>>(&self, path: P) -> Result<DataRecord, ConditionError> {
        let value: Value = Self::load(path.as_ref())?;
        DataRecord::from_json(value)
    }

    /// Parse a condition tree from a JSON string
    pub fn parse_condition_json(content: &str) -> Result<ConditionNode, ConditionError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a condition tree from a YAML string
    pub fn parse_condition_yaml(content: &str) -> Result<ConditionNode, ConditionError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a data record from a JSON string
    pub fn parse_record_json(content: &str) -> Result<DataRecord, ConditionError> {
        DataRecord::from_json(serde_json::from_str(content)?)
    }

    /// Parse a data record from a YAML string
    pub fn parse_record_yaml(content: &str) -> Result<DataRecord, ConditionError> {
        DataRecord::from_json(serde_yaml::from_str(content)?)
    }

    fn load<T: DeserializeOwned>(path: &Path) -> Result<T, ConditionError> {
        log::debug!("Loading {}", path.display());
        let content = fs::read_to_string(path)?;
        match Format::from_path(path) {
            Format::Json => Ok(serde_json::from_str(&content)?),
            Format::Yaml => Ok(serde_yaml::from_str(&content)?),
        }
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}
