use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GraphError, Result};
use crate::format::SnapshotFormat;

pub const DEFAULT_SENTENCE_DELIMITERS: &str = ".?!;()";
pub const DEFAULT_WORD_DELIMITERS: &str = " \t\r\n\x0b\x0c";
pub const DEFAULT_WORD_TRIM: &str = ",:\"";

/// Tokenization and persistence settings for a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Characters that end a sentence
    pub sentence_delimiters: String,
    /// Characters that separate words inside a sentence
    pub word_delimiters: String,
    /// Characters stripped from both ends of every word
    pub word_trim: String,
    /// Relation count used when a caller does not ask for one
    pub default_top_relations: usize,
    /// Snapshot format written by `save`
    pub format: SnapshotFormat,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            sentence_delimiters: DEFAULT_SENTENCE_DELIMITERS.to_string(),
            word_delimiters: DEFAULT_WORD_DELIMITERS.to_string(),
            word_trim: DEFAULT_WORD_TRIM.to_string(),
            default_top_relations: 10,
            format: SnapshotFormat::TopologyV1,
        }
    }
}

impl GraphConfig {
    /// Load a JSON config; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
        Self::from_json_str(&contents).map_err(|message| GraphError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    fn from_json_str(contents: &str) -> std::result::Result<Self, String> {
        let config: GraphConfig = serde_json::from_str(contents).map_err(|e| e.to_string())?;
        if config.word_delimiters.is_empty() {
            return Err("word_delimiters must not be empty".to_string());
        }
        Ok(config)
    }
}
