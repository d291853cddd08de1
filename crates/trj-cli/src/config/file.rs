use crate::error::{CliError, Result};
use lammpstrj::engine::config::{ColumnLayout, DuplicatePolicy};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub parsing: Option<FileParsingConfig>,
    pub sampling: Option<FileSamplingConfig>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileParsingConfig {
    pub separator: Option<char>,
    pub duplicate_ids: Option<DuplicatePolicy>,
    pub column_layout: Option<ColumnLayout>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileSamplingConfig {
    pub stride: Option<usize>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
