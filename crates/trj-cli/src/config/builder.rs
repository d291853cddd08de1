use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::error::{CliError, Result};
use lammpstrj::engine::config::{LoadConfig, LoadConfigBuilder};
use std::path::Path;

/// Merges built-in defaults, the optional TOML file, `--set` overrides and the
/// subcommand's own `--stride` flag, in increasing order of precedence.
pub fn build_config(
    config_path: Option<&Path>,
    set_values: &[String],
    stride: Option<usize>,
) -> Result<LoadConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(path) = config_path {
        FileConfig::from_file(path)?
    } else {
        FileConfig::default()
    };
    let file_config = apply_set_values(file_config, set_values)?;

    let parsing = file_config.parsing.unwrap_or_default();
    let sampling = file_config.sampling.unwrap_or_default();

    LoadConfigBuilder::new()
        .separator(parsing.separator.unwrap_or(defaults.separator))
        .duplicate_ids(parsing.duplicate_ids.unwrap_or(defaults.duplicate_ids))
        .column_layout(parsing.column_layout.unwrap_or(defaults.column_layout))
        .stride(stride.or(sampling.stride).unwrap_or(defaults.stride))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key.trim() {
            "parsing.separator" => {
                config
                    .parsing
                    .get_or_insert_with(Default::default)
                    .separator = Some(parse_separator(value_str)?);
            }
            "parsing.duplicate-ids" => {
                config
                    .parsing
                    .get_or_insert_with(Default::default)
                    .duplicate_ids = Some(
                    value_str
                        .parse()
                        .map_err(|e| CliError::Config(format!("{}: {}", key, e)))?,
                );
            }
            "parsing.column-layout" => {
                config
                    .parsing
                    .get_or_insert_with(Default::default)
                    .column_layout = Some(
                    value_str
                        .parse()
                        .map_err(|e| CliError::Config(format!("{}: {}", key, e)))?,
                );
            }
            "sampling.stride" => {
                config
                    .sampling
                    .get_or_insert_with(Default::default)
                    .stride = Some(value_str.trim().parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            other => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    other
                )));
            }
        }
    }
    Ok(config)
}

/// Accepts a single character, or the names `space`, `tab` and `comma` for
/// separators that are awkward to pass on a command line.
fn parse_separator(value: &str) -> Result<char> {
    match value {
        "space" => return Ok(' '),
        "tab" | "\\t" => return Ok('\t'),
        "comma" => return Ok(','),
        _ => {}
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(CliError::Config(format!(
            "Invalid separator '{}': expected a single character",
            value
        ))),
    }
}
