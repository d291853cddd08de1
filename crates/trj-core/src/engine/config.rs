use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {parameter}: {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// How repeated atom ids within one frame are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Reject the input with a parse error.
    Strict,
    /// Keep every record in its original relative order and emit a diagnostic.
    #[default]
    Permissive,
}

/// How the columns of an atom line are mapped onto `id type x y z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnLayout {
    /// Columns are positional: `id type x y z`, extra trailing columns ignored.
    #[default]
    Fixed,
    /// Columns are located by name in the first `ITEM: ATOMS` header.
    Header,
}

macro_rules! impl_kebab_from_str {
    ($ty:ident, $($name:literal => $variant:ident),+ $(,)?) => {
        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(ConfigError::InvalidValue {
                        parameter: stringify!($ty),
                        reason: format!(
                            "'{}' is not one of: {}",
                            other,
                            [$($name),+].join(", ")
                        ),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let name = match self {
                    $($ty::$variant => $name,)+
                };
                f.write_str(name)
            }
        }
    };
}

impl_kebab_from_str!(DuplicatePolicy, "strict" => Strict, "permissive" => Permissive);
impl_kebab_from_str!(ColumnLayout, "fixed" => Fixed, "header" => Header);

/// Options controlling how atom lines are tokenized and interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseConfig {
    /// Field separator for atom and box lines. Whitespace separators split on any run
    /// of whitespace.
    pub separator: char,
    pub duplicate_ids: DuplicatePolicy,
    pub column_layout: ColumnLayout,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            separator: ' ',
            duplicate_ids: DuplicatePolicy::default(),
            column_layout: ColumnLayout::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
    pub parse: ParseConfig,
    /// Keep every `stride`-th frame after parsing; `1` keeps all frames.
    pub stride: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            parse: ParseConfig::default(),
            stride: 1,
        }
    }
}

#[derive(Default)]
pub struct LoadConfigBuilder {
    separator: Option<char>,
    duplicate_ids: Option<DuplicatePolicy>,
    column_layout: Option<ColumnLayout>,
    stride: Option<usize>,
}

impl LoadConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }
    pub fn duplicate_ids(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_ids = Some(policy);
        self
    }
    pub fn column_layout(mut self, layout: ColumnLayout) -> Self {
        self.column_layout = Some(layout);
        self
    }
    pub fn stride(mut self, stride: usize) -> Self {
        self.stride = Some(stride);
        self
    }

    pub fn build(self) -> Result<LoadConfig, ConfigError> {
        let defaults = ParseConfig::default();
        let stride = self.stride.unwrap_or(1);
        if stride == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "stride",
                reason: "must be a positive integer".to_string(),
            });
        }
        let separator = self.separator.unwrap_or(defaults.separator);
        if separator == '\n' || separator == '\r' {
            return Err(ConfigError::InvalidValue {
                parameter: "separator",
                reason: "line terminators cannot separate fields".to_string(),
            });
        }
        Ok(LoadConfig {
            parse: ParseConfig {
                separator,
                duplicate_ids: self.duplicate_ids.unwrap_or(defaults.duplicate_ids),
                column_layout: self.column_layout.unwrap_or(defaults.column_layout),
            },
            stride,
        })
    }
}
