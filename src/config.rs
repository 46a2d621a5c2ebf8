use std::collections::BTreeMap;

use camino::Utf8Path;
use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, FileFormat};
use serde::{Deserialize, Serialize};

use crate::colorspace::{ColorSpace, Illuminant};
use crate::output::OutputFormat;
use crate::types::XY;

pub const DEFAULT_PRECISION: usize = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    pub precision: usize,
    pub format: OutputFormat,
}

/// Whitepoint given either as a standard illuminant name or a chromaticity
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WhitePoint {
    Illuminant(Illuminant),
    Chromaticity(XY),
}

impl WhitePoint {
    #[must_use]
    pub fn xy(self) -> XY {
        match self {
            Self::Illuminant(illuminant) => illuminant.xy(),
            Self::Chromaticity(xy) => xy,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColorSpaceConfig {
    pub name: Option<String>,
    pub white: WhitePoint,
    pub red: XY,
    pub green: XY,
    pub blue: XY,
}

impl ColorSpaceConfig {
    #[must_use]
    pub fn to_colorspace(&self, key: &str) -> ColorSpace {
        ColorSpace::new(
            self.name.as_deref().unwrap_or(key),
            self.white.xy(),
            self.red,
            self.green,
            self.blue,
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub output: OutputConfig,
    #[serde(default)]
    pub colorspaces: BTreeMap<String, ColorSpaceConfig>,
}

impl AppConfig {
    /// Command line values take precedence over the config file
    #[must_use]
    pub fn apply_overrides(self, precision: Option<usize>, format: Option<OutputFormat>) -> Self {
        Self {
            output: OutputConfig {
                precision: precision.unwrap_or(self.output.precision),
                format: format.unwrap_or(self.output.format),
            },
            ..self
        }
    }
}

fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("output.precision", DEFAULT_PRECISION as i64)?
        .set_default("output.format", "text")
}

/// Built-in defaults only, used when no config file is given
pub fn defaults() -> Result<AppConfig, ConfigError> {
    builder()?.build()?.try_deserialize()
}

pub fn parse(filename: &Utf8Path) -> Result<AppConfig, ConfigError> {
    let settings = builder()?
        .add_source(config::File::with_name(filename.as_str()))
        .build()?;

    settings.try_deserialize()
}

pub fn parse_str(yaml: &str) -> Result<AppConfig, ConfigError> {
    let settings = builder()?
        .add_source(config::File::from_str(yaml, FileFormat::Yaml))
        .build()?;

    settings.try_deserialize()
}
