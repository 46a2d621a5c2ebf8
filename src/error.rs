use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColorError {
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    ConfigError(#[from] config::ConfigError),

    #[error(transparent)]
    SetLoggerError(#[from] log::SetLoggerError),

    #[error("Invalid chromaticity for {what}: ({x}, {y})")]
    InvalidChromaticity { what: String, x: f64, y: f64 },

    #[error("Singular matrix: {0}")]
    SingularMatrix(String),

    #[error("Unknown color space [{0}]")]
    UnknownColorSpace(String),
}

pub type ColorResult<T> = Result<T, ColorError>;
