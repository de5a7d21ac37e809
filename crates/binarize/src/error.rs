use thiserror::Error;

/// Rejected configuration values. Raised when a value is assigned or when a
/// builder is finalized, never during a pipeline run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Block size must be odd, got {0}")]
    EvenBlockSize(u32),

    #[error("Blur kernel size must be 0 or odd, got {0}")]
    EvenBlurKernelSize(u32),
}

#[derive(Error, Debug)]
pub enum BinarizeError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Failed to save image: {0}")]
    ImageSave(image::ImageError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Raster size mismatch: expected {expected} samples, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Raster is not binary: sample {value} at ({x}, {y})")]
    NotBinary { x: u32, y: u32, value: u8 },

    #[error("Unsupported config file format: {0}")]
    UnsupportedConfigFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BinarizeError>;
