use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::error::{BinarizeError, ConfigError, Result};

/// Thresholding algorithm selection
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, Hash
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Algorithm {
    /// Fixed global threshold
    Global,
    /// Otsu's automatic global threshold
    #[default]
    Otsu,
    /// Local mean over a square window
    AdaptiveMean,
    /// Accepted for compatibility; runs as [`Algorithm::AdaptiveMean`]
    AdaptiveGaussian,
}

impl Algorithm {
    /// The algorithm that actually runs when this one is requested.
    ///
    /// `AdaptiveGaussian` has no Gaussian-weighted implementation and is
    /// approximated by the unweighted local mean.
    pub fn resolved(self) -> Algorithm {
        match self {
            Self::AdaptiveGaussian => Self::AdaptiveMean,
            other => other,
        }
    }

    /// Whether [`Algorithm::resolved`] substitutes a different algorithm
    pub fn is_approximated(self) -> bool {
        self.resolved() != self
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Global => "Fixed threshold: white where the sample is at least the threshold",
            Self::Otsu => "Automatic global threshold maximizing between-class variance",
            Self::AdaptiveMean => "Per-pixel threshold from the mean of a local window minus C",
            Self::AdaptiveGaussian => "Approximated by adaptive mean thresholding",
        }
    }
}

/// Implementation backing the threshold stage
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, Hash
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Backend {
    /// The engine's own implementations
    #[default]
    Builtin,
    /// `imageproc` thresholding, available with the `imageproc-backend` feature
    Imageproc,
}

impl Backend {
    pub fn is_available(self) -> bool {
        match self {
            Self::Builtin => true,
            Self::Imageproc => cfg!(feature = "imageproc-backend"),
        }
    }
}

/// Named parameter sets for common inputs
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Preset {
    /// Otsu with a light Gaussian blur
    Ocr,
    /// Adaptive mean for unevenly lit scans
    UnevenLighting,
}

impl Preset {
    pub fn builder(self) -> BinarizeConfigBuilder {
        match self {
            Self::Ocr => BinarizeConfigBuilder::new()
                .algorithm(Algorithm::Otsu)
                .blur_kernel_size(3)
                .use_median_blur(false),
            Self::UnevenLighting => BinarizeConfigBuilder::new()
                .algorithm(Algorithm::AdaptiveMean)
                .block_size(11)
                .c(2.0)
                .blur_kernel_size(3),
        }
    }
}

/// Validated binarization parameters.
///
/// Every instance satisfies the parameter invariants: `block_size` is odd and
/// `blur_kernel_size` is 0 or odd. Setters check the new value before storing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BinarizeConfigBuilder", into = "BinarizeConfigBuilder")]
pub struct BinarizeConfig {
    algorithm: Algorithm,
    threshold: u8,
    block_size: u32,
    c: f64,
    blur_kernel_size: u32,
    use_median_blur: bool,
    use_morphological_opening: bool,
    use_morphological_closing: bool,
    morph_kernel_size: u32,
    backend: Backend,
}

impl Default for BinarizeConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Otsu,
            threshold: 128,
            block_size: 11,
            c: 2.0,
            blur_kernel_size: 0,
            use_median_blur: false,
            use_morphological_opening: false,
            use_morphological_closing: false,
            morph_kernel_size: 3,
            backend: Backend::Builtin,
        }
    }
}

impl BinarizeConfig {
    pub fn builder() -> BinarizeConfigBuilder {
        BinarizeConfigBuilder::new()
    }

    /// Otsu with a 3x3 Gaussian blur, suited to text recognition input
    pub fn for_ocr() -> Self {
        Self::from_preset(Preset::Ocr)
    }

    /// Adaptive mean with block 11, C 2.0 and a 3x3 Gaussian blur
    pub fn for_uneven_lighting() -> Self {
        Self::from_preset(Preset::UnevenLighting)
    }

    pub fn from_preset(preset: Preset) -> Self {
        // Preset values are fixed and valid.
        preset
            .builder()
            .build()
            .unwrap_or_default()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn blur_kernel_size(&self) -> u32 {
        self.blur_kernel_size
    }

    pub fn use_median_blur(&self) -> bool {
        self.use_median_blur
    }

    pub fn use_morphological_opening(&self) -> bool {
        self.use_morphological_opening
    }

    pub fn use_morphological_closing(&self) -> bool {
        self.use_morphological_closing
    }

    pub fn morph_kernel_size(&self) -> u32 {
        self.morph_kernel_size
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> &mut Self {
        self.algorithm = algorithm;
        self
    }

    pub fn set_threshold(&mut self, threshold: u8) -> &mut Self {
        self.threshold = threshold;
        self
    }

    /// Fails without modifying the config when `block_size` is even
    pub fn set_block_size(&mut self, block_size: u32) -> std::result::Result<&mut Self, ConfigError> {
        validate_block_size(block_size)?;
        self.block_size = block_size;
        Ok(self)
    }

    pub fn set_c(&mut self, c: f64) -> &mut Self {
        self.c = c;
        self
    }

    /// Fails without modifying the config when `size` is non-zero and even
    pub fn set_blur_kernel_size(&mut self, size: u32) -> std::result::Result<&mut Self, ConfigError> {
        validate_blur_kernel_size(size)?;
        self.blur_kernel_size = size;
        Ok(self)
    }

    pub fn set_use_median_blur(&mut self, enabled: bool) -> &mut Self {
        self.use_median_blur = enabled;
        self
    }

    pub fn set_use_morphological_opening(&mut self, enabled: bool) -> &mut Self {
        self.use_morphological_opening = enabled;
        self
    }

    pub fn set_use_morphological_closing(&mut self, enabled: bool) -> &mut Self {
        self.use_morphological_closing = enabled;
        self
    }

    pub fn set_morph_kernel_size(&mut self, size: u32) -> &mut Self {
        self.morph_kernel_size = size;
        self
    }

    pub fn set_backend(&mut self, backend: Backend) -> &mut Self {
        self.backend = backend;
        self
    }

    /// Get the JSON schema of the serialized configuration
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(BinarizeConfigBuilder)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        BinarizeConfigBuilder::from_file(path)?.build().map_err(Into::into)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Unvalidated configuration, checked once by [`BinarizeConfigBuilder::build`].
///
/// Missing fields in serialized form take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct BinarizeConfigBuilder {
    pub algorithm: Algorithm,
    pub threshold: u8,
    /// Window side for adaptive methods, must be odd
    #[schemars(range(min = 1))]
    pub block_size: u32,
    /// Bias subtracted from the local mean
    pub c: f64,
    /// 0 disables blur, otherwise must be odd
    pub blur_kernel_size: u32,
    pub use_median_blur: bool,
    pub use_morphological_opening: bool,
    pub use_morphological_closing: bool,
    pub morph_kernel_size: u32,
    pub backend: Backend,
}

impl Default for BinarizeConfigBuilder {
    fn default() -> Self {
        BinarizeConfig::default().into()
    }
}

impl BinarizeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn block_size(mut self, block_size: u32) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn blur_kernel_size(mut self, size: u32) -> Self {
        self.blur_kernel_size = size;
        self
    }

    pub fn use_median_blur(mut self, enabled: bool) -> Self {
        self.use_median_blur = enabled;
        self
    }

    pub fn morphological_opening(mut self, enabled: bool) -> Self {
        self.use_morphological_opening = enabled;
        self
    }

    pub fn morphological_closing(mut self, enabled: bool) -> Self {
        self.use_morphological_closing = enabled;
        self
    }

    pub fn morph_kernel_size(mut self, size: u32) -> Self {
        self.morph_kernel_size = size;
        self
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Auto-detect file format and load unvalidated parameters
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(serde_json::from_value(read_config_value(path.as_ref())?)?)
    }

    /// Replace only the fields a config file sets, keeping the rest of `self`
    pub fn overlay_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let overrides = read_config_value(path.as_ref())?;
        let serde_json::Value::Object(overrides) = overrides else {
            return Ok(serde_json::from_value(overrides)?);
        };

        let mut merged = serde_json::to_value(self)?;
        if let serde_json::Value::Object(fields) = &mut merged {
            fields.extend(overrides);
        }
        Ok(serde_json::from_value(merged)?)
    }

    /// Validate every field and produce a [`BinarizeConfig`]
    pub fn build(self) -> std::result::Result<BinarizeConfig, ConfigError> {
        validate_block_size(self.block_size)?;
        validate_blur_kernel_size(self.blur_kernel_size)?;

        Ok(BinarizeConfig {
            algorithm: self.algorithm,
            threshold: self.threshold,
            block_size: self.block_size,
            c: self.c,
            blur_kernel_size: self.blur_kernel_size,
            use_median_blur: self.use_median_blur,
            use_morphological_opening: self.use_morphological_opening,
            use_morphological_closing: self.use_morphological_closing,
            morph_kernel_size: self.morph_kernel_size,
            backend: self.backend,
        })
    }
}

impl TryFrom<BinarizeConfigBuilder> for BinarizeConfig {
    type Error = ConfigError;

    fn try_from(builder: BinarizeConfigBuilder) -> std::result::Result<Self, ConfigError> {
        builder.build()
    }
}

impl From<BinarizeConfig> for BinarizeConfigBuilder {
    fn from(config: BinarizeConfig) -> Self {
        Self {
            algorithm: config.algorithm,
            threshold: config.threshold,
            block_size: config.block_size,
            c: config.c,
            blur_kernel_size: config.blur_kernel_size,
            use_median_blur: config.use_median_blur,
            use_morphological_opening: config.use_morphological_opening,
            use_morphological_closing: config.use_morphological_closing,
            morph_kernel_size: config.morph_kernel_size,
            backend: config.backend,
        }
    }
}

/// Parse a TOML or JSON config file into a generic value tree
fn read_config_value(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Ok(toml::from_str(&content)?),
        Some("json") => Ok(serde_json::from_str(&content)?),
        other => Err(BinarizeError::UnsupportedConfigFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

fn validate_block_size(block_size: u32) -> std::result::Result<(), ConfigError> {
    if block_size % 2 == 0 {
        return Err(ConfigError::EvenBlockSize(block_size));
    }
    Ok(())
}

fn validate_blur_kernel_size(size: u32) -> std::result::Result<(), ConfigError> {
    if size > 0 && size % 2 == 0 {
        return Err(ConfigError::EvenBlurKernelSize(size));
    }
    Ok(())
}
