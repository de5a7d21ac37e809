use std::path::PathBuf;
use std::time::Instant;

use binarize::{
    Algorithm, Backend, BinarizeConfig, BinarizeConfigBuilder, Binarizer, Pipeline, Preset,
    algorithms::to_grayscale, load_image, otsu_threshold, save_binary,
};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

/// Convert an image to black and white
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the input image file
    pub input: PathBuf,

    /// Path to the output image file (format follows the extension, PNG otherwise)
    pub output: PathBuf,

    /// GLOBAL, OTSU (default), ADAPTIVE_MEAN or ADAPTIVE_GAUSSIAN
    #[arg(long)]
    pub algorithm: Option<Algorithm>,

    /// Threshold for GLOBAL (0-255, default 128)
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Window size for adaptive methods (odd, default 11)
    #[arg(long)]
    pub block_size: Option<u32>,

    /// Constant subtracted from the local mean (default 2.0)
    #[arg(long = "c", allow_negative_numbers = true)]
    pub c: Option<f64>,

    /// Blur kernel size (odd, 0 disables blur)
    #[arg(long)]
    pub blur: Option<u32>,

    /// Use median blur instead of Gaussian
    #[arg(long)]
    pub median_blur: bool,

    /// Apply morphological opening (removes white specks)
    #[arg(long)]
    pub morph_open: bool,

    /// Apply morphological closing (fills black holes)
    #[arg(long)]
    pub morph_close: bool,

    /// Kernel size for morphological operations (default 3)
    #[arg(long)]
    pub morph_kernel: Option<u32>,

    /// builtin (default) or imageproc
    #[arg(long)]
    pub backend: Option<Backend>,

    /// Start from a named parameter set: ocr or uneven-lighting
    #[arg(long)]
    pub preset: Option<Preset>,

    /// TOML or JSON config file; explicit flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Merge preset, config file and flags, later sources winning
    pub fn to_config(&self) -> Result<BinarizeConfig> {
        let mut builder = self
            .preset
            .map(Preset::builder)
            .unwrap_or_else(BinarizeConfigBuilder::new);

        if let Some(path) = &self.config {
            builder = builder
                .overlay_file(path)
                .wrap_err_with(|| format!("Failed to load config file {}", path.display()))?;
        }

        if let Some(algorithm) = self.algorithm {
            builder = builder.algorithm(algorithm);
        }
        if let Some(threshold) = self.threshold {
            builder = builder.threshold(threshold);
        }
        if let Some(block_size) = self.block_size {
            builder = builder.block_size(block_size);
        }
        if let Some(c) = self.c {
            builder = builder.c(c);
        }
        if let Some(blur) = self.blur {
            builder = builder.blur_kernel_size(blur);
        }
        if self.median_blur {
            builder = builder.use_median_blur(true);
        }
        if self.morph_open {
            builder = builder.morphological_opening(true);
        }
        if self.morph_close {
            builder = builder.morphological_closing(true);
        }
        if let Some(size) = self.morph_kernel {
            builder = builder.morph_kernel_size(size);
        }
        if let Some(backend) = self.backend {
            builder = builder.backend(backend);
        }

        Ok(builder.build()?)
    }
}

/// Exit status for an argument parsing failure.
///
/// Usage errors exit with 1 rather than clap's default of 2. `--help` and
/// `--version` come back as errors too and exit with 0.
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() { 1 } else { 0 }
}

/// Load, binarize and save according to the parsed arguments
pub fn run(cli: &Cli) -> Result<()> {
    let config = cli.to_config()?;

    info!("Binarizing image");
    info!("  Input: {}", cli.input.display());
    info!("  Output: {}", cli.output.display());
    let algorithm = config.algorithm();
    info!("  Algorithm: {algorithm} ({})", algorithm.description());
    if algorithm.is_approximated() {
        info!("  {algorithm} runs as {}", algorithm.resolved());
    }

    let pipeline = Pipeline::from_config(&config)?;
    info!("  {}", pipeline.info());

    let image = load_image(&cli.input)
        .wrap_err_with(|| format!("Failed to read {}", cli.input.display()))?;
    info!("  Input size: {}x{}", image.width(), image.height());

    let gray = to_grayscale(image);
    if *pipeline.binarizer() == Binarizer::Otsu {
        let level = otsu_threshold(&pipeline.preprocess(gray.clone()));
        info!("  Calculated Otsu threshold: {level}");
    }

    let start = Instant::now();
    let binary = pipeline.process(gray);
    let elapsed = start.elapsed();

    save_binary(&binary, &cli.output)
        .wrap_err_with(|| format!("Failed to write {}", cli.output.display()))?;

    info!("  Output size: {}x{}", binary.width(), binary.height());
    info!("  Processing time: {}ms", elapsed.as_millis());
    info!("Done!");
    Ok(())
}
