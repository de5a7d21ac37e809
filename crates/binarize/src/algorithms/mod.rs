pub mod grayscale;
pub mod integral;
pub mod morphology;
pub mod preprocessing;
pub mod threshold;

#[cfg(feature = "imageproc-backend")]
pub mod imageproc_backend;

pub use grayscale::*;
pub use integral::IntegralImage;
pub use morphology::*;
pub use preprocessing::*;
pub use threshold::*;

#[cfg(feature = "imageproc-backend")]
pub use imageproc_backend::ImageprocThreshold;
