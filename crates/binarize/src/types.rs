use std::ops::Deref;

use image::GrayImage;

use crate::error::{BinarizeError, Result};

/// Sample value of a white pixel in a [`BinaryRaster`].
pub const WHITE: u8 = 255;
/// Sample value of a black pixel in a [`BinaryRaster`].
pub const BLACK: u8 = 0;

/// An owned 8-bit single-channel pixel buffer in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Create a raster with every sample set to `value`
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Create a black raster
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, BLACK)
    }

    /// Wrap an existing sample buffer, checking its length against the dimensions
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(BinarizeError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self { width, height, data })
    }

    /// Build a raster by evaluating `f(x, y)` for every pixel
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> u8,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major samples
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(self.index(x, y)).copied()
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        self.data.get_mut(idx)
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Convert into an `image` buffer without copying the samples
    pub fn into_gray_image(self) -> GrayImage {
        GrayImage::from_raw(self.width, self.height, self.data)
            .expect("raster length always matches its dimensions")
    }

    /// Sample at `(x, y)` with coordinates clamped to the nearest edge pixel.
    /// Must not be called on an empty raster.
    #[inline]
    pub(crate) fn clamped(&self, x: i64, y: i64) -> u8 {
        let cx = x.clamp(0, self.width as i64 - 1) as usize;
        let cy = y.clamp(0, self.height as i64 - 1) as usize;
        self.data[cy * self.width as usize + cx]
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl From<GrayImage> for Raster {
    fn from(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        // `ImageBuffer::from_raw` accepts containers longer than the image.
        let mut data = image.into_raw();
        data.truncate(width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }
}

/// A [`Raster`] whose samples are all exactly [`BLACK`] or [`WHITE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRaster(Raster);

impl BinaryRaster {
    /// Build from a per-pixel predicate, `true` meaning white
    pub fn from_fn<F>(width: u32, height: u32, mut is_white: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        Self(Raster::from_fn(width, height, |x, y| {
            if is_white(x, y) { WHITE } else { BLACK }
        }))
    }

    /// Build by classifying each sample of `source` in order, `true` meaning white
    pub(crate) fn classify<F>(source: &Raster, mut is_white: F) -> Self
    where
        F: FnMut(u8) -> bool,
    {
        let data = source
            .as_slice()
            .iter()
            .map(|&p| if is_white(p) { WHITE } else { BLACK })
            .collect();

        Self(Raster {
            width: source.width(),
            height: source.height(),
            data,
        })
    }

    /// `Some(true)` for white, `Some(false)` for black, `None` out of bounds
    pub fn is_white(&self, x: u32, y: u32) -> Option<bool> {
        self.0.get(x, y).map(|v| v == WHITE)
    }

    pub fn white_count(&self) -> usize {
        self.0.as_slice().iter().filter(|&&v| v == WHITE).count()
    }

    pub fn as_raster(&self) -> &Raster {
        &self.0
    }

    pub fn into_raster(self) -> Raster {
        self.0
    }

    pub fn into_gray_image(self) -> GrayImage {
        self.0.into_gray_image()
    }
}

impl Deref for BinaryRaster {
    type Target = Raster;

    fn deref(&self) -> &Raster {
        &self.0
    }
}

impl TryFrom<Raster> for BinaryRaster {
    type Error = BinarizeError;

    fn try_from(raster: Raster) -> Result<Self> {
        if let Some(pos) = raster
            .as_slice()
            .iter()
            .position(|&v| v != BLACK && v != WHITE)
        {
            let width = raster.width() as usize;
            return Err(BinarizeError::NotBinary {
                x: (pos % width) as u32,
                y: (pos / width) as u32,
                value: raster.as_slice()[pos],
            });
        }
        Ok(Self(raster))
    }
}

impl From<BinaryRaster> for Raster {
    fn from(binary: BinaryRaster) -> Self {
        binary.0
    }
}
