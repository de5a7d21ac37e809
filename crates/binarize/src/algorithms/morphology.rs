//! Binary morphology over square windows.
//!
//! Samples `>= 128` are treated as white. Windows span `[-k/2, k/2]` on both
//! axes and read past the border by clamping to the nearest edge pixel.
//! Outputs are always [`BinaryRaster`]s.

use crate::{
    traits::Postprocessor,
    types::{BinaryRaster, Raster},
};

const WHITE_CUTOFF: u8 = 128;

/// Whether any sample in the window centered on `(x, y)` satisfies `pred`
fn any_in_window<F>(src: &Raster, radius: i64, x: u32, y: u32, pred: F) -> bool
where
    F: Fn(bool) -> bool,
{
    let (x, y) = (x as i64, y as i64);
    (-radius..=radius).any(|ky| {
        (-radius..=radius).any(|kx| pred(src.clamped(x + kx, y + ky) >= WHITE_CUTOFF))
    })
}

/// White only where the whole neighborhood is white. Shrinks white regions.
pub fn erode(src: &Raster, kernel_size: u32) -> BinaryRaster {
    let radius = (kernel_size / 2) as i64;
    BinaryRaster::from_fn(src.width(), src.height(), |x, y| {
        !any_in_window(src, radius, x, y, |white| !white)
    })
}

/// White where any neighbor is white. Grows white regions.
pub fn dilate(src: &Raster, kernel_size: u32) -> BinaryRaster {
    let radius = (kernel_size / 2) as i64;
    BinaryRaster::from_fn(src.width(), src.height(), |x, y| {
        any_in_window(src, radius, x, y, |white| white)
    })
}

/// Erosion followed by dilation; removes white specks smaller than the window.
pub fn open(src: &Raster, kernel_size: u32) -> BinaryRaster {
    let eroded = erode(src, kernel_size);
    dilate(&eroded, kernel_size)
}

/// Dilation followed by erosion; fills black holes smaller than the window.
pub fn close(src: &Raster, kernel_size: u32) -> BinaryRaster {
    let dilated = dilate(src, kernel_size);
    erode(&dilated, kernel_size)
}

/// Morphological opening stage
#[derive(Debug, Clone)]
pub struct OpeningPostprocessor {
    pub kernel_size: u32,
}

impl Default for OpeningPostprocessor {
    fn default() -> Self {
        Self { kernel_size: 3 }
    }
}

impl Postprocessor for OpeningPostprocessor {
    fn postprocess(&self, binary: BinaryRaster) -> BinaryRaster {
        open(&binary, self.kernel_size)
    }

    fn name(&self) -> String {
        format!("Open({})", self.kernel_size)
    }
}

/// Morphological closing stage
#[derive(Debug, Clone)]
pub struct ClosingPostprocessor {
    pub kernel_size: u32,
}

impl Default for ClosingPostprocessor {
    fn default() -> Self {
        Self { kernel_size: 3 }
    }
}

impl Postprocessor for ClosingPostprocessor {
    fn postprocess(&self, binary: BinaryRaster) -> BinaryRaster {
        close(&binary, self.kernel_size)
    }

    fn name(&self) -> String {
        format!("Close({})", self.kernel_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speckled() -> Raster {
        // 9x9 with a 5x5 white block, a lone white speck and a one-pixel hole.
        let mut raster = Raster::from_fn(9, 9, |x, y| {
            if (2..7).contains(&x) && (2..7).contains(&y) { 255 } else { 0 }
        });
        *raster.get_mut(4, 4).unwrap() = 0;
        *raster.get_mut(0, 8).unwrap() = 255;
        raster
    }

    fn is_subset(a: &BinaryRaster, b: &BinaryRaster) -> bool {
        a.as_slice()
            .iter()
            .zip(b.as_slice())
            .all(|(&pa, &pb)| pa == 0 || pb == 255)
    }

    #[test]
    fn erode_shrinks_and_dilate_grows() {
        let block = Raster::from_fn(7, 7, |x, y| {
            if (2..5).contains(&x) && (2..5).contains(&y) { 200 } else { 10 }
        });
        let eroded = erode(&block, 3);
        assert_eq!(eroded.white_count(), 1);
        assert_eq!(eroded.is_white(3, 3), Some(true));

        let dilated = dilate(&block, 3);
        assert_eq!(dilated.white_count(), 25);
        assert_eq!(dilated.is_white(1, 1), Some(true));
        assert_eq!(dilated.is_white(0, 0), Some(false));
    }

    #[test]
    fn cutoff_is_128() {
        let raster = Raster::from_vec(2, 1, vec![127, 128]).unwrap();
        let out = erode(&raster, 1);
        assert_eq!(out.as_slice(), &[0, 255]);
    }

    #[test]
    fn border_pixels_replicate_edges() {
        // A white column on the left edge survives erosion because the
        // clamped neighborhood beyond the edge is the column itself.
        let raster = Raster::from_fn(5, 5, |x, _| if x < 2 { 255 } else { 0 });
        let eroded = erode(&raster, 3);
        assert_eq!(eroded.is_white(0, 0), Some(true));
        assert_eq!(eroded.is_white(0, 4), Some(true));
        assert_eq!(eroded.is_white(1, 2), Some(false));
    }

    #[test]
    fn open_removes_isolated_speck() {
        let opened = open(&speckled(), 3);
        assert_eq!(opened.is_white(0, 8), Some(false));
    }

    #[test]
    fn close_fills_single_pixel_hole() {
        let closed = close(&speckled(), 3);
        assert_eq!(closed.is_white(4, 4), Some(true));
    }

    #[test]
    fn opening_never_adds_and_closing_never_removes_white() {
        let input = BinaryRaster::try_from(speckled()).unwrap();
        for k in [1, 2, 3, 5] {
            let opened = open(&input, k);
            assert!(is_subset(&opened, &input), "opening added white with k={k}");

            let closed = close(&input, k);
            assert!(is_subset(&input, &closed), "closing removed white with k={k}");
        }
    }

    #[test]
    fn kernel_size_one_is_identity_on_binary_input() {
        let input = BinaryRaster::try_from(speckled()).unwrap();
        assert_eq!(erode(&input, 1), input);
        assert_eq!(dilate(&input, 1), input);
        assert_eq!(open(&input, 0), input);
    }

    #[test]
    fn postprocessors_apply_open_and_close() {
        let input = BinaryRaster::try_from(speckled()).unwrap();
        let opening = OpeningPostprocessor::default();
        assert_eq!(opening.postprocess(input.clone()), open(&input, 3));
        let closing = ClosingPostprocessor { kernel_size: 3 };
        assert_eq!(closing.postprocess(input.clone()), close(&input, 3));
        assert_eq!(closing.name(), "Close(3)");
    }
}
