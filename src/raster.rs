use image::{DynamicImage, GenericImageView, RgbImage, RgbaImage};

/// Mask of the three high bits of a channel; a channel is dark when none are set.
const DARK_MASK: u8 = 0xE0;

/// A single RGB sample read from a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Every channel is below 32.
    pub fn is_dark(&self) -> bool {
        (self.r | self.g | self.b) & DARK_MASK == 0
    }

    /// All pairwise channel differences are within one step.
    pub fn is_achromatic(&self) -> bool {
        self.r.abs_diff(self.g) <= 1 && self.r.abs_diff(self.b) <= 1 && self.g.abs_diff(self.b) <= 1
    }

    /// Squared euclidean distance between two samples, in channel units.
    pub fn squared_distance(&self, other: &Rgb) -> u64 {
        let dr = i64::from(other.r) - i64::from(self.r);
        let dg = i64::from(other.g) - i64::from(self.g);
        let db = i64::from(other.b) - i64::from(self.b);
        (dr * dr + dg * dg + db * db) as u64
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for (u8, u8, u8) {
    fn from(px: Rgb) -> Self {
        (px.r, px.g, px.b)
    }
}

/// Read-only view over decoded pixel data.
///
/// Implementations must return a sample for every `x < width()` and
/// `y < height()`; the analysis routines never read outside that range.
pub trait Raster: Sync {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn pixel_at(&self, x: u32, y: u32) -> Rgb;

    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

impl Raster for RgbImage {
    fn width(&self) -> u32 {
        RgbImage::width(self)
    }

    fn height(&self) -> u32 {
        RgbImage::height(self)
    }

    fn pixel_at(&self, x: u32, y: u32) -> Rgb {
        let [r, g, b] = self.get_pixel(x, y).0;
        Rgb { r, g, b }
    }
}

// Alpha is ignored, matching a truecolor read of the colour channels only.
impl Raster for RgbaImage {
    fn width(&self) -> u32 {
        RgbaImage::width(self)
    }

    fn height(&self) -> u32 {
        RgbaImage::height(self)
    }

    fn pixel_at(&self, x: u32, y: u32) -> Rgb {
        let [r, g, b, _] = self.get_pixel(x, y).0;
        Rgb { r, g, b }
    }
}

impl Raster for DynamicImage {
    fn width(&self) -> u32 {
        GenericImageView::width(self)
    }

    fn height(&self) -> u32 {
        GenericImageView::height(self)
    }

    fn pixel_at(&self, x: u32, y: u32) -> Rgb {
        let [r, g, b, _] = self.get_pixel(x, y).0;
        Rgb { r, g, b }
    }
}

impl<R: Raster + ?Sized> Raster for &R {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn pixel_at(&self, x: u32, y: u32) -> Rgb {
        (**self).pixel_at(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba};

    #[test]
    fn test_dark_threshold_is_exclusive_at_32() {
        assert!(Rgb::new(31, 31, 31).is_dark());
        assert!(Rgb::new(0, 0, 0).is_dark());
        assert!(!Rgb::new(32, 0, 0).is_dark());
        assert!(!Rgb::new(0, 32, 0).is_dark());
        assert!(!Rgb::new(0, 0, 200).is_dark());
    }

    #[test]
    fn test_achromatic_tolerance() {
        assert!(Rgb::new(128, 128, 128).is_achromatic());
        assert!(!Rgb::new(128, 129, 127).is_achromatic());
        assert!(Rgb::new(128, 129, 128).is_achromatic());
        assert!(Rgb::new(0, 1, 1).is_achromatic());
        assert!(!Rgb::new(255, 0, 0).is_achromatic());
        assert!(!Rgb::new(10, 10, 12).is_achromatic());
    }

    #[test]
    fn test_squared_distance() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(255, 255, 255);
        assert_eq!(a.squared_distance(&b), 3 * 255 * 255);
        assert_eq!(b.squared_distance(&a), 3 * 255 * 255);
        assert_eq!(a.squared_distance(&a), 0);
    }

    #[test]
    fn test_dynamic_image_reads_grayscale_as_rgb() {
        let gray = image::GrayImage::from_pixel(2, 2, Luma([77]));
        let dynamic = DynamicImage::ImageLuma8(gray);
        assert_eq!(Raster::dimensions(&dynamic), (2, 2));
        assert_eq!(dynamic.pixel_at(1, 1), Rgb::new(77, 77, 77));
    }

    #[test]
    fn test_rgba_ignores_alpha() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 0]));
        assert_eq!(img.pixel_at(0, 0), Rgb::new(1, 2, 3));
    }
}
