use crate::raster::Raster;
use serde::{Deserialize, Serialize};

/// Thickness of the uniformly dark band along each edge of a raster.
///
/// Every edge is measured on its own: `top` counts leading rows that are
/// dark end to end, `left` counts leading columns that are dark top to
/// bottom, and so on. The values are never reconciled against each other, so
/// an all-dark raster reports its full height on both `top` and `bottom`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderMetrics {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl BorderMetrics {
    pub fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.top, self.bottom, self.left, self.right)
    }
}

impl From<BorderMetrics> for (u32, u32, u32, u32) {
    fn from(metrics: BorderMetrics) -> Self {
        metrics.as_tuple()
    }
}

/// Measure the dark border on each edge of `raster`.
pub fn scan_borders<R: Raster + ?Sized>(raster: &R) -> BorderMetrics {
    let (width, height) = raster.dimensions();

    let row_is_dark = |y: u32| (0..width).all(|x| raster.pixel_at(x, y).is_dark());
    let column_is_dark = |x: u32| (0..height).all(|y| raster.pixel_at(x, y).is_dark());

    let metrics = BorderMetrics {
        top: leading_run(0..height, row_is_dark),
        bottom: leading_run((0..height).rev(), row_is_dark),
        left: leading_run(0..width, column_is_dark),
        right: leading_run((0..width).rev(), column_is_dark),
    };

    tracing::debug!(
        top = metrics.top,
        bottom = metrics.bottom,
        left = metrics.left,
        right = metrics.right,
        "Border scan completed"
    );
    metrics
}

/// Number of consecutive lines, in scan order, that satisfy `is_dark`.
/// Stops at the first line that does not.
fn leading_run<I, F>(lines: I, is_dark: F) -> u32
where
    I: Iterator<Item = u32>,
    F: Fn(u32) -> bool,
{
    lines.take_while(|&line| is_dark(line)).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_framed_image() {
        // 2px top, 1px bottom, 3px left, 0px right
        let img = RgbImage::from_fn(10, 8, |x, y| {
            if y < 2 || y >= 7 || x < 3 {
                Rgb([0, 0, 0])
            } else {
                Rgb([200, 200, 200])
            }
        });
        assert_eq!(scan_borders(&img).as_tuple(), (2, 1, 3, 0));
    }

    #[test]
    fn test_single_bright_pixel_breaks_line() {
        let mut img = RgbImage::from_pixel(6, 6, Rgb([5, 5, 5]));
        img.put_pixel(5, 0, Rgb([5, 5, 40]));
        let metrics = scan_borders(&img);

        assert_eq!(metrics.top, 0);
        assert_eq!(metrics.right, 0);
        assert_eq!(metrics.bottom, 5);
        assert_eq!(metrics.left, 5);
    }

    #[test]
    fn test_empty_raster() {
        assert_eq!(scan_borders(&RgbImage::new(0, 0)), BorderMetrics::default());
    }
}
