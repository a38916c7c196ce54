use crate::raster::Raster;

/// True when every pixel is achromatic.
///
/// Pixels are visited in row-major order and the scan stops at the first
/// coloured pixel.
pub fn is_grayscale<R: Raster + ?Sized>(raster: &R) -> bool {
    let (width, height) = raster.dimensions();

    let offender = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .find(|&(x, y)| !raster.pixel_at(x, y).is_achromatic());

    match offender {
        Some((x, y)) => {
            tracing::debug!(x, y, "Chromatic pixel found");
            false
        }
        None => true,
    }
}
