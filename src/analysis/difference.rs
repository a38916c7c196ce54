use crate::error::AnalysisError;
use crate::raster::Raster;
use rayon::prelude::*;

/// Sum of squared per-channel differences between two rasters.
///
/// With `overlap_only` unset, both rasters must have identical dimensions.
/// Otherwise only the top-left region shared by both is compared. The score
/// is unnormalized and symmetric in its arguments; it is zero exactly when
/// the compared region is pixel-identical.
pub fn compare<A, B>(a: &A, b: &B, overlap_only: bool) -> Result<u64, AnalysisError>
where
    A: Raster + ?Sized,
    B: Raster + ?Sized,
{
    let (width_a, height_a) = a.dimensions();
    let (width_b, height_b) = b.dimensions();

    if !overlap_only && (width_a, height_a) != (width_b, height_b) {
        return Err(AnalysisError::DimensionMismatch {
            left: (width_a, height_a),
            right: (width_b, height_b),
        });
    }

    let width = width_a.min(width_b);
    let height = height_a.min(height_b);

    let sum: u64 = (0..height)
        .into_par_iter()
        .map(|y| {
            (0..width)
                .map(|x| a.pixel_at(x, y).squared_distance(&b.pixel_at(x, y)))
                .sum::<u64>()
        })
        .sum();

    tracing::debug!(width, height, overlap_only, score = sum, "Pixel difference computed");
    Ok(sum)
}
