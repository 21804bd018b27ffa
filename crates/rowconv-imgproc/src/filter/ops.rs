use rowconv_image::{ImageError, Raster};

use super::{kernels, FilterError};
use crate::parallel::{self, ParallelError, RowBand};

/// Compute the horizontal Sobel response of a single pixel.
///
/// Uses the bounds-checked accessors of [`Raster`] and returns the value
/// [`sobel_x_partitioned`] writes at `(x, y)`: zero on the border rows and columns, the
/// clamped stencil response elsewhere.
///
/// # Arguments
///
/// * `src` - The source grayscale image.
/// * `x` - The column of the pixel.
/// * `y` - The row of the pixel.
///
/// # Errors
///
/// Returns [`ImageError::PixelIndexOutOfBounds`] if `(x, y)` is outside the image.
pub fn sobel_x_at(src: &Raster, x: usize, y: usize) -> Result<u8, ImageError> {
    src.get(x, y)?;

    if x == 0 || y == 0 || x + 1 == src.width() || y + 1 == src.height() {
        return Ok(0);
    }

    let mut sum = 0i32;
    for (m, k_row) in kernels::SOBEL_X.iter().enumerate() {
        for (n, k) in k_row.iter().enumerate() {
            sum += k * src.get(x + n - 1, y + m - 1)? as i32;
        }
    }

    Ok(sum.clamp(0, 255) as u8)
}

/// Apply the horizontal Sobel kernel to one band of rows.
///
/// Only the interior columns `[1, width - 1)` of each row are written; the first and last
/// sample of every row in `dst_rows` are left untouched.
///
/// The band is validated once against the interior rows `[1, rows - 1)` of `src`, after
/// which every neighbor of every processed pixel is known to be inside the image and the
/// rows are walked with slice windows instead of per-pixel bounds checks.
///
/// # Arguments
///
/// * `src` - The source grayscale image.
/// * `dst_rows` - The destination rows of the band, `band.len() * width` samples long.
/// * `band` - The rows of `src` to process.
pub fn sobel_x_band(src: &Raster, dst_rows: &mut [u8], band: RowBand) -> Result<(), FilterError> {
    let rows = src.rows();
    let cols = src.cols();

    if band.start == 0 || band.end < band.start || band.end + 1 > rows {
        return Err(ParallelError::InvalidRowBand {
            start: band.start,
            end: band.end,
            rows,
        }
        .into());
    }

    if dst_rows.len() != band.len() * cols {
        return Err(ImageError::InvalidChannelShape(dst_rows.len(), band.len() * cols).into());
    }

    // no interior columns
    if cols < 3 {
        return Ok(());
    }

    let src_data = src.as_slice();

    for (row, dst_row) in (band.start..band.end).zip(dst_rows.chunks_exact_mut(cols)) {
        let above = &src_data[(row - 1) * cols..row * cols];
        let center = &src_data[row * cols..(row + 1) * cols];
        let below = &src_data[(row + 1) * cols..(row + 2) * cols];

        above
            .windows(3)
            .zip(center.windows(3))
            .zip(below.windows(3))
            .zip(dst_row[1..cols - 1].iter_mut())
            .for_each(|(((a, c), b), dst_px)| {
                *dst_px = kernels::apply_kernel3(&kernels::SOBEL_X, [a, c, b]);
            });
    }

    Ok(())
}

/// Apply the horizontal Sobel kernel to a grayscale image using `num_workers` workers.
///
/// The interior rows are split into contiguous bands with [`parallel::partition_rows`] and
/// each band is convolved by its own worker on a local thread pool. The call returns once
/// every band is done.
///
/// The border rows and columns of the result are always zero. The result does not depend
/// on `num_workers`.
///
/// # Arguments
///
/// * `src` - The source grayscale image.
/// * `num_workers` - The number of workers, at least one.
///
/// # Returns
///
/// A new image with the same size as `src`.
///
/// # Errors
///
/// * [`ParallelError::InvalidWorkerCount`] if `num_workers` is zero.
/// * [`ImageError::AllocationError`] if the destination image cannot be allocated.
///
/// # Example
///
/// ```
/// use rowconv_image::{ImageSize, Raster};
/// use rowconv_imgproc::filter::sobel_x_partitioned;
///
/// let size = ImageSize { width: 5, height: 5 };
/// let src = Raster::from_size_val(size, 100).unwrap();
///
/// let dst = sobel_x_partitioned(&src, 2).unwrap();
/// assert!(dst.as_slice().iter().all(|&v| v == 0));
/// ```
pub fn sobel_x_partitioned(src: &Raster, num_workers: usize) -> Result<Raster, FilterError> {
    if num_workers == 0 {
        return Err(ParallelError::InvalidWorkerCount(num_workers).into());
    }

    let mut dst = Raster::zeros(src.size())?;

    let interior = parallel::interior_rows(src.rows());
    if interior == 0 || src.cols() < 3 {
        log::debug!("sobel_x: {} has no interior pixels", src.size());
        return Ok(dst);
    }

    // workers past the interior row count would only receive empty bands
    let bands = parallel::partition_rows(src.rows(), num_workers.min(interior))?;
    log::debug!(
        "sobel_x: {} interior rows over {} bands ({} workers requested)",
        interior,
        bands.len(),
        num_workers
    );

    parallel::par_iter_bands(dst.as_slice_mut(), src.cols(), &bands, |band, rows| {
        sobel_x_band(src, rows, band)
    })?;

    Ok(dst)
}
