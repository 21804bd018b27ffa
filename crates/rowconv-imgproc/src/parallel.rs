use rayon::prelude::*;
use thiserror::Error;

use rowconv_image::Image;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested worker count is invalid.
    #[error("worker count must be > 0, got {0}")]
    InvalidWorkerCount(usize),

    /// A row band does not fit the image it is applied to.
    #[error("row band {start}..{end} is invalid for an image with {rows} rows")]
    InvalidRowBand {
        /// First row of the band.
        start: usize,
        /// One past the last row of the band.
        end: usize,
        /// Number of rows of the image.
        rows: usize,
    },
}

/// A half-open range of image rows `[start, end)` processed by a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBand {
    /// First row of the band.
    pub start: usize,
    /// One past the last row of the band.
    pub end: usize,
}

impl RowBand {
    /// Number of rows in the band.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the band holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for RowBand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Number of rows a 3x3 stencil can be evaluated on, i.e. all rows but the first and last.
pub fn interior_rows(rows: usize) -> usize {
    rows.saturating_sub(2)
}

/// Split the interior rows `[1, rows - 1)` of an image into `num_workers` contiguous bands.
///
/// The first `interior % num_workers` bands get one extra row, so band sizes differ by at
/// most one. When `num_workers` exceeds the number of interior rows the trailing bands are
/// empty.
///
/// # Arguments
///
/// * `rows` - The number of rows of the image.
/// * `num_workers` - The number of bands to produce.
///
/// # Returns
///
/// The bands in ascending row order, one per worker.
///
/// # Example
///
/// ```
/// use rowconv_imgproc::parallel::{partition_rows, RowBand};
///
/// let bands = partition_rows(9, 3).unwrap();
/// assert_eq!(
///     bands,
///     vec![
///         RowBand { start: 1, end: 4 },
///         RowBand { start: 4, end: 6 },
///         RowBand { start: 6, end: 8 },
///     ]
/// );
/// ```
pub fn partition_rows(rows: usize, num_workers: usize) -> Result<Vec<RowBand>, ParallelError> {
    if num_workers == 0 {
        return Err(ParallelError::InvalidWorkerCount(num_workers));
    }

    let interior = interior_rows(rows);
    let base = interior / num_workers;
    let extra = interior % num_workers;

    let mut bands = Vec::with_capacity(num_workers);
    let mut start = 1;
    for i in 0..num_workers {
        let end = start + base + usize::from(i < extra);
        bands.push(RowBand { start, end });
        start = end;
    }

    Ok(bands)
}

/// Run `f` on disjoint row bands of `dst` on a local thread pool with one thread per band.
///
/// `dst` is a row-major buffer of `row_stride` elements per row. Each band receives the
/// exclusive sub-slice holding its rows, carved out with `split_at_mut`, so the workers never
/// alias. Rows not covered by any band are left untouched.
///
/// The call returns after every band has finished. If any band fails, the first error in
/// band order is returned.
///
/// # Arguments
///
/// * `dst` - The destination buffer.
/// * `row_stride` - The number of elements per row (width * channels).
/// * `bands` - Non-overlapping bands sorted by row.
/// * `f` - The operation to run on each band and its rows.
pub fn par_iter_bands<T, E, F>(
    dst: &mut [T],
    row_stride: usize,
    bands: &[RowBand],
    f: F,
) -> Result<(), E>
where
    T: Send,
    E: From<ParallelError> + Send,
    F: Fn(RowBand, &mut [T]) -> Result<(), E> + Sync,
{
    let rows = if row_stride == 0 {
        0
    } else {
        dst.len() / row_stride
    };

    // carve the destination into one exclusive slice per band
    let mut chunks = Vec::with_capacity(bands.len());
    let mut rest = dst;
    let mut cursor = 0;
    for band in bands {
        if band.start < cursor || band.end < band.start || band.end > rows {
            return Err(ParallelError::InvalidRowBand {
                start: band.start,
                end: band.end,
                rows,
            }
            .into());
        }
        let (_, tail) = std::mem::take(&mut rest).split_at_mut((band.start - cursor) * row_stride);
        let (chunk, tail) = tail.split_at_mut(band.len() * row_stride);
        chunks.push((*band, chunk));
        rest = tail;
        cursor = band.end;
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(bands.len().max(1))
        .build()
        .map_err(|e| ParallelError::BuildError(e.to_string()))?;

    let mut results: Vec<Result<(), E>> = (0..chunks.len()).map(|_| Ok(())).collect();

    // the scope joins every spawned band before returning
    pool.scope(|s| {
        for ((band, chunk), slot) in chunks.into_iter().zip(results.iter_mut()) {
            let f = &f;
            s.spawn(move |_| {
                log::trace!("processing row band {band}");
                *slot = f(band, chunk);
            });
        }
    });

    results.into_iter().collect()
}

/// Apply a function to each pixel in the image in parallel by rows.
pub fn par_iter_rows<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &mut Image<T2, C2>,
    f: impl Fn(&[T1], &mut [T2]) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let cols = src.cols();
    src.as_slice()
        .par_chunks_exact(C1 * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C2 * cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .chunks_exact(C1)
                .zip(dst_chunk.chunks_exact_mut(C2))
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers_interior(rows: usize, bands: &[RowBand]) {
        let mut next = 1;
        for band in bands {
            assert_eq!(band.start, next, "gap or overlap at {band}");
            assert!(band.end >= band.start);
            next = band.end;
        }
        assert_eq!(next, rows - 1);
    }

    #[test]
    fn test_partition_zero_workers() {
        assert_eq!(
            partition_rows(10, 0),
            Err(ParallelError::InvalidWorkerCount(0))
        );
    }

    #[test]
    fn test_partition_remainder_first() -> Result<(), ParallelError> {
        // 10 interior rows over 4 workers: 3, 3, 2, 2
        let bands = partition_rows(12, 4)?;
        let sizes = bands.iter().map(RowBand::len).collect::<Vec<_>>();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
        assert_covers_interior(12, &bands);
        Ok(())
    }

    #[test]
    fn test_partition_single_worker() -> Result<(), ParallelError> {
        let bands = partition_rows(7, 1)?;
        assert_eq!(bands, vec![RowBand { start: 1, end: 6 }]);
        Ok(())
    }

    #[test]
    fn test_partition_more_workers_than_rows() -> Result<(), ParallelError> {
        let bands = partition_rows(5, 6)?;
        assert_eq!(bands.len(), 6);
        assert_eq!(bands.iter().filter(|b| !b.is_empty()).count(), 3);
        assert!(bands[3..].iter().all(|b| *b == RowBand { start: 4, end: 4 }));
        assert_covers_interior(5, &bands);
        Ok(())
    }

    #[test]
    fn test_partition_coverage_grid() -> Result<(), ParallelError> {
        for rows in 3..40 {
            for workers in 1..20 {
                let bands = partition_rows(rows, workers)?;
                assert_eq!(bands.len(), workers);
                assert_covers_interior(rows, &bands);

                let base = interior_rows(rows) / workers;
                assert!(bands.iter().all(|b| b.len() == base || b.len() == base + 1));
            }
        }
        Ok(())
    }

    #[test]
    fn test_partition_degenerate() -> Result<(), ParallelError> {
        for rows in 0..3 {
            let bands = partition_rows(rows, 3)?;
            assert!(bands.iter().all(RowBand::is_empty));
        }
        Ok(())
    }

    #[test]
    fn test_par_iter_bands_disjoint() -> Result<(), ParallelError> {
        let stride = 3;
        let mut dst = vec![0u8; 8 * stride];
        let bands = partition_rows(8, 4)?;

        par_iter_bands(&mut dst, stride, &bands, |band, rows| {
            assert_eq!(rows.len(), band.len() * stride);
            rows.iter_mut().for_each(|v| *v += band.start as u8);
            Ok::<_, ParallelError>(())
        })?;

        let expected = [0, 1, 1, 3, 3, 5, 6, 0];
        for (row, value) in dst.chunks_exact(stride).zip(expected) {
            assert!(row.iter().all(|&v| v == value));
        }
        Ok(())
    }

    #[test]
    fn test_par_iter_bands_first_error() {
        let mut dst = vec![0u8; 6];
        let bands = [
            RowBand { start: 1, end: 2 },
            RowBand { start: 2, end: 3 },
            RowBand { start: 3, end: 4 },
        ];
        let res = par_iter_bands(&mut dst, 1, &bands, |band, _| {
            if band.start >= 2 {
                Err(ParallelError::BuildError(format!("band {band}")))
            } else {
                Ok(())
            }
        });
        assert_eq!(res, Err(ParallelError::BuildError("band 2..3".to_string())));
    }

    #[test]
    fn test_par_iter_bands_out_of_range() {
        let mut dst = vec![0u8; 4];
        let bands = [RowBand { start: 1, end: 5 }];
        let res = par_iter_bands(&mut dst, 1, &bands, |_, _| Ok::<_, ParallelError>(()));
        assert_eq!(
            res,
            Err(ParallelError::InvalidRowBand {
                start: 1,
                end: 5,
                rows: 4
            })
        );
    }
}
