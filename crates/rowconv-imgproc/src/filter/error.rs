use rowconv_image::ImageError;

use crate::parallel::ParallelError;

/// Errors related to filter operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    /// The destination image could not be created or accessed.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The work could not be partitioned or dispatched.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
