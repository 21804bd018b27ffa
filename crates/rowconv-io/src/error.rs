/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] rowconv_image::ImageError),

    /// Error to decode the image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(image::ImageError),

    /// Error to encode the image.
    #[error("Could not save the output image: {0}. {1}")]
    ImageEncodeError(std::path::PathBuf, image::ImageError),

    /// The output file name cannot be derived from the input path.
    #[error("Cannot derive an output file name from: {0}")]
    InvalidOutputPath(String),
}
