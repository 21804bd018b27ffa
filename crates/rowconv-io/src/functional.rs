use std::path::Path;

use rowconv_image::{Image, ImageSize, Raster};

use crate::error::IoError;

/// Prefix prepended to the input file name to build the output file name.
pub const OUTPUT_PREFIX: &str = "output_";

// open and decode any format supported by the image crate
fn decode_any(file_path: &Path) -> Result<image::DynamicImage, IoError> {
    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()
        .map_err(IoError::ImageDecodeError)?;

    log::debug!(
        "decoded {} as {:?} ({}x{})",
        file_path.display(),
        img.color(),
        img.width(),
        img.height()
    );

    Ok(img)
}

/// Reads an image from the given file path as RGB8.
///
/// The method tries to read from any image format supported by the image crate and
/// converts the pixels to three 8-bit channels.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image with three channels (rgb8).
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let img = decode_any(file_path.as_ref())?.into_rgb8();

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_raw())?)
}

/// Reads an image from the given file path as a single channel (mono8).
///
/// Color images are reduced to luma by the image crate.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
pub fn read_image_any_mono8(file_path: impl AsRef<Path>) -> Result<Raster, IoError> {
    let img = decode_any(file_path.as_ref())?.into_luma8();

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Raster::new(size, img.into_raw())?)
}

/// Writes a single channel (mono8) image to the given file path.
///
/// The encoding format is chosen from the file extension.
///
/// # Arguments
///
/// * `file_path` - The path to the output image.
/// * `raster` - The grayscale image to write.
pub fn write_image_mono8(file_path: impl AsRef<Path>, raster: &Raster) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let [width, height]: [u32; 2] = raster.size().into();

    image::save_buffer(
        file_path,
        raster.as_slice(),
        width,
        height,
        image::ExtendedColorType::L8,
    )
    .map_err(|e| IoError::ImageEncodeError(file_path.to_path_buf(), e))?;

    log::debug!("encoded {} ({})", file_path.display(), raster.size());

    Ok(())
}

/// Derives the output file name for a given input path.
///
/// Leading directory components are stripped, with both `/` and `\` recognized as
/// separators, and the remaining base name is prefixed with `output_`.
///
/// # Arguments
///
/// * `input_path` - The path of the input image as given by the user.
///
/// # Errors
///
/// Returns [`IoError::InvalidOutputPath`] if the input path has an empty base name.
///
/// # Example
///
/// ```
/// use rowconv_io::functional::output_file_name;
///
/// assert_eq!(output_file_name("data/lena.png").unwrap(), "output_lena.png");
/// assert_eq!(output_file_name(r"C:\images\dog.jpg").unwrap(), "output_dog.jpg");
/// ```
pub fn output_file_name(input_path: &str) -> Result<String, IoError> {
    let base_name = input_path
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(input_path);

    if base_name.is_empty() {
        return Err(IoError::InvalidOutputPath(input_path.to_string()));
    }

    Ok(format!("{OUTPUT_PREFIX}{base_name}"))
}
