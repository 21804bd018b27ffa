use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use rowconv_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        [size.width as u32, size.height as u32]
    }
}

/// Represents an image with pixel data.
///
/// The pixels are stored row-major in a contiguous buffer with the channels interleaved,
/// i.e. with shape (H, W, C).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

/// A single channel 8-bit image, the input and output of the Sobel engine.
pub type Raster = Image<u8, 1>;

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    // number of samples for the given size, rejecting empty and overflowing shapes
    fn checked_len(size: ImageSize) -> Result<usize, ImageError> {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::ZeroSize(size.width, size.height));
        }

        size.width
            .checked_mul(size.height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(ImageError::AllocationError(
                size.width,
                size.height,
                CHANNELS,
            ))
    }

    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the size is empty or the length of the pixel data does not match the image size,
    /// an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowconv_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20 * 3],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        let expected = Self::checked_len(size)?;

        // check if the data length matches the image size
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and default pixel data.
    ///
    /// The buffer is reserved with a fallible allocation so that oversized images are
    /// reported as [`ImageError::AllocationError`] instead of aborting the process.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `val` - The default value of the pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowconv_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::from_size_val(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     0u8,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let len = Self::checked_len(size)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| ImageError::AllocationError(size.width, size.height, CHANNELS))?;
        data.resize(len, val);

        Ok(Self { size, data })
    }

    /// Create a new image with the given size filled with `T::default()`.
    pub fn zeros(size: ImageSize) -> Result<Self, ImageError>
    where
        T: Clone + Default,
    {
        Self::from_size_val(size, T::default())
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Get the pixel data as a flat row-major slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a flat row-major mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return its pixel buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get the samples of row `y`, `width * CHANNELS` long.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.height() {
            return None;
        }
        let stride = self.width() * CHANNELS;
        Some(&self.data[y * stride..(y + 1) * stride])
    }

    fn offset(&self, x: usize, y: usize, ch: usize) -> Result<usize, ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }

        if ch >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, CHANNELS));
        }

        Ok((y * self.width() + x) * CHANNELS + ch)
    }

    /// Get the value of a pixel channel.
    ///
    /// # Arguments
    ///
    /// * `x` - The x-coordinate (column) of the pixel.
    /// * `y` - The y-coordinate (row) of the pixel.
    /// * `ch` - The channel index of the pixel.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::PixelIndexOutOfBounds`] or [`ImageError::ChannelIndexOutOfBounds`]
    /// if the coordinates fall outside the image.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<T, ImageError>
    where
        T: Copy,
    {
        let idx = self.offset(x, y, ch)?;
        Ok(self.data[idx])
    }

    /// Overwrite the value of a pixel channel.
    ///
    /// Same bounds contract as [`Image::get_pixel`].
    pub fn set_pixel(&mut self, x: usize, y: usize, ch: usize, val: T) -> Result<(), ImageError> {
        let idx = self.offset(x, y, ch)?;
        self.data[idx] = val;
        Ok(())
    }
}

impl<T: Copy> Image<T, 1> {
    /// Get the value of the pixel at column `x` and row `y`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowconv_image::{ImageError, ImageSize, Raster};
    ///
    /// let mut raster = Raster::zeros(ImageSize { width: 2, height: 2 }).unwrap();
    /// raster.set(1, 0, 42).unwrap();
    ///
    /// assert_eq!(raster.get(1, 0), Ok(42));
    /// assert_eq!(raster.get(2, 0), Err(ImageError::PixelIndexOutOfBounds(2, 0, 2, 2)));
    /// ```
    pub fn get(&self, x: usize, y: usize) -> Result<T, ImageError> {
        self.get_pixel(x, y, 0)
    }

    /// Overwrite the value of the pixel at column `x` and row `y`.
    pub fn set(&mut self, x: usize, y: usize, val: T) -> Result<(), ImageError> {
        self.set_pixel(x, y, 0, val)
    }
}

#[cfg(test)]
mod tests {
    use crate::image::{Image, ImageError, ImageSize, Raster};

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.width, 10);
        assert_eq!(image_size.height, 20);
        assert_eq!(ImageSize::from([10, 20]), image_size);
    }

    #[test]
    fn image_smoke() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 10,
                height: 20,
            },
            vec![0u8; 10 * 20 * 3],
        )?;
        assert_eq!(image.size().width, 10);
        assert_eq!(image.size().height, 20);
        assert_eq!(image.num_channels(), 3);

        Ok(())
    }

    #[test]
    fn image_new_wrong_length() {
        let res = Raster::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            vec![0u8; 5],
        );
        assert_eq!(res, Err(ImageError::InvalidChannelShape(5, 6)));
    }

    #[test]
    fn raster_zeros() -> Result<(), ImageError> {
        let raster = Raster::zeros(ImageSize {
            width: 4,
            height: 3,
        })?;
        assert_eq!(raster.as_slice().len(), 12);
        assert!(raster.as_slice().iter().all(|&v| v == 0));

        Ok(())
    }

    #[test]
    fn raster_zero_size() {
        let res = Raster::zeros(ImageSize {
            width: 0,
            height: 3,
        });
        assert_eq!(res, Err(ImageError::ZeroSize(0, 3)));

        let res = Raster::zeros(ImageSize {
            width: 3,
            height: 0,
        });
        assert_eq!(res, Err(ImageError::ZeroSize(3, 0)));
    }

    #[test]
    fn raster_overflow() {
        let res = Image::<u8, 3>::zeros(ImageSize {
            width: usize::MAX,
            height: 2,
        });
        assert_eq!(res, Err(ImageError::AllocationError(usize::MAX, 2, 3)));
    }

    #[test]
    fn raster_get_set() -> Result<(), ImageError> {
        let mut raster = Raster::zeros(ImageSize {
            width: 3,
            height: 2,
        })?;
        raster.set(2, 1, 7)?;
        raster.set(2, 1, 9)?;
        assert_eq!(raster.get(2, 1)?, 9);
        assert_eq!(raster.as_slice(), &[0, 0, 0, 0, 0, 9]);

        assert_eq!(
            raster.get(3, 0),
            Err(ImageError::PixelIndexOutOfBounds(3, 0, 3, 2))
        );
        assert_eq!(
            raster.set(0, 2, 1),
            Err(ImageError::PixelIndexOutOfBounds(0, 2, 3, 2))
        );

        Ok(())
    }

    #[test]
    fn image_pixel_channels() -> Result<(), ImageError> {
        let mut image = Image::<u8, 3>::new(
            ImageSize {
                width: 1,
                height: 2,
            },
            vec![0, 1, 2, 3, 4, 5],
        )?;
        assert_eq!(image.get_pixel(0, 1, 2)?, 5);

        image.set_pixel(0, 0, 1, 10)?;
        assert_eq!(image.as_slice(), &[0, 10, 2, 3, 4, 5]);

        assert_eq!(
            image.get_pixel(0, 0, 3),
            Err(ImageError::ChannelIndexOutOfBounds(3, 3))
        );

        Ok(())
    }

    #[test]
    fn image_row() -> Result<(), ImageError> {
        let image = Raster::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0, 1, 2, 3, 4, 5],
        )?;
        assert_eq!(image.row(1), Some(&[2u8, 3][..]));
        assert_eq!(image.row(3), None);

        Ok(())
    }
}
