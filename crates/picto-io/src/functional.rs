use std::path::Path;

use picto_image::{Image, ImageSize};

use crate::{error::IoError, png};

/// Reads an image from the given file path as three channels (rgb8).
///
/// The method tries to read from any image format supported by the image crate
/// and converts the pixels to 8-bit RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    log::debug!("read {} from {}", size, file_path.display());

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Writes an rgb8 image to the given file path, choosing the format by extension.
///
/// PNG files go through [`png::write_image_png_rgb8`]; any other extension the
/// image crate knows is encoded by it.
///
/// # Arguments
///
/// * `file_path` - The destination path, including the extension.
/// * `image` - The image to write.
pub fn write_image_any_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    if png::has_png_extension(file_path) {
        return png::write_image_png_rgb8(file_path, image);
    }

    if image::ImageFormat::from_path(file_path).is_err() {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    image::save_buffer(
        file_path,
        image.as_slice(),
        image.cols() as u32,
        image.rows() as u32,
        image::ExtendedColorType::Rgb8,
    )?;

    Ok(())
}
