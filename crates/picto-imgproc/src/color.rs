use picto_image::{Image, ImageError};

use crate::parallel;

pub(crate) fn check_same_size<T, const C1: usize, U, const C2: usize>(
    src: &Image<T, C1>,
    dst: &Image<U, C2>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Invert the colours of an RGB8 image, mapping every channel `v` to `255 - v`.
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output RGB8 image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use picto_image::{Image, ImageSize};
/// use picto_imgproc::color::invert;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize { width: 1, height: 1 },
///     vec![0, 100, 255],
/// )
/// .unwrap();
///
/// let mut inverted = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
/// invert(&image, &mut inverted).unwrap();
/// assert_eq!(inverted.as_slice(), &[255, 155, 0]);
/// ```
pub fn invert(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        for (d, s) in dst_pixel.iter_mut().zip(src_pixel) {
            *d = 255 - s;
        }
    });

    Ok(())
}

/// Convert an RGB8 image to gray by averaging the channels.
///
/// Every channel of the output takes `(r + g + b) / 3`, truncated, so the
/// result is still a three channel image.
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output RGB8 image.
///
/// Precondition: the input and output images must have the same size.
pub fn gray_from_rgb_mean(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let sum: u16 = src_pixel.iter().map(|&v| v as u16).sum();
        dst_pixel.fill((sum / 3) as u8);
    });

    Ok(())
}
