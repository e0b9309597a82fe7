use picto_image::{Image, ImageError};

use crate::{color::check_same_size, parallel};

/// Darken an RGB8 image by dividing every channel by `magnitude`, truncating.
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `magnitude` - The divisor, at least 1.
/// * `dst` - The output RGB8 image.
///
/// # Errors
///
/// Returns an error if `magnitude` is zero or the image sizes differ.
pub fn darken(src: &Image<u8, 3>, magnitude: u8, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if magnitude == 0 {
        return Err(ImageError::InvalidParameter {
            name: "magnitude",
            reason: "must be at least 1".to_string(),
        });
    }
    check_same_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        for (d, &s) in dst_pixel.iter_mut().zip(src_pixel) {
            *d = s / magnitude;
        }
    });

    Ok(())
}
