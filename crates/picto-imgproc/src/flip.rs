use picto_image::{Image, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

use crate::color::check_same_size;

/// Flip the input image horizontally, mirroring it across the vertical axis.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
/// * `dst` - The output image with shape (H, W, C).
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use picto_image::Image;
/// use picto_imgproc::flip::horizontal_flip;
///
/// // a red pixel left of a blue one
/// let image = Image::<u8, 3>::new([2, 1].into(), vec![255, 0, 0, 0, 0, 255]).unwrap();
///
/// let mut flipped = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
/// horizontal_flip(&image, &mut flipped).unwrap();
///
/// assert_eq!(flipped.as_slice(), &[0, 0, 255, 255, 0, 0]);
/// ```
pub fn horizontal_flip<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    check_same_size(src, dst)?;
    if src.cols() == 0 || src.rows() == 0 {
        return Ok(());
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(src.cols() * C)
        .zip_eq(src.as_slice().par_chunks_exact(src.cols() * C))
        .for_each(|(dst_row, src_row)| {
            dst_row
                .chunks_exact_mut(C)
                .zip(src_row.chunks_exact(C).rev())
                .for_each(|(dst_pixel, src_pixel)| {
                    dst_pixel.copy_from_slice(src_pixel);
                })
        });

    Ok(())
}

/// Flip the input image vertically, mirroring it across the horizontal axis.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
/// * `dst` - The output image with shape (H, W, C).
///
/// Precondition: the input and output images must have the same size.
pub fn vertical_flip<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    check_same_size(src, dst)?;
    if src.cols() == 0 || src.rows() == 0 {
        return Ok(());
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(src.cols() * C)
        .zip_eq(src.as_slice().par_chunks_exact(src.cols() * C).rev())
        .for_each(|(dst_row, src_row)| {
            dst_row.copy_from_slice(src_row);
        });

    Ok(())
}
