use picto_image::{Image, ImageError};

use crate::{color::check_same_size, parallel};

/// Blur an RGB8 image with a 3x3 box kernel.
///
/// Each interior pixel takes the truncated mean of its 3x3 neighbourhood per
/// channel. Pixels on the image border are copied unchanged.
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
/// use picto_image::Image;
/// use picto_imgproc::filter::box_blur3x3;
///
/// let mut data = vec![0u8; 3 * 3 * 3];
/// data[12..15].copy_from_slice(&[90, 90, 90]);
/// let image = Image::<u8, 3>::new([3, 3].into(), data).unwrap();
///
/// let mut blurred = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
/// box_blur3x3(&image, &mut blurred).unwrap();
/// assert_eq!(blurred.pixel(1, 1).unwrap(), &[10, 10, 10]);
/// ```
pub fn box_blur3x3(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    let (cols, rows) = (src.cols(), src.rows());
    let src_data = src.as_slice();

    parallel::par_rows_mut(dst, |y, dst_row| {
        let src_row = &src_data[y * cols * 3..(y + 1) * cols * 3];
        for x in 0..cols {
            let px = &mut dst_row[x * 3..x * 3 + 3];
            if x == 0 || y == 0 || x + 1 == cols || y + 1 == rows {
                px.copy_from_slice(&src_row[x * 3..x * 3 + 3]);
                continue;
            }

            let mut acc = [0u32; 3];
            for yy in y - 1..=y + 1 {
                for xx in x - 1..=x + 1 {
                    let offset = (yy * cols + xx) * 3;
                    for (a, &v) in acc.iter_mut().zip(&src_data[offset..offset + 3]) {
                        *a += v as u32;
                    }
                }
            }
            for (p, a) in px.iter_mut().zip(acc) {
                *p = (a / 9) as u8;
            }
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use picto_image::{Image, ImageError};

    #[test]
    fn blur_keeps_border() -> Result<(), ImageError> {
        let data = (0..4 * 3 * 3).map(|v| v as u8).collect::<Vec<_>>();
        let image = Image::<u8, 3>::new([4, 3].into(), data)?;
        let mut blurred = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        super::box_blur3x3(&image, &mut blurred)?;

        for x in 0..4 {
            assert_eq!(blurred.pixel(x, 0)?, image.pixel(x, 0)?);
            assert_eq!(blurred.pixel(x, 2)?, image.pixel(x, 2)?);
        }
        assert_eq!(blurred.pixel(0, 1)?, image.pixel(0, 1)?);
        assert_eq!(blurred.pixel(3, 1)?, image.pixel(3, 1)?);
        Ok(())
    }

    #[test]
    fn blur_interior_mean() -> Result<(), ImageError> {
        // red channel holds the pixel index, green and blue stay zero
        let data = (0..9u8).flat_map(|i| [i, 0, 0]).collect::<Vec<_>>();
        let image = Image::<u8, 3>::new([3, 3].into(), data)?;
        let mut blurred = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        super::box_blur3x3(&image, &mut blurred)?;
        assert_eq!(blurred.pixel(1, 1)?, &[4, 0, 0]);
        Ok(())
    }

    #[test]
    fn blur_thin_image_is_copy() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new([3, 1].into(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9])?;
        let mut blurred = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        super::box_blur3x3(&image, &mut blurred)?;
        assert_eq!(blurred, image);
        Ok(())
    }
}
