use picto_image::{Image, ImageError, ImageSize};

/// Rotate an image clockwise by a multiple of 90 degrees.
///
/// Negative angles and angles beyond a full turn wrap around, so `-90` is the
/// same as `270`. Quarter and three-quarter turns swap width and height.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
/// * `angle` - The clockwise rotation in degrees.
///
/// # Returns
///
/// The rotated image.
///
/// # Errors
///
/// Returns an error if `angle` is not a multiple of 90.
///
/// # Example
///
/// ```
/// use picto_image::Image;
/// use picto_imgproc::warp::rotate90;
///
/// let image = Image::<u8, 1>::new([2, 1].into(), vec![1, 2]).unwrap();
/// let rotated = rotate90(&image, 90).unwrap();
///
/// assert_eq!(rotated.size().width, 1);
/// assert_eq!(rotated.size().height, 2);
/// assert_eq!(rotated.as_slice(), &[1, 2]);
/// ```
pub fn rotate90<T, const C: usize>(src: &Image<T, C>, angle: i32) -> Result<Image<T, C>, ImageError>
where
    T: Copy,
{
    let angle = angle.rem_euclid(360);
    if angle % 90 != 0 {
        return Err(ImageError::InvalidParameter {
            name: "angle",
            reason: format!("{angle} is not a multiple of 90"),
        });
    }

    let mut dst = src.clone();
    for _ in 0..angle / 90 {
        dst = rotate_clockwise(&dst)?;
    }

    Ok(dst)
}

// dst(H - 1 - y, x) = src(x, y)
fn rotate_clockwise<T: Copy, const C: usize>(src: &Image<T, C>) -> Result<Image<T, C>, ImageError> {
    let (cols, rows) = (src.cols(), src.rows());
    let src_data = src.as_slice();

    let mut data = Vec::with_capacity(src_data.len());
    for y in 0..cols {
        for x in 0..rows {
            let (src_x, src_y) = (y, rows - 1 - x);
            let offset = (src_y * cols + src_x) * C;
            data.extend_from_slice(&src_data[offset..offset + C]);
        }
    }

    Image::new(
        ImageSize {
            width: rows,
            height: cols,
        },
        data,
    )
}
