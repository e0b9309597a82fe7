use picto_image::{Image, ImageError, ImageSize};

// smallest width and height over all images
fn common_size<const C: usize>(images: &[Image<u8, C>]) -> Result<ImageSize, ImageError> {
    let width = images.iter().map(|img| img.cols()).min();
    let height = images.iter().map(|img| img.rows()).min();
    match (width, height) {
        (Some(width), Some(height)) => Ok(ImageSize { width, height }),
        _ => Err(ImageError::EmptyImageList),
    }
}

/// Blend several images by averaging them channel by channel.
///
/// The output covers the top-left region shared by all images, i.e. it has
/// the smallest width and the smallest height among the inputs. Each channel is
/// the truncated mean of the corresponding channel of every input.
///
/// # Errors
///
/// Returns [`ImageError::EmptyImageList`] if `images` is empty.
///
/// # Example
///
/// ```
/// use picto_image::Image;
/// use picto_imgproc::blend::blend;
///
/// let a = Image::<u8, 3>::from_size_val([2, 2].into(), 10).unwrap();
/// let b = Image::<u8, 3>::from_size_val([3, 1].into(), 21).unwrap();
///
/// let blended = blend(&[a, b]).unwrap();
/// assert_eq!(blended.size(), [2, 1].into());
/// assert_eq!(blended.as_slice(), &[15; 6]);
/// ```
pub fn blend<const C: usize>(images: &[Image<u8, C>]) -> Result<Image<u8, C>, ImageError> {
    let size = common_size(images)?;

    let mut acc = vec![0u32; size.area() * C];
    for image in images {
        let row_len = size.width * C;
        for (y, acc_row) in acc.chunks_exact_mut(row_len.max(1)).enumerate() {
            let offset = y * image.cols() * C;
            let src_row = &image.as_slice()[offset..offset + row_len];
            for (a, &v) in acc_row.iter_mut().zip(src_row) {
                *a += v as u32;
            }
        }
    }

    let n = images.len() as u32;
    let data = acc.into_iter().map(|a| (a / n) as u8).collect();

    Image::new(size, data)
}

/// Tile several images into a mosaic of `tile_size` x `tile_size` squares.
///
/// The output has the smallest width and height among the inputs, each rounded
/// down to a multiple of `tile_size`. Tiles are filled in row-major order by
/// cycling through the images, every tile copying the same region from its
/// source image. A row of tiles never starts on the same image as the row above.
///
/// # Errors
///
/// Returns [`ImageError::EmptyImageList`] if `images` is empty, or
/// [`ImageError::InvalidParameter`] if `tile_size` is zero.
pub fn mosaic<const C: usize>(
    images: &[Image<u8, C>],
    tile_size: usize,
) -> Result<Image<u8, C>, ImageError> {
    if tile_size == 0 {
        return Err(ImageError::InvalidParameter {
            name: "tile_size",
            reason: "must be at least 1".to_string(),
        });
    }

    let common = common_size(images)?;
    let size = ImageSize {
        width: common.width - common.width % tile_size,
        height: common.height - common.height % tile_size,
    };

    let mut dst = Image::<u8, C>::from_size_val(size, 0)?;
    let n = images.len();
    let mut current = 0;
    let mut row_start = 0;

    for tile_y in (0..size.height).step_by(tile_size) {
        for tile_x in (0..size.width).step_by(tile_size) {
            if tile_x == 0 {
                if current == row_start {
                    current = (current + 1) % n;
                }
                row_start = current;
            }

            let src = &images[current];
            for y in tile_y..tile_y + tile_size {
                let dst_offset = (y * size.width + tile_x) * C;
                let src_offset = (y * src.cols() + tile_x) * C;
                let len = tile_size * C;
                dst.as_slice_mut()[dst_offset..dst_offset + len]
                    .copy_from_slice(&src.as_slice()[src_offset..src_offset + len]);
            }

            current = (current + 1) % n;
        }
    }

    Ok(dst)
}
