use crate::{color::Rgb, image::Image, ImageSize};

/// A width x height grid of packed colours addressable by coordinate.
///
/// Coordinates are `(x, y)` with `x` the column and `y` the row. Accessing a
/// coordinate outside the grid is a programming error and panics.
pub trait Raster: Sized {
    /// Width of the grid in pixels.
    fn width(&self) -> usize;

    /// Height of the grid in pixels.
    fn height(&self) -> usize;

    /// Colour of the pixel at `(x, y)`.
    fn get_pixel(&self, x: usize, y: usize) -> Rgb;

    /// Overwrite the colour of the pixel at `(x, y)`.
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb);

    /// A new grid of the given dimensions with every pixel black.
    fn blank(width: usize, height: usize) -> Self;

    /// Total number of pixels.
    fn num_pixels(&self) -> usize {
        self.width() * self.height()
    }
}

impl Raster for Image<u8, 3> {
    fn width(&self) -> usize {
        self.size().width
    }

    fn height(&self) -> usize {
        self.size().height
    }

    fn get_pixel(&self, x: usize, y: usize) -> Rgb {
        assert!(x < self.cols() && y < self.rows(), "pixel ({x}, {y}) out of bounds");
        let offset = (y * self.cols() + x) * 3;
        let px = &self.as_slice()[offset..offset + 3];
        Rgb::new(px[0], px[1], px[2])
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        assert!(x < self.cols() && y < self.rows(), "pixel ({x}, {y}) out of bounds");
        let offset = (y * self.cols() + x) * 3;
        self.as_slice_mut()[offset..offset + 3].copy_from_slice(&color.channels());
    }

    fn blank(width: usize, height: usize) -> Self {
        let size = ImageSize { width, height };
        Image {
            size,
            data: vec![0u8; size.area() * 3],
        }
    }
}
