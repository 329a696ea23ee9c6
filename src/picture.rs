use std::ops::{Add, Mul};

use bytemuck_derive::{AnyBitPattern, NoUninit};
use rayon::prelude::*;

/// Unclamped color with channels on the 8-bit scale, `255.0` being full intensity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const WHITE: Color = Color::new(255.0, 255.0, 255.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const RED: Color = Color::new(255.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 255.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 255.0);
    pub const YELLOW: Color = Color::new(255.0, 255.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Self) -> Self::Output {
        Color::new(
            self.r + rhs.r,
            self.g + rhs.g,
            self.b + rhs.b,
        )
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, rhs: f64) -> Self::Output {
        Color::new(
            self.r * rhs,
            self.g * rhs,
            self.b * rhs,
        )
    }
}

impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, rhs: Color) -> Self::Output {
        rhs * self
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, AnyBitPattern, NoUninit)]
#[repr(C)]
pub struct RGBA8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Clamps to `0..=255` and truncates towards zero.
fn to_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

impl From<Color> for RGBA8 {
    fn from(value: Color) -> Self {
        RGBA8::new(to_channel(value.r), to_channel(value.g), to_channel(value.b), u8::MAX)
    }
}

impl RGBA8 {
    pub const WHITE: RGBA8 = RGBA8::new_hex(0xFFFFFFFF);
    pub const BLACK: RGBA8 = RGBA8::new_hex(0x000000FF);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        RGBA8 { r, g, b, a }
    }

    pub const fn new_hex(rgba: u32) -> RGBA8 {
        RGBA8 {
            r: ((rgba & 0xff000000) >> 24) as u8,
            g: ((rgba & 0x00ff0000) >> 16) as u8,
            b: ((rgba & 0x0000ff00) >> 8) as u8,
            a: (rgba & 0x000000ff) as u8,
        }
    }

    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Row-major grid of pixels, row 0 at the top.
#[derive(Clone, Debug, PartialEq)]
pub struct Picture<P> {
    pixels: P,
    size: (u32, u32),
}

/// Owned picture the renderer writes into.
pub type Framebuffer = Picture<Vec<RGBA8>>;

impl<P> Picture<P> {
    pub fn new(pixels: P, size: (u32, u32)) -> Self {
        Picture { pixels, size }
    }

    pub fn width(&self) -> u32 {
        self.size.0
    }

    pub fn height(&self) -> u32 {
        self.size.1
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    fn to_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width() as usize + x as usize
    }
}

impl<T: Clone> Picture<Vec<T>> {
    pub fn filled(size: (u32, u32), value: T) -> Self {
        let (width, height) = size;
        Picture::new(vec![value; width as usize * height as usize], size)
    }
}

impl<T> Picture<Vec<T>> {
    pub fn pixel(&self, x: u32, y: u32) -> &T {
        &self.pixels[self.to_index(x, y)]
    }

    pub fn buffer(&self) -> &[T] {
        &self.pixels
    }
}

impl<T: Send> Picture<Vec<T>> {
    /// Rows as disjoint mutable slices, paired with their row index, for parallel writes.
    pub fn par_rows_mut(&mut self) -> impl IndexedParallelIterator<Item=(u32, &mut [T])> {
        let width = (self.width() as usize).max(1);
        self.pixels.par_chunks_mut(width)
            .enumerate()
            .map(|(y, row)| (y as u32, row))
    }
}

/// Raster position of a pixel given in centered, y-up canvas coordinates.
///
/// `screen_x = width/2 + pixel_x`, `screen_y = height/2 - pixel_y - 1`.
pub fn canvas_to_screen(pixel_x: i64, pixel_y: i64, width: u32, height: u32) -> (i64, i64) {
    (width as i64 / 2 + pixel_x, height as i64 / 2 - pixel_y - 1)
}

/// Inverse of [`canvas_to_screen`].
pub fn screen_to_canvas(screen_x: u32, screen_y: u32, width: u32, height: u32) -> (i64, i64) {
    (screen_x as i64 - width as i64 / 2, height as i64 / 2 - screen_y as i64 - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_are_clamped_and_truncated() {
        let pixel: RGBA8 = Color::new(300.0, 127.9, -40.0).into();
        assert_eq!(pixel, RGBA8::new(255, 127, 0, 255));
    }

    #[test]
    fn color_arithmetic() {
        let color = Color::new(10.0, 20.0, 30.0) * 0.5 + 2.0 * Color::new(1.0, 1.0, 1.0);
        assert_eq!(color, Color::new(7.0, 12.0, 17.0));
    }

    #[test]
    fn hex_constants() {
        assert_eq!(RGBA8::WHITE, RGBA8::new(255, 255, 255, 255));
        assert_eq!(RGBA8::from(Color::WHITE), RGBA8::WHITE);
        assert_eq!(RGBA8::BLACK.rgb(), (0, 0, 0));
    }

    #[test]
    fn centered_coordinates_are_y_flipped() {
        assert_eq!(canvas_to_screen(0, 0, 600, 600), (300, 299));
        assert_eq!(canvas_to_screen(-300, 299, 600, 600), (0, 0));
        assert_eq!(canvas_to_screen(299, -300, 600, 600), (599, 599));
        for (x, y) in [(0, 0), (17, 599), (599, 0), (250, 301)] {
            let (px, py) = screen_to_canvas(x, y, 600, 600);
            assert_eq!(canvas_to_screen(px, py, 600, 600), (x as i64, y as i64));
        }
    }

    #[test]
    fn rows_are_disjoint_and_ordered() {
        let mut picture = Picture::filled((3, 2), 0u32);
        picture.par_rows_mut().for_each(|(y, row)| {
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = y * 10 + x as u32;
            }
        });
        assert_eq!(picture.buffer(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(*picture.pixel(2, 1), 12);
    }
}
