use std::convert::Infallible;
use std::io::{self, Write};

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Heap-backed RGB565 frame, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb565>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb565::BLACK; width as usize * height as usize],
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn pixels(&self) -> &[Rgb565] {
        &self.pixels
    }

    pub fn count(&self, color: Rgb565) -> usize {
        self.pixels.iter().filter(|&&c| c == color).count()
    }

    /// Expand to 8-bit RGB, one `[r, g, b]` per pixel.
    pub fn rgb888(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.pixels.iter().map(|&c| {
            let c = Rgb888::from(c);
            [c.r(), c.g(), c.b()]
        })
    }

    /// Binary PPM (P6).
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        for rgb in self.rgb888() {
            out.write_all(&rgb)?;
        }
        out.flush()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point.x, point.y) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        for y in area.top_left.y..=bottom_right.y {
            for x in area.top_left.x..=bottom_right.x {
                if let Some(i) = self.index(x, y) {
                    self.pixels[i] = color;
                }
            }
        }
        Ok(())
    }
}
