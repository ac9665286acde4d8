//! Drawing capability the engine renders through.
//!
//! The engine only needs a handful of primitives (filled rectangles,
//! outlines, lines and anchored text), so it talks to a small trait rather
//! than to a concrete display driver. [`EgSurface`] adapts any
//! embedded-graphics `DrawTarget` (a real SPI panel or the in-memory
//! [`FrameBuffer`]) to that trait.

mod eg;
mod framebuffer;

pub use eg::EgSurface;
pub use framebuffer::FrameBuffer;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

pub mod palette {
    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::*;

    pub const BACKGROUND: Rgb565 = Rgb565::BLACK;
    pub const UP: Rgb565 = Rgb565::GREEN;
    pub const DOWN: Rgb565 = Rgb565::RED;
    pub const TEXT: Rgb565 = Rgb565::WHITE;
    pub const PRICE: Rgb565 = Rgb565::YELLOW;
    pub const MUTED: Rgb565 = Rgb565::new(16, 32, 16);
    pub const FRAME: Rgb565 = Rgb565::new(8, 16, 8);
    pub const BUTTON: Rgb565 = Rgb565::new(4, 8, 6);
    pub const BUTTON_ACTIVE: Rgb565 = Rgb565::new(0, 36, 20);
}

/// Reference point of a text run relative to its anchor coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDatum {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

pub trait DisplaySurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn fill_rect(&mut self, area: Rectangle, color: Rgb565);
    fn stroke_rect(&mut self, area: Rectangle, color: Rgb565);
    fn draw_line(&mut self, from: Point, to: Point, color: Rgb565);
    fn draw_text(&mut self, text: &str, at: Point, datum: TextDatum, font: FontSize, color: Rgb565);

    fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(self.width(), self.height()))
    }

    fn clear(&mut self, color: Rgb565) {
        let all = self.bounds();
        self.fill_rect(all, color);
    }
}

/// Prices are always shown with one decimal.
pub fn format_price(price: f64) -> String {
    format!("{price:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_has_one_decimal() {
        assert_eq!(format_price(97.0), "97.0");
        assert_eq!(format_price(67123.456), "67123.5");
    }
}
