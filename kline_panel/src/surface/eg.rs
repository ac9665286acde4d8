use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_8X13};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use super::{DisplaySurface, FontSize, TextDatum};

/// [`DisplaySurface`] over any embedded-graphics RGB565 target.
///
/// Draw errors from the target are dropped: a failed SPI transfer should
/// cost one frame, not the loop.
pub struct EgSurface<D> {
    target: D,
}

impl<D> EgSurface<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &D {
        &self.target
    }
}

fn font_for(size: FontSize) -> &'static MonoFont<'static> {
    match size {
        FontSize::Small => &FONT_6X10,
        FontSize::Medium => &FONT_8X13,
        FontSize::Large => &FONT_10X20,
    }
}

fn placement(datum: TextDatum) -> (Alignment, Baseline) {
    match datum {
        TextDatum::TopLeft => (Alignment::Left, Baseline::Top),
        TextDatum::TopCenter => (Alignment::Center, Baseline::Top),
        TextDatum::TopRight => (Alignment::Right, Baseline::Top),
        TextDatum::MiddleLeft => (Alignment::Left, Baseline::Middle),
        TextDatum::MiddleCenter => (Alignment::Center, Baseline::Middle),
        TextDatum::MiddleRight => (Alignment::Right, Baseline::Middle),
        TextDatum::BottomLeft => (Alignment::Left, Baseline::Bottom),
        TextDatum::BottomCenter => (Alignment::Center, Baseline::Bottom),
        TextDatum::BottomRight => (Alignment::Right, Baseline::Bottom),
    }
}

impl<D> DisplaySurface for EgSurface<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    fn width(&self) -> u32 {
        self.target.size().width
    }

    fn height(&self) -> u32 {
        self.target.size().height
    }

    fn fill_rect(&mut self, area: Rectangle, color: Rgb565) {
        self.target.fill_solid(&area, color).ok();
    }

    fn stroke_rect(&mut self, area: Rectangle, color: Rgb565) {
        area.into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.target)
            .ok();
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgb565) {
        Line::new(from, to)
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.target)
            .ok();
    }

    fn draw_text(&mut self, text: &str, at: Point, datum: TextDatum, font: FontSize, color: Rgb565) {
        let (alignment, baseline) = placement(datum);
        let character_style = MonoTextStyle::new(font_for(font), color);
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(baseline)
            .build();
        Text::with_text_style(text, at, character_style, text_style)
            .draw(&mut self.target)
            .ok();
    }
}
