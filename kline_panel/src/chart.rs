use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use tracing::debug;

use crate::bars::{Bar, BarBuffer};
use crate::error::PanelError;
use crate::layout::{BarGeometry, PanelLayout};
use crate::scale::PriceScale;
use crate::surface::{format_price, palette, DisplaySurface, FontSize, TextDatum};

/// Scale the buffer and paint the chart region.
///
/// With no valid bar this returns `NoValidData` before touching the
/// surface, so whatever was drawn last stays on screen.
pub fn render_chart<S: DisplaySurface>(
    surface: &mut S,
    layout: &PanelLayout,
    bars: &BarBuffer,
) -> Result<PriceScale, PanelError> {
    let scale = PriceScale::fit(bars, layout.chart_bottom, layout.chart_height)?;
    draw_candles(surface, layout, bars, &scale);
    Ok(scale)
}

/// Paint with an already computed scale.
pub fn draw_candles<S: DisplaySurface>(
    surface: &mut S,
    layout: &PanelLayout,
    bars: &BarBuffer,
    scale: &PriceScale,
) {
    surface.fill_rect(layout.chart, palette::BACKGROUND);

    if layout.draw_frame {
        surface.stroke_rect(frame_rect(layout), palette::FRAME);
    }

    let mut drawn = 0usize;
    for (i, slot) in bars.slots().iter().enumerate() {
        if let Some(bar) = slot {
            draw_candle(surface, &layout.bars, i, bar, scale);
            drawn += 1;
        }
    }

    let range = scale.range();
    surface.draw_text(
        &format_price(range.max),
        layout.max_label_anchor(),
        TextDatum::TopRight,
        FontSize::Small,
        palette::MUTED,
    );
    surface.draw_text(
        &format_price(range.min),
        layout.min_label_anchor(),
        TextDatum::BottomRight,
        FontSize::Small,
        palette::MUTED,
    );

    debug!(drawn, min = range.min, max = range.max, "chart redrawn");
}

fn frame_rect(layout: &PanelLayout) -> Rectangle {
    let m = layout.margin as i32;
    let top_left = layout.chart.top_left + Point::new(m / 2, 0);
    let size = Size::new(
        layout.chart.size.width.saturating_sub(layout.margin),
        layout.chart.size.height,
    );
    Rectangle::new(top_left, size)
}

pub fn candle_color(bar: &Bar) -> embedded_graphics::pixelcolor::Rgb565 {
    if bar.is_up() {
        palette::UP
    } else {
        palette::DOWN
    }
}

fn draw_candle<S: DisplaySurface>(
    surface: &mut S,
    geometry: &BarGeometry,
    i: usize,
    bar: &Bar,
    scale: &PriceScale,
) {
    let color = candle_color(bar);

    let wick_x = geometry.wick_x(i);
    surface.draw_line(
        Point::new(wick_x, scale.y(bar.high)),
        Point::new(wick_x, scale.y(bar.low)),
        color,
    );

    let y_open = scale.y(bar.open);
    let y_close = scale.y(bar.close);
    let top = y_open.min(y_close);
    let body_h = (y_open - y_close).unsigned_abs().max(1);
    surface.fill_rect(
        Rectangle::new(
            Point::new(geometry.column_x(i), top),
            Size::new(geometry.bar_width, body_h),
        ),
        color,
    );
}
