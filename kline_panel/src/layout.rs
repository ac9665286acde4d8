//! Screen regions, derived once from the display's reported size.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::buttons::ButtonBar;
use crate::error::PanelError;
use crate::profile::LayoutMargins;

/// Horizontal placement of the candle columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarGeometry {
    pub left: i32,
    pub bar_width: u32,
    pub spacing: u32,
}

impl BarGeometry {
    pub fn step(&self) -> i32 {
        (self.bar_width + self.spacing) as i32
    }

    /// Left edge of column `i`; absent bars keep their column.
    pub fn column_x(&self, i: usize) -> i32 {
        self.left + i as i32 * self.step()
    }

    pub fn wick_x(&self, i: usize) -> i32 {
        self.column_x(i) + self.bar_width as i32 / 2
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub header: Rectangle,
    /// Area cleared before each chart redraw.
    pub chart: Rectangle,
    /// Area the bars occupy (excludes the label column).
    pub plot: Rectangle,
    pub chart_bottom: i32,
    pub chart_height: i32,
    pub bars: BarGeometry,
    pub button_row: Rectangle,
    pub buttons: ButtonBar,
    pub draw_frame: bool,
}

impl PanelLayout {
    pub fn compute<S: AsRef<str>>(
        width: u32,
        height: u32,
        margins: &LayoutMargins,
        bar_count: usize,
        labels: &[S],
    ) -> Result<Self, PanelError> {
        let m = margins.margin;
        let too_small = || {
            PanelError::Layout(format!(
                "{width}x{height} cannot host {bar_count} bars and {} buttons",
                labels.len()
            ))
        };

        let reserved = margins.header_height + margins.button_height + 2 * m;
        let chart_h = height.checked_sub(reserved).ok_or_else(too_small)?;
        if chart_h <= 2 * margins.chart_padding + 1 {
            return Err(too_small());
        }

        let header = Rectangle::new(Point::zero(), Size::new(width, margins.header_height));
        let chart = Rectangle::new(
            Point::new(0, margins.header_height as i32),
            Size::new(width, chart_h),
        );

        let plot_w = width
            .checked_sub(2 * m + margins.label_width)
            .ok_or_else(too_small)?;
        let step = plot_w / bar_count.max(1) as u32;
        if step == 0 {
            return Err(too_small());
        }
        let spacing = if step >= 3 { (step / 4).max(1) } else { 0 };
        let bars = BarGeometry {
            left: m as i32,
            bar_width: step - spacing,
            spacing,
        };

        let pad = margins.chart_padding as i32;
        let chart_top = chart.top_left.y + pad;
        let chart_bottom = chart.top_left.y + chart_h as i32 - 1 - pad;
        let plot = Rectangle::new(
            Point::new(m as i32, chart_top),
            Size::new(plot_w, (chart_bottom - chart_top + 1) as u32),
        );

        let button_row = Rectangle::new(
            Point::new(m as i32, (height - m - margins.button_height) as i32),
            Size::new(width - 2 * m, margins.button_height),
        );
        let buttons = ButtonBar::layout(button_row, margins.button_gap, labels)?;

        Ok(Self {
            width,
            height,
            margin: m,
            header,
            chart,
            plot,
            chart_bottom,
            chart_height: chart_bottom - chart_top,
            bars,
            button_row,
            buttons,
            draw_frame: margins.draw_frame,
        })
    }

    /// Anchor of the max-price label (top-right datum).
    pub fn max_label_anchor(&self) -> Point {
        Point::new(
            (self.width - self.margin) as i32,
            self.chart.top_left.y + self.margin as i32,
        )
    }

    /// Anchor of the min-price label (bottom-right datum).
    pub fn min_label_anchor(&self) -> Point {
        Point::new(
            (self.width - self.margin) as i32,
            self.chart.top_left.y + self.chart.size.height as i32 - 1 - self.margin as i32,
        )
    }
}
