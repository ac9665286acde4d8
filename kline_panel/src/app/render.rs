use embedded_graphics::prelude::*;
use tracing::debug;

use super::event::Redraw;
use super::state::*;
use crate::chart;
use crate::error::PanelError;
use crate::layout::PanelLayout;
use crate::surface::{palette, DisplaySurface, FontSize, TextDatum};

/// Repaint the regions in `redraw`. Returns whether any pixel changed.
pub fn render<S: DisplaySurface>(
    state: &PanelState,
    layout: &PanelLayout,
    surface: &mut S,
    redraw: Redraw,
) -> bool {
    let mut drawn = false;
    if redraw.header {
        draw_header(state, layout, surface);
        drawn = true;
    }
    if redraw.buttons {
        draw_buttons(state, layout, surface);
        drawn = true;
    }
    if redraw.chart {
        drawn |= draw_chart(state, layout, surface);
    }
    drawn
}

pub fn draw_header<S: DisplaySurface>(state: &PanelState, layout: &PanelLayout, surface: &mut S) {
    surface.fill_rect(layout.header, palette::BACKGROUND);

    let m = layout.margin as i32;
    surface.draw_text(
        &state.title(),
        Point::new(m, m),
        TextDatum::TopLeft,
        FontSize::Medium,
        palette::TEXT,
    );
    surface.draw_text(
        &state.updated_text(),
        Point::new(layout.width as i32 - m, m),
        TextDatum::TopRight,
        FontSize::Small,
        palette::MUTED,
    );

    let band = layout.header;
    let price_at = Point::new(
        band.top_left.x + band.size.width as i32 / 2,
        band.top_left.y + band.size.height as i32 * 5 / 8,
    );
    surface.draw_text(
        &state.price_text(),
        price_at,
        TextDatum::MiddleCenter,
        FontSize::Large,
        palette::PRICE,
    );
}

pub fn draw_buttons<S: DisplaySurface>(state: &PanelState, layout: &PanelLayout, surface: &mut S) {
    surface.fill_rect(layout.button_row, palette::BACKGROUND);

    let selected = state.selection.index();
    for region in layout.buttons.regions() {
        let fill = if region.index == selected {
            palette::BUTTON_ACTIVE
        } else {
            palette::BUTTON
        };
        surface.fill_rect(region.rect(), fill);
        surface.stroke_rect(region.rect(), palette::FRAME);
        surface.draw_text(
            &region.label,
            region.center(),
            TextDatum::MiddleCenter,
            FontSize::Small,
            palette::TEXT,
        );
    }
}

/// False when there was nothing valid to draw; the old chart stays.
pub fn draw_chart<S: DisplaySurface>(state: &PanelState, layout: &PanelLayout, surface: &mut S) -> bool {
    match chart::render_chart(surface, layout, &state.buffer) {
        Ok(_) => true,
        Err(PanelError::NoValidData) => {
            debug!("no valid bars; keeping previous chart");
            false
        }
        Err(err) => {
            debug!(%err, "chart not drawn");
            false
        }
    }
}
