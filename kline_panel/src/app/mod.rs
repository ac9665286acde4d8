pub mod event;
pub mod reducer;
pub mod render;
pub mod state;

pub use event::*;
pub use state::*;

use std::time::Instant;

use tracing::{debug, info};

use crate::buttons::ButtonGate;
use crate::config::PanelConfig;
use crate::error::PanelError;
use crate::feed::{FetchRequest, Fetcher};
use crate::layout::PanelLayout;
use crate::schedule::{RefreshReason, RefreshScheduler};
use crate::surface::{palette, DisplaySurface};
use crate::touch::{TouchInput, TouchMapper};

/// Everything the panel loop owns, passed explicitly to each step.
pub struct PanelRuntime<S, T, F> {
    pub state: PanelState,
    layout: PanelLayout,
    surface: S,
    touch: T,
    mapper: TouchMapper,
    gate: ButtonGate,
    scheduler: RefreshScheduler,
    fetcher: F,
    next_fetch_id: u64,
    dirty: Redraw,
    first_frame: bool,
    touch_held: bool,
}

impl<S, T, F> PanelRuntime<S, T, F>
where
    S: DisplaySurface,
    T: TouchInput,
    F: Fetcher,
{
    /// Layout and touch mapping follow the surface's reported size.
    pub fn new(config: &PanelConfig, surface: S, touch: T, fetcher: F) -> Result<Self, PanelError> {
        let state = PanelState::from_config(config);
        let (width, height) = (surface.width(), surface.height());

        let labels: Vec<&str> = state
            .selection
            .intervals()
            .iter()
            .map(|i| i.as_str())
            .collect();
        let layout = PanelLayout::compute(width, height, &config.profile.layout, config.bar_count, &labels)?;

        let profile = &config.profile;
        let mapper = TouchMapper::new(&profile.calibration, profile.rotation, width, height);

        info!(
            profile = %profile.name,
            rotation = ?profile.rotation,
            width,
            height,
            symbol = %state.symbol,
            interval = %state.selection.current(),
            "panel runtime ready"
        );

        Ok(Self {
            state,
            layout,
            surface,
            touch,
            mapper,
            gate: ButtonGate::new(config.debounce()),
            scheduler: RefreshScheduler::new(config.refresh_period()),
            fetcher,
            next_fetch_id: 1,
            dirty: Redraw::ALL,
            first_frame: true,
            touch_held: false,
        })
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn mapper(&self) -> &TouchMapper {
        &self.mapper
    }

    pub fn handle_event(&mut self, ev: PanelEvent) {
        self.dirty |= reducer::reduce(&mut self.state, ev);
    }

    /// One pass of the cooperative loop. Returns whether anything was drawn.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.poll_touch(now);

        if let Some(reason) = self.scheduler.poll(now) {
            self.dispatch(reason, now);
        }

        while let Some(outcome) = self.fetcher.poll() {
            self.scheduler.finished(outcome.id);
            self.handle_event(outcome.into());
        }

        self.render_if_dirty()
    }

    fn poll_touch(&mut self, now: Instant) {
        let touch = self.touch.sample().map(|raw| self.mapper.map(raw));
        self.touch_held = touch.is_some();

        let current = self.state.selection.index();
        let picked = self
            .gate
            .on_touch(&self.layout.buttons, touch.map(|t| t.point), current, now);
        if let Some(index) = picked {
            let redraw = reducer::reduce(&mut self.state, PanelEvent::IntervalPicked { index });
            if !redraw.is_empty() {
                self.dirty |= redraw;
                self.scheduler.request_manual(now);
            }
        }
    }

    fn dispatch(&mut self, reason: RefreshReason, now: Instant) {
        let id = self.next_fetch_id;
        self.next_fetch_id += 1;

        let req = FetchRequest {
            id,
            symbol: self.state.symbol.clone(),
            interval: self.state.selection.current(),
            count: self.state.buffer.capacity(),
        };
        debug!(id, ?reason, interval = %req.interval, "dispatching fetch");

        self.scheduler.started(id, reason, now);
        self.fetcher.submit(req);
    }

    fn render_if_dirty(&mut self) -> bool {
        let mut drawn = false;
        if self.first_frame {
            self.surface.clear(palette::BACKGROUND);
            self.first_frame = false;
            self.dirty = Redraw::ALL;
            drawn = true;
        }

        let mut todo = self.dirty;
        // The chart waits for the finger to lift.
        if self.touch_held && todo.chart {
            todo.chart = false;
        }
        if todo.is_empty() {
            return drawn;
        }

        drawn |= render::render(&self.state, &self.layout, &mut self.surface, todo);
        self.dirty = Redraw {
            chart: self.dirty.chart && !todo.chart,
            ..Redraw::NONE
        };
        drawn
    }
}
