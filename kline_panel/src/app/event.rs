use chrono::{DateTime, Utc};

use crate::bars::Bar;
use crate::error::FeedError;
use crate::feed::FetchOutcome;
use crate::interval::Interval;

#[derive(Debug)]
pub enum PanelEvent {
    /// A debounced button hit on another interval.
    IntervalPicked { index: usize },

    FetchCompleted {
        id: u64,
        interval: Interval,
        fetched_at: DateTime<Utc>,
        bars: Vec<Bar>,
    },

    FetchFailed {
        id: u64,
        interval: Interval,
        error: FeedError,
    },
}

impl From<FetchOutcome> for PanelEvent {
    fn from(outcome: FetchOutcome) -> Self {
        match outcome.result {
            Ok(bars) => PanelEvent::FetchCompleted {
                id: outcome.id,
                interval: outcome.interval,
                fetched_at: outcome.fetched_at,
                bars,
            },
            Err(error) => PanelEvent::FetchFailed {
                id: outcome.id,
                interval: outcome.interval,
                error,
            },
        }
    }
}

/// Screen regions a state change invalidated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Redraw {
    pub header: bool,
    pub chart: bool,
    pub buttons: bool,
}

impl Redraw {
    pub const NONE: Redraw = Redraw {
        header: false,
        chart: false,
        buttons: false,
    };

    pub const ALL: Redraw = Redraw {
        header: true,
        chart: true,
        buttons: true,
    };

    pub fn is_empty(&self) -> bool {
        !(self.header || self.chart || self.buttons)
    }
}

impl std::ops::BitOr for Redraw {
    type Output = Redraw;

    fn bitor(self, rhs: Redraw) -> Redraw {
        Redraw {
            header: self.header || rhs.header,
            chart: self.chart || rhs.chart,
            buttons: self.buttons || rhs.buttons,
        }
    }
}

impl std::ops::BitOrAssign for Redraw {
    fn bitor_assign(&mut self, rhs: Redraw) {
        *self = *self | rhs;
    }
}
