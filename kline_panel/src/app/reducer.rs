use tracing::{debug, info, warn};

use super::event::*;
use super::state::*;
use crate::error::PanelError;

pub fn reduce(state: &mut PanelState, ev: PanelEvent) -> Redraw {
    match ev {
        PanelEvent::IntervalPicked { index } => {
            if !state.selection.select(index) {
                return Redraw::NONE;
            }
            info!(interval = %state.selection.current(), "interval changed");
            Redraw {
                header: true,
                buttons: true,
                ..Redraw::NONE
            }
        }

        PanelEvent::FetchCompleted {
            id,
            interval,
            fetched_at,
            bars,
        } => {
            if interval != state.selection.current() {
                debug!(id, %interval, "discarding superseded fetch");
                return Redraw::NONE;
            }

            let received = bars.len();
            state.buffer.replace(bars);
            if let Some(close) = state.buffer.last_close() {
                state.last_close = Some(close);
            }
            state.last_updated = Some(fetched_at);

            debug!(
                id,
                %interval,
                received,
                valid = state.buffer.valid_count(),
                last_close = ?state.last_close,
                "bars applied"
            );
            Redraw {
                header: true,
                chart: true,
                ..Redraw::NONE
            }
        }

        PanelEvent::FetchFailed { id, interval, error } => {
            // The previous buffer and frame stay as they are.
            state.fetch_failures += 1;
            let err = PanelError::from(error);
            warn!(id, %interval, %err, failures = state.fetch_failures, "keeping stale chart");
            Redraw::NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bars::Bar;
    use crate::error::FeedError;
    use crate::interval::Interval;
    use chrono::Utc;

    fn rising(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let o = 100.0 + i as f64;
                Bar::new(o, o + 1.5, o - 0.5, o + 1.0)
            })
            .collect()
    }

    fn completed(interval: Interval, bars: Vec<Bar>) -> PanelEvent {
        PanelEvent::FetchCompleted {
            id: 1,
            interval,
            fetched_at: Utc::now(),
            bars,
        }
    }

    #[test]
    fn picking_current_interval_changes_nothing() {
        let mut s = PanelState::default();
        assert!(reduce(&mut s, PanelEvent::IntervalPicked { index: 3 }).is_empty());
        let r = reduce(&mut s, PanelEvent::IntervalPicked { index: 1 });
        assert!(r.header && r.buttons && !r.chart);
        assert_eq!(s.selection.current(), Interval::M5);
    }

    #[test]
    fn completed_fetch_fills_buffer_and_header() {
        let mut s = PanelState::default();
        let r = reduce(&mut s, completed(Interval::H1, rising(10)));
        assert!(r.header && r.chart);
        assert_eq!(s.buffer.valid_count(), 10);
        assert_eq!(s.last_close, Some(110.0));
        assert!(s.last_updated.is_some());
    }

    #[test]
    fn superseded_fetch_is_dropped() {
        let mut s = PanelState::default();
        reduce(&mut s, PanelEvent::IntervalPicked { index: 0 });
        assert!(reduce(&mut s, completed(Interval::H1, rising(5))).is_empty());
        assert_eq!(s.buffer.valid_count(), 0);
    }

    #[test]
    fn failure_keeps_previous_bars() {
        let mut s = PanelState::default();
        reduce(&mut s, completed(Interval::H1, rising(30)));
        let before = s.buffer.clone();

        let r = reduce(
            &mut s,
            PanelEvent::FetchFailed {
                id: 2,
                interval: Interval::H1,
                error: FeedError::Status(503),
            },
        );
        assert!(r.is_empty());
        assert_eq!(s.buffer, before);
        assert_eq!(s.fetch_failures, 1);
    }
}
