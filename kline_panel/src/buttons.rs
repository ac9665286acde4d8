//! Interval buttons: layout, hit-testing and debounce.

use std::time::{Duration, Instant};

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use tracing::debug;

use crate::error::PanelError;

/// Shortest accepted gap between two selections.
pub const MIN_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub label: String,
    pub index: usize,
}

impl ButtonRegion {
    /// Closed bounds on both axes.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.x <= self.x + self.width as i32
            && p.y >= self.y
            && p.y <= self.y + self.height as i32
    }

    pub fn rect(&self) -> Rectangle {
        Rectangle::new(Point::new(self.x, self.y), Size::new(self.width, self.height))
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.x + self.width as i32 / 2,
            self.y + self.height as i32 / 2,
        )
    }
}

/// A left-to-right row of equally sized buttons.
///
/// Because hit-testing uses closed bounds, neighbours are kept at least one
/// pixel apart so no point belongs to two buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonBar {
    regions: Vec<ButtonRegion>,
}

impl ButtonBar {
    pub fn layout<S: AsRef<str>>(row: Rectangle, gap: u32, labels: &[S]) -> Result<Self, PanelError> {
        let n = labels.len() as u32;
        if n == 0 {
            return Ok(Self { regions: Vec::new() });
        }
        let gap = gap.max(1);
        let spare = row.size.width.saturating_sub(gap * (n - 1));
        // Subtract one so the closed right edge stays inside the row.
        let width = (spare / n).saturating_sub(1);
        if width == 0 || row.size.height < 2 {
            return Err(PanelError::Layout(format!(
                "{n} buttons do not fit a {}x{} row",
                row.size.width, row.size.height
            )));
        }
        let height = row.size.height - 1;
        let step = (spare / n + gap) as i32;

        let regions = labels
            .iter()
            .enumerate()
            .map(|(i, label)| ButtonRegion {
                x: row.top_left.x + i as i32 * step,
                y: row.top_left.y,
                width,
                height,
                label: label.as_ref().to_string(),
                index: i,
            })
            .collect();
        Ok(Self { regions })
    }

    pub fn regions(&self) -> &[ButtonRegion] {
        &self.regions
    }

    /// First region containing `p`.
    pub fn hit(&self, p: Point) -> Option<usize> {
        self.regions.iter().find(|r| r.contains(p)).map(|r| r.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Idle,
    Cooldown { until: Instant },
}

/// Debounced selection from touch samples.
///
/// Fires at most once per touch session (press to release) and stays deaf
/// for the debounce interval after firing.
#[derive(Debug, Clone)]
pub struct ButtonGate {
    debounce: Duration,
    state: GateState,
    session_spent: bool,
}

impl ButtonGate {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce: debounce.max(MIN_DEBOUNCE),
            state: GateState::Idle,
            session_spent: false,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn is_cooling_down(&self, now: Instant) -> bool {
        matches!(self.state, GateState::Cooldown { until } if now < until)
    }

    /// Feed one poll. `touch` is the mapped point while the panel is
    /// pressed. Returns the newly selected index, if any.
    pub fn on_touch(
        &mut self,
        bar: &ButtonBar,
        touch: Option<Point>,
        current: usize,
        now: Instant,
    ) -> Option<usize> {
        if touch.is_none() {
            self.session_spent = false;
        }
        if let GateState::Cooldown { until } = self.state {
            if now < until {
                return None;
            }
            self.state = GateState::Idle;
        }

        let point = touch?;
        if self.session_spent {
            return None;
        }

        let index = bar.hit(point)?;
        if index == current {
            return None;
        }

        debug!(index, x = point.x, y = point.y, "button selected");
        self.state = GateState::Cooldown {
            until: now + self.debounce,
        };
        self.session_spent = true;
        Some(index)
    }
}
