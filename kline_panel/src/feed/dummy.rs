use super::BarSource;
use crate::bars::Bar;
use crate::error::FeedError;
use crate::interval::Interval;

/// Deterministic random walk; every call advances the walk by one bar so
/// refreshes visibly move.
#[derive(Debug, Clone)]
pub struct DummySource {
    base: f64,
    calls: u64,
}

impl DummySource {
    pub fn new(base: f64) -> Self {
        Self {
            base: base.max(10.0),
            calls: 0,
        }
    }
}

impl Default for DummySource {
    fn default() -> Self {
        Self::new(2500.0)
    }
}

impl BarSource for DummySource {
    fn fetch(&mut self, _symbol: &str, interval: Interval, count: usize) -> Result<Vec<Bar>, FeedError> {
        self.calls += 1;

        // Longer intervals swing wider.
        let mut step = 0.25 * (interval.duration().as_secs() as f64 / 60.0).sqrt();
        let mut px = self.base;
        let mut out = Vec::with_capacity(count);

        for n in 0..(count as u64 + self.calls) {
            if n % 7 == 0 {
                step = -step;
            }
            let open = px;
            let close = (px + step * (1.0 + (n % 3) as f64)).max(10.0);
            let wiggle = step.abs() * (0.5 + (n % 5) as f64 * 0.2);
            let bar = Bar::new(open, open.max(close) + wiggle, open.min(close) - wiggle, close);
            px = close;
            out.push(bar);
        }

        // Keep the newest `count`.
        let skip = out.len().saturating_sub(count);
        Ok(out.split_off(skip))
    }
}
