use tracing::debug;

/// Number of slots the chart shows.
pub const DEFAULT_BAR_COUNT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }

    /// A zero close is the feed's "unset" marker, not a price.
    pub fn is_valid(&self) -> bool {
        let finite = self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite();
        finite
            && self.close != 0.0
            && self.low <= self.open.min(self.close)
            && self.high >= self.open.max(self.close)
    }

    /// Ties count as up.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// Fixed-capacity, oldest-first window of bars.
///
/// The buffer is replaced wholesale on every successful fetch. Slots the
/// feed did not fill (short responses) or filled with unusable bars stay
/// `None` and are drawn as gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct BarBuffer {
    slots: Vec<Option<Bar>>,
}

impl BarBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<Bar>] {
        &self.slots
    }

    pub fn valid(&self) -> impl Iterator<Item = &Bar> + '_ {
        self.slots.iter().flatten()
    }

    pub fn valid_count(&self) -> usize {
        self.valid().count()
    }

    /// Most recent usable close, if any.
    pub fn last_close(&self) -> Option<f64> {
        self.slots.iter().rev().flatten().next().map(|b| b.close)
    }

    /// Overwrite every slot from `bars`; extra input is ignored and missing
    /// input leaves the remaining slots absent.
    pub fn replace<I>(&mut self, bars: I)
    where
        I: IntoIterator<Item = Bar>,
    {
        let mut incoming = bars.into_iter();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            *slot = match incoming.next() {
                Some(bar) if bar.is_valid() => Some(bar),
                Some(bar) => {
                    debug!(slot = i, ?bar, "dropping unusable bar");
                    None
                }
                None => None,
            };
        }
    }
}

impl Default for BarBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BAR_COUNT)
    }
}
