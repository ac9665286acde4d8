use crate::bars::BarBuffer;
use crate::error::PanelError;

/// Fraction of the raw range added above and below.
pub const RANGE_PADDING: f64 = 0.1;

/// Padded price bounds of the visible window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartRange {
    pub min: f64,
    pub max: f64,
}

impl ChartRange {
    /// Scan valid bars, substitute a unit range for a flat market, then pad.
    pub fn from_bars(bars: &BarBuffer) -> Result<Self, PanelError> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for bar in bars.valid() {
            hi = hi.max(bar.high);
            lo = lo.min(bar.low);
        }
        if !lo.is_finite() || !hi.is_finite() {
            return Err(PanelError::NoValidData);
        }

        let mut span = hi - lo;
        if span == 0.0 {
            span = 1.0;
        }
        let pad = span * RANGE_PADDING;

        Ok(Self {
            min: lo - pad,
            max: hi + pad,
        })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Inverted linear price → pixel-row map over a chart band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceScale {
    range: ChartRange,
    bottom: i32,
    height: i32,
}

impl PriceScale {
    pub fn new(range: ChartRange, bottom: i32, height: i32) -> Self {
        Self {
            range,
            bottom,
            height,
        }
    }

    pub fn fit(bars: &BarBuffer, bottom: i32, height: i32) -> Result<Self, PanelError> {
        Ok(Self::new(ChartRange::from_bars(bars)?, bottom, height))
    }

    pub fn range(&self) -> ChartRange {
        self.range
    }

    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    /// Higher prices land on smaller rows.
    pub fn y(&self, price: f64) -> i32 {
        let frac = (price - self.range.min) / self.range.span();
        self.bottom - (frac * self.height as f64).round() as i32
    }
}
