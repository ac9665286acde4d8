//! Bar sources and how fetches are dispatched to them.

pub mod binance;
pub mod dummy;
pub mod worker;

pub use binance::BinanceSource;
pub use dummy::DummySource;
pub use worker::FetchWorker;

use chrono::{DateTime, Utc};

use crate::bars::Bar;
use crate::error::FeedError;
use crate::interval::Interval;

/// Upstream OHLC provider.
pub trait BarSource {
    /// Up to `count` bars, oldest first.
    fn fetch(&mut self, symbol: &str, interval: Interval, count: usize) -> Result<Vec<Bar>, FeedError>;
}

impl<S: BarSource + ?Sized> BarSource for Box<S> {
    fn fetch(&mut self, symbol: &str, interval: Interval, count: usize) -> Result<Vec<Bar>, FeedError> {
        (**self).fetch(symbol, interval, count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub id: u64,
    pub symbol: String,
    pub interval: Interval,
    pub count: usize,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub id: u64,
    pub interval: Interval,
    pub fetched_at: DateTime<Utc>,
    pub result: Result<Vec<Bar>, FeedError>,
}

impl FetchOutcome {
    pub fn run<S: BarSource + ?Sized>(source: &mut S, req: FetchRequest) -> Self {
        let result = source.fetch(&req.symbol, req.interval, req.count);
        Self {
            id: req.id,
            interval: req.interval,
            fetched_at: Utc::now(),
            result,
        }
    }
}

/// Where the runtime sends fetch requests and collects their outcomes.
pub trait Fetcher {
    fn submit(&mut self, req: FetchRequest);
    fn poll(&mut self) -> Option<FetchOutcome>;
}

/// Runs each fetch to completion inside `submit`; the loop blocks for the
/// duration of the request.
pub struct InlineFetcher<S> {
    source: S,
    ready: Option<FetchOutcome>,
}

impl<S: BarSource> InlineFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            ready: None,
        }
    }
}

impl<S: BarSource> Fetcher for InlineFetcher<S> {
    fn submit(&mut self, req: FetchRequest) {
        self.ready = Some(FetchOutcome::run(&mut self.source, req));
    }

    fn poll(&mut self) -> Option<FetchOutcome> {
        self.ready.take()
    }
}
