mod support;

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use kline_panel::bars::Bar;
use kline_panel::config::PanelConfig;
use kline_panel::error::FeedError;
use kline_panel::feed::{BarSource, FetchWorker};
use kline_panel::interval::Interval;
use kline_panel::PanelRuntime;

use support::{RecordingSurface, ScriptedTouch};

/// Answers after a delay with bars whose close encodes the interval.
#[derive(Clone)]
struct SlowSource {
    delay: Duration,
    seen: Arc<Mutex<Vec<Interval>>>,
}

fn marker(interval: Interval) -> f64 {
    1000.0 + Interval::ALL.iter().position(|i| *i == interval).unwrap_or(0) as f64
}

impl BarSource for SlowSource {
    fn fetch(&mut self, _symbol: &str, interval: Interval, count: usize) -> Result<Vec<Bar>, FeedError> {
        thread::sleep(self.delay);
        self.seen.lock().unwrap().push(interval);
        let close = marker(interval);
        Ok(vec![Bar::new(close, close + 1.0, close - 1.0, close); count])
    }
}

#[test]
fn superseded_outcome_is_dropped_and_new_interval_fetched() {
    support::init_tracing();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let source = SlowSource {
        delay: Duration::from_millis(100),
        seen: seen.clone(),
    };
    let touch = ScriptedTouch::default();
    let mut rt = PanelRuntime::new(
        &PanelConfig::default(),
        RecordingSurface::new(320, 240),
        touch.clone(),
        FetchWorker::spawn(source),
    )
    .unwrap();

    // Startup fetch for 1h goes out and is still running.
    rt.tick(Instant::now());
    assert_eq!(rt.scheduler().in_flight(), Some(1));

    let center = rt.layout().buttons.regions()[0].center();
    touch.press(rt.mapper().unmap(center));
    rt.tick(Instant::now());
    touch.release();
    assert_eq!(rt.state.selection.current(), Interval::M1);

    let deadline = Instant::now() + Duration::from_secs(5);
    while rt.state.last_close.is_none() {
        assert!(Instant::now() < deadline, "timed out");
        rt.tick(Instant::now());
        thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(*seen.lock().unwrap(), vec![Interval::H1, Interval::M1]);
    assert_eq!(rt.state.last_close, Some(marker(Interval::M1)));
}

struct Crashing;

impl BarSource for Crashing {
    fn fetch(&mut self, _symbol: &str, _interval: Interval, _count: usize) -> Result<Vec<Bar>, FeedError> {
        panic!("source blew up");
    }
}

#[test]
fn dead_worker_does_not_freeze_the_scheduler() {
    support::init_tracing();
    let mut rt = PanelRuntime::new(
        &PanelConfig::default(),
        RecordingSurface::new(320, 240),
        ScriptedTouch::default(),
        FetchWorker::spawn(Crashing),
    )
    .unwrap();

    let t0 = Instant::now();
    rt.tick(t0);
    assert_eq!(rt.scheduler().in_flight(), Some(1));

    let deadline = Instant::now() + Duration::from_secs(5);
    while rt.scheduler().in_flight().is_some() {
        assert!(Instant::now() < deadline, "fetch 1 never settled");
        rt.tick(t0);
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(rt.state.fetch_failures, 1);

    // Each later period dispatches again and fails straight away.
    for n in 1..=5u64 {
        rt.tick(t0 + Duration::from_secs(61 * n));
        assert_eq!(rt.scheduler().in_flight(), None);
        assert_eq!(rt.state.fetch_failures, 1 + n);
    }
    assert!(rt.state.last_close.is_none());
}
