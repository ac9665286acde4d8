use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use chrono::Utc;
use tracing::{debug, warn};

use super::{BarSource, FetchOutcome, FetchRequest, Fetcher};
use crate::error::FeedError;
use crate::interval::Interval;

/// Background thread owning the bar source.
///
/// Requests queue on one channel and are served strictly one at a time;
/// outcomes come back on a single-consumer channel the UI loop drains
/// without blocking.
pub struct FetchWorker {
    requests: Option<Sender<FetchRequest>>,
    outcomes: Receiver<FetchOutcome>,
    // Submitted and not yet answered.
    pending: VecDeque<(u64, Interval)>,
    // Outcomes synthesized locally when the thread is gone.
    failed: VecDeque<FetchOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl FetchWorker {
    pub fn spawn<S>(mut source: S) -> Self
    where
        S: BarSource + Send + 'static,
    {
        let (req_tx, req_rx) = mpsc::channel::<FetchRequest>();
        let (out_tx, out_rx) = mpsc::channel::<FetchOutcome>();

        let handle = thread::Builder::new()
            .name("kline-fetch".to_string())
            .spawn(move || {
                while let Ok(req) = req_rx.recv() {
                    debug!(id = req.id, interval = %req.interval, "fetch started");
                    let outcome = FetchOutcome::run(&mut source, req);
                    if out_tx.send(outcome).is_err() {
                        break;
                    }
                }
                debug!("fetch worker exiting");
            });

        let handle = match handle {
            Ok(h) => Some(h),
            Err(err) => {
                warn!(%err, "could not spawn fetch worker");
                None
            }
        };

        Self {
            requests: handle.as_ref().map(|_| req_tx),
            outcomes: out_rx,
            pending: VecDeque::new(),
            failed: VecDeque::new(),
            handle,
        }
    }

    fn fail(&mut self, id: u64, interval: Interval) {
        self.failed.push_back(FetchOutcome {
            id,
            interval,
            fetched_at: Utc::now(),
            result: Err(FeedError::Worker),
        });
    }

    /// The thread is gone: everything still owed fails.
    fn worker_gone(&mut self) {
        if self.requests.take().is_some() {
            warn!(unanswered = self.pending.len(), "fetch worker died");
        }
        while let Some((id, interval)) = self.pending.pop_front() {
            self.fail(id, interval);
        }
    }
}

impl Fetcher for FetchWorker {
    fn submit(&mut self, req: FetchRequest) {
        let Some(tx) = &self.requests else {
            self.fail(req.id, req.interval);
            return;
        };
        let (id, interval) = (req.id, req.interval);
        if tx.send(req).is_err() {
            self.worker_gone();
            self.fail(id, interval);
            return;
        }
        self.pending.push_back((id, interval));
    }

    fn poll(&mut self) -> Option<FetchOutcome> {
        if let Some(outcome) = self.failed.pop_front() {
            return Some(outcome);
        }
        match self.outcomes.try_recv() {
            Ok(outcome) => {
                self.pending.retain(|(id, _)| *id != outcome.id);
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.worker_gone();
                self.failed.pop_front()
            }
        }
    }
}

impl Drop for FetchWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the thread after its current fetch.
        self.requests = None;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bars::Bar;
    use std::time::{Duration, Instant};

    struct Counting;

    impl BarSource for Counting {
        fn fetch(&mut self, _symbol: &str, _interval: Interval, count: usize) -> Result<Vec<Bar>, FeedError> {
            Ok((0..count).map(|i| Bar::new(1.0, 2.0, 0.5, 1.0 + i as f64 * 0.01)).collect())
        }
    }

    fn wait_for(worker: &mut FetchWorker) -> FetchOutcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(o) = worker.poll() {
                return o;
            }
            assert!(Instant::now() < deadline, "worker never answered");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn answers_in_request_order() {
        let mut worker = FetchWorker::spawn(Counting);
        for id in 1..=3 {
            worker.submit(FetchRequest {
                id,
                symbol: "X".into(),
                interval: Interval::M5,
                count: id as usize,
            });
        }
        for id in 1..=3 {
            let outcome = wait_for(&mut worker);
            assert_eq!(outcome.id, id);
            assert_eq!(outcome.result.unwrap().len(), id as usize);
        }
        assert!(worker.poll().is_none());
    }

    struct Crashing;

    impl BarSource for Crashing {
        fn fetch(&mut self, _symbol: &str, _interval: Interval, _count: usize) -> Result<Vec<Bar>, FeedError> {
            panic!("source blew up");
        }
    }

    fn request(id: u64) -> FetchRequest {
        FetchRequest {
            id,
            symbol: "X".into(),
            interval: Interval::H1,
            count: 30,
        }
    }

    #[test]
    fn dead_thread_fails_outstanding_and_later_requests() {
        let mut worker = FetchWorker::spawn(Crashing);
        worker.submit(request(1));

        let outcome = wait_for(&mut worker);
        assert_eq!(outcome.id, 1);
        assert!(matches!(outcome.result, Err(FeedError::Worker)));

        worker.submit(request(2));
        worker.submit(request(3));
        let ids: Vec<u64> = std::iter::from_fn(|| worker.poll()).map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
