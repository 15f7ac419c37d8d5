//! Single-shot background fetch for a mounted view

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::types::{ContributionCalendar, FetchError};

pub type FetchResult = Result<ContributionCalendar, FetchError>;

/// Handle to one in-flight fetch. Dropping it detaches the worker; a
/// result that arrives afterwards is discarded.
pub struct FetchTask {
    rx: Receiver<FetchResult>,
}

impl FetchTask {
    /// Run `fetch` on a worker thread
    pub fn spawn<F>(fetch: F) -> Self
    where
        F: FnOnce() -> FetchResult + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            deliver(&tx, fetch());
        });
        Self { rx }
    }

    /// Non-blocking check for the result
    pub fn poll(&self) -> Option<FetchResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(FetchError::Network(
                "fetch worker exited without a result".into(),
            ))),
        }
    }
}

/// Hand the result to the view; returns false when the view is gone
fn deliver(tx: &Sender<FetchResult>, result: FetchResult) -> bool {
    if tx.send(result).is_err() {
        tracing::debug!("view torn down before fetch resolved; discarding result");
        return false;
    }
    true
}
