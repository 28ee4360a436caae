//! Route selection
//!
//! The route to drive is chosen by an external service. Asking it is a blocking network request,
//! so the [`RouteSelector`] normally hands the request to a worker thread and the controller
//! collects the answer on a later cycle with [`RouteSelector::poll`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, warn};
use serde::Deserialize;
use std::{
    sync::mpsc::{channel, Receiver, Sender, TryRecvError},
    thread,
    time::Duration,
};

use super::RouteError;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A source of route names.
pub trait ShapeSource: Send {
    /// Perform one blocking request for the name of the route to drive.
    ///
    /// `Ok(None)` selects the default route.
    fn fetch_shape(&mut self) -> SelectionResult;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Outcome of one route selection.
pub type SelectionResult = Result<Option<String>, RouteError>;

/// Retry policy for failed route selection requests.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryParams {
    /// Total number of attempts made before giving up, including the first.
    pub max_attempts: u32,

    /// Delay before the first retry. Each further retry doubles the delay.
    pub initial_backoff_s: f64,

    /// Upper bound on the delay between two attempts.
    pub max_backoff_s: f64,
}

/// A source which always selects the same route, used when the route is given on the command
/// line.
#[derive(Debug, Clone)]
pub struct FixedShapeSource {
    shape: Option<String>,
}

/// Issues route selection requests and collects their results without blocking the caller.
pub struct RouteSelector {
    mode: SelectorMode,

    /// Identifier of the latest request, results of older requests are discarded.
    generation: u64,

    pending: bool,

    ready: Option<SelectionResult>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

enum SelectorMode {
    /// The request is performed in the caller's thread by `request()`.
    Inline {
        source: Box<dyn ShapeSource>,
        retry: RetryParams,
    },

    /// The request is performed by a worker thread.
    Worker {
        sender: Sender<WorkerSignal>,
        receiver: Receiver<(u64, SelectionResult)>,
    },
}

#[derive(Debug)]
enum WorkerSignal {
    /// Fetch a shape, tagging the result with the given generation
    Fetch(u64),

    /// The worker should stop
    Stop,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<F> ShapeSource for F
where
    F: FnMut() -> SelectionResult + Send,
{
    fn fetch_shape(&mut self) -> SelectionResult {
        self()
    }
}

impl FixedShapeSource {
    pub fn new(shape: Option<String>) -> Self {
        Self { shape }
    }
}

impl ShapeSource for FixedShapeSource {
    fn fetch_shape(&mut self) -> SelectionResult {
        Ok(self.shape.clone())
    }
}

impl Default for RetryParams {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff_s: 0.5,
            max_backoff_s: 4.0,
        }
    }
}

impl RouteSelector {
    /// Create a selector which performs requests on a background worker thread.
    pub fn spawn<S>(source: S, retry: RetryParams) -> Self
    where
        S: ShapeSource + 'static,
    {
        let (main_sender, worker_receiver) = channel();
        let (worker_sender, main_receiver) = channel();

        let source: Box<dyn ShapeSource> = Box::new(source);

        thread::spawn(move || worker_thread(source, retry, worker_receiver, worker_sender));

        Self {
            mode: SelectorMode::Worker {
                sender: main_sender,
                receiver: main_receiver,
            },
            generation: 0,
            pending: false,
            ready: None,
        }
    }

    /// Create a selector which performs each request synchronously inside `request()`.
    pub fn blocking<S>(source: S, retry: RetryParams) -> Self
    where
        S: ShapeSource + 'static,
    {
        Self {
            mode: SelectorMode::Inline {
                source: Box::new(source),
                retry,
            },
            generation: 0,
            pending: false,
            ready: None,
        }
    }

    /// Start a new request. Does nothing if a request is already pending.
    pub fn request(&mut self) {
        if self.pending {
            return;
        }

        self.generation += 1;
        self.pending = true;

        match &mut self.mode {
            SelectorMode::Inline { source, retry } => {
                self.ready = Some(fetch_with_retry(source.as_mut(), retry));
            }
            SelectorMode::Worker { sender, .. } => {
                if sender.send(WorkerSignal::Fetch(self.generation)).is_err() {
                    self.ready = Some(Err(worker_stopped()));
                }
            }
        }
    }

    /// Returns true if a request has been made whose result has not been collected yet.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Collect the result of the pending request, if it has completed.
    pub fn poll(&mut self) -> Option<SelectionResult> {
        if !self.pending {
            return None;
        }

        if let SelectorMode::Worker { receiver, .. } = &self.mode {
            loop {
                match receiver.try_recv() {
                    Ok((gen, result)) if gen == self.generation => {
                        self.ready = Some(result);
                        break;
                    }
                    Ok((gen, _)) => debug!("Discarding result of cancelled route request {}", gen),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        self.ready = Some(Err(worker_stopped()));
                        break;
                    }
                }
            }
        }

        let result = self.ready.take();
        if result.is_some() {
            self.pending = false;
        }
        result
    }

    /// Abandon the pending request. Its result will be discarded when it arrives.
    pub fn cancel(&mut self) {
        if self.pending {
            debug!("Route request {} cancelled", self.generation);
        }

        self.generation += 1;
        self.pending = false;
        self.ready = None;
    }
}

impl Drop for RouteSelector {
    fn drop(&mut self) {
        // The worker is not joined as it may be sleeping between retries, it exits once it sees
        // the stop signal or finds the channel closed.
        if let SelectorMode::Worker { sender, .. } = &self.mode {
            sender.send(WorkerSignal::Stop).ok();
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Fetch a shape from the source, retrying on transport failures.
///
/// Attempts are separated by an exponential backoff starting at `initial_backoff_s` and capped at
/// `max_backoff_s`. Any other error is returned straight away.
pub fn fetch_with_retry(source: &mut dyn ShapeSource, retry: &RetryParams) -> SelectionResult {
    let max_attempts = retry.max_attempts.max(1);
    let mut backoff_s = retry.initial_backoff_s.max(0.0);
    let mut attempt = 1;

    loop {
        match source.fetch_shape() {
            Err(RouteError::TransportUnavailable(e)) if attempt < max_attempts => {
                warn!(
                    "Route selection attempt {}/{} failed ({}), retrying in {:.2} s",
                    attempt, max_attempts, e, backoff_s
                );

                thread::sleep(Duration::from_secs_f64(backoff_s));

                backoff_s = (backoff_s * 2.0).min(retry.max_backoff_s.max(0.0));
                attempt += 1;
            }
            result => return result,
        }
    }
}

fn worker_thread(
    mut source: Box<dyn ShapeSource>,
    retry: RetryParams,
    receiver: Receiver<WorkerSignal>,
    sender: Sender<(u64, SelectionResult)>,
) {
    while let Ok(signal) = receiver.recv() {
        match signal {
            WorkerSignal::Stop => break,
            WorkerSignal::Fetch(gen) => {
                let result = fetch_with_retry(source.as_mut(), &retry);

                if sender.send((gen, result)).is_err() {
                    break;
                }
            }
        }
    }

    debug!("Route selection worker stopped");
}

fn worker_stopped() -> RouteError {
    RouteError::TransportUnavailable(String::from("route selection worker has stopped"))
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
