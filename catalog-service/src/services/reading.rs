//! Every valid identifier gets its own task. Tasks report `(position, result)`
//! over a channel into pre-sized slots, so outcomes line up with the request
//! whatever the completion order. The collector races the channel against one
//! timer armed at `start + budget`; when the timer wins, pending slots become
//! `Timeout` and the stragglers are aborted.

use crate::models::reading::{BookRef, ReadingOutcome, ReadingResult, ReadingSession};
use crate::services::simulator::{ReadingSimulator, SimulationError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{self, JoinHandle};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_BATCH_SIZE: usize = 256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadingError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

type Report = (usize, Result<ReadingSession, SimulationError>);

impl From<Result<ReadingSession, SimulationError>> for ReadingResult {
    fn from(result: Result<ReadingSession, SimulationError>) -> Self {
        match result {
            Ok(session) => ReadingResult::Success { session },
            Err(SimulationError::NotFound(_)) => ReadingResult::NotFound,
            Err(SimulationError::Failed(error)) => ReadingResult::SimulationError { error },
        }
    }
}

pub struct ReadingOrchestrator {
    simulator: Arc<dyn ReadingSimulator + Send + Sync>,
    max_batch_size: usize,
    max_concurrency: usize,
}

impl ReadingOrchestrator {
    pub fn new(simulator: Arc<dyn ReadingSimulator + Send + Sync>) -> Self {
        Self {
            simulator,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_concurrency: 0,
        }
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    // Zero means unbounded
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub async fn simulate_readings(
        &self,
        ids: &[BookRef],
        budget: Duration,
    ) -> Result<Vec<ReadingOutcome>, ReadingError> {
        if budget.is_zero() {
            return Err(ReadingError::InvalidConfiguration(
                "reading budget must be greater than zero".to_string(),
            ));
        }
        if ids.len() > self.max_batch_size {
            return Err(ReadingError::InvalidConfiguration(format!(
                "{} books requested, at most {} allowed per batch",
                ids.len(),
                self.max_batch_size
            )));
        }
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let deadline = Instant::now() + budget;
        info!("Simulating {} readings with a {:?} budget", ids.len(), budget);

        let mut slots: Vec<Option<ReadingResult>> = vec![None; ids.len()];
        let (tx, mut rx) = mpsc::channel::<Report>(ids.len());
        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(ids.len());
        // Per call, so one batch never waits on another batch's permits.
        let permits = (self.max_concurrency > 0)
            .then(|| Arc::new(Semaphore::new(self.max_concurrency)));

        for (position, book_ref) in ids.iter().enumerate() {
            let book_id = match book_ref {
                BookRef::Id(id) => *id,
                BookRef::Malformed(raw) => {
                    debug!("Position {} holds malformed book ID {:?}", position, raw);
                    slots[position] = Some(ReadingResult::NotFound);
                    continue;
                }
            };

            let simulator = Arc::clone(&self.simulator);
            let task_permits = permits.clone();
            let tx = tx.clone();
            handles.push(tokio::spawn(async move {
                let _permit = match task_permits {
                    Some(task_permits) => task_permits.acquire_owned().await.ok(),
                    None => None,
                };
                let result = simulator.simulate(book_id).await;
                // The collector may already have stopped listening.
                let _ = tx.send((position, result)).await;
            }));
        }
        drop(tx);

        let expired = collect_until(&mut rx, &mut slots, deadline).await;

        for handle in &handles {
            handle.abort();
        }

        let pending = slots.iter().filter(|slot| slot.is_none()).count();
        if expired && pending > 0 {
            warn!(
                "Reading deadline of {:?} expired with {} of {} books still pending",
                budget,
                pending,
                ids.len()
            );
        }

        let outcomes = ids
            .iter()
            .zip(slots)
            .enumerate()
            .map(|(position, (book_ref, slot))| {
                let result = slot.unwrap_or_else(|| {
                    if expired {
                        ReadingResult::Timeout
                    } else {
                        warn!("Reading task for book {} ended without reporting", book_ref);
                        ReadingResult::SimulationError {
                            error: "reading task ended without reporting".to_string(),
                        }
                    }
                });
                ReadingOutcome {
                    position,
                    book_id: book_ref.clone(),
                    result,
                }
            })
            .collect();

        Ok(outcomes)
    }
}

/// Fills slots until every task has reported or the deadline passes.
/// Returns `true` when the deadline cut collection short.
async fn collect_until(
    rx: &mut mpsc::Receiver<Report>,
    slots: &mut [Option<ReadingResult>],
    deadline: Instant,
) -> bool {
    let timer = sleep_until(deadline);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            biased;
            received = rx.recv() => match received {
                Some((position, result)) => record(slots, position, result),
                None => return false,
            },
            _ = &mut timer => {
                // Tasks woken at the deadline instant get one turn to report;
                // anything they send is a genuine result.
                task::yield_now().await;
                while let Ok((position, result)) = rx.try_recv() {
                    record(slots, position, result);
                }
                return true;
            }
        }
    }
}

fn record(
    slots: &mut [Option<ReadingResult>],
    position: usize,
    result: Result<ReadingSession, SimulationError>,
) {
    match slots.get_mut(position) {
        Some(slot) if slot.is_none() => *slot = Some(result.into()),
        _ => {}
    }
}
