use crate::models::reading::ReadingSession;
use crate::models::storage::BookStore;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::debug;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Book {0} not found")]
    NotFound(i64),
    #[error("Simulation failed: {0}")]
    Failed(String),
}

// Called concurrently; may be aborted at any await point.
#[async_trait]
pub trait ReadingSimulator {
    async fn simulate(&self, book_id: i64) -> Result<ReadingSession, SimulationError>;
}

#[derive(Debug, Clone, Copy)]
pub struct ReadingPace {
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl ReadingPace {
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        if min_delay <= max_delay {
            Self { min_delay, max_delay }
        } else {
            Self {
                min_delay: max_delay,
                max_delay: min_delay,
            }
        }
    }

    fn draw(&self) -> Duration {
        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

pub struct StoreReadingSimulator {
    store: Arc<dyn BookStore + Send + Sync>,
    pace: ReadingPace,
}

impl StoreReadingSimulator {
    pub fn new(store: Arc<dyn BookStore + Send + Sync>, pace: ReadingPace) -> Self {
        Self { store, pace }
    }
}

#[async_trait]
impl ReadingSimulator for StoreReadingSimulator {
    async fn simulate(&self, book_id: i64) -> Result<ReadingSession, SimulationError> {
        let book = self
            .store
            .get_book(book_id)
            .await
            .map_err(|e| SimulationError::Failed(e.to_string()))?
            .ok_or(SimulationError::NotFound(book_id))?;

        let delay = self.pace.draw();
        let started_at = Utc::now();
        debug!("Reading book {} for {:?}", book_id, delay);
        sleep(delay).await;

        let reading_ms = delay.as_millis() as u64;
        Ok(ReadingSession {
            session_id: Uuid::new_v4(),
            book_id,
            title: book.title,
            pages_read: (reading_ms / 100).max(1) as u32,
            reading_ms,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
