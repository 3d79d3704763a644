use crate::config::Config;
use crate::models::reading::{ReadingOutcome, ReadingRequest};
use crate::models::storage::{Book, BookStore, NewBook, StorageError};
use crate::services::reading::{ReadingError, ReadingOrchestrator};
use crate::services::simulator::{ReadingPace, StoreReadingSimulator};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub type Store = Arc<dyn BookStore + Send + Sync>;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Reading(#[from] ReadingError),
}

pub struct BookService {
    store: Store,
    orchestrator: ReadingOrchestrator,
    default_budget: Duration,
}

impl BookService {
    pub fn new(store: Store, orchestrator: ReadingOrchestrator, default_budget: Duration) -> Self {
        Self {
            store,
            orchestrator,
            default_budget,
        }
    }

    pub fn from_config(store: Store, config: &Config) -> Self {
        let pace = ReadingPace::new(config.reading_min_delay, config.reading_max_delay);
        let simulator = Arc::new(StoreReadingSimulator::new(Arc::clone(&store), pace));
        let orchestrator = ReadingOrchestrator::new(simulator)
            .with_max_batch_size(config.max_batch_size)
            .with_max_concurrency(config.max_concurrent_readings);
        Self::new(store, orchestrator, config.reading_budget)
    }

    pub fn default_budget(&self) -> Duration {
        self.default_budget
    }

    pub async fn get_books(&self) -> Result<Vec<Book>, ServiceError> {
        Ok(self.store.get_books().await?)
    }

    pub async fn create_book(&self, book: &NewBook) -> Result<Book, ServiceError> {
        let created = self.store.create_book(book).await?;
        info!("Created book {} ({})", created.id, created.title);
        Ok(created)
    }

    pub async fn get_book_by_id(&self, id: i64) -> Result<Option<Book>, ServiceError> {
        Ok(self.store.get_book(id).await?)
    }

    pub async fn update_book(&self, id: i64, book: NewBook) -> Result<Book, ServiceError> {
        let book = book.with_id(id);
        self.store.update_book(&book).await?;
        Ok(book)
    }

    pub async fn delete_book(&self, id: i64) -> Result<(), ServiceError> {
        self.store.delete_book(id).await?;
        info!("Deleted book {}", id);
        Ok(())
    }

    pub async fn search_books_by_name(&self, name: &str) -> Result<Vec<Book>, ServiceError> {
        Ok(self.store.search_books_by_title(name).await?)
    }

    pub async fn simulate_multiple_readings(
        &self,
        request: ReadingRequest,
    ) -> Result<Vec<ReadingOutcome>, ServiceError> {
        Ok(self
            .orchestrator
            .simulate_readings(&request.ids, request.budget)
            .await?)
    }
}
