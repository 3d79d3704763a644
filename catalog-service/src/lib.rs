pub mod cli;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

pub use config::Config;
pub use models::reading::{BookRef, ReadingOutcome, ReadingRequest, ReadingResult};
pub use models::storage::{Book, BookStore, MemoryBackend, NewBook, SqliteBackend, StorageError};
pub use services::catalog::{BookService, ServiceError};
pub use services::reading::{ReadingError, ReadingOrchestrator};
pub use services::simulator::{ReadingPace, ReadingSimulator, SimulationError, StoreReadingSimulator};
