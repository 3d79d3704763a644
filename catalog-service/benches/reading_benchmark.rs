use async_trait::async_trait;
use catalog_service::models::reading::ReadingSession;
use catalog_service::utils::ids::parse_book_ids;
use catalog_service::{BookRef, ReadingOrchestrator, ReadingSimulator, SimulationError};
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

struct InstantSimulator;

#[async_trait]
impl ReadingSimulator for InstantSimulator {
    async fn simulate(&self, book_id: i64) -> Result<ReadingSession, SimulationError> {
        if book_id % 10 == 0 {
            return Err(SimulationError::NotFound(book_id));
        }
        Ok(ReadingSession {
            session_id: Uuid::new_v4(),
            book_id,
            title: format!("Book {}", book_id),
            pages_read: 1,
            reading_ms: 0,
            started_at: Utc::now(),
            finished_at: Utc::now(),
        })
    }
}

fn benchmark_parse_book_ids(c: &mut Criterion) {
    let raw = (1..=200)
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    c.bench_function("parse_book_ids", |b| {
        b.iter(|| parse_book_ids(black_box(&raw)))
    });
}

fn benchmark_simulate_readings(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let orchestrator = ReadingOrchestrator::new(Arc::new(InstantSimulator));
    let ids: Vec<BookRef> = (1..=100).map(BookRef::Id).collect();

    c.bench_function("simulate_readings_100", |b| {
        b.to_async(&runtime).iter(|| async {
            orchestrator
                .simulate_readings(black_box(&ids), Duration::from_secs(1))
                .await
                .unwrap()
        })
    });
}

criterion_group!(benches, benchmark_parse_book_ids, benchmark_simulate_readings);
criterion_main!(benches);
