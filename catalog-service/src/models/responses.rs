use crate::models::reading::ReadingOutcome;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ReadingReport {
    pub requested: usize,
    pub completed: usize,
    pub timed_out: usize,
    pub budget_ms: u64,
    pub elapsed_ms: u64,
    pub outcomes: Vec<ReadingOutcome>,
}

impl ReadingReport {
    pub fn new(outcomes: Vec<ReadingOutcome>, budget_ms: u64, elapsed_ms: u64) -> Self {
        let completed = outcomes.iter().filter(|o| o.result.is_success()).count();
        let timed_out = outcomes.iter().filter(|o| o.result.is_timeout()).count();
        Self {
            requested: outcomes.len(),
            completed,
            timed_out,
            budget_ms,
            elapsed_ms,
            outcomes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
