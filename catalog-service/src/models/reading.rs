use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

// Unparsable tokens keep their position and resolve to NotFound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BookRef {
    Id(i64),
    Malformed(String),
}

impl BookRef {
    pub fn parse(token: &str) -> Self {
        match token.trim().parse::<i64>() {
            Ok(id) => BookRef::Id(id),
            Err(_) => BookRef::Malformed(token.to_string()),
        }
    }
}

impl fmt::Display for BookRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookRef::Id(id) => write!(f, "{}", id),
            BookRef::Malformed(raw) => write!(f, "{:?}", raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingRequest {
    pub ids: Vec<BookRef>,
    pub budget: Duration,
}

impl ReadingRequest {
    pub fn new(ids: Vec<BookRef>, budget: Duration) -> Self {
        Self { ids, budget }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingSession {
    pub session_id: Uuid,
    pub book_id: i64,
    pub title: String,
    pub pages_read: u32,
    pub reading_ms: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReadingResult {
    Success { session: ReadingSession },
    NotFound,
    SimulationError { error: String },
    Timeout,
}

impl ReadingResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ReadingResult::Success { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ReadingResult::Timeout)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingOutcome {
    pub position: usize,
    pub book_id: BookRef,
    #[serde(flatten)]
    pub result: ReadingResult,
}

impl fmt::Display for ReadingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            ReadingResult::Success { session } => write!(
                f,
                "Book {}: read \"{}\" ({} pages in {:.2}s)",
                self.book_id,
                session.title,
                session.pages_read,
                session.reading_ms as f64 / 1000.0
            ),
            ReadingResult::NotFound => write!(f, "Book {}: not found", self.book_id),
            ReadingResult::SimulationError { error } => {
                write!(f, "Book {}: simulation failed: {}", self.book_id, error)
            }
            ReadingResult::Timeout => write!(f, "Book {}: timed out", self.book_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_malformed_tokens() {
        assert_eq!(BookRef::parse("12"), BookRef::Id(12));
        assert_eq!(BookRef::parse(" 7 "), BookRef::Id(7));
        assert_eq!(BookRef::parse("abc"), BookRef::Malformed("abc".to_string()));
    }

    #[test]
    fn outcome_serializes_flat_with_status_tag() {
        let timeout = ReadingOutcome {
            position: 1,
            book_id: BookRef::Id(2),
            result: ReadingResult::Timeout,
        };
        let json = serde_json::to_value(&timeout).unwrap();
        assert_eq!(json["status"], "timeout");
        assert_eq!(json["book_id"], 2);
        assert_eq!(json["position"], 1);

        let failed = ReadingOutcome {
            position: 0,
            book_id: BookRef::Malformed("x1".to_string()),
            result: ReadingResult::SimulationError {
                error: "boom".to_string(),
            },
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "simulation_error");
        assert_eq!(json["book_id"], "x1");
        assert_eq!(json["error"], "boom");
    }

    #[test]
    fn outcome_display_is_one_line() {
        let outcome = ReadingOutcome {
            position: 0,
            book_id: BookRef::Id(999),
            result: ReadingResult::NotFound,
        };
        assert_eq!(outcome.to_string(), "Book 999: not found");
    }
}
