use crate::models::reading::ReadingRequest;
use crate::models::responses::{ErrorResponse, ReadingReport};
use crate::services::catalog::{BookService, ServiceError};
use crate::utils::ids::parse_book_ids;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct SimulateParams {
    pub budget_ms: Option<i64>,
}

pub async fn simulate_reading(
    Path(book_ids): Path<String>,
    Query(params): Query<SimulateParams>,
    State(service): State<Arc<BookService>>,
) -> Result<Json<ReadingReport>, (StatusCode, Json<ErrorResponse>)> {
    let budget = params
        .budget_ms
        .map(|ms| Duration::from_millis(ms.max(0) as u64))
        .unwrap_or_else(|| service.default_budget());
    let request = ReadingRequest::new(parse_book_ids(&book_ids), budget);
    info!("Simulating readings for {:?}", book_ids);

    let start_time = Instant::now();
    match service.simulate_multiple_readings(request).await {
        Ok(outcomes) => Ok(Json(ReadingReport::new(
            outcomes,
            budget.as_millis() as u64,
            start_time.elapsed().as_millis() as u64,
        ))),
        Err(ServiceError::Reading(e)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
        Err(e) => {
            error!("Failed to simulate readings: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to simulate readings".to_string(),
                }),
            ))
        }
    }
}
