use crate::models::storage::{Book, NewBook, StorageError};
use crate::services::catalog::{BookService, ServiceError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{error, info};

type Service = Arc<BookService>;

fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn get_books(State(service): State<Service>) -> Result<Json<Vec<Book>>, StatusCode> {
    service.get_books().await.map(Json).map_err(|e| {
        error!("Failed to get books: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

pub async fn create_book(
    State(service): State<Service>,
    Json(book): Json<NewBook>,
) -> Result<(StatusCode, Json<Book>), StatusCode> {
    match service.create_book(&book).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(e) => {
            error!("Failed to create book: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn get_book(
    Path(id): Path<i64>,
    State(service): State<Service>,
) -> Result<Json<Book>, StatusCode> {
    match service.get_book_by_id(id).await {
        Ok(Some(book)) => Ok(Json(book)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to get book {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn update_book(
    Path(id): Path<i64>,
    State(service): State<Service>,
    Json(book): Json<NewBook>,
) -> Result<Json<Book>, StatusCode> {
    service.update_book(id, book).await.map(Json).map_err(|e| {
        error!("Failed to update book {}: {}", id, e);
        status_for(&e)
    })
}

pub async fn delete_book(
    Path(id): Path<i64>,
    State(service): State<Service>,
) -> Result<StatusCode, StatusCode> {
    match service.delete_book(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete book {}: {}", id, e);
            Err(status_for(&e))
        }
    }
}

pub async fn search_books(
    Path(book_name): Path<String>,
    State(service): State<Service>,
) -> Result<Json<Vec<Book>>, StatusCode> {
    info!("Search query: {:?}", book_name);

    match service.search_books_by_name(&book_name).await {
        Ok(books) if books.is_empty() => Err(StatusCode::NOT_FOUND),
        Ok(books) => Ok(Json(books)),
        Err(e) => {
            error!("Failed to search books for '{}': {}", book_name, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
