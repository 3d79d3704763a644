use crate::services::catalog::BookService;
use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod books;
pub mod health;
pub mod reading;

pub fn router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/status", get(health::health_check))
        .route("/books", get(books::get_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/search/:book_name", get(books::search_books))
        .route("/books/simulate/:book_ids", get(reading::simulate_reading))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
