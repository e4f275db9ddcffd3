use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, instrument};

use super::{
    dto::{BookItem, TapCount},
    services,
};
use crate::{auth::extractors::CurrentUser, state::AppState};

pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books))
        .route("/books/taps", get(tap_count).post(record_tap))
}

#[instrument(skip_all)]
pub async fn list_books(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<Vec<BookItem>> {
    debug!(username = %user.username, "listing books");
    let items = services::list_books(state.catalog.as_ref(), &state.config.catalog).await;
    Json(items)
}

pub async fn tap_count(State(state): State<AppState>) -> Json<TapCount> {
    Json(TapCount {
        count: state.taps.count(),
    })
}

pub async fn record_tap(State(state): State<AppState>) -> Json<TapCount> {
    let count = state.taps.record();
    debug!(count, "book tapped");
    Json(TapCount { count })
}
