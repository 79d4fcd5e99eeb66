use crate::models::{DbErrorResponse, DbTimeResponse, GreetingResponse};
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

/// `GET /` without a database: greeting plus the server's clock.
pub async fn greeting() -> impl IntoResponse {
    Json(GreetingResponse::now())
}

/// `GET /` with a database: one `SELECT NOW()` round-trip.
pub async fn db_time(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.current_time().await {
        Ok(now) => {
            tracing::debug!(db_time = %now, "Database time fetched");
            (StatusCode::OK, Json(DbTimeResponse::connected(now))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Database query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DbErrorResponse::failed(&e)),
            )
                .into_response()
        }
    }
}
