use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{InboundMessage, ShiftId};
use super::fanout::FanoutOutcome;
use super::notifier::Notifier;
use super::repository::{RepositoryError, ShiftRepository};
use super::service::{ShiftFanoutService, ShiftServiceError};

/// Router builder exposing fanout, inbound reply, and shift status endpoints.
pub fn shift_router<R, N>(service: Arc<ShiftFanoutService<R, N>>) -> Router
where
    R: ShiftRepository + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/shifts/:shift_id", get(shift_handler::<R, N>))
        .route("/shifts/:shift_id/fanout", post(fanout_handler::<R, N>))
        .route("/messages/inbound", post(inbound_handler::<R, N>))
        .with_state(service)
}

pub(crate) async fn fanout_handler<R, N>(
    State(service): State<Arc<ShiftFanoutService<R, N>>>,
    Path(shift_id): Path<String>,
) -> Response
where
    R: ShiftRepository + 'static,
    N: Notifier + 'static,
{
    match service.start_fanout(&ShiftId(shift_id)).await {
        Ok(outcome) => {
            let status = match outcome {
                FanoutOutcome::NotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::OK,
            };
            (status, axum::Json(outcome)).into_response()
        }
        Err(err) => internal_error(err),
    }
}

pub(crate) async fn inbound_handler<R, N>(
    State(service): State<Arc<ShiftFanoutService<R, N>>>,
    axum::Json(inbound): axum::Json<InboundMessage>,
) -> Response
where
    R: ShiftRepository + 'static,
    N: Notifier + 'static,
{
    match service
        .process_reply(&inbound.phone, &inbound.message, inbound.shift_id.as_ref())
        .await
    {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => internal_error(err),
    }
}

pub(crate) async fn shift_handler<R, N>(
    State(service): State<Arc<ShiftFanoutService<R, N>>>,
    Path(shift_id): Path<String>,
) -> Response
where
    R: ShiftRepository + 'static,
    N: Notifier + 'static,
{
    match service.shift(&ShiftId(shift_id)) {
        Ok(shift) => (StatusCode::OK, axum::Json(shift)).into_response(),
        Err(ShiftServiceError::Repository(RepositoryError::NotFound(detail))) => {
            let payload = json!({ "error": format!("{detail} not found") });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => internal_error(err),
    }
}

fn internal_error(err: ShiftServiceError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
