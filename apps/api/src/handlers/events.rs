use agentguard_core::AppError;
use axum::Json;
use axum::extract::State;
use tracing::{error, info};

use crate::dto::{EventDeliveryRequest, EventHandledResponse};
use crate::error::ApiResult;
use crate::state::AppState;

#[cfg(test)]
mod tests;

/// Receives one audit event delivery and enforces policy on the audited
/// resource.
///
/// Push subscriptions redeliver on any non-2xx status, so a pushed event that
/// cannot be decoded is acknowledged as rejected instead of failed. Bare
/// deliveries get a 400.
pub async fn receive_event_handler(
    State(state): State<AppState>,
    Json(request): Json<EventDeliveryRequest>,
) -> ApiResult<Json<EventHandledResponse>> {
    if let Some(message_id) = request.message_id() {
        info!(
            message_id,
            subscription = request.subscription().unwrap_or("-"),
            "received event delivery"
        );
    }

    let is_push = request.is_push();
    let message_id = request.message_id().map(str::to_owned);

    match state
        .policy_service
        .handle_envelope(&request.into_envelope())
        .await
    {
        Ok(outcome) => Ok(Json(EventHandledResponse::from(outcome))),
        Err(AppError::MalformedEvent(reason)) if is_push => {
            error!(
                message_id = message_id.as_deref().unwrap_or("-"),
                reason = %reason,
                "acknowledging malformed event without processing"
            );
            Ok(Json(EventHandledResponse::rejected(reason)))
        }
        Err(error) => Err(error.into()),
    }
}
