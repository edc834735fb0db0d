//! Slack interactivity endpoint.
//!
//! - `POST /api/new-impression` — form-encoded body with a JSON `payload` field

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use impressions_core::errors::InterfaceError;
use impressions_slack::interactions::{
    DispatchError, InteractionContext, InteractionDispatcher, InteractionOutcome,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct WebhookState {
    dispatcher: InteractionDispatcher,
}

#[derive(Debug, Default, Deserialize)]
pub struct InteractionForm {
    pub payload: Option<String>,
}

/// Plain-text error response for the webhook caller.
#[derive(Debug)]
pub struct WebhookError(InterfaceError);

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, self.0.message().to_owned()).into_response()
    }
}

pub fn router(dispatcher: InteractionDispatcher) -> Router {
    Router::new()
        .route("/api/new-impression", post(new_impression))
        .with_state(WebhookState { dispatcher })
}

pub async fn new_impression(
    State(state): State<WebhookState>,
    form: Result<Form<InteractionForm>, FormRejection>,
) -> Result<Response, WebhookError> {
    let ctx = InteractionContext { correlation_id: Uuid::new_v4().to_string() };
    info!(
        event_name = "ingress.http.new_impression",
        correlation_id = %ctx.correlation_id,
        "received new impression request"
    );

    let result = match form {
        Ok(Form(form)) => state.dispatcher.dispatch(form.payload.as_deref(), &ctx).await,
        // A body that is not form-encoded simply carries no `payload` field.
        Err(FormRejection::InvalidFormContentType(_)) => Err(DispatchError::MissingPayload),
        Err(rejection) => Err(DispatchError::MalformedForm(rejection.body_text())),
    };

    match result {
        Ok(InteractionOutcome::ModalOpened) => Ok(StatusCode::OK.into_response()),
        Ok(InteractionOutcome::SubmissionAcknowledged { .. }) => {
            Ok((StatusCode::OK, Json(json!({}))).into_response())
        }
        Err(error) => {
            if !matches!(error, DispatchError::OpenModal(_)) {
                warn!(
                    event_name = "ingress.http.new_impression_rejected",
                    correlation_id = %ctx.correlation_id,
                    error = %error,
                    "rejected interaction request"
                );
            }
            Err(WebhookError(error.into_interface(ctx.correlation_id)))
        }
    }
}
