use std::{collections::HashMap, sync::Arc};

use impressions_core::errors::InterfaceError;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    blocks::{impression_modal, IMPRESSION_ACTION_ID, IMPRESSION_BLOCK_ID},
    client::{SlackApiError, ViewsApi},
};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum InteractionKind {
    Shortcut,
    ViewSubmission,
    Other(String),
}

impl Default for InteractionKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for InteractionKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "shortcut" => Self::Shortcut,
            "view_submission" => Self::ViewSubmission,
            _ => Self::Other(value),
        }
    }
}

impl InteractionKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Shortcut => "shortcut",
            Self::ViewSubmission => "view_submission",
            Self::Other(value) => value,
        }
    }
}

/// The subset of a Slack interaction payload this service reads. Absent and
/// `null` fields both decode to their empty value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct InteractionPayload {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: InteractionKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trigger_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub view: ViewPayload,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ViewPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: ViewState,
}

/// block id -> action id -> submitted action. A `null` block or action is kept
/// as `None` so the lookup can tell it apart from an absent key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ViewState {
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: HashMap<String, Option<HashMap<String, Option<ActionState>>>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ActionState {
    #[serde(default)]
    pub value: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Result of looking up a submitted input by block and action id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmittedValue {
    Provided(String),
    /// The action was present but blank: an empty string, a `null` value, or
    /// a `null` action.
    Empty,
    /// The block or action id was absent from the submitted state, or the
    /// block itself was `null`.
    Missing,
}

impl SubmittedValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Provided(value) => value,
            Self::Empty | Self::Missing => "",
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl InteractionPayload {
    pub fn parse(raw: &str) -> Result<Self, DispatchError> {
        serde_json::from_str(raw).map_err(DispatchError::InvalidPayload)
    }

    pub fn submitted_value(&self, block_id: &str, action_id: &str) -> SubmittedValue {
        let Some(action) = self
            .view
            .state
            .values
            .get(block_id)
            .and_then(Option::as_ref)
            .and_then(|actions| actions.get(action_id))
        else {
            return SubmittedValue::Missing;
        };

        match action.as_ref().and_then(|action| action.value.as_deref()) {
            Some(value) if !value.is_empty() => SubmittedValue::Provided(value.to_owned()),
            _ => SubmittedValue::Empty,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteractionContext {
    pub correlation_id: String,
}

impl Default for InteractionContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// The modal was opened; Slack expects an empty 200.
    ModalOpened,
    /// The submission was recorded; Slack closes the modal on a `{}` body.
    SubmissionAcknowledged { impression: SubmittedValue },
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("interaction form could not be parsed: {0}")]
    MalformedForm(String),
    #[error("interaction form has no `payload` field")]
    MissingPayload,
    #[error("interaction payload is not valid JSON: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    #[error("shortcut interaction has no trigger_id")]
    MissingTriggerId,
    #[error("unsupported interaction type `{0}`")]
    UnsupportedType(String),
    #[error("failed to open modal: {0}")]
    OpenModal(#[source] SlackApiError),
}

impl DispatchError {
    /// Maps onto the plain-text response contract. Upstream failures are
    /// collapsed into a generic message.
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        match self {
            Self::MalformedForm(_) => {
                InterfaceError::bad_request("failed to parse form", correlation_id)
            }
            Self::MissingPayload => InterfaceError::bad_request("missing payload", correlation_id),
            Self::InvalidPayload(_) => {
                InterfaceError::bad_request("invalid JSON payload", correlation_id)
            }
            Self::MissingTriggerId => {
                InterfaceError::bad_request("missing trigger_id", correlation_id)
            }
            Self::UnsupportedType(_) => {
                InterfaceError::bad_request("unsupported interaction type", correlation_id)
            }
            Self::OpenModal(_) => InterfaceError::internal("failed to open modal", correlation_id),
        }
    }
}

#[derive(Clone)]
pub struct InteractionDispatcher {
    views: Arc<dyn ViewsApi>,
}

impl InteractionDispatcher {
    pub fn new(views: Arc<dyn ViewsApi>) -> Self {
        Self { views }
    }

    /// Handles the raw `payload` form value of one interaction request.
    pub async fn dispatch(
        &self,
        raw_payload: Option<&str>,
        ctx: &InteractionContext,
    ) -> Result<InteractionOutcome, DispatchError> {
        let raw_payload = raw_payload.filter(|raw| !raw.is_empty());
        let Some(raw_payload) = raw_payload else {
            return Err(DispatchError::MissingPayload);
        };
        let payload = InteractionPayload::parse(raw_payload)?;

        info!(
            event_name = "ingress.slack.interaction_parsed",
            correlation_id = %ctx.correlation_id,
            interaction_type = payload.kind.as_str(),
            view_id = payload.view.id.as_str(),
            "parsed slack interaction payload"
        );

        match &payload.kind {
            InteractionKind::Shortcut => self.open_impression_modal(&payload, ctx).await,
            InteractionKind::ViewSubmission => Ok(record_submission(&payload, ctx)),
            InteractionKind::Other(kind) => Err(DispatchError::UnsupportedType(kind.clone())),
        }
    }

    async fn open_impression_modal(
        &self,
        payload: &InteractionPayload,
        ctx: &InteractionContext,
    ) -> Result<InteractionOutcome, DispatchError> {
        if payload.trigger_id.is_empty() {
            return Err(DispatchError::MissingTriggerId);
        }

        let view = impression_modal();
        if let Err(source) = self.views.open_view(&payload.trigger_id, &view).await {
            error!(
                event_name = "egress.slack.views_open_failed",
                correlation_id = %ctx.correlation_id,
                error = %source,
                "failed to open impression modal"
            );
            return Err(DispatchError::OpenModal(source));
        }

        info!(
            event_name = "egress.slack.views_open_sent",
            correlation_id = %ctx.correlation_id,
            "impression modal opened"
        );
        Ok(InteractionOutcome::ModalOpened)
    }
}

fn record_submission(payload: &InteractionPayload, ctx: &InteractionContext) -> InteractionOutcome {
    let impression = payload.submitted_value(IMPRESSION_BLOCK_ID, IMPRESSION_ACTION_ID);
    if impression.is_missing() {
        warn!(
            event_name = "ingress.slack.impression_missing",
            correlation_id = %ctx.correlation_id,
            block_id = IMPRESSION_BLOCK_ID,
            action_id = IMPRESSION_ACTION_ID,
            "view submission did not contain the impression input"
        );
    }

    info!(
        event_name = "ingress.slack.impression_received",
        correlation_id = %ctx.correlation_id,
        impression = impression.as_str(),
        "new honest impression"
    );

    InteractionOutcome::SubmissionAcknowledged { impression }
}
