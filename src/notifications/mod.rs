use crate::configuration::{AUTH_TOKEN_PLACEHOLDER, Color, ROOM_ID_PLACEHOLDER};
use crate::error::NotifierError;
use crate::traits::NotificationSender;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Result of one send attempt
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationOutcome {
    Success,
    Failure {
        reason: NotifierError,
        status: Option<u16>,
        /// Serialized body, when one was built before the failure.
        payload: Option<String>,
    },
}

impl NotificationOutcome {
    pub fn failure(reason: NotifierError) -> Self {
        let status = reason.status();
        Self::Failure {
            reason,
            status,
            payload: None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success => None,
            Self::Failure { status, .. } => *status,
        }
    }
}

/// Percent-encode a room id or name for use as a URL path segment.
///
/// Spaces come out as `%20` and a literal `+` as `%2B`, so the result never
/// holds a `+` or a space.
pub fn encode_room(raw: &str) -> Result<String, NotifierError> {
    if raw.trim().is_empty() {
        return Err(NotifierError::Encoding(
            "room identifier is empty after attribute expansion".to_string(),
        ));
    }

    Ok(urlencoding::encode(raw).into_owned())
}

/// Literal placeholder substitution; `room` must already be encoded.
pub fn build_url(template: &str, room: &str, auth_token: &str) -> String {
    template
        .replace(ROOM_ID_PLACEHOLDER, room)
        .replace(AUTH_TOKEN_PLACEHOLDER, auth_token)
}

pub fn build_payload(
    message: &str,
    color: Color,
    from: Option<&str>,
) -> Result<Value, NotifierError> {
    if message.is_empty() {
        // HipChat requires a message
        return Err(NotifierError::Validation(
            "message text is empty after attribute expansion".to_string(),
        ));
    }

    let mut payload = json!({
        "message": message,
        "color": color,
    });

    if let Some(from) = from.filter(|f| !f.is_empty()) {
        payload["from"] = json!(from);
    }

    Ok(payload)
}

/// POST `payload` to `url` through `sender` and classify the result.
#[tracing::instrument(name = "send", skip(sender, url, payload), fields())]
pub fn send(sender: &dyn NotificationSender, url: &str, payload: &Value) -> NotificationOutcome {
    let body = payload.to_string();

    match sender.post_json(url, &body) {
        Ok(status) if (200..300).contains(&status) => {
            debug!(status, "HipChat accepted notification");
            NotificationOutcome::Success
        }
        Ok(status) => {
            debug!(status, "HipChat rejected notification");
            NotificationOutcome::Failure {
                reason: NotifierError::RemoteRejection { status },
                status: Some(status),
                payload: Some(body),
            }
        }
        Err(e) => {
            debug!(error = %e, "Failed to reach HipChat");
            NotificationOutcome::Failure {
                reason: e,
                status: None,
                payload: Some(body),
            }
        }
    }
}

/// HTTP-based implementation of NotificationSender
#[derive(Clone, Debug)]
pub struct HttpNotificationSender {
    client: Client,
}

impl HttpNotificationSender {
    pub fn new(timeout: Duration) -> Result<Self, NotifierError> {
        info!(timeout_secs = timeout.as_secs(), "Creating HTTP client for HipChat");
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| {
                NotifierError::Configuration(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client })
    }
}

impl NotificationSender for HttpNotificationSender {
    fn post_json(&self, url: &str, body: &str) -> Result<u16, NotifierError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body.to_owned())
            .send()?;

        Ok(response.status().as_u16())
    }
}
