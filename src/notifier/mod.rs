use crate::configuration::{AuthToken, Color, NotifierConfig};
use crate::error::NotifierError;
use crate::notifications::{NotificationOutcome, build_payload, build_url, encode_room, send};
use crate::session::{FlowUnit, Route};
use crate::traits::{AttributeExpander, NotificationSender, Session};
use tracing::{error, info};

/// Per-unit view of the configuration after attribute expansion
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest<'a> {
    pub room_id: String,
    pub auth_token: &'a AuthToken,
    pub message: String,
    pub color: Color,
    pub from_note: Option<String>,
}

/// Posts one HipChat notification per unit and routes the unit on the result.
///
/// Holds no per-invocation state, so a single instance can serve several
/// worker threads at once.
pub struct Notifier {
    config: NotifierConfig,
    sender: Box<dyn NotificationSender>,
    expander: Box<dyn AttributeExpander>,
}

impl Notifier {
    pub fn new(
        config: NotifierConfig,
        sender: Box<dyn NotificationSender>,
        expander: Box<dyn AttributeExpander>,
    ) -> Self {
        Self {
            config,
            sender,
            expander,
        }
    }

    pub fn request_for(&self, unit: &FlowUnit) -> NotificationRequest<'_> {
        let expand = |template: &str| self.expander.expand(template, &unit.attributes);

        NotificationRequest {
            room_id: expand(&self.config.room_id),
            auth_token: &self.config.auth_token,
            message: expand(&self.config.message_text),
            color: self.config.color,
            from_note: self.config.from_note.as_deref().map(expand),
        }
    }

    /// Build and send the notification described by `request`. Routing is left
    /// to the caller.
    pub fn notify(&self, request: &NotificationRequest<'_>) -> NotificationOutcome {
        let room = match encode_room(&request.room_id) {
            Ok(room) => room,
            Err(e) => return NotificationOutcome::failure(e),
        };

        let url = build_url(&self.config.url_template, &room, request.auth_token.expose());

        let payload = match build_payload(&request.message, request.color, request.from_note.as_deref())
        {
            Ok(payload) => payload,
            Err(e) => return NotificationOutcome::failure(e),
        };

        send(self.sender.as_ref(), &url, &payload)
    }

    /// Process at most one unit from `session`.
    ///
    /// Returns `None` when no unit was pending. Otherwise the unit has been
    /// transferred to exactly one route by the time this returns.
    #[tracing::instrument(name = "on_trigger", skip(self, session), fields())]
    pub fn on_trigger(&self, session: &mut dyn Session) -> Option<NotificationOutcome> {
        let unit = session.get()?;
        let request = self.request_for(&unit);
        let outcome = self.notify(&request);

        match &outcome {
            NotificationOutcome::Success => {
                info!(unit_id = %unit.id, room_id = %request.room_id, "Successfully posted message to HipChat");
                session.report_send(&unit, &request.room_id);
                session.transfer(unit, Route::Success);
            }
            NotificationOutcome::Failure {
                reason,
                status,
                payload,
            } => {
                match reason {
                    NotifierError::RemoteRejection { status } => error!(
                        unit_id = %unit.id,
                        code = reason.code(),
                        status,
                        payload = payload.as_deref().unwrap_or_default(),
                        "Failed to post message to HipChat"
                    ),
                    NotifierError::Validation(_) => {
                        error!(unit_id = %unit.id, code = reason.code(), error = %reason, "Unit has no message text to send")
                    }
                    NotifierError::Encoding(_) => error!(
                        unit_id = %unit.id,
                        code = reason.code(),
                        room_id = %request.room_id,
                        error = %reason,
                        "Failed to encode room identifier"
                    ),
                    _ => error!(
                        unit_id = %unit.id,
                        code = reason.code(),
                        status = ?status,
                        error = %reason,
                        "Failed to open connection to HipChat"
                    ),
                }

                let unit = session.penalize(unit);
                session.transfer(unit, Route::Failure);
                if !matches!(reason, NotifierError::Validation(_)) {
                    session.yield_processor();
                }
            }
        }

        Some(outcome)
    }
}
