use crate::error::NotifierError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

pub const HIPCHAT_URL_TEMPLATE: &str =
    "https://api.hipchat.com/v2/room/{room_id}/notification?auth_token={auth_token}";

pub const ROOM_ID_PLACEHOLDER: &str = "{room_id}";
pub const AUTH_TOKEN_PLACEHOLDER: &str = "{auth_token}";

pub const ROOM_ID: &str = "room-id";
pub const AUTH_TOKEN: &str = "auth-token";
pub const MESSAGE_TEXT: &str = "message-text";
pub const MESSAGE_BG_COLOR: &str = "message-bg-color";
pub const FROM: &str = "username";
pub const API_URL: &str = "api-url";
pub const REQUEST_TIMEOUT: &str = "request-timeout";

pub const PROPERTY_NAMES: [&str; 7] = [
    ROOM_ID,
    MESSAGE_TEXT,
    FROM,
    MESSAGE_BG_COLOR,
    AUTH_TOKEN,
    API_URL,
    REQUEST_TIMEOUT,
];

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(3600);

const ENV_PREFIX: &str = "HIPCHAT_";

/// Background color of the posted message
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Yellow,
    Green,
    Gray,
    Purple,
    Random,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Yellow,
        Color::Green,
        Color::Gray,
        Color::Purple,
        Color::Random,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Gray => "gray",
            Color::Purple => "purple",
            Color::Random => "random",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = NotifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<_> = Color::ALL.iter().map(Color::as_str).collect();
                NotifierError::Configuration(format!(
                    "{MESSAGE_BG_COLOR} must be one of [{}], got '{s}'",
                    allowed.join(", ")
                ))
            })
    }
}

/// HipChat auth token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Validated processor configuration.
///
/// `room_id`, `message_text` and `from_note` are templates that are expanded
/// against each unit's attributes; everything else is fixed here.
#[derive(Clone, Debug, PartialEq)]
pub struct NotifierConfig {
    pub room_id: String,
    pub auth_token: AuthToken,
    pub message_text: String,
    pub color: Color,
    pub from_note: Option<String>,
    pub url_template: String,
    pub request_timeout: Duration,
}

impl NotifierConfig {
    pub fn from_properties(properties: &BTreeMap<String, String>) -> Result<Self, NotifierError> {
        for key in properties.keys().filter(|k| !PROPERTY_NAMES.contains(&k.as_str())) {
            warn!(property = %key, "Ignoring unknown property");
        }
        Self::from_lookup(|key| properties.get(key).cloned())
    }

    /// Reads every property from `HIPCHAT_<KEY>`, e.g. `HIPCHAT_ROOM_ID`.
    pub fn from_env() -> Result<Self, NotifierError> {
        Self::from_lookup(|key| env::var(env_key(key)).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, NotifierError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let room_id = required(&lookup, ROOM_ID)?;
        let auth_token = AuthToken::new(required(&lookup, AUTH_TOKEN)?);
        let message_text = required(&lookup, MESSAGE_TEXT)?;
        let color = required(&lookup, MESSAGE_BG_COLOR)?.parse()?;

        let from_note = match lookup(FROM) {
            Some(note) if note.trim().is_empty() => {
                return Err(NotifierError::Configuration(format!(
                    "{FROM} must not be empty when set"
                )));
            }
            note => note,
        };

        let url_template = lookup(API_URL)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| HIPCHAT_URL_TEMPLATE.to_string());
        for placeholder in [ROOM_ID_PLACEHOLDER, AUTH_TOKEN_PLACEHOLDER] {
            if !url_template.contains(placeholder) {
                return Err(NotifierError::Configuration(format!(
                    "{API_URL} must contain the {placeholder} placeholder"
                )));
            }
        }

        let request_timeout = match lookup(REQUEST_TIMEOUT) {
            None => DEFAULT_REQUEST_TIMEOUT,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 && secs <= MAX_REQUEST_TIMEOUT.as_secs() => {
                    Duration::from_secs(secs)
                }
                _ => {
                    return Err(NotifierError::Configuration(format!(
                        "{REQUEST_TIMEOUT} must be between 1 and {} seconds, got '{raw}'",
                        MAX_REQUEST_TIMEOUT.as_secs()
                    )));
                }
            },
        };

        info!(
            room_id = %room_id,
            color = %color,
            timeout_secs = request_timeout.as_secs(),
            "Loaded HipChat notifier configuration"
        );

        Ok(Self {
            room_id,
            auth_token,
            message_text,
            color,
            from_note,
            url_template,
            request_timeout,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, NotifierError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(NotifierError::Configuration(format!("{key} must not be empty"))),
        None => Err(NotifierError::Configuration(format!("{key} is required"))),
    }
}

pub fn env_key(property: &str) -> String {
    format!("{ENV_PREFIX}{}", property.to_uppercase().replace('-', "_"))
}
