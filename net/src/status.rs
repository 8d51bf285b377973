//! Parsing of the JSON document carried by the status response.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Prefix of an embedded PNG icon.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("malformed status JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed icon data: {0}")]
    Icon(#[from] base64::DecodeError),
}

/// Parsed status response.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerInfo {
    pub version: String,
    pub protocol: i32,
    pub max_players: i64,
    pub online_players: i64,
    /// Either a plain string or a chat component, passed through untouched.
    pub description: Value,
    /// Raw PNG bytes of the server icon.
    pub icon: Option<Vec<u8>>,
    /// `None` when the server does not publish the extension.
    pub live: Option<LiveInfo>,
}

/// Live match counts published by servers that support the extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveInfo {
    pub participants: i64,
    pub observers: i64,
    pub map: Option<MapInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapInfo {
    pub name: Option<String>,
    pub icon: Option<Vec<u8>>,
}

#[derive(Deserialize)]
struct RawStatus {
    version: RawVersion,
    players: RawPlayers,
    description: Value,
    /// Only a string can carry an icon; anything else is ignored.
    #[serde(default)]
    favicon: Option<Value>,
    /// Non-standard live match block.
    #[serde(default)]
    live: Option<Value>,
}

#[derive(Deserialize)]
struct RawVersion {
    name: String,
    protocol: i32,
}

#[derive(Deserialize)]
struct RawPlayers {
    max: i64,
    online: i64,
}

impl ServerInfo {
    pub fn from_json(json: &str) -> Result<Self, StatusError> {
        let raw: RawStatus = serde_json::from_str(json)?;

        let icon = match raw.favicon.as_ref().and_then(Value::as_str) {
            Some(uri) => decode_png_data_uri(uri)?,
            None => None,
        };

        // Schema-less extension: a block that is not an object is treated as absent.
        let live = match &raw.live {
            Some(Value::Object(live)) => Some(LiveInfo::from_object(live)?),
            _ => None,
        };

        Ok(Self {
            version: raw.version.name,
            protocol: raw.version.protocol,
            max_players: raw.players.max,
            online_players: raw.players.online,
            description: raw.description,
            icon,
            live,
        })
    }

    /// Plain text of the description, when it is a string or a component
    /// with a top-level `text`.
    #[must_use]
    pub fn description_text(&self) -> Option<&str> {
        match &self.description {
            Value::String(text) => Some(text.as_str()),
            Value::Object(component) => component.get("text").and_then(Value::as_str),
            _ => None,
        }
    }
}

impl LiveInfo {
    /// Reads each member on its own; a missing or unreadable count is 0.
    fn from_object(live: &Map<String, Value>) -> Result<Self, StatusError> {
        let map = match live.get("map") {
            Some(Value::Object(map)) => Some(MapInfo {
                name: map.get("name").and_then(Value::as_str).map(str::to_owned),
                icon: match map.get("icon").and_then(Value::as_str) {
                    Some(uri) => decode_png_data_uri(uri)?,
                    None => None,
                },
            }),
            _ => None,
        };
        Ok(Self {
            participants: count(live.get("participants")),
            observers: count(live.get("observers")),
            map,
        })
    }
}

fn count(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

/// Decodes `data:image/png;base64,<data>`. Any other shape yields `None`.
pub fn decode_png_data_uri(uri: &str) -> Result<Option<Vec<u8>>, StatusError> {
    let Some(data) = uri.strip_prefix(PNG_DATA_URI_PREFIX) else {
        return Ok(None);
    };
    // Older servers wrap the payload at 76 columns.
    let data: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(Some(STANDARD.decode(data)?))
}
