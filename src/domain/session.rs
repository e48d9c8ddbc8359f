/// Completed game sessions, as stored in the stats log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_NAME_LEN: usize = 30;
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Outcome of one finished game. Immutable once appended to the log.
///
/// Field names on the wire follow the stats file format
/// (`playerName`, `date`, `duration`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub score: u32,
    #[serde(rename = "playerName", default = "default_name")]
    pub player_name: String,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "duration", default)]
    pub duration_seconds: u64,
}

fn default_name() -> String {
    DEFAULT_PLAYER_NAME.to_string()
}

impl GameSession {
    pub fn new(score: u32, player_name: &str, timestamp: DateTime<Utc>, duration_seconds: u64) -> Self {
        GameSession {
            score,
            player_name: sanitize_name(player_name),
            timestamp,
            duration_seconds,
        }
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds as f64 / 60.0
    }
}

/// Trim, cap at 30 chars and fall back to the default name when empty.
pub fn sanitize_name(raw: &str) -> String {
    let name: String = raw.trim().chars().take(MAX_NAME_LEN).collect();
    let name = name.trim_end();
    if name.is_empty() {
        default_name()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn name_is_trimmed_and_truncated() {
        assert_eq!(sanitize_name("  ana  "), "ana");
        assert_eq!(sanitize_name(""), "Player");
        assert_eq!(sanitize_name("   "), "Player");
        let long = "x".repeat(45);
        assert_eq!(sanitize_name(&long).chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn wire_format_uses_stats_field_names() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let s = GameSession::new(40, "neo", ts, 95);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["score"], 40);
        assert_eq!(json["playerName"], "neo");
        assert_eq!(json["duration"], 95);
        assert!(json["date"].as_str().unwrap().starts_with("2026-03-01T12:00:00"));
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let s: GameSession =
            serde_json::from_str(r#"{"score":7,"date":"2025-01-02T03:04:05.000Z"}"#).unwrap();
        assert_eq!(s.player_name, "Player");
        assert_eq!(s.duration_seconds, 0);
    }
}
