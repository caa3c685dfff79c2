//! Status record
//!
//! A flat set of raw text fields describing server and round state.

use serde::{Deserialize, Serialize};

use super::QueryValues;

/// Keys recognized in a status reply, in field order
pub const STATUS_KEYS: [&str; 22] = [
    "version",
    "mode",
    "respawn",
    "enter",
    "vote",
    "ai",
    "host",
    "round_id",
    "players",
    "revision",
    "revision_date",
    "admins",
    "gamestate",
    "map_name",
    "security_level",
    "round_duration",
    "time_dilation_current",
    "time_dilation_avg",
    "time_dilation_avg_slow",
    "time_dilation_avg_fast",
    "shuttle_mode",
    "shuttle_timer",
];

/// Server status as reported by `?status`
///
/// Values are kept as the server sent them; a missing key is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub version: String,
    pub mode: String,
    pub respawn: String,
    pub enter: String,
    pub vote: String,
    pub ai: String,
    pub host: String,
    pub round_id: String,
    pub players: String,
    pub revision: String,
    pub revision_date: String,
    pub admins: String,
    pub game_state: String,
    pub map_name: String,
    pub security_level: String,
    pub round_duration: String,
    pub time_dilation_current: String,
    pub time_dilation_avg: String,
    pub time_dilation_avg_slow: String,
    pub time_dilation_avg_fast: String,
    pub shuttle_mode: String,
    pub shuttle_timer: String,
}

impl Status {
    /// Build a record from parsed key/value text, keeping the first value per key
    pub fn from_query(values: &QueryValues) -> Self {
        let mut status = Status::default();
        for (key, list) in values {
            if let (Some(field), Some(first)) = (status.field_mut(key), list.first()) {
                field.clone_from(first);
            }
        }
        status
    }

    /// Build a record from ordered pairs; later duplicates are dropped
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut status = Status::default();
        let mut seen = [false; STATUS_KEYS.len()];
        for (key, value) in pairs {
            let Some(index) = STATUS_KEYS.iter().position(|k| *k == key.as_ref()) else {
                continue;
            };
            if seen[index] {
                continue;
            }
            seen[index] = true;
            if let Some(field) = status.field_mut(key.as_ref()) {
                *field = value.into();
            }
        }
        status
    }

    /// Look up a field by its wire key
    pub fn get(&self, key: &str) -> Option<&str> {
        let field = match key {
            "version" => &self.version,
            "mode" => &self.mode,
            "respawn" => &self.respawn,
            "enter" => &self.enter,
            "vote" => &self.vote,
            "ai" => &self.ai,
            "host" => &self.host,
            "round_id" => &self.round_id,
            "players" => &self.players,
            "revision" => &self.revision,
            "revision_date" => &self.revision_date,
            "admins" => &self.admins,
            "gamestate" => &self.game_state,
            "map_name" => &self.map_name,
            "security_level" => &self.security_level,
            "round_duration" => &self.round_duration,
            "time_dilation_current" => &self.time_dilation_current,
            "time_dilation_avg" => &self.time_dilation_avg,
            "time_dilation_avg_slow" => &self.time_dilation_avg_slow,
            "time_dilation_avg_fast" => &self.time_dilation_avg_fast,
            "shuttle_mode" => &self.shuttle_mode,
            "shuttle_timer" => &self.shuttle_timer,
            _ => return None,
        };
        Some(field.as_str())
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        let field = match key {
            "version" => &mut self.version,
            "mode" => &mut self.mode,
            "respawn" => &mut self.respawn,
            "enter" => &mut self.enter,
            "vote" => &mut self.vote,
            "ai" => &mut self.ai,
            "host" => &mut self.host,
            "round_id" => &mut self.round_id,
            "players" => &mut self.players,
            "revision" => &mut self.revision,
            "revision_date" => &mut self.revision_date,
            "admins" => &mut self.admins,
            "gamestate" => &mut self.game_state,
            "map_name" => &mut self.map_name,
            "security_level" => &mut self.security_level,
            "round_duration" => &mut self.round_duration,
            "time_dilation_current" => &mut self.time_dilation_current,
            "time_dilation_avg" => &mut self.time_dilation_avg,
            "time_dilation_avg_slow" => &mut self.time_dilation_avg_slow,
            "time_dilation_avg_fast" => &mut self.time_dilation_avg_fast,
            "shuttle_mode" => &mut self.shuttle_mode,
            "shuttle_timer" => &mut self.shuttle_timer,
            _ => return None,
        };
        Some(field)
    }
}
