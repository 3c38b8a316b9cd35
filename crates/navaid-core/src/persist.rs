//! Key/value persistence
//!
//! Stations and receivers save into a flat `ConfigNode` of string values.
//! Loading is forgiving: a missing or unparsable key leaves the field
//! as it was.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const KEY_CHANNEL: &str = "Channel";
pub const KEY_STANDBY_CHANNEL: &str = "Standby Channel";
pub const KEY_POWER: &str = "Power";
pub const KEY_TRANSMIT_POWER: &str = "Transmit Power";
pub const KEY_ID_LENGTH: &str = "ID Length";
pub const KEY_CLOSE_SPACING: &str = "Close Spacing";
pub const KEY_RADIAL_OFFSET: &str = "Radial Offset";
pub const KEY_TEST_STATION: &str = "Test Station";
pub const KEY_BEAM_BEARING: &str = "Beam Bearing";
pub const KEY_BEAM_HALF_WIDTH: &str = "Beam Half Width";
pub const KEY_GLIDEPATH_ANGLE: &str = "Glidepath Angle";
pub const KEY_MESSAGE_LENGTH: &str = "Message Length";

pub fn id_key(index: usize) -> String {
    format!("ID{index}")
}

pub fn message_key(index: usize) -> String {
    format!("Message Data {index}")
}

/// Order-independent string map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigNode {
    values: BTreeMap<String, String>,
}

impl ConfigNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.values.insert(key.into(), value.to_string());
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, if value { "True" } else { "False" });
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn parse<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key)?.trim().parse().ok()
    }

    /// "True"/"False" in any case
    pub fn parse_bool(&self, key: &str) -> Option<bool> {
        let value = self.get(key)?.trim();
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    /// Overwrite `field` only when `key` holds a parsable value
    pub fn load_into<T: FromStr>(&self, key: &str, field: &mut T) {
        match self.parse(key) {
            Some(value) => *field = value,
            None => self.note_skipped(key),
        }
    }

    /// Entry count for an indexed run such as `ID0`, `ID1`, ... whose
    /// declared length is stored under `length_key`. Never exceeds the
    /// contiguous keys actually present, whatever length was stored.
    pub fn indexed_len(&self, length_key: &str, key: fn(usize) -> String) -> Option<usize> {
        let declared: usize = self.parse(length_key)?;
        let present = (0..declared).take_while(|&i| self.has(&key(i))).count();
        if present < declared {
            debug!("{} claims {} entries, {} present", length_key, declared, present);
        }
        Some(present)
    }

    pub fn load_bool_into(&self, key: &str, field: &mut bool) {
        match self.parse_bool(key) {
            Some(value) => *field = value,
            None => self.note_skipped(key),
        }
    }

    fn note_skipped(&self, key: &str) {
        if let Some(raw) = self.get(key) {
            debug!("Ignoring unparsable value {:?} for {}", raw, key);
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Types that round-trip through a `ConfigNode`
pub trait Persist {
    fn save(&self, node: &mut ConfigNode);
    fn load(&mut self, node: &ConfigNode);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_into_keeps_previous_on_garbage() {
        let mut node = ConfigNode::new();
        node.set(KEY_CHANNEL, "twelve");
        node.set(KEY_TRANSMIT_POWER, 80.5);

        let mut channel = 7i32;
        let mut power = 0.0f64;
        let mut missing = 3i32;
        node.load_into(KEY_CHANNEL, &mut channel);
        node.load_into(KEY_TRANSMIT_POWER, &mut power);
        node.load_into(KEY_ID_LENGTH, &mut missing);

        assert_eq!(channel, 7);
        assert_eq!(power, 80.5);
        assert_eq!(missing, 3);
    }

    #[test]
    fn test_bool_parsing() {
        let mut node = ConfigNode::new();
        node.set_bool(KEY_TEST_STATION, true);
        node.set(KEY_CLOSE_SPACING, "false");
        assert_eq!(node.get(KEY_TEST_STATION), Some("True"));
        assert_eq!(node.parse_bool(KEY_CLOSE_SPACING), Some(false));

        node.set(KEY_CLOSE_SPACING, "yes");
        let mut spacing = true;
        node.load_bool_into(KEY_CLOSE_SPACING, &mut spacing);
        assert!(spacing);
    }

    #[test]
    fn test_indexed_len_is_bounded_by_present_keys() {
        let mut node = ConfigNode::new();
        assert_eq!(node.indexed_len(KEY_ID_LENGTH, id_key), None);

        node.set(KEY_ID_LENGTH, usize::MAX);
        assert_eq!(node.indexed_len(KEY_ID_LENGTH, id_key), Some(0));

        node.set(id_key(0), 1);
        node.set(id_key(1), 2);
        node.set(id_key(3), 4);
        assert_eq!(node.indexed_len(KEY_ID_LENGTH, id_key), Some(2));

        node.set(KEY_ID_LENGTH, 1);
        assert_eq!(node.indexed_len(KEY_ID_LENGTH, id_key), Some(1));
    }

    #[test]
    fn test_indexed_keys() {
        assert_eq!(id_key(2), "ID2");
        assert_eq!(message_key(0), "Message Data 0");
    }
}
