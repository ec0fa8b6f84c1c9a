/*
Compact, shareable form of a session:

    map=normal&nightlord=1_Gladius&slots=3:church,7:fort

Values are kept raw here: nothing is normalized or validated against the catalog
until `Session::restore` runs them through the normalization layer. Delimiters
inside values are percent-escaped.
*/
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::state::Assignment;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlStateError {
    #[error("malformed query pair {0:?}")]
    MalformedPair(String),
    #[error("malformed slot entry {0:?}")]
    MalformedSlot(String),
    #[error("invalid percent escape in {0:?}")]
    BadEscape(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlState {
    pub map: Option<String>,
    pub nightlord: Option<String>,
    pub slots: Vec<(String, String)>,
}

impl UrlState {
    pub fn from_assignment(assignment: &Assignment) -> Self {
        UrlState {
            map: assignment.map_type.map(|m| m.as_str().to_string()),
            nightlord: assignment.nightlord.as_ref().map(|n| n.as_str().to_string()),
            slots: assignment
                .slots
                .iter()
                .map(|(s, b)| (s.as_str().to_string(), b.clone()))
                .collect(),
        }
    }

    pub fn to_query(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(map) = &self.map {
            pairs.push(format!("map={}", escape(map)));
        }
        if let Some(nightlord) = &self.nightlord {
            pairs.push(format!("nightlord={}", escape(nightlord)));
        }
        if !self.slots.is_empty() {
            let slots: Vec<String> = self
                .slots
                .iter()
                .map(|(s, b)| format!("{}:{}", escape(s), escape(b)))
                .collect();
            pairs.push(format!("slots={}", slots.join(",")));
        }
        pairs.join("&")
    }

    /// Parse a query string (leading `?` optional). Unknown keys are ignored and
    /// empty values count as absent.
    pub fn parse_query(query: &str) -> Result<Self, UrlStateError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = UrlState::default();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| UrlStateError::MalformedPair(pair.to_string()))?;

            match key {
                "map" => state.map = non_empty(unescape(value)?),
                "nightlord" => state.nightlord = non_empty(unescape(value)?),
                "slots" => {
                    for entry in value.split(',').filter(|e| !e.is_empty()) {
                        let (slot, building) = entry
                            .split_once(':')
                            .ok_or_else(|| UrlStateError::MalformedSlot(entry.to_string()))?;
                        state.slots.push((unescape(slot)?, unescape(building)?));
                    }
                }
                _ => {}
            }
        }
        Ok(state)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

//escapes the delimiters, '%' itself, whitespace and anything non-ascii
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'&' | b'=' | b',' | b':' | b'%' | b'#' | b'?' | b'+' => out.push_str(&format!("%{byte:02X}")),
            b if b.is_ascii_graphic() => out.push(b as char),
            b => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

fn unescape(raw: &str) -> Result<String, UrlStateError> {
    let bad = || UrlStateError::BadEscape(raw.to_string());
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3).ok_or_else(bad)?;
            if !hex.iter().all(u8::is_ascii_hexdigit) {
                return Err(bad());
            }
            let hex = std::str::from_utf8(hex).map_err(|_| bad())?;
            out.push(u8::from_str_radix(hex, 16).map_err(|_| bad())?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| bad())
}
