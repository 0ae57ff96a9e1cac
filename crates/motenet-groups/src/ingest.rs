//! Ingestion boundary: raw broker messages to [`MembershipReport`]s.
//!
//! Motes publish on `<prefix>/<channel>/<mote-id>` with payloads such as
//! `{"group": true, "members": ["fd00::202", ...]}`. Other payloads on the
//! same topic (departure notices, empty keepalives) carry no member list
//! and are read as the sender reporting only itself.
//!
//! This is the only place untyped input is inspected. Everything past
//! [`RawMessage::into_report`] works on typed reports.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::record::{MembershipReport, MoteId};

/// Topic segment holding the sender id.
const SENDER_SEGMENT: usize = 2;

/// A message as handed over by the broker bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    pub topic: String,
    #[serde(default)]
    pub payload: Option<Value>,
}

impl RawMessage {
    pub fn new(topic: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }

    /// Parse one JSON line of the form `{"topic": ..., "payload": ...}`.
    pub fn from_json(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Sender id taken from the topic.
    pub fn sender(&self) -> Result<MoteId> {
        self.topic
            .split('/')
            .nth(SENDER_SEGMENT)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(MoteId::from)
            .ok_or_else(|| Error::MalformedReport(format!("no sender in topic {:?}", self.topic)))
    }

    /// Normalize into a report; the sender always ends up in `members`.
    pub fn into_report(self) -> Result<MembershipReport> {
        let sender = self.sender()?;

        let listed = match self.payload {
            Some(Value::Object(mut fields)) => fields.remove("members"),
            _ => None,
        };

        let mut members = match listed {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(id) => Ok(MoteId(id)),
                    other => Err(Error::MalformedReport(format!(
                        "member id must be a string, got {other}"
                    ))),
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(Error::MalformedReport(format!(
                    "members must be an array, got {other}"
                )))
            }
        };

        members.push(sender.clone());
        Ok(MembershipReport { sender, members })
    }
}
