//
// jupyter_message.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// The Jupyter wire protocol version stamped into message headers.
///
/// Clients targeting a different protocol revision can build messages with
/// `JupyterMessage::with_version`, but the default must remain "5.0" for
/// compatibility with kernels speaking the base protocol.
pub const PROTOCOL_VERSION: &str = "5.0";

/// The set of all Jupyter sockets ("channels") over which messages are sent
/// and received.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JupyterChannel {
    /// The shell channel
    Shell,

    /// The control channel
    Control,

    /// The stdin channel
    Stdin,

    /// The iopub channel
    IOPub,

    /// The heartbeat channel
    Heartbeat,
}

/// The header of a Jupyter message, as it appears on the wire.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct JupyterMessageHeader {
    /// The user the message is attributed to
    pub username: String,

    /// The session the message belongs to
    pub session: String,

    /// The type of the message
    pub msg_type: String,

    /// The message ID; unique per message
    pub msg_id: String,

    /// The date/time the message was created, as an ISO 8601 string
    pub date: String,

    /// The version of the Jupyter protocol
    pub version: String,
}

/// A Jupyter message envelope.
///
/// An envelope is created, published once, and then immutable; its `msg_id`
/// is only retained as a correlation key while a reply is pending.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct JupyterMessage {
    /// The header of the message
    pub header: JupyterMessageHeader,

    /// Additional metadata
    pub metadata: serde_json::Value,

    /// The header of the message's parent (the message that caused this
    /// message). Empty on the wire for top-level requests; this side never
    /// fills it in, the kernel populates it when replying.
    #[serde(
        default,
        serialize_with = "serialize_parent_header",
        deserialize_with = "deserialize_parent_header"
    )]
    pub parent_header: Option<JupyterMessageHeader>,

    /// The message payload
    pub content: serde_json::Value,
}

impl JupyterMessage {
    /// Create a new top-level message with a fresh message ID and the default
    /// protocol version.
    ///
    /// # Arguments
    ///
    /// - `username`: The user to attribute the message to
    /// - `session`: The session identifier for the connection
    /// - `msg_type`: The protocol-defined message type tag
    ///
    /// The arguments are forwarded into the header verbatim; no validation is
    /// performed.
    pub fn new(username: &str, session: &str, msg_type: &str) -> Self {
        Self::with_version(username, session, msg_type, PROTOCOL_VERSION)
    }

    /// Create a new top-level message targeting a specific protocol version.
    pub fn with_version(username: &str, session: &str, msg_type: &str, version: &str) -> Self {
        // Create an ISO 8601 date string
        let date = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        JupyterMessage {
            header: JupyterMessageHeader {
                username: username.to_string(),
                session: session.to_string(),
                msg_type: msg_type.to_string(),
                msg_id: make_message_id(),
                date,
                version: version.to_string(),
            },
            metadata: serde_json::json!({}),
            parent_header: None,
            content: serde_json::json!({}),
        }
    }
}

/// Generate a unique message ID for Jupyter messages.
pub fn make_message_id() -> String {
    Uuid::new_v4().to_string()
}

/// Serialize a missing parent header as an empty object, matching the wire
/// convention for top-level messages.
fn serialize_parent_header<S>(
    header: &Option<JupyterMessageHeader>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match header {
        Some(header) => header.serialize(serializer),
        None => serde_json::Map::new().serialize(serializer),
    }
}

/// Deserialize a parent header, treating an empty object or any malformed
/// value as absent. Inbound channel traffic is untrusted, so shape errors
/// here must not fail the whole message.
fn deserialize_parent_header<'de, D>(
    deserializer: D,
) -> Result<Option<JupyterMessageHeader>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
