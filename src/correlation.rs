//
// correlation.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

//! Parent/child correlation between Jupyter messages. A reply is a "child" of
//! the request whose `header.msg_id` matches the reply's
//! `parent_header.msg_id`.

use serde_json::Value;

use crate::jupyter_message::JupyterMessage;

/// Determine whether `message` is a child (causal reply) of `parent`.
///
/// This operates on raw JSON values so it can be used to filter inbound
/// channel traffic without validating its shape first: any input that is not
/// an object, lacks the relevant header, or carries a non-string `msg_id`
/// classifies as "not a child" rather than an error.
pub fn is_child_message(parent: &Value, message: &Value) -> bool {
    let parent_id = parent
        .get("header")
        .and_then(|header| header.get("msg_id"))
        .and_then(Value::as_str);
    let child_id = message
        .get("parent_header")
        .and_then(|header| header.get("msg_id"))
        .and_then(Value::as_str);
    match (parent_id, child_id) {
        (Some(parent_id), Some(child_id)) => parent_id == child_id,
        _ => false,
    }
}

impl JupyterMessage {
    /// Determine whether this message is a child (causal reply) of `parent`.
    ///
    /// The typed counterpart of [`is_child_message`], for traffic that has
    /// already been deserialized. Messages with no parent header are never
    /// children.
    pub fn is_child_of(&self, parent: &JupyterMessage) -> bool {
        match &self.parent_header {
            Some(header) => header.msg_id == parent.header.msg_id,
            None => false,
        }
    }
}
