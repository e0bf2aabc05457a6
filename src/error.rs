//
// error.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

use std::fmt;

use log::error;

use crate::jupyter_message::JupyterChannel;

/// Errors arising from channel operations.
#[derive(Debug)]
pub enum ChannelError {
    /// A message could not be published because the channel was already
    /// completed.
    SendFailed(JupyterChannel),

    /// The inbound message stream ended while a reply was still pending.
    ReplyStreamClosed(JupyterChannel),
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error KC-{}: ", self.discriminant())?;
        match self {
            ChannelError::SendFailed(channel) => {
                write!(f, "Cannot send on completed {:?} channel", channel)
            }
            ChannelError::ReplyStreamClosed(channel) => {
                write!(
                    f,
                    "The {:?} channel stream closed while awaiting a reply",
                    channel
                )
            }
        }
    }
}

impl std::error::Error for ChannelError {}

impl ChannelError {
    #[allow(unsafe_code, trivial_casts)]
    fn discriminant(&self) -> u8 {
        unsafe { *(self as *const Self as *const u8) }
    }

    pub fn log(&self) {
        error!("{}", self.to_string());
    }
}
