//
// channels.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

//! In-process endpoints for the Jupyter kernel channels.
//!
//! A [`ChannelSocket`] is one side of a bidirectional message stream: an
//! outbound queue drained by the external transport, and an inbound fan-out
//! the transport delivers kernel messages into. A [`ChannelSet`] is the full
//! record of channels for one kernel connection; it is owned by the caller
//! and handed to this crate by reference.

use async_channel::{Receiver, Sender};
use tokio::sync::broadcast;

use crate::error::ChannelError;
use crate::jupyter_message::{JupyterChannel, JupyterMessage};

/// Capacity of the inbound broadcast buffer for each channel.
const INBOUND_CAPACITY: usize = 32;

/// The client-side endpoints of a single Jupyter channel.
///
/// Cloning a socket yields another handle to the same channel; the transport
/// side typically keeps a clone so it can call [`ChannelSocket::deliver`].
#[derive(Clone)]
pub struct ChannelSocket {
    /// Which Jupyter channel this socket carries
    channel: JupyterChannel,

    /// Outbound messages, consumed by the transport
    outbound: Sender<JupyterMessage>,

    /// Inbound messages, fanned out to subscribers
    inbound: broadcast::Sender<JupyterMessage>,
}

impl ChannelSocket {
    /// Create a socket for the given channel.
    ///
    /// Returns the socket along with the receiving end of its outbound queue,
    /// which the transport drains and forwards to the kernel.
    pub fn new(channel: JupyterChannel) -> (Self, Receiver<JupyterMessage>) {
        let (outbound, outbound_rx) = async_channel::unbounded();
        let (inbound, _) = broadcast::channel(INBOUND_CAPACITY);
        (
            Self {
                channel,
                outbound,
                inbound,
            },
            outbound_rx,
        )
    }

    /// The Jupyter channel this socket carries.
    pub fn channel(&self) -> JupyterChannel {
        self.channel
    }

    /// Publish a message on the channel's outbound side.
    pub async fn send(&self, message: JupyterMessage) -> Result<(), ChannelError> {
        self.outbound
            .send(message)
            .await
            .map_err(|_| ChannelError::SendFailed(self.channel))
    }

    /// Subscribe to the channel's inbound messages.
    ///
    /// Each subscription is an independent sequence that sees every message
    /// delivered after the subscription was established.
    pub fn subscribe(&self) -> broadcast::Receiver<JupyterMessage> {
        self.inbound.subscribe()
    }

    /// Deliver an inbound message to all current subscribers. Called by the
    /// transport side.
    pub fn deliver(&self, message: JupyterMessage) {
        if self.inbound.send(message).is_err() {
            // No active subscribers; the message is dropped
            log::trace!(
                "Discarding inbound {:?} message (no subscribers)",
                self.channel
            );
        }
    }

    /// Complete the channel, closing its outbound queue.
    ///
    /// This is a one-way transition; the transport observes the closed queue
    /// and releases its end of the connection. Completing an
    /// already-completed channel is a no-op. Returns `true` if this call
    /// performed the close.
    pub fn complete(&self) -> bool {
        let closed = self.outbound.close();
        if closed {
            log::debug!("Completed {:?} channel", self.channel);
        }
        closed
    }

    /// Whether the channel has been completed.
    pub fn is_completed(&self) -> bool {
        self.outbound.is_closed()
    }
}

/// The set of channel endpoints for one kernel connection.
///
/// The heartbeat channel is optional; connections that do not monitor the
/// kernel's heartbeat simply omit it.
pub struct ChannelSet {
    /// The shell channel
    pub shell: ChannelSocket,

    /// The iopub channel
    pub iopub: ChannelSocket,

    /// The stdin channel
    pub stdin: ChannelSocket,

    /// The control channel
    pub control: ChannelSocket,

    /// The heartbeat channel, if present
    pub heartbeat: Option<ChannelSocket>,
}
