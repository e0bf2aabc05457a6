//
// shutdown.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

//! The shutdown/restart handshake: send a `shutdown_request` on the shell
//! channel, wait for the matching `shutdown_reply`, and unless restarting,
//! complete all channel streams.

use tokio::sync::broadcast;

use crate::channels::ChannelSet;
use crate::error::ChannelError;
use crate::jupyter_message::{JupyterChannel, JupyterMessage};

/// Send a shutdown request to the kernel and wait for its reply.
///
/// If `restart` is false, all channels in the set are completed once the
/// matching `shutdown_reply` arrives; if it is true, the channels are left
/// open so the connection can be reused after the kernel comes back up.
///
/// Each call is an independent exchange: it builds a request with a fresh
/// message ID and establishes its own reply subscription. No timeout is
/// imposed here; if the kernel never replies, the returned future stays
/// pending, and callers that need a deadline should race it against a timer.
///
/// # Arguments
///
/// - `channels`: The channel set for the kernel connection
/// - `username`: The user to attribute the request to
/// - `session`: The session identifier for the connection
/// - `restart`: Whether the kernel is expected to restart after shutting down
pub async fn shutdown_request(
    channels: &ChannelSet,
    username: &str,
    session: &str,
    restart: bool,
) -> Result<(), ChannelError> {
    let mut request = JupyterMessage::new(username, session, "shutdown_request");
    request.content = serde_json::json!({ "restart": restart });

    // Subscribe to shell replies before publishing the request; publishing
    // first would race the kernel's reply against the subscription.
    let mut replies = channels.shell.subscribe();

    channels.shell.send(request.clone()).await?;
    log::debug!(
        "[session {}] Sent shutdown request {} (restart: {})",
        session,
        request.header.msg_id,
        restart
    );

    let reply = wait_for_shutdown_reply(&mut replies, &request, session).await?;
    log::debug!(
        "[session {}] Kernel acknowledged shutdown request {}: {}",
        session,
        request.header.msg_id,
        reply.content
    );

    if !restart {
        channels.shell.complete();
        channels.iopub.complete();
        channels.stdin.complete();
        channels.control.complete();
        if let Some(heartbeat) = &channels.heartbeat {
            heartbeat.complete();
        }
    }

    Ok(())
}

/// Shut down the kernel and complete all channels.
pub async fn shutdown(
    channels: &ChannelSet,
    username: &str,
    session: &str,
) -> Result<(), anyhow::Error> {
    shutdown_request(channels, username, session, false).await?;
    Ok(())
}

/// Shut down the kernel in preparation for a restart, leaving the channels
/// open.
pub async fn restart(
    channels: &ChannelSet,
    username: &str,
    session: &str,
) -> Result<(), anyhow::Error> {
    shutdown_request(channels, username, session, true).await?;
    Ok(())
}

/// Wait for the first shell message that is a `shutdown_reply` to `request`,
/// discarding everything else.
async fn wait_for_shutdown_reply(
    replies: &mut broadcast::Receiver<JupyterMessage>,
    request: &JupyterMessage,
    session: &str,
) -> Result<JupyterMessage, ChannelError> {
    loop {
        match replies.recv().await {
            Ok(message) => {
                if message.is_child_of(request) && message.header.msg_type == "shutdown_reply" {
                    return Ok(message);
                }
                log::trace!(
                    "[session {}] Discarding message {} while awaiting shutdown reply",
                    session,
                    message.header.msg_id
                );
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                log::warn!(
                    "[session {}] Shell subscription lagged; {} messages skipped",
                    session,
                    skipped
                );
            }
            Err(broadcast::error::RecvError::Closed) => {
                let err = ChannelError::ReplyStreamClosed(JupyterChannel::Shell);
                err.log();
                return Err(err);
            }
        }
    }
}
