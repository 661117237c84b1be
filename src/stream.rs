//! Stream connection manager.
//!
//! Keeps one long-lived websocket subscription to the new-token feed.
//! Per-frame failures are contained to that frame; any connection-level
//! error or close drops back to `Disconnected`, waits a flat backoff
//! interval, and reconnects. Reconnection is unconditional and
//! indefinite: no retry cap, no exponential growth, since the upstream
//! is expected to self-heal. Shutdown is signalled over a watch channel
//! and takes the manager through `Closing`; the ledger is only appended
//! after a decision is fully made, so neither shutdown nor a dropped
//! connection can corrupt it.

use crate::notify::Notification;
use crate::pipeline::classifier::classify;
use crate::pipeline::gate::{Decision, FilterGate};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Subscription request sent as the first frame after connecting.
pub const SUBSCRIBE_NEW_TOKEN: &str = r#"{"method":"subscribeNewToken"}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Subscribed,
    Closing,
}

/// Owns the websocket lifecycle and drives the frame pipeline.
pub struct StreamManager {
    url: String,
    reconnect_delay: Duration,
    gate: FilterGate,
    notify_tx: mpsc::Sender<Notification>,
    state: ConnectionState,
}

impl StreamManager {
    pub fn new(
        url: String,
        reconnect_delay: Duration,
        gate: FilterGate,
        notify_tx: mpsc::Sender<Notification>,
    ) -> Self {
        Self {
            url,
            reconnect_delay,
            gate,
            notify_tx,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            log::debug!("Connection state: {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    /// Run the connect / subscribe / read loop until shutdown is
    /// signalled. `Closing` is entered only on that signal; a dropped
    /// or peer-closed connection goes back to `Disconnected` and
    /// reconnects.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    self.set_state(ConnectionState::Closing);
                    log::info!("Closing stream connection");
                    return;
                }
                _ = self.run_once() => {}
            }

            log::info!(
                "Reconnecting in {}s...",
                self.reconnect_delay.as_secs()
            );
            tokio::select! {
                _ = shutdown.changed() => {
                    self.set_state(ConnectionState::Closing);
                    log::info!("Closing stream connection");
                    return;
                }
                _ = sleep(self.reconnect_delay) => {}
            }
        }
    }

    /// One connection attempt: connect, subscribe, pump frames until
    /// the stream errors out or the peer closes it.
    async fn run_once(&mut self) {
        self.set_state(ConnectionState::Connecting);
        log::info!("🔌 Connecting to {}", self.url);

        match connect_async(self.url.as_str()).await {
            Ok((ws, _)) => {
                if let Err(e) = self.run_subscribed(ws).await {
                    log::error!("❌ Stream error: {}", e);
                }
            }
            Err(e) => {
                log::error!("❌ Connection failed: {}", e);
            }
        }

        self.set_state(ConnectionState::Disconnected);
    }

    async fn run_subscribed(
        &mut self,
        ws: tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
    ) -> Result<(), tokio_tungstenite::tungstenite::Error> {
        let (mut write, mut read) = ws.split();

        write.send(Message::Text(SUBSCRIBE_NEW_TOKEN.to_string())).await?;
        self.set_state(ConnectionState::Subscribed);
        log::info!("✅ Subscribed to new-token events");

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    // One frame is processed fully before the next is
                    // read, so ledger checks are serialized here
                    self.handle_frame(&text).await;
                }
                Ok(Message::Close(frame)) => {
                    log::warn!("Stream closed by peer: {:?}", frame);
                    break;
                }
                Ok(_) => {} // ping/pong/binary: nothing to do
                Err(e) => {
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Classify one text frame and run it through the filter gate.
    ///
    /// Every failure in here is contained: a malformed frame, a failed
    /// ledger append, or a full dispatch channel affects this frame
    /// only and never the connection.
    pub async fn handle_frame(&mut self, text: &str) {
        let frame: Value = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("Malformed frame ({}): {:.120}", e, text);
                return;
            }
        };

        let Some(event) = classify(&frame) else {
            // Background traffic on the stream, not an error
            log::debug!("Unclassified frame: {:.120}", text);
            return;
        };

        log::debug!("New token announced, metadata uri: {:?}", event.metadata_uri);

        match self.gate.evaluate(&event).await {
            Decision::Accept {
                account,
                message_id,
                link,
            } => {
                // Commit before dispatch: a crash in between loses a
                // notification but can never duplicate one
                if let Err(e) = self.gate.commit(&message_id, &account) {
                    log::error!("Failed to persist seen post {}|{}: {}", message_id, account, e);
                }

                log::info!("🔔 New post from @{}: {}", account, link);
                // Hand-off never blocks intake: when the bounded
                // channel is full the notification is dropped here,
                // already committed, and only the delivery is lost
                if let Err(e) = self.notify_tx.try_send(Notification { account, link }) {
                    log::warn!("Dropping notification, dispatch channel unavailable: {}", e);
                }
            }
            Decision::Reject(reason) => {
                log::debug!("Frame rejected: {:?}", reason);
            }
        }
    }
}
