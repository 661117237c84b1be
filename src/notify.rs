//! Outbound notification delivery.
//!
//! Accepted posts are handed to the dispatcher over an mpsc channel so
//! a slow or failing Telegram call never stalls frame intake. Delivery
//! failures are logged and dropped: the ledger commit already happened,
//! and dedup correctness is favored over delivery guarantees.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One accepted post, ready to be announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub account: String,
    pub link: String,
}

pub fn format_message(notification: &Notification) -> String {
    format!(
        "🔔 New post from @{}:\n{}",
        notification.account, notification.link
    )
}

#[derive(Debug)]
pub enum NotifyError {
    Transport(reqwest::Error),
    Api(u16),
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyError::Transport(e) => write!(f, "Failed to reach Telegram: {}", e),
            NotifyError::Api(status) => write!(f, "Telegram API returned HTTP {}", status),
        }
    }
}

impl std::error::Error for NotifyError {}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        NotifyError::Transport(e)
    }
}

/// Posts a text message to the configured destination channel.
///
/// Trait seam so the dispatcher can be tested with a recording sink.
#[async_trait]
pub trait Notifier {
    async fn post_message(&self, text: &str) -> Result<(), NotifyError>;
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Telegram Bot API sink for a single pre-configured chat.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn post_message(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(NotifyError::Api(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Consume notifications from the channel and deliver them one by one.
///
/// Runs until every sender is dropped. A failed delivery is logged and
/// the loop moves on; there is no retry queue (known gap: an event
/// whose delivery fails after ledger commit is lost).
pub async fn run_dispatcher(
    mut rx: mpsc::Receiver<Notification>,
    sink: Arc<dyn Notifier + Send + Sync>,
) {
    log::info!("🚀 Notification dispatcher started");

    while let Some(notification) = rx.recv().await {
        let text = format_message(&notification);
        match sink.post_message(&text).await {
            Ok(()) => {
                log::info!("✅ Notified about @{}: {}", notification.account, notification.link);
            }
            Err(e) => {
                log::error!(
                    "❌ Failed to deliver notification for @{}: {}",
                    notification.account,
                    e
                );
            }
        }
    }

    log::info!("Notification dispatcher stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingSink {
        messages: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingSink {
        async fn post_message(&self, text: &str) -> Result<(), NotifyError> {
            self.messages.lock().unwrap().push(text.to_string());
            if self.fail {
                Err(NotifyError::Api(500))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_format_message_contains_account_and_link() {
        let text = format_message(&Notification {
            account: "alice".to_string(),
            link: "https://x.com/alice/status/999".to_string(),
        });
        assert!(text.contains("@alice"));
        assert!(text.contains("https://x.com/alice/status/999"));
    }

    #[tokio::test]
    async fn test_dispatcher_delivers_each_notification_once() {
        let (tx, rx) = mpsc::channel(8);
        let sink = Arc::new(RecordingSink {
            messages: Mutex::new(Vec::new()),
            fail: false,
        });

        let handle = tokio::spawn(run_dispatcher(rx, sink.clone()));

        tx.send(Notification {
            account: "alice".to_string(),
            link: "https://x.com/alice/status/1".to_string(),
        })
        .await
        .unwrap();
        tx.send(Notification {
            account: "bob".to_string(),
            link: "https://x.com/bob/status/2".to_string(),
        })
        .await
        .unwrap();
        drop(tx);

        handle.await.unwrap();

        let messages = sink.messages.lock().unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("@alice"));
        assert!(messages[1].contains("@bob"));
    }

    #[tokio::test]
    async fn test_dispatcher_survives_delivery_failure() {
        let (tx, rx) = mpsc::channel(8);
        let sink = Arc::new(RecordingSink {
            messages: Mutex::new(Vec::new()),
            fail: true,
        });

        let handle = tokio::spawn(run_dispatcher(rx, sink.clone()));

        for i in 0..3 {
            tx.send(Notification {
                account: format!("user{}", i),
                link: format!("https://x.com/user{}/status/{}", i, i),
            })
            .await
            .unwrap();
        }
        drop(tx);

        // The dispatcher keeps draining despite every delivery failing
        handle.await.unwrap();
        assert_eq!(sink.messages.lock().unwrap().len(), 3);
    }
}
