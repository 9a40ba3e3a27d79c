use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::payload::PushPayload;

/// A reference to a locally-stored media file attached to displayed
/// notification content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Stable identifier the host uses to address the attachment.
    pub identifier: String,
    /// Path to the media file on local storage.
    pub url: PathBuf,
}

/// Display content of a notification, mutable for the duration of one
/// push-handling cycle.
///
/// The mutation service holds exactly one copy per cycle and hands it back
/// to the host through a [`ContentHandler`]; at most one attachment is ever
/// set by this pipeline.
#[derive(Debug, Clone, Default)]
pub struct NotificationContent {
    /// Title line shown to the user.
    pub title: String,
    /// Body text shown to the user.
    pub body: String,
    /// Media attachments displayed alongside the text.
    pub attachments: Vec<Attachment>,
}

impl NotificationContent {
    /// Builds display content from the alert portion of a payload, the way
    /// the host would before invoking the mutation service.
    pub fn from_payload(payload: &PushPayload) -> Self {
        let alert = payload.aps.as_ref().and_then(|aps| aps.alert.as_ref());
        Self {
            title: alert.and_then(|a| a.title()).unwrap_or_default().to_owned(),
            body: alert.and_then(|a| a.body()).unwrap_or_default().to_owned(),
            attachments: Vec::new(),
        }
    }
}

/// One incoming push as handed to the mutation service: the raw payload plus
/// the display content the host derived from it.
#[derive(Debug, Clone)]
pub struct PushRequest {
    /// The untrusted payload as delivered by the transport.
    pub payload: PushPayload,
    /// Display content derived from the payload.
    pub content: NotificationContent,
}

impl PushRequest {
    /// Returns the mutable copy of the display content the service is
    /// allowed to alter during this cycle.
    pub fn mutable_content(&self) -> NotificationContent {
        self.content.clone()
    }
}

struct HandlerInner {
    fired: AtomicBool,
    tx: Sender<NotificationContent>,
}

/// Single-shot delivery handle for final notification content.
///
/// The host's contract demands that final content is delivered at most once
/// per cycle, even when the async download path and the deadline escape
/// hatch race each other. Every clone shares one atomic already-fired flag;
/// whichever caller loses the race turns into a logged no-op.
#[derive(Clone)]
pub struct ContentHandler {
    inner: Arc<HandlerInner>,
}

impl ContentHandler {
    /// Wraps an existing sender in a single-fire handle.
    pub fn new(tx: Sender<NotificationContent>) -> Self {
        Self {
            inner: Arc::new(HandlerInner {
                fired: AtomicBool::new(false),
                tx,
            }),
        }
    }

    /// Creates a handler together with the receiving end the host awaits.
    pub fn channel() -> (Self, Receiver<NotificationContent>) {
        let (tx, rx) = mpsc::channel(1);
        (Self::new(tx), rx)
    }

    /// Delivers the final content to the host.
    ///
    /// Returns `true` if this call won the delivery; `false` if the content
    /// was already delivered (the late result is discarded) or the host
    /// stopped listening.
    pub fn deliver(&self, content: NotificationContent) -> bool {
        if self.inner.fired.swap(true, Ordering::SeqCst) {
            log::debug!("content already delivered, discarding late result");
            return false;
        }
        if let Err(error) = self.inner.tx.try_send(content) {
            log::warn!("host dropped the content receiver before delivery: {error}");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn handler_fires_at_most_once() {
        let (handler, mut rx) = ContentHandler::channel();
        let first = NotificationContent {
            title: "first".into(),
            ..Default::default()
        };

        assert!(handler.deliver(first));
        assert!(!handler.deliver(NotificationContent::default()));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.title, "first");

        drop(handler);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn clones_share_the_fired_flag() {
        let (handler, mut rx) = ContentHandler::channel();
        let racing = handler.clone();

        assert!(racing.deliver(NotificationContent::default()));
        assert!(!handler.deliver(NotificationContent::default()));

        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn delivery_to_a_closed_host_reports_failure() {
        let (handler, rx) = ContentHandler::channel();
        drop(rx);
        assert!(!handler.deliver(NotificationContent::default()));
    }
}
