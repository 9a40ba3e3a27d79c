//! Communication bridge between the notification host and the application.
//!
//! This crate defines the types and protocols shared by the registration
//! runtime (`pushpipe-app`), the content-mutation service
//! (`pushpipe-service`), and whatever plays the role of the host operating
//! system (a simulator in the demo binary, mocks in tests).
//!
//! The design is deliberately lightweight and unidirectional:
//! - The host pushes delegate events (a remote notification arrived, the
//!   user tapped an action button, a notification is about to be presented
//!   in the foreground).
//! - The application answers through one-shot reply senders carried inside
//!   the events, so every reply is tied to exactly one question.
//!
//! Communication happens over bounded [`tokio::sync::mpsc`] channels wrapped
//! in [`HostChannels`], providing back-pressure, async compatibility, and
//! clean separation of concerns.

pub mod authority;
pub mod category;
pub mod config;
pub mod content;
pub mod payload;

use tokio::sync::{
    mpsc::{self, Receiver, Sender},
    oneshot,
};

/// Delegate events emitted by the host towards the application.
///
/// These correspond to the callbacks a notification host fires on the
/// registered application: delivery notices, action responses, and
/// foreground-presentation queries.
#[derive(Debug)]
pub enum HostEvent {
    /// A remote notification was delivered while the application is running.
    RemoteNotification(payload::PushPayload),
    /// The user activated an action button on a displayed notification.
    ///
    /// The application must fire `completion` exactly once after handling
    /// the action, or the host keeps its UI thread blocked.
    Action {
        /// Identifier of the activated action (e.g. `"Like"`).
        identifier: String,
        /// Completion signal owed to the host.
        completion: oneshot::Sender<()>,
    },
    /// A notification is about to be displayed while the application is in
    /// the foreground; the host asks which presentation options to use.
    WillPresent {
        /// Reply channel for the chosen presentation options.
        respond: oneshot::Sender<category::PresentationOptions>,
    },
}

/// Paired `tokio::mpsc` endpoints for host-to-application delegate events.
pub struct HostChannels {
    /// Sender used by the host to emit delegate events.
    pub host_tx: Sender<HostEvent>,
    /// Receiver consumed by the application's dispatch loop.
    pub app_rx: Receiver<HostEvent>,
}

impl HostChannels {
    /// Creates a new pair of bridged endpoints with the given buffer capacity.
    pub fn new(buffer: usize) -> Self {
        let (host_tx, app_rx) = mpsc::channel(buffer);
        Self { host_tx, app_rx }
    }
}

impl Default for HostChannels {
    fn default() -> Self {
        Self::new(64)
    }
}
