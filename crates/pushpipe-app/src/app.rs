//! Application context and delegate-event dispatching.
//!
//! The context wraps the host's notification authority and drives the serial
//! loop that answers delegate events, mirroring the single main execution
//! context the host requires for notification work.

use pushpipe_bridge::HostEvent;
use pushpipe_bridge::authority::NotificationAuthority;
use tokio::sync::mpsc::Receiver;

use crate::registration;

/// Shared application context passed to the event handlers.
pub(crate) struct AppContext<A> {
    /// The host's notification authority.
    pub authority: A,
}

impl<A: NotificationAuthority> AppContext<A> {
    /// Read and dispatch delegate events from the host until it closes the
    /// channel.
    pub async fn consume_host_events(&self, mut rx: Receiver<HostEvent>) {
        while let Some(event) = rx.recv().await {
            log::debug!("Got a host event: {event:?}");
            self.dispatch_event(event);
        }
    }

    /// Dispatches the received host event down to individual handlers.
    fn dispatch_event(&self, event: HostEvent) {
        match event {
            HostEvent::RemoteNotification(payload) => {
                registration::handle_remote_notification(payload);
            }
            HostEvent::Action {
                identifier,
                completion,
            } => {
                registration::handle_action(&identifier, completion);
            }
            HostEvent::WillPresent { respond } => {
                registration::handle_will_present(respond);
            }
        }
    }
}
