//! Application runtime setup and orchestration.
//!
//! This module wires together the host authority, the launch-time
//! registration flow, and the dispatch loop that listens to host delegate
//! events.

use pushpipe_bridge::HostEvent;
use pushpipe_bridge::authority::NotificationAuthority;
use tokio::sync::mpsc::Receiver;

use crate::app::AppContext;
use crate::registration;

/// Runs the application side of the bridge until the host closes it.
///
/// Registration happens first, on the same serial task that goes on to
/// dispatch delegate events; the host requires notification registration to
/// run on the main execution context.
pub async fn run<A: NotificationAuthority>(authority: A, rx: Receiver<HostEvent>) {
    let context = AppContext { authority };
    registration::register_for_push(&context.authority).await;
    context.consume_host_events(rx).await;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use pushpipe_bridge::HostChannels;
    use pushpipe_bridge::authority::RegistrationError;
    use pushpipe_bridge::category::{
        AuthorizationOptions, NotificationCategory, PresentationOptions,
    };
    use tokio::sync::oneshot;

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingAuthority {
        registrations: Arc<Mutex<u32>>,
    }

    impl NotificationAuthority for RecordingAuthority {
        async fn request_authorization(&self, _options: AuthorizationOptions) -> bool {
            true
        }

        async fn register_for_remote(&self) -> Result<Vec<u8>, RegistrationError> {
            *self.registrations.lock().unwrap() += 1;
            Ok(vec![0x01, 0x02])
        }

        fn set_categories(&self, _categories: Vec<NotificationCategory>) {}
    }

    #[tokio::test]
    async fn run_registers_then_answers_queued_events() {
        let HostChannels { host_tx, app_rx } = HostChannels::new(4);
        let authority = RecordingAuthority::default();

        let (present_tx, present_rx) = oneshot::channel();
        host_tx
            .send(HostEvent::WillPresent {
                respond: present_tx,
            })
            .await
            .unwrap();

        let (action_tx, action_rx) = oneshot::channel();
        host_tx
            .send(HostEvent::Action {
                identifier: "Like".to_owned(),
                completion: action_tx,
            })
            .await
            .unwrap();

        // Closing the host side lets the dispatch loop drain and exit.
        drop(host_tx);

        run(authority.clone(), app_rx).await;

        assert_eq!(*authority.registrations.lock().unwrap(), 1);
        assert_eq!(present_rx.await.unwrap(), PresentationOptions::all());
        action_rx.await.expect("action completion must fire");
    }
}
