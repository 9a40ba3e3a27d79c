//! Simulated notification host.
//!
//! Plays the role of the operating system in the demo: grants permission,
//! fabricates a device token, keeps the process-wide category registry, and
//! delivers one push to the mutation service under the configured time
//! budget, firing the deadline escape hatch when the budget runs out.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pushpipe_bridge::HostEvent;
use pushpipe_bridge::authority::{NotificationAuthority, RegistrationError};
use pushpipe_bridge::category::{
    AuthorizationOptions, LIKE_ACTION_IDENTIFIER, NotificationCategory,
};
use pushpipe_bridge::config::Config;
use pushpipe_bridge::content::{ContentHandler, NotificationContent, PushRequest};
use pushpipe_bridge::payload::PushPayload;
use pushpipe_service::NotificationService;
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot;

const SAMPLE_PAYLOAD: &str = r#"{
  "aps": {
    "alert": { "title": "Fresh picture", "body": "A new photo is ready to view." },
    "sound": "default",
    "mutable-content": 1,
    "attachment-url": "https://picsum.photos/300/200"
  }
}"#;

/// The host's side of the notification authority.
#[derive(Clone, Default)]
pub(crate) struct SimulatedAuthority {
    categories: Arc<Mutex<Vec<NotificationCategory>>>,
}

impl NotificationAuthority for SimulatedAuthority {
    async fn request_authorization(&self, options: AuthorizationOptions) -> bool {
        log::info!("host: authorization requested for {options:?}, granting");
        true
    }

    async fn register_for_remote(&self) -> Result<Vec<u8>, RegistrationError> {
        // A fabricated token; a real transport issues this per installation.
        Ok(vec![0x0f, 0x1e, 0x2d, 0x3c, 0x4b, 0x5a, 0x69, 0x78])
    }

    fn set_categories(&self, categories: Vec<NotificationCategory>) {
        log::info!("host: registering {} notification category(-ies)", categories.len());
        *self.categories.lock().expect("category registry poisoned") = categories;
    }
}

async fn load_payload(config: &Config) -> anyhow::Result<PushPayload> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.payload_path.clone());
    let body = match path {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => SAMPLE_PAYLOAD.to_owned(),
    };
    Ok(PushPayload::from_json(&body)?)
}

/// Delivers one push through the full pipeline and exercises the delegate
/// surface, then closes the bridge.
pub(crate) async fn run(
    authority: SimulatedAuthority,
    host_tx: Sender<HostEvent>,
    config: Config,
    cache_path: PathBuf,
) -> anyhow::Result<()> {
    let payload = load_payload(&config).await?;

    // Delivery notice to the application delegate.
    host_tx
        .send(HostEvent::RemoteNotification(payload.clone()))
        .await?;

    // One mutation cycle under the configured time budget.
    let service = NotificationService::new(authority, cache_path);
    let request = PushRequest {
        content: NotificationContent::from_payload(&payload),
        payload,
    };
    let (handler, mut content_rx) = ContentHandler::channel();
    service.did_receive(request.clone(), handler).await;

    let budget = Duration::from_secs(config.time_budget_secs);
    let final_content = match tokio::time::timeout(budget, content_rx.recv()).await {
        Ok(content) => content,
        Err(_) => {
            log::warn!("host: time budget expired before the service delivered");
            service.time_will_expire().await;
            content_rx.recv().await
        }
    };

    match final_content {
        Some(content) => log::info!(
            "host: displaying mutated notification: title={:?} body={:?} attachments={:?}",
            content.title,
            content.body,
            content.attachments
        ),
        None => log::info!(
            "host: service stepped aside, displaying original content: {:?}",
            request.content
        ),
    }

    // Foreground presentation query.
    let (respond_tx, respond_rx) = oneshot::channel();
    host_tx
        .send(HostEvent::WillPresent {
            respond: respond_tx,
        })
        .await?;
    let options = respond_rx.await?;
    log::info!("host: presenting foreground notification with {options:?}");

    // The user taps an action button.
    let (completion_tx, completion_rx) = oneshot::channel();
    host_tx
        .send(HostEvent::Action {
            identifier: LIKE_ACTION_IDENTIFIER.to_owned(),
            completion: completion_tx,
        })
        .await?;
    completion_rx.await?;
    log::info!("host: action handling completed");

    Ok(())
}
