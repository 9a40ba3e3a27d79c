use pushpipe_bridge::authority::NotificationAuthority;
use pushpipe_bridge::category::{
    AuthorizationOptions, LIKE_ACTION_IDENTIFIER, PresentationOptions, SAVE_ACTION_IDENTIFIER,
};
use pushpipe_bridge::payload::PushPayload;
use tokio::sync::oneshot;

/// Requests notification permission and, on grant, registers for remote push
/// delivery.
///
/// The resulting device token is only logged; forwarding it to an
/// application server is the job of an external collaborator. A denied
/// permission is terminal, not an error.
pub(crate) async fn register_for_push<A: NotificationAuthority>(authority: &A) {
    let granted = authority
        .request_authorization(AuthorizationOptions::all())
        .await;
    log::info!("Is permission granted to user: {granted}");
    if !granted {
        return;
    }

    match authority.register_for_remote().await {
        Ok(token) => log::info!("Device token: {}", hex::encode(token)),
        Err(error) => log::error!("Failed to register for remote notifications: {error}"),
    }
}

/// Records the receipt of a delivered remote notification. No processing.
pub(crate) fn handle_remote_notification(payload: PushPayload) {
    log::info!("Received remote notification: {payload:?}");
}

/// Dispatches a user action on a displayed notification.
///
/// The completion signal fires unconditionally after dispatch; withholding
/// it would leave the host's UI thread blocked.
pub(crate) fn handle_action(identifier: &str, completion: oneshot::Sender<()>) {
    match identifier {
        LIKE_ACTION_IDENTIFIER => log::info!("Handle like action identifier"),
        SAVE_ACTION_IDENTIFIER => log::info!("Handle save action identifier"),
        other => log::info!("No custom identifier found: {other:?}"),
    }

    if completion.send(()).is_err() {
        log::warn!("host dropped the action completion receiver");
    }
}

/// Answers a foreground-presentation query. Foreground suppression is
/// explicitly disabled: the notification is always shown in full.
pub(crate) fn handle_will_present(respond: oneshot::Sender<PresentationOptions>) {
    if respond.send(PresentationOptions::all()).is_err() {
        log::warn!("host dropped the presentation-options receiver");
    }
}
