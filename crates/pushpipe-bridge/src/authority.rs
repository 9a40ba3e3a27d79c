use crate::category::{AuthorizationOptions, NotificationCategory};

/// Failure reported by the push transport during remote registration.
#[derive(Debug, thiserror::Error)]
#[error("remote registration failed: {reason}")]
pub struct RegistrationError {
    /// Transport-provided description of the failure.
    pub reason: String,
}

impl RegistrationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The host operating system's notification authority.
///
/// Everything behind this trait is an external collaborator: the permission
/// dialog, the push-token transport, and the process-wide category registry.
/// The demo binary provides a simulated implementation; tests provide mocks.
#[allow(async_fn_in_trait)]
pub trait NotificationAuthority {
    /// Asks the user for the given notification permissions. Returns whether
    /// permission was granted.
    async fn request_authorization(&self, options: AuthorizationOptions) -> bool;

    /// Registers this installation for remote push delivery. On success the
    /// transport issues an opaque device token.
    async fn register_for_remote(&self) -> Result<Vec<u8>, RegistrationError>;

    /// Replaces the process-wide set of notification categories. Overwrites
    /// any previous registration.
    fn set_categories(&self, categories: Vec<NotificationCategory>);
}
