/// Identifier of the process-wide category carrying the media actions.
pub const MEDIA_CATEGORY_IDENTIFIER: &str = "media";

/// Identifier of the "Like" action button.
pub const LIKE_ACTION_IDENTIFIER: &str = "Like";

/// Identifier of the "Save" action button.
pub const SAVE_ACTION_IDENTIFIER: &str = "Save";

/// A single action button offered on a displayed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    /// Identifier reported back when the user activates the action.
    pub identifier: String,
    /// Button label shown to the user.
    pub title: String,
}

/// A named group of actions registered process-wide with the host.
///
/// Registration overwrites any previous registration, so repeating it is
/// idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCategory {
    /// Identifier matching the category field of incoming notifications.
    pub identifier: String,
    /// Action buttons offered for notifications of this category.
    pub actions: Vec<NotificationAction>,
}

/// The static two-action category ("Like", "Save") this pipeline registers.
pub fn media_category() -> NotificationCategory {
    NotificationCategory {
        identifier: MEDIA_CATEGORY_IDENTIFIER.to_owned(),
        actions: vec![
            NotificationAction {
                identifier: LIKE_ACTION_IDENTIFIER.to_owned(),
                title: "Like".to_owned(),
            },
            NotificationAction {
                identifier: SAVE_ACTION_IDENTIFIER.to_owned(),
                title: "Save".to_owned(),
            },
        ],
    }
}

/// Permission set requested from the host notification authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationOptions {
    pub alert: bool,
    pub sound: bool,
    pub badge: bool,
}

impl AuthorizationOptions {
    /// Requests alert, sound, and badge permission together.
    pub fn all() -> Self {
        Self {
            alert: true,
            sound: true,
            badge: true,
        }
    }
}

/// How a notification arriving in the foreground should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationOptions {
    pub alert: bool,
    pub sound: bool,
    pub badge: bool,
}

impl PresentationOptions {
    /// Shows the notification with alert, sound, and badge.
    pub fn all() -> Self {
        Self {
            alert: true,
            sound: true,
            badge: true,
        }
    }
}
