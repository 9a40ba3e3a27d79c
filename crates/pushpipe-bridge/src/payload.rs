use serde::Deserialize;

/// Errors produced while decoding or validating an incoming push payload.
///
/// A payload that fails validation is not an application error: the mutation
/// pipeline logs it and steps aside so the host's own default delivery of
/// the unmodified notification takes over.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The payload body is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The platform-reserved `aps` dictionary is missing entirely.
    #[error("payload carries no aps dictionary")]
    MissingAps,
    /// The `aps` dictionary carries no `attachment-url` entry.
    #[error("payload carries no attachment-url")]
    MissingAttachmentUrl,
}

/// The alert portion of the `aps` dictionary.
///
/// Push transports allow this to be either a bare string (the body) or a
/// structured dictionary with separate title and body.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Alert {
    /// Bare-string form; the text is the notification body.
    Text(String),
    /// Structured form with optional title and body.
    Detailed {
        title: Option<String>,
        body: Option<String>,
    },
}

impl Alert {
    /// Title text, if the alert carries one.
    pub fn title(&self) -> Option<&str> {
        match self {
            Alert::Text(_) => None,
            Alert::Detailed { title, .. } => title.as_deref(),
        }
    }

    /// Body text, if the alert carries one.
    pub fn body(&self) -> Option<&str> {
        match self {
            Alert::Text(text) => Some(text),
            Alert::Detailed { body, .. } => body.as_deref(),
        }
    }
}

/// The platform-reserved portion of a push payload.
///
/// Unknown keys are tolerated so that payloads from newer transports still
/// decode; only the fields this pipeline reads are modeled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Aps {
    /// Display text for the notification.
    pub alert: Option<Alert>,
    /// Sound to play on delivery.
    pub sound: Option<String>,
    /// Badge count to show on the application icon.
    pub badge: Option<u32>,
    /// Set to 1 by the sender to request content mutation.
    #[serde(rename = "mutable-content")]
    pub mutable_content: Option<u8>,
    /// Absolute URL of an image to download and attach.
    #[serde(rename = "attachment-url")]
    pub attachment_url: Option<String>,
}

/// An untrusted push payload as delivered by the transport.
///
/// The payload is immutable once received; all fields are optional and
/// access to the enrichment-relevant ones goes through explicit validation.
#[derive(Debug, Clone, Deserialize)]
pub struct PushPayload {
    /// Platform-reserved dictionary.
    pub aps: Option<Aps>,
    /// Custom sender-defined fields, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PushPayload {
    /// Decodes a payload from its JSON wire form.
    pub fn from_json(body: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Validates that the payload requests an image attachment and returns
    /// the attachment URL string.
    pub fn attachment_url(&self) -> Result<&str, PayloadError> {
        let aps = self.aps.as_ref().ok_or(PayloadError::MissingAps)?;
        aps.attachment_url
            .as_deref()
            .ok_or(PayloadError::MissingAttachmentUrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_payload_exposes_attachment_url() {
        let payload = PushPayload::from_json(
            r#"{
                "aps": {
                    "alert": { "title": "Hi", "body": "There" },
                    "sound": "default",
                    "mutable-content": 1,
                    "attachment-url": "https://example.com/picture.png"
                },
                "campaign": "spring"
            }"#,
        )
        .unwrap();

        assert_eq!(
            payload.attachment_url().unwrap(),
            "https://example.com/picture.png"
        );
        assert!(payload.extra.contains_key("campaign"));
    }

    #[test]
    fn empty_aps_is_missing_attachment_url() {
        let payload = PushPayload::from_json(r#"{"aps":{}}"#).unwrap();
        assert!(matches!(
            payload.attachment_url(),
            Err(PayloadError::MissingAttachmentUrl)
        ));
    }

    #[test]
    fn absent_aps_is_missing_aps() {
        let payload = PushPayload::from_json(r#"{"other":"stuff"}"#).unwrap();
        assert!(matches!(
            payload.attachment_url(),
            Err(PayloadError::MissingAps)
        ));
    }

    #[test]
    fn garbage_body_is_a_json_error() {
        assert!(matches!(
            PushPayload::from_json("not json"),
            Err(PayloadError::Json(_))
        ));
    }

    #[test]
    fn alert_decodes_both_wire_forms() {
        let bare = PushPayload::from_json(r#"{"aps":{"alert":"ping"}}"#).unwrap();
        let alert = bare.aps.unwrap().alert.unwrap();
        assert_eq!(alert.title(), None);
        assert_eq!(alert.body(), Some("ping"));

        let detailed =
            PushPayload::from_json(r#"{"aps":{"alert":{"title":"T","body":"B"}}}"#).unwrap();
        let alert = detailed.aps.unwrap().alert.unwrap();
        assert_eq!(alert.title(), Some("T"));
        assert_eq!(alert.body(), Some("B"));
    }
}
