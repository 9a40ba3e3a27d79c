//! The per-push mutation pipeline and its deadline escape hatch.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use pushpipe_bridge::authority::NotificationAuthority;
use pushpipe_bridge::category::media_category;
use pushpipe_bridge::content::{ContentHandler, NotificationContent, PushRequest};
use tokio::sync::Mutex;

use crate::default_image;
use crate::download;

/// Identifier carried by every attachment this service produces.
pub const ATTACHMENT_IDENTIFIER: &str = "picture";

/// Mutates incoming push content by downloading and attaching the image
/// named in the payload.
///
/// The host keeps one service per process and calls [`did_receive`] once per
/// push; pushes are handled serially in practice. Terminal outcomes per
/// cycle: enriched content, default-image fallback, unmodified fallback, or
/// a silent abort on malformed payloads (the host then displays the
/// original payload itself).
///
/// [`did_receive`]: NotificationService::did_receive
pub struct NotificationService<A> {
    authority: A,
    client: reqwest::Client,
    cache_path: PathBuf,
    categories_registered: AtomicBool,
    handler: Mutex<Option<ContentHandler>>,
    best_attempt: Mutex<Option<NotificationContent>>,
}

impl<A: NotificationAuthority> NotificationService<A> {
    /// Creates a service writing its cached default image under `cache_path`.
    pub fn new(authority: A, cache_path: PathBuf) -> Self {
        Self {
            authority,
            client: reqwest::Client::new(),
            cache_path,
            categories_registered: AtomicBool::new(false),
            handler: Mutex::new(None),
            best_attempt: Mutex::new(None),
        }
    }

    /// Handles one incoming push.
    ///
    /// A payload without a usable attachment URL aborts silently: the
    /// handler is never invoked and the host's own default delivery takes
    /// over. On every other path the handler fires exactly once, with the
    /// best content available.
    pub async fn did_receive(&self, request: PushRequest, handler: ContentHandler) {
        let content = request.mutable_content();

        let url_text = match request.payload.attachment_url() {
            Ok(url_text) => url_text,
            Err(error) => {
                log::warn!("skipping enrichment: {error}");
                return;
            }
        };
        let url = match reqwest::Url::parse(url_text) {
            Ok(url) => url,
            Err(error) => {
                log::warn!("skipping enrichment, bad attachment URL {url_text:?}: {error}");
                return;
            }
        };

        // Action buttons must exist regardless of which outcome the async
        // phase produces.
        self.register_categories();

        *self.best_attempt.lock().await = Some(content.clone());
        *self.handler.lock().await = Some(handler.clone());

        let client = self.client.clone();
        let cache_path = self.cache_path.clone();
        tokio::spawn(async move {
            enrich_and_deliver(client, cache_path, url, content, handler).await;
        });
    }

    /// Deadline escape hatch: the host signals that the time budget is about
    /// to expire.
    ///
    /// Delivers whatever best-attempt content is currently held. The
    /// in-flight download is not cancelled; its late result loses the
    /// single-fire race inside [`ContentHandler`] and is discarded.
    pub async fn time_will_expire(&self) {
        let handler = self.handler.lock().await.clone();
        let best_attempt = self.best_attempt.lock().await.clone();
        if let (Some(handler), Some(content)) = (handler, best_attempt) {
            log::info!("time budget expiring, delivering best attempt");
            handler.deliver(content);
        }
    }

    /// Registers the Like/Save category with the host, once per service
    /// lifetime. Registration overwrites, so repeating it stays idempotent.
    fn register_categories(&self) {
        if self.categories_registered.swap(true, Ordering::SeqCst) {
            return;
        }
        self.authority.set_categories(vec![media_category()]);
    }
}

/// The async phase: download, fall back if needed, deliver exactly once.
async fn enrich_and_deliver(
    client: reqwest::Client,
    cache_path: PathBuf,
    url: reqwest::Url,
    mut content: NotificationContent,
    handler: ContentHandler,
) {
    match download::fetch_attachment(&client, url, &std::env::temp_dir()).await {
        Ok(path) => match download::build_attachment(ATTACHMENT_IDENTIFIER, &path) {
            Ok(attachment) => {
                log::info!("Image downloaded from url successfully");
                content.attachments = vec![attachment];
                handler.deliver(content);
            }
            Err(error) => {
                // Downloaded fine, attachment construction failed: deliver
                // the content unmodified rather than fail the cycle.
                log::warn!("failed to build attachment for downloaded file: {error}");
                handler.deliver(content);
            }
        },
        Err(error) => {
            log::warn!("Image download failed, using default image: {error}");
            match default_image::ensure_default_image(&cache_path).await {
                Ok(path) => match download::build_attachment(ATTACHMENT_IDENTIFIER, &path) {
                    Ok(attachment) => {
                        content.attachments = vec![attachment];
                        handler.deliver(content);
                    }
                    Err(error) => {
                        log::warn!("failed to build default-image attachment: {error}");
                        handler.deliver(content);
                    }
                },
                Err(error) => {
                    log::warn!("failed to materialize default image: {error}");
                    handler.deliver(content);
                }
            }
        }
    }
}
