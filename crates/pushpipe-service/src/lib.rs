//! Content-mutation service for incoming push notifications.
//!
//! The host hands this crate one push at a time together with a single-shot
//! content handler and a time budget. The service downloads the image named
//! by the payload's `attachment-url`, attaches it to a mutable copy of the
//! display content, and delivers the best attempt it has before the budget
//! runs out, falling back to a bundled default image when the download
//! fails.

pub mod config;
mod default_image;
mod download;
mod service;

pub use crate::service::{ATTACHMENT_IDENTIFIER, NotificationService};
