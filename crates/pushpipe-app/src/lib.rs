//! Application-side registration runtime and public API surface.
//!
//! This crate owns the application's launch sequence (permission request and
//! remote-push registration) and the serial dispatch loop that answers
//! delegate events from the host.

mod app;
mod registration;
mod runtime;

pub use crate::runtime::run;
