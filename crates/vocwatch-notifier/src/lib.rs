//! Daily digest delivery.
//!
//! A read-only consumer of the mention dataset: selects the rows the last
//! merge marked `(New)`, formats a Slack markdown summary, and posts it to
//! every configured incoming webhook. Delivery is best-effort per webhook —
//! one failing destination never blocks the others.

mod digest;
mod slack;

pub use digest::{build_digest, Digest};
pub use slack::{send_digest, DeliveryReport};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
