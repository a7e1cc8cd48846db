//! Video-platform source adapter.
//!
//! Queries the YouTube Data API v3 for one topic at a time: recent videos via
//! `search.list`, their view counts via `videos.list`, and top-level comments
//! via `commentThreads.list`. Yields raw [`vocwatch_core::Candidate`]s; the
//! view-count threshold and brand-relevance decisions belong to the
//! normalizer.

mod client;
mod error;
mod types;

pub use client::YoutubeClient;
pub use error::YoutubeError;
