//! Forum source adapter.
//!
//! Fetches date-sorted community search-result pages for one topic at a time
//! and extracts raw candidate records. All relevance decisions (community
//! filter, recency filter, exclusion terms) belong to the normalizer — this
//! crate only turns HTML into [`vocwatch_core::Candidate`]s.

mod client;
mod error;
mod extract;
mod retry;

pub use client::ForumClient;
pub use error::ScraperError;
pub use extract::extract_candidates;
