//! The deduplicating merger.
//!
//! Given the loaded store state and a batch of freshly normalized mentions,
//! produces the next dataset state: survivors first in their original order
//! with the `(New)` marker stripped, then genuinely new mentions in discovery
//! order. `link` is the sole identity field.

use std::collections::HashSet;

use tracing::warn;
use vocwatch_core::Mention;

use crate::store::LoadOutcome;

/// Outcome of one merge cycle.
#[derive(Debug)]
pub struct MergeResult {
    /// The next persisted dataset state, ready for `save`.
    pub dataset: Vec<Mention>,
    /// Number of genuinely new mentions appended.
    pub added: usize,
    /// True when incompatible/corrupt prior data was dropped in favor of the
    /// incoming batch. Lossy; the event is also logged here.
    pub replaced_incompatible: bool,
}

/// Merge a batch of freshly collected mentions against the loaded store state.
///
/// The incoming batch is deduplicated by link within itself (first occurrence
/// wins) before any other handling, so one run can never introduce duplicate
/// links regardless of adapter behavior.
///
/// - [`LoadOutcome::Missing`]: the batch becomes the dataset as-is.
/// - [`LoadOutcome::Incompatible`]: same, with the loss logged — prior rows
///   cannot be column-mapped safely, so they are dropped rather than merged
///   misaligned.
/// - [`LoadOutcome::Loaded`]: survivors keep their order and lose any
///   `(New)` marker; incoming mentions whose link is already present are
///   dropped; the rest are appended in discovery order.
#[must_use]
pub fn merge(existing: LoadOutcome, incoming: Vec<Mention>) -> MergeResult {
    let incoming = dedup_by_link(incoming);

    match existing {
        LoadOutcome::Missing => {
            let added = incoming.len();
            MergeResult {
                dataset: incoming,
                added,
                replaced_incompatible: false,
            }
        }
        LoadOutcome::Incompatible { reason } => {
            warn!(%reason, "existing dataset cannot be merged; replacing it with the current batch (prior rows lost)");
            let added = incoming.len();
            MergeResult {
                dataset: incoming,
                added,
                replaced_incompatible: true,
            }
        }
        LoadOutcome::Loaded(mut survivors) => {
            for m in &mut survivors {
                m.strip_new_marker();
            }

            let known: HashSet<&str> = survivors.iter().map(|m| m.link.as_str()).collect();
            let fresh: Vec<Mention> = incoming
                .into_iter()
                .filter(|m| !known.contains(m.link.as_str()))
                .collect();

            let added = fresh.len();
            let mut dataset = survivors;
            dataset.extend(fresh);
            MergeResult {
                dataset,
                added,
                replaced_incompatible: false,
            }
        }
    }
}

/// Drop batch-internal duplicate links, keeping the first occurrence.
fn dedup_by_link(incoming: Vec<Mention>) -> Vec<Mention> {
    let mut seen: HashSet<String> = HashSet::with_capacity(incoming.len());
    incoming
        .into_iter()
        .filter(|m| seen.insert(m.link.clone()))
        .collect()
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
