mod csv;
mod merge;
mod store;

pub use merge::{merge, MergeResult};
pub use store::{DatasetStore, LoadOutcome, DATASET_COLUMNS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write dataset file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
