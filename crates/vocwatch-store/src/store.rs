//! Durable holder of the canonical mention dataset.
//!
//! One flat CSV file, UTF-8 with a byte-order marker for legacy-spreadsheet
//! compatibility, header row first, one mention per row. Loading never fails
//! the run: anything that cannot be merged safely (missing `keyword` column,
//! bad encoding, truncated file) classifies as [`LoadOutcome::Incompatible`]
//! and the merger falls back to full replacement.

use std::path::{Path, PathBuf};

use tracing::warn;
use vocwatch_core::Mention;

use crate::csv::{parse_rows, write_row};
use crate::StoreError;

/// Fixed column order of the persisted dataset.
pub const DATASET_COLUMNS: [&str; 6] = [
    "written_at",
    "keyword",
    "source_name",
    "title",
    "link",
    "collected_at",
];

const BOM: char = '\u{feff}';

/// Result of attempting to load the persisted dataset.
#[derive(Debug)]
pub enum LoadOutcome {
    /// No backing file exists yet.
    Missing,
    /// A file exists but cannot be merged against: older schema without the
    /// `keyword` column, unreadable bytes, or no header row.
    Incompatible { reason: String },
    /// Parsed mentions in their persisted (insertion) order.
    Loaded(Vec<Mention>),
}

pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current dataset state.
    ///
    /// Infallible by design: every failure mode maps to a [`LoadOutcome`]
    /// variant so a damaged file can never abort a run that is holding
    /// freshly collected mentions.
    #[must_use]
    pub fn load(&self) -> LoadOutcome {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LoadOutcome::Missing,
            Err(e) => {
                return LoadOutcome::Incompatible {
                    reason: format!("unreadable file: {e}"),
                }
            }
        };

        let Ok(text) = String::from_utf8(bytes) else {
            return LoadOutcome::Incompatible {
                reason: "file is not valid UTF-8".to_owned(),
            };
        };

        let text = text.strip_prefix(BOM).unwrap_or(&text);
        let mut rows = parse_rows(text);
        if rows.is_empty() {
            return LoadOutcome::Incompatible {
                reason: "file has no header row".to_owned(),
            };
        }

        let header = rows.remove(0);
        // Sole compatibility signal: a header without `keyword` is the legacy
        // 4/5-column layout and cannot be merged column-by-column.
        if !header.iter().any(|h| h == "keyword") {
            return LoadOutcome::Incompatible {
                reason: "header lacks the keyword column (legacy schema)".to_owned(),
            };
        }

        let index_of = |name: &str| header.iter().position(|h| h == name);
        let col = |row: &[String], idx: Option<usize>| -> String {
            idx.and_then(|i| row.get(i)).cloned().unwrap_or_default()
        };

        let written_at_idx = index_of("written_at");
        let keyword_idx = index_of("keyword");
        let source_name_idx = index_of("source_name");
        let title_idx = index_of("title");
        let link_idx = index_of("link");
        let collected_at_idx = index_of("collected_at");

        let mut mentions = Vec::with_capacity(rows.len());
        for (line, row) in rows.iter().enumerate() {
            let link = col(row, link_idx);
            if link.is_empty() {
                warn!(line = line + 2, "skipping dataset row without a link");
                continue;
            }
            mentions.push(Mention {
                written_at: col(row, written_at_idx),
                keyword: col(row, keyword_idx),
                source_name: col(row, source_name_idx),
                title: col(row, title_idx),
                link,
                collected_at: col(row, collected_at_idx),
            });
        }

        LoadOutcome::Loaded(mentions)
    }

    /// Persist the full dataset, replacing any previous contents.
    ///
    /// Writes to a sibling `.tmp` file and renames it over the target, so an
    /// interrupted save leaves the previous dataset untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the backing medium is unwritable.
    /// This is the only fatal condition of a collection run.
    pub fn save(&self, dataset: &[Mention]) -> Result<(), StoreError> {
        let mut out = String::new();
        out.push(BOM);
        write_row(&mut out, &DATASET_COLUMNS);
        for m in dataset {
            write_row(
                &mut out,
                &[
                    &m.written_at,
                    &m.keyword,
                    &m.source_name,
                    &m.title,
                    &m.link,
                    &m.collected_at,
                ],
            );
        }

        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let tmp_path = {
            let mut os = self.path.as_os_str().to_owned();
            os.push(".tmp");
            PathBuf::from(os)
        };

        std::fs::write(&tmp_path, out.as_bytes()).map_err(write_err)?;
        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(write_err(e));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
