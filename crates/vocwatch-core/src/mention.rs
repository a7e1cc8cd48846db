use serde::{Deserialize, Serialize};

/// Run-scoped annotation appended to `written_at` for mentions discovered in
/// the current collection run. Stripped from all surviving rows on the next
/// merge, so at most one generation of mentions carries it at a time.
pub const NEW_MARKER: &str = " (New)";

/// Which kind of upstream item a candidate was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// A post from a community-forum search-result page.
    ForumPost,
    /// A video returned by the video-platform search API.
    Video,
    /// A top-level comment on a video.
    Comment,
}

/// Raw record produced by a source adapter, before filtering and tagging.
///
/// Candidates are transient: they are consumed immediately by
/// [`crate::Normalizer::normalize`] and never persisted. Duplicate links
/// across adapter calls are expected here and resolved at merge time.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub kind: CandidateKind,
    /// Forum/community name, video channel name, or comment author.
    pub origin_name: String,
    pub title: String,
    /// Absolute URL of the item. Becomes the mention's natural key.
    pub link: String,
    /// Full tag-stripped listing text (forum) or comment body. Used for the
    /// recency filter and for brand-term matching in comments.
    pub raw_text: String,
    /// View-count statistic, present for video candidates only.
    pub view_count: Option<u64>,
}

/// One canonical record of a brand/competitor reference. The persisted unit.
///
/// `link` is the natural key: the dataset never holds two mentions with the
/// same link. `written_at` is the only field mutated after creation (the
/// `" (New)"` suffix is stripped on the next merge cycle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    /// `YYYY-MM-DD`, optionally suffixed with [`NEW_MARKER`].
    pub written_at: String,
    /// The tracked term the search topic matched, or the literal
    /// `"video"` / `"comment"` for video-platform items.
    pub keyword: String,
    /// Originating forum, channel, or commenter display name. Video-platform
    /// names carry a platform prefix so the dashboard can tell them apart.
    pub source_name: String,
    pub title: String,
    /// Absolute URL. Natural key across the whole dataset.
    pub link: String,
    /// `YYYY-MM-DD HH:MM` in the reporting timezone. Informational only.
    pub collected_at: String,
}

impl Mention {
    /// True if this mention was discovered in the most recent persisted run.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.written_at.ends_with(NEW_MARKER)
    }

    /// Removes the new-marker suffix if present. Idempotent.
    pub fn strip_new_marker(&mut self) {
        if let Some(stripped) = self.written_at.strip_suffix(NEW_MARKER) {
            self.written_at = stripped.to_owned();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(written_at: &str) -> Mention {
        Mention {
            written_at: written_at.to_owned(),
            keyword: "일렉링크".to_owned(),
            source_name: "테슬라 오너스 클럽".to_owned(),
            title: "충전기 후기".to_owned(),
            link: "https://cafe.example.com/articles/1".to_owned(),
            collected_at: "2024-06-01 09:30".to_owned(),
        }
    }

    #[test]
    fn is_new_detects_marker() {
        assert!(mention("2024-06-01 (New)").is_new());
        assert!(!mention("2024-06-01").is_new());
    }

    #[test]
    fn strip_new_marker_removes_suffix() {
        let mut m = mention("2024-06-01 (New)");
        m.strip_new_marker();
        assert_eq!(m.written_at, "2024-06-01");
    }

    #[test]
    fn strip_new_marker_is_idempotent() {
        let mut m = mention("2024-06-01");
        m.strip_new_marker();
        assert_eq!(m.written_at, "2024-06-01");
    }
}
