//! Candidate-to-mention normalization.
//!
//! Pure transform: filters out irrelevant candidates, emphasizes tracked
//! brand terms, tags category/origin, and stamps collection metadata. A
//! discarded candidate is silent — no error, no mention.

use tracing::debug;

use crate::clock::{now_stamp, today_stamp};
use crate::mention::{Candidate, CandidateKind, Mention, NEW_MARKER};
use crate::terms::TermConfig;

/// Relative-recency phrases a forum listing must contain to fall inside the
/// monitoring window.
const RECENCY_MARKERS: [&str; 3] = ["방금 전", "분 전", "시간 전"];

/// Character budget for comment bodies before the ellipsis cut.
const COMMENT_MAX_CHARS: usize = 80;

/// Keyword tag for video mentions.
const VIDEO_KEYWORD: &str = "video";
/// Keyword tag for comment mentions.
const COMMENT_KEYWORD: &str = "comment";

/// Source-name prefix for video-platform channels.
const VIDEO_SOURCE_PREFIX: &str = "[YT] ";
/// Source-name prefix for video-platform commenters.
const COMMENT_SOURCE_PREFIX: &str = "[YT 댓글] ";

/// Maps raw [`Candidate`]s into canonical [`Mention`]s.
///
/// Holds the term tables for the run plus the brand vocabulary pre-sorted
/// longest-first, so a term that is a substring of another (e.g. "일렉링크"
/// inside "SK일렉링크") never produces nested emphasis wraps.
#[derive(Debug, Clone)]
pub struct Normalizer {
    terms: TermConfig,
    /// Brand terms ordered by descending character count.
    emphasis_terms: Vec<String>,
}

impl Normalizer {
    #[must_use]
    pub fn new(terms: TermConfig) -> Self {
        let mut emphasis_terms = terms.brand_terms.clone();
        emphasis_terms.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
        Self {
            terms,
            emphasis_terms,
        }
    }

    /// Normalize one candidate collected while searching for `topic`.
    ///
    /// Returns `None` when any filter discards the candidate:
    /// - title contains an exclusion term (all kinds)
    /// - forum post from a non-target community, or without a recency marker
    /// - video below the minimum view count
    /// - comment that matches no tracked brand term
    #[must_use]
    pub fn normalize(&self, candidate: &Candidate, topic: &str) -> Option<Mention> {
        if let Some(term) = self
            .terms
            .exclude_terms
            .iter()
            .find(|t| candidate.title.contains(t.as_str()))
        {
            debug!(link = %candidate.link, term = %term, "discarding candidate — exclusion term in title");
            return None;
        }

        let (keyword, source_name, title) = match candidate.kind {
            CandidateKind::ForumPost => {
                if !self
                    .terms
                    .target_communities
                    .iter()
                    .any(|t| candidate.origin_name.contains(t.as_str()))
                {
                    debug!(origin = %candidate.origin_name, "discarding candidate — community not targeted");
                    return None;
                }
                if !RECENCY_MARKERS
                    .iter()
                    .any(|m| candidate.raw_text.contains(m))
                {
                    debug!(link = %candidate.link, "discarding candidate — no recency marker");
                    return None;
                }
                let (title, _) = self.emphasize(&candidate.title);
                (topic.to_owned(), candidate.origin_name.clone(), title)
            }
            CandidateKind::Video => {
                let views = candidate.view_count.unwrap_or(0);
                if views < self.terms.min_video_views {
                    debug!(link = %candidate.link, views, "discarding video — below view threshold");
                    return None;
                }
                let (emphasized, _) = self.emphasize(&candidate.title);
                let title = format!("{emphasized} (조회수 {views}회)");
                let source_name = format!("{VIDEO_SOURCE_PREFIX}{}", candidate.origin_name);
                (VIDEO_KEYWORD.to_owned(), source_name, title)
            }
            CandidateKind::Comment => {
                if !self.matches_brand(&candidate.raw_text) {
                    debug!(link = %candidate.link, "discarding comment — no tracked brand term");
                    return None;
                }
                // Cut the raw body first; emphasizing afterwards keeps the
                // `*` pairs balanced even when the cut lands mid-term.
                let cut = truncate_chars(&candidate.raw_text, COMMENT_MAX_CHARS);
                let (title, _) = self.emphasize(&cut);
                let source_name = format!("{COMMENT_SOURCE_PREFIX}{}", candidate.origin_name);
                (COMMENT_KEYWORD.to_owned(), source_name, title)
            }
        };

        Some(Mention {
            written_at: format!("{}{NEW_MARKER}", today_stamp()),
            keyword,
            source_name,
            title,
            link: candidate.link.clone(),
            collected_at: now_stamp(),
        })
    }

    /// True if any tracked brand term occurs in `text`.
    fn matches_brand(&self, text: &str) -> bool {
        self.emphasis_terms.iter().any(|t| text.contains(t.as_str()))
    }

    /// Wrap every tracked brand term found in `text` with `*…*`.
    ///
    /// Terms are applied longest-first through a sentinel pass, so an
    /// occurrence consumed by a longer term is invisible to shorter ones.
    /// Returns the rewritten text and whether any term matched.
    fn emphasize(&self, text: &str) -> (String, bool) {
        let mut out = text.to_owned();
        let mut matched: Vec<usize> = Vec::new();
        for (i, term) in self.emphasis_terms.iter().enumerate() {
            if out.contains(term.as_str()) {
                out = out.replace(term.as_str(), &sentinel(i));
                matched.push(i);
            }
        }
        for i in &matched {
            out = out.replace(&sentinel(*i), &format!("*{}*", self.emphasis_terms[*i]));
        }
        (out, !matched.is_empty())
    }
}

/// Placeholder token for term `i` during the two-pass emphasis rewrite.
/// Control characters never occur in collected text.
fn sentinel(i: usize) -> String {
    format!("\u{1}{i}\u{2}")
}

/// Truncate to at most `max_chars` characters, appending `…` when cut.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::parse_terms;

    fn test_terms() -> TermConfig {
        parse_terms(
            r#"
brand_terms: ["SK일렉링크", "일렉링크"]
competitor_terms: ["채비"]
exclude_terms: ["팝니다", "쿠폰"]
target_communities: ["테슬라", "전기차"]
search_topics: ["일렉링크"]
min_video_views: 1000
"#,
        )
        .unwrap()
    }

    fn forum_candidate(origin: &str, title: &str, raw_text: &str) -> Candidate {
        Candidate {
            kind: CandidateKind::ForumPost,
            origin_name: origin.to_owned(),
            title: title.to_owned(),
            link: "https://cafe.example.com/articles/42".to_owned(),
            raw_text: raw_text.to_owned(),
            view_count: None,
        }
    }

    fn video_candidate(title: &str, views: u64) -> Candidate {
        Candidate {
            kind: CandidateKind::Video,
            origin_name: "전기차TV".to_owned(),
            title: title.to_owned(),
            link: "https://www.youtube.com/watch?v=abc123".to_owned(),
            raw_text: title.to_owned(),
            view_count: Some(views),
        }
    }

    fn comment_candidate(body: &str) -> Candidate {
        Candidate {
            kind: CandidateKind::Comment,
            origin_name: "ev_owner".to_owned(),
            title: body.to_owned(),
            link: "https://www.youtube.com/watch?v=abc123&lc=xyz".to_owned(),
            raw_text: body.to_owned(),
            view_count: None,
        }
    }

    #[test]
    fn forum_post_passes_all_filters() {
        let n = Normalizer::new(test_terms());
        let c = forum_candidate("테슬라 오너스", "일렉링크 충전 후기", "일렉링크 충전 후기 3분 전");
        let m = n.normalize(&c, "일렉링크").unwrap();
        assert_eq!(m.keyword, "일렉링크");
        assert_eq!(m.source_name, "테슬라 오너스");
        assert_eq!(m.title, "*일렉링크* 충전 후기");
        assert!(m.written_at.ends_with(" (New)"));
        assert_eq!(m.link, c.link);
    }

    #[test]
    fn exclusion_term_discards_regardless_of_other_matches() {
        let n = Normalizer::new(test_terms());
        let c = forum_candidate("테슬라 오너스", "테슬라 일렉링크 팝니다", "방금 전");
        assert!(n.normalize(&c, "일렉링크").is_none());
    }

    #[test]
    fn untargeted_community_discarded() {
        let n = Normalizer::new(test_terms());
        let c = forum_candidate("주식 갤러리", "일렉링크 후기", "5분 전");
        assert!(n.normalize(&c, "일렉링크").is_none());
    }

    #[test]
    fn stale_forum_post_discarded() {
        let n = Normalizer::new(test_terms());
        let c = forum_candidate("전기차 동호회", "일렉링크 후기", "2023.11.02.");
        assert!(n.normalize(&c, "일렉링크").is_none());
    }

    #[test]
    fn video_below_view_threshold_discarded() {
        let n = Normalizer::new(test_terms());
        assert!(n.normalize(&video_candidate("일렉링크 리뷰", 999), "일렉링크").is_none());
    }

    #[test]
    fn video_tagged_with_views_and_prefix() {
        let n = Normalizer::new(test_terms());
        let m = n
            .normalize(&video_candidate("일렉링크 리뷰", 12_345), "일렉링크")
            .unwrap();
        assert_eq!(m.keyword, "video");
        assert_eq!(m.source_name, "[YT] 전기차TV");
        assert_eq!(m.title, "*일렉링크* 리뷰 (조회수 12345회)");
    }

    #[test]
    fn comment_without_brand_term_discarded() {
        let n = Normalizer::new(test_terms());
        assert!(n
            .normalize(&comment_candidate("충전소가 너무 부족해요"), "일렉링크")
            .is_none());
    }

    #[test]
    fn comment_with_brand_term_kept_and_tagged() {
        let n = Normalizer::new(test_terms());
        let m = n
            .normalize(&comment_candidate("일렉링크 충전기 자주 씁니다"), "일렉링크")
            .unwrap();
        assert_eq!(m.keyword, "comment");
        assert_eq!(m.source_name, "[YT 댓글] ev_owner");
        assert_eq!(m.title, "*일렉링크* 충전기 자주 씁니다");
    }

    #[test]
    fn long_comment_truncated_with_ellipsis() {
        let n = Normalizer::new(test_terms());
        let body = format!("일렉링크 {}", "아".repeat(120));
        let m = n.normalize(&comment_candidate(&body), "일렉링크").unwrap();
        assert!(m.title.starts_with("*일렉링크*"));
        assert!(m.title.ends_with('…'));
        // 80 kept chars, the ellipsis, and one pair of wrap characters.
        assert_eq!(m.title.chars().count(), 83);
    }

    #[test]
    fn truncation_never_splits_emphasis_markup() {
        let n = Normalizer::new(test_terms());
        // The cut lands inside the brand term; relevance is still decided on
        // the full body, and the surviving text carries no dangling `*`.
        let body = format!("{}일렉링크 충전 후기", "아".repeat(79));
        let m = n.normalize(&comment_candidate(&body), "일렉링크").unwrap();
        assert_eq!(m.keyword, "comment");
        assert!(m.title.ends_with('…'));
        assert_eq!(m.title.matches('*').count() % 2, 0);
    }

    #[test]
    fn longer_brand_term_wins_over_its_substring() {
        let n = Normalizer::new(test_terms());
        let (out, matched) = n.emphasize("SK일렉링크 새 요금제");
        assert!(matched);
        assert_eq!(out, "*SK일렉링크* 새 요금제");
    }

    #[test]
    fn both_terms_emphasized_independently() {
        let n = Normalizer::new(test_terms());
        let (out, _) = n.emphasize("SK일렉링크 말고 일렉링크라고 부른다");
        assert_eq!(out, "*SK일렉링크* 말고 *일렉링크*라고 부른다");
    }

    #[test]
    fn emphasize_reports_no_match() {
        let n = Normalizer::new(test_terms());
        let (out, matched) = n.emphasize("그냥 충전 이야기");
        assert!(!matched);
        assert_eq!(out, "그냥 충전 이야기");
    }

    #[test]
    fn collected_at_minute_stamp() {
        let n = Normalizer::new(test_terms());
        let m = n
            .normalize(
                &forum_candidate("전기차 카페", "일렉링크 요금", "10분 전"),
                "일렉링크",
            )
            .unwrap();
        assert_eq!(m.collected_at.len(), 16);
    }
}
