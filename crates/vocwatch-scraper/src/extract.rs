//! Candidate extraction from search-result HTML.
//!
//! The search page lists one result per `li.bx` block: a title anchor
//! (`a.title_link`), the community name (`a.txt_name` or `a.name`, the markup
//! has shipped both), and assorted metadata text including the relative
//! posting time. Blocks missing a title anchor are skipped; one malformed
//! block never aborts the page.

use regex::Regex;
use tracing::debug;
use vocwatch_core::{Candidate, CandidateKind};

/// Extract forum candidates from one search-result page.
#[must_use]
pub fn extract_candidates(html: &str) -> Vec<Candidate> {
    let item_re =
        Regex::new(r#"(?s)<li[^>]*class="[^"]*\bbx\b[^"]*"[^>]*>.*?</li>"#).expect("valid item regex");

    let mut candidates = Vec::new();
    for item in item_re.find_iter(html) {
        let item = item.as_str();
        let Some((link, title)) = anchor_with_class(item, "title_link") else {
            debug!("skipping result block without a title anchor");
            continue;
        };
        let origin_name = anchor_with_class(item, "txt_name")
            .or_else(|| anchor_with_class(item, "name"))
            .map(|(_, text)| text)
            .unwrap_or_default();

        candidates.push(Candidate {
            kind: CandidateKind::ForumPost,
            origin_name,
            title,
            link,
            raw_text: strip_tags(item),
            view_count: None,
        });
    }
    candidates
}

/// Find the first anchor whose `class` contains `class_name`; returns its
/// unescaped `href` and tag-stripped inner text. Attribute order inside the
/// opening tag does not matter.
fn anchor_with_class(html: &str, class_name: &str) -> Option<(String, String)> {
    let anchor_re = Regex::new(&format!(
        r#"(?s)<a\s[^>]*class="[^"]*\b{class_name}\b[^"]*"[^>]*>(.*?)</a>"#
    ))
    .expect("valid anchor regex");
    let href_re = Regex::new(r#"href\s*=\s*"([^"]*)""#).expect("valid href regex");

    let m = anchor_re.captures(html)?;
    let opening_tag = &m[0][..m[0].find('>').unwrap_or(0)];
    let href = href_re.captures(opening_tag)?;
    Some((decode_entities(&href[1]), strip_tags(&m[1])))
}

/// Replace tags with spaces, decode common entities, and collapse whitespace.
fn strip_tags(html: &str) -> String {
    let tag_re = Regex::new(r"(?s)<[^>]+>").expect("valid tag regex");
    let text = tag_re.replace_all(html, " ");
    let decoded = decode_entities(&text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the handful of entities the search markup actually uses.
fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<ul class="lst_total">
  <li class="bx first">
    <div class="user_info"><a class="txt_name" href="https://cafe.example.com/evclub">전기차 동호회</a></div>
    <div class="title_area">
      <a class="title_link" href="https://cafe.example.com/evclub/articles/101?where=search&amp;page=1">일렉링크 충전 &quot;후기&quot;</a>
    </div>
    <span class="sub">3분 전</span>
  </li>
  <li class="bx">
    <div class="user_info"><a class="name" href="https://cafe.example.com/tesla">테슬라 오너스</a></div>
    <div class="title_area">
      <a href="https://cafe.example.com/tesla/articles/102" class="title_link">급속 충전 요금 비교</a>
    </div>
    <span class="sub">1시간 전</span>
  </li>
  <li class="bx ad">
    <div class="title_area"><span>sponsored placement, no anchor</span></div>
  </li>
</ul>
"#;

    #[test]
    fn extracts_all_wellformed_blocks() {
        let candidates = extract_candidates(PAGE);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn title_and_link_are_decoded() {
        let candidates = extract_candidates(PAGE);
        assert_eq!(candidates[0].title, "일렉링크 충전 \"후기\"");
        assert_eq!(
            candidates[0].link,
            "https://cafe.example.com/evclub/articles/101?where=search&page=1"
        );
    }

    #[test]
    fn origin_name_from_either_class_variant() {
        let candidates = extract_candidates(PAGE);
        assert_eq!(candidates[0].origin_name, "전기차 동호회");
        assert_eq!(candidates[1].origin_name, "테슬라 오너스");
    }

    #[test]
    fn href_before_class_is_accepted() {
        let candidates = extract_candidates(PAGE);
        assert_eq!(
            candidates[1].link,
            "https://cafe.example.com/tesla/articles/102"
        );
    }

    #[test]
    fn raw_text_contains_recency_phrase() {
        let candidates = extract_candidates(PAGE);
        assert!(candidates[0].raw_text.contains("3분 전"));
        assert!(candidates[1].raw_text.contains("1시간 전"));
    }

    #[test]
    fn block_without_title_anchor_is_skipped() {
        let candidates = extract_candidates(PAGE);
        assert!(candidates.iter().all(|c| !c.raw_text.contains("sponsored")));
    }

    #[test]
    fn empty_page_yields_nothing() {
        assert!(extract_candidates("<html><body></body></html>").is_empty());
    }
}
