use vocwatch_core::{Mention, TermConfig};

/// Formatted digest plus the counts it reports.
#[derive(Debug)]
pub struct Digest {
    pub brand_count: usize,
    pub competitor_count: usize,
    /// Slack-markdown message body.
    pub message: String,
}

/// Build the daily digest from the persisted dataset.
///
/// Only rows carrying the `(New)` marker — the set appended by the most
/// recent merge — are counted and listed. Keywords are bucketed into brand
/// vs competitor via the term tables; `video`/`comment` rows stay outside
/// both buckets and are left to the dashboard.
#[must_use]
pub fn build_digest(
    dataset: &[Mention],
    terms: &TermConfig,
    dashboard_url: Option<&str>,
    today: &str,
) -> Digest {
    let new_rows: Vec<&Mention> = dataset.iter().filter(|m| m.is_new()).collect();

    let brand_rows: Vec<&&Mention> = new_rows
        .iter()
        .filter(|m| terms.is_brand_keyword(&m.keyword))
        .collect();
    let competitor_count = new_rows
        .iter()
        .filter(|m| terms.is_competitor_keyword(&m.keyword))
        .count();

    let mut message = format!("📢 *[{today}] 브랜드 커뮤니티 일일 모니터링*\n\n");
    message.push_str(&format!(
        "오늘 당사 브랜드 언급은 *{}건*입니다 (경쟁사는 {competitor_count}건입니다)\n\n",
        brand_rows.len()
    ));

    if let Some(url) = dashboard_url {
        message.push_str(&format!("📊 *전체 현황 대시보드*:\n{url}\n\n"));
    }

    message.push_str("📝 *오늘자 당사 언급 키워드*\n");
    if brand_rows.is_empty() {
        message.push_str("• (특이 사항 없음)\n");
    } else {
        for m in &brand_rows {
            message.push_str(&format!("• <{}|{}>\n", m.link, m.title));
        }
    }

    Digest {
        brand_count: brand_rows.len(),
        competitor_count,
        message,
    }
}
