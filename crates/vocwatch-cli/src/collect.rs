//! The `collect` command: one full collection-and-merge run.
//!
//! Best-effort throughout: a source that cannot be reached, or a topic that
//! fails, contributes an empty batch and the run continues. The only fatal
//! condition is failing to persist the merged dataset.

use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use vocwatch_core::{load_terms, AppConfig, Candidate, Mention, Normalizer, TermConfig};
use vocwatch_store::{merge, DatasetStore};

/// Resolve the topics for this run.
///
/// A filter must name a configured topic: silently collecting an arbitrary
/// ad-hoc query would produce keyword tags the digest cannot classify.
fn select_topics(terms: &TermConfig, topic_filter: Option<&str>) -> anyhow::Result<Vec<String>> {
    match topic_filter {
        Some(wanted) => terms
            .search_topics
            .iter()
            .find(|t| t.as_str() == wanted)
            .map(|t| vec![t.clone()])
            .ok_or_else(|| {
                anyhow::anyhow!("topic '{wanted}' is not in search_topics; check the terms file")
            }),
        None => Ok(terms.search_topics.clone()),
    }
}

/// Run the full pipeline: collect from both sources for every topic,
/// normalize, merge against the stored dataset, and persist.
///
/// Loads the term tables itself, so the file is only required once a
/// subcommand actually runs.
///
/// # Errors
///
/// Returns an error if the terms file cannot be loaded, the topic filter
/// resolves to nothing, or the merged dataset cannot be saved. Source
/// failures are logged and skipped.
pub(crate) async fn run_collect(
    config: &AppConfig,
    topic_filter: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let terms = load_terms(&config.terms_path)?;
    let topics = select_topics(&terms, topic_filter)?;

    if dry_run {
        println!(
            "dry-run: would collect {} topics: [{}]",
            topics.len(),
            topics.join(", ")
        );
        return Ok(());
    }

    let forum = vocwatch_scraper::ForumClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build forum client: {e}"))?;

    let youtube = match &config.youtube_api_key {
        Some(key) => Some(
            vocwatch_youtube::YoutubeClient::new(key, config.request_timeout_secs)
                .map_err(|e| anyhow::anyhow!("failed to build YouTube client: {e}"))?,
        ),
        None => {
            info!("YOUTUBE_API_KEY not set — skipping the video source for this run");
            None
        }
    };

    let normalizer = Normalizer::new(terms);
    let mut batch: Vec<Mention> = Vec::new();
    let mut is_first_topic = true;

    for topic in &topics {
        if !is_first_topic && config.inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.inter_request_delay_ms)).await;
        }
        is_first_topic = false;

        match forum.search(topic).await {
            Ok(candidates) => extend_normalized(&mut batch, &normalizer, &candidates, topic),
            Err(e) => {
                warn!(topic = %topic, error = %e, "forum source unavailable — topic contributes nothing");
            }
        }

        if let Some(yt) = &youtube {
            match yt.collect_candidates(topic).await {
                Ok(candidates) => extend_normalized(&mut batch, &normalizer, &candidates, topic),
                Err(e) => {
                    warn!(topic = %topic, error = %e, "video source unavailable — topic contributes nothing");
                }
            }
        }
    }

    let store = DatasetStore::new(&config.data_path);
    let result = merge(store.load(), batch);
    store
        .save(&result.dataset)
        .context("failed to persist the merged dataset")?;

    println!(
        "added {} new mentions (dataset now {} rows)",
        result.added,
        result.dataset.len()
    );
    Ok(())
}

fn extend_normalized(
    batch: &mut Vec<Mention>,
    normalizer: &Normalizer,
    candidates: &[Candidate],
    topic: &str,
) {
    let before = batch.len();
    batch.extend(
        candidates
            .iter()
            .filter_map(|c| normalizer.normalize(c, topic)),
    );
    info!(
        topic = %topic,
        candidates = candidates.len(),
        kept = batch.len() - before,
        "normalized source batch"
    );
}

#[cfg(test)]
mod tests {
    use vocwatch_core::parse_terms;

    use super::*;

    const TERMS_YAML: &str = r#"
brand_terms: ["일렉링크"]
competitor_terms: []
exclude_terms: []
target_communities: ["전기차"]
search_topics: ["일렉링크", "전기차 충전"]
"#;

    fn terms() -> TermConfig {
        parse_terms(TERMS_YAML).unwrap()
    }

    fn test_config(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            data_path: dir.join("mentions.csv"),
            terms_path: dir.join("terms.yaml"),
            log_level: "info".to_owned(),
            youtube_api_key: None,
            slack_webhook_urls: Vec::new(),
            dashboard_url: None,
            request_timeout_secs: 5,
            user_agent: "test-agent/1.0".to_owned(),
            inter_request_delay_ms: 0,
            max_retries: 0,
            retry_backoff_base_secs: 0,
        }
    }

    fn temp_dir(test_name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir()
            .join("vocwatch-cli-tests")
            .join(format!("{}-{}", test_name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn no_filter_selects_all_topics() {
        let topics = select_topics(&terms(), None).unwrap();
        assert_eq!(topics, vec!["일렉링크", "전기차 충전"]);
    }

    #[test]
    fn filter_selects_single_known_topic() {
        let topics = select_topics(&terms(), Some("전기차 충전")).unwrap();
        assert_eq!(topics, vec!["전기차 충전"]);
    }

    #[test]
    fn unknown_topic_is_rejected() {
        let err = select_topics(&terms(), Some("없는 토픽")).unwrap_err();
        assert!(err.to_string().contains("없는 토픽"));
    }

    #[tokio::test]
    async fn dry_run_reads_terms_and_writes_nothing() {
        let dir = temp_dir("dry-run");
        let config = test_config(&dir);
        std::fs::write(&config.terms_path, TERMS_YAML).unwrap();

        run_collect(&config, None, true).await.unwrap();
        assert!(!config.data_path.exists());
    }

    #[tokio::test]
    async fn missing_terms_file_fails_inside_the_command() {
        let dir = temp_dir("no-terms");
        let config = test_config(&dir);

        let err = run_collect(&config, None, true).await.unwrap_err();
        assert!(err.to_string().contains("terms"));
    }
}
