//! The `notify` command: push the daily digest to Slack.

use tracing::warn;
use vocwatch_core::{load_terms, today_stamp, AppConfig};
use vocwatch_notifier::{build_digest, send_digest};
use vocwatch_store::{DatasetStore, LoadOutcome};

/// Build the digest from the persisted dataset and deliver it to every
/// configured webhook.
///
/// # Errors
///
/// Returns an error if the dataset exists but cannot be read, the terms file
/// cannot be loaded, or no webhook accepted the digest. Missing configuration
/// (no webhooks, no dataset yet) is reported and treated as a no-op.
pub(crate) async fn run_notify(config: &AppConfig) -> anyhow::Result<()> {
    if config.slack_webhook_urls.is_empty() {
        warn!("SLACK_WEBHOOK_URLS not set — nothing to deliver");
        println!("no Slack webhooks configured; set SLACK_WEBHOOK_URLS to enable the digest");
        return Ok(());
    }

    let store = DatasetStore::new(&config.data_path);
    let dataset = match store.load() {
        LoadOutcome::Loaded(dataset) => dataset,
        LoadOutcome::Missing => {
            println!("no dataset yet — run `vocwatch collect` first");
            return Ok(());
        }
        LoadOutcome::Incompatible { reason } => {
            anyhow::bail!("dataset cannot be read for the digest: {reason}");
        }
    };

    let terms = load_terms(&config.terms_path)?;
    let digest = build_digest(
        &dataset,
        &terms,
        config.dashboard_url.as_deref(),
        &today_stamp(),
    );
    let report = send_digest(
        &config.slack_webhook_urls,
        &digest.message,
        config.request_timeout_secs,
    )
    .await?;

    println!(
        "digest covering {} brand / {} competitor mentions delivered to {}/{} webhooks",
        digest.brand_count, digest.competitor_count, report.delivered, report.attempted
    );

    if !report.any_delivered() {
        anyhow::bail!("digest was not accepted by any webhook");
    }
    Ok(())
}
