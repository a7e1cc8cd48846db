use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};

use crate::NotifierError;

/// How many webhooks accepted the digest vs how many were attempted.
#[derive(Debug, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub attempted: usize,
}

impl DeliveryReport {
    /// True when at least one destination accepted the message.
    #[must_use]
    pub fn any_delivered(&self) -> bool {
        self.delivered > 0
    }
}

/// Post `text` to every webhook URL, continuing past individual failures.
///
/// Link unfurling is disabled: digests list many mention URLs and Slack
/// would otherwise expand each one into a preview card.
///
/// # Errors
///
/// Returns [`NotifierError::Http`] only if the HTTP client itself cannot be
/// constructed; per-webhook failures are logged and reflected in the report.
pub async fn send_digest(
    webhook_urls: &[String],
    text: &str,
    timeout_secs: u64,
) -> Result<DeliveryReport, NotifierError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;

    let payload = json!({
        "text": text,
        "unfurl_links": false,
    });

    let mut delivered = 0usize;
    for (i, url) in webhook_urls.iter().enumerate() {
        match client.post(url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                info!(webhook = i + 1, "digest delivered");
                delivered += 1;
            }
            Ok(response) => {
                warn!(
                    webhook = i + 1,
                    status = response.status().as_u16(),
                    "digest rejected by webhook"
                );
            }
            Err(e) => {
                warn!(webhook = i + 1, error = %e, "digest delivery failed");
            }
        }
    }

    Ok(DeliveryReport {
        delivered,
        attempted: webhook_urls.len(),
    })
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn posts_payload_with_unfurl_disabled() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook/a"))
            .and(body_partial_json(
                serde_json::json!({"text": "digest body", "unfurl_links": false}),
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let urls = vec![format!("{}/hook/a", server.uri())];
        let report = send_digest(&urls, "digest body", 5).await.unwrap();
        assert_eq!(
            report,
            DeliveryReport {
                delivered: 1,
                attempted: 1
            }
        );
    }

    #[tokio::test]
    async fn one_failing_webhook_does_not_block_the_rest() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook/bad"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/hook/good"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let urls = vec![
            format!("{}/hook/bad", server.uri()),
            format!("{}/hook/good", server.uri()),
        ];
        let report = send_digest(&urls, "digest body", 5).await.unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(report.attempted, 2);
        assert!(report.any_delivered());
    }

    #[tokio::test]
    async fn no_webhooks_reports_zero_attempts() {
        let report = send_digest(&[], "digest body", 5).await.unwrap();
        assert_eq!(report.attempted, 0);
        assert!(!report.any_delivered());
    }
}
