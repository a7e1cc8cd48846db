use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    /// Path of the persisted mention dataset (CSV).
    pub data_path: PathBuf,
    /// Path of the tracked-term YAML file.
    pub terms_path: PathBuf,
    pub log_level: String,
    /// YouTube Data API key. When absent the video source is skipped.
    pub youtube_api_key: Option<String>,
    /// Slack incoming-webhook URLs for the daily digest. May be empty.
    pub slack_webhook_urls: Vec<String>,
    /// Dashboard link embedded in the digest, if deployed.
    pub dashboard_url: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Politeness delay between topic fetches against the same source.
    pub inter_request_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("data_path", &self.data_path)
            .field("terms_path", &self.terms_path)
            .field("log_level", &self.log_level)
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "slack_webhook_urls",
                &format!("[{} redacted]", self.slack_webhook_urls.len()),
            )
            .field("dashboard_url", &self.dashboard_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .finish()
    }
}
