use std::collections::HashMap;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use vocwatch_core::{Candidate, CandidateKind};

use crate::error::YoutubeError;
use crate::types::{CommentThreadsResponse, SearchResponse, VideosResponse};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Recent videos fetched per topic.
const SEARCH_PAGE_SIZE: u32 = 25;
/// Top-level comments fetched per video.
const COMMENTS_PER_VIDEO: u32 = 20;
/// Comment threads are only pulled for the first N videos of a topic to keep
/// API quota usage bounded.
const MAX_COMMENT_VIDEOS: usize = 10;

/// Data API v3 client producing raw candidates for one topic at a time.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YoutubeClient {
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: API_BASE.to_owned(),
        })
    }

    /// Replaces the API endpoint. Test hook for pointing at a mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Collect video and comment candidates for `topic`.
    ///
    /// Comment-thread failures for individual videos (comments disabled,
    /// region blocks) are logged and skipped; the topic still yields its
    /// video candidates.
    ///
    /// # Errors
    ///
    /// Propagates search/statistics failures — without those there is
    /// nothing to contribute for the topic.
    pub async fn collect_candidates(&self, topic: &str) -> Result<Vec<Candidate>, YoutubeError> {
        let query = utf8_percent_encode(topic, NON_ALPHANUMERIC);
        let url = format!(
            "{}/search?part=snippet&type=video&order=date&maxResults={SEARCH_PAGE_SIZE}&q={query}&key={}",
            self.base_url, self.api_key
        );
        let search: SearchResponse = self.get_json(url, "video search").await?;

        let videos: Vec<(String, String, String)> = search
            .items
            .into_iter()
            .filter_map(|item| {
                item.id
                    .video_id
                    .map(|id| (id, item.snippet.title, item.snippet.channel_title))
            })
            .collect();

        if videos.is_empty() {
            return Ok(Vec::new());
        }

        let view_counts = self
            .view_counts(videos.iter().map(|(id, _, _)| id.as_str()))
            .await?;

        let mut candidates = Vec::new();
        for (id, title, channel) in &videos {
            candidates.push(Candidate {
                kind: CandidateKind::Video,
                origin_name: channel.clone(),
                title: decode_entities(title),
                link: format!("https://www.youtube.com/watch?v={id}"),
                raw_text: decode_entities(title),
                view_count: view_counts.get(id.as_str()).copied(),
            });
        }

        for (id, _, _) in videos.iter().take(MAX_COMMENT_VIDEOS) {
            match self.comment_candidates(id).await {
                Ok(comments) => candidates.extend(comments),
                Err(e) => {
                    debug!(video_id = %id, error = %e, "skipping comments for video");
                }
            }
        }

        Ok(candidates)
    }

    /// View counts for the given video ids, keyed by id. Videos with hidden
    /// counts are absent from the map.
    async fn view_counts<'a>(
        &self,
        ids: impl Iterator<Item = &'a str>,
    ) -> Result<HashMap<String, u64>, YoutubeError> {
        let joined = ids.collect::<Vec<_>>().join(",");
        let url = format!(
            "{}/videos?part=statistics&id={joined}&key={}",
            self.base_url, self.api_key
        );
        let response: VideosResponse = self.get_json(url, "video statistics").await?;

        let mut counts = HashMap::new();
        for item in response.items {
            match item.statistics.view_count.as_deref().map(str::parse::<u64>) {
                Some(Ok(views)) => {
                    counts.insert(item.id, views);
                }
                Some(Err(_)) | None => {
                    warn!(video_id = %item.id, "view count missing or unparseable");
                }
            }
        }
        Ok(counts)
    }

    async fn comment_candidates(&self, video_id: &str) -> Result<Vec<Candidate>, YoutubeError> {
        let url = format!(
            "{}/commentThreads?part=snippet&maxResults={COMMENTS_PER_VIDEO}&videoId={video_id}&key={}",
            self.base_url, self.api_key
        );
        let response: CommentThreadsResponse = self.get_json(url, "comment threads").await?;

        Ok(response
            .items
            .into_iter()
            .map(|thread| {
                let comment = thread.snippet.top_level_comment.snippet;
                let text = decode_entities(&comment.text_display);
                Candidate {
                    kind: CandidateKind::Comment,
                    origin_name: comment.author_display_name,
                    title: text.clone(),
                    link: format!(
                        "https://www.youtube.com/watch?v={video_id}&lc={}",
                        thread.id
                    ),
                    raw_text: text,
                    view_count: None,
                }
            })
            .collect())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        context: &str,
    ) -> Result<T, YoutubeError> {
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            // Keep the key out of logs and error chains.
            let endpoint = url.split('?').next().unwrap_or(&url).to_owned();
            return Err(YoutubeError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint,
            });
        }
        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| YoutubeError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// The API HTML-escapes titles and comment bodies; decode what we render.
fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
