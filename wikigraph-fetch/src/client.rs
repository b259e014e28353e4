use crate::cache::TtlCache;
use crate::error::{FetchError, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// How long search results and summaries stay fresh.
pub const SUMMARY_TTL: Duration = Duration::from_secs(900);

/// Sole boundary to the MediaWiki action API.
///
/// Searches and summaries are cached per client instance, each operation in
/// its own keyspace so a title used for both never collides. Rendered article
/// content is fetched once per exploration and is not cached.
pub struct WikipediaClient {
    client: Client,
    api_url: Url,
    search_cache: TtlCache<String, Value>,
    summary_cache: TtlCache<String, String>,
}

impl WikipediaClient {
    pub fn new(api_url: &str) -> Result<Self> {
        Self::with_timeout(api_url, 10)
    }

    pub fn with_timeout(api_url: &str, timeout_secs: u64) -> Result<Self> {
        let api_url = Url::parse(api_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", api_url, e)))?;

        let client = Client::builder()
            .user_agent("WikiGraph/0.1 (https://github.com/trapdoorsec/wikigraph)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            api_url,
            search_cache: TtlCache::new(SUMMARY_TTL),
            summary_cache: TtlCache::new(SUMMARY_TTL),
        })
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.search_cache = TtlCache::new(ttl);
        self.summary_cache = TtlCache::new(ttl);
        self
    }

    /// Issue one GET against the action API. Every transport or HTTP-status
    /// failure, including an undecodable body, becomes `ServiceUnavailable`.
    async fn call_api(&self, params: &[(&str, &str)]) -> Result<Value> {
        debug!("Calling {} with {:?}", self.api_url, params);

        let response = self
            .client
            .get(self.api_url.clone())
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<Value>().await?)
    }

    /// Full-text search, returned exactly as the provider sends it.
    pub async fn search_articles(&self, term: &str) -> Result<Value> {
        let key = term.to_string();
        if let Some(cached) = self.search_cache.get(&key).await {
            debug!("Search cache hit for {:?}", term);
            return Ok(cached);
        }

        let data = self
            .call_api(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", term),
                ("format", "json"),
            ])
            .await?;

        self.search_cache.insert(key, data.clone()).await;
        Ok(data)
    }

    /// Plain-text introduction of an article, following redirects.
    ///
    /// A response without an extract yields an empty string rather than an
    /// error; empty results are cached like any other.
    pub async fn get_article_summary(&self, title: &str) -> Result<String> {
        let key = title.to_string();
        if let Some(cached) = self.summary_cache.get(&key).await {
            debug!("Summary cache hit for {:?}", title);
            return Ok(cached);
        }

        let data = self
            .call_api(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("titles", title),
                ("format", "json"),
                ("redirects", "1"),
            ])
            .await?;

        let summary = summary_from_response(&data);
        self.summary_cache.insert(key, summary.clone()).await;
        Ok(summary)
    }

    /// Rendered article body and the title the provider resolved it to.
    pub async fn get_article_content(&self, title: &str) -> Result<(String, String)> {
        let data = self
            .call_api(&[
                ("action", "parse"),
                ("page", title),
                ("prop", "text"),
                ("format", "json"),
                ("redirects", "1"),
            ])
            .await?;

        if data.get("error").is_some() {
            return Err(FetchError::NotFound(format!(
                "Article \"{}\" not found.",
                title
            )));
        }

        let html = data.pointer("/parse/text/*").and_then(Value::as_str);
        let resolved = data.pointer("/parse/title").and_then(Value::as_str);
        match (html, resolved) {
            (Some(html), Some(resolved)) => Ok((html.to_string(), resolved.to_string())),
            _ => Err(FetchError::NotFound(format!(
                "Content for \"{}\" could not be processed.",
                title
            ))),
        }
    }
}

fn summary_from_response(data: &Value) -> String {
    data.pointer("/query/pages")
        .and_then(Value::as_object)
        .and_then(|pages| pages.values().next())
        .and_then(|page| page.get("extract"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_from_response() {
        let data = json!({"query": {"pages": {"123": {"extract": "This is a summary."}}}});
        assert_eq!(summary_from_response(&data), "This is a summary.");
    }

    #[test]
    fn test_summary_without_extract() {
        let data = json!({"query": {"pages": {"123": {}}}});
        assert_eq!(summary_from_response(&data), "");
    }

    #[test]
    fn test_summary_without_pages() {
        assert_eq!(summary_from_response(&json!({"query": {"pages": {}}})), "");
        assert_eq!(summary_from_response(&json!({"batchcomplete": ""})), "");
    }

    #[test]
    fn test_invalid_api_url() {
        let result = WikipediaClient::new("not a url");
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }
}
