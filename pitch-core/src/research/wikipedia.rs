//! Wikipedia lookup over the MediaWiki action API.
//!
//! A lookup searches for the top pages matching the query, fetches each
//! page's plain-text introduction, and formats them as
//!
//! ```text
//! Page: <title>
//! Summary: <intro>
//! ```
//!
//! separated by blank lines and capped at a character limit.

use super::{Encyclopedia, LookupError};
use crate::config::WikipediaConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Queries longer than this are cut before searching.
const MAX_QUERY_CHARS: usize = 300;

const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (sales pitch research)"
);

/// Wikipedia client.
#[derive(Debug, Clone)]
pub struct Wikipedia {
    client: reqwest::Client,
    api_url: String,
    top_k_results: usize,
    max_chars: usize,
}

impl Wikipedia {
    /// Create a client for the configured language edition.
    pub fn new(config: &WikipediaConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LookupError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: format!("https://{}.wikipedia.org/w/api.php", config.language),
            top_k_results: config.top_k_results,
            max_chars: config.max_chars,
        })
    }

    /// Point the client at a different MediaWiki endpoint.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// The MediaWiki endpoint in use.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        params: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LookupError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;
        parse_body(&body)
    }
}

/// The two MediaWiki calls a lookup is built from.
#[async_trait]
trait PageSource: Send + Sync {
    /// Titles of the best matching pages, best first.
    async fn search(&self, query: &str) -> Result<Vec<String>, LookupError>;

    /// The page's introduction, or `None` when it has none.
    async fn intro(&self, title: &str) -> Result<Option<Summary>, LookupError>;
}

#[async_trait]
impl PageSource for Wikipedia {
    async fn search(&self, query: &str) -> Result<Vec<String>, LookupError> {
        let limit = self.top_k_results.to_string();
        let response: SearchResponse = self
            .get(&[
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("srprop", ""),
            ])
            .await?;
        Ok(search_titles(response, self.top_k_results))
    }

    async fn intro(&self, title: &str) -> Result<Option<Summary>, LookupError> {
        let response: ExtractResponse = self
            .get(&[
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .await?;
        Ok(first_extract(response))
    }
}

#[async_trait]
impl Encyclopedia for Wikipedia {
    #[instrument(skip(self))]
    async fn lookup(&self, query: &str) -> Result<String, LookupError> {
        collect_summaries(self, query, self.max_chars).await
    }

    fn name(&self) -> &str {
        "wikipedia"
    }
}

/// Search, fetch each hit's introduction in hit order, and format the result.
async fn collect_summaries<S>(
    source: &S,
    query: &str,
    max_chars: usize,
) -> Result<String, LookupError>
where
    S: PageSource + ?Sized,
{
    let query: String = query.trim().chars().take(MAX_QUERY_CHARS).collect();
    if query.is_empty() {
        return Err(LookupError::NoResults { query });
    }

    let titles = source.search(&query).await?;
    debug!(hits = titles.len(), "Search finished");

    let mut summaries = Vec::with_capacity(titles.len());
    for title in &titles {
        match source.intro(title).await? {
            Some(summary) => summaries.push(summary),
            None => warn!(%title, "Page has no introduction, skipping"),
        }
    }

    if summaries.is_empty() {
        return Err(LookupError::NoResults { query });
    }

    Ok(format_summaries(&summaries, max_chars))
}

/// One page introduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub title: String,
    pub text: String,
}

/// Render summaries in page order and cut the result to `max_chars` characters.
pub fn format_summaries(summaries: &[Summary], max_chars: usize) -> String {
    let joined = summaries
        .iter()
        .map(|s| format!("Page: {}\nSummary: {}", s.title, s.text))
        .collect::<Vec<_>>()
        .join("\n\n");

    match joined.char_indices().nth(max_chars) {
        Some((cut, _)) => joined[..cut].to_string(),
        None => joined,
    }
}

// --- MediaWiki wire types (formatversion=2) ---

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    info: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: Vec<ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    extract: Option<String>,
}

/// Decode a response body, surfacing MediaWiki's in-band errors.
fn parse_body<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, LookupError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))?;

    if let Some(error) = value.get("error") {
        let error: ApiErrorBody = serde_json::from_value(error.clone())
            .map_err(|e| LookupError::Parse(e.to_string()))?;
        return Err(LookupError::Api {
            status: 200,
            message: format!("{}: {}", error.code, error.info),
        });
    }

    serde_json::from_value(value).map_err(|e| LookupError::Parse(e.to_string()))
}

fn search_titles(response: SearchResponse, limit: usize) -> Vec<String> {
    response
        .query
        .map(|q| q.search)
        .unwrap_or_default()
        .into_iter()
        .take(limit)
        .map(|hit| hit.title)
        .collect()
}

fn first_extract(response: ExtractResponse) -> Option<Summary> {
    response
        .query?
        .pages
        .into_iter()
        .filter(|page| !page.missing)
        .find_map(|page| {
            let text = page.extract?.trim().to_string();
            (!text.is_empty()).then_some(Summary {
                title: page.title,
                text,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned search hits and intros, recording every call.
    #[derive(Default)]
    struct FakePages {
        hits: Vec<String>,
        intros: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakePages {
        fn new(hits: &[&str]) -> Self {
            Self {
                hits: hits.iter().map(|t| t.to_string()).collect(),
                ..Self::default()
            }
        }

        fn with_intro(mut self, title: &str, text: &str) -> Self {
            self.intros.insert(title.to_string(), text.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for FakePages {
        async fn search(&self, query: &str) -> Result<Vec<String>, LookupError> {
            self.calls.lock().unwrap().push(format!("search:{query}"));
            Ok(self.hits.clone())
        }

        async fn intro(&self, title: &str) -> Result<Option<Summary>, LookupError> {
            self.calls.lock().unwrap().push(format!("intro:{title}"));
            Ok(self
                .intros
                .get(title)
                .filter(|text| !text.is_empty())
                .map(|text| summary(title, text)))
        }
    }

    const SEARCH_JSON: &str = r#"{
        "batchcomplete": true,
        "continue": {"sroffset": 3, "continue": "-||"},
        "query": {
            "searchinfo": {"totalhits": 5120},
            "search": [
                {"ns": 0, "title": "Coffee", "pageid": 604727},
                {"ns": 0, "title": "Coffee bean", "pageid": 1451929},
                {"ns": 0, "title": "Coffeehouse", "pageid": 61599},
                {"ns": 0, "title": "Coffee preparation", "pageid": 2163437}
            ]
        }
    }"#;

    const EXTRACT_JSON: &str = r#"{
        "batchcomplete": true,
        "query": {
            "normalized": [{"fromencoded": false, "from": "coffee", "to": "Coffee"}],
            "pages": [
                {
                    "pageid": 604727,
                    "ns": 0,
                    "title": "Coffee",
                    "extract": "Coffee is a beverage brewed from roasted coffee beans.\n"
                }
            ]
        }
    }"#;

    fn summary(title: &str, text: &str) -> Summary {
        Summary {
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_search_titles_respects_limit() {
        let response: SearchResponse = parse_body(SEARCH_JSON).unwrap();
        assert_eq!(
            search_titles(response, 3),
            vec!["Coffee", "Coffee bean", "Coffeehouse"]
        );
    }

    #[test]
    fn test_search_without_hits() {
        let response: SearchResponse =
            parse_body(r#"{"batchcomplete": true, "query": {"search": []}}"#).unwrap();
        assert!(search_titles(response, 3).is_empty());
    }

    #[test]
    fn test_first_extract_trims_text() {
        let response: ExtractResponse = parse_body(EXTRACT_JSON).unwrap();
        assert_eq!(
            first_extract(response),
            Some(summary(
                "Coffee",
                "Coffee is a beverage brewed from roasted coffee beans."
            ))
        );
    }

    #[test]
    fn test_missing_page_has_no_extract() {
        let response: ExtractResponse = parse_body(
            r#"{"query": {"pages": [{"ns": 0, "title": "Qwxz", "missing": true}]}}"#,
        )
        .unwrap();
        assert_eq!(first_extract(response), None);

        let response: ExtractResponse = parse_body(
            r#"{"query": {"pages": [{"pageid": 1, "ns": 0, "title": "Stub", "extract": ""}]}}"#,
        )
        .unwrap();
        assert_eq!(first_extract(response), None);
    }

    #[test]
    fn test_api_error_body() {
        let err = parse_body::<SearchResponse>(
            r#"{"error": {"code": "nosrsearch", "info": "The \"srsearch\" parameter must be set."}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, LookupError::Api { ref message, .. } if message.starts_with("nosrsearch")));
    }

    #[test]
    fn test_malformed_body() {
        let err = parse_body::<SearchResponse>("<html>").unwrap_err();
        assert!(matches!(err, LookupError::Parse(_)));
    }

    #[test]
    fn test_format_summaries() {
        let text = format_summaries(
            &[
                summary("Coffee", "A brewed drink."),
                summary("Coffee bean", "The seed of the coffee plant."),
            ],
            4000,
        );
        assert_eq!(
            text,
            "Page: Coffee\nSummary: A brewed drink.\n\n\
             Page: Coffee bean\nSummary: The seed of the coffee plant."
        );
    }

    #[test]
    fn test_format_summaries_truncates_on_char_boundary() {
        let text = format_summaries(&[summary("Café", "Crème brûlée")], 12);
        assert_eq!(text.chars().count(), 12);
        assert_eq!(text, "Page: Café\nS");
    }

    #[test]
    fn test_api_url_from_language() {
        let config = WikipediaConfig {
            language: "de".to_string(),
            ..WikipediaConfig::default()
        };
        let wiki = Wikipedia::new(&config).unwrap();
        assert_eq!(wiki.api_url(), "https://de.wikipedia.org/w/api.php");
        assert_eq!(wiki.name(), "wikipedia");
    }

    #[tokio::test]
    async fn test_lookup_keeps_search_order() {
        let pages = FakePages::new(&["Coffee", "Coffee bean"])
            .with_intro("Coffee bean", "The seed.")
            .with_intro("Coffee", "A drink.");

        let text = collect_summaries(&pages, "coffee", 4000).await.unwrap();

        assert_eq!(
            text,
            "Page: Coffee\nSummary: A drink.\n\nPage: Coffee bean\nSummary: The seed."
        );
        assert_eq!(
            pages.calls(),
            vec!["search:coffee", "intro:Coffee", "intro:Coffee bean"]
        );
    }

    #[tokio::test]
    async fn test_lookup_skips_pages_without_intro() {
        let pages = FakePages::new(&["Stub", "Coffee"]).with_intro("Coffee", "A drink.");

        let text = collect_summaries(&pages, "coffee", 4000).await.unwrap();

        assert_eq!(text, "Page: Coffee\nSummary: A drink.");
    }

    #[tokio::test]
    async fn test_lookup_all_pages_skipped() {
        let pages = FakePages::new(&["Stub", "Empty"]).with_intro("Empty", "");

        let err = collect_summaries(&pages, "coffee", 4000).await.unwrap_err();

        assert!(matches!(err, LookupError::NoResults { ref query } if query == "coffee"));
    }

    #[tokio::test]
    async fn test_lookup_without_hits() {
        let pages = FakePages::new(&[]);

        let err = collect_summaries(&pages, "qwxz", 4000).await.unwrap_err();

        assert!(matches!(err, LookupError::NoResults { .. }));
        assert_eq!(pages.calls(), vec!["search:qwxz"]);
    }

    #[tokio::test]
    async fn test_lookup_cuts_long_query() {
        let pages = FakePages::new(&[]);
        let query = format!("  {}  ", "é".repeat(400));

        let _ = collect_summaries(&pages, &query, 4000).await;

        let searched = pages.calls()[0].strip_prefix("search:").unwrap().to_string();
        assert_eq!(searched, "é".repeat(MAX_QUERY_CHARS));
    }

    #[tokio::test]
    async fn test_blank_query_skips_search() {
        let pages = FakePages::new(&["Coffee"]);

        let err = collect_summaries(&pages, "   ", 4000).await.unwrap_err();

        assert!(matches!(err, LookupError::NoResults { .. }));
        assert!(pages.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        // Port 9 (discard) is closed on test machines
        let wiki = Wikipedia::new(&WikipediaConfig::default())
            .unwrap()
            .with_api_url("http://127.0.0.1:9/w/api.php");
        assert_eq!(wiki.api_url(), "http://127.0.0.1:9/w/api.php");

        let err = wiki.lookup("coffee").await.unwrap_err();

        assert!(matches!(err, LookupError::Network(_)));
    }
}
