use async_trait::async_trait;
use chrono::{DateTime, Utc};
use report_core::{AnalysisError, NewsSource, RawArticle};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";

/// Placeholder title NewsAPI uses for articles withdrawn by the publisher
const REMOVED_MARKER: &str = "[Removed]";

/// NewsAPI accepts the key as a header, which keeps it out of request URLs.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Transport failures never carry the request URL into the error text.
fn transport_err(e: reqwest::Error) -> AnalysisError {
    AnalysisError::ApiError(e.without_url().to_string())
}

/// Client for the NewsAPI `/v2/everything` search endpoint.
///
/// The credential is supplied per call, so one client can serve requests
/// that bring their own key.
#[derive(Clone)]
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl NewsApiClient {
    pub fn new(base_url: impl Into<String>, page_size: u32) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("newspulse/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size: page_size.clamp(1, 100),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BASE_URL, 10)
    }

    /// Search articles mentioning `company`, newest first.
    pub async fn get_news(&self, company: &str, api_key: &str) -> Result<Vec<RawArticle>, AnalysisError> {
        let url = format!("{}/v2/everything", self.base_url);
        let page_size = self.page_size.to_string();

        tracing::debug!("NewsAPI search: q={} pageSize={}", company, page_size);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", company),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(transport_err)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_err)?;

        parse_news_response(status, &body)
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch(&self, company: &str, api_key: &str) -> Result<Vec<RawArticle>, AnalysisError> {
        self.get_news(company, api_key).await
    }

    fn name(&self) -> &str {
        "NewsAPI"
    }
}

/// Turn a NewsAPI reply into articles, surfacing the provider's own error message.
pub fn parse_news_response(status: StatusCode, body: &str) -> Result<Vec<RawArticle>, AnalysisError> {
    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| format!("{}: {}", e.code.unwrap_or_default(), e.message.unwrap_or_default()))
            .unwrap_or_else(|_| body.chars().take(200).collect());
        return Err(AnalysisError::ApiError(format!("HTTP {}: {}", status, detail)));
    }

    let news: EverythingResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::InvalidData(format!("NewsAPI response: {}", e)))?;

    if news.status != "ok" {
        return Err(AnalysisError::ApiError(format!(
            "NewsAPI status '{}': {}",
            news.status,
            news.message.unwrap_or_default()
        )));
    }

    let total = news.articles.len();
    let articles: Vec<RawArticle> = news
        .articles
        .into_iter()
        .filter_map(|a| {
            let title = a.title.unwrap_or_default();
            let title = title.trim();
            if title.is_empty() || title == REMOVED_MARKER {
                return None;
            }
            Some(RawArticle {
                title: title.to_string(),
                url: a.url.filter(|u| !u.trim().is_empty()),
                description: a.description,
                content: a.content,
                source: a.source.and_then(|s| s.name),
                published_at: a
                    .published_at
                    .as_deref()
                    .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
                    .map(|dt| dt.with_timezone(&Utc)),
            })
        })
        .collect();

    if articles.len() < total {
        tracing::debug!("Dropped {} removed/untitled articles", total - articles.len());
    }
    Ok(articles)
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    source: Option<NewsApiSource>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: Option<String>,
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::get,
        Router,
    };
    use std::collections::HashMap;

    const SAMPLE: &str = r#"{
        "status": "ok",
        "totalResults": 3,
        "articles": [
            {
                "source": {"id": null, "name": "Reuters"},
                "author": "Jane Doe",
                "title": "Tesla shares climb after delivery beat",
                "description": "Deliveries topped estimates.",
                "url": "https://example.com/tesla-1",
                "publishedAt": "2024-03-01T10:00:00Z",
                "content": "Tesla delivered more vehicles than expected..."
            },
            {
                "source": {"id": null, "name": "[Removed]"},
                "title": "[Removed]",
                "description": "[Removed]",
                "url": "https://removed.com",
                "publishedAt": "1970-01-01T00:00:00Z",
                "content": "[Removed]"
            },
            {
                "source": {"id": null, "name": "Blog"},
                "title": "Tesla recall widens",
                "description": null,
                "url": "",
                "publishedAt": "not a date",
                "content": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_filters_removed_articles() {
        let articles = parse_news_response(StatusCode::OK, SAMPLE).unwrap();
        assert_eq!(articles.len(), 2);

        let first = &articles[0];
        assert_eq!(first.title, "Tesla shares climb after delivery beat");
        assert_eq!(first.url.as_deref(), Some("https://example.com/tesla-1"));
        assert_eq!(first.source.as_deref(), Some("Reuters"));
        assert!(first.published_at.is_some());

        let second = &articles[1];
        assert_eq!(second.url, None);
        assert_eq!(second.published_at, None);
        assert_eq!(second.summary(), "Tesla recall widens");
    }

    #[test]
    fn test_parse_empty_result() {
        let body = r#"{"status":"ok","totalResults":0,"articles":[]}"#;
        assert!(parse_news_response(StatusCode::OK, body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_provider_error() {
        let body = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#;
        let err = parse_news_response(StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::ApiError(
                "HTTP 401 Unauthorized: apiKeyInvalid: Your API key is invalid.".to_string()
            )
        );
    }

    #[test]
    fn test_parse_malformed_body() {
        let err = parse_news_response(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidData(_)));
    }

    async fn everything(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> (AxumStatus, String) {
        assert!(!params.contains_key("apiKey"));
        if headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) != Some("good-key") {
            return (
                AxumStatus::UNAUTHORIZED,
                r#"{"status":"error","code":"apiKeyInvalid","message":"bad key"}"#.to_string(),
            );
        }
        assert_eq!(params.get("q").map(String::as_str), Some("Tesla"));
        assert_eq!(params.get("pageSize").map(String::as_str), Some("5"));
        (AxumStatus::OK, SAMPLE.to_string())
    }

    async fn spawn_mock() -> String {
        let app = Router::new().route("/v2/everything", get(everything));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_through_news_source() {
        let base = spawn_mock().await;
        let client = NewsApiClient::new(format!("{}/", base), 5);

        let articles = client.fetch("Tesla", "good-key").await.unwrap();
        assert_eq!(articles.len(), 2);

        let err = client.fetch("Tesla", "wrong").await.unwrap_err();
        assert!(err.to_string().contains("apiKeyInvalid"));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_expose_key() {
        // Nothing listens on the discard port.
        let client = NewsApiClient::new("http://127.0.0.1:9", 10);

        let err = client.get_news("Tesla", "SUPER-SECRET-KEY").await.unwrap_err();
        assert!(matches!(err, AnalysisError::ApiError(_)));
        assert!(!err.to_string().contains("SUPER-SECRET-KEY"));
        assert!(!err.user_message().contains("SUPER-SECRET-KEY"));
        assert!(!err.to_string().contains("127.0.0.1:9"));
    }
}
