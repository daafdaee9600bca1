//! HTTP client for the three article endpoints.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;

use super::error::ApiError;
use super::stream::StatusStream;
use super::types::{ArticleContent, CreateArticleRequest, CreateArticleResponse};

/// Seam over the service operations so flows can run against mocks.
pub trait ArticleService {
    async fn create_article(
        &self,
        req: &CreateArticleRequest,
    ) -> Result<CreateArticleResponse, ApiError>;

    async fn open_status_stream(&self, article_id: &str) -> Result<StatusStream, ApiError>;

    async fn fetch_content(&self, article_id: &str) -> Result<ArticleContent, ApiError>;
}

pub struct ArticleClient {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl ArticleClient {
    /// Create a client for the given service base URL.
    ///
    /// `request_timeout` applies to the one-shot requests only; the status
    /// subscription stays open for as long as the server keeps it alive.
    pub fn new(base_url: String, request_timeout: Duration) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        }
    }

    async fn error_status(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        ApiError::Status { status, message }
    }
}

impl ArticleService for ArticleClient {
    async fn create_article(
        &self,
        req: &CreateArticleRequest,
    ) -> Result<CreateArticleResponse, ApiError> {
        let response = self
            .client
            .post(format!("{}/article", self.base_url))
            .timeout(self.request_timeout)
            .json(req)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_status(response).await);
        }
        Ok(response.json::<CreateArticleResponse>().await?)
    }

    async fn open_status_stream(&self, article_id: &str) -> Result<StatusStream, ApiError> {
        let response = self
            .client
            .get(format!("{}/article/status/{article_id}", self.base_url))
            .header("accept", "text/event-stream")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_status(response).await);
        }
        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ApiError::from));
        Ok(StatusStream::new(bytes))
    }

    async fn fetch_content(&self, article_id: &str) -> Result<ArticleContent, ApiError> {
        let response = self
            .client
            .get(format!("{}/article/content/{article_id}", self.base_url))
            .timeout(self.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_status(response).await);
        }
        Ok(response.json::<ArticleContent>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Language, Platform};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ArticleClient {
        ArticleClient::new(server.uri(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn create_article_posts_exact_payload_and_captures_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/article"))
            .and(body_json(json!({
                "platform": "Twitter",
                "language": "English",
                "title": "X",
                "keywords": []
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc"})))
            .expect(1)
            .mount(&server)
            .await;

        let req = CreateArticleRequest::new(Platform::Twitter, Language::English, "X".into());
        let resp = client_for(&server).create_article(&req).await.unwrap();
        assert_eq!(resp.id, "abc");
    }

    #[tokio::test]
    async fn create_article_maps_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/article"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let req = CreateArticleRequest::new(Platform::Facebook, Language::Sinhala, "t".into());
        let err = client_for(&server).create_article(&req).await.unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected status error, got {other}"),
        }
    }

    #[tokio::test]
    async fn status_stream_is_scoped_to_the_article_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article/status/abc"))
            .and(header("accept", "text/event-stream"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "data: {\"status\":\"Pending\"}\n\ndata: {\"status\":\"Completed\"}\n\n",
                "text/event-stream",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let mut stream = client_for(&server).open_status_stream("abc").await.unwrap();
        assert_eq!(stream.next_event().await.unwrap().unwrap().status, "Pending");
        assert!(stream.next_event().await.unwrap().unwrap().is_terminal());
        assert!(stream.next_event().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn open_status_stream_maps_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article/status/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .open_status_stream("gone")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn fetch_content_returns_article() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article/content/abc"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"title": "T", "content": "C"})),
            )
            .mount(&server)
            .await;

        let content = client_for(&server).fetch_content("abc").await.unwrap();
        assert_eq!(content.title, "T");
        assert_eq!(content.content, "C");
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_tolerated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article/content/abc"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"title": "T", "content": "C"})),
            )
            .mount(&server)
            .await;

        let client = ArticleClient::new(format!("{}/", server.uri()), Duration::from_secs(5));
        let content = client.fetch_content("abc").await.unwrap();
        assert_eq!(content.title, "T");
    }
}
