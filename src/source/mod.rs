//! Remote user collection the snapshot is refreshed from.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    error::{AppError, PipelineError, Result},
    models::user::User,
};

/// Anything that can produce the current upstream user collection.
#[async_trait]
pub trait UserSource: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<User>>;
}

/// Fetches users with a plain GET against a fixed URL.
pub struct HttpUserSource {
    http: Client,
    url: String,
}

impl HttpUserSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(format!("users-dashboard/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(PipelineError::Request)?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl UserSource for HttpUserSource {
    async fn fetch_users(&self) -> Result<Vec<User>> {
        debug!(url = %self.url, "Fetching users");

        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(PipelineError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::RemoteFetch {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(PipelineError::Request)?;
        let users: Vec<User> = serde_json::from_slice(&body).map_err(PipelineError::Decode)?;

        debug!(count = users.len(), "Fetched users");
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn source_for(server: &MockServer) -> HttpUserSource {
        HttpUserSource::new(format!("{}/users", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url_is_kept_verbatim() {
        let source =
            HttpUserSource::new("https://jsonplaceholder.typicode.com/users", Duration::from_secs(20))
                .unwrap();
        assert_eq!(source.url(), "https://jsonplaceholder.typicode.com/users");
    }

    #[tokio::test]
    async fn test_fetch_parses_users() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "name": "Leanne Graham", "username": "Bret", "email": "Sincere@april.biz",
                  "phone": "1-770-736-8031 x56442", "website": "hildegard.org",
                  "address": { "city": "Gwenborough" } },
                { "id": 2, "name": "Ervin Howell" }
            ])))
            .mount(&server)
            .await;

        let users = source_for(&server).await.fetch_users().await.unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username.as_deref(), Some("Bret"));
        assert_eq!(users[1].email, None);
    }

    #[tokio::test]
    async fn test_non_success_status_is_remote_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = source_for(&server).await.fetch_users().await;

        match result {
            Err(AppError::RemoteFetch { status }) => assert_eq!(status, 503),
            other => panic!("Expected RemoteFetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_pipeline_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let result = source_for(&server).await.fetch_users().await;

        assert!(matches!(
            result,
            Err(AppError::Pipeline(PipelineError::Decode(_)))
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_pipeline_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let source = HttpUserSource::new(server.uri(), Duration::from_millis(200)).unwrap();
        let result = source.fetch_users().await;

        assert!(matches!(
            result,
            Err(AppError::Pipeline(PipelineError::Request(_)))
        ));
    }
}
