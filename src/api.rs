// SPDX-License-Identifier: GPL-3.0-only

//! Typed client for the PokéCache backend.
//!
//! The backend keeps its own cache in front of PokéAPI, this client only ever
//! talks to the three endpoints it exposes.

use std::sync::Arc;

use reqwest::{StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

use crate::app::entities::{CacheClearResult, PokemonDetail, PokemonPage};

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Transport(Arc<reqwest::Error>),
    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response shape: {0}")]
    Parse(Arc<serde_json::Error>),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(Arc::new(err))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(Arc::new(err))
    }
}

/// Error body the backend sends along with 4xx/5xx answers
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PokeCacheApi {
    client: reqwest::Client,
    base_url: Url,
}

impl PokeCacheApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Shared HTTP client, also used for sprite downloads
    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// `GET /api/pokemon?limit=<limit>&offset=<offset>`
    pub async fn fetch_pokemon_page(&self, limit: u32, offset: u32) -> Result<PokemonPage, ApiError> {
        let mut url = self.endpoint("api/pokemon")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        tracing::info!("requesting {limit} Pokémon with offset {offset}");
        self.get_json(url).await
    }

    /// `GET /api/pokemon/{id}`
    pub async fn fetch_pokemon(&self, id: i64) -> Result<PokemonDetail, ApiError> {
        let url = self.endpoint(&format!("api/pokemon/{id}"))?;

        tracing::info!("requesting details of Pokémon {id}");
        self.get_json(url).await
    }

    /// `GET /clear-cache`
    ///
    /// Every non-2xx answer is an error, including the HTTP 500 the backend sends
    /// with a `{status, message}` body when its cache is down. That message is
    /// logged and kept in [`ApiError::Status`].
    pub async fn clear_cache(&self) -> Result<CacheClearResult, ApiError> {
        let url = self.endpoint("clear-cache")?;

        tracing::info!("requesting a backend cache clear");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            if let Ok(result) = serde_json::from_slice::<CacheClearResult>(&body) {
                tracing::warn!("backend refused the cache clear: {}", result.message());
            }
            return Err(status_error(status, &body));
        }

        decode(&body)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        decode(&body)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::InvalidUrl(err.to_string()))
    }
}

/// Parses the configured backend root, making sure endpoints are joined below its path
fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(base_url.trim()).map_err(|err| ApiError::InvalidUrl(err.to_string()))?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl(format!(
            "{base_url} is not an http(s) address"
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);

    Ok(url)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(ApiError::from)
}

fn status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message.or(body.error))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    /// One canned answer per accepted connection, request lines are recorded
    struct FakeBackend {
        base_url: String,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl FakeBackend {
        async fn start(answers: Vec<(u16, &'static str)>) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base_url = format!("http://{}", listener.local_addr().unwrap());
            let requests = Arc::new(Mutex::new(Vec::new()));

            let recorded = Arc::clone(&requests);
            tokio::spawn(async move {
                for (status, body) in answers {
                    let (mut socket, _) = listener.accept().await.unwrap();

                    let mut buffer = vec![0u8; 4096];
                    let mut read = 0;
                    while !buffer[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        let n = socket.read(&mut buffer[read..]).await.unwrap();
                        if n == 0 {
                            break;
                        }
                        read += n;
                    }
                    let head = String::from_utf8_lossy(&buffer[..read]);
                    let request_line = head.lines().next().unwrap_or_default().to_string();
                    recorded.lock().unwrap().push(request_line);

                    let response = format!(
                        "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    socket.write_all(response.as_bytes()).await.unwrap();
                    socket.shutdown().await.unwrap();
                }
            });

            Self { base_url, requests }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    const PAGE: &str = r#"{"results": [{"id": 1, "name": "bulbasaur", "height": 7, "weight": 69, "types": ["grass", "poison"], "image": null}], "fromCache": false}"#;

    #[tokio::test]
    async fn list_request_carries_limit_and_offset() {
        let backend = FakeBackend::start(vec![(200, PAGE)]).await;
        let api = PokeCacheApi::new(&backend.base_url).unwrap();

        let page = api.fetch_pokemon_page(150, 0).await.unwrap();

        assert_eq!(page.results.len(), 1);
        assert!(!page.from_cache);
        assert_eq!(
            backend.requests(),
            vec!["GET /api/pokemon?limit=150&offset=0 HTTP/1.1"]
        );
    }

    #[tokio::test]
    async fn detail_request_hits_the_id_path_once() {
        let body = r#"{"id": 25, "name": "pikachu", "height": 4, "weight": 60, "types": ["electric"], "image": null}"#;
        let backend = FakeBackend::start(vec![(200, body)]).await;
        let api = PokeCacheApi::new(&backend.base_url).unwrap();

        let detail = api.fetch_pokemon(25).await.unwrap();

        assert_eq!(detail.summary.name, "pikachu");
        assert_eq!(backend.requests(), vec!["GET /api/pokemon/25 HTTP/1.1"]);
    }

    #[tokio::test]
    async fn not_found_is_a_status_error_with_the_server_message() {
        let body = r#"{"error": "Error fetching Pokémon 9999", "message": "404 Client Error"}"#;
        let backend = FakeBackend::start(vec![(404, body)]).await;
        let api = PokeCacheApi::new(&backend.base_url).unwrap();

        let err = api.fetch_pokemon(9999).await.unwrap_err();

        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "404 Client Error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn shape_mismatch_is_a_parse_error() {
        let backend = FakeBackend::start(vec![(200, r#"{"results": "nope"}"#)]).await;
        let api = PokeCacheApi::new(&backend.base_url).unwrap();

        let err = api.fetch_pokemon_page(150, 0).await.unwrap_err();

        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn cache_outage_answer_is_a_status_error() {
        let body = r#"{"status": "error", "message": "Redis is not available"}"#;
        let backend = FakeBackend::start(vec![(500, body)]).await;
        let api = PokeCacheApi::new(&backend.base_url).unwrap();

        let err = api.clear_cache().await.unwrap_err();

        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Redis is not available");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(backend.requests(), vec!["GET /clear-cache HTTP/1.1"]);
    }

    #[tokio::test]
    async fn refused_cache_clear_with_success_code_is_returned() {
        let body = r#"{"status": "error", "message": "Redis is not available"}"#;
        let backend = FakeBackend::start(vec![(200, body)]).await;
        let api = PokeCacheApi::new(&backend.base_url).unwrap();

        let result = api.clear_cache().await.unwrap();

        assert!(!result.is_success());
        assert_eq!(result.message(), "Redis is not available");
    }

    #[tokio::test]
    async fn unparseable_cache_clear_failure_is_an_error() {
        let backend = FakeBackend::start(vec![(502, "<html>Bad Gateway</html>")]).await;
        let api = PokeCacheApi::new(&backend.base_url).unwrap();

        let err = api.clear_cache().await.unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let api = PokeCacheApi::new(&base_url).unwrap();
        let err = api.clear_cache().await.unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn base_url_keeps_its_path() {
        let api = PokeCacheApi::new("http://example.com/pokecache").unwrap();
        assert_eq!(
            api.endpoint("api/pokemon/4").unwrap().as_str(),
            "http://example.com/pokecache/api/pokemon/4"
        );

        let api = PokeCacheApi::new("http://example.com/").unwrap();
        assert_eq!(
            api.endpoint("/clear-cache").unwrap().as_str(),
            "http://example.com/clear-cache"
        );
    }

    #[test]
    fn rejects_non_http_base_urls() {
        assert!(matches!(
            PokeCacheApi::new("ftp://example.com"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            PokeCacheApi::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
