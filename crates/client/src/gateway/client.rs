//! Marketplace REST client.

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::ApiError;
use crate::config::ClientConfig;
use crate::store::TokenSource;

const USER_AGENT: &str = concat!("seller-console/", env!("CARGO_PKG_VERSION"));

/// Marketplace REST API client.
///
/// Cheap to clone; all clones share one connection pool and one token
/// source. Build one per process and hand clones to whoever needs them.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenSource>,
}

impl ApiClient {
    /// Create a client for `config.api_url`, reading credentials from `tokens`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BaseUrl` if the base URL cannot carry a path, or
    /// `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenSource>) -> Result<Self, ApiError> {
        if config.api_url.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(config.api_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_url.clone(),
                tokens,
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve path segments against the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Start a request. This is the only place a token meets the transport.
    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.inner.http.request(method, self.endpoint(segments));
        match self.inner.tokens.active_token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and decode a JSON body.
    #[instrument(skip_all)]
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = check_status(builder.send().await?).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send a request whose response body is irrelevant.
    #[instrument(skip_all)]
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        check_status(builder.send().await?).await?;
        Ok(())
    }

    /// Send a request and return the raw body (file downloads).
    #[instrument(skip_all)]
    pub(crate) async fn send_bytes(&self, builder: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// `GET` an arbitrary path and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-success status or a body
    /// that does not match `T`.
    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        self.send_json(self.request(Method::GET, segments)).await
    }

    /// `GET` with a query string built from `query`; unset fields are omitted.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn get_with_query<Q, T>(&self, segments: &[&str], query: &Q) -> Result<T, ApiError>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::GET, segments).query(query))
            .await
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::POST, segments).json(body))
            .await
    }

    /// `PUT` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn put<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::PUT, segments).json(body))
            .await
    }

    /// `DELETE` a resource, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or non-success status.
    pub async fn delete(&self, segments: &[&str]) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::DELETE, segments)).await
    }

    /// `POST` a multipart form and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        form: Form,
    ) -> Result<T, ApiError> {
        self.send_json(self.request(Method::POST, segments).multipart(form))
            .await
    }

    /// `GET` a file download.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or non-success status.
    pub async fn get_bytes<Q: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &Q,
    ) -> Result<Vec<u8>, ApiError> {
        self.send_bytes(self.request(Method::GET, segments).query(query))
            .await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Map non-success statuses onto [`ApiError`].
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    debug!(%status, url = %response.url(), "API response");

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return Err(ApiError::RateLimited(retry_after));
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_owned());

    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        _ => ApiError::Status { status, message },
    })
}

/// Pull the human-readable message out of a `{"error": ...}` or
/// `{"message": ...}` body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .into_iter()
        .find_map(|key| value.get(key)?.as_str())
        .map(str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use secrecy::SecretString;

    use super::*;

    struct FixedToken(Option<&'static str>);

    impl TokenSource for FixedToken {
        fn active_token(&self) -> Option<SecretString> {
            self.0.map(SecretString::from)
        }
    }

    fn client(base: &str, token: Option<&'static str>) -> ApiClient {
        let config = ClientConfig::new(Url::parse(base).unwrap(), PathBuf::from("/tmp"));
        ApiClient::new(&config, Arc::new(FixedToken(token))).unwrap()
    }

    #[test]
    fn test_endpoint_joins_and_encodes_segments() {
        let api = client("http://localhost:3001", None);
        assert_eq!(
            api.endpoint(&["api", "orders", "a/b c"]).as_str(),
            "http://localhost:3001/api/orders/a%2Fb%20c"
        );

        let prefixed = client("https://example.com/seller/", None);
        assert_eq!(
            prefixed.endpoint(&["api", "profile"]).as_str(),
            "https://example.com/seller/api/profile"
        );
    }

    #[test]
    fn test_bearer_attached_when_token_present() {
        let api = client("http://localhost:3001", Some("tok-123"));
        let request = api.request(Method::GET, &["api", "profile"]).build().unwrap();

        let header = request.headers().get(reqwest::header::AUTHORIZATION).unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer tok-123");
        assert!(header.is_sensitive());
    }

    #[test]
    fn test_no_header_without_token() {
        let api = client("http://localhost:3001", None);
        let request = api.request(Method::GET, &["api", "profile"]).build().unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_rejects_non_base_url() {
        let config = ClientConfig::new(Url::parse("mailto:a@b.c").unwrap(), PathBuf::from("/tmp"));
        let err = ApiClient::new(&config, Arc::new(FixedToken(None))).unwrap_err();
        assert!(matches!(err, ApiError::BaseUrl(_)));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error":"invalid email or password"}"#).as_deref(),
            Some("invalid email or password")
        );
        assert_eq!(
            error_message(r#"{"message":"not implemented"}"#).as_deref(),
            Some("not implemented")
        );
        assert_eq!(error_message("<html>"), None);
        assert_eq!(error_message(r#"{"error":42}"#), None);
    }
}
