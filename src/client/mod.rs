//! HTTP plumbing shared by the typed API clients.
//!
//! Every request carries the API key, JSON content negotiation headers and the
//! configured user agent. Responses with status >= 400 become [`Error::Api`] carrying the
//! raw body and the `X-Request-Id` header; an empty success body decodes as JSON `null`.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

const API_KEY_HEADER: &str = "X-API-Key";
const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `config`, falling back to `default_base_url` when the config
    /// leaves it empty.
    pub fn new(config: &Config, default_base_url: &str) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| Error::validation("api_key", "contains characters not allowed in a header"))?;
        headers.insert(API_KEY_HEADER, key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let base_url = if config.base_url.is_empty() {
            default_base_url.trim_end_matches('/').to_string()
        } else {
            config.base_url.clone()
        };

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::GET, path)).await
    }

    /// GET with query pairs. Repeating a key sends it repeatedly.
    pub async fn get_with_query<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let mut req = self.request(Method::GET, path);
        if !query.is_empty() {
            req = req.query(query);
        }
        self.send(req).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::DELETE, path)).await
    }

    pub async fn delete_with_query<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let mut req = self.request(Method::DELETE, path);
        if !query.is_empty() {
            req = req.query(query);
        }
        self.send(req).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, url, "API request");
        self.http.request(method, url)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = req.send().await?;
        let status = resp.status();
        let request_id = resp
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await?;

        if status.as_u16() >= 400 {
            return Err(Error::Api {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
                request_id,
            });
        }

        let raw: &[u8] = if body.is_empty() { b"null" } else { &body };
        Ok(serde_json::from_slice(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected_before_building() {
        let err = ApiClient::new(&Config::default(), "https://api.ui.com").unwrap_err();
        assert!(matches!(err, Error::EmptyApiKey));
    }

    #[test]
    fn base_url_falls_back_to_default() {
        let client = ApiClient::new(&Config::new("k"), "https://api.ui.com/").unwrap();
        assert_eq!(client.base_url(), "https://api.ui.com");

        let client = ApiClient::new(&Config::new("k").with_base_url("http://127.0.0.1:9/"), "https://api.ui.com").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");
    }

    #[test]
    fn key_with_newline_inside_is_a_validation_error() {
        let err = ApiClient::new(&Config::new("abc\ndef"), "https://api.ui.com").unwrap_err();
        assert!(err.is_validation());
    }
}
