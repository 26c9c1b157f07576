//! Blocking HTTP access used by the relay list and issue fetchers

use std::time::Duration;

use reqwest::header::LINK;
use thiserror::Error;

/// User agent sent with every request. GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("relay-l10n/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("Malformed JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

/// The parts of a response the fetchers look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    /// Raw `Link` header, used for pagination.
    pub link: Option<String>,
}

impl HttpResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Turn a non-2xx response into [`FetchError::Status`].
    pub fn error_for_status(self, url: &str) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Status { url: url.to_string(), status: self.status })
        }
    }
}

pub trait HttpClient {
    /// Perform a GET request. Non-2xx responses are returned, not raised.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError>;
}

/// [`HttpClient`] backed by `reqwest`'s blocking client.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        tracing::debug!("GET {url}");
        let response = request.send()?;
        let status = response.status().as_u16();
        let link = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text()?;

        Ok(HttpResponse { status, body, link })
    }
}
