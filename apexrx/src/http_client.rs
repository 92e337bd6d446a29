use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// One request as handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// JSON-encoded body, if any.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            body: Some(body),
        }
    }
}

/// Status and raw body of whatever the server answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures the wire layer reports before any response exists.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum TransportError {
    #[error("no response from {url}: {message}")]
    NoResponse { url: String, message: String },
    #[error("could not set up request to {url}: {message}")]
    Setup { url: String, message: String },
}

/// The wire under an [`HttpClient`].
///
/// [`ReqwestTransport`](crate::ReqwestTransport) talks to a real server;
/// [`MockTransport`](crate::mock::MockTransport) scripts replies for tests.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Any status code counts as a response; only missing responses are errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// A failed API call as stored on slice state.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{error_message}")]
pub struct ApiError {
    pub error_message: String,
    pub error_detail: Value,
}

/// Why a call through [`HttpClient`] failed.
///
/// The first three variants are transport-layer failures and map onto an
/// [`ApiError`]. `Decode` and `Encode` are not and never do.
#[derive(Error, Debug)]
pub enum HttpClientError {
    /// The server answered outside 2xx.
    #[error("Request failed with status code {status}.")]
    Status { status: u16, detail: Value },

    /// The request went out and nothing usable came back.
    #[error("No response received.")]
    NoResponse { detail: Value },

    /// The request could not be built or sent.
    #[error("Error setting up request.")]
    Setup { message: String },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode request body for {url}: {source}")]
    Encode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl HttpClientError {
    /// The stored form of a transport-layer failure.
    ///
    /// Returns `None` for failures that are not the transport's fault; those
    /// must reach the caller instead of being recorded as API errors.
    pub fn api_error(&self) -> Option<ApiError> {
        let error_detail = match self {
            HttpClientError::Status { detail, .. } => detail.clone(),
            HttpClientError::NoResponse { detail } => detail.clone(),
            HttpClientError::Setup { message } => json!({ "message": message }),
            HttpClientError::Decode { .. } | HttpClientError::Encode { .. } => return None,
        };
        Some(ApiError {
            error_message: self.to_string(),
            error_detail,
        })
    }

    pub fn is_unexpected(&self) -> bool {
        self.api_error().is_none()
    }
}

/// JSON client over a [`Transport`].
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
}

impl HttpClient {
    /// Shares `transport` across every clone of the client.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// `GET url`, decoding a 2xx body as JSON into `T`.
    ///
    /// Transport failures and non-2xx statuses come back as the matching
    /// [`HttpClientError`] variant. A 2xx body that does not decode is
    /// [`HttpClientError::Decode`], for which [`HttpClientError::api_error`]
    /// returns `None`.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpClientError> {
        let response = self.send(HttpRequest::get(url)).await?;
        serde_json::from_slice(&response.body).map_err(|source| HttpClientError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Posts `body` as JSON. The response body is handed back undecoded.
    pub async fn post<B>(&self, url: &str, body: &B) -> Result<HttpResponse, HttpClientError>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(body).map_err(|source| HttpClientError::Encode {
            url: url.to_string(),
            source,
        })?;
        self.send(HttpRequest::post(url, body)).await
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpClientError> {
        let method = request.method;
        let url = request.url.clone();
        match self.transport.send(request).await {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => Err(HttpClientError::Status {
                status: response.status,
                detail: json!({
                    "message": format!("Request failed with status code {}", response.status),
                    "method": method.to_string(),
                    "url": url,
                    "status": response.status,
                    "body": String::from_utf8_lossy(&response.body),
                }),
            }),
            Err(TransportError::NoResponse { message, .. }) => Err(HttpClientError::NoResponse {
                detail: json!({
                    "message": message,
                    "method": method.to_string(),
                    "url": url,
                }),
            }),
            Err(TransportError::Setup { message, .. }) => {
                Err(HttpClientError::Setup { message })
            }
        }
    }
}
