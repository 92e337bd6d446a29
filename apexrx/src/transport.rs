use crate::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Url};

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }
}

/// [`Transport`] backed by a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest { method, url, body } = request;
        let parsed = Url::parse(&url).map_err(|e| TransportError::Setup {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let mut builder = self
            .client
            .request(method.into(), parsed)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await.map_err(|e| classify(&url, e))?;
        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(body) => Ok(HttpResponse::new(status, body.to_vec())),
            Err(e) => body_failure(&url, status, e.to_string()),
        }
    }
}

/// The status line arrived but the body did not. A failure status still wins
/// over the broken body; a success without its body counts as no response.
pub(crate) fn body_failure(
    url: &str,
    status: u16,
    message: String,
) -> Result<HttpResponse, TransportError> {
    let response = HttpResponse::new(status, Vec::new());
    if response.is_success() {
        Err(TransportError::NoResponse {
            url: url.to_string(),
            message,
        })
    } else {
        Ok(response)
    }
}

fn classify(url: &str, error: reqwest::Error) -> TransportError {
    if error.is_builder() {
        TransportError::Setup {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        TransportError::NoResponse {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
