//! Configured HTTP client with response interception.
//!
//! Every JSON and multipart call goes through [`HttpClient::dispatch`]:
//! exactly 200 is success, anything else becomes an [`ApiError`] through
//! [`classify`]. The download flow uses [`HttpClient::fetch_raw`], which
//! applies the configuration but leaves status handling to the caller.

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::classify::{RawFailure, classify};
use crate::config::{ClientConfig, MULTIPART_CONTENT_TYPE};
use crate::error::{ApiError, FailureKind, Result, messages};
use crate::transport::{HttpRequest, HttpResponse, Method, MultipartForm, RequestBody, Transport};

/// HTTP client bound to one configuration and one transport.
#[derive(Debug)]
pub struct HttpClient<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> HttpClient<T> {
    /// Create a client from an explicit configuration.
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// The configuration in use.
    #[inline]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying transport.
    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET with query parameters, decoding the JSON body.
    pub async fn get<R: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<R> {
        let request = self.request(Method::Get, endpoint, query, RequestBody::Empty);
        let body = self.dispatch(request).await?;
        decode(&body)
    }

    /// POST a JSON body, decoding the JSON response.
    pub async fn post_json<B, R>(&self, endpoint: &str, payload: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let json = serde_json::to_string(payload).map_err(|e| {
            ApiError::new(FailureKind::RequestConstructionFailure, e.to_string())
        })?;
        let request = self.request(Method::Post, endpoint, &[], RequestBody::Json(json));
        let body = self.dispatch(request).await?;
        decode(&body)
    }

    /// POST a multipart form. The JSON content type is replaced for this
    /// call only.
    pub async fn post_multipart<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: MultipartForm,
    ) -> Result<R> {
        let mut request = self.request(Method::Post, endpoint, &[], RequestBody::Multipart(form));
        request
            .headers
            .retain(|(name, _)| !name.eq_ignore_ascii_case("content-type"));
        request
            .headers
            .push(("Content-Type".to_string(), MULTIPART_CONTENT_TYPE.to_string()));
        let body = self.dispatch(request).await?;
        decode(&body)
    }

    /// GET without interception. Transport failures are still classified;
    /// the response is returned whatever its status.
    pub async fn fetch_raw(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        let request = self.request(Method::Get, endpoint, query, RequestBody::Empty);
        debug!(method = %request.method, url = %request.url, "raw fetch");

        self.transport.send(request).await.map_err(|err| {
            let classified = classify(&RawFailure::Transport(&err));
            warn!(kind = ?classified.kind(), cause = %err, "raw fetch failed");
            classified
        })
    }

    /// Send and intercept: body of an exact 200, or a classified error.
    pub async fn dispatch(&self, request: HttpRequest) -> Result<Vec<u8>> {
        debug!(method = %request.method, url = %request.url, "request");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                let classified = classify(&RawFailure::Transport(&err));
                warn!(kind = ?classified.kind(), cause = %err, "request failed");
                return Err(classified);
            }
        };

        match response.status {
            200 => Ok(response.body),
            status if response.is_success() => {
                warn!(status, "unexpected success status");
                Err(ApiError::new(
                    FailureKind::UnexpectedSuccess(status),
                    messages::REQUEST_FAILED,
                ))
            }
            status => {
                let classified = classify(&RawFailure::Response {
                    status,
                    body: &response.body,
                });
                warn!(status, kind = ?classified.kind(), "request failed");
                Err(classified)
            }
        }
    }

    /// Bodiless requests carry no content type, so a simple cross-origin
    /// GET needs no preflight.
    fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: RequestBody,
    ) -> HttpRequest {
        let mut headers = self.config.default_headers.clone();
        if matches!(body, RequestBody::Empty) {
            headers.retain(|(name, _)| !name.eq_ignore_ascii_case("content-type"));
        }
        HttpRequest {
            method,
            url: self.config.url(endpoint, query),
            headers,
            body,
            timeout: self.config.timeout(),
        }
    }
}

fn decode<R: DeserializeOwned>(body: &[u8]) -> Result<R> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "response body did not decode");
        ApiError::new(FailureKind::MalformedBody, messages::INVALID_RESPONSE)
    })
}
