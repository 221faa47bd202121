// HTTP client for the media server API
//
// Wraps `reqwest::Client` with base-URL joining, bearer auth injection and
// envelope normalization. Endpoint modules under `service/` add inherent
// methods so this file stays focused on transport mechanics.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::TokenSource;
use crate::envelope::{ApiFailure, ApiResult, RawEnvelope};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Longest body excerpt kept in diagnostics.
const BODY_PREVIEW_LEN: usize = 200;

/// Single point of outbound HTTP communication.
///
/// Cheap to clone; clones share the connection pool and the token source.
/// Every method returns `Ok(ApiResult)` once the server produced a response,
/// and `Err` only for transport failures.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenSource>,
    timeout_secs: u64,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for the server at `base_url` (e.g. `https://media.local:8443`).
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            tokens,
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            tokens,
            timeout_secs: 0,
        })
    }

    /// Append `/api/` unless the URL already points at the API root.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }
        Ok(url)
    }

    /// The API root every path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let Some(token) = self.tokens.token() else {
            return Ok(builder);
        };
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::InvalidToken(e.to_string()))?;
        value.set_sensitive(true);
        Ok(builder.header(AUTHORIZATION, value))
    }

    // ── Generic request ──────────────────────────────────────────────

    /// Issue one request and normalize the answer into an [`ApiResult`].
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &[(&str, String)],
    ) -> Result<ApiResult<T>, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path)?;
        debug!(%method, %url, "sending request");

        let mut builder = self.http.request(method, url);
        if !params.is_empty() {
            builder = builder.query(params);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let builder = self.authorize(builder)?;

        let resp = builder
            .send()
            .await
            .map_err(|e| Error::from_reqwest(e, self.timeout_secs))?;
        self.handle_response(resp).await
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResult<T>, Error> {
        self.request::<T, ()>(Method::GET, path, None, &[]).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<ApiResult<T>, Error> {
        self.request::<T, ()>(Method::GET, path, None, params).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResult<T>, Error> {
        self.request(Method::POST, path, Some(body), &[]).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResult<T>, Error> {
        self.request(Method::PUT, path, Some(body), &[]).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResult<T>, Error> {
        self.request::<T, ()>(Method::DELETE, path, None, &[]).await
    }

    /// POST a multipart form (file uploads).
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<ApiResult<T>, Error> {
        let url = self.url(path)?;
        debug!(%url, "sending multipart upload");

        let builder = self.authorize(self.http.post(url).multipart(form))?;
        let resp = builder
            .send()
            .await
            .map_err(|e| Error::from_reqwest(e, self.timeout_secs))?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<ApiResult<T>, Error> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::from_reqwest(e, self.timeout_secs))?;
        trace!(%status, bytes = body.len(), "response received");

        if !status.is_success() {
            return Ok(ApiResult::Failure(failure_from_status(status, &body)));
        }

        let raw: RawEnvelope = match serde_json::from_str(&body) {
            Ok(raw) => raw,
            Err(e) => return Err(malformed(&e, body)),
        };
        ApiResult::from_envelope(raw, None).map_err(|e| malformed(&e, body))
    }
}

/// Normalize a non-2xx response into a failure, preferring the server's
/// own envelope messages when the body carries them.
fn failure_from_status(status: reqwest::StatusCode, body: &str) -> ApiFailure {
    let messages = serde_json::from_str::<RawEnvelope>(body)
        .ok()
        .and_then(|raw| raw.messages)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            let preview = preview(body);
            if preview.is_empty() {
                vec![format!("HTTP {status}")]
            } else {
                vec![format!("HTTP {status}: {preview}")]
            }
        });

    ApiFailure {
        http_status: Some(status.as_u16()),
        messages,
    }
}

fn malformed(err: &serde_json::Error, body: String) -> Error {
    Error::Deserialization {
        message: format!("{err} (body preview: {:?})", preview(&body)),
        body,
    }
}

fn preview(body: &str) -> &str {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_PREVIEW_LEN) {
        Some((idx, _)) => &trimmed[..idx],
        None => trimmed,
    }
}

/// Percent-encode a caller-supplied id so it stays a single path segment.
///
/// `/`, `?`, `#` and `%` are escaped. `Url::join` resolves `.` and `..`
/// even when percent-encoded, so those are rejected.
pub(crate) fn path_segment(raw: &str) -> Result<String, Error> {
    if raw == "." || raw == ".." {
        return Err(Error::Encode(format!("'{raw}' is not a valid path segment")));
    }
    Ok(url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20"))
}
