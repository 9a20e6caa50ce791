mod rate;
mod response;

pub use rate::{RateLimitInfo, RATE_LIMIT_REMAINING, RATE_LIMIT_RESET, RATE_LIMIT_TOTAL};
pub use response::BufferedResponse;

use crate::config::Config;
use crate::error::{Error, Result};
use futures::StreamExt;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Body bytes are consumed in slices of this size; progress is reported after each.
pub const CHUNK_SIZE: usize = 1 << 13;

/// Receives download progress as a fraction in `[0, 1]`.
pub type ProgressFn = Arc<dyn Fn(f64) + Send + Sync>;

/// Per-call knobs shared by every catalog operation.
#[derive(Clone, Default)]
pub struct RequestOptions {
    pub cancel: Option<CancellationToken>,
    pub progress: Option<ProgressFn>,
    /// Overrides the client-wide `User-Agent` for this request only.
    pub user_agent: Option<String>,
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("cancel", &self.cancel)
            .field("progress", &self.progress.as_ref().map(|_| "<fn>"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(progress));
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    fn report(&self, fraction: f64) {
        if let Some(progress) = &self.progress {
            progress(fraction.clamp(0.0, 1.0));
        }
    }

    fn ensure_active(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

pub fn build_client(cfg: &Config) -> Result<Client> {
    let mut default_headers = HeaderMap::new();
    let user_agent = HeaderValue::from_str(&cfg.user_agent)
        .map_err(|_| Error::Config(format!("invalid user agent {:?}", cfg.user_agent)))?;
    default_headers.insert(USER_AGENT, user_agent);
    Client::builder()
        .default_headers(default_headers)
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .use_rustls_tls()
        .build()
        .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))
}

/// Percent-encode a caller-supplied value for use as one path segment.
///
/// Empty, `.` and `..` segments are rejected: URL resolution treats them as
/// navigation, which would retarget the request. `%` is always escaped, so
/// no other input can produce a dot segment.
pub fn encode_path_segment(segment: &str) -> Result<String> {
    if matches!(segment, "" | "." | "..") {
        return Err(Error::InvalidPathSegment(segment.to_string()));
    }
    Ok(urlencoding::encode(segment).into_owned())
}

/// The single place network I/O happens.
///
/// The underlying `reqwest::Client` is built on first use and shared by all
/// later requests, including concurrent ones.
pub struct Transport {
    config: Config,
    host: Url,
    api: Url,
    client: OnceCell<Client>,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("api", &self.api.as_str())
            .field("initialized", &self.client.initialized())
            .finish()
    }
}

impl Transport {
    pub fn new(config: Config) -> Result<Self> {
        let mut host = Url::parse(&config.base_url)?;
        if !host.path().ends_with('/') {
            let path = format!("{}/", host.path());
            host.set_path(&path);
        }
        let api = host.join("api/")?;
        Ok(Self {
            config,
            host,
            api,
            client: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api_url(&self) -> &Url {
        &self.api
    }

    /// Resolve a path relative to the API root (`maps/latest/0`).
    pub fn api_path(&self, path: &str) -> Result<Url> {
        Ok(self.api.join(path.trim_start_matches('/'))?)
    }

    /// Resolve a host-rooted path (`/cdn/abc.jpg`) or an absolute URL.
    pub fn host_path(&self, path: &str) -> Result<Url> {
        Ok(self.host.join(path)?)
    }

    async fn client(&self) -> Result<&Client> {
        self.client
            .get_or_try_init(|| async {
                debug!("initializing HTTP client for {}", self.api);
                build_client(&self.config)
            })
            .await
    }

    /// GET a path relative to the API root and buffer the body.
    ///
    /// 404 comes back as a normal response; 429 fails with
    /// [`Error::RateLimited`] without reading the body.
    pub async fn get(&self, path: &str, opts: &RequestOptions) -> Result<BufferedResponse> {
        let url = self.api_path(path)?;
        self.get_url(url, opts).await
    }

    pub async fn get_url(&self, url: Url, opts: &RequestOptions) -> Result<BufferedResponse> {
        opts.ensure_active()?;
        let client = self.client().await?;
        debug!("GET {}", url);
        self.execute(client.get(url.clone()), url.as_str(), opts).await
    }

    pub async fn post_json<B>(&self, path: &str, body: &B, opts: &RequestOptions) -> Result<BufferedResponse>
    where
        B: Serialize + ?Sized,
    {
        opts.ensure_active()?;
        let url = self.api_path(path)?;
        let client = self.client().await?;
        debug!("POST {}", url);
        self.execute(client.post(url.clone()).json(body), url.as_str(), opts)
            .await
    }

    async fn execute(
        &self,
        mut req: RequestBuilder,
        url: &str,
        opts: &RequestOptions,
    ) -> Result<BufferedResponse> {
        if let Some(ua) = &opts.user_agent {
            req = req.header(USER_AGENT, ua.as_str());
        }

        let sent = match &opts.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(Error::Cancelled),
                res = req.send() => res,
            },
            None => req.send().await,
        };
        let res = sent.map_err(|e| {
            warn!("request to {} failed: {}", url, e);
            Error::from_reqwest(url, e)
        })?;

        let status = res.status();
        let headers = res.headers().clone();
        let rate_limit = RateLimitInfo::from_headers(&headers);

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("rate limited on {} ({:?})", url, rate_limit);
            return Err(match rate_limit {
                Some(info) => Error::RateLimited(info),
                None => Error::RateLimitUnparsable,
            });
        }

        opts.ensure_active()?;
        let body = read_body(res, url, opts).await?;
        debug!("{} {} ({} bytes)", status, url, body.len());
        Ok(BufferedResponse::new(status, headers, rate_limit, body))
    }
}

async fn read_body(res: reqwest::Response, url: &str, opts: &RequestOptions) -> Result<Vec<u8>> {
    let content_length = res.content_length().filter(|len| *len > 0);
    let mut body = Vec::with_capacity(content_length.unwrap_or(0).min(1 << 20) as usize);
    let mut stream = res.bytes_stream();

    opts.report(0.0);
    loop {
        let next = match &opts.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(Error::Cancelled),
                frame = stream.next() => frame,
            },
            None => stream.next().await,
        };
        let Some(frame) = next else { break };
        let frame = frame.map_err(|e| {
            warn!("body stream from {} failed: {}", url, e);
            Error::from_reqwest(url, e)
        })?;

        for chunk in frame.chunks(CHUNK_SIZE) {
            body.extend_from_slice(chunk);
            if let Some(len) = content_length {
                opts.report(body.len() as f64 / len as f64);
            }
            opts.ensure_active()?;
        }
    }
    opts.report(1.0);
    Ok(body)
}
