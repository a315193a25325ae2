//! Content-negotiated HTTP adapter
//!
//! [`NegotiatingClient`] wraps one pooled HTTP session bound to a base
//! address. Each call performs exactly one exchange: the request body is
//! encoded from the caller's [`RequestOptions`] and the response body is
//! decoded according to the declared `Content-Type` (see [`negotiate`]).
//!
//! ```no_run
//! use negotiate_http::{ClientConfig, NegotiatingClient, RequestOptions};
//! use serde_json::json;
//!
//! # async fn example() -> negotiate_http::Result<()> {
//! let mut client = NegotiatingClient::new(ClientConfig::new("https://jsonplaceholder.typicode.com"))?;
//! client.open()?;
//!
//! let (body, status, _headers) = client.get("/posts/1", RequestOptions::new()).await?.into_parts();
//! println!("{status}: {body:?}");
//!
//! let created = client
//!     .post("/posts", RequestOptions::new().json(json!({"title": "foo"})))
//!     .await?;
//! println!("{}", created.status);
//!
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod cookies;
pub mod method;
pub mod negotiate;
pub mod request;
pub mod response;
pub mod session;

use std::future::Future;
use std::pin::Pin;

pub use method::{HttpMethod, MethodFilter};
pub use negotiate::{BodyKind, ContentTypeMatcher, NegotiationPolicy, NegotiationRule};
pub use request::{Data, RequestOptions};
pub use response::{NegotiatedResponse, ResponseBody};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Future returned by the body of [`NegotiatingClient::scoped`]
pub type ScopedFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a>>;

/// HTTP client with per-verb helpers and content negotiation
///
/// The session is created by [`open`](Self::open) and released by
/// [`close`](Self::close) or when the client is dropped. Requests take `&self`,
/// so several may run concurrently against the same open session.
#[derive(Debug)]
pub struct NegotiatingClient {
    config: ClientConfig,
    policy: NegotiationPolicy,
    methods: MethodFilter,
    session: Option<reqwest::Client>,
}

impl NegotiatingClient {
    /// Create a closed client from a validated configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let policy = NegotiationPolicy::from_config(&config);
        let methods = MethodFilter::from_allowed(config.allowed_methods.as_deref());
        Ok(Self {
            config,
            policy,
            methods,
            session: None,
        })
    }

    /// Replace the negotiation policy derived from the config
    #[must_use]
    pub fn with_policy(mut self, policy: NegotiationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run `body` against an opened client, closing the session afterwards
    ///
    /// The session is closed whether `body` succeeds or fails; its result is
    /// returned unchanged.
    ///
    /// ```no_run
    /// use negotiate_http::{ClientConfig, NegotiatingClient, RequestOptions};
    ///
    /// # async fn example() -> negotiate_http::Result<()> {
    /// let status = NegotiatingClient::scoped(ClientConfig::new("https://example.com"), |client| {
    ///     Box::pin(async move {
    ///         Ok::<_, negotiate_http::ClientError>(client.get("/", RequestOptions::new()).await?.status)
    ///     })
    /// })
    /// .await?;
    /// assert_eq!(status, 200);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scoped<T, F>(config: ClientConfig, body: F) -> Result<T>
    where
        F: for<'a> FnOnce(&'a Self) -> ScopedFuture<'a, T>,
    {
        let mut client = Self::new(config)?;
        client.open()?;
        let result = body(&client).await;
        client.close();
        result
    }

    /// Create the underlying session
    ///
    /// Calling `open` on an already open client keeps the existing session.
    pub fn open(&mut self) -> Result<()> {
        if self.session.is_none() {
            self.session = Some(session::build_session(&self.config)?);
            tracing::debug!(base_url = %self.config.base_url, "session opened");
        }
        Ok(())
    }

    /// Release the session; a no-op when already closed
    pub fn close(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!(base_url = %self.config.base_url, "session closed");
        }
    }

    /// Whether a session is currently open
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Active negotiation policy
    #[must_use]
    pub const fn policy(&self) -> &NegotiationPolicy {
        &self.policy
    }

    /// Absolute URL for `path` under the base address
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.config.base_url, path)
    }

    /// Issue one request and decode the response
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotInitialized`] if the session is not open; nothing is sent
    /// - [`ClientError::InvalidMethod`] if `method` is outside the whitelist
    /// - [`ClientError::InvalidRequest`] for malformed headers
    /// - [`ClientError::Transport`] for any engine failure
    /// - [`ClientError::Decode`] if a JSON-typed body does not parse
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<NegotiatedResponse> {
        let session = self.session.as_ref().ok_or(ClientError::NotInitialized)?;
        self.methods.check(method)?;

        let url = self.url_for(path);
        let builder = options.apply(session.request(method.into(), &url))?;

        tracing::debug!(%method, %url, files = options.files().len(), "sending request");
        let response = builder.send().await?;
        tracing::debug!(%method, %url, status = response.status().as_u16(), "response received");

        response::decode(response, &self.policy).await
    }

    /// `GET path`
    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<NegotiatedResponse> {
        self.request(HttpMethod::Get, path, options).await
    }

    /// `POST path`
    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<NegotiatedResponse> {
        self.request(HttpMethod::Post, path, options).await
    }

    /// `PUT path`
    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<NegotiatedResponse> {
        self.request(HttpMethod::Put, path, options).await
    }

    /// `PATCH path`
    pub async fn patch(&self, path: &str, options: RequestOptions) -> Result<NegotiatedResponse> {
        self.request(HttpMethod::Patch, path, options).await
    }

    /// `DELETE path`
    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<NegotiatedResponse> {
        self.request(HttpMethod::Delete, path, options).await
    }
}

impl Drop for NegotiatingClient {
    fn drop(&mut self) {
        self.close();
    }
}

/// Join base address and path with exactly one `/` between them
fn join_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return base.to_string();
    }
    match (base.ends_with('/'), path.strip_prefix('/')) {
        (true, Some(rest)) => format!("{base}{rest}"),
        (false, None) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}
