//! Pooled HTTP session construction
//!
//! A session is one `reqwest::Client`: connection pool, cookie jar and the
//! engine-level settings from [`ClientConfig`]. Redirects, TLS and HTTP/2
//! negotiation keep the engine's defaults.

use reqwest::Client;
use std::sync::Arc;

use crate::client::cookies::SessionCookieJar;
use crate::config::ClientConfig;
use crate::error::Result;

/// Build the engine client for an open session
///
/// # Errors
///
/// Returns [`crate::ClientError::Transport`] if the engine rejects the settings.
pub fn build_session(config: &ClientConfig) -> Result<Client> {
    let mut builder = Client::builder();

    if let Some(jar) = SessionCookieJar::for_policy(config.cookies) {
        builder = builder.cookie_provider(Arc::new(jar));
    }

    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }

    Ok(builder.build()?)
}
