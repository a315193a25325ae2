#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

//! # negotiate-http
//!
//! A thin adapter over `reqwest` offering GET/POST/PUT/PATCH/DELETE helpers
//! with automatic request-body encoding and content-type driven response
//! decoding.
//!
//! ## Architecture
//!
//! - **[`error`]** - Error types and error handling
//! - **[`config`]** - Adapter configuration (negotiation sets, whitelist, cookies)
//! - **[`client`]** - Session lifecycle, request encoding and response negotiation
//!
//! ## Quick Start
//!
//! ```bash
//! negotiate-http --base-url https://jsonplaceholder.typicode.com get /posts/1
//! negotiate-http --base-url https://httpbin.org post /post --json '{"title":"foo"}'
//! ```

pub mod client;
pub mod config;
pub mod error;

/// Error type alias for convenience
pub use error::{ClientError, Result};

/// Configuration type alias for convenience
pub use config::{ClientConfig, CookiePolicy};

pub use client::{
    BodyKind, HttpMethod, NegotiatedResponse, NegotiatingClient, NegotiationPolicy,
    RequestOptions, ResponseBody,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "negotiate-http";
