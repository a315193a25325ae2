//! HTTP methods accepted by the adapter and the optional method whitelist

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AllowedMethods, ClientError, Result};

/// Supported HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
}

impl HttpMethod {
    /// Every supported method, in declaration order
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Head,
        Self::Options,
    ];

    /// Canonical uppercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClientError::InvalidRequest(format!("Unsupported HTTP method: {s}")))
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
            HttpMethod::Head => Self::HEAD,
            HttpMethod::Options => Self::OPTIONS,
        }
    }
}

/// Optional method whitelist checked before every exchange
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodFilter {
    allowed: Option<Vec<HttpMethod>>,
}

impl MethodFilter {
    /// Filter that lets every method through
    #[must_use]
    pub const fn allow_all() -> Self {
        Self { allowed: None }
    }

    /// Filter restricted to `methods`
    pub fn only<I>(methods: I) -> Self
    where
        I: IntoIterator<Item = HttpMethod>,
    {
        let mut allowed: Vec<HttpMethod> = methods.into_iter().collect();
        allowed.sort_unstable();
        allowed.dedup();
        Self {
            allowed: Some(allowed),
        }
    }

    /// Build from the config's optional whitelist
    pub fn from_allowed(allowed: Option<&[HttpMethod]>) -> Self {
        allowed.map_or_else(Self::allow_all, |methods| Self::only(methods.iter().copied()))
    }

    /// Fail with [`ClientError::InvalidMethod`] when `method` is not whitelisted
    pub fn check(&self, method: HttpMethod) -> Result<()> {
        match &self.allowed {
            Some(allowed) if !allowed.contains(&method) => Err(ClientError::InvalidMethod {
                method,
                allowed: AllowedMethods(allowed.clone()),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!("TRACE".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_into_reqwest_method() {
        for method in HttpMethod::ALL {
            let converted: reqwest::Method = method.into();
            assert_eq!(converted.as_str(), method.as_str());
        }
    }

    #[test]
    fn test_filter_rejects_iff_not_member() {
        let whitelists = [
            vec![],
            vec![HttpMethod::Get],
            vec![HttpMethod::Get, HttpMethod::Post, HttpMethod::Delete],
            HttpMethod::ALL.to_vec(),
        ];
        for whitelist in whitelists {
            let filter = MethodFilter::only(whitelist.clone());
            for method in HttpMethod::ALL {
                let result = filter.check(method);
                if whitelist.contains(&method) {
                    assert!(result.is_ok(), "{method} should pass {whitelist:?}");
                } else {
                    assert!(
                        matches!(result, Err(ClientError::InvalidMethod { method: m, .. }) if m == method),
                        "{method} should be rejected by {whitelist:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_filter_reports_sorted_allowed_set() {
        let filter = MethodFilter::only([HttpMethod::Post, HttpMethod::Get, HttpMethod::Post]);
        match filter.check(HttpMethod::Put) {
            Err(ClientError::InvalidMethod { allowed, .. }) => {
                assert_eq!(allowed.0, vec![HttpMethod::Get, HttpMethod::Post]);
            }
            other => panic!("expected InvalidMethod, got {other:?}"),
        }
    }

    #[test]
    fn test_allow_all() {
        let filter = MethodFilter::from_allowed(None);
        assert!(HttpMethod::ALL.into_iter().all(|m| filter.check(m).is_ok()));
    }
}
