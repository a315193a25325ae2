//! Session cookie jar with configurable strictness

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use reqwest::Url;
use std::net::IpAddr;

use crate::config::CookiePolicy;

/// Cookie jar owned by one open session
///
/// In strict mode cookies set by hosts addressed by IP literal are dropped;
/// cookies are still sent for any URL the inner jar has entries for.
#[derive(Debug, Default)]
pub struct SessionCookieJar {
    jar: Jar,
    accept_ip_hosts: bool,
}

impl SessionCookieJar {
    /// Jar for `policy`; `None` when cookies are disabled
    #[must_use]
    pub fn for_policy(policy: CookiePolicy) -> Option<Self> {
        match policy {
            CookiePolicy::Disabled => None,
            CookiePolicy::Strict => Some(Self {
                jar: Jar::default(),
                accept_ip_hosts: false,
            }),
            CookiePolicy::Unsafe => Some(Self {
                jar: Jar::default(),
                accept_ip_hosts: true,
            }),
        }
    }

    /// Whether cookies from `url` would be stored
    #[must_use]
    pub fn accepts_from(&self, url: &Url) -> bool {
        self.accept_ip_hosts || !is_ip_host(url)
    }
}

impl CookieStore for SessionCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        if self.accepts_from(url) {
            self.jar.set_cookies(cookie_headers, url);
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }
}

fn is_ip_host(url: &Url) -> bool {
    url.host_str().is_some_and(|host| {
        host.trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn set(jar: &SessionCookieJar, url: &Url, cookie: &'static str) {
        let header = HeaderValue::from_static(cookie);
        jar.set_cookies(&mut std::iter::once(&header), url);
    }

    #[test]
    fn test_disabled_has_no_jar() {
        assert!(SessionCookieJar::for_policy(CookiePolicy::Disabled).is_none());
    }

    #[test]
    fn test_strict_refuses_ip_hosts() {
        let jar = SessionCookieJar::for_policy(CookiePolicy::Strict).unwrap();
        let ip = Url::parse("http://127.0.0.1:8080/login").unwrap();
        let ipv6 = Url::parse("http://[::1]:8080/login").unwrap();
        let named = Url::parse("http://example.com/login").unwrap();

        assert!(!jar.accepts_from(&ip));
        assert!(!jar.accepts_from(&ipv6));
        assert!(jar.accepts_from(&named));

        set(&jar, &ip, "session=abc");
        assert!(jar.cookies(&ip).is_none());

        set(&jar, &named, "session=abc");
        assert_eq!(jar.cookies(&named).unwrap(), "session=abc");
    }

    #[test]
    fn test_unsafe_accepts_ip_hosts() {
        let jar = SessionCookieJar::for_policy(CookiePolicy::Unsafe).unwrap();
        let ip = Url::parse("http://127.0.0.1:8080/login").unwrap();
        set(&jar, &ip, "session=abc");
        assert_eq!(jar.cookies(&ip).unwrap(), "session=abc");
    }
}
