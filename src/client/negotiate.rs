//! Response content negotiation
//!
//! Picks a decoding strategy from the declared `Content-Type` header only; the
//! body is never sniffed. Rules are evaluated top to bottom and the first
//! match wins. Anything unmatched, including a missing or empty header, is
//! decoded as text.

use std::collections::BTreeSet;

use crate::config::ClientConfig;

/// How a response body is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Parse as structured JSON
    Json,
    /// Keep the raw bytes untouched
    Bytes,
    /// Decode as text using the declared charset
    Text,
}

/// Predicate over a normalized media type (`main/sub`, no parameters)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentTypeMatcher {
    /// Full media type is one of the set
    Exact(BTreeSet<String>),
    /// Part before `/` is one of the set
    MainType(BTreeSet<String>),
}

impl ContentTypeMatcher {
    /// Exact matcher over `types` (lowercased)
    pub fn exact<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Exact(normalize_set(types))
    }

    /// Main-type matcher over `types` (lowercased)
    pub fn main_type<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::MainType(normalize_set(types))
    }

    /// Whether the normalized `media_type` satisfies this matcher
    #[must_use]
    pub fn matches(&self, media_type: &str) -> bool {
        match self {
            Self::Exact(set) => set.contains(media_type),
            Self::MainType(set) => media_type
                .split_once('/')
                .is_some_and(|(main, _)| set.contains(main)),
        }
    }
}

/// One `(predicate, decoder)` entry of a policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationRule {
    /// Predicate over the media type
    pub matcher: ContentTypeMatcher,
    /// Decoder used when the predicate holds
    pub kind: BodyKind,
}

/// Ordered list of negotiation rules with a text fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationPolicy {
    rules: Vec<NegotiationRule>,
}

impl NegotiationPolicy {
    /// Policy with no rules: everything decodes as text
    #[must_use]
    pub const fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule at the lowest priority
    #[must_use]
    pub fn rule(mut self, matcher: ContentTypeMatcher, kind: BodyKind) -> Self {
        self.rules.push(NegotiationRule { matcher, kind });
        self
    }

    /// Build the policy described by `config`
    ///
    /// Order: JSON content types, then exact binary types, then binary main types.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::empty()
            .rule(
                ContentTypeMatcher::exact(&config.json_content_types),
                BodyKind::Json,
            )
            .rule(
                ContentTypeMatcher::exact(&config.binary_content_types),
                BodyKind::Bytes,
            )
            .rule(
                ContentTypeMatcher::main_type(&config.binary_main_types),
                BodyKind::Bytes,
            )
    }

    /// Rules in evaluation order
    #[must_use]
    pub fn rules(&self) -> &[NegotiationRule] {
        &self.rules
    }

    /// Select the decoder for a raw `Content-Type` header value
    #[must_use]
    pub fn select(&self, content_type: Option<&str>) -> BodyKind {
        let Some(media_type) = content_type.and_then(media_type) else {
            return BodyKind::Text;
        };

        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(&media_type))
            .map_or(BodyKind::Text, |rule| rule.kind)
    }
}

impl Default for NegotiationPolicy {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

/// Reduce a `Content-Type` value to its lowercased media type
///
/// `"Application/JSON; charset=utf-8"` becomes `"application/json"`. Returns
/// `None` for an empty value.
#[must_use]
pub fn media_type(content_type: &str) -> Option<String> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if essence.is_empty() {
        None
    } else {
        Some(essence)
    }
}

fn normalize_set<I, S>(types: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    types
        .into_iter()
        .map(|t| t.as_ref().trim().to_ascii_lowercase())
        .collect()
}
