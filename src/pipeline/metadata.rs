//! Token metadata link resolution.
//!
//! Token announcements carry a metadata URI pointing at a JSON blob of
//! no fixed shape. Two layouts are checked for links, in order:
//! - nested: `properties.links.{twitter,website,telegram}`
//! - top-level: `{twitter|twitter_link, website|website_link,
//!   telegram|telegram_link}` (overrides the nested values when present)
//!
//! Resolution is strictly best-effort: a missing URI, a non-200
//! response, a timeout, or an unparsable body all yield the
//! all-unavailable bundle. Nothing here is ever fatal to the pipeline.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Sentinel for a link field that could not be resolved.
pub const LINK_UNAVAILABLE: &str = "unavailable";

/// Links pulled out of token metadata, each defaulting to the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBundle {
    pub social: String,
    pub website: String,
    pub chat: String,
}

impl LinkBundle {
    pub fn unavailable() -> Self {
        Self {
            social: LINK_UNAVAILABLE.to_string(),
            website: LINK_UNAVAILABLE.to_string(),
            chat: LINK_UNAVAILABLE.to_string(),
        }
    }

    pub fn has_social(&self) -> bool {
        self.social != LINK_UNAVAILABLE
    }
}

/// Resolves a metadata URI into a [`LinkBundle`].
///
/// Trait seam so the filter gate can be exercised in tests with a
/// canned resolver instead of live HTTP.
#[async_trait]
pub trait LinkResolver {
    async fn resolve_links(&self, uri: Option<&str>) -> LinkBundle;
}

/// Live resolver fetching metadata over HTTP with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpResolver {
    client: reqwest::Client,
}

impl HttpResolver {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LinkResolver for HttpResolver {
    async fn resolve_links(&self, uri: Option<&str>) -> LinkBundle {
        let Some(uri) = uri else {
            return LinkBundle::unavailable();
        };

        let response = match self.client.get(uri).send().await {
            Ok(response) => response,
            Err(e) => {
                if e.is_timeout() {
                    log::warn!("⏳ Timeout fetching token metadata: {}", uri);
                } else {
                    log::warn!("Failed to fetch token metadata {}: {}", uri, e);
                }
                return LinkBundle::unavailable();
            }
        };

        if !response.status().is_success() {
            log::warn!(
                "Metadata fetch returned HTTP {} for {}",
                response.status(),
                uri
            );
            return LinkBundle::unavailable();
        }

        match response.json::<Value>().await {
            Ok(metadata) => parse_link_bundle(&metadata),
            Err(e) => {
                log::warn!("Unparsable metadata body from {}: {}", uri, e);
                LinkBundle::unavailable()
            }
        }
    }
}

/// Pull known link fields out of a metadata document.
///
/// Later sources override earlier defaults, but only for keys actually
/// present: a top-level `twitter` beats `properties.links.twitter`,
/// while an absent key leaves the previous value alone.
pub fn parse_link_bundle(metadata: &Value) -> LinkBundle {
    let mut links = LinkBundle::unavailable();

    if let Some(nested) = metadata
        .get("properties")
        .and_then(|p| p.get("links"))
        .and_then(|l| l.as_object())
    {
        if let Some(s) = nested.get("twitter").and_then(|v| v.as_str()) {
            links.social = s.to_string();
        }
        if let Some(s) = nested.get("website").and_then(|v| v.as_str()) {
            links.website = s.to_string();
        }
        if let Some(s) = nested.get("telegram").and_then(|v| v.as_str()) {
            links.chat = s.to_string();
        }
    }

    if let Some(s) = string_field(metadata, &["twitter", "twitter_link"]) {
        links.social = s;
    }
    if let Some(s) = string_field(metadata, &["website", "website_link"]) {
        links.website = s;
    }
    if let Some(s) = string_field(metadata, &["telegram", "telegram_link"]) {
        links.chat = s;
    }

    links
}

fn string_field(metadata: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| metadata.get(*k))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
