//! Canonical URL form used to derive `EventId`.
//!
//! Lower-cased scheme and host, no fragment, tracking query parameters
//! removed. Strings that are not absolute URLs are kept trimmed as-is so
//! they still produce a stable identity.

use url::{form_urlencoded, Url};

/// Tracking parameters stripped in addition to every `utm_*` key.
pub const DEFAULT_TRACKING_PARAMS: &[&str] = &[
    "fbclid",
    "gclid",
    "guccounter",
    "guce_referrer",
    "guce_referrer_sig",
    "ncid",
    "mc_cid",
    "mc_eid",
];

#[derive(Debug, Clone, Default)]
pub struct UrlCanonicalizer {
    extra_tracking_params: Vec<String>,
}

impl UrlCanonicalizer {
    pub fn new(extra_tracking_params: Vec<String>) -> Self {
        Self {
            extra_tracking_params: extra_tracking_params
                .into_iter()
                .map(|p| p.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Canonical form of `raw`, or `None` for an empty/blank string.
    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let mut url = match Url::parse(trimmed) {
            Ok(url) if !url.cannot_be_a_base() => url,
            _ => return Some(trimmed.to_string()),
        };

        url.set_fragment(None);

        // Kept segments are re-joined verbatim, never re-encoded.
        let kept = url.query().map(|query| {
            query
                .split('&')
                .filter(|segment| !segment.is_empty() && !self.is_tracking(&segment_key(segment)))
                .collect::<Vec<_>>()
                .join("&")
        });
        match kept {
            Some(query) if !query.is_empty() => url.set_query(Some(&query)),
            _ => url.set_query(None),
        }

        Some(url.to_string())
    }

    fn is_tracking(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        key.starts_with("utm_")
            || DEFAULT_TRACKING_PARAMS.contains(&key.as_str())
            || self.extra_tracking_params.iter().any(|p| *p == key)
    }
}

/// Percent-decoded key of one `key=value` query segment.
fn segment_key(segment: &str) -> String {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default()
}
