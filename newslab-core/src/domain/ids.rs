use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable news event identity: BLAKE3 digest of the canonical article URL.
///
/// Two sightings of the same article (across batches or providers) hash to the
/// same `EventId` once their URLs canonicalize identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    pub fn from_canonical_url(canonical: &str) -> Self {
        Self(blake3::hash(canonical.as_bytes()).to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
