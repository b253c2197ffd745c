use std::fmt;

use serde::{Deserialize, Serialize};

/// Composite key addressing one cache slot: a feature's data for one owner.
///
/// Keys compare structurally and are never interpreted beyond their tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey {
    feature: String,
    owner_id: String,
}

impl CacheKey {
    pub fn new(feature: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            owner_id: owner_id.into(),
        }
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// The key as a sequence of primitive tokens, `[feature, owner_id]`.
    pub fn tokens(&self) -> [&str; 2] {
        [&self.feature, &self.owner_id]
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.feature, self.owner_id)
    }
}
