//! Resolver options

use serde::{Deserialize, Serialize};

/// What a placeholder contributes when its key is not in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingKeyPolicy {
    /// Substitute an empty string
    #[default]
    Empty,
    /// Leave the `${key}` token in the output unchanged
    Keep,
    /// Fail the whole lookup with a key-not-found error
    Error,
}

/// Options for a [`Resolver`](crate::Resolver)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Handling of placeholders that reference absent keys
    pub missing_key: MissingKeyPolicy,
}

impl ResolverOptions {
    /// Options with the given missing-key policy
    pub fn with_missing_key(mut self, policy: MissingKeyPolicy) -> Self {
        self.missing_key = policy;
        self
    }
}
