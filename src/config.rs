use serde::{Deserialize, Serialize};

/// Default maximum container nesting, matching `serde_json`'s parser limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Settings shared by canonicalization, signing and verification.
///
/// Deserializes from kebab-case JSON; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Maximum nesting of arrays and objects accepted by the canonicalizer
    pub max_depth: usize,
    /// Keep top-level fields other than `catalogue-metadata` and `items` when
    /// rebuilding the signed content during verification
    pub keep_extra_fields: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: DEFAULT_MAX_DEPTH,
            keep_extra_fields: false,
        }
    }
}
