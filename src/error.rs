/// Errors raised while canonicalizing, signing or verifying a catalogue.
///
/// A signature that simply does not match is not an error: [`crate::envelope::verify`]
/// returns `Ok(false)` for it. These variants mean verification could not be attempted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document is not a catalogue (missing or non-array `catalogue-metadata`,
    /// or a relation without string `rel`/`val`).
    #[error("malformed catalogue: {0}")]
    MalformedCatalogue(String),

    /// The input cannot be represented as a JSON value.
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// Container nesting exceeded the configured limit.
    #[error("document nesting exceeds the maximum depth of {max_depth}")]
    TooDeep {
        /// The limit that was exceeded
        max_depth: usize,
    },

    /// The catalogue carries no `urn:X-hypercat:rels:jws:signature` relation.
    #[error("catalogue has no signature relation")]
    MissingSignature,

    /// The catalogue already carries signature envelope relations.
    #[error("catalogue is already signed")]
    AlreadySigned,

    /// The signature relation is not valid base64.
    #[error("signature is not valid base64: {0}")]
    DecodeFailure(#[from] base64::DecodeError),

    /// The `jws:alg` relation names an algorithm the verifier does not implement.
    #[error("unsupported signature algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    /// Key material could not be parsed.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The signing or verification primitive failed.
    #[error("cryptographic operation failed: {0}")]
    CryptoFailure(String),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
