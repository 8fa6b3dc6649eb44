/// RSA PKCS#1 v1.5 over SHA-256 signer and verifier
#[cfg(feature = "signer-rs256")]
pub mod rs256_signer;

#[cfg(feature = "signer-rs256")]
pub use rs256_signer::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Signature algorithms a catalogue envelope can name in its `jws:alg` relation.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Debug,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
    strum::VariantNames,
)]
pub enum Algorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256
    #[serde(rename = "RS256")]
    #[strum(serialize = "RS256")]
    RS256,
}

/// Private key capability used to sign canonical catalogue bytes.
pub trait Signer {
    /// The algorithm this signer implements.
    fn algorithm(&self) -> Algorithm;

    /// Signs the provided data.
    ///
    /// # Arguments
    ///
    /// * `data` - The canonical bytes to sign.
    ///
    /// # Returns
    ///
    /// The raw signature bytes.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Public key capability used to verify signatures and to embed the key in an envelope.
pub trait Verifier {
    /// The algorithm this verifier implements.
    fn algorithm(&self) -> Algorithm;

    /// Checks `signature` over `data`.
    ///
    /// # Returns
    ///
    /// `Ok(false)` when the signature does not match; errors are reserved for
    /// failures that prevent checking at all.
    fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool>;

    /// Exports the public key as PKCS#8 SubjectPublicKeyInfo PEM.
    fn public_key_pem(&self) -> Result<String>;
}
