//! Detachable RS256 signatures for Hypercat catalogues.
//!
//! A catalogue is signed over a deterministic canonical serialization and the
//! signature is embedded back into `catalogue-metadata` as three
//! `urn:X-hypercat:rels:jws:*` relations. Verification strips those relations,
//! re-canonicalizes the remainder and checks the signature against a
//! caller-supplied public key.

/// Deterministic JSON canonicalization used as signing input
pub mod canonical;

/// Catalogue document model and relation helpers
pub mod catalogue;

/// Canonicalization and verification settings
pub mod config;

/// Signature envelope protocol (sign, verify)
pub mod envelope;

/// Error types
pub mod error;

/// Key capability traits and the RS256 implementation
pub mod signer;

pub use catalogue::{Catalogue, Relation};
pub use config::Config;
pub use envelope::{sign, sign_with_config, verify, verify_with_config};
pub use error::{Error, Result};
