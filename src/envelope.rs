use std::str::FromStr;

use base64::engine::{general_purpose::STANDARD as BASE64, Engine};

use crate::{
    canonical::canonicalize_with_config,
    catalogue::{Catalogue, Relation, ALG_REL, KEY_REL, SIGNATURE_REL},
    config::Config,
    error::{Error, Result},
    signer::{Algorithm, Signer, Verifier},
};

/// Signs a catalogue using the default [`Config`].
///
/// See [`sign_with_config`].
pub fn sign(
    catalogue: &Catalogue,
    signer: &dyn Signer,
    public_key: &dyn Verifier,
) -> Result<Catalogue> {
    sign_with_config(catalogue, signer, public_key, &Config::default())
}

/// Signs a catalogue and appends the signature envelope.
///
/// The canonical form of `catalogue` as received is signed, then the
/// `jws:signature`, `jws:alg` and `jws:key` relations are appended in that order.
///
/// # Arguments
/// * `catalogue` - Unsigned catalogue; it is not modified
/// * `signer` - Private key capability
/// * `public_key` - Public key embedded in the `jws:key` relation
/// * `config` - Canonicalization settings
///
/// # Returns
/// * `Result<Catalogue>` - New catalogue carrying the envelope, or
///   [`Error::AlreadySigned`] if `catalogue` already has envelope relations
pub fn sign_with_config(
    catalogue: &Catalogue,
    signer: &dyn Signer,
    public_key: &dyn Verifier,
    config: &Config,
) -> Result<Catalogue> {
    if catalogue.is_signed() {
        return Err(Error::AlreadySigned);
    }

    let algorithm = signer.algorithm();
    if public_key.algorithm() != algorithm {
        return Err(Error::CryptoFailure(format!(
            "signer uses {algorithm} but public key is {}",
            public_key.algorithm()
        )));
    }

    let canonical = canonicalize_with_config(&catalogue.to_value(), config)?;
    log::trace!("Signing input: {canonical}");

    let signature = BASE64.encode(signer.sign(canonical.as_bytes())?);
    let key_pem = public_key.public_key_pem()?;

    log::debug!("Signed catalogue with {algorithm}");

    let envelope = vec![
        Relation::new(SIGNATURE_REL, signature),
        Relation::new(ALG_REL, algorithm.to_string()),
        Relation::new(KEY_REL, key_pem),
    ];

    Ok(catalogue.with_relations(envelope))
}

/// Verifies a signed catalogue using the default [`Config`].
///
/// See [`verify_with_config`].
pub fn verify(catalogue: &Catalogue, verifier: &dyn Verifier) -> Result<bool> {
    verify_with_config(catalogue, verifier, &Config::default())
}

/// Verifies the signature envelope of a catalogue against a caller-supplied key.
///
/// The embedded `jws:key` relation is ignored here; pass it in explicitly (see
/// [`Catalogue::embedded_public_key`]) if you choose to trust it.
///
/// # Arguments
/// * `catalogue` - Signed catalogue
/// * `verifier` - Public key capability to check the signature with
/// * `config` - Canonicalization and reconstruction settings
///
/// # Returns
/// * `Result<bool>` - Whether the signature matches the non-envelope content,
///   or an error if verification cannot be attempted
pub fn verify_with_config(
    catalogue: &Catalogue,
    verifier: &dyn Verifier,
    config: &Config,
) -> Result<bool> {
    let encoded = catalogue
        .find_relation(SIGNATURE_REL)
        .ok_or(Error::MissingSignature)?;

    if let Some(alg) = catalogue.find_relation(ALG_REL) {
        let claimed = Algorithm::from_str(alg)
            .map_err(|_| Error::UnsupportedAlgorithm(alg.to_owned()))?;
        if claimed != verifier.algorithm() {
            return Err(Error::UnsupportedAlgorithm(alg.to_owned()));
        }
    }

    let signature = BASE64.decode(encoded)?;

    let canonical = signing_input(catalogue, config)?;
    log::trace!("Verification input: {canonical}");

    let verified = verifier.verify(canonical.as_bytes(), &signature)?;
    log::debug!("Catalogue signature verified: {verified}");

    Ok(verified)
}

/// Returns the canonical bytes a signature on `catalogue` must cover.
///
/// This is the canonical form of [`Catalogue::without_signature_with`].
pub fn signing_input(catalogue: &Catalogue, config: &Config) -> Result<String> {
    let unsigned = catalogue.without_signature_with(config.keep_extra_fields);
    canonicalize_with_config(&unsigned.into_value(), config)
}
