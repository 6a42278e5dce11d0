//! Supported algorithms and digest-shape detection.
//!
//! Every [`Algorithm`] owns exactly one [`HashSpec`] in [`SPECS`]. Detection
//! looks at the self-describing prefix first and falls back to the digest
//! length, returning every algorithm that fits. Several algorithms share a
//! length (md4/md5, sha1/ripemd160, ...) and the ambiguity is handed back to
//! the caller unresolved.

use std::collections::BTreeSet;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::CrackError;

/// One-way transforms the engine knows how to verify.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Algorithm {
    #[strum(serialize = "crc32")]
    Crc32,
    #[strum(serialize = "md4")]
    Md4,
    #[strum(serialize = "md5")]
    Md5,
    #[strum(serialize = "ripemd160")]
    Ripemd160,
    #[strum(serialize = "sha1")]
    Sha1,
    /// SHA-1 applied twice, the second pass over the raw first digest.
    #[strum(serialize = "sha1_v2")]
    Sha1V2,
    #[strum(serialize = "sha224")]
    Sha224,
    #[strum(serialize = "sha256")]
    Sha256,
    #[strum(serialize = "sha3_224")]
    Sha3_224,
    #[strum(serialize = "sha3_256")]
    Sha3_256,
    #[strum(serialize = "sha3_384")]
    Sha3_384,
    #[strum(serialize = "sha3_512")]
    Sha3_512,
    #[strum(serialize = "sha512")]
    Sha512,
    /// BLAKE2b truncated to a 28-byte output.
    #[strum(serialize = "blake2_224")]
    Blake2_224,
    /// scrypt with an empty salt, N=16384, r=8, p=1 and a 64-byte key.
    #[strum(serialize = "scrypt")]
    Scrypt,
    #[strum(serialize = "bcrypt")]
    Bcrypt,
    #[strum(serialize = "argon2id")]
    Argon2id,
}

/// Shape of the digests an algorithm produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashSpec {
    pub algorithm: Algorithm,
    /// Length of the hex digest, for fixed-output schemes.
    pub expected_len: Option<usize>,
    /// Marker a self-describing digest starts with.
    pub prefix: Option<&'static str>,
}

const fn fixed(algorithm: Algorithm, expected_len: usize) -> HashSpec {
    HashSpec {
        algorithm,
        expected_len: Some(expected_len),
        prefix: None,
    }
}

const fn tagged(algorithm: Algorithm, prefix: &'static str) -> HashSpec {
    HashSpec {
        algorithm,
        expected_len: None,
        prefix: Some(prefix),
    }
}

/// Hex length of an scrypt key. It collides with sha512 and sha3_512, so
/// scrypt is only admitted through the hex special case in [`identify`].
pub const SCRYPT_HEX_LEN: usize = 128;

/// Registry of digest shapes, one entry per algorithm.
pub const SPECS: &[HashSpec] = &[
    fixed(Algorithm::Crc32, 8),
    fixed(Algorithm::Md4, 32),
    fixed(Algorithm::Md5, 32),
    fixed(Algorithm::Ripemd160, 40),
    fixed(Algorithm::Sha1, 40),
    fixed(Algorithm::Sha1V2, 40),
    fixed(Algorithm::Sha224, 56),
    fixed(Algorithm::Sha256, 64),
    fixed(Algorithm::Sha3_224, 56),
    fixed(Algorithm::Sha3_256, 64),
    fixed(Algorithm::Sha3_384, 96),
    fixed(Algorithm::Sha3_512, 128),
    fixed(Algorithm::Sha512, 128),
    fixed(Algorithm::Blake2_224, 56),
    HashSpec {
        algorithm: Algorithm::Scrypt,
        expected_len: None,
        prefix: None,
    },
    tagged(Algorithm::Bcrypt, "$2"),
    tagged(Algorithm::Argon2id, "$argon2id$"),
];

impl Algorithm {
    /// Parse a user supplied identifier such as `sha3_256`.
    pub fn parse(id: &str) -> Result<Self, CrackError> {
        id.trim()
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| CrackError::UnknownAlgorithm(id.to_string()))
    }

    /// Stable identifier used on the command line and in events.
    pub fn id(self) -> &'static str {
        self.into()
    }

    pub fn spec(self) -> &'static HashSpec {
        SPECS
            .iter()
            .find(|s| s.algorithm == self)
            .unwrap_or_else(|| unreachable!("every algorithm has a spec"))
    }

    /// Whether the digest embeds its own marker, salt and parameters.
    pub fn is_self_describing(self) -> bool {
        self.spec().prefix.is_some()
    }

    /// Slow key-derivation schemes and sha512 are refused for exhaustive
    /// enumeration.
    pub fn supports_brute_force(self) -> bool {
        !matches!(
            self,
            Algorithm::Sha512 | Algorithm::Scrypt | Algorithm::Bcrypt | Algorithm::Argon2id
        )
    }
}

fn is_hex(digest: &str) -> bool {
    !digest.is_empty() && digest.chars().all(|c| c.is_ascii_hexdigit())
}

/// Return every algorithm that could have produced `digest`.
///
/// - A self-describing prefix wins outright and yields a single algorithm.
/// - Otherwise all algorithms with a matching fixed length are returned.
/// - A 128 character hex digest additionally admits scrypt.
pub fn identify(digest: &str) -> BTreeSet<Algorithm> {
    if let Some(spec) = SPECS
        .iter()
        .find(|s| s.prefix.is_some_and(|p| digest.starts_with(p)))
    {
        return BTreeSet::from([spec.algorithm]);
    }

    let len = digest.chars().count();
    let mut found: BTreeSet<Algorithm> = SPECS
        .iter()
        .filter(|s| s.expected_len == Some(len))
        .map(|s| s.algorithm)
        .collect();

    if len == SCRYPT_HEX_LEN && is_hex(digest) {
        found.insert(Algorithm::Scrypt);
    }
    found
}

/// Reject a target digest whose shape cannot come from `algorithm`.
pub fn validate_digest(algorithm: Algorithm, digest: &str) -> Result<(), CrackError> {
    let shape_error = |reason: String| CrackError::DigestShape {
        algorithm: algorithm.to_string(),
        reason,
    };

    if digest.is_empty() {
        return Err(shape_error("digest is empty".into()));
    }

    let spec = algorithm.spec();
    if let Some(prefix) = spec.prefix {
        if !digest.starts_with(prefix) {
            return Err(shape_error(format!("expected a digest starting with '{prefix}'")));
        }
        return Ok(());
    }

    let expected = spec.expected_len.unwrap_or(SCRYPT_HEX_LEN);
    let len = digest.chars().count();
    if len != expected {
        return Err(shape_error(format!(
            "expected {expected} characters, got {len}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_algorithm_has_exactly_one_spec() {
        for alg in Algorithm::iter() {
            let count = SPECS.iter().filter(|s| s.algorithm == alg).count();
            assert_eq!(count, 1, "{alg} has {count} specs");
        }
        assert_eq!(SPECS.len(), Algorithm::iter().count());
    }

    #[test]
    fn ids_roundtrip_through_parse() {
        for alg in Algorithm::iter() {
            assert_eq!(Algorithm::parse(alg.id()).unwrap(), alg);
        }
        assert_eq!(Algorithm::parse(" SHA1_V2 ").unwrap(), Algorithm::Sha1V2);
        assert!(matches!(
            Algorithm::parse("whirlpool"),
            Err(CrackError::UnknownAlgorithm(_))
        ));
    }

    #[test]
    fn slow_schemes_are_not_brute_forced() {
        assert!(!Algorithm::Bcrypt.supports_brute_force());
        assert!(!Algorithm::Scrypt.supports_brute_force());
        assert!(!Algorithm::Sha512.supports_brute_force());
        assert!(Algorithm::Sha3_512.supports_brute_force());
    }

    #[test]
    fn validate_rejects_wrong_length_and_prefix() {
        assert!(validate_digest(Algorithm::Md5, &"a".repeat(32)).is_ok());
        assert!(validate_digest(Algorithm::Md5, &"a".repeat(31)).is_err());
        assert!(validate_digest(Algorithm::Bcrypt, "nope").is_err());
        assert!(validate_digest(Algorithm::Argon2id, "$argon2i$v=19$").is_err());
        assert!(validate_digest(Algorithm::Scrypt, &"0".repeat(128)).is_ok());
        assert!(validate_digest(Algorithm::Sha1, "").is_err());
    }
}
