//! Candidate verification against a target digest.
//!
//! [`DigestRegistry`] maps each [`Algorithm`] to a [`Scheme`] once at start
//! up. Workers only ever read it, so one registry is shared by every thread
//! of a job.

use std::collections::HashMap;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use blake2::digest::consts::U28;
use blake2::Blake2b;
use md4::Md4;
use md5::Md5;
use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha512};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};

use crate::hash_spec::Algorithm;

/// Computes the lowercase hex digest of a candidate's UTF-8 bytes.
pub type DigestFn = fn(&[u8]) -> Option<String>;

/// Checks a candidate against a self-describing digest.
pub type CheckFn = fn(&str, &str) -> bool;

/// How a registered algorithm decides a match.
#[derive(Clone, Copy)]
pub enum Scheme {
    /// Fixed-length output compared with exact string equality.
    Fixed(DigestFn),
    /// Salted, tagged hash verified by the scheme itself.
    SelfDescribing(CheckFn),
}

/// Decides whether a candidate produces the target digest.
///
/// Implementations must be pure functions of their inputs: the scheduler
/// calls them concurrently from every worker without locking.
pub trait Verifier: Send + Sync {
    fn verify(&self, candidate: &str, algorithm: Algorithm, target: &str) -> bool;

    /// Whether `algorithm` can be verified at all.
    fn supports(&self, _algorithm: Algorithm) -> bool {
        true
    }
}

/// Lookup table from algorithm to verification scheme.
#[derive(Clone, Default)]
pub struct DigestRegistry {
    schemes: HashMap<Algorithm, Scheme>,
}

fn hex_digest<D: Digest>(bytes: &[u8]) -> Option<String> {
    Some(hex::encode(D::digest(bytes)))
}

fn crc32_hex(bytes: &[u8]) -> Option<String> {
    Some(format!("{:08x}", crc32fast::hash(bytes)))
}

fn sha1_twice_hex(bytes: &[u8]) -> Option<String> {
    let first = Sha1::digest(bytes);
    Some(hex::encode(Sha1::digest(first.as_slice())))
}

/// Empty salt, N = 2^14, r = 8, p = 1, 64-byte key.
fn scrypt_hex(bytes: &[u8]) -> Option<String> {
    let params = scrypt::Params::new(14, 8, 1, 64).ok()?;
    let mut out = [0u8; 64];
    scrypt::scrypt(bytes, b"", &params, &mut out).ok()?;
    Some(hex::encode(out))
}

fn bcrypt_check(candidate: &str, target: &str) -> bool {
    bcrypt::verify(candidate, target).unwrap_or(false)
}

fn argon2id_check(candidate: &str, target: &str) -> bool {
    match PasswordHash::new(target) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

impl DigestRegistry {
    /// Empty registry; every verification fails until schemes are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in algorithm.
    pub fn standard() -> Self {
        let mut reg = Self::new();
        reg.register(Algorithm::Crc32, Scheme::Fixed(crc32_hex));
        reg.register(Algorithm::Md4, Scheme::Fixed(hex_digest::<Md4>));
        reg.register(Algorithm::Md5, Scheme::Fixed(hex_digest::<Md5>));
        reg.register(Algorithm::Ripemd160, Scheme::Fixed(hex_digest::<Ripemd160>));
        reg.register(Algorithm::Sha1, Scheme::Fixed(hex_digest::<Sha1>));
        reg.register(Algorithm::Sha1V2, Scheme::Fixed(sha1_twice_hex));
        reg.register(Algorithm::Sha224, Scheme::Fixed(hex_digest::<Sha224>));
        reg.register(Algorithm::Sha256, Scheme::Fixed(hex_digest::<Sha256>));
        reg.register(Algorithm::Sha3_224, Scheme::Fixed(hex_digest::<Sha3_224>));
        reg.register(Algorithm::Sha3_256, Scheme::Fixed(hex_digest::<Sha3_256>));
        reg.register(Algorithm::Sha3_384, Scheme::Fixed(hex_digest::<Sha3_384>));
        reg.register(Algorithm::Sha3_512, Scheme::Fixed(hex_digest::<Sha3_512>));
        reg.register(Algorithm::Sha512, Scheme::Fixed(hex_digest::<Sha512>));
        reg.register(Algorithm::Blake2_224, Scheme::Fixed(hex_digest::<Blake2b<U28>>));
        reg.register(Algorithm::Scrypt, Scheme::Fixed(scrypt_hex));
        reg.register(Algorithm::Bcrypt, Scheme::SelfDescribing(bcrypt_check));
        reg.register(Algorithm::Argon2id, Scheme::SelfDescribing(argon2id_check));
        reg
    }

    /// Add or replace the scheme used for `algorithm`.
    pub fn register(&mut self, algorithm: Algorithm, scheme: Scheme) {
        self.schemes.insert(algorithm, scheme);
    }

    pub fn scheme(&self, algorithm: Algorithm) -> Option<Scheme> {
        self.schemes.get(&algorithm).copied()
    }

    /// Hex digest of `candidate` for fixed-output algorithms.
    ///
    /// Returns `None` for self-describing schemes, which need a salt and
    /// parameters that only the target digest carries.
    pub fn digest_hex(&self, algorithm: Algorithm, candidate: &str) -> Option<String> {
        match self.scheme(algorithm)? {
            Scheme::Fixed(digest) => digest(candidate.as_bytes()),
            Scheme::SelfDescribing(_) => None,
        }
    }
}

impl Verifier for DigestRegistry {
    fn verify(&self, candidate: &str, algorithm: Algorithm, target: &str) -> bool {
        match self.scheme(algorithm) {
            Some(Scheme::Fixed(digest)) => {
                digest(candidate.as_bytes()).is_some_and(|hex| hex == target)
            }
            Some(Scheme::SelfDescribing(check)) => check(candidate, target),
            None => false,
        }
    }

    fn supports(&self, algorithm: Algorithm) -> bool {
        self.schemes.contains_key(&algorithm)
    }
}
