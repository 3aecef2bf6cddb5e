//! Keyed signing primitives for the jose token engine.
//!
//! A signature is a keyed-hash message authentication code over an arbitrary
//! byte string. [`sign`] produces the raw MAC bytes; [`verify`] recomputes
//! and compares in constant time. Both are deterministic: identical inputs
//! always yield identical results.

mod algorithm;

pub use algorithm::Algorithm;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The algorithm name is not recognized.
    #[error("unsupported algorithm")]
    UnsupportedAlgorithm,
    /// The secret is structurally unusable as a key.
    #[error("invalid key: {0}")]
    InvalidKey(&'static str),
    /// The signature does not match the message.
    #[error("invalid signature")]
    InvalidSignature,
}

/// Compute the signature of `message` keyed by `secret`.
pub fn sign(message: &[u8], secret: &[u8], algorithm: Algorithm) -> Result<Vec<u8>, Error> {
    let mut mac = keyed_mac(secret, algorithm)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Recompute the signature of `message` and compare it against `signature`.
///
/// The comparison is constant-time; a mismatch is [`Error::InvalidSignature`].
pub fn verify(
    message: &[u8],
    secret: &[u8],
    algorithm: Algorithm,
    signature: &[u8],
) -> Result<(), Error> {
    let mut mac = keyed_mac(secret, algorithm)?;
    mac.update(message);
    mac.verify_slice(signature)
        .map_err(|_| Error::InvalidSignature)
}

fn keyed_mac(secret: &[u8], algorithm: Algorithm) -> Result<HmacSha256, Error> {
    if secret.is_empty() {
        return Err(Error::InvalidKey("secret must not be empty"));
    }
    match algorithm {
        // HMAC accepts keys of any non-zero length; over-long keys are
        // hashed down per RFC 2104.
        Algorithm::HS256 => HmacSha256::new_from_slice(secret)
            .map_err(|_| Error::InvalidKey("secret rejected by HMAC-SHA-256")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc4231_case_2() {
        let sig = sign(
            b"what do ya want for nothing?",
            b"Jefe",
            Algorithm::HS256,
        )
        .unwrap();
        assert_eq!(
            hex::encode(&sig),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn sign_is_deterministic() {
        let a = sign(b"message", b"secret", Algorithm::HS256).unwrap();
        let b = sign(b"message", b"secret", Algorithm::HS256).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn verify_round_trip() {
        let sig = sign(b"message", b"secret", Algorithm::HS256).unwrap();
        verify(b"message", b"secret", Algorithm::HS256, &sig).unwrap();
    }

    #[test]
    fn verify_rejects_tampering() {
        let mut sig = sign(b"message", b"secret", Algorithm::HS256).unwrap();
        sig[0] ^= 0x01;
        assert_eq!(
            verify(b"message", b"secret", Algorithm::HS256, &sig),
            Err(Error::InvalidSignature)
        );
        let sig = sign(b"message", b"secret", Algorithm::HS256).unwrap();
        assert_eq!(
            verify(b"other message", b"secret", Algorithm::HS256, &sig),
            Err(Error::InvalidSignature)
        );
        assert_eq!(
            verify(b"message", b"other secret", Algorithm::HS256, &sig),
            Err(Error::InvalidSignature)
        );
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(
            sign(b"message", b"", Algorithm::HS256),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            verify(b"message", b"", Algorithm::HS256, &[0; 32]),
            Err(Error::InvalidKey(_))
        ));
    }
}
