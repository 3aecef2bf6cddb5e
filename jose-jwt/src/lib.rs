//! JSON Web Token issuing and verification over a shared secret.
//!
//! A token is three URL-safe base64 segments joined by `.`:
//! `header.payload.signature`. [`JwtBuilder`] assembles the claim set and
//! produces the token string; [`JsonWebToken`] wraps a received string,
//! decodes it lazily, and runs the verification checks in a fixed order,
//! recording the first failure for later inspection.
//!
//! The signing input is the concatenation of the raw header and payload JSON
//! texts, with no separator. This is the format's defining quirk: unlike
//! RFC 7515, the base64 segments themselves are not what gets signed.
//!
//! ```
//! use jose_jwt::{Algorithm, JsonWebToken};
//!
//! let now = chrono::Utc::now().timestamp();
//! let token = JsonWebToken::builder()
//!     .issuer("example.com")
//!     .audience(["client_id"])
//!     .expiration(now + 3600)
//!     .nonce("abcdefg")
//!     .encode("secret", Algorithm::HS256)?;
//!
//! let mut token = JsonWebToken::new(token);
//! assert!(token.verify("secret", "example.com", "client_id", "abcdefg"));
//! # Ok::<(), jose_jwt::Error>(())
//! ```

mod claims;
mod error;

pub use claims::Claims;
pub use error::{Error, VerifyError};
pub use jose_crypto::Algorithm;

use chrono::Utc;
use jose_b64::Variant;
use serde::{Deserialize, Serialize};

/// Expected value of the header `typ` field.
pub const TOKEN_TYPE: &str = "JWT";

/// Default acceptance window for the `iat` claim, in seconds.
pub const DEFAULT_ISSUED_AT_LIMIT: i64 = 600;

/// Token header: `{"alg":"HS256","typ":"JWT"}`.
///
/// Both fields stay plain strings so that a token carrying an unknown
/// algorithm or type still decodes, letting verification report the
/// offending label instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signature algorithm label.
    pub alg: String,
    /// Token type.
    pub typ: String,
}

/// Claim set under construction; consumed by [`JwtBuilder::encode`].
#[derive(Debug, Clone, Default)]
pub struct JwtBuilder {
    issuer: Option<String>,
    audience: Vec<String>,
    expiration: Option<i64>,
    nonce: Option<String>,
}

impl JwtBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Add one or more intended audiences, preserving order.
    pub fn audience<I, S>(mut self, audience: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audience.extend(audience.into_iter().map(Into::into));
        self
    }

    /// Expiration time, seconds since the Unix epoch.
    pub fn expiration(mut self, expiration: i64) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Consume the claim set and produce the signed token string.
    ///
    /// Stamps `iat` with the current time. Fails with
    /// [`Error::MissingClaim`] if any of issuer, audience, expiration, or
    /// nonce was never supplied.
    pub fn encode(self, secret: &str, algorithm: Algorithm) -> Result<String, Error> {
        let header = Header {
            alg: algorithm.to_string(),
            typ: TOKEN_TYPE.to_string(),
        };
        let claims = Claims {
            iss: self.issuer.ok_or(Error::MissingClaim("iss"))?,
            aud: match self.audience {
                aud if aud.is_empty() => return Err(Error::MissingClaim("aud")),
                aud => aud,
            },
            exp: self.expiration.ok_or(Error::MissingClaim("exp"))?,
            iat: Utc::now().timestamp(),
            nonce: self.nonce.ok_or(Error::MissingClaim("nonce"))?,
        };

        let header_json = serde_json::to_string(&header)?;
        let payload_json = serde_json::to_string(&claims)?;

        let signing_input = signing_input(&header_json, &payload_json);
        let signature = jose_crypto::sign(&signing_input, secret.as_bytes(), algorithm)?;

        Ok([
            jose_b64::encode(&header_json, Variant::UrlSafe),
            jose_b64::encode(&payload_json, Variant::UrlSafe),
            jose_b64::encode(&signature, Variant::UrlSafe),
        ]
        .join("."))
    }
}

/// A received token string and its lazily decoded parts.
#[derive(Debug, Clone)]
pub struct JsonWebToken {
    raw: String,
    decoded: Option<Decoded>,
    verify_error: Option<VerifyError>,
    verify_error_detail: Option<String>,
    issued_at_limit: i64,
}

#[derive(Debug, Clone)]
struct Decoded {
    header: Header,
    claims: Claims,
    // Raw JSON texts are retained because they are the signing input.
    header_json: String,
    payload_json: String,
    // The signature segment stays opaque until the signature check runs.
    signature: String,
}

impl JsonWebToken {
    /// Wrap a token string received from a caller. Nothing is decoded yet.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            raw: token.into(),
            decoded: None,
            verify_error: None,
            verify_error_detail: None,
            issued_at_limit: DEFAULT_ISSUED_AT_LIMIT,
        }
    }

    /// Start building a new token.
    pub fn builder() -> JwtBuilder {
        JwtBuilder::new()
    }

    /// The token string as received.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Decode the token into header, payload, and signature segment.
    ///
    /// Idempotent: once decoded, the derived state is immutable and further
    /// calls return `Ok` without re-parsing.
    pub fn decode(&mut self) -> Result<(), Error> {
        if self.decoded.is_some() {
            return Ok(());
        }
        let (header_segment, payload_segment, signature_segment) = split_token(&self.raw)?;
        let header_json = String::from_utf8(jose_b64::decode(header_segment, Variant::UrlSafe)?)?;
        let payload_json = String::from_utf8(jose_b64::decode(payload_segment, Variant::UrlSafe)?)?;
        let header: Header = serde_json::from_str(&header_json)?;
        let claims: Claims = serde_json::from_str(&payload_json)?;
        self.decoded = Some(Decoded {
            header,
            claims,
            header_json,
            payload_json,
            signature: signature_segment.to_string(),
        });
        Ok(())
    }

    /// Decoded header, if [`decode`](Self::decode) has succeeded.
    pub fn header(&self) -> Option<&Header> {
        self.decoded.as_ref().map(|decoded| &decoded.header)
    }

    /// Decoded payload claims, if [`decode`](Self::decode) has succeeded.
    pub fn payload(&self) -> Option<&Claims> {
        self.decoded.as_ref().map(|decoded| &decoded.claims)
    }

    /// The signature segment text, if [`decode`](Self::decode) has succeeded.
    pub fn signature(&self) -> Option<&str> {
        self.decoded.as_ref().map(|decoded| decoded.signature.as_str())
    }

    /// Adjust the acceptance window for the `iat` claim, in seconds.
    pub fn set_issued_at_limit(&mut self, seconds: i64) {
        self.issued_at_limit = seconds;
    }

    /// Check the token against the shared secret and the expected claims.
    ///
    /// Decodes first if needed. Checks run in a fixed order (type,
    /// algorithm, issuer, audience membership, expiration, issuance age,
    /// nonce, signature); the first failure is recorded (see
    /// [`verify_error`](Self::verify_error)) and reported as `false`.
    pub fn verify(&mut self, secret: &str, issuer: &str, audience: &str, nonce: &str) -> bool {
        self.verify_at(secret, issuer, audience, nonce, Utc::now().timestamp())
    }

    fn verify_at(
        &mut self,
        secret: &str,
        issuer: &str,
        audience: &str,
        nonce: &str,
        now: i64,
    ) -> bool {
        if let Err(err) = self.decode() {
            return self.record(Err((
                VerifyError::MalformedToken,
                format!("the token cannot be decoded: {err}."),
            )));
        }
        let outcome = match &self.decoded {
            Some(decoded) => decoded.check(
                secret,
                issuer,
                audience,
                nonce,
                now,
                self.issued_at_limit,
            ),
            None => Err((
                VerifyError::MalformedToken,
                "the token has not been decoded.".to_string(),
            )),
        };
        self.record(outcome)
    }

    fn record(&mut self, outcome: Result<(), (VerifyError, String)>) -> bool {
        match outcome {
            Ok(()) => {
                self.verify_error = None;
                self.verify_error_detail = None;
                true
            }
            Err((kind, detail)) => {
                tracing::warn!("token verification failed: {}: {}", kind, detail);
                self.verify_error = Some(kind);
                self.verify_error_detail = Some(detail);
                false
            }
        }
    }

    /// The check that failed on the most recent [`verify`](Self::verify).
    pub fn verify_error(&self) -> Option<VerifyError> {
        self.verify_error
    }

    /// Diagnostic detail for the failed check, naming the offending and
    /// expected values. Never use it for control flow.
    pub fn verify_error_detail(&self) -> Option<&str> {
        self.verify_error_detail.as_deref()
    }
}

impl Decoded {
    fn check(
        &self,
        secret: &str,
        issuer: &str,
        audience: &str,
        nonce: &str,
        now: i64,
        issued_at_limit: i64,
    ) -> Result<(), (VerifyError, String)> {
        let header = &self.header;
        let claims = &self.claims;

        if header.typ != TOKEN_TYPE {
            return Err((
                VerifyError::InvalidType,
                format!(
                    "\"{}\" is an invalid token type. the expected type is \"{TOKEN_TYPE}\".",
                    header.typ
                ),
            ));
        }

        let algorithm: Algorithm = match header.alg.parse() {
            Ok(algorithm) => algorithm,
            Err(_) => {
                return Err((
                    VerifyError::UnsupportedAlgorithm,
                    format!(
                        "\"{}\" is an unsupported algorithm. the supported algorithm is \"{}\".",
                        header.alg,
                        Algorithm::HS256
                    ),
                ))
            }
        };

        if claims.iss != issuer {
            return Err((
                VerifyError::InvalidIssuer,
                format!(
                    "\"{}\" is an invalid issuer. the expected issuer is \"{issuer}\".",
                    claims.iss
                ),
            ));
        }

        if !claims.has_audience(audience) {
            return Err((
                VerifyError::InvalidAudience,
                format!(
                    "{:?} does not contain the expected audience \"{audience}\".",
                    claims.aud
                ),
            ));
        }

        if claims.exp < now {
            return Err((
                VerifyError::ExpiredToken,
                format!(
                    "the token expired at {}. the current time is {now}.",
                    claims.exp
                ),
            ));
        }

        if now - claims.iat > issued_at_limit {
            return Err((
                VerifyError::ExpiredIssuedAt,
                format!(
                    "the token was issued at {}, more than {issued_at_limit} seconds before the current time {now}.",
                    claims.iat
                ),
            ));
        }

        if claims.nonce != nonce {
            return Err((
                VerifyError::InvalidNonce,
                format!(
                    "\"{}\" is an invalid nonce. the expected nonce is \"{nonce}\".",
                    claims.nonce
                ),
            ));
        }

        let signature = match jose_b64::decode(&self.signature, Variant::UrlSafe) {
            Ok(signature) => signature,
            Err(err) => {
                return Err((
                    VerifyError::MalformedToken,
                    format!("the signature segment cannot be decoded: {err}."),
                ))
            }
        };
        let signing_input = signing_input(&self.header_json, &self.payload_json);
        if jose_crypto::verify(&signing_input, secret.as_bytes(), algorithm, &signature).is_err() {
            return Err((
                VerifyError::InvalidSignature,
                format!(
                    "\"{}\" is not a valid signature for the token contents.",
                    self.signature
                ),
            ));
        }

        Ok(())
    }
}

/// The bytes that get signed: the two raw JSON texts back to back.
fn signing_input(header_json: &str, payload_json: &str) -> Vec<u8> {
    [header_json.as_bytes(), payload_json.as_bytes()].concat()
}

fn split_token(token: &str) -> Result<(&str, &str, &str), Error> {
    let mut parts = token.splitn(4, '.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok((header, payload, signature))
        }
        _ => Err(Error::MalformedToken),
    }
}
