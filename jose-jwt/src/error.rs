/// Hard failures from the encode and decode paths.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The token string is not three non-empty dot-separated segments.
    #[error("malformed token: expected three non-empty dot-separated segments")]
    MalformedToken,

    /// A required claim was never supplied to the builder.
    #[error("missing claim: {0}")]
    MissingClaim(&'static str),

    /// A segment is not valid base64.
    #[error(transparent)]
    Base64(#[from] jose_b64::DecodeError),

    /// A decoded segment is not valid UTF-8.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A decoded segment is not the expected JSON object.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Signing failed.
    #[error(transparent)]
    Crypto(#[from] jose_crypto::Error),
}

/// First verification check that failed, kept on the token for inspection.
///
/// `Display` renders the label surfaced to callers, e.g. `invalid_issuer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// Header `typ` is not `"JWT"`.
    #[error("invalid_type")]
    InvalidType,

    /// Header `alg` names an algorithm the engine does not support.
    #[error("unsupported_algorithm")]
    UnsupportedAlgorithm,

    /// Payload `iss` differs from the expected issuer.
    #[error("invalid_issuer")]
    InvalidIssuer,

    /// The expected audience is not in the payload's audience list.
    #[error("invalid_audience")]
    InvalidAudience,

    /// Payload `exp` lies in the past.
    #[error("expired_token")]
    ExpiredToken,

    /// Payload `iat` lies outside the acceptance window.
    #[error("expired_issued_at")]
    ExpiredIssuedAt,

    /// Payload `nonce` differs from the expected nonce.
    #[error("invalid_nonce")]
    InvalidNonce,

    /// The signature does not match the token contents.
    #[error("invalid_signature")]
    InvalidSignature,

    /// The token string or one of its segments cannot be decoded.
    #[error("malformed_token")]
    MalformedToken,
}
