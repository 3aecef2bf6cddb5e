use serde::{Deserialize, Serialize};

/// Registered claims carried in the token payload.
///
/// Field order is wire order: `iss`, `aud`, `exp`, `iat`, `nonce`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer of the token.
    pub iss: String,
    /// Intended audiences, one or more.
    pub aud: Vec<String>,
    /// Expiration time, seconds since the Unix epoch.
    pub exp: i64,
    /// Issuance time, seconds since the Unix epoch; stamped at encode time.
    pub iat: i64,
    /// Caller-supplied one-time value binding the token to a request.
    pub nonce: String,
}

impl Claims {
    /// Whether `audience` is one of the intended audiences.
    pub fn has_audience(&self, audience: &str) -> bool {
        self.aud.iter().any(|aud| aud == audience)
    }
}
