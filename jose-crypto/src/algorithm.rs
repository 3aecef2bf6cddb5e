use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Signature algorithms understood by the token engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    /// HMAC using SHA-256.
    HS256,
}

impl Algorithm {
    /// The label carried in a token header's `alg` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HS256" => Ok(Algorithm::HS256),
            _ => Err(crate::Error::UnsupportedAlgorithm),
        }
    }
}
