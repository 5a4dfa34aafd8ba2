use std::fmt;
use std::str::FromStr;

use crate::{Result, VerificationError};

/// A parsed `"<algorithm>:<hex-digest>"` string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecksumSpec {
    algorithm: String,
    digest: String,
}

impl ChecksumSpec {
    /// Split `spec` at its first `:`. Anything without a separator is rejected;
    /// whether the algorithm is known is decided by a registry later.
    pub fn parse(spec: &str) -> Result<Self> {
        let (algorithm, digest) =
            spec.split_once(':')
                .ok_or_else(|| VerificationError::MalformedSpec {
                    spec: spec.to_string(),
                })?;

        Ok(Self {
            algorithm: algorithm.to_string(),
            digest: digest.to_string(),
        })
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Expected digest, lowercase hex.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl FromStr for ChecksumSpec {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ChecksumSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.digest)
    }
}
