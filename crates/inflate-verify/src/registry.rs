use std::collections::BTreeMap;

use crate::hasher::Hasher;
use crate::{Result, VerificationError};

pub type HasherFactory = fn() -> Box<dyn Hasher>;

/// Maps algorithm identifiers (the part before `:` in a checksum
/// specification) to hasher constructors. Identifiers are case-sensitive.
#[derive(Clone, Debug)]
pub struct HasherRegistry {
    factories: BTreeMap<String, HasherFactory>,
}

impl HasherRegistry {
    /// A registry with no algorithms at all.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register `factory` under `algorithm`, replacing any previous entry.
    pub fn register(&mut self, algorithm: impl Into<String>, factory: HasherFactory) -> &mut Self {
        self.factories.insert(algorithm.into(), factory);
        self
    }

    pub fn contains(&self, algorithm: &str) -> bool {
        self.factories.contains_key(algorithm)
    }

    pub fn algorithms(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build a fresh hasher for `algorithm`.
    pub fn create(&self, algorithm: &str) -> Result<Box<dyn Hasher>> {
        self.factories
            .get(algorithm)
            .map(|factory| factory())
            .ok_or_else(|| VerificationError::UnsupportedAlgorithm {
                algorithm: algorithm.to_string(),
            })
    }
}

impl Default for HasherRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        #[cfg(feature = "sha256")]
        {
            registry.register("sha256", sha256);
            registry.register("sha512", sha512);
        }
        #[cfg(feature = "blake3")]
        registry.register("blake3", blake3);
        registry
    }
}

#[cfg(feature = "sha256")]
fn sha256() -> Box<dyn Hasher> {
    Box::new(crate::Sha256Hasher::new())
}

#[cfg(feature = "sha256")]
fn sha512() -> Box<dyn Hasher> {
    Box::new(crate::Sha512Hasher::new())
}

#[cfg(feature = "blake3")]
fn blake3() -> Box<dyn Hasher> {
    Box::new(crate::Blake3Hasher::new())
}
