//! Streaming checksum verification.
//!
//! A [`HashingReader`] sits between a byte source and its consumer, hashing
//! every byte as it passes. Once the consumer is done,
//! [`HashingReader::validate_checksum`] drains the rest of the source and
//! compares the digest against a `"<algorithm>:<hex>"` specification.
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//! use inflate_verify::HashingReader;
//!
//! let spec = "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
//! let mut reader = HashingReader::new(&b"hello world"[..], spec).unwrap();
//!
//! let mut head = [0u8; 5];
//! reader.read_exact(&mut head).unwrap();
//!
//! reader.validate_checksum().unwrap();
//! ```

pub use self::checksum::ChecksumSpec;
pub use self::error::{Result, VerificationError};
pub use self::hasher::{DigestHasher, Hasher};
pub use self::reader::HashingReader;
pub use self::registry::{HasherFactory, HasherRegistry};

#[cfg(feature = "sha256")]
pub use self::hasher::{Sha256Hasher, Sha512Hasher};

#[cfg(feature = "blake3")]
pub use self::hasher::Blake3Hasher;

mod checksum;
mod error;
mod hasher;
mod reader;
mod registry;
