use digest::Digest;

/// Incremental hash accumulator.
///
/// `finalize` takes the boxed hasher so registries can hand out
/// `Box<dyn Hasher>` for any algorithm.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self: Box<Self>) -> Vec<u8>;
}

/// Adapter for any RustCrypto [`Digest`].
#[derive(Default)]
pub struct DigestHasher<D>(D);

impl<D: Digest> DigestHasher<D> {
    pub fn new() -> Self {
        Self(D::new())
    }
}

impl<D: Digest + Send> Hasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        let DigestHasher(digest) = *self;
        digest.finalize().to_vec()
    }
}

#[cfg(feature = "sha256")]
pub type Sha256Hasher = DigestHasher<sha2::Sha256>;

#[cfg(feature = "sha256")]
pub type Sha512Hasher = DigestHasher<sha2::Sha512>;

#[cfg(feature = "blake3")]
#[derive(Default)]
pub struct Blake3Hasher(blake3::Hasher);

#[cfg(feature = "blake3")]
impl Blake3Hasher {
    pub fn new() -> Self {
        Self(blake3::Hasher::new())
    }
}

#[cfg(feature = "blake3")]
impl Hasher for Blake3Hasher {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.0.finalize().as_bytes().to_vec()
    }
}

#[cfg(all(test, feature = "sha256"))]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hasher() {
        let mut hasher: Box<dyn Hasher> = Box::new(Sha256Hasher::new());
        hasher.update(b"hello ");
        hasher.update(b"world");

        assert_eq!(
            hex::encode(hasher.finalize()),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_sha512_length() {
        let hasher: Box<dyn Hasher> = Box::new(Sha512Hasher::new());
        assert_eq!(hasher.finalize().len(), 64);
    }
}
