use digest::Digest;

/// Minimal incremental hash contract.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> Vec<u8>;
}

/// Adapter turning any RustCrypto [`Digest`] into a [`Hasher`].
pub struct DigestHasher<D: Digest + Send>(D);

impl<D: Digest + Send> DigestHasher<D> {
    pub fn new() -> Self { Self(D::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { D::digest(data).to_vec() }
}

impl<D: Digest + Send> Default for DigestHasher<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest + Send> Hasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) { Digest::update(&mut self.0, data); }
    fn finalize(self) -> Vec<u8> { self.0.finalize().to_vec() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use md5::Md5;
    use sha2::Sha256;

    #[test]
    fn test_sha256_hasher() {
        let mut hasher = DigestHasher::<Sha256>::new();
        hasher.update(b"hello world");
        let hash = hasher.finalize();

        let expected =
            hex::decode("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
                .unwrap();
        assert_eq!(hash, expected);
    }

    #[test]
    fn test_split_updates_match_one_shot() {
        let mut hasher = DigestHasher::<Md5>::new();
        hasher.update(b"This is a ");
        hasher.update(b"");
        hasher.update(b"simple string");

        assert_eq!(
            hasher.finalize(),
            DigestHasher::<Md5>::digest(b"This is a simple string")
        );
    }
}
