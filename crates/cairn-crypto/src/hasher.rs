use cairn_types::{Cid, Codec, HashCode, DIGEST_LEN};

/// Content hasher bound to one [`HashCode`].
///
/// The digest covers the payload bytes only, never the codec, so the same
/// bytes addressed as raw data or as a DAG node share a digest and differ
/// only in their codec tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHasher {
    code: HashCode,
}

impl ContentHasher {
    /// BLAKE3 hasher.
    pub const BLAKE3: Self = Self {
        code: HashCode::Blake3,
    };

    /// Hasher for the given hash code.
    pub const fn for_code(code: HashCode) -> Self {
        Self { code }
    }

    /// Hasher matching the hash code recorded in `cid`.
    pub fn for_cid(cid: &Cid) -> Self {
        Self::for_code(cid.hash_code())
    }

    /// Digest of `data`.
    pub fn digest(&self, data: &[u8]) -> [u8; DIGEST_LEN] {
        match self.code {
            HashCode::Blake3 => *blake3::hash(data).as_bytes(),
        }
    }

    /// Identifier for `data` under `codec`.
    pub fn cid(&self, codec: Codec, data: &[u8]) -> Cid {
        Cid::new(codec, self.code, self.digest(data))
    }

    /// Verify that `data` hashes to `expected`'s digest.
    pub fn verify(&self, data: &[u8], expected: &Cid) -> bool {
        self.digest(data) == *expected.digest()
    }

    /// The hash code this hasher computes.
    pub fn code(&self) -> HashCode {
        self.code
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::for_code(HashCode::default())
    }
}
