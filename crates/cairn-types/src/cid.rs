use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length in bytes of every digest carried by a [`Cid`].
pub const DIGEST_LEN: usize = 32;

/// Length in bytes of the canonical [`Cid`] encoding.
pub const CID_LEN: usize = 2 + DIGEST_LEN;

/// How the payload addressed by a [`Cid`] is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Codec {
    /// Opaque bytes with no outgoing links.
    Raw,
    /// An encoded DAG node carrying an ordered list of child links.
    DagNode,
}

impl Codec {
    /// The one-byte tag used in the canonical encoding.
    pub const fn tag(self) -> u8 {
        match self {
            Self::Raw => 0x55,
            Self::DagNode => 0x71,
        }
    }

    /// Parse a codec from its tag.
    pub fn from_tag(tag: u8) -> Result<Self, TypeError> {
        match tag {
            0x55 => Ok(Self::Raw),
            0x71 => Ok(Self::DagNode),
            other => Err(TypeError::UnknownCodec(other)),
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::DagNode => write!(f, "dag-node"),
        }
    }
}

/// The hash function that produced a [`Cid`]'s digest.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum HashCode {
    #[default]
    Blake3,
}

impl HashCode {
    /// The one-byte tag used in the canonical encoding.
    pub const fn tag(self) -> u8 {
        match self {
            Self::Blake3 => 0x1e,
        }
    }

    /// Parse a hash code from its tag.
    pub fn from_tag(tag: u8) -> Result<Self, TypeError> {
        match tag {
            0x1e => Ok(Self::Blake3),
            other => Err(TypeError::UnknownHashCode(other)),
        }
    }
}

/// Content identifier.
///
/// A `Cid` names a block by the digest of its bytes plus the addressing
/// metadata needed to interpret it. It is a plain value: two identifiers are
/// equal exactly when their canonical encodings are equal, which makes them
/// usable as set and map keys everywhere.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cid {
    codec: Codec,
    hash: HashCode,
    digest: [u8; DIGEST_LEN],
}

impl Cid {
    /// Build an identifier from a pre-computed digest.
    pub const fn new(codec: Codec, hash: HashCode, digest: [u8; DIGEST_LEN]) -> Self {
        Self {
            codec,
            hash,
            digest,
        }
    }

    /// Raw-codec identifier with the default hash code.
    pub const fn raw(digest: [u8; DIGEST_LEN]) -> Self {
        Self::new(Codec::Raw, HashCode::Blake3, digest)
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn hash_code(&self) -> HashCode {
        self.hash
    }

    /// The raw digest bytes.
    pub fn digest(&self) -> &[u8; DIGEST_LEN] {
        &self.digest
    }

    /// Same digest, different codec.
    pub fn with_codec(self, codec: Codec) -> Self {
        Self { codec, ..self }
    }

    /// Canonical encoding: `[codec tag][hash tag][digest]`.
    pub fn to_bytes(&self) -> [u8; CID_LEN] {
        let mut out = [0u8; CID_LEN];
        out[0] = self.codec.tag();
        out[1] = self.hash.tag();
        out[2..].copy_from_slice(&self.digest);
        out
    }

    /// Parse the canonical encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
        if bytes.len() != CID_LEN {
            return Err(TypeError::InvalidLength {
                expected: CID_LEN,
                actual: bytes.len(),
            });
        }
        let codec = Codec::from_tag(bytes[0])?;
        let hash = HashCode::from_tag(bytes[1])?;
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&bytes[2..]);
        Ok(Self::new(codec, hash, digest))
    }

    /// Hex-encoded canonical bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Short digest prefix (first 8 hex characters), for logs.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.digest[..4])
    }

    /// Parse from [`Cid::to_hex`] output.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({}:{})", self.codec, self.short_hex())
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Cid {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
