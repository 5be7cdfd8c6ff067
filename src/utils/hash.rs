use crate::error::{Error, Result};
use crate::utils::ObjectType;
use sha2::{Digest, Sha256};
use std::fmt;

/// Width in bytes of every object hash (SHA-256).
pub const HASH_SIZE: usize = 32;

/// Content identifier of an immutable object. Treated as opaque by trees.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash(pub [u8; HASH_SIZE]);

impl Hash {
    pub const ZERO: Hash = Hash([0u8; HASH_SIZE]);

    pub fn from_hex(hex_str: &str) -> Result<Hash> {
        let bytes = hex::decode(hex_str.trim()).map_err(|_| Error::InvalidHash(hex_str.to_string()))?;
        if bytes.len() != HASH_SIZE {
            return Err(Error::InvalidHash(hex_str.to_string()));
        }

        let mut hash = [0u8; HASH_SIZE];
        hash.copy_from_slice(&bytes);
        Ok(Hash(hash))
    }

    /// Hash an object the way the stores address it: `"<type> <size>\0"` followed by the body.
    pub fn for_object(kind: ObjectType, body: &[u8]) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(format!("{} {}\0", kind, body.len()).as_bytes());
        hasher.update(body);

        let mut hash = [0u8; HASH_SIZE];
        hash.copy_from_slice(&hasher.finalize()[..]);
        Hash(hash)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Hash::ZERO
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
