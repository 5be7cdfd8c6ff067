use crate::error::Error;
use crate::utils::Hash;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Commit,
    Tree,
    Blob,
    Tag,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Commit => "commit",
            ObjectType::Tree => "tree",
            ObjectType::Blob => "blob",
            ObjectType::Tag => "tag",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commit" => Ok(ObjectType::Commit),
            "tree" => Ok(ObjectType::Tree),
            "blob" => Ok(ObjectType::Blob),
            "tag" => Ok(ObjectType::Tag),
            _ => Err(Error::CorruptObject(format!("unknown object type {:?}", s))),
        }
    }
}

/// An object as it travels to and from a store: its type, declared size,
/// hash and raw body. Encoders fill one in through `set_kind`, `set_size`
/// and `writer`.
///
/// Unless a store has pinned it with `set_hash`, the hash is computed from
/// the current type and body. Changing either drops a pinned hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    kind: ObjectType,
    size: u64,
    hash: Option<Hash>,
    body: Vec<u8>,
}

impl RawObject {
    pub fn new(kind: ObjectType) -> Self {
        RawObject {
            kind,
            size: 0,
            hash: None,
            body: Vec::new(),
        }
    }

    pub fn with_body(kind: ObjectType, body: Vec<u8>) -> Self {
        RawObject {
            kind,
            size: body.len() as u64,
            hash: None,
            body,
        }
    }

    pub fn kind(&self) -> ObjectType {
        self.kind
    }

    pub fn set_kind(&mut self, kind: ObjectType) {
        self.kind = kind;
        self.hash = None;
    }

    /// The declared size. Matches `body().len()` for anything read from a store.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn set_size(&mut self, size: u64) {
        self.size = size;
    }

    pub fn hash(&self) -> Hash {
        self.hash
            .unwrap_or_else(|| Hash::for_object(self.kind, &self.body))
    }

    /// Pin the hash the object is addressed by, e.g. the key a store read it under.
    pub fn set_hash(&mut self, hash: Hash) {
        self.hash = Some(hash);
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn reader(&self) -> &[u8] {
        &self.body
    }

    pub fn writer(&mut self) -> &mut Vec<u8> {
        self.hash = None;
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_type_names() {
        for kind in [ObjectType::Commit, ObjectType::Tree, ObjectType::Blob, ObjectType::Tag] {
            assert_eq!(kind.to_string().parse::<ObjectType>().unwrap(), kind);
        }
        assert!("dir".parse::<ObjectType>().is_err());
    }

    #[test]
    fn with_body_sets_size_and_hash() {
        let object = RawObject::with_body(ObjectType::Blob, b"hello".to_vec());
        assert_eq!(object.size(), 5);
        assert_eq!(object.hash(), Hash::for_object(ObjectType::Blob, b"hello"));
        assert_eq!(object.body(), b"hello");
    }

    #[test]
    fn hash_follows_content() {
        let mut object = RawObject::new(ObjectType::Blob);
        assert_eq!(object.hash(), Hash::for_object(ObjectType::Blob, b""));

        object.writer().extend_from_slice(b"abc");
        assert_eq!(object.hash(), Hash::for_object(ObjectType::Blob, b"abc"));

        object.set_kind(ObjectType::Tree);
        assert_eq!(object.hash(), Hash::for_object(ObjectType::Tree, b"abc"));
    }

    #[test]
    fn pinned_hash_dropped_on_change() {
        let mut object = RawObject::with_body(ObjectType::Blob, b"abc".to_vec());
        object.set_hash(Hash::ZERO);
        assert_eq!(object.hash(), Hash::ZERO);
        object.set_size(3);
        assert_eq!(object.hash(), Hash::ZERO);

        object.writer().push(b'd');
        assert_eq!(object.hash(), Hash::for_object(ObjectType::Blob, b"abcd"));

        object.set_hash(Hash::ZERO);
        object.set_kind(ObjectType::Tree);
        assert_eq!(object.hash(), Hash::for_object(ObjectType::Tree, b"abcd"));
    }
}
