use crate::error::{Error, Result};
use crate::utils::{Hash, ObjectType, RawObject};
use log::debug;
use std::{cell::RefCell, collections::HashMap};

/// Content-addressable object storage.
///
/// Objects are immutable: a hash always yields the same body, so callers never
/// need to invalidate anything they have read.
pub trait ObjectStore {
    /// Retrieve an object of the given type. Unknown hashes, and hashes naming
    /// an object of a different type, are `Error::ObjectNotFound`.
    fn get(&self, kind: ObjectType, hash: &Hash) -> Result<RawObject>;

    /// Store an object, returning the hash it is addressed by.
    ///
    /// Storing the same object twice yields the same hash.
    fn put(&self, object: &RawObject) -> Result<Hash>;
}

/// An in-memory object pool.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    map: RefCell<HashMap<Hash, RawObject>>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage {
            map: RefCell::new(HashMap::new()),
        }
    }

    /// Insert an object under an arbitrary hash, bypassing content addressing.
    pub fn insert(&self, hash: Hash, mut object: RawObject) {
        object.set_hash(hash);
        self.map.borrow_mut().insert(hash, object);
    }

    pub fn len(&self) -> usize {
        self.map.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.borrow().is_empty()
    }
}

impl ObjectStore for MemoryStorage {
    fn get(&self, kind: ObjectType, hash: &Hash) -> Result<RawObject> {
        match self.map.borrow().get(hash) {
            Some(object) if object.kind() == kind => Ok(object.clone()),
            _ => Err(Error::ObjectNotFound(*hash)),
        }
    }

    fn put(&self, object: &RawObject) -> Result<Hash> {
        let hash = Hash::for_object(object.kind(), object.body());
        let mut stored = object.clone();
        stored.set_hash(hash);
        stored.set_size(object.body().len() as u64);

        debug!("storing {} {}", object.kind(), hash);
        // hash collisions are not considered
        self.map.borrow_mut().insert(hash, stored);
        Ok(hash)
    }
}
