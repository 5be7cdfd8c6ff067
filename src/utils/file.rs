use crate::error::{Error, Result};
use crate::utils::{FileMode, Hash, ObjectStore, ObjectType, RawObject, Tree, TreeWalker};

/// File content, addressed by hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub hash: Hash,
    pub size: u64,
    content: Vec<u8>,
}

impl Blob {
    pub fn decode(object: &RawObject) -> Result<Blob> {
        if object.kind() != ObjectType::Blob {
            return Err(Error::UnsupportedObject(object.kind()));
        }

        Ok(Blob {
            hash: object.hash(),
            size: object.size(),
            content: object.body().to_vec(),
        })
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// A blob found at some path in a tree, with the mode it was stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub name: String,
    pub mode: FileMode,
    pub blob: Blob,
}

impl File {
    pub fn new(name: impl Into<String>, mode: FileMode, blob: Blob) -> File {
        File {
            name: name.into(),
            mode,
            blob,
        }
    }

    pub fn hash(&self) -> Hash {
        self.blob.hash
    }

    pub fn bytes(&self) -> &[u8] {
        self.blob.content()
    }

    pub fn contents(&self) -> Result<String> {
        String::from_utf8(self.blob.content().to_vec()).map_err(|err| {
            Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
        })
    }
}

/// Iterates over every file below a tree, recursively, in walk order.
pub struct FileIter<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    walker: TreeWalker<'a, S>,
}

impl<'a, S: ObjectStore + ?Sized> FileIter<'a, S> {
    pub fn new(store: &'a S, tree: &'a Tree) -> Self {
        FileIter {
            store,
            walker: TreeWalker::new(store, tree, true),
        }
    }

    pub fn close(&mut self) {
        self.walker.close();
    }
}

impl<S: ObjectStore + ?Sized> Iterator for FileIter<'_, S> {
    type Item = Result<File>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (path, entry) = match self.walker.next()? {
                Ok(item) => item,
                Err(err) => return Some(Err(err)),
            };

            if entry.is_dir() {
                continue;
            }

            let file = self
                .store
                .get(ObjectType::Blob, &entry.hash)
                .and_then(|object| Blob::decode(&object))
                .map(|blob| File::new(path, entry.mode, blob));
            return Some(file);
        }
    }
}
