use crate::error::{Error, Result};
use crate::utils::{
    Blob, File, FileIter, FileMode, HASH_SIZE, Hash, ObjectStore, ObjectType, RawObject,
    TreeEntry, TreeWalker,
};
use log::trace;
use std::{
    borrow::Cow,
    cell::OnceCell,
    collections::HashMap,
    io::{self, BufRead, Read},
};

/// A directory: an ordered list of entries pointing at blobs, sub-trees and
/// submodules by hash.
///
/// Entry order is the stored order and is kept as-is when encoding. Name
/// lookups go through an index that is built on first use and dropped by
/// every method that changes the entries.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    pub hash: Hash,
    entries: Vec<TreeEntry>,
    index: OnceCell<HashMap<String, usize>>,
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.entries == other.entries
    }
}

impl Eq for Tree {}

impl Tree {
    pub fn new() -> Tree {
        Tree::default()
    }

    pub fn with_entries(entries: Vec<TreeEntry>) -> Tree {
        Tree {
            entries,
            ..Tree::default()
        }
    }

    /// Decode a tree from an object fetched from a store.
    pub fn from_object(object: &RawObject) -> Result<Tree> {
        let mut tree = Tree::new();
        tree.decode(object)?;
        Ok(tree)
    }

    /// Fetch and decode the tree stored under `hash`.
    pub fn load<S: ObjectStore + ?Sized>(store: &S, hash: &Hash) -> Result<Tree> {
        Tree::from_object(&store.get(ObjectType::Tree, hash)?)
    }

    /// The object id of the tree; always the current value of `hash`.
    pub fn id(&self) -> Hash {
        self.hash
    }

    pub fn kind(&self) -> ObjectType {
        ObjectType::Tree
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
        self.index.take();
    }

    /// Remove every entry called `name`, returning the last one removed.
    pub fn remove(&mut self, name: &str) -> Option<TreeEntry> {
        let mut removed = None;
        let mut kept = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.name == name {
                removed = Some(entry);
            } else {
                kept.push(entry);
            }
        }

        self.entries = kept;
        self.index.take();
        removed
    }

    pub fn set_entries(&mut self, entries: Vec<TreeEntry>) {
        self.entries = entries;
        self.index.take();
    }

    /// Put the entries in git's canonical order: bytewise by name, with
    /// directories compared as if their name ended in `/`.
    ///
    /// `encode` never reorders, so a tree built out of order only gets a
    /// stable hash if the caller sorts it first.
    pub fn sort(&mut self) {
        fn sort_key(entry: &TreeEntry) -> Cow<'_, [u8]> {
            if entry.is_dir() {
                let mut key = entry.name.as_bytes().to_vec();
                key.push(b'/');
                Cow::Owned(key)
            } else {
                Cow::Borrowed(entry.name.as_bytes())
            }
        }

        self.entries.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
        self.index.take();
    }

    fn index(&self) -> &HashMap<String, usize> {
        self.index.get_or_init(|| {
            let mut index = HashMap::with_capacity(self.entries.len());
            for (pos, entry) in self.entries.iter().enumerate() {
                // later duplicates overwrite earlier ones
                index.insert(entry.name.clone(), pos);
            }
            index
        })
    }

    /// Look up a direct child by name.
    pub fn entry(&self, name: &str) -> Result<&TreeEntry> {
        match self.index().get(name) {
            Some(&pos) => Ok(&self.entries[pos]),
            None => Err(Error::EntryNotFound(name.to_string())),
        }
    }

    /// Fetch the sub-tree called `name`.
    pub fn dir<S: ObjectStore + ?Sized>(&self, store: &S, name: &str) -> Result<Tree> {
        let not_found = || Error::DirectoryNotFound(name.to_string());

        let entry = self.entry(name).map_err(|_| not_found())?;
        if !entry.is_dir() {
            return Err(not_found());
        }

        Tree::load(store, &entry.hash).map_err(|_| not_found())
    }

    /// Resolve a `/`-separated path relative to this tree.
    pub fn find_entry<S: ObjectStore + ?Sized>(&self, store: &S, path: &str) -> Result<TreeEntry> {
        let (dirs, base_name) = match path.rsplit_once('/') {
            Some((dirs, base_name)) => (Some(dirs), base_name),
            None => (None, path),
        };

        let mut tree = Cow::Borrowed(self);
        if let Some(dirs) = dirs {
            for part in dirs.split('/') {
                tree = Cow::Owned(tree.dir(store, part)?);
            }
        }

        tree.entry(base_name).cloned()
    }

    /// Return the file at `path`, relative to this tree.
    pub fn file<S: ObjectStore + ?Sized>(&self, store: &S, path: &str) -> Result<File> {
        let entry = self
            .find_entry(store, path)
            .map_err(|_| Error::FileNotFound(path.to_string()))?;

        let blob = Blob::decode(&store.get(ObjectType::Blob, &entry.hash)?)?;
        Ok(File::new(path, entry.mode, blob))
    }

    /// Walk the entries of this tree, descending into sub-trees when `recursive` is set.
    pub fn walk<'a, S: ObjectStore + ?Sized>(&'a self, store: &'a S, recursive: bool) -> TreeWalker<'a, S> {
        TreeWalker::new(store, self, recursive)
    }

    /// Iterate over every file below this tree.
    pub fn files<'a, S: ObjectStore + ?Sized>(&'a self, store: &'a S) -> FileIter<'a, S> {
        FileIter::new(store, self)
    }

    /// Replace the contents of this tree with the decoded `object`.
    pub fn decode(&mut self, object: &RawObject) -> Result<()> {
        if object.kind() != ObjectType::Tree {
            return Err(Error::UnsupportedObject(object.kind()));
        }

        self.hash = object.hash();
        self.entries.clear();
        self.index.take();

        let mut reader = object.reader();
        loop {
            let mut mode = Vec::new();
            if reader.read_until(b' ', &mut mode)? == 0 {
                break; // clean end on a record boundary
            }
            if mode.pop() != Some(b' ') {
                return Err(truncated("mode"));
            }
            let mode = std::str::from_utf8(&mode)
                .ok()
                .and_then(FileMode::from_octal)
                .ok_or_else(|| Error::InvalidMode(String::from_utf8_lossy(&mode).into_owned()))?;

            let mut name = Vec::new();
            reader.read_until(0, &mut name)?;
            if name.pop() != Some(0) {
                return Err(truncated("name"));
            }
            let name = String::from_utf8(name).map_err(|_| Error::InvalidName)?;

            let mut hash = [0u8; HASH_SIZE];
            reader.read_exact(&mut hash)?;

            trace!("decoded entry {:?} {} {}", mode, name, Hash(hash));
            self.entries.push(TreeEntry::new(name, mode, Hash(hash)));
        }

        Ok(())
    }

    /// Write this tree's records into `object`, in stored order, replacing
    /// any body it already had.
    pub fn encode(&self, object: &mut RawObject) -> Result<()> {
        object.set_kind(ObjectType::Tree);

        let w = object.writer();
        w.clear();
        let mut size = 0;
        for entry in &self.entries {
            size += entry.write(w)?;
        }

        object.set_size(size as u64);
        Ok(())
    }

    /// Encode and store this tree, recording the hash it was stored under.
    pub fn store<S: ObjectStore + ?Sized>(&mut self, store: &S) -> Result<Hash> {
        let mut object = RawObject::new(ObjectType::Tree);
        self.encode(&mut object)?;
        self.hash = store.put(&object)?;
        Ok(self.hash)
    }
}

fn truncated(field: &str) -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("tree record ends inside its {}", field),
    ))
}
