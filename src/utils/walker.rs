use crate::error::{Error, Result};
use crate::utils::{ObjectStore, Tree, TreeEntry};
use log::{debug, warn};
use std::borrow::Cow;

/// Deepest stack a walk may build before giving up. Real trees never get
/// close; hitting it means bad data or a self-referencing tree.
pub const MAX_TREE_DEPTH: usize = 1024;

const STARTING_STACK_SIZE: usize = 8;

/// What a walker does when a sub-tree cannot be fetched or decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingTree {
    /// Treat the whole walk as finished.
    #[default]
    EndWalk,
    /// Yield the error, then finish.
    Propagate,
}

/// A tree being enumerated, with the position of the next entry to return.
#[derive(Debug)]
struct Frame<'a> {
    tree: Cow<'a, Tree>,
    pos: usize,
}

impl Frame<'_> {
    fn next(&mut self) -> Option<TreeEntry> {
        let entry = self.tree.entries().get(self.pos)?.clone();
        self.pos += 1;
        Some(entry)
    }
}

/// Depth-first, pre-order walk over a tree, yielding `(path, entry)` pairs.
///
/// Entries come out in stored order. A directory is returned before anything
/// below it, and everything below it before its next sibling. Submodules are
/// skipped. Sub-trees are fetched lazily from the store as the walk reaches
/// them.
pub struct TreeWalker<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    stack: Vec<Frame<'a>>,
    base: String,
    recursive: bool,
    on_missing: MissingTree,
}

impl<'a, S: ObjectStore + ?Sized> TreeWalker<'a, S> {
    pub fn new(store: &'a S, tree: &'a Tree, recursive: bool) -> Self {
        let mut stack = Vec::with_capacity(STARTING_STACK_SIZE);
        stack.push(Frame {
            tree: Cow::Borrowed(tree),
            pos: 0,
        });

        TreeWalker {
            store,
            stack,
            base: String::new(),
            recursive,
            on_missing: MissingTree::EndWalk,
        }
    }

    pub fn on_missing_tree(mut self, on_missing: MissingTree) -> Self {
        self.on_missing = on_missing;
        self
    }

    /// The tree the walker most recently returned an entry from: the top of the
    /// stack, or its parent when nothing has been read from the top yet.
    pub fn tree(&self) -> Option<&Tree> {
        let mut current = self.stack.len().checked_sub(1)?;
        if self.stack[current].pos == 0 {
            current = current.checked_sub(1)?;
        }

        Some(&*self.stack[current].tree)
    }

    /// Release the walk's state. Every later call to `next` returns `None`.
    pub fn close(&mut self) {
        self.stack = Vec::new();
        self.base.clear();
    }

    fn finish(&mut self) {
        self.stack.clear();
    }

    /// A sub-tree could not be loaded.
    fn missing_tree(&mut self, entry: &TreeEntry, err: Error) -> Option<Result<(String, TreeEntry)>> {
        self.finish();
        match self.on_missing {
            MissingTree::EndWalk => {
                warn!("ending tree walk, cannot load {} ({}): {}", entry.name, entry.hash, err);
                None
            }
            MissingTree::Propagate => Some(Err(err)),
        }
    }

    fn pop(&mut self) {
        self.stack.pop();
        match self.base.rfind('/') {
            Some(i) => self.base.truncate(i),
            None => self.base.clear(),
        }
    }

    fn join(&self, name: &str) -> String {
        if self.base.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.base, name)
        }
    }
}

impl<S: ObjectStore + ?Sized> Iterator for TreeWalker<'_, S> {
    type Item = Result<(String, TreeEntry)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (entry, subtree) = loop {
            let current = self.stack.len().checked_sub(1)?;

            if current > MAX_TREE_DEPTH {
                self.finish();
                return Some(Err(Error::MaxTreeDepth));
            }

            let Some(entry) = self.stack[current].next() else {
                // Finished with the current tree, move back up to the parent
                self.pop();
                continue;
            };

            if entry.mode.is_submodule() {
                continue;
            }

            if !entry.is_dir() {
                break (entry, None);
            }

            match Tree::load(self.store, &entry.hash) {
                Ok(tree) => break (entry, Some(tree)),
                Err(err) => return self.missing_tree(&entry, err),
            }
        };

        let path = self.join(&entry.name);

        if self.recursive {
            if let Some(tree) = subtree {
                debug!("descending into {} ({})", path, tree.hash);
                self.stack.push(Frame {
                    tree: Cow::Owned(tree),
                    pos: 0,
                });
                self.base = path.clone();
            }
        }

        Some(Ok((path, entry)))
    }
}

impl<S: ObjectStore + ?Sized> std::iter::FusedIterator for TreeWalker<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{HASH_SIZE, Hash, MemoryStorage, ObjectType, RawObject};

    fn blob(store: &MemoryStorage, content: &str) -> Hash {
        store
            .put(&RawObject::with_body(ObjectType::Blob, content.as_bytes().to_vec()))
            .unwrap()
    }

    fn stored(store: &MemoryStorage, entries: Vec<TreeEntry>) -> Tree {
        let mut tree = Tree::with_entries(entries);
        tree.store(store).unwrap();
        tree
    }

    fn paths<S: ObjectStore + ?Sized>(walker: TreeWalker<'_, S>) -> Vec<String> {
        walker.map(|item| item.unwrap().0).collect()
    }

    /// root: a.txt, dir/{b.txt}, b.txt
    fn flat_tree(store: &MemoryStorage) -> Tree {
        let dir = stored(store, vec![TreeEntry::file("b.txt", blob(store, "inner"))]);
        stored(
            store,
            vec![
                TreeEntry::file("a.txt", blob(store, "a")),
                TreeEntry::directory("dir", dir.hash),
                TreeEntry::file("b.txt", blob(store, "b")),
            ],
        )
    }

    #[test]
    fn non_recursive() {
        let store = MemoryStorage::new();
        let root = flat_tree(&store);

        let items: Vec<(String, TreeEntry)> =
            root.walk(&store, false).map(|item| item.unwrap()).collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].0, "a.txt");
        assert_eq!(items[1].0, "dir");
        assert!(items[1].1.is_dir());
        assert_eq!(items[2].0, "b.txt");
        assert_eq!(items[2].1.hash, blob(&store, "b"));
    }

    #[test]
    fn recursive_simple() {
        let store = MemoryStorage::new();
        let dir = stored(&store, vec![TreeEntry::file("b.txt", blob(&store, "b"))]);
        let root = stored(
            &store,
            vec![
                TreeEntry::file("a.txt", blob(&store, "a")),
                TreeEntry::directory("dir", dir.hash),
            ],
        );

        assert_eq!(paths(root.walk(&store, true)), vec!["a.txt", "dir", "dir/b.txt"]);
    }

    #[test]
    fn recursive_pre_order() {
        let store = MemoryStorage::new();
        let deep = stored(&store, vec![TreeEntry::file("d.txt", blob(&store, "d"))]);
        let empty = stored(&store, vec![]);
        let dir = stored(
            &store,
            vec![
                TreeEntry::directory("deep", deep.hash),
                TreeEntry::directory("empty", empty.hash),
                TreeEntry::file("c.txt", blob(&store, "c")),
            ],
        );
        let root = stored(
            &store,
            vec![
                TreeEntry::directory("dir", dir.hash),
                TreeEntry::file("z.txt", blob(&store, "z")),
                TreeEntry::directory("again", deep.hash),
            ],
        );

        assert_eq!(
            paths(root.walk(&store, true)),
            vec![
                "dir",
                "dir/deep",
                "dir/deep/d.txt",
                "dir/empty",
                "dir/c.txt",
                "z.txt",
                "again",
                "again/d.txt",
            ]
        );
    }

    #[test]
    fn submodules_are_skipped() {
        let store = MemoryStorage::new();
        let dir = stored(
            &store,
            vec![
                TreeEntry::submodule("vendored", Hash([1; HASH_SIZE])),
                TreeEntry::file("x", blob(&store, "x")),
            ],
        );
        let root = stored(
            &store,
            vec![
                TreeEntry::submodule("module", Hash([2; HASH_SIZE])),
                TreeEntry::directory("dir", dir.hash),
            ],
        );

        assert_eq!(paths(root.walk(&store, false)), vec!["dir"]);
        assert_eq!(paths(root.walk(&store, true)), vec!["dir", "dir/x"]);
    }

    #[test]
    fn missing_tree_ends_walk() {
        let store = MemoryStorage::new();
        let root = stored(
            &store,
            vec![
                TreeEntry::file("a", blob(&store, "a")),
                TreeEntry::directory("gone", Hash([3; HASH_SIZE])),
                TreeEntry::file("b", blob(&store, "b")),
            ],
        );

        // the sub-tree is fetched even when not recursing
        assert_eq!(paths(root.walk(&store, false)), vec!["a"]);
        assert_eq!(paths(root.walk(&store, true)), vec!["a"]);
    }

    #[test]
    fn missing_tree_propagated() {
        let store = MemoryStorage::new();
        let root = stored(
            &store,
            vec![
                TreeEntry::file("a", blob(&store, "a")),
                TreeEntry::directory("gone", Hash([3; HASH_SIZE])),
                TreeEntry::file("b", blob(&store, "b")),
            ],
        );

        let mut walker = root.walk(&store, true).on_missing_tree(MissingTree::Propagate);
        assert_eq!(walker.next().unwrap().unwrap().0, "a");
        assert!(matches!(walker.next(), Some(Err(Error::ObjectNotFound(_)))));
        assert!(walker.next().is_none());
    }

    #[test]
    fn deep_chain_exceeds_max_depth() {
        let store = MemoryStorage::new();
        let mut tree = stored(&store, vec![TreeEntry::file("leaf", blob(&store, "leaf"))]);
        for _ in 0..MAX_TREE_DEPTH + 5 {
            tree = stored(&store, vec![TreeEntry::directory("d", tree.hash)]);
        }

        let results: Vec<Result<(String, TreeEntry)>> = tree.walk(&store, true).collect();
        assert!(matches!(results.last(), Some(Err(Error::MaxTreeDepth))));
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
        // one "d" per level from depth 0 through MAX_TREE_DEPTH, then the error
        assert_eq!(results.len(), MAX_TREE_DEPTH + 2);

        // the same chain is fine without recursion
        assert_eq!(paths(tree.walk(&store, false)), vec!["d"]);
    }

    #[test]
    fn self_referencing_tree() {
        let store = MemoryStorage::new();
        let hash = Hash([5; HASH_SIZE]);
        let cycle = Tree::with_entries(vec![TreeEntry::directory("loop", hash)]);
        let mut object = RawObject::new(ObjectType::Tree);
        cycle.encode(&mut object).unwrap();
        store.insert(hash, object);

        let root = Tree::load(&store, &hash).unwrap();
        let mut walker = root.walk(&store, true);
        let mut last = None;
        for item in walker.by_ref() {
            last = Some(item);
        }

        assert!(matches!(last, Some(Err(Error::MaxTreeDepth))));
        assert!(walker.next().is_none());
    }

    #[test]
    fn current_tree() {
        let store = MemoryStorage::new();
        let dir = stored(&store, vec![TreeEntry::file("b.txt", blob(&store, "b"))]);
        let root = stored(
            &store,
            vec![
                TreeEntry::directory("dir", dir.hash),
                TreeEntry::file("c.txt", blob(&store, "c")),
            ],
        );

        let mut walker = root.walk(&store, true);
        assert!(walker.tree().is_none());

        // "dir" was just pushed but not read from yet, so we are still in root
        assert_eq!(walker.next().unwrap().unwrap().0, "dir");
        assert_eq!(walker.tree().unwrap().hash, root.hash);

        assert_eq!(walker.next().unwrap().unwrap().0, "dir/b.txt");
        assert_eq!(walker.tree().unwrap().hash, dir.hash);

        assert_eq!(walker.next().unwrap().unwrap().0, "c.txt");
        assert_eq!(walker.tree().unwrap().hash, root.hash);
    }

    #[test]
    fn close() {
        let store = MemoryStorage::new();
        let root = flat_tree(&store);

        let mut walker = root.walk(&store, true);
        assert!(walker.next().is_some());
        walker.close();
        assert!(walker.next().is_none());
        assert!(walker.tree().is_none());
    }

    #[test]
    fn empty_tree() {
        let store = MemoryStorage::new();
        let root = Tree::new();

        let mut walker = root.walk(&store, true);
        assert!(walker.next().is_none());
        assert!(walker.next().is_none());
    }
}
