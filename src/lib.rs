//! Tree objects of a content-addressable version store: decoding and encoding
//! the binary tree format, resolving paths through nested trees, and walking
//! whole subtrees.
//!
//! ```
//! use vit_tree::utils::{MemoryStorage, ObjectStore, ObjectType, RawObject, Tree, TreeEntry};
//!
//! let store = MemoryStorage::new();
//! let readme = store
//!     .put(&RawObject::with_body(ObjectType::Blob, b"hello".to_vec()))
//!     .unwrap();
//!
//! let mut docs = Tree::with_entries(vec![TreeEntry::file("README", readme)]);
//! docs.store(&store).unwrap();
//! let mut root = Tree::with_entries(vec![TreeEntry::directory("docs", docs.hash)]);
//! root.store(&store).unwrap();
//!
//! let paths: Vec<String> = root
//!     .walk(&store, true)
//!     .map(|item| item.unwrap().0)
//!     .collect();
//! assert_eq!(paths, vec!["docs", "docs/README"]);
//!
//! let file = root.file(&store, "docs/README").unwrap();
//! assert_eq!(file.contents().unwrap(), "hello");
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::cli;
pub use error::{Error, Result};
