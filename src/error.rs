use crate::utils::{Hash, ObjectType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The object handed to a decoder has the wrong type.
    #[error("unsupported object type: {0}")]
    UnsupportedObject(ObjectType),

    /// A walk went deeper than `MAX_TREE_DEPTH`, usually a self-referencing tree.
    #[error("maximum tree depth exceeded")]
    MaxTreeDepth,

    #[error("directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("entry not found: {0}")]
    EntryNotFound(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("object not found: {0}")]
    ObjectNotFound(Hash),

    #[error("invalid file mode: {0:?}")]
    InvalidMode(String),

    #[error("tree entry name is not valid UTF-8")]
    InvalidName,

    #[error("invalid hash: {0:?}")]
    InvalidHash(String),

    #[error("corrupt object: {0}")]
    CorruptObject(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
