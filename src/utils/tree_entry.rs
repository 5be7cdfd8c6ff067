use crate::utils::{FileMode, Hash};
use std::io::{self, Write};

/// A named pointer from a tree to a blob, a sub-tree or a submodule commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String, // e.g., "main.rs" or "src"
    pub mode: FileMode,
    pub hash: Hash,
}

impl TreeEntry {
    pub fn new(name: impl Into<String>, mode: FileMode, hash: Hash) -> Self {
        TreeEntry {
            name: name.into(),
            mode,
            hash,
        }
    }

    pub fn file(name: impl Into<String>, hash: Hash) -> Self {
        TreeEntry::new(name, FileMode::REGULAR, hash)
    }

    pub fn executable(name: impl Into<String>, hash: Hash) -> Self {
        TreeEntry::new(name, FileMode::EXECUTABLE, hash)
    }

    pub fn directory(name: impl Into<String>, hash: Hash) -> Self {
        TreeEntry::new(name, FileMode::DIR, hash)
    }

    pub fn symlink(name: impl Into<String>, hash: Hash) -> Self {
        TreeEntry::new(name, FileMode::SYMLINK, hash)
    }

    pub fn submodule(name: impl Into<String>, hash: Hash) -> Self {
        TreeEntry::new(name, FileMode::SUBMODULE, hash)
    }

    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    /// Write the record `<octal mode> <name>\0<raw hash>`, returning the bytes written.
    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<usize> {
        let header = format!("{} {}", self.mode, self.name);
        w.write_all(header.as_bytes())?;
        w.write_all(&[0u8])?; // NULL separator
        w.write_all(self.hash.as_bytes())?;

        Ok(header.len() + 1 + self.hash.as_bytes().len())
    }
}
