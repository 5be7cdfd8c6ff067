use std::fmt;

/// Unix-style mode of a tree entry: permission bits plus a type discriminant.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FileMode(pub u32);

impl FileMode {
    pub const DIR: FileMode = FileMode(0o040000);
    pub const REGULAR: FileMode = FileMode(0o100644);
    pub const DEPRECATED: FileMode = FileMode(0o100664);
    pub const EXECUTABLE: FileMode = FileMode(0o100755);
    pub const SYMLINK: FileMode = FileMode(0o120000);
    pub const SUBMODULE: FileMode = FileMode(0o160000);

    /// Parse the ASCII octal digits used in tree records, e.g. `"100644"` or `"40000"`.
    pub fn from_octal(digits: &str) -> Option<FileMode> {
        if digits.is_empty() || !digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return None;
        }
        u32::from_str_radix(digits, 8).ok().map(FileMode)
    }

    pub fn is_dir(&self) -> bool {
        *self == FileMode::DIR
    }

    pub fn is_symlink(&self) -> bool {
        *self == FileMode::SYMLINK
    }

    pub fn is_submodule(&self) -> bool {
        *self == FileMode::SUBMODULE
    }

    pub fn is_file(&self) -> bool {
        matches!(
            *self,
            FileMode::REGULAR | FileMode::DEPRECATED | FileMode::EXECUTABLE
        )
    }

    pub fn is_executable(&self) -> bool {
        *self == FileMode::EXECUTABLE
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:o}", self.0)
    }
}

impl fmt::Debug for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:06o}", self.0)
    }
}
