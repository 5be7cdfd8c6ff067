pub mod file;
pub mod file_mode;
pub mod hash;
pub mod loose_storage;
pub mod object;
pub mod storage;
pub mod tree;
pub mod tree_entry;
pub mod walker;

pub use file::*;
pub use file_mode::*;
pub use hash::*;
pub use loose_storage::*;
pub use object::*;
pub use storage::*;
pub use tree::*;
pub use tree_entry::*;
pub use walker::*;
