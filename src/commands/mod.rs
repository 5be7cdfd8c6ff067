pub mod ls_tree;
pub mod show;

pub use ls_tree::*;
pub use show::*;
