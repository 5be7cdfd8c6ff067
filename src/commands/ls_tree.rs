use clap::{Arg, ArgAction, Command};
use colored::{Colorize, control::set_override};
use pager::Pager;
use std::path::Path;

use crate::error::Result;
use crate::utils::{Hash, LooseStorage, Tree, TreeEntry};

pub fn get_ls_tree_command() -> Command {
    Command::new("ls-tree")
        .about("List the contents of a tree object")
        .arg(
            Arg::new("recursive")
                .short('r')
                .action(ArgAction::SetTrue)
                .help("Recurse into sub-trees"),
        )
        .arg(
            Arg::new("tree")
                .required(true)
                .value_name("TREE_HASH")
                .help("Hash of the tree to list"),
        )
}

fn format_entry(path: &str, entry: &TreeEntry) -> String {
    let kind = if entry.is_dir() { "tree" } else { "blob" };
    let line = format!("{:?} {} {}\t{}", entry.mode, kind, entry.hash, path);

    if entry.is_dir() {
        line.blue().to_string()
    } else {
        line
    }
}

pub fn ls_tree(vit_dir: &Path, tree_hash: &str, recursive: bool) -> Result<()> {
    let storage = LooseStorage::open(vit_dir)?;
    let tree = Tree::load(&storage, &Hash::from_hex(tree_hash)?)?;

    // Setup pager
    set_override(true);
    Pager::with_pager("less -R -F -X").setup();

    for item in tree.walk(&storage, recursive) {
        let (path, entry) = item?;
        println!("{}", format_entry(&path, &entry));
    }

    Ok(())
}
