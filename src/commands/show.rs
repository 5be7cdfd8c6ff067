use clap::{Arg, Command};
use std::{
    io::{self, Write},
    path::Path,
};

use crate::error::Result;
use crate::utils::{Hash, LooseStorage, Tree};

pub fn get_show_command() -> Command {
    Command::new("show")
        .about("Print a file from a tree object")
        .arg(
            Arg::new("tree")
                .required(true)
                .value_name("TREE_HASH")
                .help("Hash of the tree to read from"),
        )
        .arg(
            Arg::new("path")
                .required(true)
                .value_name("PATH")
                .help("Slash-separated path of the file, relative to the tree"),
        )
        .arg_required_else_help(true)
}

pub fn show(vit_dir: &Path, tree_hash: &str, path: &str) -> Result<()> {
    let storage = LooseStorage::open(vit_dir)?;
    let tree = Tree::load(&storage, &Hash::from_hex(tree_hash)?)?;
    let file = tree.file(&storage, path)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(file.bytes())?;
    stdout.flush()?;

    Ok(())
}
