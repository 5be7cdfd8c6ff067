use colored::Colorize;
use std::{path::PathBuf, process};
use vit_tree::cli;
use vit_tree::commands::{ls_tree, show};

fn main() {
    env_logger::init();

    let matches = cli().get_matches();
    let vit_dir = PathBuf::from(matches.get_one::<String>("vit-dir").unwrap());

    let result = match matches.subcommand() {
        Some(("ls-tree", sub_matches)) => {
            let tree = sub_matches.get_one::<String>("tree").unwrap();
            ls_tree(&vit_dir, tree, sub_matches.get_flag("recursive"))
        }
        Some(("show", sub_matches)) => {
            let tree = sub_matches.get_one::<String>("tree").unwrap();
            let path = sub_matches.get_one::<String>("path").unwrap();
            show(&vit_dir, tree, path)
        }
        _ => unreachable!("Unknown subcommand!"),
    };

    if let Err(err) = result {
        eprintln!("{}", err.to_string().red());
        process::exit(1);
    }
}
