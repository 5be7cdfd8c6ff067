use crate::commands::{get_ls_tree_command, get_show_command};
use clap::{Arg, Command};

pub fn cli() -> Command {
    Command::new("vit_tree")
        .about("Inspect tree objects of a vit repository")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .allow_external_subcommands(false)
        .arg(
            Arg::new("vit-dir")
                .long("vit-dir")
                .global(true)
                .value_name("DIR")
                .default_value(".vit")
                .help("Path to the repository's .vit directory"),
        )
        .subcommand(get_ls_tree_command())
        .subcommand(get_show_command())
}
