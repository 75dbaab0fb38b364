//! CSS property catalog processor binary

use csspropgen::cli::Cli;
use std::process;

fn main() {
    let mut cli = Cli::new();

    if let Err(e) = cli.run() {
        eprintln!("{}: {}", csspropgen::NAME, e);
        process::exit(1);
    }
}
