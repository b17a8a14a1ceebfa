mod cli;
mod error;
mod repl;
mod runtime;
mod syntax;

use std::{io, process};

use clap::Parser;

use cli::Cli;
use repl::Session;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    log::debug!("{cli:?}");

    let session = Session::new(cli.mode, cli.max_depth);

    if let Some(expr) = cli.expr {
        match session.process(expr.trim()) {
            Ok(text) => print!("{text}"),
            Err(why) => {
                eprintln!("{why}");
                process::exit(1);
            }
        }
        return;
    }

    let stdin = io::stdin();
    if let Err(why) = session.run(stdin.lock(), io::stdout().lock()) {
        eprintln!("{why}");
        process::exit(1);
    }
}
