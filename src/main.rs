//! .

mod cli;
mod logging;

use cli::Cli;
use kmre_client::{Client, SocketRoot};

use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let action = match cli::parse_cmd(&cli.command) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let client = Client::new(SocketRoot::new(cli.root));
    let outcome = cli::execute(&client, action);

    if let Err(e) = cli::render(outcome, cli.json) {
        eprintln!("{e}");
        process::exit(1);
    }
}
