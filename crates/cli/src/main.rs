use clap::Parser;
use demolink_cli::{cli::Cli, commands, logging};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match commands::dispatch(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
