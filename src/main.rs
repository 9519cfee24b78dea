mod cli;
mod execute;

use clap::Parser;
use crate::cli::CLI;

fn main() {
    let cli = CLI::parse();
    execute::init_logging(&cli.log_level);
    if let Err(e) = execute::execute(cli) {
        execute::report_error(&e);
        std::process::exit(1);
    }
}
