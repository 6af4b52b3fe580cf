use anyhow::Result;
use clap::Parser;
use tidyup::cli::Cli;
use tidyup::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.quiet, cli.verbose);
    cli.run()
}
