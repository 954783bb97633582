use anyhow::Context;
use census_cli::Cli;
use census_logger::Logger;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logger = Logger::builder(env!("CARGO_PKG_NAME")).verbosity(cli.global.verbose);
    if let Some(dir) = &cli.global.log_dir {
        logger = logger.file(dir).json(cli.global.json_logs);
    }
    let _log = logger.init().context("Critical: logging could not be initialized")?;

    census_cli::run(&cli).await
}
