use binarize_cli::{Cli, run, usage_exit_code};
use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::{self, EnvFilter};

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(usage_exit_code(&err));
        }
    };

    // color-eyre reports the error when main returns it.
    run(&cli)
}
