use brrtmvc::cli::{run_cli, Cli};
use brrtmvc::logging::{init_logging, LogConfig};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_env())?;
    run_cli(cli, &brrtmvc::demo::catalog(), brrtmvc::demo::controllers())
}
