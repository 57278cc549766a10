use clap::Parser;

use divs_vault::cli::Cli;
use divs_vault::{app, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init_logger()?;

    app::run(cli).await?;
    Ok(())
}
