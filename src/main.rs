use anyhow::Result;
use number_duel::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run_cli().await
}
