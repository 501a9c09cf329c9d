use clap::Parser;
use importdash_tui::Cli;

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    let cli = Cli::parse();
    importdash_tui::run_main(cli).await
}
