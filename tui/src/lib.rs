//! Terminal dashboard for import automation runs.
//!
//! Renders the recent system runs as an expandable table: each run row
//! fetches its own logs and import attempts, each attempt row its own logs.

use std::sync::Arc;

use tokio::sync::mpsc::unbounded_channel;

use importdash_client::DashboardClient;

mod app;
mod app_event;
mod app_event_sender;
pub mod cli;
mod input;
mod logging;
mod render;
mod terminal;

pub use cli::Cli;

use crate::app::App;
use crate::app_event_sender::AppEventSender;

pub async fn run_main(cli: Cli) -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    let _log_guard = logging::init(&cli.log_level);

    let config = cli.resolve_config()?;
    let client = Arc::new(DashboardClient::new(&config.server_url)?);
    tracing::info!(server_url = %config.server_url, "starting dashboard");

    let (high_tx, high_rx) = unbounded_channel();
    let (bulk_tx, bulk_rx) = unbounded_channel();
    let events = AppEventSender::new_dual(high_tx, bulk_tx);

    let input_events = events.clone();
    std::thread::spawn(move || input::forward_input(input_events));

    let mut terminal = terminal::init()?;
    let app = App::new(config, client, events);
    let result = app::run(app, high_rx, bulk_rx, &mut terminal).await;
    terminal::restore()?;

    result.map_err(Into::into)
}
