use anyhow::{Context, Result};
use clap::Parser;

use fitsize_server::cli::Args;
use fitsize_server::state::AppState;
use fitsize_server::{app_with_state, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(args.verbose, args.log_file.as_deref())?;

    let state = AppState::new(args.compress_options(), args.max_upload_bytes());
    log::debug!("compression options: {:?}", state.options);

    let address = args.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    log::info!(
        "fitsize-server {} listening on {} (max upload {}MB)",
        env!("CARGO_PKG_VERSION"),
        address,
        args.max_upload_mb
    );

    axum::serve(listener, app_with_state(state))
        .await
        .context("Server error")
}
