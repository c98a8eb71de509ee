use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use unseen_moves::cli::{self, Args};

#[tokio::main]
async fn main() -> ExitCode {
    cli::init_tracing();
    let args = Args::parse();

    match cli::run(args, |name| std::env::var(name).ok()).await {
        Ok(output) => {
            info!(
                game_id = %output.game_id,
                path = %output.path.display(),
                duration_ms = output.duration_ms,
                "Episode ready"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(kind = err.kind(), "Episode failed: {err}");
            ExitCode::FAILURE
        }
    }
}
