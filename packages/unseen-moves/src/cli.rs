//! Command-line surface and process setup for the `unseen-moves` binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use unseen_moves_domain::{AudioFormat, Result};
use unseen_moves_polly::{Credentials, PollyClient, PollyConfig};

use crate::audio::{Mp3Encoder, WavEncoder, default_catalog};
use crate::explorer::{DEFAULT_EXPLORER_URL, ExplorerClient, ExplorerConfig};
use crate::narrator::DEFAULT_PLIES;
use crate::pipeline::{Episode, EpisodeOutput, EpisodeSettings};

/// Used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_LOG_FILTER: &str = "unseen_moves=info";

/// Generate one Unseen Moves chess visualisation episode
#[derive(Debug, Parser)]
#[command(name = "unseen-moves", version, about)]
pub struct Args {
    /// Seed for every random choice; a fresh one is drawn when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory the episode is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Directory holding the background music files
    #[arg(long, default_value = ".")]
    pub assets_dir: PathBuf,

    /// Where the raw synthesised voice is saved
    #[arg(long, default_value = "speech.mp3")]
    pub speech_file: PathBuf,

    /// Base URL of the masters opening explorer
    #[arg(long, default_value = DEFAULT_EXPLORER_URL)]
    pub explorer_url: String,

    /// Plies of the master game to narrate
    #[arg(long, default_value_t = DEFAULT_PLIES)]
    pub plies: usize,

    /// Container of the finished episode (mp3 or wav)
    #[arg(long, default_value = "mp3")]
    pub format: AudioFormat,

    /// Timeout for each explorer request and for the speech synthesis call, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Only fails if a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init();
}

fn polly_config(timeout: Duration) -> PollyConfig {
    PollyConfig {
        timeout,
        ..PollyConfig::default()
    }
}

/// Build the production collaborators and run one episode.
///
/// Credentials are resolved through `env_lookup` before anything touches the
/// network.
pub async fn run<F>(args: Args, env_lookup: F) -> Result<EpisodeOutput>
where
    F: Fn(&str) -> Option<String>,
{
    let credentials = Credentials::from_lookup(env_lookup)?;
    let timeout = Duration::from_secs(args.timeout_secs);

    let explorer = ExplorerClient::new(ExplorerConfig {
        base_url: args.explorer_url,
        timeout,
        ..ExplorerConfig::default()
    })?;
    let polly = PollyClient::new(credentials, polly_config(timeout)).await;

    let settings = EpisodeSettings {
        plies: args.plies,
        output_dir: args.output_dir,
        assets_dir: args.assets_dir,
        speech_file: Some(args.speech_file),
        catalog: default_catalog(),
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    info!(seed = ?args.seed, format = ?args.format, "Starting episode");

    match args.format {
        AudioFormat::Mp3 => {
            Episode::new(explorer, polly, Mp3Encoder, settings)
                .run(&mut rng)
                .await
        }
        AudioFormat::Wav => {
            Episode::new(explorer, polly, WavEncoder, settings)
                .run(&mut rng)
                .await
        }
    }
}
