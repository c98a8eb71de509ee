//! Amazon Polly adapter for unseen-moves.
//!
//! Wraps the AWS SDK `SynthesizeSpeech` call behind the domain
//! [`SpeechSynthesizer`](unseen_moves_domain::SpeechSynthesizer) trait.
//!
//! # Usage
//!
//! ```no_run
//! use unseen_moves_domain::SpeechSynthesizer;
//! use unseen_moves_polly::{Credentials, PollyClient, PollyConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), unseen_moves_domain::EpisodeError> {
//!     let credentials = Credentials::from_env()?;
//!     let polly = PollyClient::new(credentials, PollyConfig::default()).await;
//!     let audio = polly
//!         .synthesize("<speak><p>Welcome to Unseen Moves.</p></speak>")
//!         .await?;
//!     println!("{} bytes of mp3", audio.len());
//!     Ok(())
//! }
//! ```

mod client;
mod credentials;
mod error;

pub use client::{DEFAULT_TIMEOUT, PollyClient, PollyConfig};
pub use credentials::{ACCESS_KEY_VAR, Credentials, SECRET_KEY_VAR};
