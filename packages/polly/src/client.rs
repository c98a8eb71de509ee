use std::time::Duration;

use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_polly::types::{Engine, LanguageCode, OutputFormat, TextType, VoiceId as PollyVoiceId};
use bytes::Bytes;
use tracing::{debug, info};
use unseen_moves_domain::{EpisodeError, Result, SpeechSynthesizer, VoiceProfile};

use crate::credentials::Credentials;
use crate::error::{map_sdk_error, require_audio};

const CREDENTIALS_PROVIDER_NAME: &str = "unseen-moves-environment";

/// Whole-call limit on a synthesis request, retries included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Voice and transport settings for every synthesis request
#[derive(Debug, Clone)]
pub struct PollyConfig {
    /// AWS region hosting the Polly endpoint
    pub region: String,
    /// Voice, language code and engine tier of every request
    pub voice: VoiceProfile,
    /// Upper bound on one synthesis call, retries included
    pub timeout: Duration,
}

impl Default for PollyConfig {
    fn default() -> Self {
        Self {
            region: "eu-west-2".to_string(),
            voice: VoiceProfile::amy(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Polly-backed [`SpeechSynthesizer`].
#[derive(Clone)]
pub struct PollyClient {
    inner: aws_sdk_polly::Client,
    config: PollyConfig,
}

impl PollyClient {
    /// Build a client signing with the given static credentials.
    pub async fn new(credentials: Credentials, config: PollyConfig) -> Self {
        let provider = aws_sdk_polly::config::Credentials::new(
            credentials.access_key(),
            credentials.secret_key(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(provider)
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(config.timeout)
                    .build(),
            )
            .load()
            .await;

        Self {
            inner: aws_sdk_polly::Client::new(&sdk_config),
            config,
        }
    }

    pub fn config(&self) -> &PollyConfig {
        &self.config
    }
}

impl SpeechSynthesizer for PollyClient {
    async fn synthesize(&self, ssml: &str) -> Result<Bytes> {
        info!(
            voice = %self.config.voice.voice,
            engine = %self.config.voice.engine,
            chars = ssml.len(),
            "Requesting speech synthesis"
        );

        let output = self
            .inner
            .synthesize_speech()
            .text(ssml)
            .text_type(TextType::Ssml)
            .language_code(LanguageCode::from(self.config.voice.language.as_str()))
            .engine(Engine::from(self.config.voice.engine.as_str()))
            .output_format(OutputFormat::Mp3)
            .voice_id(PollyVoiceId::from(self.config.voice.voice.as_str()))
            .send()
            .await
            .map_err(map_sdk_error)?;

        debug!(
            content_type = output.content_type().unwrap_or("unknown"),
            request_characters = output.request_characters(),
            "Polly accepted synthesis request"
        );

        let audio = output
            .audio_stream
            .collect()
            .await
            .map_err(|e| EpisodeError::Network(format!("reading Polly audio stream: {e}")))?
            .into_bytes();

        require_audio(audio)
    }
}
