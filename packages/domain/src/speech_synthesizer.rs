//! The seam between script composition and a concrete TTS engine.
use crate::episode_error::Result;
use bytes::Bytes;

/// Anything that can turn an SSML document into encoded voice audio.
///
/// Implementations must return an error rather than an empty buffer when the
/// engine hands back no audio.
#[allow(async_fn_in_trait)]
pub trait SpeechSynthesizer {
    /// Synthesize the given SSML document, returning the encoded audio bytes.
    async fn synthesize(&self, ssml: &str) -> Result<Bytes>;
}

impl<T: SpeechSynthesizer + ?Sized> SpeechSynthesizer for &T {
    async fn synthesize(&self, ssml: &str) -> Result<Bytes> {
        (**self).synthesize(ssml).await
    }
}
