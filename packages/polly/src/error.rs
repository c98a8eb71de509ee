use aws_sdk_polly::error::{DisplayErrorContext, SdkError};
use aws_sdk_polly::operation::synthesize_speech::SynthesizeSpeechError;
use bytes::Bytes;
use unseen_moves_domain::{EpisodeError, Result};

/// Map an SDK failure into the episode taxonomy.
///
/// A service error means Polly received the request and rejected it; every
/// other variant means the request never completed.
pub(crate) fn map_sdk_error(err: SdkError<SynthesizeSpeechError>) -> EpisodeError {
    let detail = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::ServiceError(_) => {
            EpisodeError::OperationFailure(format!("Polly rejected the synthesis request: {detail}"))
        }
        _ => EpisodeError::Network(format!("Polly request failed: {detail}")),
    }
}

/// An empty stream is a failed synthesis, never an empty episode.
pub(crate) fn require_audio(audio: Bytes) -> Result<Bytes> {
    if audio.is_empty() {
        return Err(EpisodeError::OperationFailure(
            "Polly response contained no audio stream".to_string(),
        ));
    }
    Ok(audio)
}
