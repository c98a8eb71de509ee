use std::io::Cursor;
use std::path::Path;

use rodio::{Decoder, Source};
use tracing::debug;
use unseen_moves_domain::{EpisodeError, Result};

use super::AudioSegment;

/// Decode an encoded clip (MP3 or WAV) held in memory.
pub fn decode_bytes(data: Vec<u8>) -> Result<AudioSegment> {
    let decoder = Decoder::try_from(Cursor::new(data))
        .map_err(|e| EpisodeError::FileProcessing(format!("audio could not be decoded: {e}")))?;

    let channels = u16::from(decoder.channels());
    let sample_rate = u32::from(decoder.sample_rate());
    let samples: Vec<i16> = decoder
        .map(|sample| (sample * 32767.0).clamp(-32768.0, 32767.0) as i16)
        .collect();

    let segment = AudioSegment::new(samples, sample_rate, channels);
    debug!(
        sample_rate,
        channels,
        duration_ms = segment.duration_ms(),
        "Decoded audio"
    );
    Ok(segment)
}

/// Read and decode an audio file.
pub async fn decode_file(path: &Path) -> Result<AudioSegment> {
    let data = tokio::fs::read(path).await.map_err(|e| {
        EpisodeError::FileProcessing(format!("{} could not be read: {e}", path.display()))
    })?;
    decode_bytes(data).map_err(|e| match e {
        EpisodeError::FileProcessing(msg) => {
            EpisodeError::FileProcessing(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}
