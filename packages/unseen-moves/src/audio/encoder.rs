//! Final episode encoders.

use std::io::Cursor;

use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, InterleavedPcm, MonoPcm, Quality};
use unseen_moves_domain::{AudioFormat, EpisodeError, Result};

use super::AudioSegment;

/// Worst-case size of the LAME flush output.
const LAME_FLUSH_RESERVE: usize = 7200;

/// Turns a finished mix into file bytes.
pub trait AudioEncoder {
    fn format(&self) -> AudioFormat;

    fn encode(&self, segment: &AudioSegment) -> Result<Vec<u8>>;
}

impl<T: AudioEncoder> AudioEncoder for &T {
    fn format(&self) -> AudioFormat {
        (**self).format()
    }

    fn encode(&self, segment: &AudioSegment) -> Result<Vec<u8>> {
        (**self).encode(segment)
    }
}

/// MP3 through LAME at 128 kbps. LAME takes at most two channels, so wider
/// mixes are folded down first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mp3Encoder;

fn lame_error(stage: &str, err: impl std::fmt::Debug) -> EpisodeError {
    EpisodeError::FileProcessing(format!("MP3 {stage} failed: {err:?}"))
}

impl AudioEncoder for Mp3Encoder {
    fn format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    fn encode(&self, segment: &AudioSegment) -> Result<Vec<u8>> {
        let segment = if segment.channels() > 2 {
            segment.with_channels(2)
        } else {
            segment.clone()
        };
        let channels = segment.channels();

        let mut builder =
            Builder::new().ok_or_else(|| lame_error("encoder setup", "LAME unavailable"))?;
        builder
            .set_num_channels(channels as u8)
            .map_err(|e| lame_error("channel setup", e))?;
        builder
            .set_sample_rate(segment.sample_rate())
            .map_err(|e| lame_error("sample rate setup", e))?;
        builder
            .set_brate(Bitrate::Kbps128)
            .map_err(|e| lame_error("bitrate setup", e))?;
        builder
            .set_quality(Quality::Good)
            .map_err(|e| lame_error("quality setup", e))?;
        let mut encoder = builder.build().map_err(|e| lame_error("encoder setup", e))?;

        let samples = segment.samples();
        let mut out = Vec::new();
        out.reserve(mp3lame_encoder::max_required_buffer_size(
            samples.len() / usize::from(channels),
        ));

        if channels == 1 {
            encoder.encode_to_vec(MonoPcm(samples), &mut out)
        } else {
            encoder.encode_to_vec(InterleavedPcm(samples), &mut out)
        }
        .map_err(|e| lame_error("encoding", e))?;

        out.reserve(LAME_FLUSH_RESERVE);
        encoder
            .flush_to_vec::<FlushNoGap>(&mut out)
            .map_err(|e| lame_error("flush", e))?;

        Ok(out)
    }
}

/// 16-bit PCM WAV through hound.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavEncoder;

impl AudioEncoder for WavEncoder {
    fn format(&self) -> AudioFormat {
        AudioFormat::Wav
    }

    fn encode(&self, segment: &AudioSegment) -> Result<Vec<u8>> {
        let spec = hound::WavSpec {
            channels: segment.channels(),
            sample_rate: segment.sample_rate(),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let wav_error =
            |e: hound::Error| EpisodeError::FileProcessing(format!("WAV encoding failed: {e}"));

        let mut cursor = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec).map_err(wav_error)?;
        for &sample in segment.samples() {
            writer.write_sample(sample).map_err(wav_error)?;
        }
        writer.finalize().map_err(wav_error)?;
        Ok(cursor.into_inner())
    }
}
