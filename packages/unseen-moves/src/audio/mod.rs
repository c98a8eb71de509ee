//! In-memory PCM and the operations the episode mix needs.
//!
//! Everything works on interleaved signed 16-bit samples. Time arguments are
//! milliseconds and are converted to whole frames at the segment's rate.

use std::borrow::Cow;

use rubato::{FftFixedIn, Resampler};
use unseen_moves_domain::{EpisodeError, Result};

pub mod decoder;
pub mod encoder;
pub mod mixer;

pub use decoder::{decode_bytes, decode_file};
pub use encoder::{AudioEncoder, Mp3Encoder, WavEncoder};
pub use mixer::{BackgroundTrack, choose_track, default_catalog, export, mix_episode};

/// Input frames per resampler pass.
const RESAMPLE_CHUNK: usize = 1024;
const RESAMPLE_SUB_CHUNKS: usize = 2;

/// Interleaved 16-bit PCM with its sample rate and channel count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSegment {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl AudioSegment {
    /// Trailing samples that do not fill a whole frame are dropped.
    pub fn new(mut samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        let channels = channels.max(1);
        let whole = samples.len() - samples.len() % usize::from(channels);
        samples.truncate(whole);
        Self {
            samples,
            sample_rate: sample_rate.max(1),
            channels,
        }
    }

    pub fn silent(duration_ms: u64, sample_rate: u32, channels: u16) -> Self {
        let channels = channels.max(1);
        let frames = ms_to_frames(duration_ms, sample_rate.max(1));
        Self::new(vec![0; frames * usize::from(channels)], sample_rate, channels)
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    pub fn duration_ms(&self) -> u64 {
        self.frames() as u64 * 1000 / u64::from(self.sample_rate)
    }

    /// The first `duration_ms`, or the whole segment if it is shorter.
    pub fn slice_to(&self, duration_ms: u64) -> Self {
        let frames = ms_to_frames(duration_ms, self.sample_rate).min(self.frames());
        let end = frames * usize::from(self.channels);
        Self {
            samples: self.samples[..end].to_vec(),
            ..*self
        }
    }

    /// Scale by `db` decibels, saturating at the 16-bit limits.
    pub fn apply_gain(&self, db: f32) -> Self {
        let factor = 10f32.powf(db / 20.0);
        Self {
            samples: self.samples.iter().map(|&s| scale(s, factor)).collect(),
            ..*self
        }
    }

    /// Linear ramp to silence over the last `duration_ms`.
    pub fn fade_out(&self, duration_ms: u64) -> Self {
        let total = self.frames();
        let fade = ms_to_frames(duration_ms, self.sample_rate).min(total);
        if fade == 0 {
            return self.clone();
        }

        let start = total - fade;
        let channels = usize::from(self.channels);
        let mut samples = self.samples.clone();
        for (frame, chunk) in samples.chunks_exact_mut(channels).enumerate().skip(start) {
            let factor = 1.0 - (frame - start) as f32 / fade as f32;
            for s in chunk {
                *s = scale(*s, factor);
            }
        }
        Self {
            samples,
            ..*self
        }
    }

    /// Resample with an FFT resampler; the result has exactly the frame count
    /// the rate change implies.
    pub fn with_sample_rate(&self, sample_rate: u32) -> Result<Self> {
        let sample_rate = sample_rate.max(1);
        if sample_rate == self.sample_rate || self.samples.is_empty() {
            return Ok(Self {
                samples: self.samples.clone(),
                sample_rate,
                channels: self.channels,
            });
        }

        let channels = usize::from(self.channels);
        let in_frames = self.frames();
        let out_frames =
            (in_frames as u64 * u64::from(sample_rate) / u64::from(self.sample_rate)) as usize;

        let mut resampler = FftFixedIn::<f32>::new(
            self.sample_rate as usize,
            sample_rate as usize,
            RESAMPLE_CHUNK,
            RESAMPLE_SUB_CHUNKS,
            channels,
        )
        .map_err(|e| resample_error(&e))?;
        let delay = resampler.output_delay();

        let planar: Vec<Vec<f32>> = (0..channels)
            .map(|c| {
                self.samples
                    .iter()
                    .skip(c)
                    .step_by(channels)
                    .map(|&s| f32::from(s) / 32_768.0)
                    .collect()
            })
            .collect();
        let mut resampled = vec![Vec::with_capacity(out_frames + delay); channels];

        let mut pos = 0;
        while pos < in_frames {
            let next = resampler.input_frames_next();
            let chunk: Vec<&[f32]> = planar
                .iter()
                .map(|channel| &channel[pos..(pos + next).min(in_frames)])
                .collect();
            let produced = if pos + next <= in_frames {
                resampler.process(&chunk[..], None)
            } else {
                resampler.process_partial(Some(&chunk[..]), None)
            }
            .map_err(|e| resample_error(&e))?;
            append_planar(&mut resampled, produced);
            pos += next;
        }
        // Drain the filter delay.
        while resampled[0].len() < out_frames + delay {
            let produced = resampler
                .process_partial(None::<&[Vec<f32>]>, None)
                .map_err(|e| resample_error(&e))?;
            if produced[0].is_empty() {
                break;
            }
            append_planar(&mut resampled, produced);
        }

        let mut samples = Vec::with_capacity(out_frames * channels);
        for frame in delay..delay + out_frames {
            for channel in &resampled {
                let value = channel.get(frame).copied().unwrap_or(0.0);
                samples.push((value * 32_768.0).round().clamp(-32_768.0, 32_767.0) as i16);
            }
        }

        Ok(Self {
            samples,
            sample_rate,
            channels: self.channels,
        })
    }

    /// Remix to `channels`.
    ///
    /// Going to mono averages a frame; extra output channels beyond the
    /// source's carry the frame average; surplus source channels are dropped.
    pub fn with_channels(&self, channels: u16) -> Self {
        let channels = channels.max(1);
        if channels == self.channels {
            return self.clone();
        }

        let out = usize::from(channels);
        let mut samples = Vec::with_capacity(self.frames() * out);
        for frame in self.samples.chunks_exact(usize::from(self.channels)) {
            let mean = (frame.iter().map(|&s| i32::from(s)).sum::<i32>()
                / frame.len() as i32) as i16;
            if out == 1 {
                samples.push(mean);
                continue;
            }
            for c in 0..out {
                samples.push(if frame.len() == 1 {
                    frame[0]
                } else {
                    frame.get(c).copied().unwrap_or(mean)
                });
            }
        }

        Self {
            samples,
            sample_rate: self.sample_rate,
            channels,
        }
    }

    /// Convert to the given rate and channel count.
    pub fn converted(&self, sample_rate: u32, channels: u16) -> Result<Self> {
        self.with_channels(channels).with_sample_rate(sample_rate)
    }

    /// Mix `other` on top from the start; the result keeps this segment's
    /// length and format.
    pub fn overlay(&self, other: &AudioSegment) -> Result<Self> {
        let other = if other.sample_rate == self.sample_rate && other.channels == self.channels {
            Cow::Borrowed(other)
        } else {
            Cow::Owned(other.converted(self.sample_rate, self.channels)?)
        };

        let mut samples = self.samples.clone();
        for (base, top) in samples.iter_mut().zip(other.samples.iter()) {
            *base = base.saturating_add(*top);
        }
        Ok(Self {
            samples,
            ..*self
        })
    }
}

fn append_planar(into: &mut [Vec<f32>], produced: Vec<Vec<f32>>) {
    for (channel, block) in into.iter_mut().zip(produced) {
        channel.extend(block);
    }
}

fn resample_error(err: &dyn std::fmt::Display) -> EpisodeError {
    EpisodeError::FileProcessing(format!("resampling failed: {err}"))
}

fn ms_to_frames(duration_ms: u64, sample_rate: u32) -> usize {
    (duration_ms * u64::from(sample_rate) / 1000) as usize
}

fn scale(sample: i16, factor: f32) -> i16 {
    (f32::from(sample) * factor)
        .round()
        .clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(frames: usize, rate: u32) -> AudioSegment {
        AudioSegment::new((0..frames).map(|i| i as i16).collect(), rate, 1)
    }

    #[test]
    fn partial_frames_are_dropped() {
        let segment = AudioSegment::new(vec![1, 2, 3, 4, 5], 8000, 2);
        assert_eq!(segment.samples(), [1, 2, 3, 4]);
        assert_eq!(segment.frames(), 2);
    }

    #[test]
    fn silence_has_requested_duration() {
        let silent = AudioSegment::silent(1500, 16_000, 2);
        assert_eq!(silent.frames(), 24_000);
        assert_eq!(silent.duration_ms(), 1500);
        assert!(silent.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn slice_is_clamped_to_length() {
        let segment = ramp(1000, 1000);
        assert_eq!(segment.slice_to(250).frames(), 250);
        assert_eq!(segment.slice_to(5000).frames(), 1000);
    }

    #[test]
    fn gain_scales_and_saturates() {
        let segment = AudioSegment::new(vec![1000, -1000, 30_000], 8000, 1);
        let quieter = segment.apply_gain(-20.0);
        assert_eq!(quieter.samples(), [100, -100, 3000]);
        let louder = segment.apply_gain(20.0);
        assert_eq!(louder.samples()[2], i16::MAX);
    }

    #[test]
    fn fade_out_reaches_silence() {
        let segment = AudioSegment::new(vec![1000; 100], 100, 1);
        let faded = segment.fade_out(500);
        assert_eq!(&faded.samples()[..50], &segment.samples()[..50]);
        assert_eq!(faded.samples()[50], 1000);
        assert!(faded.samples()[75] < 600);
        assert!(faded.samples()[99] <= 20);
    }

    #[test]
    fn resampling_changes_frame_count() {
        let segment = ramp(100, 8000);
        let up = segment.with_sample_rate(16_000).unwrap();
        assert_eq!(up.frames(), 200);
        assert_eq!(up.sample_rate(), 16_000);
        assert_eq!(up.duration_ms(), segment.duration_ms());
    }

    #[test]
    fn resampling_keeps_a_steady_level() {
        // Polly speech at 24 kHz going onto a 44.1 kHz stereo bed.
        let segment = AudioSegment::new(vec![8000; 24_000 * 2], 24_000, 2);
        let up = segment.with_sample_rate(44_100).unwrap();
        assert_eq!(up.frames(), 44_100);
        assert_eq!(up.channels(), 2);
        assert_eq!(up.duration_ms(), 1000);

        // Away from the edges the filter settles on the input level.
        let middle = &up.samples()[2 * 20_000..2 * 24_000];
        assert!(middle.iter().all(|s| (7900..=8100).contains(s)), "{:?}", &middle[..8]);
    }

    #[test]
    fn downsampling_is_supported() {
        let segment = AudioSegment::silent(2000, 48_000, 1);
        let down = segment.with_sample_rate(16_000).unwrap();
        assert_eq!(down.frames(), 32_000);
        assert!(down.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn channel_remix() {
        let stereo = AudioSegment::new(vec![100, 300, -50, 50], 8000, 2);
        assert_eq!(stereo.with_channels(1).samples(), [200, 0]);

        let mono = AudioSegment::new(vec![7, 9], 8000, 1);
        assert_eq!(mono.with_channels(2).samples(), [7, 7, 9, 9]);
    }

    #[test]
    fn overlay_keeps_base_length_and_sums() {
        let base = AudioSegment::new(vec![10; 4], 8000, 1);
        let top = AudioSegment::new(vec![5, 5], 8000, 1);
        assert_eq!(base.overlay(&top).unwrap().samples(), [15, 15, 10, 10]);

        let loud = AudioSegment::new(vec![i16::MAX; 4], 8000, 1);
        assert_eq!(loud.overlay(&loud).unwrap().samples(), [i16::MAX; 4]);
    }

    #[test]
    fn overlay_converts_the_top_track() {
        let base = AudioSegment::silent(1000, 16_000, 2);
        let top = AudioSegment::new(vec![1000; 8000], 8000, 1);
        let mixed = base.overlay(&top).unwrap();
        assert_eq!(mixed.sample_rate(), 16_000);
        assert_eq!(mixed.channels(), 2);
        assert_eq!(mixed.frames(), 16_000);
        let mid = 2 * 8000;
        assert!((980..=1020).contains(&mixed.samples()[mid]));
        assert_eq!(mixed.samples()[mid], mixed.samples()[mid + 1]);
    }
}
