//! PCM normalization for Whisper.
//!
//! Whisper expects a single contiguous buffer of mono `f32` samples at 16 kHz. Decoded packets are
//! downmixed as they arrive and fed to a streaming resampler in fixed-size blocks, so only the
//! 16 kHz output grows with the length of the recording.

use anyhow::{Context, Result, anyhow, bail};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use symphonia::core::audio::{AudioBufferRef, SampleBuffer};

/// The sample rate whisper.cpp consumes (Hz).
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Source frames fed to rubato per `process()` call.
const RESAMPLE_CHUNK_FRAMES: usize = 2048;

/// Collects decoded packets as mono samples at [`WHISPER_SAMPLE_RATE`].
///
/// The source sample rate and channel count are fixed by the first buffer; a stream that changes
/// either is rejected.
#[derive(Default)]
pub struct MonoAccumulator {
    // Scratch buffer for interleaving decoded PCM, with its capacity in frames.
    scratch: Option<(SampleBuffer<f32>, usize)>,
    // (sample rate, channel count) of the stream.
    format: Option<(u32, usize)>,
    source_frames: usize,
    // Downmixed samples of the current packet.
    mono: Vec<f32>,
    sink: Option<Sink>,
}

enum Sink {
    Passthrough(Vec<f32>),
    Resample(WhisperResampler),
}

impl MonoAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Downmix one decoded buffer and push it towards the 16 kHz output.
    pub fn push_decoded(&mut self, decoded: &AudioBufferRef<'_>) -> Result<()> {
        let spec = *decoded.spec();
        let channels = spec.channels.count();
        if channels == 0 {
            bail!("decoded audio had zero channels");
        }

        match self.format {
            None => {
                self.format = Some((spec.rate, channels));
                self.sink = Some(if spec.rate == WHISPER_SAMPLE_RATE {
                    Sink::Passthrough(Vec::new())
                } else {
                    Sink::Resample(WhisperResampler::new(spec.rate)?)
                });
            }
            Some((rate, _)) if rate != spec.rate => {
                bail!("sample rate changed mid-stream ({rate} Hz -> {} Hz)", spec.rate)
            }
            Some((_, count)) if count != channels => {
                bail!("channel count changed mid-stream ({count} -> {channels})")
            }
            Some(_) => {}
        }

        let frames = decoded.capacity();
        let needs_scratch = match &self.scratch {
            Some((_, capacity)) => *capacity < frames,
            None => true,
        };
        if needs_scratch {
            self.scratch = Some((SampleBuffer::<f32>::new(frames as u64, spec), frames));
        }

        let (buf, _) = self
            .scratch
            .as_mut()
            .ok_or_else(|| anyhow!("sample buffer not initialized"))?;
        buf.copy_interleaved_ref(decoded.clone());

        self.mono.clear();
        downmix_into(buf.samples(), channels, &mut self.mono);
        self.source_frames += self.mono.len();

        match self.sink.as_mut() {
            Some(Sink::Passthrough(out)) => out.extend_from_slice(&self.mono),
            Some(Sink::Resample(resampler)) => resampler.push(&self.mono)?,
            None => bail!("audio sink not initialized"),
        }
        Ok(())
    }

    /// Number of mono frames pushed so far (at the source rate).
    pub fn frames(&self) -> usize {
        self.source_frames
    }

    /// The source sample rate, once at least one buffer was pushed.
    pub fn source_rate(&self) -> Option<u32> {
        self.format.map(|(rate, _)| rate)
    }

    /// Flush the resampler and return every sample at [`WHISPER_SAMPLE_RATE`].
    pub fn finish(self) -> Result<Vec<f32>> {
        match self.sink {
            None => Ok(Vec::new()),
            Some(Sink::Passthrough(out)) => Ok(out),
            Some(Sink::Resample(resampler)) => resampler.finish(),
        }
    }
}

/// Downmix interleaved samples by averaging channels, appending to `out`.
fn downmix_into(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    if channels == 1 {
        out.extend_from_slice(interleaved);
        return;
    }

    out.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}

/// Streaming mono resampler from a fixed source rate to 16 kHz.
///
/// Input is fed to rubato in [`RESAMPLE_CHUNK_FRAMES`] blocks as soon as a block fills. The
/// output skips the resampler's delay and is truncated to `frames * ratio` on [`finish`], so
/// sample positions map back to the same timestamps as the source.
///
/// [`finish`]: WhisperResampler::finish
pub struct WhisperResampler {
    resampler: SincFixedIn<f32>,
    ratio: f64,
    // Source frames waiting for a full block; doubles as rubato's input buffer.
    pending: Vec<f32>,
    // Reused rubato output buffer (one channel).
    block_out: Vec<Vec<f32>>,
    delay_remaining: usize,
    source_frames: usize,
    out: Vec<f32>,
}

impl WhisperResampler {
    pub fn new(source_rate: u32) -> Result<Self> {
        if source_rate == 0 {
            bail!("invalid source sample rate: 0 Hz");
        }

        let ratio = f64::from(WHISPER_SAMPLE_RATE) / f64::from(source_rate);
        let resampler = SincFixedIn::<f32>::new(
            ratio,
            2.0,
            SincInterpolationParameters {
                sinc_len: 256,
                f_cutoff: 0.95,
                interpolation: SincInterpolationType::Linear,
                oversampling_factor: 256,
                window: WindowFunction::BlackmanHarris2,
            },
            RESAMPLE_CHUNK_FRAMES,
            1,
        )
        .map_err(|e| anyhow!(e))
        .context("failed to init resampler")?;

        let block_out = resampler.output_buffer_allocate(true);
        let delay_remaining = resampler.output_delay();

        Ok(Self {
            resampler,
            ratio,
            pending: Vec::with_capacity(RESAMPLE_CHUNK_FRAMES),
            block_out,
            delay_remaining,
            source_frames: 0,
            out: Vec::new(),
        })
    }

    /// Queue mono source samples, resampling every block that fills.
    pub fn push(&mut self, mono: &[f32]) -> Result<()> {
        self.source_frames += mono.len();

        let mut rest = mono;
        while !rest.is_empty() {
            let take = (RESAMPLE_CHUNK_FRAMES - self.pending.len()).min(rest.len());
            self.pending.extend_from_slice(&rest[..take]);
            rest = &rest[take..];

            if self.pending.len() == RESAMPLE_CHUNK_FRAMES {
                self.process_pending()?;
            }
        }
        Ok(())
    }

    /// Flush the partial block and the resampler's delay line, returning the 16 kHz samples.
    pub fn finish(mut self) -> Result<Vec<f32>> {
        let expected = (self.source_frames as f64 * self.ratio).round() as usize;

        // The first pass flushes the partial block; later passes feed silence.
        while self.out.len() < expected {
            self.process_pending()?;
        }

        self.out.truncate(expected);
        Ok(self.out)
    }

    /// Resample `pending` (zero-padded to a full block) into `out`.
    fn process_pending(&mut self) -> Result<()> {
        self.pending.resize(RESAMPLE_CHUNK_FRAMES, 0.0);

        let (_, produced) = self
            .resampler
            .process_into_buffer(
                std::slice::from_ref(&self.pending),
                self.block_out.as_mut_slice(),
                None,
            )
            .map_err(|e| anyhow!(e))
            .context("resampler process failed")?;
        self.pending.clear();

        let channel = self
            .block_out
            .first()
            .ok_or_else(|| anyhow!("expected mono output from resampler"))?;
        let produced = &channel[..produced];

        let skip = self.delay_remaining.min(produced.len());
        self.delay_remaining -= skip;
        self.out.extend_from_slice(&produced[skip..]);
        Ok(())
    }
}

/// Resample a whole mono buffer from `source_rate` to 16 kHz.
pub fn resample_to_whisper_rate(mono: &[f32], source_rate: u32) -> Result<Vec<f32>> {
    if source_rate == WHISPER_SAMPLE_RATE {
        return Ok(mono.to_vec());
    }

    let mut resampler = WhisperResampler::new(source_rate)?;
    resampler.push(mono)?;
    resampler.finish()
}
