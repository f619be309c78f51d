use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::MediaCommand;

/// Baseline settings of the size-fitting mode: 16 kHz, mono, 16-bit
pub const SMALL_SAMPLE_RATE: u32 = 16_000;
pub const SMALL_CHANNELS: u32 = 1;
pub const SMALL_BIT_DEPTH: u32 = 16;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Audio extraction settings
#[derive(Debug, Clone, PartialEq)]
pub struct AudioOptions {
    /// Output container/extension, e.g. `wav`
    pub format: String,
    pub sample_rate: Option<u32>,
    pub channels: Option<u32>,
    pub bit_depth: Option<u32>,
    /// Fit the output under `max_size_mb`
    pub small: bool,
    pub max_size_mb: f64,
    /// Raw `-key value` options appended after the computed ones
    pub extra: Vec<(String, String)>,
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            format: "wav".to_string(),
            sample_rate: None,
            channels: None,
            bit_depth: None,
            small: true,
            max_size_mb: 19.5,
            extra: Vec::new(),
        }
    }
}

/// Concrete settings chosen for one extraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioPlan {
    pub sample_rate: Option<u32>,
    pub channels: Option<u32>,
    pub bit_depth: Option<u32>,
}

impl AudioPlan {
    /// PCM codec for WAV output
    pub fn wav_codec(&self) -> Option<&'static str> {
        self.bit_depth.map(pcm_codec_for_bit_depth)
    }
}

/// Estimated PCM size in MiB
pub fn estimate_size_mb(duration: f64, sample_rate: u32, bit_depth: u32, channels: u32) -> f64 {
    duration * sample_rate as f64 * (bit_depth as f64 / 8.0) * channels as f64 / BYTES_PER_MB
}

/// Snap a sample rate down onto the ladder 8000/16000/22050/44100
pub fn snap_sample_rate(max_sample_rate: f64) -> u32 {
    if max_sample_rate < 16_000.0 {
        8_000
    } else if max_sample_rate < 22_050.0 {
        16_000
    } else if max_sample_rate < 44_100.0 {
        22_050
    } else {
        44_100
    }
}

pub fn pcm_codec_for_bit_depth(bit_depth: u32) -> &'static str {
    match bit_depth {
        8 => "pcm_u8",
        24 => "pcm_s24le",
        _ => "pcm_s16le",
    }
}

/// Decide the extraction settings for a file of `duration` seconds.
///
/// Small mode computes its values first; explicit per-call values then
/// replace them.
pub fn plan_audio(duration: f64, options: &AudioOptions) -> AudioPlan {
    let mut plan = AudioPlan {
        sample_rate: None,
        channels: None,
        bit_depth: None,
    };

    if options.small {
        let mut sample_rate = SMALL_SAMPLE_RATE;
        let estimated = estimate_size_mb(duration, sample_rate, SMALL_BIT_DEPTH, SMALL_CHANNELS);

        if estimated > options.max_size_mb && duration > 0.0 {
            let max_bytes = options.max_size_mb * BYTES_PER_MB;
            let max_sample_rate =
                max_bytes / duration / (SMALL_BIT_DEPTH as f64 / 8.0) / SMALL_CHANNELS as f64;
            sample_rate = snap_sample_rate(max_sample_rate);
            debug!(
                "Estimated {:.1} MB exceeds {:.1} MB, sample rate lowered to {} Hz",
                estimated, options.max_size_mb, sample_rate
            );
        }

        plan = AudioPlan {
            sample_rate: Some(sample_rate),
            channels: Some(SMALL_CHANNELS),
            bit_depth: Some(SMALL_BIT_DEPTH),
        };
    }

    AudioPlan {
        sample_rate: options.sample_rate.or(plan.sample_rate),
        channels: options.channels.or(plan.channels),
        bit_depth: options.bit_depth.or(plan.bit_depth),
    }
}

/// Output path next to the video, with the audio format as extension
pub fn default_audio_path(video_path: &Path, format: &str) -> PathBuf {
    video_path.with_extension(format)
}

/// Build the extraction command:
/// `-y -i <video> [-ar N] [-ac N] [-acodec C] [extra...] <out>`
pub fn build_extract_command(
    base: MediaCommand,
    video_path: &Path,
    output_path: &Path,
    plan: &AudioPlan,
    options: &AudioOptions,
) -> MediaCommand {
    let mut cmd = base.overwrite().input(video_path);

    if let Some(rate) = plan.sample_rate {
        cmd = cmd.audio_sample_rate(rate);
    }
    if let Some(channels) = plan.channels {
        cmd = cmd.audio_channels(channels);
    }
    if options.format.eq_ignore_ascii_case("wav") {
        if let Some(codec) = plan.wav_codec() {
            cmd = cmd.arg("-acodec").arg(codec);
        }
    }

    info!(
        "Audio settings: {} Hz, {} channel(s), {}-bit",
        plan.sample_rate.map_or("source".to_string(), |r| r.to_string()),
        plan.channels.map_or("source".to_string(), |c| c.to_string()),
        plan.bit_depth.map_or("source".to_string(), |b| b.to_string()),
    );

    cmd.options(&options.extra).output(output_path)
}
