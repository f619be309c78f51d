// Media processing on top of ffmpeg/ffprobe
//
// - Commands: argument-list builder and process execution
// - Probe: container/stream metadata
// - Audio: size-fitted audio extraction
// - Encode: subtitle burn-in and muxing
// - Processor: the ffmpeg-backed implementation of MediaProcessor

pub mod audio;
pub mod commands;
pub mod encode;
pub mod probe;
pub mod processor;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use audio::{AudioOptions, AudioPlan};
pub use commands::{MediaCommand, MediaCommandBuilder, StageError};
pub use encode::{EncodeOptions, HwDevice, OutputFormat, RenderMethod, StyleOverride, VideoCodec};
pub use probe::{probe_media, MediaInfo};
pub use processor::MediaProcessorImpl;

use crate::config::MediaConfig;
use crate::error::Result;

/// Main trait for media processing operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// Read container and stream metadata
    async fn probe(&self, path: &Path) -> Result<MediaInfo>;

    /// Extract the audio track of `video_path` into `audio_path`
    async fn extract_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
        options: &AudioOptions,
    ) -> Result<PathBuf>;

    /// Burn or mux subtitles into a video; returns the written path
    async fn embed_subtitles(
        &self,
        video_path: &Path,
        subtitle_path: &Path,
        output_path: &Path,
        options: &EncodeOptions,
    ) -> Result<PathBuf>;

    /// Check if the transcoder is available
    async fn check_availability(&self) -> Result<()>;

    /// First line of the transcoder's version banner
    async fn version_info(&self) -> Result<String>;
}

/// Factory for creating media processor instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Create the default media processor implementation (FFmpeg-based)
    pub fn create_processor(config: MediaConfig) -> Box<dyn MediaProcessor> {
        Box::new(processor::MediaProcessorImpl::new(config))
    }
}
