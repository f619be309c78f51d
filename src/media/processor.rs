use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::MediaConfig;
use crate::error::{Result, SubforgeError};
use super::audio::{build_extract_command, plan_audio};
use super::{encode, probe_media, AudioOptions, EncodeOptions, MediaCommandBuilder, MediaInfo, MediaProcessor};

/// Concrete implementation of media processor (FFmpeg-based)
pub struct MediaProcessorImpl {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl MediaProcessorImpl {
    /// Create a new media processor implementation
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.ffmpeg_path);

        Self {
            config,
            command_builder,
        }
    }
}

#[async_trait]
impl MediaProcessor for MediaProcessorImpl {
    async fn probe(&self, path: &Path) -> Result<MediaInfo> {
        probe_media(&self.config.ffprobe_path, path).await
    }

    async fn extract_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
        options: &AudioOptions,
    ) -> Result<PathBuf> {
        if !video_path.exists() {
            return Err(SubforgeError::Media(format!("Video file not found: {}", video_path.display())));
        }

        let info = self.probe(video_path).await?;
        let plan = plan_audio(info.duration, options);

        info!("Extracting audio from {} to {}", video_path.display(), audio_path.display());

        let command = build_extract_command(
            self.command_builder.custom("Audio extraction"),
            video_path,
            audio_path,
            &plan,
            options,
        );
        command.execute(SubforgeError::Media).await?;

        info!("Audio extraction completed");
        Ok(audio_path.to_path_buf())
    }

    async fn embed_subtitles(
        &self,
        video_path: &Path,
        subtitle_path: &Path,
        output_path: &Path,
        options: &EncodeOptions,
    ) -> Result<PathBuf> {
        encode::embed_subtitles(
            &self.config.ffmpeg_path,
            &self.config.ffprobe_path,
            video_path,
            subtitle_path,
            Some(output_path),
            options,
        )
        .await
    }

    async fn check_availability(&self) -> Result<()> {
        self.command_builder
            .version_check()
            .execute(SubforgeError::Media)
            .await
            .map_err(|e| SubforgeError::Media(format!("ffmpeg is not available: {}", e)))?;

        info!("Media processor is available");
        Ok(())
    }

    async fn version_info(&self) -> Result<String> {
        let stdout = self.command_builder.version_check().execute(SubforgeError::Media).await?;
        let banner = String::from_utf8_lossy(&stdout);
        Ok(banner.lines().next().unwrap_or("Unknown version").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> MediaProcessorImpl {
        MediaProcessorImpl::new(MediaConfig {
            ffmpeg_path: "/nonexistent/ffmpeg".to_string(),
            ffprobe_path: "/nonexistent/ffprobe".to_string(),
            ..MediaConfig::default()
        })
    }

    #[tokio::test]
    async fn test_extract_missing_video_is_media_error() {
        let err = processor()
            .extract_audio(Path::new("/nonexistent/in.mp4"), Path::new("out.wav"), &AudioOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SubforgeError::Media(msg) if msg.contains("not found")));
    }

    #[tokio::test]
    async fn test_extract_probe_failure_is_media_error() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("in.mp4");
        std::fs::write(&video, b"x").unwrap();

        let err = processor()
            .extract_audio(&video, &dir.path().join("out.wav"), &AudioOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SubforgeError::Media(_)));
    }

    #[tokio::test]
    async fn test_unavailable_binary() {
        assert!(processor().check_availability().await.is_err());
    }
}
