use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{Result, SubforgeError};
use crate::media::{AudioOptions, EncodeOptions, HwDevice, OutputFormat, RenderMethod, VideoCodec};
use crate::subtitle::{SubtitleOptions, SubtitleStyle};

/// Default config file looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "subforge.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transcriber: TranscriberConfig,
    pub translate: TranslateConfig,
    pub audio: AudioConfig,
    pub subtitle: SubtitleConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriberConfig {
    /// Base URL of the Whisper-compatible API
    pub endpoint: String,
    /// Model used for transcription
    pub model: String,
    /// Requested response format; `verbose_json` carries segment timing
    pub response_format: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Full URL of the translate endpoint
    pub endpoint: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Container/extension of the extracted audio
    pub format: String,
    /// Shrink audio settings so the file fits under `max_size_mb`
    pub small: bool,
    /// Upload cap of the transcription API, in MiB
    pub max_size_mb: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleConfig {
    pub max_chars_per_line: usize,
    /// Replaces the built-in `Default` style; unset fields keep their defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<SubtitleStyle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub ffmpeg_path: String,
    /// Path to ffprobe binary
    pub ffprobe_path: String,
    pub use_hardware_accel: bool,
    pub hw_device: HwDevice,
    pub render_method: RenderMethod,
    pub codec: VideoCodec,
    pub copy_video: bool,
    /// Stream ffmpeg statistics to the terminal while encoding
    pub show_progress: bool,
    /// Additional encoder options as `key = value`, passed as `-key value`
    pub encoding_options: Vec<(String, String)>,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            model: "whisper-large-v3".to_string(),
            response_format: "verbose_json".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout_secs: 600,
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-free.deepl.com/v2/translate".to_string(),
            api_key_env: "DEEPL_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            format: "wav".to_string(),
            small: true,
            max_size_mb: 19.5,
        }
    }
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            max_chars_per_line: 42,
            style: None,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            use_hardware_accel: true,
            hw_device: HwDevice::Vaapi,
            render_method: RenderMethod::Hw,
            codec: VideoCodec::Av1,
            copy_video: true,
            show_progress: true,
            encoding_options: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SubforgeError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SubforgeError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SubforgeError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SubforgeError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Load the explicit config file, else `subforge.toml` in the current
    /// directory, else the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
                    Self::from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Audio extraction settings for the pipeline; per-call overrides stay unset
    pub fn audio_options(&self) -> AudioOptions {
        AudioOptions {
            format: self.audio.format.clone(),
            small: self.audio.small,
            max_size_mb: self.audio.max_size_mb,
            ..AudioOptions::default()
        }
    }

    pub fn subtitle_options(&self) -> SubtitleOptions {
        SubtitleOptions {
            max_chars_per_line: self.subtitle.max_chars_per_line,
            style: self.subtitle.style.clone(),
        }
    }

    /// Encoder settings for the pipeline
    pub fn encode_options(&self, burn_subtitles: bool, output_format: OutputFormat) -> EncodeOptions {
        EncodeOptions {
            burn_subtitles,
            copy_video: self.media.copy_video,
            output_format,
            use_hardware_accel: self.media.use_hardware_accel,
            hw_device: self.media.hw_device,
            render_method: self.media.render_method,
            codec: self.media.codec,
            show_progress: self.media.show_progress,
            encoding_options: self.media.encoding_options.clone(),
            ..EncodeOptions::default()
        }
    }
}

/// Resolve an API key from an explicit value, falling back to an environment variable
pub fn resolve_api_key(explicit: Option<&str>, env_var: &str) -> Option<String> {
    explicit
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok().filter(|key| !key.trim().is_empty()))
}
