use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::media::{AudioOptions, EncodeOptions, HwDevice, OutputFormat, RenderMethod, StyleOverride, VideoCodec};
use crate::workflow::{ApiKeys, ProcessRequest};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcribe, translate and subtitle an audio/video file
    Process(ProcessArgs),

    /// Show duration, codecs and resolution of a media file
    Probe {
        /// Input media file
        media: PathBuf,
    },

    /// Extract audio from video file
    Extract(ExtractArgs),

    /// Burn or mux an existing subtitle file into a video
    Encode(EncodeArgs),

    /// Show the effective configuration or write the defaults
    Config {
        /// Write the default configuration instead of printing the current one
        #[arg(long)]
        init: bool,

        /// Destination for --init (default: ./subforge.toml)
        path: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
pub struct ProcessArgs {
    /// Path to the audio/video file to transcribe
    pub media: PathBuf,

    /// Target language for translation
    #[arg(short, long = "lang", default_value = "en")]
    pub lang: String,

    /// Output subtitle file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// API key for transcription
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    /// API key for translation
    #[arg(long, env = "DEEPL_API_KEY", hide_env_values = true)]
    pub deepl_api_key: Option<String>,

    /// Whisper model to use (default from config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Source language of the audio
    #[arg(short, long = "source-lang")]
    pub source_lang: Option<String>,

    /// Skip translation step
    #[arg(long)]
    pub no_translate: bool,

    /// Create dual-language subtitles (translated + original)
    #[arg(short, long)]
    pub dual: bool,

    /// Keep extracted audio file next to the video
    #[arg(long)]
    pub keep_extracted: bool,

    /// Encode the video with the generated subtitles
    #[arg(short, long)]
    pub encode: bool,

    /// Burn subtitles into the picture (default)
    #[arg(long, overrides_with = "no_burn")]
    pub burn: bool,

    /// Mux subtitles as a separate stream instead of burning them in
    #[arg(long, overrides_with = "burn")]
    pub no_burn: bool,

    /// Output path for the encoded video
    #[arg(long)]
    pub encoded_output: Option<PathBuf>,

    /// Output video format (mkv or mp4)
    #[arg(short, long, default_value = "mkv")]
    pub format: String,
}

impl ProcessArgs {
    pub fn request(&self) -> ProcessRequest {
        ProcessRequest {
            media: self.media.clone(),
            target_language: self.lang.clone(),
            output: self.output.clone(),
            source_language: self.source_lang.clone(),
            translate: !self.no_translate,
            dual: self.dual,
            keep_extracted: self.keep_extracted,
            encode: self.encode,
            burn: !self.no_burn,
            encoded_output: self.encoded_output.clone(),
            output_format: self.format.clone(),
        }
    }

    pub fn api_keys(&self) -> ApiKeys {
        ApiKeys {
            transcription: self.groq_api_key.clone(),
            translation: self.deepl_api_key.clone(),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ExtractArgs {
    /// Input video file
    pub video: PathBuf,

    /// Output audio file (default: video path with the format's extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Audio container/extension (default from config)
    #[arg(long)]
    pub format: Option<String>,

    #[arg(long)]
    pub sample_rate: Option<u32>,

    #[arg(long)]
    pub channels: Option<u32>,

    #[arg(long)]
    pub bit_depth: Option<u32>,

    /// Keep source audio settings instead of fitting under the size cap
    #[arg(long)]
    pub no_small: bool,

    /// Size cap in MiB (default from config)
    #[arg(long)]
    pub max_size_mb: Option<f64>,
}

impl ExtractArgs {
    /// Layer the flags on top of the configured defaults
    pub fn audio_options(&self, base: AudioOptions) -> AudioOptions {
        AudioOptions {
            format: self.format.clone().unwrap_or(base.format),
            sample_rate: self.sample_rate,
            channels: self.channels,
            bit_depth: self.bit_depth,
            small: base.small && !self.no_small,
            max_size_mb: self.max_size_mb.unwrap_or(base.max_size_mb),
            extra: base.extra,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct EncodeArgs {
    /// Input video file
    pub video: PathBuf,

    /// Subtitle file
    pub subtitle: PathBuf,

    /// Output video file (default: <stem>-sub.<format>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "mkv")]
    pub format: OutputFormat,

    /// Mux subtitles as a separate stream instead of burning them in
    #[arg(long)]
    pub no_burn: bool,

    /// Disable hardware acceleration
    #[arg(long)]
    pub no_hwaccel: bool,

    #[arg(long, value_enum)]
    pub hw_device: Option<HwDevice>,

    #[arg(long, value_enum)]
    pub render_method: Option<RenderMethod>,

    #[arg(long, value_enum)]
    pub codec: Option<VideoCodec>,

    #[arg(long)]
    pub font_name: Option<String>,

    #[arg(long)]
    pub font_size: Option<u32>,

    /// Colour as AABBGGRR hex
    #[arg(long)]
    pub font_color: Option<String>,

    #[arg(long)]
    pub outline_width: Option<f64>,

    #[arg(long)]
    pub outline_color: Option<String>,

    /// Subtitle position: tl, tc, tr, ml, mc, mr, bl, bc, br
    #[arg(long)]
    pub position: Option<String>,
}

impl EncodeArgs {
    /// Layer the flags on top of the configured defaults
    pub fn encode_options(&self, base: EncodeOptions) -> EncodeOptions {
        EncodeOptions {
            burn_subtitles: !self.no_burn,
            output_format: self.format,
            use_hardware_accel: base.use_hardware_accel && !self.no_hwaccel,
            hw_device: self.hw_device.unwrap_or(base.hw_device),
            render_method: self.render_method.unwrap_or(base.render_method),
            codec: self.codec.unwrap_or(base.codec),
            style: StyleOverride {
                font_name: self.font_name.clone(),
                font_size: self.font_size,
                font_color: self.font_color.clone(),
                outline_width: self.outline_width,
                outline_color: self.outline_color.clone(),
                position: self.position.clone(),
            },
            ..base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Commands {
        Args::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_process_defaults() {
        let Commands::Process(args) = parse(&["subforge", "process", "talk.mp4"]) else {
            panic!("expected process");
        };
        let request = args.request();

        assert_eq!(request.target_language, "en");
        assert_eq!(request.output_format, "mkv");
        assert!(request.burn);
        assert!(request.translate);
        assert!(!request.encode);
        assert_eq!(args.model, None);
    }

    #[test]
    fn test_process_flags() {
        let Commands::Process(args) = parse(&[
            "subforge", "process", "talk.mp4", "-l", "zh", "-d", "-e", "--no-burn", "-f", "mp4", "-s", "en",
            "--keep-extracted", "--encoded-output", "out.mp4",
        ]) else {
            panic!("expected process");
        };
        let request = args.request();

        assert_eq!(request.target_language, "zh");
        assert!(request.dual && request.encode && request.keep_extracted);
        assert!(!request.burn);
        assert_eq!(request.output_format, "mp4");
        assert_eq!(request.source_language.as_deref(), Some("en"));
        assert_eq!(request.encoded_output, Some(PathBuf::from("out.mp4")));
    }

    #[test]
    fn test_burn_flags_last_wins() {
        let Commands::Process(args) = parse(&["subforge", "process", "a.mp4", "--no-burn", "--burn"]) else {
            panic!("expected process");
        };
        assert!(args.request().burn);
    }

    #[test]
    fn test_encode_overrides() {
        let Commands::Encode(args) = parse(&[
            "subforge", "encode", "v.mp4", "s.ass", "--no-hwaccel", "--codec", "h264", "--position", "tc", "-f", "mp4",
        ]) else {
            panic!("expected encode");
        };
        let options = args.encode_options(EncodeOptions::default());

        assert!(!options.use_hardware_accel);
        assert_eq!(options.codec, VideoCodec::H264);
        assert_eq!(options.output_format, OutputFormat::Mp4);
        assert_eq!(options.style.position.as_deref(), Some("tc"));
        assert!(options.burn_subtitles);
    }

    #[test]
    fn test_extract_overrides() {
        let Commands::Extract(args) = parse(&["subforge", "extract", "v.mkv", "--no-small", "--sample-rate", "44100"]) else {
            panic!("expected extract");
        };
        let options = args.audio_options(AudioOptions::default());

        assert!(!options.small);
        assert_eq!(options.sample_rate, Some(44_100));
        assert_eq!(options.format, "wav");
    }
}
