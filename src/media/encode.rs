use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::error::{Result, SubforgeError};
use super::{probe_media, MediaCommand, MediaCommandBuilder};

/// Hardware acceleration device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HwDevice {
    /// VA-API (Intel/AMD on Linux)
    Vaapi,
    /// NVIDIA CUDA / NVENC
    Cuda,
    /// Intel Quick Sync Video
    Qsv,
}

/// Where the filter graph runs when hardware acceleration is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderMethod {
    Hw,
    Sw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    H264,
    Vp9,
    Av1,
}

/// Output container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Mkv,
    Mp4,
    Webm,
}

impl HwDevice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vaapi => "vaapi",
            Self::Cuda => "cuda",
            Self::Qsv => "qsv",
        }
    }

    /// Filter that moves software frames back onto the device
    fn upload_filter(&self) -> &'static str {
        match self {
            Self::Vaapi => ",hwupload",
            Self::Cuda => ",hwupload_cuda",
            Self::Qsv => ",hwupload=extra_hw_frames=64",
        }
    }
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mkv => "mkv",
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = SubforgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mkv" => Ok(Self::Mkv),
            "mp4" => Ok(Self::Mp4),
            "webm" => Ok(Self::Webm),
            other => Err(SubforgeError::Encode(format!(
                "Unsupported output format: {}. Use 'mkv', 'mp4', or 'webm'",
                other
            ))),
        }
    }
}

/// Forced style applied on top of the subtitle file when burning in.
/// Every field left `None` keeps the file's own styling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOverride {
    pub font_name: Option<String>,
    pub font_size: Option<u32>,
    /// Colour as `AABBGGRR` hex, with or without the `&H` prefix
    pub font_color: Option<String>,
    pub outline_width: Option<f64>,
    pub outline_color: Option<String>,
    /// One of tl, tc, tr, ml, mc, mr, bl, bc, br
    pub position: Option<String>,
}

impl StyleOverride {
    pub fn is_empty(&self) -> bool {
        self.font_name.is_none()
            && self.font_size.is_none()
            && self.font_color.is_none()
            && self.outline_width.is_none()
            && self.outline_color.is_none()
            && self.position.is_none()
    }

    fn force_style_parts(&self) -> Vec<String> {
        let mut parts = Vec::new();

        if let Some(name) = &self.font_name {
            parts.push(format!("FontName={}", name));
        }
        if let Some(size) = self.font_size {
            parts.push(format!("FontSize={}", size));
        }
        if let Some(color) = &self.font_color {
            parts.push(format!("PrimaryColour=&H{}", strip_color_prefix(color)));
        }
        if let Some(color) = &self.outline_color {
            parts.push(format!("OutlineColour=&H{}", strip_color_prefix(color)));
        }
        if let Some(width) = self.outline_width {
            parts.push(format!("Outline={}", width));
        }
        if let Some(position) = &self.position {
            parts.push(format!("Alignment={}", position_to_alignment(position)));
        }

        if !parts.is_empty() {
            parts.push("BorderStyle=1".to_string());
        }
        parts
    }
}

fn strip_color_prefix(color: &str) -> &str {
    color
        .strip_prefix("&H")
        .or_else(|| color.strip_prefix("&h"))
        .unwrap_or(color)
}

/// Numeric-keypad alignment for a compass position code; bottom centre by default
pub fn position_to_alignment(position: &str) -> u8 {
    match position.to_lowercase().as_str() {
        "tl" => 7,
        "tc" => 8,
        "tr" => 9,
        "ml" => 4,
        "mc" => 5,
        "mr" => 6,
        "bl" => 1,
        "bc" => 2,
        "br" => 3,
        _ => 2,
    }
}

/// Settings for one encode call
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeOptions {
    /// Burn into the pixels (true) or mux as a separate stream (false)
    pub burn_subtitles: bool,
    /// Copy the video stream when muxing instead of re-encoding
    pub copy_video: bool,
    pub output_format: OutputFormat,
    pub use_hardware_accel: bool,
    pub hw_device: HwDevice,
    pub render_method: RenderMethod,
    pub codec: VideoCodec,
    pub style: StyleOverride,
    /// Extra `-key value` options appended before the output path
    pub encoding_options: Vec<(String, String)>,
    pub show_progress: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            burn_subtitles: true,
            copy_video: true,
            output_format: OutputFormat::Mkv,
            use_hardware_accel: true,
            hw_device: HwDevice::Vaapi,
            render_method: RenderMethod::Hw,
            codec: VideoCodec::Av1,
            style: StyleOverride::default(),
            encoding_options: Vec::new(),
            show_progress: true,
        }
    }
}

/// Escape a path for use inside an ffmpeg filter argument
pub fn escape_filter_path(path: &Path) -> String {
    let escaped = path
        .to_string_lossy()
        .replace('\\', "/")
        .replace(':', "\\:")
        .replace('\'', "'\\''");
    format!("'{}'", escaped)
}

fn is_styled_subtitle(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("ass") || ext.eq_ignore_ascii_case("ssa"))
        .unwrap_or(false)
}

/// `subtitles=` filter for burning in; styled files without overrides keep
/// their authored styles.
pub fn build_subtitle_filter(subtitle_path: &Path, style: &StyleOverride) -> String {
    let escaped = escape_filter_path(subtitle_path);

    if is_styled_subtitle(subtitle_path) && style.is_empty() {
        return format!("subtitles={}", escaped);
    }

    let parts = style.force_style_parts();
    if parts.is_empty() {
        format!("subtitles={}", escaped)
    } else {
        format!("subtitles={}:force_style='{}'", escaped, parts.join(","))
    }
}

fn software_encoder_args(codec: VideoCodec) -> &'static [&'static str] {
    match codec {
        VideoCodec::H264 => &["-c:v", "libx264", "-crf", "18", "-preset", "fast"],
        VideoCodec::Vp9 => &["-c:v", "libvpx-vp9", "-crf", "30", "-b:v", "0", "-c:a", "libopus", "-b:a", "128k"],
        VideoCodec::Av1 => &["-c:v", "libaom-av1", "-crf", "30", "-b:v", "0"],
    }
}

fn hardware_encoder_args(device: HwDevice, codec: VideoCodec) -> Option<&'static [&'static str]> {
    match (device, codec) {
        (HwDevice::Vaapi, VideoCodec::H264) => Some(&["-c:v", "h264_vaapi", "-qp", "18"]),
        (HwDevice::Vaapi, VideoCodec::Vp9) => Some(&["-c:v", "vp9_vaapi", "-qp", "20"]),
        (HwDevice::Vaapi, VideoCodec::Av1) => Some(&["-c:v", "av1_vaapi", "-qp", "20"]),
        (HwDevice::Cuda, VideoCodec::H264) => Some(&["-c:v", "h264_nvenc", "-preset", "p4", "-qp", "18"]),
        (HwDevice::Qsv, VideoCodec::H264) => Some(&["-c:v", "h264_qsv", "-q", "18"]),
        _ => None,
    }
}

/// Whether `device` has an encoder for `codec`
pub fn has_hardware_encoder(device: HwDevice, codec: VideoCodec) -> bool {
    hardware_encoder_args(device, codec).is_some()
}

/// Encoder name and quality parameters for a device/codec pair. Pairs a
/// device cannot encode fall back to the software encoder for that codec.
pub fn encoder_args(use_hardware_accel: bool, device: HwDevice, codec: VideoCodec) -> Vec<&'static str> {
    let hardware = if use_hardware_accel {
        hardware_encoder_args(device, codec)
    } else {
        None
    };
    hardware.unwrap_or_else(|| software_encoder_args(codec)).to_vec()
}

/// Subtitle stream codec when muxing, `None` when burning in
fn mux_subtitle_codec(options: &EncodeOptions) -> Result<Option<&'static str>> {
    match (options.burn_subtitles, options.output_format) {
        (true, _) => Ok(None),
        (false, OutputFormat::Mp4) => Ok(Some("mov_text")),
        (false, OutputFormat::Mkv) => Ok(Some("copy")),
        (false, OutputFormat::Webm) => Err(SubforgeError::Encode(
            "WebM format only supports WebVTT subtitles when not burning in. \
             Burn the subtitles in or select mkv/mp4 output format."
                .to_string(),
        )),
    }
}

/// Output path for the encoded video: `<stem>-sub.<format>` beside the input
/// by default, otherwise the given path with its extension forced to the format.
pub fn resolve_output_path(video_path: &Path, output_path: Option<&Path>, format: OutputFormat) -> PathBuf {
    match output_path {
        None => {
            let stem = video_path.file_stem().unwrap_or_default().to_string_lossy();
            video_path.with_file_name(format!("{}-sub.{}", stem, format.extension()))
        }
        Some(path) => {
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case(format.extension()))
                .unwrap_or(false);
            if matches {
                path.to_path_buf()
            } else {
                path.with_extension(format.extension())
            }
        }
    }
}

/// Build the ffmpeg command that burns or muxes `subtitle_path` into `video_path`
pub fn build_embed_command(
    base: MediaCommand,
    video_path: &Path,
    subtitle_path: &Path,
    output_path: &Path,
    options: &EncodeOptions,
) -> Result<MediaCommand> {
    let mux_codec = mux_subtitle_codec(options)?;
    let reencode = options.burn_subtitles || !options.copy_video;
    let hw_encode = options.use_hardware_accel && has_hardware_encoder(options.hw_device, options.codec);

    // Subtitle compositing needs frames in system memory, and so does a
    // software encoder. A hardware re-encode keeps frames on the device.
    let render_method = if options.burn_subtitles || (reencode && !hw_encode) {
        RenderMethod::Sw
    } else if reencode {
        RenderMethod::Hw
    } else {
        options.render_method
    };

    let mut cmd = base.overwrite();
    let mut filter_prefix = "";
    let mut filter_suffix = "";

    if options.use_hardware_accel {
        cmd = cmd.arg("-hwaccel").arg(options.hw_device.as_str());
        match render_method {
            RenderMethod::Sw => {
                if hw_encode {
                    filter_prefix = "format=nv12,";
                    filter_suffix = options.hw_device.upload_filter();
                }
            }
            RenderMethod::Hw => {
                cmd = cmd.arg("-hwaccel_output_format").arg(options.hw_device.as_str());
            }
        }
    }

    cmd = cmd.input(video_path);

    if let Some(codec) = mux_codec {
        cmd = cmd.input(subtitle_path).map("0:v").map("0:a?").map("1");
        cmd = if options.copy_video {
            cmd.copy_video().copy_audio()
        } else {
            cmd.copy_audio()
                .args(encoder_args(options.use_hardware_accel, options.hw_device, options.codec))
        };
        cmd = cmd.subtitle_codec(codec);
    } else {
        let filter = format!(
            "{}{}{}",
            filter_prefix,
            build_subtitle_filter(subtitle_path, &options.style),
            filter_suffix
        );

        cmd = cmd
            .map("0:v")
            .map("0:a?")
            .copy_audio()
            .video_filter(filter)
            .args(encoder_args(options.use_hardware_accel, options.hw_device, options.codec));
    }

    cmd = cmd.options(&options.encoding_options);

    if options.show_progress {
        cmd = cmd.arg("-stats");
    }

    Ok(cmd.output(output_path))
}

/// Burn or mux a subtitle file into a video; returns the output path
pub async fn embed_subtitles(
    ffmpeg_path: &str,
    ffprobe_path: &str,
    video_path: &Path,
    subtitle_path: &Path,
    output_path: Option<&Path>,
    options: &EncodeOptions,
) -> Result<PathBuf> {
    if !video_path.exists() {
        return Err(SubforgeError::Encode(format!("Video file not found: {}", video_path.display())));
    }
    if !subtitle_path.exists() {
        return Err(SubforgeError::Encode(format!(
            "Subtitle file not found: {}",
            subtitle_path.display()
        )));
    }

    mux_subtitle_codec(options)?;

    probe_media(ffprobe_path, video_path)
        .await
        .map_err(|e| SubforgeError::Encode(format!("Failed to get video information: {}", e)))?;

    let output_path = resolve_output_path(video_path, output_path, options.output_format);
    let description = if options.burn_subtitles { "Subtitle burn-in" } else { "Subtitle muxing" };

    let command = build_embed_command(
        MediaCommandBuilder::new(ffmpeg_path).custom(description),
        video_path,
        subtitle_path,
        &output_path,
        options,
    )?;

    info!(
        "{}: {} + {} -> {}",
        description,
        video_path.display(),
        subtitle_path.display(),
        output_path.display()
    );

    if options.show_progress {
        command.execute_with_progress(SubforgeError::Encode).await?;
    } else {
        command.execute(SubforgeError::Encode).await?;
    }

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(options: &EncodeOptions, subtitle: &str) -> Result<MediaCommand> {
        build_embed_command(
            MediaCommand::new("ffmpeg", "Test"),
            Path::new("in.mp4"),
            Path::new(subtitle),
            Path::new("out.mkv"),
            options,
        )
    }

    #[test]
    fn test_escape_filter_path() {
        assert_eq!(escape_filter_path(Path::new("/tmp/a.ass")), "'/tmp/a.ass'");
        assert_eq!(escape_filter_path(Path::new("C:\\subs\\it's.ass")), "'C\\:/subs/it'\\''s.ass'");
    }

    #[test]
    fn test_ass_without_overrides_keeps_authored_style() {
        let filter = build_subtitle_filter(Path::new("movie-ja.ass"), &StyleOverride::default());
        assert_eq!(filter, "subtitles='movie-ja.ass'");
    }

    #[test]
    fn test_srt_without_overrides_has_no_force_style() {
        let filter = build_subtitle_filter(Path::new("movie.srt"), &StyleOverride::default());
        assert_eq!(filter, "subtitles='movie.srt'");
    }

    #[test]
    fn test_force_style_from_overrides() {
        let style = StyleOverride {
            font_name: Some("Noto Sans".to_string()),
            font_size: Some(28),
            font_color: Some("&H00FFFF00".to_string()),
            outline_width: Some(1.5),
            position: Some("TC".to_string()),
            ..StyleOverride::default()
        };
        let filter = build_subtitle_filter(Path::new("movie.ass"), &style);
        assert_eq!(
            filter,
            "subtitles='movie.ass':force_style='FontName=Noto Sans,FontSize=28,PrimaryColour=&H00FFFF00,Outline=1.5,Alignment=8,BorderStyle=1'"
        );
    }

    #[test]
    fn test_position_codes() {
        assert_eq!(position_to_alignment("tl"), 7);
        assert_eq!(position_to_alignment("mr"), 6);
        assert_eq!(position_to_alignment("br"), 3);
        assert_eq!(position_to_alignment("middle"), 2);
    }

    #[test]
    fn test_burn_with_vaapi_forces_software_filter() {
        let cmd = build(&EncodeOptions::default(), "movie.ass").unwrap();

        assert_eq!(cmd.value_of("-hwaccel"), Some("vaapi"));
        assert_eq!(cmd.position("-hwaccel_output_format"), None);
        assert_eq!(cmd.value_of("-vf"), Some("format=nv12,subtitles='movie.ass',hwupload"));
        assert_eq!(cmd.value_of("-c:v"), Some("av1_vaapi"));
        assert_eq!(cmd.value_of("-qp"), Some("20"));
        assert_eq!(cmd.value_of("-c:a"), Some("copy"));
        assert!(cmd.position("-hwaccel").unwrap() < cmd.position("-i").unwrap());
        assert_eq!(cmd.args.last().map(String::as_str), Some("out.mkv"));
    }

    #[test]
    fn test_upload_filters_per_device() {
        for (device, suffix) in [
            (HwDevice::Cuda, ",hwupload_cuda"),
            (HwDevice::Qsv, ",hwupload=extra_hw_frames=64"),
        ] {
            let options = EncodeOptions {
                hw_device: device,
                codec: VideoCodec::H264,
                ..EncodeOptions::default()
            };
            let cmd = build(&options, "a.ass").unwrap();
            assert!(cmd.value_of("-vf").unwrap().ends_with(suffix));
        }
    }

    #[test]
    fn test_encoder_selection() {
        assert_eq!(encoder_args(true, HwDevice::Cuda, VideoCodec::H264), vec!["-c:v", "h264_nvenc", "-preset", "p4", "-qp", "18"]);
        assert_eq!(encoder_args(true, HwDevice::Qsv, VideoCodec::H264), vec!["-c:v", "h264_qsv", "-q", "18"]);
        assert_eq!(encoder_args(true, HwDevice::Cuda, VideoCodec::Av1)[1], "libaom-av1");
        assert_eq!(encoder_args(true, HwDevice::Qsv, VideoCodec::Vp9)[1], "libvpx-vp9");
        assert_eq!(encoder_args(false, HwDevice::Vaapi, VideoCodec::H264), vec!["-c:v", "libx264", "-crf", "18", "-preset", "fast"]);
    }

    #[test]
    fn test_software_vp9_reencodes_audio() {
        let options = EncodeOptions {
            use_hardware_accel: false,
            codec: VideoCodec::Vp9,
            ..EncodeOptions::default()
        };
        let cmd = build(&options, "a.ass").unwrap();

        assert_eq!(cmd.position("-hwaccel"), None);
        assert_eq!(cmd.value_of("-vf"), Some("subtitles='a.ass'"));
        assert_eq!(cmd.last_value_of("-c:a"), Some("libopus"));
    }

    #[test]
    fn test_mux_mkv_copies_streams() {
        let options = EncodeOptions {
            burn_subtitles: false,
            use_hardware_accel: false,
            show_progress: false,
            ..EncodeOptions::default()
        };
        let cmd = build(&options, "a.ass").unwrap();

        assert_eq!(
            cmd.args,
            vec![
                "-y", "-i", "in.mp4", "-i", "a.ass", "-map", "0:v", "-map", "0:a?", "-map", "1", "-c:v",
                "copy", "-c:a", "copy", "-c:s", "copy", "out.mkv"
            ]
        );
    }

    #[test]
    fn test_mux_mp4_uses_mov_text() {
        let options = EncodeOptions {
            burn_subtitles: false,
            output_format: OutputFormat::Mp4,
            ..EncodeOptions::default()
        };
        let cmd = build(&options, "a.ass").unwrap();
        assert_eq!(cmd.value_of("-c:s"), Some("mov_text"));
        assert_eq!(cmd.position("-vf"), None);
        // Mux keeps the requested hardware decode path
        assert_eq!(cmd.value_of("-hwaccel_output_format"), Some("vaapi"));
    }

    #[test]
    fn test_webm_mux_always_rejected() {
        for use_hardware_accel in [true, false] {
            for copy_video in [true, false] {
                let options = EncodeOptions {
                    burn_subtitles: false,
                    output_format: OutputFormat::Webm,
                    use_hardware_accel,
                    copy_video,
                    ..EncodeOptions::default()
                };
                assert!(matches!(build(&options, "a.ass"), Err(SubforgeError::Encode(_))));
            }
        }
    }

    #[tokio::test]
    async fn test_webm_mux_rejected_before_probing() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        let subtitle = dir.path().join("clip.ass");
        std::fs::write(&video, b"not a video").unwrap();
        std::fs::write(&subtitle, b"[Script Info]").unwrap();

        let options = EncodeOptions {
            burn_subtitles: false,
            output_format: OutputFormat::Webm,
            ..EncodeOptions::default()
        };
        let err = embed_subtitles("ffmpeg", "ffprobe", &video, &subtitle, None, &options)
            .await
            .unwrap_err();
        assert!(matches!(err, SubforgeError::Encode(msg) if msg.contains("WebM")));
    }

    #[test]
    fn test_mux_reencode_uses_hardware_encoder_on_device_frames() {
        let options = EncodeOptions {
            burn_subtitles: false,
            copy_video: false,
            render_method: RenderMethod::Sw,
            ..EncodeOptions::default()
        };
        let cmd = build(&options, "a.ass").unwrap();

        assert_eq!(cmd.value_of("-hwaccel"), Some("vaapi"));
        assert_eq!(cmd.value_of("-hwaccel_output_format"), Some("vaapi"));
        assert_eq!(cmd.value_of("-c:v"), Some("av1_vaapi"));
        assert_eq!(cmd.value_of("-c:s"), Some("copy"));
        assert_eq!(cmd.position("-vf"), None);
    }

    #[test]
    fn test_mux_reencode_with_software_fallback_keeps_frames_in_memory() {
        let options = EncodeOptions {
            burn_subtitles: false,
            copy_video: false,
            hw_device: HwDevice::Cuda,
            ..EncodeOptions::default()
        };
        let cmd = build(&options, "a.ass").unwrap();

        assert_eq!(cmd.value_of("-hwaccel"), Some("cuda"));
        assert_eq!(cmd.position("-hwaccel_output_format"), None);
        assert_eq!(cmd.value_of("-c:v"), Some("libaom-av1"));
    }

    #[test]
    fn test_burn_with_software_fallback_skips_upload() {
        for device in [HwDevice::Cuda, HwDevice::Qsv] {
            let options = EncodeOptions {
                hw_device: device,
                ..EncodeOptions::default()
            };
            let cmd = build(&options, "a.ass").unwrap();

            assert_eq!(cmd.value_of("-vf"), Some("subtitles='a.ass'"));
            assert_eq!(cmd.value_of("-c:v"), Some("libaom-av1"));
            assert_eq!(cmd.position("-hwaccel_output_format"), None);
        }
    }

    #[test]
    fn test_extra_options_and_stats_precede_output() {
        let options = EncodeOptions {
            encoding_options: vec![("threads".to_string(), "4".to_string())],
            ..EncodeOptions::default()
        };
        let cmd = build(&options, "a.ass").unwrap();
        let n = cmd.args.len();
        assert_eq!(&cmd.args[n - 4..], &["-threads", "4", "-stats", "out.mkv"]);
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("MKV".parse::<OutputFormat>().unwrap(), OutputFormat::Mkv);
        assert_eq!(" mp4".parse::<OutputFormat>().unwrap(), OutputFormat::Mp4);
        assert!(matches!("avi".parse::<OutputFormat>(), Err(SubforgeError::Encode(_))));
    }

    #[test]
    fn test_resolve_output_path() {
        let video = Path::new("/v/movie.mp4");
        assert_eq!(resolve_output_path(video, None, OutputFormat::Mkv), PathBuf::from("/v/movie-sub.mkv"));
        assert_eq!(
            resolve_output_path(video, Some(Path::new("/o/out.avi")), OutputFormat::Mp4),
            PathBuf::from("/o/out.mp4")
        );
        assert_eq!(
            resolve_output_path(video, Some(Path::new("/o/out.MKV")), OutputFormat::Mkv),
            PathBuf::from("/o/out.MKV")
        );
    }

    #[tokio::test]
    async fn test_missing_inputs_are_encode_errors() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        std::fs::write(&video, b"not a video").unwrap();

        let err = embed_subtitles("ffmpeg", "ffprobe", &video, &dir.path().join("none.ass"), None, &EncodeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SubforgeError::Encode(msg) if msg.contains("Subtitle file not found")));
    }
}
