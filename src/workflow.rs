use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempPath;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Result, SubforgeError};
use crate::media::{
    audio::default_audio_path, encode::resolve_output_path, AudioOptions, EncodeOptions, MediaInfo, MediaProcessor,
    MediaProcessorFactory, OutputFormat,
};
use crate::subtitle::create_subtitles;
use crate::transcribe::{Transcriber, TranscriberFactory};
use crate::translate::{Translator, TranslatorFactory};

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "webm", "flv", "wmv"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "aac", "m4a", "ogg"];

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn is_video_file(path: &Path) -> bool {
    has_extension(path, VIDEO_EXTENSIONS)
}

pub fn is_audio_file(path: &Path) -> bool {
    has_extension(path, AUDIO_EXTENSIONS)
}

/// Explicit API keys; `None` falls back to the configured environment variables
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub transcription: Option<String>,
    pub translation: Option<String>,
}

/// One `process` invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRequest {
    pub media: PathBuf,
    pub target_language: String,
    pub output: Option<PathBuf>,
    pub source_language: Option<String>,
    pub translate: bool,
    pub dual: bool,
    pub keep_extracted: bool,
    pub encode: bool,
    pub burn: bool,
    pub encoded_output: Option<PathBuf>,
    pub output_format: String,
}

impl ProcessRequest {
    pub fn new<P: Into<PathBuf>>(media: P) -> Self {
        Self {
            media: media.into(),
            target_language: "en".to_string(),
            output: None,
            source_language: None,
            translate: true,
            dual: false,
            keep_extracted: false,
            encode: false,
            burn: true,
            encoded_output: None,
            output_format: "mkv".to_string(),
        }
    }

    /// Translation runs unless disabled or the target is English
    pub fn wants_translation(&self) -> bool {
        self.translate && !self.target_language.eq_ignore_ascii_case("en")
    }

    /// `<stem><suffix>.ass` beside the input
    pub fn default_subtitle_path(&self) -> PathBuf {
        let stem = self.media.file_stem().unwrap_or_default().to_string_lossy();
        let lang = self.target_language.to_lowercase();
        let suffix = if !self.translate {
            "-en".to_string()
        } else if self.dual && lang != "en" {
            format!("-{}&en", lang)
        } else {
            format!("-{}", lang)
        };
        self.media.with_file_name(format!("{}{}.ass", stem, suffix))
    }

    /// `<stem>-subtitled.<fmt>` (burn) or `<stem>-sub-muxed.<fmt>` (mux) beside
    /// the input, unless an explicit path was given
    pub fn encoded_output_path(&self, format: OutputFormat) -> PathBuf {
        match &self.encoded_output {
            Some(path) => path.with_extension(format.extension()),
            None => {
                let stem = self.media.file_stem().unwrap_or_default().to_string_lossy();
                let suffix = if self.burn { "-subtitled" } else { "-sub-muxed" };
                self.media.with_file_name(format!("{}{}.{}", stem, suffix, format.extension()))
            }
        }
    }
}

/// The pipeline only writes mkv or mp4
pub fn parse_process_format(format: &str) -> Result<OutputFormat> {
    match format.parse::<OutputFormat>() {
        Ok(format @ (OutputFormat::Mkv | OutputFormat::Mp4)) => Ok(format),
        _ => Err(SubforgeError::UnsupportedFormat(format!(
            "Invalid output format: {}. Use 'mkv' or 'mp4'",
            format
        ))),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    NotRequested,
    Translated,
    /// Continued with the untranslated transcript
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EncodeOutcome {
    NotRequested,
    Encoded(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReport {
    pub subtitle_path: PathBuf,
    pub translation: TranslationOutcome,
    pub encode: EncodeOutcome,
}

/// Audio pulled out of a video input; a temporary file is removed on drop
enum ExtractedAudio {
    Temporary(TempPath),
    Kept(PathBuf),
}

impl ExtractedAudio {
    fn path(&self) -> &Path {
        match self {
            Self::Temporary(path) => &**path,
            Self::Kept(path) => path.as_path(),
        }
    }

    fn cleanup(self) {
        if let Self::Temporary(path) = self {
            let shown = path.display().to_string();
            match path.close() {
                Ok(()) => debug!("Removed temporary audio {}", shown),
                Err(e) => debug!("Could not remove temporary audio {}: {}", shown, e),
            }
        }
    }
}

async fn with_spinner<T, F>(message: &str, future: F) -> T
where
    F: Future<Output = T>,
{
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = future.await;
    pb.finish_and_clear();
    result
}

pub struct Workflow {
    config: Config,
    media: Box<dyn MediaProcessor>,
    transcriber: Box<dyn Transcriber>,
    translator: Box<dyn Translator>,
}

impl Workflow {
    pub fn new(config: Config, keys: ApiKeys) -> Self {
        let media = MediaProcessorFactory::create_processor(config.media.clone());
        let transcriber = TranscriberFactory::create_transcriber(config.transcriber.clone(), keys.transcription);
        let translator = TranslatorFactory::create_translator(config.translate.clone(), keys.translation);

        Self::with_components(config, media, transcriber, translator)
    }

    pub fn with_components(
        config: Config,
        media: Box<dyn MediaProcessor>,
        transcriber: Box<dyn Transcriber>,
        translator: Box<dyn Translator>,
    ) -> Self {
        Self {
            config,
            media,
            transcriber,
            translator,
        }
    }

    /// Transcribe, translate and write subtitles for one media file, then
    /// optionally encode them into the video.
    ///
    /// Extraction, transcription and subtitle failures abort; a failed
    /// translation falls back to the original transcript and a failed encode
    /// is only reported.
    pub async fn process(&self, request: &ProcessRequest) -> Result<ProcessReport> {
        let media = request.media.as_path();
        if !media.exists() {
            return Err(SubforgeError::FileNotFound(media.display().to_string()));
        }
        let output_format = parse_process_format(&request.output_format)?;

        let is_video = is_video_file(media);
        let extracted = if is_video {
            info!("Detected video file: {}", media.display());
            Some(self.extract_for_transcription(media, request.keep_extracted).await?)
        } else {
            if !is_audio_file(media) {
                warn!("Unrecognized media extension, sending {} as-is", media.display());
            }
            None
        };
        let audio_path = extracted.as_ref().map(ExtractedAudio::path).unwrap_or(media);

        let subtitle_path = request.output.clone().unwrap_or_else(|| request.default_subtitle_path());

        info!("Processing {} with model {}", media.display(), self.config.transcriber.model);
        let transcript = with_spinner(
            "Transcribing audio...",
            self.transcriber.transcribe(audio_path, request.source_language.as_deref()),
        )
        .await?;
        info!("Transcription successful");

        let (transcript, original, translation) = if request.wants_translation() {
            let translated = with_spinner(
                &format!("Translating to {}...", request.target_language),
                self.translator.translate(&transcript, &request.target_language),
            )
            .await;

            match translated {
                Ok(translated) => {
                    info!("Translation successful");
                    let original = request.dual.then_some(transcript);
                    (translated, original, TranslationOutcome::Translated)
                }
                Err(e) => {
                    warn!("Translation failed, continuing with original transcription: {}", e);
                    (transcript, None, TranslationOutcome::Failed(e.to_string()))
                }
            }
        } else {
            (transcript, None, TranslationOutcome::NotRequested)
        };

        info!("Generating subtitle file at {}", subtitle_path.display());
        let subtitle_path = create_subtitles(&transcript, &subtitle_path, &self.config.subtitle_options(), original.as_ref())?;

        let encode = if request.encode && is_video {
            let encoded_path = request.encoded_output_path(output_format);
            let options = self.config.encode_options(request.burn, output_format);

            info!("Encoding video with subtitles to {}", encoded_path.display());
            match self.media.embed_subtitles(media, &subtitle_path, &encoded_path, &options).await {
                Ok(path) => EncodeOutcome::Encoded(path),
                Err(e) => {
                    warn!("Error encoding video with subtitles: {}", e);
                    EncodeOutcome::Failed(e.to_string())
                }
            }
        } else {
            EncodeOutcome::NotRequested
        };

        if let Some(extracted) = extracted {
            extracted.cleanup();
        }

        Ok(ProcessReport {
            subtitle_path,
            translation,
            encode,
        })
    }

    async fn extract_for_transcription(&self, video: &Path, keep: bool) -> Result<ExtractedAudio> {
        let format = &self.config.audio.format;
        let extracted = if keep {
            ExtractedAudio::Kept(default_audio_path(video, format))
        } else {
            let temp = tempfile::Builder::new()
                .prefix("subforge-")
                .suffix(&format!(".{}", format))
                .tempfile()
                .map_err(|e| SubforgeError::Media(format!("Failed to create temporary audio file: {}", e)))?;
            ExtractedAudio::Temporary(temp.into_temp_path())
        };

        self.media.check_availability().await?;
        with_spinner(
            "Extracting audio...",
            self.media.extract_audio(video, extracted.path(), &self.config.audio_options()),
        )
        .await?;
        info!("Audio extracted to {}", extracted.path().display());

        Ok(extracted)
    }

    pub async fn probe(&self, media: &Path) -> Result<MediaInfo> {
        if let Ok(version) = self.media.version_info().await {
            debug!("Using {}", version);
        }
        self.media.probe(media).await
    }

    /// Standalone audio extraction; `output` defaults to the video path with
    /// the audio format as extension
    pub async fn extract_audio(&self, video: &Path, output: Option<&Path>, options: &AudioOptions) -> Result<PathBuf> {
        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_audio_path(video, &options.format));
        self.media.check_availability().await?;
        self.media.extract_audio(video, &output, options).await
    }

    /// Standalone burn/mux of an existing subtitle file
    pub async fn encode(
        &self,
        video: &Path,
        subtitle: &Path,
        output: Option<&Path>,
        options: &EncodeOptions,
    ) -> Result<PathBuf> {
        let output = resolve_output_path(video, output, options.output_format);
        self.media.embed_subtitles(video, subtitle, &output, options).await
    }
}
