//! subforge - audio/video to styled subtitles
//!
//! Transcribes a media file through a hosted Whisper API, optionally
//! translates the transcript, writes an `.ass` subtitle file and can burn or
//! mux it back into the video with ffmpeg.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use subforge::cli::{Args, Commands};
use subforge::config::{Config, DEFAULT_CONFIG_FILE};
use subforge::error::SubforgeError;
use subforge::workflow::{ApiKeys, EncodeOutcome, TranslationOutcome, Workflow};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let guard = match setup_logging(args.verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {}", e);
            None
        }
    };

    if let Err(e) = run(args).await {
        let stage = e
            .downcast_ref::<SubforgeError>()
            .map(SubforgeError::stage)
            .unwrap_or("error");
        eprintln!("Error [{}]: {:#}", stage, e);
        // exit skips destructors; flush the file log first
        drop(guard);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load(args.config.as_deref())?;

    match args.command {
        Commands::Process(process) => {
            if let Some(model) = &process.model {
                config.transcriber.model = model.clone();
            }

            let request = process.request();
            let workflow = Workflow::new(config, process.api_keys());
            let report = workflow.process(&request).await?;

            if let TranslationOutcome::Failed(reason) = &report.translation {
                println!("Translation failed, subtitles use the original transcript: {}", reason);
            }
            match &report.encode {
                EncodeOutcome::Encoded(path) => println!("Encoded video: {}", path.display()),
                EncodeOutcome::Failed(reason) => println!("Encoding failed: {}", reason),
                EncodeOutcome::NotRequested => {}
            }
            println!("Subtitle file saved to {}", report.subtitle_path.display());
        }
        Commands::Probe { media } => {
            let workflow = Workflow::new(config, ApiKeys::default());
            let info = workflow.probe(&media).await?;

            println!("File:        {}", media.display());
            println!("Duration:    {:.2}s", info.duration);
            println!("Video codec: {}", info.video_codec.as_deref().unwrap_or("none"));
            println!("Audio codec: {}", info.audio_codec.as_deref().unwrap_or("none"));
            println!("Resolution:  {}x{}", info.width, info.height);
            println!("Frame rate:  {:.3}", info.fps);
            println!("Has audio:   {}", info.has_audio);
        }
        Commands::Extract(extract) => {
            info!("Extracting audio from: {}", extract.video.display());
            let options = extract.audio_options(config.audio_options());
            let workflow = Workflow::new(config, ApiKeys::default());
            let output = workflow
                .extract_audio(&extract.video, extract.output.as_deref(), &options)
                .await?;
            println!("Audio extracted to {}", output.display());
        }
        Commands::Encode(encode) => {
            info!("Embedding subtitles into video: {}", encode.video.display());
            let options = encode.encode_options(config.encode_options(true, encode.format));
            let workflow = Workflow::new(config, ApiKeys::default());
            let output = workflow
                .encode(&encode.video, &encode.subtitle, encode.output.as_deref(), &options)
                .await?;
            println!("Video with subtitles created: {}", output.display());
        }
        Commands::Config { init, path } => {
            if init {
                let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
                if path.exists() {
                    return Err(SubforgeError::Config(format!("{} already exists", path.display())).into());
                }
                Config::default().save_to_file(&path)?;
                println!("Wrote default configuration to {}", path.display());
            } else {
                let rendered = toml::to_string_pretty(&config)?;
                println!("{}", rendered);
            }
        }
    }

    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<WorkerGuard> {
    let log_dir = std::env::current_dir()?.join(".subforge").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotation
    let file_appender = rolling::daily(&log_dir, "subforge.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}", log_level, log_dir.join("subforge.log").display());

    Ok(guard)
}
