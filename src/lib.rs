//! subforge - audio/video to styled subtitles
//!
//! Extracts audio with ffmpeg, transcribes it through a hosted
//! Whisper-compatible API, translates the transcript with DeepL, writes an
//! `.ass` subtitle file and optionally burns or muxes it into the video.

pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod subtitle;
pub mod transcribe;
pub mod transcript;
pub mod translate;
pub mod workflow;
