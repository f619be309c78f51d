// Subtitle document building
//
// - Ass: document model and v4.00+ serialization
// - Chunk: sentence splitting and line packing for untimed transcripts

pub mod ass;
pub mod chunk;

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub use ass::{SubtitleDocument, SubtitleEvent, SubtitleStyle};
pub use chunk::{create_subtitle_chunks, split_into_sentences};
use crate::error::{Result, SubforgeError};
use crate::transcript::Transcript;

pub const STYLE_EN: &str = "EN";
pub const STYLE_CN: &str = "CN";
pub const STYLE_CN_TIP: &str = "CN - tip";
pub const STYLE_DEFAULT: &str = "Default";

/// Minimum on-screen time of an estimated cue, in ms
const MIN_DISPLAY_MS: i64 = 3000;
/// Reading speed used to stretch long cues
const CHARS_PER_SECOND: i64 = 15;
/// Gap between consecutive estimated cues, in ms
const CUE_GAP_MS: i64 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleOptions {
    pub max_chars_per_line: usize,
    /// Replaces the `Default` style; the language styles stay registered
    pub style: Option<SubtitleStyle>,
}

impl Default for SubtitleOptions {
    fn default() -> Self {
        Self {
            max_chars_per_line: 42,
            style: None,
        }
    }
}

/// Make a file name safe for the ffmpeg subtitles filter
pub fn sanitize_filename(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                sanitized.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if !matches!(c, '&' | '?' | '*' | ':' | ';' | '|' | '<' | '>' | '#') {
            sanitized.push(c);
        }
    }

    sanitized
}

/// `output` with its file name sanitized; the parent directory is kept as is
pub fn sanitized_output_path(output: &Path) -> Result<PathBuf> {
    let name = output
        .file_name()
        .ok_or_else(|| SubforgeError::Subtitle(format!("Invalid subtitle path: {}", output.display())))?;
    Ok(output.with_file_name(sanitize_filename(&name.to_string_lossy())))
}

/// Estimated cue length for a chunk of text
fn display_duration_ms(text: &str) -> i64 {
    let chars = text.chars().count() as i64;
    MIN_DISPLAY_MS.max(chars * 1000 / CHARS_PER_SECOND)
}

fn seconds_to_ms(seconds: f64) -> i64 {
    (seconds * 1000.0) as i64
}

/// Build the subtitle document for `transcript`.
///
/// `secondary` is the untranslated transcript in dual-language mode; its
/// text goes under `EN` and the primary text under `CN`.
pub fn build_document(
    transcript: &Transcript,
    options: &SubtitleOptions,
    secondary: Option<&Transcript>,
) -> Result<SubtitleDocument> {
    if transcript.text.is_empty() {
        return Err(SubforgeError::Subtitle("No text found in transcript for subtitle creation".to_string()));
    }

    let mut doc = SubtitleDocument::new();
    doc.set_style(STYLE_EN, SubtitleStyle::english());
    doc.set_style(STYLE_CN, SubtitleStyle::chinese());
    doc.set_style(STYLE_CN_TIP, SubtitleStyle::chinese_tip());
    doc.set_style(
        STYLE_DEFAULT,
        options.style.clone().unwrap_or_else(SubtitleStyle::chinese),
    );

    if transcript.has_segments() {
        if !transcript.is_chronological() {
            warn!("Transcript segments are out of order; cues are written as received");
        }
        let secondary_segments = secondary
            .filter(|t| t.has_segments())
            .map(|t| t.segments.as_slice())
            .unwrap_or_default();

        for (i, segment) in transcript.segments.iter().enumerate() {
            let text = segment.text.trim();
            if text.is_empty() {
                continue;
            }
            let (start, end) = (seconds_to_ms(segment.start), seconds_to_ms(segment.end));

            match secondary_segments.get(i) {
                Some(original) => {
                    doc.push(SubtitleEvent::new(start, end, original.text.trim(), STYLE_EN));
                    doc.push(SubtitleEvent::new(start, end, text, STYLE_CN));
                }
                None => doc.push(SubtitleEvent::new(start, end, text, STYLE_DEFAULT)),
            }
        }
    } else {
        let chunks = create_subtitle_chunks(&split_into_sentences(&transcript.text), options.max_chars_per_line);
        let secondary_chunks = secondary
            .map(|t| create_subtitle_chunks(&split_into_sentences(&t.text), options.max_chars_per_line))
            .unwrap_or_default();

        let mut start = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            let end = start + display_duration_ms(chunk);
            match secondary_chunks.get(i) {
                Some(original) => {
                    doc.push(SubtitleEvent::new(start, end, original.as_str(), STYLE_EN));
                    doc.push(SubtitleEvent::new(start, end, chunk.as_str(), STYLE_CN));
                }
                None => doc.push(SubtitleEvent::new(start, end, chunk.as_str(), STYLE_DEFAULT)),
            }
            start = end + CUE_GAP_MS;
        }
    }

    debug!("Built subtitle document with {} cues", doc.events.len());
    Ok(doc)
}

/// Build and write the `.ass` file; returns the sanitized path actually written
pub fn create_subtitles(
    transcript: &Transcript,
    output: &Path,
    options: &SubtitleOptions,
    secondary: Option<&Transcript>,
) -> Result<PathBuf> {
    let output = sanitized_output_path(output)?;
    let doc = build_document(transcript, options, secondary)?;
    doc.save(&output)?;

    info!("Subtitle file written: {} ({} cues)", output.display(), doc.events.len());
    Ok(output)
}
