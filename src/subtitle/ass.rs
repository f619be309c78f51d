// Advanced SubStation Alpha (v4.00+) documents

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Result, SubforgeError};

/// ASS line break inside event text
pub const LINE_BREAK: &str = "\\N";

const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";
const EVENT_FORMAT: &str = "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// One entry of the `[V4+ Styles]` section. Colours use the `&HAABBGGRR` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleStyle {
    pub font_name: String,
    pub font_size: f64,
    pub primary_color: String,
    pub secondary_color: String,
    pub outline_color: String,
    pub back_color: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
    pub scale_x: f64,
    pub scale_y: f64,
    pub spacing: f64,
    pub angle: f64,
    pub border_style: u8,
    pub outline: f64,
    pub shadow: f64,
    /// Numpad layout: 1-3 bottom, 4-6 middle, 7-9 top
    pub alignment: u8,
    pub margin_l: i32,
    pub margin_r: i32,
    pub margin_v: i32,
    pub encoding: i32,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_name: "Arial".to_string(),
            font_size: 20.0,
            primary_color: "&H00FFFFFF".to_string(),
            secondary_color: "&H000000FF".to_string(),
            outline_color: "&H00000000".to_string(),
            back_color: "&H00000000".to_string(),
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
            scale_x: 100.0,
            scale_y: 100.0,
            spacing: 0.0,
            angle: 0.0,
            border_style: 1,
            outline: 2.0,
            shadow: 2.0,
            alignment: 2,
            margin_l: 10,
            margin_r: 10,
            margin_v: 10,
            encoding: 1,
        }
    }
}

impl SubtitleStyle {
    /// Latin-script line shown below the primary one in dual mode
    pub fn english() -> Self {
        Self {
            font_name: "Apple Braille".to_string(),
            font_size: 30.0,
            outline: 1.0,
            shadow: 1.0,
            margin_v: 5,
            ..Self::default()
        }
    }

    /// Primary CJK line
    pub fn chinese() -> Self {
        Self {
            font_name: "PingFang SC".to_string(),
            font_size: 48.0,
            bold: true,
            outline: 1.0,
            shadow: 1.0,
            ..Self::default()
        }
    }

    /// Top-left annotation variant of [`SubtitleStyle::chinese`]
    pub fn chinese_tip() -> Self {
        Self {
            outline: 1.5,
            alignment: 7,
            ..Self::chinese()
        }
    }
}

/// A timed cue; times in milliseconds
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEvent {
    pub start: i64,
    pub end: i64,
    pub text: String,
    pub style: String,
}

impl SubtitleEvent {
    pub fn new<T: Into<String>, S: Into<String>>(start: i64, end: i64, text: T, style: S) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            style: style.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtitleDocument {
    styles: Vec<(String, SubtitleStyle)>,
    pub events: Vec<SubtitleEvent>,
}

impl SubtitleDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a style, replacing one with the same name in place
    pub fn set_style<S: Into<String>>(&mut self, name: S, style: SubtitleStyle) {
        let name = name.into();
        match self.styles.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = style,
            None => self.styles.push((name, style)),
        }
    }

    pub fn style(&self, name: &str) -> Option<&SubtitleStyle> {
        self.styles.iter().find(|(n, _)| n == name).map(|(_, style)| style)
    }

    pub fn style_names(&self) -> Vec<&str> {
        self.styles.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn push(&mut self, event: SubtitleEvent) {
        self.events.push(event);
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_string()).map_err(|e| {
            SubforgeError::Subtitle(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

/// `H:MM:SS.cc`, rounded to the nearest centisecond
pub fn format_timestamp(ms: i64) -> String {
    let cs = (ms.max(0) + 5) / 10;
    let (h, rest) = (cs / 360_000, cs % 360_000);
    let (m, rest) = (rest / 6_000, rest % 6_000);
    let (s, cs) = (rest / 100, rest % 100);
    format!("{}:{:02}:{:02}.{:02}", h, m, s, cs)
}

fn ass_bool(value: bool) -> i32 {
    if value { -1 } else { 0 }
}

fn ass_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Script Info]")?;
        writeln!(f, "ScriptType: v4.00+")?;
        writeln!(f, "WrapStyle: 0")?;
        writeln!(f, "ScaledBorderAndShadow: yes")?;
        writeln!(f, "Collisions: Normal")?;
        writeln!(f)?;

        writeln!(f, "[V4+ Styles]")?;
        writeln!(f, "{}", STYLE_FORMAT)?;
        for (name, s) in &self.styles {
            writeln!(
                f,
                "Style: {},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
                name,
                s.font_name,
                ass_number(s.font_size),
                s.primary_color,
                s.secondary_color,
                s.outline_color,
                s.back_color,
                ass_bool(s.bold),
                ass_bool(s.italic),
                ass_bool(s.underline),
                ass_bool(s.strikeout),
                ass_number(s.scale_x),
                ass_number(s.scale_y),
                ass_number(s.spacing),
                ass_number(s.angle),
                s.border_style,
                ass_number(s.outline),
                ass_number(s.shadow),
                s.alignment,
                s.margin_l,
                s.margin_r,
                s.margin_v,
                s.encoding,
            )?;
        }
        writeln!(f)?;

        writeln!(f, "[Events]")?;
        writeln!(f, "{}", EVENT_FORMAT)?;
        for event in &self.events {
            writeln!(
                f,
                "Dialogue: 0,{},{},{},,0,0,0,,{}",
                format_timestamp(event.start),
                format_timestamp(event.end),
                event.style,
                event.text.replace("\r\n", LINE_BREAK).replace('\n', LINE_BREAK),
            )?;
        }
        Ok(())
    }
}
