use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, SubforgeError};

/// Maps a failure message into the error of the calling stage,
/// e.g. `SubforgeError::Media` or `SubforgeError::Encode`.
pub type StageError = fn(String) -> SubforgeError;

/// External process invocation: binary plus ordered argument list
#[derive(Debug, Clone, PartialEq)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new media processing command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add `-key value` pairs
    pub fn options<'a, I>(self, options: I) -> Self
    where
        I: IntoIterator<Item = &'a (String, String)>,
    {
        options.into_iter().fold(self, |cmd, (key, value)| {
            cmd.arg(format!("-{}", key.trim_start_matches('-'))).arg(value.as_str())
        })
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Map an input stream into the output
    pub fn map<S: Into<String>>(self, spec: S) -> Self {
        self.arg("-map").arg(spec)
    }

    /// Set video codec
    pub fn video_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:v").arg(codec)
    }

    /// Set audio codec
    pub fn audio_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:a").arg(codec)
    }

    /// Set subtitle codec
    pub fn subtitle_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:s").arg(codec)
    }

    /// Copy video stream
    pub fn copy_video(self) -> Self {
        self.video_codec("copy")
    }

    /// Copy audio stream
    pub fn copy_audio(self) -> Self {
        self.audio_codec("copy")
    }

    /// Set audio sample rate
    pub fn audio_sample_rate(self, rate: u32) -> Self {
        self.arg("-ar").arg(rate.to_string())
    }

    /// Set audio channels
    pub fn audio_channels(self, channels: u32) -> Self {
        self.arg("-ac").arg(channels.to_string())
    }

    /// Add video filter
    pub fn video_filter<S: Into<String>>(self, filter: S) -> Self {
        self.arg("-vf").arg(filter)
    }

    /// Position of the first occurrence of `arg`
    pub fn position(&self, arg: &str) -> Option<usize> {
        self.args.iter().position(|a| a == arg)
    }

    /// Value following the first occurrence of `flag`
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.position(flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    /// Value following the last occurrence of `flag`
    pub fn last_value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .rposition(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    /// Execute the command, capturing its output; returns stdout
    pub async fn execute(&self, stage: StageError) -> Result<Vec<u8>> {
        debug!("Executing media processing command: {} {:?}", self.binary_path, self.args);
        debug!("Description: {}", self.description);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| stage(format!("Failed to execute {}: {}", self.binary_path, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(stage(format!("{} failed: {}", self.description, stderr)));
        }

        Ok(output.stdout)
    }

    /// Execute the command while echoing its stderr (ffmpeg statistics) to the
    /// terminal. The echoed text is kept so a failure can still report it.
    pub async fn execute_with_progress(&self, stage: StageError) -> Result<()> {
        debug!("Executing media processing command with progress: {} {:?}", self.binary_path, self.args);

        let mut child = Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| stage(format!("Failed to execute {}: {}", self.binary_path, e)))?;

        let mut captured = Vec::new();
        if let Some(mut stderr) = child.stderr.take() {
            let mut terminal = tokio::io::stderr();
            let mut buf = [0u8; 4096];
            loop {
                let n = stderr
                    .read(&mut buf)
                    .await
                    .map_err(|e| stage(format!("Failed to read {} output: {}", self.binary_path, e)))?;
                if n == 0 {
                    break;
                }
                captured.extend_from_slice(&buf[..n]);
                // Echo failures only lose progress display
                let _ = terminal.write_all(&buf[..n]).await;
            }
            let _ = terminal.flush().await;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| stage(format!("Failed to wait for {}: {}", self.binary_path, e)))?;

        if !status.success() {
            return Err(stage(format!(
                "{} failed: {}",
                self.description,
                String::from_utf8_lossy(&captured)
            )));
        }

        Ok(())
    }
}

/// Builder for commands against one transcoder binary
#[derive(Debug, Clone)]
pub struct MediaCommandBuilder {
    binary_path: String,
}

impl MediaCommandBuilder {
    /// Create a new command builder
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Build version check command
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Version check").arg("-version")
    }

    /// Build custom command
    pub fn custom<S: Into<String>>(&self, description: S) -> MediaCommand {
        MediaCommand::new(&self.binary_path, description.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_argument_order() {
        let cmd = MediaCommandBuilder::new("ffmpeg")
            .custom("Test")
            .overwrite()
            .input("in.mkv")
            .map("0:v")
            .copy_audio()
            .output("out.mkv");

        assert_eq!(cmd.binary_path, "ffmpeg");
        assert_eq!(cmd.args, vec!["-y", "-i", "in.mkv", "-map", "0:v", "-c:a", "copy", "out.mkv"]);
    }

    #[test]
    fn test_options_are_prefixed_once() {
        let options = vec![
            ("preset".to_string(), "slow".to_string()),
            ("-crf".to_string(), "20".to_string()),
        ];
        let cmd = MediaCommand::new("ffmpeg", "Test").options(&options);
        assert_eq!(cmd.args, vec!["-preset", "slow", "-crf", "20"]);
    }

    #[test]
    fn test_value_lookup() {
        let cmd = MediaCommand::new("ffmpeg", "Test").args(["-c:a", "copy", "-c:a", "libopus"]);
        assert_eq!(cmd.value_of("-c:a"), Some("copy"));
        assert_eq!(cmd.last_value_of("-c:a"), Some("libopus"));
        assert_eq!(cmd.value_of("-c:v"), None);
    }

    #[tokio::test]
    async fn test_missing_binary_maps_to_stage_error() {
        let cmd = MediaCommand::new("/nonexistent/subforge-ffmpeg", "Probe");
        let err = cmd.execute(SubforgeError::Encode).await.unwrap_err();
        assert!(matches!(err, SubforgeError::Encode(_)));
    }
}
