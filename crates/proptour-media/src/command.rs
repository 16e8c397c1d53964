//! FFmpeg command builder and runner.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Builder for multi-input FFmpeg filter-graph invocations.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file paths, each mapped to an `-i` argument in order
    inputs: Vec<PathBuf>,
    /// Output file path
    output: PathBuf,
    /// Filter graph passed as `-filter_complex`
    filter_complex: Option<String>,
    /// Output stream label passed as `-map [label]`
    map_label: Option<String>,
    /// Output arguments (encode parameters, after the filter)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            inputs: Vec::new(),
            output: output.as_ref().to_path_buf(),
            filter_complex: None,
            map_label: None,
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add an input file.
    pub fn input(mut self, path: impl AsRef<Path>) -> Self {
        self.inputs.push(path.as_ref().to_path_buf());
        self
    }

    /// Add multiple input files.
    pub fn inputs<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.inputs
            .extend(paths.into_iter().map(|p| p.as_ref().to_path_buf()));
        self
    }

    /// Set filter complex.
    pub fn filter_complex(mut self, filter: impl Into<String>) -> Self {
        self.filter_complex = Some(filter.into());
        self
    }

    /// Map a named filter-graph node to the encoded output stream.
    pub fn map_label(mut self, label: impl Into<String>) -> Self {
        self.map_label = Some(label.into());
        self
    }

    /// Add an output argument (after the filter).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        // Overwrite flag
        if self.overwrite {
            args.push("-y".to_string());
        }

        // Log level
        args.push("-v".to_string());
        args.push(self.log_level.clone());

        // Input files
        for input in &self.inputs {
            args.push("-i".to_string());
            args.push(input.to_string_lossy().to_string());
        }

        // Filter graph
        if let Some(ref filter) = self.filter_complex {
            args.push("-filter_complex".to_string());
            args.push(filter.clone());
        }

        // Output stream mapping
        if let Some(ref label) = self.map_label {
            args.push("-map".to_string());
            args.push(format!("[{label}]"));
        }

        // Encode parameters
        args.extend(self.output_args.clone());

        // Output file
        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Runner for FFmpeg commands with a bounded wall-clock budget.
pub struct FfmpegRunner {
    /// FFmpeg binary to invoke
    ffmpeg_path: PathBuf,
    /// Timeout in seconds
    timeout_secs: Option<u64>,
}

impl FfmpegRunner {
    /// Create a new runner for the given binary.
    pub fn new(ffmpeg_path: impl AsRef<Path>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.as_ref().to_path_buf(),
            timeout_secs: None,
        }
    }

    /// Set timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command to completion.
    ///
    /// Captures stderr for diagnostics. On timeout the process is killed and
    /// [`MediaError::Timeout`] is returned; a broken stderr pipe surfaces as
    /// [`MediaError::InterruptedPipe`]; any nonzero exit becomes
    /// [`MediaError::CompositionFailed`] carrying the captured stderr.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        let args = cmd.build_args();
        debug!(
            "Running FFmpeg: {} {}",
            self.ffmpeg_path.display(),
            args.join(" ")
        );

        let mut child = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stderr_pipe = child.stderr.take().expect("stderr not captured");
        let stderr_handle = tokio::spawn(async move {
            let mut buf = String::new();
            stderr_pipe
                .read_to_string(&mut buf)
                .await
                .map(|_| buf)
        });

        let wait_future = child.wait();
        let status = if let Some(timeout_secs) = self.timeout_secs {
            match tokio::time::timeout(Duration::from_secs(timeout_secs), wait_future).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        "FFmpeg timed out after {} seconds, killing process",
                        timeout_secs
                    );
                    let _ = child.kill().await;
                    return Err(MediaError::Timeout(timeout_secs));
                }
            }
        } else {
            wait_future.await
        };
        let status = status.map_err(map_pipe_error)?;

        let stderr = match stderr_handle.await {
            Ok(Ok(buf)) => buf,
            Ok(Err(e)) => return Err(map_pipe_error(e)),
            Err(_) => String::new(),
        };

        if status.success() {
            Ok(())
        } else {
            Err(MediaError::composition_failed(
                "FFmpeg exited with non-zero status",
                Some(stderr),
                status.code(),
            ))
        }
    }
}

/// Classify process I/O failures: a broken pipe is transient and retryable.
fn map_pipe_error(e: std::io::Error) -> MediaError {
    if e.kind() == std::io::ErrorKind::BrokenPipe {
        MediaError::InterruptedPipe
    } else {
        MediaError::Io(e)
    }
}

/// Check that the FFmpeg binary is reachable.
///
/// Accepts either a bare name resolved via PATH or an explicit path.
pub fn check_ffmpeg(binary: impl AsRef<OsStr>) -> MediaResult<PathBuf> {
    which::which(binary.as_ref()).map_err(|_| MediaError::FfmpegNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder_argument_order() {
        let cmd = FfmpegCommand::new("/tmp/out.mp4")
            .inputs(["/tmp/a.mp4", "/tmp/b.mp4"])
            .filter_complex("[0:v][1:v]xfade=transition=fade:duration=0.5:offset=7.5[outv]")
            .map_label("outv")
            .output_args(["-c:v", "libx264"]);

        let args = cmd.build_args();
        assert_eq!(args[0], "-y");

        let first_input = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[first_input + 1], "/tmp/a.mp4");
        assert_eq!(args[first_input + 2], "-i");
        assert_eq!(args[first_input + 3], "/tmp/b.mp4");

        let filter = args.iter().position(|a| a == "-filter_complex").unwrap();
        assert!(filter > first_input);

        let map = args.iter().position(|a| a == "-map").unwrap();
        assert_eq!(args[map + 1], "[outv]");

        assert_eq!(args.last().unwrap(), "/tmp/out.mp4");
    }

    #[test]
    fn test_map_pipe_error_classification() {
        let broken = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        assert!(matches!(map_pipe_error(broken), MediaError::InterruptedPipe));

        let other = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(map_pipe_error(other), MediaError::Io(_)));
    }

    #[test]
    fn test_check_ffmpeg_missing_binary() {
        let err = check_ffmpeg("__missing_ffmpeg_binary__").unwrap_err();
        assert!(matches!(err, MediaError::FfmpegNotFound));
    }

    #[tokio::test]
    async fn test_runner_reports_nonzero_exit() {
        // `false` ignores its arguments and exits 1, standing in for a failed
        // encode without needing FFmpeg on the test machine.
        let cmd = FfmpegCommand::new("/tmp/never_written.mp4");
        let runner = FfmpegRunner::new("false");

        let err = runner.run(&cmd).await.unwrap_err();
        match err {
            MediaError::CompositionFailed { exit_code, .. } => assert_eq!(exit_code, Some(1)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_runner_missing_binary_is_io_error() {
        let cmd = FfmpegCommand::new("/tmp/never_written.mp4");
        let runner = FfmpegRunner::new("__missing_ffmpeg_binary__");
        let err = runner.run(&cmd).await.unwrap_err();
        assert!(matches!(err, MediaError::Io(_)));
    }
}
