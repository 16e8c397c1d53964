//! Video duration probing.
//!
//! Durations drive the transition-offset arithmetic, so they are always
//! measured, never assumed. FFmpeg's diagnostic output is the primary
//! strategy because it covers every container we take in; when the binary is
//! unavailable (restricted worker sandboxes, CI) we fall back to the direct
//! `mvhd` parser in [`crate::mp4`] for MP4-family files.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};
use crate::mp4;
use crate::strategy::FallbackChain;

/// Return the duration of `path` in seconds.
///
/// `ffmpeg_path` is the binary to invoke for the primary strategy; pass plain
/// `"ffmpeg"` to resolve via PATH. A missing or broken binary is non-fatal
/// and silently falls through to the container parser.
///
/// # Errors
///
/// - [`MediaError::FileNotFound`] if `path` does not exist.
/// - [`MediaError::DurationUnresolved`] if no strategy succeeds; the error
///   carries each strategy's failure reason.
pub async fn probe_video_duration(
    path: impl AsRef<Path>,
    ffmpeg_path: impl AsRef<Path>,
) -> MediaResult<f64> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    let mut chain = FallbackChain::new();

    chain.attempt("ffmpeg", probe_with_ffmpeg(path, ffmpeg_path.as_ref()).await);
    if !chain.resolved() {
        chain.attempt("mp4 parser", probe_mp4_container(path).await);
    }

    match chain.finish() {
        Ok(duration) => {
            debug!("Duration of {} resolved: {:.3}s", path.display(), duration);
            Ok(duration)
        }
        Err(attempts) => Err(MediaError::DurationUnresolved {
            path: path.to_path_buf(),
            attempts,
        }),
    }
}

/// Primary strategy: parse the `Duration:` token from FFmpeg's stderr.
///
/// `ffmpeg -i` without an output exits nonzero by design, so the exit status
/// is ignored; the diagnostic text appears either way.
async fn probe_with_ffmpeg(path: &Path, ffmpeg_path: &Path) -> Result<f64, String> {
    let output = Command::new(ffmpeg_path)
        .arg("-hide_banner")
        .arg("-i")
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| format!("binary not available: {e}"))?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    stderr
        .lines()
        .find_map(parse_duration_line)
        .ok_or_else(|| "no parseable Duration line in output".to_string())
}

/// Fallback strategy: read the container's movie header directly.
async fn probe_mp4_container(path: &Path) -> Result<f64, String> {
    if !mp4::is_supported_container(path) {
        return Err("not an MP4-family container".to_string());
    }

    let data = tokio::fs::read(path)
        .await
        .map_err(|e| format!("read failed: {e}"))?;

    mp4::mvhd_duration_seconds(&data).ok_or_else(|| "no usable mvhd box found".to_string())
}

/// Parse `Duration: HH:MM:SS.cc` out of one FFmpeg diagnostic line.
fn parse_duration_line(line: &str) -> Option<f64> {
    let rest = line.split("Duration:").nth(1)?;
    let token = rest.split(',').next()?.trim();

    let mut parts = token.split(':');
    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mp4::test_support::{minimal_mp4, mvhd_v0, mvhd_v1};
    use tempfile::TempDir;

    /// A binary name that cannot exist, forcing the fallback path.
    const MISSING_FFMPEG: &str = "__missing_ffmpeg_binary__";

    #[test]
    fn test_parse_duration_line() {
        let line = "  Duration: 00:00:23.00, start: 0.000000, bitrate: 1205 kb/s";
        let secs = parse_duration_line(line).unwrap();
        assert!((secs - 23.0).abs() < 0.001);

        let line = "  Duration: 01:02:03.50, bitrate: 900 kb/s";
        let secs = parse_duration_line(line).unwrap();
        assert!((secs - 3723.5).abs() < 0.001);
    }

    #[test]
    fn test_parse_duration_line_rejects_na() {
        assert!(parse_duration_line("  Duration: N/A, bitrate: N/A").is_none());
        assert!(parse_duration_line("Stream #0:0: Video: h264").is_none());
        assert!(parse_duration_line("").is_none());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = probe_video_duration("/nonexistent/clip.mp4", MISSING_FFMPEG)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_fallback_parses_version0_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, minimal_mp4(&mvhd_v0(1000, 23_000))).unwrap();

        let duration = probe_video_duration(&path, MISSING_FFMPEG).await.unwrap();
        assert!((duration - 23.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_fallback_parses_version1_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.mov");
        std::fs::write(&path, minimal_mp4(&mvhd_v1(90_000, 1_395_000))).unwrap();

        let duration = probe_video_duration(&path, MISSING_FFMPEG).await.unwrap();
        assert!((duration - 15.5).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_unresolved_aggregates_strategy_reasons() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.webm");
        std::fs::write(&path, b"not a real container").unwrap();

        let err = probe_video_duration(&path, MISSING_FFMPEG).await.unwrap_err();
        match err {
            MediaError::DurationUnresolved { attempts, .. } => {
                assert!(attempts.contains("ffmpeg:"), "{attempts}");
                assert!(attempts.contains("mp4 parser:"), "{attempts}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_garbage_mp4_is_unresolved_not_a_panic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, vec![0xabu8; 512]).unwrap();

        let err = probe_video_duration(&path, MISSING_FFMPEG).await.unwrap_err();
        assert!(matches!(err, MediaError::DurationUnresolved { .. }));
    }
}
