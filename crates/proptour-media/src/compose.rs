//! Composition driver.
//!
//! Measures every input clip, derives the transition timeline, builds the
//! filter graph, and drives one FFmpeg invocation per call. Fully
//! synchronous with respect to the engine: no shared state between calls,
//! parallelism is the caller's concern (independent worker tasks).

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use proptour_models::{
    ClipDescriptor, CompositionPlan, EncodingConfig, Resolution, TransitionSpec,
};

use crate::command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::graph::{build_concat_graph, build_transition_graph, FINAL_OUTPUT_LABEL};
use crate::probe::probe_video_duration;
use crate::timeline::{compute_offsets, total_duration};

/// Wall-clock budget for one FFmpeg render.
pub const COMPOSITION_TIMEOUT_SECS: u64 = 300;

/// Explicit composer configuration.
///
/// All environment and credential resolution happens at the orchestration
/// boundary; the engine only ever sees this struct.
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// FFmpeg binary, bare name (PATH lookup) or explicit path.
    pub ffmpeg_path: PathBuf,
    /// Render timeout in seconds.
    pub timeout_secs: u64,
    /// Encode parameters for the composed output.
    pub encoding: EncodingConfig,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            timeout_secs: COMPOSITION_TIMEOUT_SECS,
            encoding: EncodingConfig::default(),
        }
    }
}

/// Drives clip composition through the external FFmpeg binary.
#[derive(Debug)]
pub struct Composer {
    ffmpeg_path: PathBuf,
    timeout_secs: u64,
    encoding: EncodingConfig,
}

impl Composer {
    /// Create a composer, verifying the FFmpeg binary up front.
    ///
    /// # Errors
    ///
    /// [`MediaError::FfmpegNotFound`] if the binary cannot be resolved. This
    /// is fatal at construction; nothing downstream can work without it.
    pub fn new(config: ComposerConfig) -> MediaResult<Self> {
        let ffmpeg_path = check_ffmpeg(&config.ffmpeg_path)?;
        info!("FFmpeg found: {}", ffmpeg_path.display());

        Ok(Self {
            ffmpeg_path,
            timeout_secs: config.timeout_secs,
            encoding: config.encoding,
        })
    }

    /// Compose clips into one video with timed cross-fade transitions.
    ///
    /// Every clip is probed for its exact duration first; the transition
    /// offsets are derived from the measured values, never from the
    /// generation request.
    ///
    /// # Errors
    ///
    /// - [`MediaError::InvalidComposition`] for fewer than 2 clips, an empty
    ///   transition name, or a transition not strictly shorter than every clip.
    /// - [`MediaError::FileNotFound`] if any input is missing (checked before
    ///   any subprocess is spawned).
    /// - [`MediaError::DurationUnresolved`] if a clip cannot be measured.
    /// - [`MediaError::Timeout`], [`MediaError::CompositionFailed`],
    ///   [`MediaError::InterruptedPipe`] from the render itself.
    pub async fn compose_with_transitions<P: AsRef<Path>>(
        &self,
        clip_paths: &[P],
        output_path: impl AsRef<Path>,
        transition: &TransitionSpec,
        resolution: Resolution,
    ) -> MediaResult<PathBuf> {
        let output_path = output_path.as_ref();

        self.validate_inputs(clip_paths)?;
        if transition.kind.as_str().is_empty() {
            return Err(MediaError::InvalidComposition(
                "transition type must be non-empty".to_string(),
            ));
        }

        info!(
            "Composing {} clips with {} transitions ({}s each)",
            clip_paths.len(),
            transition.kind,
            transition.duration_seconds
        );

        let mut clips = Vec::with_capacity(clip_paths.len());
        for path in clip_paths {
            let path = path.as_ref();
            let duration = probe_video_duration(path, &self.ffmpeg_path).await?;
            info!("Clip {} duration: {}s", path.display(), duration);
            clips.push(ClipDescriptor::new(path, duration));
        }

        let plan = CompositionPlan::new(clips, transition.clone(), resolution);
        let durations = plan.durations();
        let offsets = compute_offsets(&durations, transition.duration_seconds)?;
        for (i, offset) in offsets.iter().enumerate() {
            info!(
                "Transition {}: offset={}s, duration={}s",
                i + 1,
                offset,
                transition.duration_seconds
            );
        }
        info!(
            "Expected total video duration: {}s",
            total_duration(&durations, transition.duration_seconds)
        );

        let graph = build_transition_graph(&plan, &offsets);
        self.render(clip_paths, output_path, graph.render()).await?;

        // Informational only; the measured output is not validated against
        // the computed total.
        match probe_video_duration(output_path, &self.ffmpeg_path).await {
            Ok(final_duration) => info!("Final video duration: {}s", final_duration),
            Err(e) => warn!("Could not probe final output duration: {}", e),
        }

        info!("Video composition completed: {}", output_path.display());
        Ok(output_path.to_path_buf())
    }

    /// Concatenate clips end-to-end with no transitions.
    ///
    /// Clips are scaled and padded to the target resolution but not trimmed
    /// or frame-rate normalized; without cross-fades there is no timing
    /// arithmetic to protect.
    pub async fn simple_concatenate<P: AsRef<Path>>(
        &self,
        clip_paths: &[P],
        output_path: impl AsRef<Path>,
        resolution: Resolution,
    ) -> MediaResult<PathBuf> {
        let output_path = output_path.as_ref();

        self.validate_inputs(clip_paths)?;

        info!("Concatenating {} clips without transitions", clip_paths.len());

        let graph = build_concat_graph(clip_paths.len(), resolution);
        self.render(clip_paths, output_path, graph.render()).await?;

        info!("Video concatenation completed: {}", output_path.display());
        Ok(output_path.to_path_buf())
    }

    /// Shared pre-spawn validation: clip count, then input existence.
    fn validate_inputs<P: AsRef<Path>>(&self, clip_paths: &[P]) -> MediaResult<()> {
        if clip_paths.len() < 2 {
            return Err(MediaError::InvalidComposition(format!(
                "need at least 2 clips to compose, got {}",
                clip_paths.len()
            )));
        }

        for path in clip_paths {
            let path = path.as_ref();
            if !path.exists() {
                return Err(MediaError::FileNotFound(path.to_path_buf()));
            }
        }

        Ok(())
    }

    /// Run one FFmpeg render and verify the output it claims to have written.
    ///
    /// Partial outputs from failed renders are left on disk for caller
    /// inspection; the error return guarantees no empty or missing path is
    /// ever handed back as a success.
    async fn render<P: AsRef<Path>>(
        &self,
        clip_paths: &[P],
        output_path: &Path,
        filter_complex: String,
    ) -> MediaResult<()> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let cmd = FfmpegCommand::new(output_path)
            .inputs(clip_paths.iter().map(|p| p.as_ref()))
            .filter_complex(filter_complex)
            .map_label(FINAL_OUTPUT_LABEL)
            .output_args(self.encoding.to_ffmpeg_args());

        let runner = FfmpegRunner::new(&self.ffmpeg_path).with_timeout(self.timeout_secs);
        runner.run(&cmd).await?;

        let metadata = tokio::fs::metadata(output_path).await.map_err(|_| {
            MediaError::composition_failed(
                format!(
                    "FFmpeg completed but output file not found: {}",
                    output_path.display()
                ),
                None,
                None,
            )
        })?;

        if metadata.len() == 0 {
            return Err(MediaError::composition_failed(
                format!(
                    "FFmpeg created empty output file: {}",
                    output_path.display()
                ),
                None,
                None,
            ));
        }

        info!("Output file size: {} bytes", metadata.len());
        Ok(())
    }
}
