//! Command-line clip composer.
//!
//! Composes already-downloaded clips into a single property tour video.
//! Generation and upload live in the orchestration services; this binary
//! only drives the local composition engine.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use proptour_media::{Composer, ComposerConfig, COMPOSITION_TIMEOUT_SECS};
use proptour_models::{EncodingConfig, Resolution, TransitionSpec};

#[derive(Parser, Debug)]
#[command(name = "proptour", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,

    /// FFmpeg binary, bare name or explicit path.
    #[arg(long, global = true, default_value = "ffmpeg")]
    ffmpeg: PathBuf,

    /// Render timeout in seconds.
    #[arg(long, global = true, default_value_t = COMPOSITION_TIMEOUT_SECS)]
    timeout: u64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose clips with timed cross-fade transitions.
    Compose(ComposeArgs),
    /// Concatenate clips end-to-end with no transitions.
    Concat(ConcatArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input clips, in playback order (at least 2).
    #[arg(required = true, num_args = 2..)]
    clips: Vec<PathBuf>,

    /// Output video path.
    #[arg(long)]
    out: PathBuf,

    /// Transition effect (fade, wipeleft, wiperight, wipeup, wipedown,
    /// slideleft, slideright, or any xfade effect name).
    #[arg(long, default_value = "fade")]
    transition: String,

    /// Transition length in seconds.
    #[arg(long, default_value_t = 0.5)]
    transition_duration: f64,

    /// Output resolution as <width>x<height>.
    #[arg(long, default_value = "1280x720")]
    resolution: Resolution,
}

#[derive(Parser, Debug)]
struct ConcatArgs {
    /// Input clips, in playback order (at least 2).
    #[arg(required = true, num_args = 2..)]
    clips: Vec<PathBuf>,

    /// Output video path.
    #[arg(long)]
    out: PathBuf,

    /// Output resolution as <width>x<height>.
    #[arg(long, default_value = "1280x720")]
    resolution: Resolution,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("proptour=info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        )
        .with(env_filter)
        .init();

    let cli = Cli::parse();

    let composer = Composer::new(ComposerConfig {
        ffmpeg_path: cli.ffmpeg.clone(),
        timeout_secs: cli.timeout,
        encoding: EncodingConfig::default(),
    })
    .context("FFmpeg is required for composition")?;

    match cli.cmd {
        Command::Compose(args) => {
            let transition = TransitionSpec::new(args.transition.as_str(), args.transition_duration);
            let output = composer
                .compose_with_transitions(&args.clips, &args.out, &transition, args.resolution)
                .await
                .context("composition failed")?;
            info!("Final video: {}", output.display());
        }
        Command::Concat(args) => {
            let output = composer
                .simple_concatenate(&args.clips, &args.out, args.resolution)
                .await
                .context("concatenation failed")?;
            info!("Final video: {}", output.display());
        }
    }

    Ok(())
}
