#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper and clip-composition engine.
//!
//! This crate provides:
//! - Duration probing with an MP4/MOV parser fallback for environments
//!   without FFmpeg
//! - Transition offset arithmetic over measured clip durations
//! - Cross-fade and concatenation filter-graph construction
//! - A composition driver with bounded-timeout FFmpeg invocation

pub mod command;
pub mod compose;
pub mod error;
pub mod graph;
pub mod mp4;
pub mod probe;
pub mod strategy;
pub mod timeline;

pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use compose::{Composer, ComposerConfig, COMPOSITION_TIMEOUT_SECS};
pub use error::{MediaError, MediaResult};
pub use graph::{build_concat_graph, build_transition_graph, FilterGraph, FINAL_OUTPUT_LABEL};
pub use probe::probe_video_duration;
pub use strategy::FallbackChain;
pub use timeline::{compute_offsets, total_duration};
