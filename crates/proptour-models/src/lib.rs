//! Shared data models for the PropTour composition engine.
//!
//! This crate provides Serde-serializable types for:
//! - Clip descriptors and composition plans
//! - Transition effects and timing
//! - Output resolution
//! - Encoding configuration

pub mod clip;
pub mod encoding;
pub mod resolution;
pub mod transition;

// Re-export common types
pub use clip::{ClipDescriptor, CompositionPlan, DEFAULT_FPS};
pub use encoding::EncodingConfig;
pub use resolution::{Resolution, ResolutionParseError};
pub use transition::{TransitionKind, TransitionSpec};
