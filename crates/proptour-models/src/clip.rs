//! Clip descriptors and composition plans.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::resolution::Resolution;
use crate::transition::TransitionSpec;

/// Frame rate every clip is normalized to before cross-fading.
///
/// Offsets are computed in wall-clock seconds, so all streams must share a
/// common rate for frame-accurate blending.
pub const DEFAULT_FPS: u32 = 30;

/// One input clip with its measured play length.
///
/// The duration is always measured by probing the file, never assumed from
/// the generation request; immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipDescriptor {
    /// Path to the clip on disk.
    pub path: PathBuf,
    /// Measured duration in seconds.
    pub duration_seconds: f64,
}

impl ClipDescriptor {
    pub fn new(path: impl Into<PathBuf>, duration_seconds: f64) -> Self {
        Self {
            path: path.into(),
            duration_seconds,
        }
    }
}

/// Everything one composition call needs, derived per call.
///
/// Invariant: `clips.len() >= 2` — a single clip cannot be composed. The
/// media crate rejects shorter plans before any subprocess is spawned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionPlan {
    /// Ordered input clips with measured durations.
    pub clips: Vec<ClipDescriptor>,
    /// Transition applied between each adjacent pair.
    pub transition: TransitionSpec,
    /// Target output resolution.
    pub resolution: Resolution,
    /// Frame rate all clips are normalized to.
    pub fps: u32,
}

impl CompositionPlan {
    pub fn new(clips: Vec<ClipDescriptor>, transition: TransitionSpec, resolution: Resolution) -> Self {
        Self {
            clips,
            transition,
            resolution,
            fps: DEFAULT_FPS,
        }
    }

    /// Measured durations in clip order.
    pub fn durations(&self) -> Vec<f64> {
        self.clips.iter().map(|c| c.duration_seconds).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::TransitionKind;

    #[test]
    fn test_plan_durations() {
        let plan = CompositionPlan::new(
            vec![
                ClipDescriptor::new("/tmp/a.mp4", 8.0),
                ClipDescriptor::new("/tmp/b.mp4", 7.5),
            ],
            TransitionSpec::new(TransitionKind::Fade, 0.5),
            Resolution::default(),
        );
        assert_eq!(plan.durations(), vec![8.0, 7.5]);
        assert_eq!(plan.fps, DEFAULT_FPS);
    }
}
