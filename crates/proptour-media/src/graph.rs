//! Filter graph construction.
//!
//! Translates a composition plan into the `-filter_complex` description the
//! encoder consumes: one normalization stage per clip, then a chain of xfade
//! stages wired through intermediate labels down to the single final output
//! label the driver maps into the encoded stream.

use std::fmt;

use proptour_models::{CompositionPlan, Resolution};

/// Label of the designated final output node, known to the driver's `-map`.
pub const FINAL_OUTPUT_LABEL: &str = "outv";

/// An ordered sequence of named filter stages.
///
/// Node labels are unique by construction (`v<i>`, `v<i>out`, `outv`) and
/// exactly one stage produces [`FINAL_OUTPUT_LABEL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGraph {
    stages: Vec<String>,
}

impl FilterGraph {
    fn new() -> Self {
        Self { stages: Vec::new() }
    }

    fn push(&mut self, stage: String) {
        self.stages.push(stage);
    }

    /// The individual stages, normalization first, transitions after.
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// Render to the single filter_complex string FFmpeg takes.
    pub fn render(&self) -> String {
        self.stages.join(";")
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Build the cross-fade graph for a plan with precomputed offsets.
///
/// Each clip is trimmed to its exact measured duration (source containers
/// sometimes report slightly more than is playable, which would drift every
/// later offset), scaled to fit inside the target resolution, padded to the
/// exact frame centered, forced to a single sample aspect ratio, and
/// normalized to the plan's frame rate so the wall-clock offsets blend
/// frame-accurately. Pure function of its inputs.
pub fn build_transition_graph(plan: &CompositionPlan, offsets: &[f64]) -> FilterGraph {
    let mut graph = FilterGraph::new();
    let Resolution { width, height } = plan.resolution;
    let clip_count = plan.clips.len();

    for (i, clip) in plan.clips.iter().enumerate() {
        graph.push(format!(
            "[{i}:v]trim=duration={duration},scale={width}:{height}:force_original_aspect_ratio=decrease,\
             pad={width}:{height}:(ow-iw)/2:(oh-ih)/2,setsar=1,fps={fps}[v{i}]",
            duration = clip.duration_seconds,
            fps = plan.fps,
        ));
    }

    let mut current_input = "v0".to_string();
    for (i, offset) in offsets.iter().enumerate() {
        let pair_index = i + 1;
        let output_label = if pair_index < clip_count - 1 {
            format!("v{pair_index}out")
        } else {
            FINAL_OUTPUT_LABEL.to_string()
        };

        graph.push(format!(
            "[{current_input}][v{pair_index}]xfade=transition={kind}:duration={duration}:offset={offset}[{output_label}]",
            kind = plan.transition.kind,
            duration = plan.transition.duration_seconds,
        ));

        current_input = output_label;
    }

    graph
}

/// Build the straight-concatenation graph: scale+pad per clip, no trimming
/// or frame-rate forcing, then a single concat stage.
pub fn build_concat_graph(clip_count: usize, resolution: Resolution) -> FilterGraph {
    let mut graph = FilterGraph::new();
    let Resolution { width, height } = resolution;

    for i in 0..clip_count {
        graph.push(format!(
            "[{i}:v]scale={width}:{height}:force_original_aspect_ratio=decrease,\
             pad={width}:{height}:(ow-iw)/2:(oh-ih)/2,setsar=1[v{i}]"
        ));
    }

    let inputs: String = (0..clip_count).map(|i| format!("[v{i}]")).collect();
    graph.push(format!(
        "{inputs}concat=n={clip_count}:v=1:a=0[{FINAL_OUTPUT_LABEL}]"
    ));

    graph
}
