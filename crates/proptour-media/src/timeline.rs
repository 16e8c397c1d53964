//! Transition offset arithmetic.
//!
//! A cross-fade consumes `transition_duration` seconds of overlap between
//! each adjacent pair of clips. The offset of transition `i` is the point on
//! the combined timeline where it starts: the accumulated play time of the
//! preceding clips minus the overlap already spent on earlier transitions.

use crate::error::{MediaError, MediaResult};

/// Compute the cross-fade start offset for each adjacent clip pair.
///
/// `offset[0] = d[0] - t`, then each subsequent offset accumulates the next
/// clip's duration minus one transition overlap. The result has
/// `durations.len() - 1` entries and is strictly increasing.
///
/// # Errors
///
/// [`MediaError::InvalidComposition`] when fewer than two durations are
/// given, any duration is non-positive, the transition is non-positive, or
/// the transition is not strictly shorter than every clip. The last case
/// would produce non-monotonic or negative offsets and an unusable filter
/// graph, so it is rejected up front rather than handed to the encoder.
pub fn compute_offsets(durations: &[f64], transition_duration: f64) -> MediaResult<Vec<f64>> {
    if durations.len() < 2 {
        return Err(MediaError::InvalidComposition(format!(
            "need at least 2 clips to compose, got {}",
            durations.len()
        )));
    }

    if transition_duration <= 0.0 {
        return Err(MediaError::InvalidComposition(format!(
            "transition duration must be positive, got {transition_duration}"
        )));
    }

    for (i, &duration) in durations.iter().enumerate() {
        if duration <= 0.0 {
            return Err(MediaError::InvalidComposition(format!(
                "clip {i} has non-positive duration {duration}"
            )));
        }
        if transition_duration >= duration {
            return Err(MediaError::InvalidComposition(format!(
                "transition duration {transition_duration}s must be shorter than every clip; \
                 clip {i} is only {duration}s"
            )));
        }
    }

    let mut offsets = Vec::with_capacity(durations.len() - 1);
    let mut accumulated = 0.0;
    for window in durations.windows(2) {
        accumulated += window[0] - transition_duration;
        offsets.push(accumulated);
    }

    Ok(offsets)
}

/// Total play length of the composed output.
///
/// Each of the `N - 1` transitions overlaps two clips by the transition
/// duration, so that much time is subtracted from the plain sum.
pub fn total_duration(durations: &[f64], transition_duration: f64) -> f64 {
    let sum: f64 = durations.iter().sum();
    sum - (durations.len().saturating_sub(1)) as f64 * transition_duration
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_two_clips() {
        let offsets = compute_offsets(&[8.0, 8.0], 0.5).unwrap();
        assert_eq!(offsets.len(), 1);
        assert_close(offsets[0], 7.5);
        assert_close(total_duration(&[8.0, 8.0], 0.5), 15.5);
    }

    #[test]
    fn test_three_clips() {
        let offsets = compute_offsets(&[8.0, 8.0, 8.0], 0.5).unwrap();
        assert_eq!(offsets.len(), 2);
        assert_close(offsets[0], 7.5);
        assert_close(offsets[1], 15.0);
        assert_close(total_duration(&[8.0, 8.0, 8.0], 0.5), 23.0);
    }

    #[test]
    fn test_uneven_durations() {
        // offset[i] == sum(d[0..=i]) - (i+1) * t
        let durations = [7.8, 8.2, 6.5, 9.1];
        let t = 0.75;
        let offsets = compute_offsets(&durations, t).unwrap();
        assert_eq!(offsets.len(), 3);
        assert_close(offsets[0], 7.8 - t);
        assert_close(offsets[1], 7.8 + 8.2 - 2.0 * t);
        assert_close(offsets[2], 7.8 + 8.2 + 6.5 - 3.0 * t);
    }

    #[test]
    fn test_offsets_strictly_increasing() {
        let durations = [5.0, 3.0, 4.5, 6.0, 2.5];
        let offsets = compute_offsets(&durations, 0.4).unwrap();
        for pair in offsets.windows(2) {
            assert!(pair[1] > pair[0], "offsets not increasing: {offsets:?}");
        }
        assert_close(offsets[0], 5.0 - 0.4);
    }

    #[test]
    fn test_single_clip_rejected() {
        let err = compute_offsets(&[8.0], 0.5).unwrap_err();
        assert!(matches!(err, MediaError::InvalidComposition(_)));
    }

    #[test]
    fn test_transition_longer_than_clip_rejected() {
        // Would yield a negative first offset and a nonsensical graph.
        let err = compute_offsets(&[2.0, 0.3, 5.0], 0.5).unwrap_err();
        assert!(matches!(err, MediaError::InvalidComposition(_)));

        // Equal is rejected too: the overlap must be strictly smaller.
        let err = compute_offsets(&[8.0, 0.5], 0.5).unwrap_err();
        assert!(matches!(err, MediaError::InvalidComposition(_)));
    }

    #[test]
    fn test_non_positive_inputs_rejected() {
        assert!(compute_offsets(&[8.0, -1.0], 0.5).is_err());
        assert!(compute_offsets(&[8.0, 8.0], 0.0).is_err());
        assert!(compute_offsets(&[8.0, 8.0], -0.5).is_err());
    }
}
