//! Ordered fallback strategies.
//!
//! Several parts of the pipeline need to try a list of extraction strategies
//! in order and take the first that succeeds: duration probing (FFmpeg text
//! output, then the MP4 box parser) and tolerant decoding of loosely-shaped
//! upstream responses. This helper keeps that pattern in one place and
//! aggregates the per-strategy failure reasons when everything misses.

/// Accumulates attempts at producing a value from ordered strategies.
///
/// Strategies recorded after the first success are ignored, so callers can
/// guard expensive attempts with [`FallbackChain::resolved`].
#[derive(Debug)]
pub struct FallbackChain<T> {
    value: Option<T>,
    failures: Vec<(String, String)>,
}

impl<T> FallbackChain<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            failures: Vec::new(),
        }
    }

    /// Record the outcome of one named strategy.
    pub fn attempt(&mut self, strategy: &str, outcome: Result<T, String>) {
        if self.value.is_some() {
            return;
        }
        match outcome {
            Ok(value) => self.value = Some(value),
            Err(reason) => self.failures.push((strategy.to_string(), reason)),
        }
    }

    /// True once some strategy has produced a value.
    pub fn resolved(&self) -> bool {
        self.value.is_some()
    }

    /// First successful value, or the aggregated reasons for total failure.
    pub fn finish(self) -> Result<T, String> {
        match self.value {
            Some(value) => Ok(value),
            None => {
                let reasons = self
                    .failures
                    .iter()
                    .map(|(strategy, reason)| format!("{strategy}: {reason}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(if reasons.is_empty() {
                    "no strategies attempted".to_string()
                } else {
                    reasons
                })
            }
        }
    }
}

impl<T> Default for FallbackChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_success_wins() {
        let mut chain = FallbackChain::new();
        chain.attempt("a", Err("nope".to_string()));
        chain.attempt("b", Ok(42));
        chain.attempt("c", Ok(99));
        assert_eq!(chain.finish().unwrap(), 42);
    }

    #[test]
    fn test_total_failure_aggregates_reasons() {
        let mut chain: FallbackChain<u32> = FallbackChain::new();
        chain.attempt("ffmpeg", Err("binary missing".to_string()));
        chain.attempt("mp4", Err("no mvhd box".to_string()));
        let err = chain.finish().unwrap_err();
        assert_eq!(err, "ffmpeg: binary missing; mp4: no mvhd box");
    }

    #[test]
    fn test_resolved_short_circuits() {
        let mut chain = FallbackChain::new();
        chain.attempt("a", Ok(1));
        assert!(chain.resolved());
        // A later failure must not disturb the resolved value.
        chain.attempt("b", Err("late".to_string()));
        assert_eq!(chain.finish().unwrap(), 1);
    }

    #[test]
    fn test_empty_chain() {
        let chain: FallbackChain<u32> = FallbackChain::new();
        assert_eq!(chain.finish().unwrap_err(), "no strategies attempted");
    }
}
