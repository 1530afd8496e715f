//! Orchestration policy: depth/iteration/timeout/retry limits.

use std::time::Duration;

/// Governs how far and how long a single orchestration may run.
///
/// Constructed via [`Policy::new`] or [`Policy::default`], both of which
/// clamp `max_tool_depth` to `[1, 10]` and `max_iterations` to `[1, 50]` —
/// the clamp happens once, at construction, so the rest of the orchestrator
/// can treat these fields as already-valid bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    /// Maximum number of loop iterations that may execute tools.
    pub max_tool_depth: usize,
    /// Maximum number of provider calls per orchestration.
    pub max_iterations: usize,
    /// Per-tool-call timeout.
    pub tool_timeout: Duration,
    /// Whether the final response must be valid JSON.
    pub require_json_output: bool,
    /// Whether to request deterministic generation (fixed seed) on the
    /// first iteration.
    pub deterministic: bool,
    /// Number of provider-call retries on transient failure.
    pub retry_count: u32,
    /// Backoff between retries.
    pub retry_backoff: Duration,
}

impl Policy {
    /// Construct a policy, clamping `max_tool_depth` to `[1, 10]` and
    /// `max_iterations` to `[1, 50]`.
    #[must_use]
    pub fn new(
        max_tool_depth: usize,
        max_iterations: usize,
        tool_timeout: Duration,
        require_json_output: bool,
        deterministic: bool,
        retry_count: u32,
        retry_backoff: Duration,
    ) -> Self {
        Self {
            max_tool_depth: max_tool_depth.clamp(1, 10),
            max_iterations: max_iterations.clamp(1, 50),
            tool_timeout,
            require_json_output,
            deterministic,
            retry_count,
            retry_backoff,
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            max_tool_depth: 3,
            max_iterations: 10,
            tool_timeout: Duration::from_secs(30),
            require_json_output: false,
            deterministic: false,
            retry_count: 2,
            retry_backoff: Duration::from_millis(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_depth_and_iterations() {
        let p = Policy::new(0, 0, Duration::from_secs(1), false, false, 0, Duration::ZERO);
        assert_eq!(p.max_tool_depth, 1);
        assert_eq!(p.max_iterations, 1);

        let p = Policy::new(100, 1000, Duration::from_secs(1), false, false, 0, Duration::ZERO);
        assert_eq!(p.max_tool_depth, 10);
        assert_eq!(p.max_iterations, 50);
    }

    #[test]
    fn default_matches_spec() {
        let p = Policy::default();
        assert_eq!(p.max_tool_depth, 3);
        assert_eq!(p.max_iterations, 10);
        assert_eq!(p.tool_timeout, Duration::from_secs(30));
        assert!(!p.deterministic);
        assert_eq!(p.retry_count, 2);
        assert_eq!(p.retry_backoff, Duration::from_millis(100));
    }

    proptest::proptest! {
        #[test]
        fn clamp_is_always_in_bounds(depth in 0usize..10_000, iterations in 0usize..10_000) {
            let p = Policy::new(depth, iterations, Duration::from_secs(1), false, false, 0, Duration::ZERO);
            proptest::prop_assert!((1..=10).contains(&p.max_tool_depth));
            proptest::prop_assert!((1..=50).contains(&p.max_iterations));
        }
    }
}
