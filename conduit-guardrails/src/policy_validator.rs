//! The three policy-limit checks shared by the orchestrator and tool authors.

use conduit_types::{HarnessError, Policy};

/// Default maximum size, in bytes, of a single tool or completion output.
pub const DEFAULT_MAX_OUTPUT_SIZE: usize = 10_000;

/// Checks depth, iteration, and output-size limits against a [`Policy`].
pub struct PolicyValidator {
    max_output_size: usize,
}

impl PolicyValidator {
    /// Create a validator with [`DEFAULT_MAX_OUTPUT_SIZE`].
    #[must_use]
    pub fn new() -> Self {
        Self { max_output_size: DEFAULT_MAX_OUTPUT_SIZE }
    }

    /// Create a validator with a custom output-size limit.
    #[must_use]
    pub fn with_max_output_size(max_output_size: usize) -> Self {
        Self { max_output_size }
    }

    /// Reject if `depth` has reached or exceeded `policy.max_tool_depth`.
    pub fn validate_depth(&self, depth: usize, policy: &Policy) -> Result<(), HarnessError> {
        if depth >= policy.max_tool_depth {
            return Err(HarnessError::MaxDepthExceeded(policy.max_tool_depth));
        }
        Ok(())
    }

    /// Reject if `iteration` has reached or exceeded `policy.max_iterations`.
    pub fn validate_iteration(&self, iteration: usize, policy: &Policy) -> Result<(), HarnessError> {
        if iteration >= policy.max_iterations {
            return Err(HarnessError::MaxIterationsExceeded(policy.max_iterations));
        }
        Ok(())
    }

    /// Reject if `size_bytes` exceeds this validator's configured limit.
    pub fn validate_output_size(&self, size_bytes: usize) -> Result<(), HarnessError> {
        if size_bytes > self.max_output_size {
            return Err(HarnessError::GuardrailViolation(format!(
                "output size {size_bytes} exceeds limit of {}",
                self.max_output_size
            )));
        }
        Ok(())
    }
}

impl Default for PolicyValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_at_limit_is_rejected() {
        let v = PolicyValidator::new();
        let policy = Policy::default();
        assert!(v.validate_depth(policy.max_tool_depth, &policy).is_err());
        assert!(v.validate_depth(policy.max_tool_depth - 1, &policy).is_ok());
    }

    #[test]
    fn iteration_at_limit_is_rejected() {
        let v = PolicyValidator::new();
        let policy = Policy::default();
        assert!(v.validate_iteration(policy.max_iterations, &policy).is_err());
        assert!(v.validate_iteration(0, &policy).is_ok());
    }

    #[test]
    fn output_size_over_default_limit_is_rejected() {
        let v = PolicyValidator::new();
        assert!(v.validate_output_size(DEFAULT_MAX_OUTPUT_SIZE + 1).is_err());
        assert!(v.validate_output_size(DEFAULT_MAX_OUTPUT_SIZE).is_ok());
    }

    #[test]
    fn custom_output_size_limit_is_honored() {
        let v = PolicyValidator::with_max_output_size(10);
        assert!(v.validate_output_size(11).is_err());
        assert!(v.validate_output_size(10).is_ok());
    }
}
