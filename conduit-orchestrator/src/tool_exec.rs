//! Parallel tool-call fan-out.
//!
//! One task per call, bounded by a counting semaphore; results preserve
//! input order regardless of completion order. A batch's failures never
//! abort the batch — every successful result is still returned, alongside
//! the first failure (by call order), which the caller may choose to
//! surface.

use std::sync::Arc;
use std::time::Duration;

use conduit_tool::{ToolContext, ToolRegistry};
use conduit_types::{ToolCall, ToolError};
use tokio::sync::Semaphore;

/// Default number of tool calls that may execute concurrently.
pub const DEFAULT_TOOL_CONCURRENCY: usize = 5;

/// One call's outcome, keeping it paired with the call that produced it.
#[derive(Debug)]
pub struct ToolOutcome {
    /// The call this outcome is for.
    pub call: ToolCall,
    /// The tool's result, or the error it failed with.
    pub result: Result<serde_json::Value, ToolError>,
}

/// The result of executing a batch of tool calls.
#[derive(Debug)]
pub struct ToolBatchResult {
    /// Outcomes in the same order as the input call list.
    pub outcomes: Vec<ToolOutcome>,
}

impl ToolBatchResult {
    /// Successful outcomes only, in input order.
    #[must_use]
    pub fn successes(&self) -> impl Iterator<Item = (&ToolCall, &serde_json::Value)> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok().map(|v| (&o.call, v)))
    }

    /// The first failure encountered, by call order, if any.
    #[must_use]
    pub fn first_failure(&self) -> Option<(&ToolCall, &ToolError)> {
        self.outcomes.iter().find_map(|o| o.result.as_ref().err().map(|e| (&o.call, e)))
    }
}

/// Execute `calls` against `registry`, bounded by a semaphore of capacity
/// `concurrency`, each under a `timeout` deadline derived from `parent`.
///
/// Cancelling `parent` aborts every pending tool call: each task derives a
/// child [`ToolContext`] whose token is cancelled the moment `parent` is.
pub async fn execute_tools(
    registry: &ToolRegistry,
    calls: &[ToolCall],
    concurrency: usize,
    timeout: Duration,
    parent: &ToolContext,
) -> ToolBatchResult {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

    let futures = calls.iter().map(|call| {
        let semaphore = Arc::clone(&semaphore);
        let ctx = parent.child();
        async move {
            let _permit = semaphore.acquire().await.expect("semaphore is never closed");
            let result = run_one(registry, call, timeout, &ctx).await;
            ToolOutcome { call: call.clone(), result }
        }
    });

    let outcomes = futures::future::join_all(futures).await;
    ToolBatchResult { outcomes }
}

async fn run_one(
    registry: &ToolRegistry,
    call: &ToolCall,
    timeout: Duration,
    ctx: &ToolContext,
) -> Result<serde_json::Value, ToolError> {
    if ctx.cancellation_token.is_cancelled() {
        return Err(ToolError::Cancelled);
    }
    let Some(tool) = registry.get(&call.name) else {
        return Err(ToolError::NotFound(call.name.clone()));
    };
    tokio::select! {
        result = tool.invoke(call.args.clone(), ctx) => result,
        () = tokio::time::sleep(timeout) => Err(ToolError::Timeout(timeout)),
        () = ctx.cancellation_token.cancelled() => Err(ToolError::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_tool::ToolDyn;
    use serde_json::json;
    use std::future::Future;
    use std::pin::Pin;

    struct Echo;
    impl ToolDyn for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echo"
        }
        fn input_schema(&self) -> serde_json::Value {
            json!({})
        }
        fn invoke(
            &self,
            args: serde_json::Value,
            _ctx: &ToolContext,
        ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>> {
            Box::pin(async move { Ok(args) })
        }
    }

    struct Slow;
    impl ToolDyn for Slow {
        fn name(&self) -> &str {
            "slow"
        }
        fn description(&self) -> &str {
            "slow"
        }
        fn input_schema(&self) -> serde_json::Value {
            json!({})
        }
        fn invoke(
            &self,
            _args: serde_json::Value,
            _ctx: &ToolContext,
        ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>> {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(json!(null))
            })
        }
    }

    fn call(name: &str, args: serde_json::Value) -> ToolCall {
        ToolCall { name: name.to_string(), args }
    }

    #[tokio::test]
    async fn preserves_input_order_regardless_of_completion_order() {
        let mut reg = ToolRegistry::new();
        reg.register(Arc::new(Echo));
        let calls = vec![call("echo", json!(1)), call("echo", json!(2)), call("echo", json!(3))];
        let ctx = ToolContext::default();
        let batch = execute_tools(&reg, &calls, 5, Duration::from_secs(5), &ctx).await;
        let values: Vec<_> = batch.successes().map(|(_, v)| v.clone()).collect();
        assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
    }

    #[tokio::test]
    async fn unknown_tool_records_not_found_but_others_succeed() {
        let mut reg = ToolRegistry::new();
        reg.register(Arc::new(Echo));
        let calls = vec![call("echo", json!(1)), call("missing", json!({}))];
        let ctx = ToolContext::default();
        let batch = execute_tools(&reg, &calls, 5, Duration::from_secs(5), &ctx).await;
        assert_eq!(batch.successes().count(), 1);
        let (failed_call, err) = batch.first_failure().unwrap();
        assert_eq!(failed_call.name, "missing");
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn timeout_is_recorded_as_failure() {
        let mut reg = ToolRegistry::new();
        reg.register(Arc::new(Slow));
        let calls = vec![call("slow", json!({}))];
        let ctx = ToolContext::default();
        let batch = execute_tools(&reg, &calls, 5, Duration::from_millis(10), &ctx).await;
        assert!(matches!(batch.first_failure().unwrap().1, ToolError::Timeout(_)));
    }

    #[tokio::test]
    async fn cancellation_aborts_pending_tools() {
        let mut reg = ToolRegistry::new();
        reg.register(Arc::new(Slow));
        let calls = vec![call("slow", json!({}))];
        let ctx = ToolContext::default();
        ctx.cancellation_token.cancel();
        let batch = execute_tools(&reg, &calls, 5, Duration::from_secs(5), &ctx).await;
        assert!(matches!(batch.first_failure().unwrap().1, ToolError::Cancelled));
    }
}
