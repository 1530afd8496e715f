//! Composable middleware around tool invocation.
//!
//! The pattern mirrors axum's `from_fn`: each middleware receives a [`Next`]
//! it can call to continue the chain, or decline to call, short-circuiting.
//! Not part of the orchestration loop's core algorithm — an ambient seam for
//! cross-cutting concerns (logging, output-size capping) that should wrap
//! every tool call regardless of which tool it is.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use conduit_types::ToolError;

use crate::context::ToolContext;
use crate::registry::ToolDyn;

/// A boxed, `'a`-scoped future — shorthand used throughout this module.
type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Middleware that wraps tool execution.
///
/// Uses boxed futures for dyn-compatibility, since middleware is stored as
/// a heterogeneous `Vec<Arc<dyn ToolMiddleware>>`.
pub trait ToolMiddleware: Send + Sync {
    /// Process one call, optionally delegating to the next middleware/tool.
    fn process<'a>(
        &'a self,
        args: &'a serde_json::Value,
        ctx: &'a ToolContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<serde_json::Value, ToolError>>;
}

/// The remaining middleware chain plus the underlying tool.
///
/// Consumed on call to prevent double-invoke.
pub struct Next<'a> {
    tool: &'a dyn ToolDyn,
    middleware: &'a [Arc<dyn ToolMiddleware>],
}

impl<'a> Next<'a> {
    /// Build a `Next` over the given tool and remaining middleware slice.
    #[must_use]
    pub fn new(tool: &'a dyn ToolDyn, middleware: &'a [Arc<dyn ToolMiddleware>]) -> Self {
        Self { tool, middleware }
    }

    /// Continue the chain, eventually invoking the tool.
    pub async fn run(
        self,
        args: &'a serde_json::Value,
        ctx: &'a ToolContext,
    ) -> Result<serde_json::Value, ToolError> {
        if let Some((head, tail)) = self.middleware.split_first() {
            let next = Next::new(self.tool, tail);
            head.process(args, ctx, next).await
        } else {
            self.tool.invoke(args.clone(), ctx).await
        }
    }
}

struct MiddlewareFn<F> {
    f: F,
}

impl<F> ToolMiddleware for MiddlewareFn<F>
where
    F: for<'a> Fn(
            &'a serde_json::Value,
            &'a ToolContext,
            Next<'a>,
        ) -> BoxFuture<'a, Result<serde_json::Value, ToolError>>
        + Send
        + Sync,
{
    fn process<'a>(
        &'a self,
        args: &'a serde_json::Value,
        ctx: &'a ToolContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<serde_json::Value, ToolError>> {
        (self.f)(args, ctx, next)
    }
}

/// Build middleware from a closure (like axum's `from_fn`).
///
/// # Example
///
/// ```ignore
/// use conduit_tool::tool_middleware_fn;
///
/// let logging = tool_middleware_fn(|args, ctx, next| {
///     Box::pin(async move {
///         tracing::debug!(?args, "invoking tool");
///         next.run(args, ctx).await
///     })
/// });
/// ```
#[must_use]
pub fn tool_middleware_fn<F>(f: F) -> impl ToolMiddleware
where
    F: for<'a> Fn(
            &'a serde_json::Value,
            &'a ToolContext,
            Next<'a>,
        ) -> BoxFuture<'a, Result<serde_json::Value, ToolError>>
        + Send
        + Sync,
{
    MiddlewareFn { f }
}
