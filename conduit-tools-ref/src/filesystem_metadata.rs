//! A reference tool illustrating the [`ToolDyn`] contract: filesystem
//! metadata lookup. No real filesystem is touched — this returns a fixed,
//! deterministic result for any path, matching the orchestration core's
//! scope of describing the Tool contract without shipping a concrete
//! filesystem adapter.

use std::future::Future;
use std::pin::Pin;

use conduit_tool::{ToolContext, ToolDyn};
use conduit_types::ToolError;

/// Stub filesystem-metadata tool.
pub struct FilesystemMetadata;

impl FilesystemMetadata {
    /// Construct the tool.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FilesystemMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolDyn for FilesystemMetadata {
    fn name(&self) -> &str {
        "filesystem_metadata"
    }

    fn description(&self) -> &str {
        "Look up metadata (size, kind, modified time) for a path."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": { "type": "string" },
            },
            "required": ["path"],
        })
    }

    fn invoke(
        &self,
        args: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>> {
        Box::pin(async move {
            let path = args
                .get("path")
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| ToolError::InvalidInput("missing required field: path".to_string()))?;

            if path.is_empty() {
                return Err(ToolError::InvalidInput("path must not be empty".to_string()));
            }

            Ok(serde_json::json!({
                "path": path,
                "kind": "file",
                "size_bytes": 4096,
                "modified": "2024-01-01T00:00:00Z",
            }))
        })
    }
}
