//! A reference tool illustrating the [`ToolDyn`] contract: knowledge-graph
//! search. No real graph backend is wired up — per the orchestration core's
//! scope, concrete tool implementations live outside it — so this returns a
//! fixed, deterministic result for any query.

use std::future::Future;
use std::pin::Pin;

use conduit_tool::{ToolContext, ToolDyn};
use conduit_types::ToolError;

/// Stub knowledge-graph search tool.
///
/// Always succeeds, echoing the query back alongside a canned list of
/// related entities, so callers can exercise the tool-calling loop without
/// a real graph store.
pub struct KnowledgeGraphSearch;

impl KnowledgeGraphSearch {
    /// Construct the tool.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for KnowledgeGraphSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolDyn for KnowledgeGraphSearch {
    fn name(&self) -> &str {
        "knowledge_graph_search"
    }

    fn description(&self) -> &str {
        "Search the knowledge graph for entities related to a query string."
    }

    fn input_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": { "type": "string" },
            },
            "required": ["query"],
        })
    }

    fn invoke(
        &self,
        args: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>> {
        Box::pin(async move {
            let query = args
                .get("query")
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| ToolError::InvalidInput("missing required field: query".to_string()))?
                .to_string();

            Ok(serde_json::json!({
                "query": query,
                "entities": [
                    { "id": "entity:1", "label": "related-entity-a", "score": 0.91 },
                    { "id": "entity:2", "label": "related-entity-b", "score": 0.78 },
                ],
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_canned_entities_for_a_query() {
        let tool = KnowledgeGraphSearch::new();
        let ctx = ToolContext::new("session-1");
        let out = tool.invoke(serde_json::json!({"query": "rust async"}), &ctx).await.unwrap();
        assert_eq!(out["query"], "rust async");
        assert_eq!(out["entities"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn rejects_missing_query() {
        let tool = KnowledgeGraphSearch::new();
        let ctx = ToolContext::new("session-1");
        let err = tool.invoke(serde_json::json!({}), &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }
}
