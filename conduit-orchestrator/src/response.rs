//! The orchestrator's final, non-streaming response shape.

use conduit_types::Usage;
use serde::{Deserialize, Serialize};

/// The result of a completed (non-streaming) orchestration.
///
/// This is the shape persisted to the cache: serialized with `serde_json`
/// and stored under the request's deterministic cache key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorResponse {
    /// The model's final text response.
    pub text: String,
    /// Usage accumulated over the orchestration's final provider call.
    pub usage: Option<Usage>,
}
