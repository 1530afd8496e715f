#![deny(missing_docs)]
//! Tool-call validation, output validation/sanitization, JSON-schema
//! validation, and policy limit checks.
//!
//! Each check is its own small type so callers can compose custom
//! guardrails alongside the built-in ones.

mod policy_validator;
mod result;
mod schema;
mod tool_call;
mod output;

pub use policy_validator::PolicyValidator;
pub use result::GuardrailResult;
pub use schema::validate_schema;
pub use tool_call::ToolCallValidator;
pub use output::{OutputGuardrail, DEFAULT_SENSITIVE_PATTERNS};
