//! The `Provider` capability contract.

use std::future::Future;

use crate::error::ProviderError;
use crate::stream::StreamHandle;
use crate::types::{Completion, PromptInput, ProviderOptions};

/// A model backend. Implement this for each concrete provider (local
/// inference, a remote API, ...); the orchestrator is generic over it.
///
/// Uses RPITIT (return-position `impl Trait` in trait) — native async,
/// not object-safe by design. Callers compose via `<P: Provider>` generics;
/// `conduit-factory` is where a concrete `P` gets chosen for a call site.
///
/// # Example
///
/// ```ignore
/// struct MyProvider;
///
/// impl Provider for MyProvider {
///     fn complete(&self, input: PromptInput, options: ProviderOptions)
///         -> impl Future<Output = Result<Completion, ProviderError>> + Send
///     {
///         async move { todo!() }
///     }
///
///     fn complete_stream(&self, input: PromptInput, options: ProviderOptions)
///         -> impl Future<Output = Result<StreamHandle, ProviderError>> + Send
///     {
///         async move { todo!() }
///     }
/// }
/// ```
pub trait Provider: Send + Sync {
    /// Send a prompt and receive the full completion.
    fn complete(
        &self,
        input: PromptInput,
        options: ProviderOptions,
    ) -> impl Future<Output = Result<Completion, ProviderError>> + Send;

    /// Send a prompt and receive a stream of chunks.
    fn complete_stream(
        &self,
        input: PromptInput,
        options: ProviderOptions,
    ) -> impl Future<Output = Result<StreamHandle, ProviderError>> + Send;
}
