// Error taxonomy for the query graph

use thiserror::Error;

/// Invocation-level failures. Node failures surface here unchanged — there
/// is no local recovery or degraded-mode answer.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The question was missing or blank. Rejected before any node runs.
    #[error("question must not be empty")]
    EmptyQuestion,

    /// The model provider failed (network, provider, quota). Propagated
    /// unchanged; the invocation as a whole fails with no partial trace.
    #[error("model invocation failed: {0}")]
    ModelInvocation(#[from] anyhow::Error),

    /// Refine ran against a trace shorter than question + answer + critique.
    /// Unreachable given the fixed topology; failing loudly beats silently
    /// refining an empty critique.
    #[error("trace has {len} messages, refine requires at least 3")]
    MalformedTrace { len: usize },
}
