// Query orchestration graph — the generate → reflect → refine loop
//
// A linear/cyclic pipeline: each node fully completes (including its
// provider call) before the next starts. One invocation owns its trace
// exclusively; the provider handle is shared read-only configuration.

mod error;
mod state;

pub use error::GraphError;
pub use state::{
    is_approval, next_state, Message, NodeState, Role, RunConfig, Trace, APPROVAL_PHRASE,
};

use std::sync::Arc;

use crate::prompts;
use crate::providers::LlmProvider;

/// Fallback response text for the (unreachable given seeding) empty trace.
const NO_RESPONSE_PLACEHOLDER: &str = "no response generated";

/// Tuning knobs for the graph, from the `[graph]` config section.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Reflect/refine rounds before the hard stop. The approval phrase can
    /// exit earlier; this bound guarantees termination regardless of what
    /// the critique says.
    pub max_rounds: u32,
    /// Token cap passed through to every provider call.
    pub max_tokens: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_rounds: 1,
            max_tokens: 4096,
        }
    }
}

/// Result of a completed invocation: the final answer plus the full trace.
#[derive(Debug, Clone)]
pub struct GraphOutcome {
    pub response: String,
    pub trace: Vec<Message>,
}

/// The orchestration graph. Holds the injected provider and per-instance
/// tuning; all per-invocation state lives in the invocation itself.
pub struct QueryGraph {
    provider: Arc<dyn LlmProvider>,
    config: GraphConfig,
}

impl QueryGraph {
    pub fn new(provider: Arc<dyn LlmProvider>, config: GraphConfig) -> Self {
        Self { provider, config }
    }

    /// Run the full generate → reflect → refine loop for one question.
    ///
    /// The trace is seeded with the question, appended to by each node, and
    /// returned whole on success. Any provider failure aborts the whole
    /// invocation — no partial trace is surfaced.
    pub async fn invoke(
        &self,
        question: &str,
        run: &RunConfig,
    ) -> Result<GraphOutcome, GraphError> {
        if question.trim().is_empty() {
            return Err(GraphError::EmptyQuestion);
        }

        let mut trace = Trace::seed(question);
        let mut state = NodeState::Generate;
        let mut round: u32 = 0;

        while state != NodeState::Terminated {
            state = match state {
                NodeState::Generate => {
                    tracing::debug!("graph node: generate");
                    let answer = self.run_generate(&trace, run).await?;
                    trace.push(Message::answer(answer));
                    next_state(NodeState::Generate, round, self.config.max_rounds, false)
                }
                NodeState::Reflect => {
                    tracing::debug!(round, "graph node: reflect");
                    let critique = self.run_reflect(&trace, run).await?;
                    trace.push(Message::critique(critique));
                    next_state(NodeState::Reflect, round, self.config.max_rounds, false)
                }
                NodeState::Refine => {
                    tracing::debug!(round, "graph node: refine");
                    // The approval check reads the critique at the trace
                    // tail before the revision is appended, so refine always
                    // runs once even on an approving critique.
                    let approved = trace.last().map(|m| is_approval(&m.content)).unwrap_or(false);
                    let revised = self.run_refine(&trace, run).await?;
                    trace.push(Message::answer(revised));
                    round += 1;
                    let next = next_state(NodeState::Refine, round, self.config.max_rounds, approved);
                    if next == NodeState::Terminated {
                        tracing::info!(
                            round,
                            approved,
                            trace_len = trace.len(),
                            "graph terminated"
                        );
                    }
                    next
                }
                NodeState::Terminated => NodeState::Terminated,
            };
        }

        let response = trace
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string());

        Ok(GraphOutcome {
            response,
            trace: trace.into_messages(),
        })
    }

    /// Generate node: produce the initial answer from context + history.
    async fn run_generate(&self, trace: &Trace, run: &RunConfig) -> Result<String, GraphError> {
        let request = prompts::compose_generate(
            trace.question(),
            &run.context_block(),
            &run.conversation_history,
            trace,
        )
        .with_max_tokens(self.config.max_tokens);

        let response = self.provider.send_message(&request).await?;
        Ok(response.text().to_string())
    }

    /// Reflect node: critique the latest candidate answer.
    async fn run_reflect(&self, trace: &Trace, run: &RunConfig) -> Result<String, GraphError> {
        let request =
            prompts::compose_reflect(trace.question(), &run.conversation_history, trace)
                .with_max_tokens(self.config.max_tokens);

        let response = self.provider.send_message(&request).await?;
        Ok(response.text().to_string())
    }

    /// Refine node: revise the answer two positions before the tail using
    /// the critique at the tail.
    async fn run_refine(&self, trace: &Trace, run: &RunConfig) -> Result<String, GraphError> {
        let len = trace.len();
        if len < 3 {
            return Err(GraphError::MalformedTrace { len });
        }
        let original_response = &trace.messages()[len - 2].content;
        let critique = &trace.messages()[len - 1].content;

        let request = prompts::compose_refine(
            &run.conversation_history,
            original_response,
            critique,
            trace,
        )
        .with_max_tokens(self.config.max_tokens);

        let response = self.provider.send_message(&request).await?;
        Ok(response.text().to_string())
    }
}
