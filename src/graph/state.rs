// Conversation state for the query graph: roles, messages, the append-only
// trace, and the pure node transition function.

use serde::{Deserialize, Serialize};

/// Case-insensitive phrase a critique may emit to approve the current answer
/// and stop further rounds.
pub const APPROVAL_PHRASE: &str = "no improvement needed";

/// Author tag for a trace message.
///
/// Three-way so critiques stay distinguishable from answers in the trace.
/// On the provider wire, `Question` and `Critique` are sent as the user
/// role and `Answer` as the assistant role, so reviewers read like a second
/// human turn — the behavior the critique loop depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Question,
    Answer,
    Critique,
}

impl Role {
    /// Provider wire role for a message with this tag.
    pub fn wire_role(&self) -> &'static str {
        match self {
            Role::Answer => "assistant",
            Role::Question | Role::Critique => "user",
        }
    }
}

/// One immutable unit of the conversation trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn question(content: impl Into<String>) -> Self {
        Self {
            role: Role::Question,
            content: content.into(),
        }
    }

    pub fn answer(content: impl Into<String>) -> Self {
        Self {
            role: Role::Answer,
            content: content.into(),
        }
    }

    pub fn critique(content: impl Into<String>) -> Self {
        Self {
            role: Role::Critique,
            content: content.into(),
        }
    }
}

/// Append-only conversation trace for one invocation.
///
/// Element 0 is always the original question and the sequence only grows;
/// the public API exposes no removal or reordering.
#[derive(Debug, Clone, Serialize)]
pub struct Trace(Vec<Message>);

impl Trace {
    /// Create a trace seeded with the original question.
    pub fn seed(question: impl Into<String>) -> Self {
        Self(vec![Message::question(question)])
    }

    /// Append a node's output message.
    pub fn push(&mut self, message: Message) {
        self.0.push(message);
    }

    /// The original question text (element 0).
    pub fn question(&self) -> &str {
        &self.0[0].content
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.0.last()
    }

    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.0
    }
}

/// Per-invocation side-channel data supplied by the caller: retrieved code
/// context and prior conversation history. Immutable during a run.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Retrieved context chunks, in relevance order. May be empty.
    pub context: Vec<String>,
    /// Opaque prior-conversation text. May be empty.
    pub conversation_history: String,
}

impl RunConfig {
    /// Join the context chunks into the single block the prompts interpolate.
    pub fn context_block(&self) -> String {
        self.context.join("\n")
    }
}

/// Graph node states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Generate,
    Reflect,
    Refine,
    Terminated,
}

/// Pure transition function for the graph.
///
/// `round` is the number of completed refine passes and `approved` whether
/// the critique that drove the latest refine contained the approval phrase.
/// Only the Refine edge is conditional; Terminated is absorbing.
pub fn next_state(current: NodeState, round: u32, max_rounds: u32, approved: bool) -> NodeState {
    match current {
        NodeState::Generate => NodeState::Reflect,
        NodeState::Reflect => NodeState::Refine,
        NodeState::Refine => {
            if approved || round >= max_rounds {
                NodeState::Terminated
            } else {
                NodeState::Reflect
            }
        }
        NodeState::Terminated => NodeState::Terminated,
    }
}

/// Whether critique text approves the current answer.
pub fn is_approval(critique: &str) -> bool {
    critique.to_lowercase().contains(APPROVAL_PHRASE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_places_question_first() {
        let trace = Trace::seed("What does main() do?");
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.question(), "What does main() do?");
        assert_eq!(trace.messages()[0].role, Role::Question);
    }

    #[test]
    fn test_question_survives_appends() {
        let mut trace = Trace::seed("original");
        trace.push(Message::answer("a1"));
        trace.push(Message::critique("c1"));
        trace.push(Message::answer("a2"));
        assert_eq!(trace.question(), "original");
        assert_eq!(trace.len(), 4);
    }

    #[test]
    fn test_wire_roles() {
        assert_eq!(Role::Question.wire_role(), "user");
        assert_eq!(Role::Critique.wire_role(), "user");
        assert_eq!(Role::Answer.wire_role(), "assistant");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Critique).unwrap(),
            "\"critique\""
        );
        assert_eq!(
            serde_json::to_string(&Role::Question).unwrap(),
            "\"question\""
        );
    }

    #[test]
    fn test_unconditional_edges() {
        assert_eq!(
            next_state(NodeState::Generate, 0, 1, false),
            NodeState::Reflect
        );
        assert_eq!(
            next_state(NodeState::Reflect, 0, 1, false),
            NodeState::Refine
        );
        assert_eq!(
            next_state(NodeState::Terminated, 5, 1, true),
            NodeState::Terminated
        );
    }

    #[test]
    fn test_refine_terminates_on_approval() {
        // Approval ends the run even with rounds remaining
        assert_eq!(
            next_state(NodeState::Refine, 1, 3, true),
            NodeState::Terminated
        );
    }

    #[test]
    fn test_refine_terminates_on_round_bound() {
        assert_eq!(
            next_state(NodeState::Refine, 1, 1, false),
            NodeState::Terminated
        );
    }

    #[test]
    fn test_refine_loops_when_rounds_remain() {
        assert_eq!(
            next_state(NodeState::Refine, 1, 2, false),
            NodeState::Reflect
        );
    }

    #[test]
    fn test_approval_phrase_case_insensitive() {
        assert!(is_approval("No Improvement Needed."));
        assert!(is_approval("verdict: NO IMPROVEMENT NEEDED at all"));
        assert!(!is_approval("needs improvement"));
        assert!(!is_approval(""));
    }

    #[test]
    fn test_context_block_joins_chunks() {
        let run = RunConfig {
            context: vec!["fn a() {}".to_string(), "fn b() {}".to_string()],
            conversation_history: String::new(),
        };
        assert_eq!(run.context_block(), "fn a() {}\nfn b() {}");
    }

    #[test]
    fn test_empty_context_block() {
        assert_eq!(RunConfig::default().context_block(), "");
    }
}
