// Prompt composition for the query graph
//
// Three distinct role framings — answer author, reviewer, editor — kept
// textually separate so each provider call has one narrow objective.
// All functions are pure; empty optional variables render as empty text.

use crate::graph::Trace;
use crate::providers::{ChatMessage, ProviderRequest};

/// Upper bound on the code excerpt interpolated into the summary prompt.
pub const MAX_SUMMARY_CODE_CHARS: usize = 10_000;

/// Map the trace to provider wire messages, in order.
fn trace_messages(trace: &Trace) -> Vec<ChatMessage> {
    trace
        .messages()
        .iter()
        .map(|m| ChatMessage {
            role: m.role.wire_role().to_string(),
            content: m.content.clone(),
        })
        .collect()
}

/// Build the Generate instruction: answer the question from retrieved
/// context, staying coherent with prior conversation history.
pub fn compose_generate(
    question: &str,
    context_block: &str,
    conversation_history: &str,
    trace: &Trace,
) -> ProviderRequest {
    let system = format!(
        "You are an AI code assistant who answers questions about the codebase. Your \
         target audience is a technical intern seeking to understand the codebase.\n\
         Provide detailed, step-by-step explanations, including code snippets where \
         applicable. Ensure responses are structured, clear, and easy to follow.\n\n\
         First, refer to conversation history to maintain continuity.\n\
         Then, use the provided context for additional relevant details.\n\n\
         START CONVERSATION HISTORY\n\
         {conversation_history}\n\
         END OF CONVERSATION HISTORY\n\n\
         START CONTEXT BLOCK\n\
         {context_block}\n\
         END OF CONTEXT BLOCK\n\n\
         Use conversation history to build upon prior responses and maintain coherence.\n\
         Use context to enhance your answer with relevant technical details."
    );

    let mut messages = vec![ChatMessage::user(format!(
        "START QUESTION\n{question}\nEND OF QUESTION"
    ))];
    messages.extend(trace_messages(trace));

    ProviderRequest::new(messages).with_system(system)
}

/// Build the Reflect instruction: a senior-engineer critique of the latest
/// candidate answer (the trace tail) against fixed quality criteria.
pub fn compose_reflect(
    question: &str,
    conversation_history: &str,
    trace: &Trace,
) -> ProviderRequest {
    let candidate = trace.last().map(|m| m.content.as_str()).unwrap_or("");

    let system = format!(
        "You are a senior software engineer reviewing an AI-generated response to a \
         technical question about a codebase. Your goal is to provide a detailed \
         critique, ensuring the response is accurate, complete, clear, actionable, \
         and consistent with prior discussions.\n\n\
         Evaluation criteria:\n\
         - Accuracy: does it correctly answer the question?\n\
         - Completeness: does it provide all necessary details, including explanations \
         and relevant code snippets?\n\
         - Clarity: is it easy to understand for a technical intern?\n\
         - Actionability: can the intern use this response effectively?\n\
         - Consistency: does it align with prior discussion in the conversation history?\n\n\
         Instructions:\n\
         - First, refer to conversation history to ensure continuity.\n\
         - Then, compare the AI-generated response with the original question.\n\
         - Identify errors, missing details, or inconsistencies.\n\
         - Suggest clear, actionable improvements.\n\
         - If the response needs no changes, say so with the exact phrase \
         \"No improvement needed\".\n\n\
         START CONVERSATION HISTORY\n\
         {conversation_history}\n\
         END OF CONVERSATION HISTORY\n\n\
         AI response under review:\n\
         {candidate}\n\n\
         Original question:\n\
         {question}"
    );

    ProviderRequest::new(trace_messages(trace)).with_system(system)
}

/// Build the Refine instruction: revise `original_response` per `critique`,
/// emitting only the fully revised response.
pub fn compose_refine(
    conversation_history: &str,
    original_response: &str,
    critique: &str,
    trace: &Trace,
) -> ProviderRequest {
    let system = format!(
        "You are an AI editor refining a response based on a senior engineer's \
         critique. Your task is to improve the response's accuracy, completeness, \
         clarity, and actionability while ensuring consistency with past interactions.\n\n\
         First, review conversation history to maintain continuity.\n\
         Then, use the critique to refine the response effectively.\n\n\
         Important: only provide the fully revised response without additional \
         commentary.\n\n\
         START CONVERSATION HISTORY\n\
         {conversation_history}\n\
         END OF CONVERSATION HISTORY\n\n\
         Original response:\n\
         {original_response}\n\n\
         Critique:\n\
         {critique}"
    );

    ProviderRequest::new(trace_messages(trace)).with_system(system)
}

/// Build the single-shot file-summary instruction used by the summary
/// endpoint. The code excerpt is truncated to `MAX_SUMMARY_CODE_CHARS`.
pub fn compose_summary(file_name: &str, code: &str) -> ProviderRequest {
    let excerpt: String = code.chars().take(MAX_SUMMARY_CODE_CHARS).collect();

    let system = "You are an intelligent senior software engineer specializing in \
                  onboarding junior software engineers onto a project. Your task is to \
                  summarize the purpose of a given code file to help a junior developer \
                  understand it.\n\
                  - Keep the summary concise (max 100 words).\n\
                  - Focus on the main functionality and purpose of the code.\n\
                  - Do not explain specific syntax unless necessary.\n\
                  - Provide a structured response without unnecessary explanations."
        .to_string();

    let user = format!(
        "You are onboarding a junior software engineer and explaining to them the \
         purpose of the \"{file_name}\" file.\n\
         Here is the code:\n\
         -----------\n\
         {excerpt}\n\
         -----------\n\
         Generate a summary of no more than 100 words."
    );

    ProviderRequest::new(vec![ChatMessage::user(user)]).with_system(system)
}
