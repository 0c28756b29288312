// All LLM prompt constants for the Explainer module.
// Per convention, each service that needs LLM calls keeps its prompts here.

use crate::explainer::service::ExplainRequest;

/// Generation knobs for explanation calls: low temperature for repeatable
/// output, capped token budget to bound latency and cost.
pub const EXPLAIN_TEMPERATURE: f32 = 0.3;
pub const EXPLAIN_MAX_TOKENS: u32 = 500;

/// At most this many leading characters of code context go into the prompt.
const PROMPT_CONTEXT_CHARS: usize = 500;

/// System prompt for error explanation — beginner-tutor persona, JSON-only output.
pub const EXPLAINER_SYSTEM: &str = r#"You are a helpful LaTeX tutor explaining errors to complete beginners.

Guidelines:
- Use simple, non-technical language a student would understand
- Reference specific parts of their code by quoting it
- Explain what they were trying to do
- Provide actionable fix instructions
- Keep explanations under 3 sentences
- Be encouraging, not condescending

Respond ONLY with valid JSON in this exact format:
{
    "explanation": "plain English explanation of what went wrong",
    "severity": "error",
    "suggested_fix": {
        "description": "what to change",
        "diff": "- old line\n+ new line",
        "confidence": 0.95
    },
    "learning_tip": "brief educational note about this error type"
}"#;

/// User prompt template. Replace `{error_message}`, `{line_hint}`,
/// `{template_hint}`, and `{context}` before sending.
const EXPLAIN_PROMPT_TEMPLATE: &str = r#"LaTeX compile error:

Error message: {error_message}{line_hint}{template_hint}

Code context:
```latex
{context}
```

Explain this error to a complete beginner and suggest how to fix it."#;

/// Builds the user prompt for an explanation request.
/// At most the first 500 characters of context are included.
pub fn build_explain_prompt(request: &ExplainRequest) -> String {
    let line_hint = request
        .error_line
        .map(|line| format!("\nError on line {line}."))
        .unwrap_or_default();

    let template_hint = request
        .template_type
        .as_deref()
        .map(|t| format!("\nThis is a {t} resume template."))
        .unwrap_or_default();

    let context = if request.context.is_empty() {
        "No context available".to_string()
    } else {
        request.context.chars().take(PROMPT_CONTEXT_CHARS).collect()
    };

    EXPLAIN_PROMPT_TEMPLATE
        .replace("{error_message}", &request.error_message)
        .replace("{line_hint}", &line_hint)
        .replace("{template_hint}", &template_hint)
        .replace("{context}", &context)
}
