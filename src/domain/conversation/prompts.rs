//! Prompt templates for the interview.
//!
//! Templates use `{name}` placeholders. Unknown placeholders are left as
//! they are, so a custom template may omit any of them.

use serde::{Deserialize, Serialize};

/// The three overridable prompt texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplates {
    /// System prompt for question generation.
    ///
    /// Placeholders: `{schema}`, `{case_data}`, `{progress}`,
    /// `{disclaimer}`, `{time}`.
    pub case_manager: String,
    /// Instruction given to the extraction capability. Placeholder: `{time}`.
    pub extraction_instruction: String,
    /// Consent and privacy notice opening the interview.
    pub disclaimer: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            case_manager: CASE_MANAGER_PROMPT.to_string(),
            extraction_instruction: EXTRACTION_INSTRUCTION.to_string(),
            disclaimer: DISCLAIMER.to_string(),
        }
    }
}

/// Values substituted into the case manager prompt.
#[derive(Debug, Clone, Copy)]
pub struct QuestionPromptContext<'a> {
    pub schema: &'a str,
    pub case_data: &'a str,
    pub progress: &'a str,
    pub disclaimer: &'a str,
    pub time: &'a str,
}

impl PromptTemplates {
    pub fn render_case_manager(&self, ctx: QuestionPromptContext<'_>) -> String {
        render(
            &self.case_manager,
            &[
                ("schema", ctx.schema),
                ("case_data", ctx.case_data),
                ("progress", ctx.progress),
                ("disclaimer", ctx.disclaimer),
                ("time", ctx.time),
            ],
        )
    }

    pub fn render_extraction_instruction(&self, time: &str) -> String {
        render(&self.extraction_instruction, &[("time", time)])
    }
}

/// Replaces every `{key}` with its value in one pass over the template.
///
/// Substituted text is never scanned again, so client answers quoted in
/// `{case_data}` cannot pull in other placeholders.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let key = tail[1..].find('}').map(|close| &tail[1..close + 1]);

        match key.and_then(|k| values.iter().find(|(name, _)| *name == k).map(|v| (k, v.1))) {
            Some((k, value)) => {
                out.push_str(value);
                rest = &tail[k.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// Defaults
// ============================================================================

const DISCLAIMER: &str = r#"Welcome. I will ask you a series of questions about your situation so that your case can be reviewed.

A few things to know before we start:
- You can stop at any time by typing "exit". What you have told me so far is kept, and you can continue later.
- Your answers are stored securely and used only to handle your case.
- Nothing you share is passed to third parties without your consent, unless the law requires it.

If you are happy to continue on these terms, reply "yes". To stop now, reply "exit"."#;

const CASE_MANAGER_PROMPT: &str = r#"You are conducting the intake interview for a personal injury law practice. The person you are talking to may have been through a painful or frightening event: be patient and kind, and stay focused on collecting their case details.

Ask one question at a time. Pick the next question from the information that is still missing, and phrase it naturally given what the person has already said. If they ask you something, answer briefly and return to the interview. Once nothing important is missing, ask whether there is anything else they want to add; if not, thank them and close the interview.

Information the case file should contain:
{schema}

What has been recorded so far:
{case_data}

Progress: {progress}

Open the interview with this notice, word for word:
{disclaimer}

Current time: {time}"#;

const EXTRACTION_INSTRUCTION: &str = r#"Read the conversation and record every fact the client has stated about themselves or their case, using the tools provided.

When a fact belongs in a document listed under existing documents, pass that document's id as existing_id and send the complete updated record. Otherwise leave existing_id empty to create a new document. Several tools may be called at once. Do not invent facts the client did not state.

Current time: {time}"#;
