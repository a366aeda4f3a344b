//! LLM-backed implementation of the Extractor port.
//!
//! Binds one tool per target entity kind and turns every tool call in the
//! model's answer into a proposal.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::extraction::{Document, ExtractionProposal};
use crate::domain::foundation::UserId;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, ExtractionRequest, Extractor, ExtractorError,
    RequestMetadata, ToolChoice,
};

use super::tooling::{entity_tool, proposal_from_tool_call, provider_messages};

pub struct LlmExtractor {
    provider: Arc<dyn AIProvider>,
    user_id: UserId,
    temperature: Option<f32>,
}

impl LlmExtractor {
    pub fn new(provider: Arc<dyn AIProvider>, user_id: UserId) -> Self {
        Self {
            provider,
            user_id,
            temperature: Some(0.0),
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    fn system_prompt(instruction: &str, existing: &[Document]) -> String {
        if existing.is_empty() {
            return format!("{}\n\nExisting documents: none", instruction);
        }
        let listed: Vec<String> = existing
            .iter()
            .map(|doc| format!("- id: {} ({}): {}", doc.id, doc.kind, doc.payload))
            .collect();
        format!("{}\n\nExisting documents:\n{}", instruction, listed.join("\n"))
    }
}

fn call_failed(err: AIError) -> ExtractorError {
    match err {
        AIError::Parse(message) => ExtractorError::MalformedOutput(message),
        other => ExtractorError::CallFailed(other.to_string()),
    }
}

#[async_trait]
impl Extractor for LlmExtractor {
    async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<Vec<ExtractionProposal>, ExtractorError> {
        let metadata = RequestMetadata::new(self.user_id.clone(), Uuid::new_v4().to_string());
        let trace_id = metadata.trace_id.clone();

        let mut completion = CompletionRequest::new(metadata)
            .with_system_prompt(Self::system_prompt(&request.instruction, &request.existing))
            .with_messages(provider_messages(&request.messages))
            .with_tool_choice(ToolChoice::Auto)
            .with_parallel_tool_calls(request.allow_parallel);
        for kind in &request.targets {
            completion = completion.with_tool(entity_tool(*kind));
        }
        if let Some(t) = self.temperature {
            completion = completion.with_temperature(t);
        }

        tracing::debug!(
            trace_id = %trace_id,
            model = self.provider.model(),
            targets = ?request.targets,
            existing = request.existing.len(),
            "Requesting extraction"
        );

        let response = self.provider.complete(completion).await.map_err(call_failed)?;

        let proposals = response
            .tool_calls
            .iter()
            .map(|call| {
                let proposal = proposal_from_tool_call(call)
                    .map_err(|e| ExtractorError::MalformedOutput(e.to_string()))?;
                if !request.targets.contains(&proposal.kind) {
                    return Err(ExtractorError::MalformedOutput(format!(
                        "tool {} was not offered for this extraction",
                        call.name
                    )));
                }
                Ok(proposal)
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !request.allow_parallel && proposals.len() > 1 {
            return Err(ExtractorError::MalformedOutput(format!(
                "{} proposals returned where one was allowed",
                proposals.len()
            )));
        }

        tracing::debug!(trace_id = %trace_id, proposals = proposals.len(), "Extraction finished");
        Ok(proposals)
    }
}
