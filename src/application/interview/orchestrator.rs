//! Interview orchestrator.
//!
//! Drives one turn: route the latest message, act on the chosen state,
//! route again, until the interview waits for the user or has ended.

use std::sync::Arc;

use crate::domain::conversation::{
    ConversationMessage, InterviewState, PromptTemplates, Router, SessionState,
};
use crate::domain::extraction::{MergeReport, Namespace, RecordSnapshot};
use crate::domain::foundation::Timestamp;
use crate::domain::record::{CaseRecord, EntityKind};
use crate::ports::{QuestionGenerator, QuestionRequest, RecordStore};

use super::{ExtractionMergeEngine, InterviewError};

/// Final message of a terminated interview.
pub const CLOSING_MESSAGE: &str = "Thank you for your time. The interview is now complete.";

/// Limits applied to every turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnLimits {
    /// Route/act steps allowed before a turn is abandoned.
    pub max_steps_per_turn: usize,
    /// Extra attempts for writes that failed in the store.
    pub store_retry_attempts: u32,
}

impl Default for TurnLimits {
    fn default() -> Self {
        Self {
            max_steps_per_turn: 12,
            store_retry_attempts: 2,
        }
    }
}

/// What a turn produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnOutcome {
    /// Last assistant text appended during the turn.
    pub reply: Option<String>,
    /// True when the turn ended the interview.
    pub terminated: bool,
    /// One report per extraction step, in order.
    pub reports: Vec<MergeReport>,
    /// Route/act steps taken.
    pub steps: usize,
}

pub struct InterviewOrchestrator {
    store: Arc<dyn RecordStore>,
    engine: ExtractionMergeEngine,
    questions: Arc<dyn QuestionGenerator>,
    router: Router,
    templates: PromptTemplates,
    limits: TurnLimits,
}

impl InterviewOrchestrator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        engine: ExtractionMergeEngine,
        questions: Arc<dyn QuestionGenerator>,
    ) -> Self {
        Self {
            store,
            engine,
            questions,
            router: Router::default(),
            templates: PromptTemplates::default(),
            limits: TurnLimits::default(),
        }
    }

    pub fn with_router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    pub fn with_templates(mut self, templates: PromptTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_limits(mut self, limits: TurnLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Asks the opening question.
    ///
    /// On a session that already has messages this resumes the pending turn
    /// instead.
    pub async fn start(&self, session: &mut SessionState) -> Result<TurnOutcome, InterviewError> {
        if session.is_terminated() {
            return Err(InterviewError::SessionTerminated);
        }
        if !session.messages().is_empty() {
            return self.resume_turn(session).await;
        }
        self.open(session).await
    }

    /// Appends the user's message and runs the turn it starts.
    pub async fn handle_user_message(
        &self,
        session: &mut SessionState,
        text: impl Into<String>,
    ) -> Result<TurnOutcome, InterviewError> {
        if session.is_terminated() {
            return Err(InterviewError::SessionTerminated);
        }
        // A previous turn may have failed part-way.
        session.reset_to(InterviewState::AwaitingUser);
        session.append(ConversationMessage::human(text));
        self.drive(session).await
    }

    /// Re-runs the turn from the current end of the log.
    ///
    /// Used after a failed turn: nothing is appended, the last message is
    /// routed again.
    pub async fn resume_turn(&self, session: &mut SessionState) -> Result<TurnOutcome, InterviewError> {
        if session.is_terminated() {
            return Err(InterviewError::SessionTerminated);
        }
        match session.last_message() {
            None => return self.open(session).await,
            Some(ConversationMessage::AssistantText { .. }) => {
                session.reset_to(InterviewState::AwaitingUser);
                return Ok(TurnOutcome::default());
            }
            Some(ConversationMessage::Human { .. }) => {
                session.reset_to(InterviewState::AwaitingUser)
            }
            Some(_) => session.reset_to(InterviewState::NeedsRouteDecision),
        }
        tracing::info!(user_id = %session.user_id(), "Resuming interview turn");
        self.drive(session).await
    }

    async fn open(&self, session: &mut SessionState) -> Result<TurnOutcome, InterviewError> {
        tracing::info!(user_id = %session.user_id(), "Starting interview");
        let mut outcome = TurnOutcome::default();
        self.ask_next_question(session, &mut outcome).await?;
        outcome.steps = 1;
        Ok(outcome)
    }

    async fn drive(&self, session: &mut SessionState) -> Result<TurnOutcome, InterviewError> {
        let mut outcome = TurnOutcome::default();

        while outcome.steps < self.limits.max_steps_per_turn {
            outcome.steps += 1;
            let next = self.router.decide(session.last_message())?;
            session.transition(next)?;
            tracing::debug!(user_id = %session.user_id(), state = ?next, "Interview step");

            match next {
                InterviewState::AwaitingUser => return Ok(outcome),
                InterviewState::Terminated => {
                    session.append(ConversationMessage::assistant(CLOSING_MESSAGE));
                    outcome.reply = Some(CLOSING_MESSAGE.to_string());
                    outcome.terminated = true;
                    tracing::info!(user_id = %session.user_id(), "Interview terminated");
                    return Ok(outcome);
                }
                InterviewState::NeedsExtraction => {
                    self.extract(session, &EntityKind::ALL, &mut outcome).await?;
                }
                InterviewState::ExtractCase => {
                    self.extract(session, &[EntityKind::Case], &mut outcome).await?;
                }
                InterviewState::ExtractUser => {
                    self.extract(session, &[EntityKind::UserProfile], &mut outcome).await?;
                }
                InterviewState::AskNextQuestion => {
                    self.ask_next_question(session, &mut outcome).await?;
                }
                InterviewState::NeedsRouteDecision => continue,
            }
            session.transition(InterviewState::NeedsRouteDecision)?;
        }

        tracing::warn!(
            user_id = %session.user_id(),
            max_steps = self.limits.max_steps_per_turn,
            "Turn did not reach a boundary"
        );
        Err(InterviewError::TurnLimitExceeded {
            max_steps: self.limits.max_steps_per_turn,
        })
    }

    async fn extract(
        &self,
        session: &mut SessionState,
        targets: &[EntityKind],
        outcome: &mut TurnOutcome,
    ) -> Result<(), InterviewError> {
        let instruction = self
            .templates
            .render_extraction_instruction(&Timestamp::now().to_rfc3339());

        let mut report = self
            .engine
            .run(session.user_id(), session.extraction_window(), targets, &instruction)
            .await?;

        let mut attempts = 0;
        while report.is_partial_failure() && attempts < self.limits.store_retry_attempts {
            attempts += 1;
            tracing::debug!(attempt = attempts, failed = report.failures.len(), "Retrying store writes");
            let retry = self.engine.retry_failed(&report).await?;
            report.absorb_retry(retry);
        }

        if report.is_partial_failure() {
            tracing::error!(
                user_id = %session.user_id(),
                failed = ?report.failed_ids(),
                "Writes still failing after retries"
            );
            return Err(InterviewError::StoreUnavailable {
                message: format!("{} document write(s) failed", report.failures.len()),
                report,
            });
        }

        session.append(ConversationMessage::tool_result(confirmation(targets, &report)));
        outcome.reports.push(report);
        Ok(())
    }

    async fn ask_next_question(
        &self,
        session: &mut SessionState,
        outcome: &mut TurnOutcome,
    ) -> Result<(), InterviewError> {
        let now = Timestamp::now();
        let documents = self.store.get(&Namespace::case(session.user_id().clone())).await?;

        // Nothing is written here; extraction creates the first document.
        let snapshot = if documents.is_empty() {
            RecordSnapshot::fresh(CaseRecord::open(now))
        } else {
            RecordSnapshot::<CaseRecord>::from_documents(&documents).map_err(|e| {
                InterviewError::store(format!("stored case documents are unreadable: {}", e))
            })?
        };
        let progress = snapshot.progress();

        let request = QuestionRequest {
            schema: EntityKind::Case.schema(),
            snapshot: snapshot.record,
            progress,
            disclaimer: self.templates.disclaimer.clone(),
            timestamp: now,
            messages: session.messages().to_vec(),
        };

        let message = self.questions.next_question(request).await.map_err(|e| {
            tracing::warn!(user_id = %session.user_id(), error = %e, "Question generation failed");
            InterviewError::from(e)
        })?;

        if let ConversationMessage::AssistantText { text, .. } = &message {
            outcome.reply = Some(text.clone());
        }
        session.append(message);
        Ok(())
    }
}

fn confirmation(targets: &[EntityKind], report: &MergeReport) -> String {
    let scope = targets
        .iter()
        .map(|k| k.namespace_kind().as_str())
        .collect::<Vec<_>>()
        .join(" and ");
    if report.written() == 0 {
        return format!("No new {} data recorded.", scope.to_lowercase());
    }
    format!(
        "{} data recorded: {} updated, {} new.",
        scope,
        report.updated.len(),
        report.inserted.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryRecordStore;
    use crate::domain::extraction::ExtractionProposal;
    use crate::domain::foundation::UserId;
    use crate::ports::{ExtractionRequest, Extractor, ExtractorError, QuestionGeneratorError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct FixedExtractor(Vec<ExtractionProposal>);

    #[async_trait]
    impl Extractor for FixedExtractor {
        async fn extract(
            &self,
            _request: ExtractionRequest,
        ) -> Result<Vec<ExtractionProposal>, ExtractorError> {
            Ok(self.0.clone())
        }
    }

    /// Asks numbered questions and records what it was shown.
    #[derive(Default)]
    struct CountingQuestions {
        seen: Mutex<Vec<QuestionRequest>>,
    }

    #[async_trait]
    impl QuestionGenerator for CountingQuestions {
        async fn next_question(
            &self,
            request: QuestionRequest,
        ) -> Result<ConversationMessage, QuestionGeneratorError> {
            let mut seen = self.seen.lock().unwrap();
            seen.push(request);
            Ok(ConversationMessage::assistant(format!("Question {}", seen.len())))
        }
    }

    fn orchestrator(
        store: Arc<InMemoryRecordStore>,
        proposals: Vec<ExtractionProposal>,
        questions: Arc<CountingQuestions>,
    ) -> InterviewOrchestrator {
        let engine = ExtractionMergeEngine::new(store.clone(), Arc::new(FixedExtractor(proposals)));
        InterviewOrchestrator::new(store, engine, questions)
    }

    fn session() -> SessionState {
        SessionState::new(UserId::new("user-1").unwrap())
    }

    #[tokio::test]
    async fn start_asks_with_fresh_snapshot_and_writes_nothing() {
        let store = Arc::new(InMemoryRecordStore::new());
        let questions = Arc::new(CountingQuestions::default());
        let orchestrator = orchestrator(store.clone(), vec![], questions.clone());
        let mut session = session();

        let outcome = orchestrator.start(&mut session).await.unwrap();

        assert_eq!(outcome.reply.as_deref(), Some("Question 1"));
        assert_eq!(session.state(), InterviewState::AwaitingUser);
        assert_eq!(store.document_count(&Namespace::case(session.user_id().clone())).await, 0);
        let seen = questions.seen.lock().unwrap();
        assert_eq!(
            seen[0].snapshot.status.value().map(String::as_str),
            Some(crate::domain::record::INTAKE_IN_PROGRESS)
        );
        assert!(!seen[0].disclaimer.is_empty());
    }

    #[tokio::test]
    async fn user_message_extracts_then_asks() {
        let store = Arc::new(InMemoryRecordStore::new());
        let questions = Arc::new(CountingQuestions::default());
        let proposals = vec![ExtractionProposal::new(
            EntityKind::Case,
            json!({"personal_info": {"first_name": "Jane"}}),
        )];
        let orchestrator = orchestrator(store.clone(), proposals, questions);
        let mut session = session();

        let outcome = orchestrator
            .handle_user_message(&mut session, "I'm Jane")
            .await
            .unwrap();

        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.reports[0].inserted.len(), 1);
        assert_eq!(outcome.reply.as_deref(), Some("Question 1"));
        assert_eq!(outcome.steps, 3);
        assert_eq!(session.state(), InterviewState::AwaitingUser);
        // human, tool result, question
        assert_eq!(session.messages().len(), 3);
    }

    #[tokio::test]
    async fn termination_token_closes_the_interview() {
        let store = Arc::new(InMemoryRecordStore::new());
        let questions = Arc::new(CountingQuestions::default());
        let orchestrator = orchestrator(store, vec![], questions.clone());
        let mut session = session();

        let outcome = orchestrator
            .handle_user_message(&mut session, "  EXIT ")
            .await
            .unwrap();

        assert!(outcome.terminated);
        assert_eq!(outcome.reply.as_deref(), Some(CLOSING_MESSAGE));
        assert!(session.is_terminated());
        assert!(questions.seen.lock().unwrap().is_empty());

        let again = orchestrator.handle_user_message(&mut session, "hello").await;
        assert!(matches!(again, Err(InterviewError::SessionTerminated)));
    }

    #[tokio::test]
    async fn step_limit_stops_a_runaway_turn() {
        let store = Arc::new(InMemoryRecordStore::new());
        let questions = Arc::new(CountingQuestions::default());
        let orchestrator = orchestrator(store, vec![], questions).with_limits(TurnLimits {
            max_steps_per_turn: 2,
            store_retry_attempts: 0,
        });
        let mut session = session();

        let result = orchestrator.handle_user_message(&mut session, "Hello").await;

        assert!(matches!(
            result,
            Err(InterviewError::TurnLimitExceeded { max_steps: 2 })
        ));
    }

    #[test]
    fn confirmation_summarizes_the_report() {
        let report = MergeReport::default();
        assert_eq!(
            confirmation(&[EntityKind::Case], &report),
            "No new case data recorded."
        );
    }
}
