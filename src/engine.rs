use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::analysis::{recommend_content, ContentRecommendation};
use crate::assessment::{
    AssessmentError, AssessmentSession, QuestionBank, SessionRequest, SessionSummary,
    TemplateQuestionBank,
};
use crate::config::{ConfigError, EngineConfig};
use crate::controller::{AdaptationController, AdaptationEvent};
use crate::difficulty::DifficultyAdjuster;
use crate::profile::LearnerProfile;
use crate::types::{LearningStyle, PerformanceObservation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHandle(Uuid);

impl SessionHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionHandle),
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub correct: bool,
    pub streak: u32,
    pub completed: bool,
    /// Style switches caused by this answer, oldest first. Only the answer
    /// that completes a session can cause any.
    pub style_changes: Vec<AdaptationEvent>,
}

/// Everything the UI layer talks to for one learner.
#[derive(Debug)]
pub struct LearnerEngine<B: QuestionBank = TemplateQuestionBank> {
    config: EngineConfig,
    adjuster: DifficultyAdjuster,
    bank: B,
    controller: AdaptationController,
    profile: LearnerProfile,
    sessions: HashMap<SessionHandle, AssessmentSession>,
    by_request: HashMap<SessionRequest, SessionHandle>,
}

impl LearnerEngine<TemplateQuestionBank> {
    pub fn new(config: EngineConfig, initial_style: LearningStyle) -> Result<Self, EngineError> {
        Self::with_bank(config, initial_style, TemplateQuestionBank)
    }
}

impl<B: QuestionBank> LearnerEngine<B> {
    pub fn with_bank(
        config: EngineConfig,
        initial_style: LearningStyle,
        bank: B,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        Ok(Self {
            adjuster: config.difficulty_adjuster(),
            controller: AdaptationController::from_config(initial_style, &config),
            profile: LearnerProfile::new(initial_style),
            config,
            bank,
            sessions: HashMap::new(),
            by_request: HashMap::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn controller(&self) -> &AdaptationController {
        &self.controller
    }

    pub fn profile(&self) -> &LearnerProfile {
        &self.profile
    }

    pub fn current_style(&self) -> LearningStyle {
        self.controller.current_style()
    }

    pub fn session(&self, handle: SessionHandle) -> Option<&AssessmentSession> {
        self.sessions.get(&handle)
    }

    /// Starting the same (subject, skill, style, difficulty) again replaces the
    /// earlier session and invalidates its handle.
    pub fn start_session(
        &mut self,
        subject: &str,
        skill: &str,
        style: LearningStyle,
        difficulty: u8,
    ) -> Result<SessionHandle, EngineError> {
        let request = SessionRequest::new(subject, skill, style, difficulty);

        let mut session = AssessmentSession::new(self.adjuster, self.config.questions_per_session);
        session.start(&self.bank, request.clone())?;
        self.profile.skill_level(subject, skill);

        if let Some(previous) = self.by_request.remove(&request) {
            self.sessions.remove(&previous);
            tracing::debug!(%previous, "replaced session for the same request");
        }

        let handle = SessionHandle::new();
        self.sessions.insert(handle, session);
        self.by_request.insert(request, handle);
        Ok(handle)
    }

    /// Starts a session in the learner's current style at the skill's stored
    /// level.
    pub fn start_adaptive_session(
        &mut self,
        subject: &str,
        skill: &str,
    ) -> Result<SessionHandle, EngineError> {
        let difficulty = self.profile.skill_level(subject, skill);
        let style = self.current_style();
        self.start_session(subject, skill, style, difficulty)
    }

    pub fn submit_answer(
        &mut self,
        handle: SessionHandle,
        question_id: &str,
        option_id: &str,
    ) -> Result<AnswerOutcome, EngineError> {
        let session = self
            .sessions
            .get_mut(&handle)
            .ok_or(EngineError::SessionNotFound(handle))?;
        let feedback = session.answer(question_id, option_id)?;

        let mut style_changes = Vec::new();
        if let Some(completion) = feedback.completion {
            for observation in completion.observations {
                style_changes.extend(self.controller.on_observation(observation));
            }
            style_changes.extend(self.controller.on_session_end(&completion.summary));
            self.profile.apply_summary(&completion.summary);
            self.profile.learning_style = self.controller.current_style();
        }

        Ok(AnswerOutcome {
            correct: feedback.correct,
            streak: feedback.streak,
            completed: feedback.completed,
            style_changes,
        })
    }

    pub fn request_hint(
        &mut self,
        handle: SessionHandle,
        question_id: &str,
    ) -> Result<&'static str, EngineError> {
        let session = self
            .sessions
            .get_mut(&handle)
            .ok_or(EngineError::SessionNotFound(handle))?;
        Ok(session.request_hint(question_id)?)
    }

    /// `Ok(None)` while the session is still running.
    pub fn session_summary(
        &self,
        handle: SessionHandle,
    ) -> Result<Option<SessionSummary>, EngineError> {
        let session = self
            .sessions
            .get(&handle)
            .ok_or(EngineError::SessionNotFound(handle))?;
        Ok(session.summary().cloned())
    }

    /// Feeds an observation produced outside an assessment session.
    pub fn record_observation(&mut self, observation: PerformanceObservation) -> Option<AdaptationEvent> {
        let change = self.controller.on_observation(observation);
        self.profile.learning_style = self.controller.current_style();
        change
    }

    pub fn select_style(&mut self, style: LearningStyle) -> Option<AdaptationEvent> {
        let change = self.controller.select_style(style);
        self.profile.learning_style = self.controller.current_style();
        change
    }

    pub fn content_recommendations(&self) -> ContentRecommendation {
        recommend_content(
            &self.controller.style_effectiveness(),
            self.config.style_effectiveness_threshold,
        )
    }

    pub fn update_progress(&mut self, subject: &str, skill: &str, completion: f64) {
        self.profile.update_progress(subject, skill, completion);
    }

    pub fn adjust_skill_by_accuracy(&mut self, subject: &str, skill: &str, accuracy: f64) -> u8 {
        self.profile
            .adjust_by_accuracy(subject, skill, accuracy, &self.adjuster)
    }
}
