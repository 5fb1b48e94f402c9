use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::hints::hint_for_style;
use super::questions::{Question, QuestionBank, SessionRequest};
use crate::difficulty::{DifficultyAdjuster, PerformanceLevel};
use crate::types::{LearningStyle, ObservationError, PerformanceObservation};

pub const DEFAULT_QUESTIONS_PER_SESSION: usize = 5;

/// Below this accuracy the session suggests trying another style.
const STYLE_EFFECTIVE_ACCURACY: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    InProgress,
    Completed,
}

impl SessionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Idle => "IDLE",
            SessionStatus::InProgress => "IN_PROGRESS",
            SessionStatus::Completed => "COMPLETED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    #[error("session is {}, expected {}", .actual.as_str(), .expected.as_str())]
    InvalidState {
        expected: SessionStatus,
        actual: SessionStatus,
    },
    #[error("question {got} is not the current question {expected}")]
    QuestionMismatch { expected: String, got: String },
    #[error("question {question_id} has no option {option_id}")]
    UnknownOption {
        question_id: String,
        option_id: String,
    },
    #[error("difficulty {difficulty} outside [1, {upper_bound}]")]
    DifficultyOutOfRange { difficulty: u8, upper_bound: u8 },
    #[error("question bank returned no questions")]
    EmptyQuestionSet,
    #[error(transparent)]
    Observation(#[from] ObservationError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: String,
    pub content_type: String,
    pub correct: bool,
    pub hints_used: u32,
    pub time_spent: f64,
}

impl AnswerRecord {
    fn engagement(&self) -> f64 {
        1.0 / (1.0 + f64::from(self.hints_used))
    }

    fn to_observation(&self) -> Result<PerformanceObservation, ObservationError> {
        PerformanceObservation::new(
            self.content_type.clone(),
            self.correct,
            self.time_spent,
            self.engagement(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleRecommendation {
    StyleEffective,
    ConsiderAlternativeStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleEffectivenessSnapshot {
    pub style: LearningStyle,
    pub rate: f64,
    pub recommendation: StyleRecommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub subject: String,
    pub skill: String,
    pub starting_difficulty: u8,
    pub total_questions: usize,
    pub correct_count: usize,
    pub accuracy: f64,
    pub average_hints: f64,
    pub performance_level: PerformanceLevel,
    pub recommended_difficulty: u8,
    pub best_streak: u32,
    pub style_effectiveness: StyleEffectivenessSnapshot,
}

/// Emitted once, by the answer that completes the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCompletion {
    pub summary: SessionSummary,
    pub observations: Vec<PerformanceObservation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub streak: u32,
    pub completed: bool,
    pub completion: Option<SessionCompletion>,
}

/// One assessment run: `Idle -> InProgress -> Completed`.
///
/// Calling `start` again from any state discards the previous run.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    status: SessionStatus,
    adjuster: DifficultyAdjuster,
    question_count: usize,
    request: Option<SessionRequest>,
    questions: Vec<Question>,
    hint_counts: Vec<u32>,
    current: usize,
    streak: u32,
    best_streak: u32,
    answers: Vec<AnswerRecord>,
    observations: Vec<PerformanceObservation>,
    presented_at: Option<DateTime<Utc>>,
    summary: Option<SessionSummary>,
}

impl AssessmentSession {
    pub fn new(adjuster: DifficultyAdjuster, question_count: usize) -> Self {
        Self {
            status: SessionStatus::Idle,
            adjuster,
            question_count,
            request: None,
            questions: Vec::new(),
            hint_counts: Vec::new(),
            current: 0,
            streak: 0,
            best_streak: 0,
            answers: Vec::new(),
            observations: Vec::new(),
            presented_at: None,
            summary: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn request(&self) -> Option<&SessionRequest> {
        self.request.as_ref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.status {
            SessionStatus::InProgress => self.questions.get(self.current),
            _ => None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn hints_used(&self, question_id: &str) -> Option<u32> {
        self.questions
            .iter()
            .position(|q| q.id == question_id)
            .map(|index| self.hint_counts[index])
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// `None` until the session is completed; afterwards always the same value.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn start(
        &mut self,
        bank: &dyn QuestionBank,
        request: SessionRequest,
    ) -> Result<(), AssessmentError> {
        self.start_at(bank, request, Utc::now())
    }

    pub fn start_at(
        &mut self,
        bank: &dyn QuestionBank,
        request: SessionRequest,
        now: DateTime<Utc>,
    ) -> Result<(), AssessmentError> {
        if !self.adjuster.contains(request.difficulty) {
            return Err(AssessmentError::DifficultyOutOfRange {
                difficulty: request.difficulty,
                upper_bound: self.adjuster.upper_bound(),
            });
        }

        let questions = bank.generate(&request, self.question_count);
        if questions.is_empty() {
            return Err(AssessmentError::EmptyQuestionSet);
        }

        tracing::debug!(
            subject = %request.subject,
            skill = %request.skill,
            style = %request.style,
            difficulty = request.difficulty,
            questions = questions.len(),
            "assessment session started"
        );

        self.hint_counts = vec![0; questions.len()];
        self.questions = questions;
        self.request = Some(request);
        self.current = 0;
        self.streak = 0;
        self.best_streak = 0;
        self.answers.clear();
        self.observations.clear();
        self.presented_at = Some(now);
        self.summary = None;
        self.status = SessionStatus::InProgress;
        Ok(())
    }

    pub fn request_hint(&mut self, question_id: &str) -> Result<&'static str, AssessmentError> {
        self.ensure_current(question_id)?;
        self.hint_counts[self.current] += 1;

        let style = self.questions[self.current].style;
        tracing::debug!(
            question_id,
            hints = self.hint_counts[self.current],
            "hint requested"
        );
        Ok(hint_for_style(style.as_str()))
    }

    pub fn answer(
        &mut self,
        question_id: &str,
        option_id: &str,
    ) -> Result<AnswerFeedback, AssessmentError> {
        self.answer_at(question_id, option_id, Utc::now())
    }

    pub fn answer_at(
        &mut self,
        question_id: &str,
        option_id: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerFeedback, AssessmentError> {
        self.ensure_current(question_id)?;

        let question = &self.questions[self.current];
        let option = question
            .option(option_id)
            .ok_or_else(|| AssessmentError::UnknownOption {
                question_id: question_id.to_string(),
                option_id: option_id.to_string(),
            })?;
        let correct = option.is_correct;

        let time_spent = self
            .presented_at
            .map(|presented| (now - presented).num_milliseconds().max(0) as f64 / 1000.0)
            .unwrap_or(0.0);

        let record = AnswerRecord {
            question_id: question.id.clone(),
            content_type: question.content_type.clone(),
            correct,
            hints_used: self.hint_counts[self.current],
            time_spent,
        };
        // validated before any bookkeeping changes
        let observation = record.to_observation()?;
        self.answers.push(record);
        self.observations.push(observation);

        if correct {
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }

        self.current += 1;
        self.presented_at = Some(now);

        if self.current < self.questions.len() {
            return Ok(AnswerFeedback {
                correct,
                streak: self.streak,
                completed: false,
                completion: None,
            });
        }

        let completion = self.complete();
        Ok(AnswerFeedback {
            correct,
            streak: self.streak,
            completed: true,
            completion: Some(completion),
        })
    }

    fn ensure_current(&self, question_id: &str) -> Result<(), AssessmentError> {
        if self.status != SessionStatus::InProgress {
            tracing::warn!(status = self.status.as_str(), question_id, "call on inactive session");
            return Err(AssessmentError::InvalidState {
                expected: SessionStatus::InProgress,
                actual: self.status,
            });
        }

        let expected = &self.questions[self.current].id;
        if expected != question_id {
            tracing::warn!(%expected, got = question_id, "question out of order");
            return Err(AssessmentError::QuestionMismatch {
                expected: expected.clone(),
                got: question_id.to_string(),
            });
        }
        Ok(())
    }

    fn complete(&mut self) -> SessionCompletion {
        let summary = self.build_summary();
        tracing::info!(
            subject = %summary.subject,
            skill = %summary.skill,
            accuracy = summary.accuracy,
            level = summary.performance_level.as_str(),
            difficulty = summary.starting_difficulty,
            recommended = summary.recommended_difficulty,
            "assessment session completed"
        );

        self.summary = Some(summary.clone());
        self.presented_at = None;
        self.status = SessionStatus::Completed;

        SessionCompletion {
            summary,
            observations: std::mem::take(&mut self.observations),
        }
    }

    fn build_summary(&self) -> SessionSummary {
        let (subject, skill, style, difficulty) = match &self.request {
            Some(r) => (r.subject.clone(), r.skill.clone(), r.style, r.difficulty),
            None => (String::new(), String::new(), LearningStyle::default(), 1),
        };

        // answers is non-empty: completion follows at least one answer
        let total = self.answers.len();
        let correct_count = self.answers.iter().filter(|a| a.correct).count();
        let hints: u32 = self.answers.iter().map(|a| a.hints_used).sum();
        let accuracy = correct_count as f64 / total as f64;
        let average_hints = f64::from(hints) / total as f64;

        let performance_level = PerformanceLevel::classify(accuracy, average_hints);
        let recommendation = if accuracy < STYLE_EFFECTIVE_ACCURACY {
            StyleRecommendation::ConsiderAlternativeStyle
        } else {
            StyleRecommendation::StyleEffective
        };

        SessionSummary {
            subject,
            skill,
            starting_difficulty: difficulty,
            total_questions: total,
            correct_count,
            accuracy,
            average_hints,
            performance_level,
            recommended_difficulty: self.adjuster.adjust(difficulty, performance_level),
            best_streak: self.best_streak,
            style_effectiveness: StyleEffectivenessSnapshot {
                style,
                rate: accuracy,
                recommendation,
            },
        }
    }
}
