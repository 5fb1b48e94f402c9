pub mod hints;
pub mod questions;
pub mod session;

pub use hints::hint_for_style;
pub use questions::{Question, QuestionBank, SessionRequest, TemplateQuestionBank};
pub use session::{
    AnswerFeedback, AssessmentError, AssessmentSession, SessionCompletion, SessionStatus,
    SessionSummary, StyleEffectivenessSnapshot, StyleRecommendation,
};
