use serde::{Deserialize, Serialize};

use crate::types::LearningStyle;

const OPTION_IDS: [&str; 3] = ["a", "b", "c"];

/// What a session asks the question bank for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub subject: String,
    pub skill: String,
    pub style: LearningStyle,
    pub difficulty: u8,
}

impl SessionRequest {
    pub fn new(
        subject: impl Into<String>,
        skill: impl Into<String>,
        style: LearningStyle,
        difficulty: u8,
    ) -> Self {
        Self {
            subject: subject.into(),
            skill: skill.into(),
            style,
            difficulty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub id: String,
    pub content: String,
    #[serde(skip_serializing, default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub style: LearningStyle,
    pub difficulty: u8,
    pub content: String,
    /// Content-type tag reported with the answer, e.g. `visual-diagrams`.
    pub content_type: String,
    pub interaction_type: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn option(&self, option_id: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.id == option_id)
    }
}

pub trait QuestionBank {
    fn generate(&self, request: &SessionRequest, count: usize) -> Vec<Question>;
}

pub fn style_components(style: LearningStyle) -> &'static [&'static str] {
    match style {
        LearningStyle::Visual => &["diagrams", "charts", "images"],
        LearningStyle::Auditory => &["audio-clips", "verbal-descriptions", "discussions"],
        LearningStyle::Kinesthetic => &[
            "interactive-simulations",
            "hands-on-activities",
            "drag-drop",
        ],
    }
}

pub fn interaction_type(style: LearningStyle) -> &'static str {
    match style {
        LearningStyle::Visual => "visual-spatial",
        LearningStyle::Auditory => "listening-speaking",
        LearningStyle::Kinesthetic => "learning-by-doing",
    }
}

/// Built-in bank producing placeholder questions. Question `i` is answered
/// correctly by option `i mod 3`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateQuestionBank;

impl QuestionBank for TemplateQuestionBank {
    fn generate(&self, request: &SessionRequest, count: usize) -> Vec<Question> {
        let components = style_components(request.style);

        (0..count)
            .map(|index| {
                let options = OPTION_IDS
                    .iter()
                    .enumerate()
                    .map(|(option_index, id)| AnswerOption {
                        id: (*id).to_string(),
                        content: format!("Option {}", id.to_uppercase()),
                        is_correct: index % OPTION_IDS.len() == option_index,
                    })
                    .collect();

                Question {
                    id: format!("q-{index}"),
                    style: request.style,
                    difficulty: request.difficulty,
                    content: format!(
                        "Sample {} question for {} - {} (Difficulty: {})",
                        request.style, request.subject, request.skill, request.difficulty
                    ),
                    content_type: format!(
                        "{}-{}",
                        request.style,
                        components[index % components.len()]
                    ),
                    interaction_type: interaction_type(request.style).to_string(),
                    options,
                }
            })
            .collect()
    }
}
