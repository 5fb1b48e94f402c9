use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    #[default]
    Visual,
    Auditory,
    Kinesthetic,
}

impl LearningStyle {
    /// Declared order; ties between styles are always broken in this order.
    pub const ALL: [LearningStyle; 3] = [Self::Visual, Self::Auditory, Self::Kinesthetic];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Auditory => "auditory",
            Self::Kinesthetic => "kinesthetic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "visual" => Some(Self::Visual),
            "auditory" => Some(Self::Auditory),
            "kinesthetic" => Some(Self::Kinesthetic),
            _ => None,
        }
    }

    /// Attributes a content-type tag to a style by substring match.
    /// The first style in declared order whose name occurs in the tag wins.
    pub fn attribute(content_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|style| content_type.contains(style.as_str()))
    }
}

impl std::fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObservationError {
    #[error("time spent must be a finite non-negative number, got {0}")]
    InvalidTimeSpent(f64),
    #[error("engagement metric must lie in [0, 1], got {0}")]
    InvalidEngagement(f64),
}

/// One answered question as seen by the adaptation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawObservation")]
pub struct PerformanceObservation {
    content_type: String,
    correct: bool,
    time_spent: f64,
    engagement_metric: f64,
}

impl PerformanceObservation {
    pub fn new(
        content_type: impl Into<String>,
        correct: bool,
        time_spent: f64,
        engagement_metric: f64,
    ) -> Result<Self, ObservationError> {
        if !time_spent.is_finite() || time_spent < 0.0 {
            return Err(ObservationError::InvalidTimeSpent(time_spent));
        }
        if !(0.0..=1.0).contains(&engagement_metric) {
            return Err(ObservationError::InvalidEngagement(engagement_metric));
        }

        Ok(Self {
            content_type: content_type.into(),
            correct,
            time_spent,
            engagement_metric,
        })
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn correct(&self) -> bool {
        self.correct
    }

    pub fn time_spent(&self) -> f64 {
        self.time_spent
    }

    pub fn engagement_metric(&self) -> f64 {
        self.engagement_metric
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawObservation {
    content_type: String,
    correct: bool,
    time_spent: f64,
    engagement_metric: f64,
}

impl TryFrom<RawObservation> for PerformanceObservation {
    type Error = ObservationError;

    fn try_from(raw: RawObservation) -> Result<Self, Self::Error> {
        Self::new(
            raw.content_type,
            raw.correct,
            raw.time_spent,
            raw.engagement_metric,
        )
    }
}

/// Aggregate effectiveness per learning style. Styles without evidence score 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleEffectivenessMap {
    pub visual: f64,
    pub auditory: f64,
    pub kinesthetic: f64,
}

impl StyleEffectivenessMap {
    pub fn new(visual: f64, auditory: f64, kinesthetic: f64) -> Self {
        Self {
            visual,
            auditory,
            kinesthetic,
        }
    }

    pub fn get(&self, style: LearningStyle) -> f64 {
        match style {
            LearningStyle::Visual => self.visual,
            LearningStyle::Auditory => self.auditory,
            LearningStyle::Kinesthetic => self.kinesthetic,
        }
    }

    pub fn add(&mut self, style: LearningStyle, value: f64) {
        match style {
            LearningStyle::Visual => self.visual += value,
            LearningStyle::Auditory => self.auditory += value,
            LearningStyle::Kinesthetic => self.kinesthetic += value,
        }
    }

    /// Scores in declared style order.
    pub fn iter(&self) -> impl Iterator<Item = (LearningStyle, f64)> + '_ {
        LearningStyle::ALL
            .into_iter()
            .map(move |style| (style, self.get(style)))
    }
}
