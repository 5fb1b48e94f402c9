use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assessment::SessionSummary;
use crate::difficulty::{DifficultyAdjuster, MIN_LEVEL};
use crate::types::LearningStyle;

pub fn skill_key(subject: &str, skill: &str) -> String {
    format!("{subject}-{skill}")
}

/// Learner state handed back by completed sessions. Held in memory only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    pub learning_style: LearningStyle,
    skill_levels: BTreeMap<String, u8>,
    progress: BTreeMap<String, f64>,
    sessions_completed: u32,
}

impl LearnerProfile {
    pub fn new(learning_style: LearningStyle) -> Self {
        Self {
            learning_style,
            ..Default::default()
        }
    }

    /// Current level for a skill; first reference creates it at level 1.
    pub fn skill_level(&mut self, subject: &str, skill: &str) -> u8 {
        *self
            .skill_levels
            .entry(skill_key(subject, skill))
            .or_insert(MIN_LEVEL)
    }

    pub fn known_skill_level(&self, subject: &str, skill: &str) -> Option<u8> {
        self.skill_levels.get(&skill_key(subject, skill)).copied()
    }

    pub fn skill_levels(&self) -> &BTreeMap<String, u8> {
        &self.skill_levels
    }

    pub fn progress(&self, subject: &str, skill: &str) -> Option<f64> {
        self.progress.get(&skill_key(subject, skill)).copied()
    }

    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    /// Records a completed session: the skill moves to the recommended level.
    pub fn apply_summary(&mut self, summary: &SessionSummary) {
        let key = skill_key(&summary.subject, &summary.skill);
        let previous = self.skill_levels.insert(key, summary.recommended_difficulty);
        self.sessions_completed += 1;

        tracing::debug!(
            subject = %summary.subject,
            skill = %summary.skill,
            previous = previous.unwrap_or(MIN_LEVEL),
            level = summary.recommended_difficulty,
            "skill level updated"
        );
    }

    /// Accuracy-only rule for results that did not come from an assessment.
    pub fn adjust_by_accuracy(
        &mut self,
        subject: &str,
        skill: &str,
        accuracy: f64,
        adjuster: &DifficultyAdjuster,
    ) -> u8 {
        let current = self.skill_level(subject, skill);
        let next = adjuster.adjust_by_accuracy(current, accuracy);
        self.skill_levels.insert(skill_key(subject, skill), next);
        next
    }

    /// Completion is stored as a fraction in `[0, 1]`.
    pub fn update_progress(&mut self, subject: &str, skill: &str, completion: f64) {
        let completion = if completion.is_finite() {
            completion.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.progress.insert(skill_key(subject, skill), completion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_created_lazily_at_level_one() {
        let mut profile = LearnerProfile::new(LearningStyle::Visual);
        assert_eq!(profile.known_skill_level("math", "geometry"), None);
        assert_eq!(profile.skill_level("math", "geometry"), 1);
        assert_eq!(profile.known_skill_level("math", "geometry"), Some(1));
        assert_eq!(profile.skill_levels().len(), 1);
    }

    #[test]
    fn test_adjust_by_accuracy_respects_bounds() {
        let adjuster = DifficultyAdjuster::new(5);
        let mut profile = LearnerProfile::default();
        assert_eq!(profile.adjust_by_accuracy("math", "division", 0.9, &adjuster), 2);
        assert_eq!(profile.adjust_by_accuracy("math", "division", 0.1, &adjuster), 1);
        assert_eq!(profile.adjust_by_accuracy("math", "division", 0.1, &adjuster), 1);
        for _ in 0..10 {
            profile.adjust_by_accuracy("math", "division", 1.0, &adjuster);
        }
        assert_eq!(profile.known_skill_level("math", "division"), Some(5));
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut profile = LearnerProfile::default();
        profile.update_progress("science", "biology", 1.7);
        assert_eq!(profile.progress("science", "biology"), Some(1.0));
        profile.update_progress("science", "biology", f64::NAN);
        assert_eq!(profile.progress("science", "biology"), Some(0.0));
        profile.update_progress("science", "biology", 0.35);
        assert_eq!(profile.progress("science", "biology"), Some(0.35));
    }
}
