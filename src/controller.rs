//! Per-learner style adaptation.
//!
//! After every observation the controller re-runs the analysis pipeline over
//! its history. Two triggers can switch the active style:
//!
//! - the selector prefers another style (`performance pattern adaptation`)
//! - the active style's own average effectiveness drops below the threshold
//!   (`low effectiveness detected`), which forces a move to the best other
//!   style even when that style is not the overall maximum
//!
//! At most one event is produced per evaluation; the low-effectiveness reason
//! wins when both triggers fire. A session end only re-evaluates when the
//! history grew since the last evaluation.
//!
//! Only the latest window of observations is retained, and the adaptation
//! log keeps the most recent [`ADAPTATION_LOG_LIMIT`] events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{EffectivenessAnalyzer, EffectivenessReport, StyleSelector};
use crate::assessment::{SessionSummary, StyleEffectivenessSnapshot};
use crate::config::EngineConfig;
use crate::types::{LearningStyle, PerformanceObservation, StyleEffectivenessMap};

pub const ADAPTATION_LOG_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdaptationReason {
    #[serde(rename = "performance pattern adaptation")]
    PerformancePattern,
    #[serde(rename = "low effectiveness detected")]
    LowEffectiveness,
    #[serde(rename = "learner selection")]
    LearnerSelection,
}

impl AdaptationReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            AdaptationReason::PerformancePattern => "performance pattern adaptation",
            AdaptationReason::LowEffectiveness => "low effectiveness detected",
            AdaptationReason::LearnerSelection => "learner selection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationEvent {
    pub timestamp: DateTime<Utc>,
    pub from_style: LearningStyle,
    pub to_style: LearningStyle,
    pub reason: AdaptationReason,
}

#[derive(Debug, Clone)]
pub struct AdaptationController {
    analyzer: EffectivenessAnalyzer,
    selector: StyleSelector,
    threshold: f64,
    current_style: LearningStyle,
    history: Vec<PerformanceObservation>,
    style_effectiveness: StyleEffectivenessMap,
    adaptations: Vec<AdaptationEvent>,
    last_session: Option<StyleEffectivenessSnapshot>,
    observed: u64,
    evaluated_at: u64,
}

impl AdaptationController {
    pub fn new(initial_style: LearningStyle, analyzer: EffectivenessAnalyzer, threshold: f64) -> Self {
        Self {
            analyzer,
            selector: StyleSelector::new(),
            threshold,
            current_style: initial_style,
            history: Vec::new(),
            style_effectiveness: StyleEffectivenessMap::default(),
            adaptations: Vec::new(),
            last_session: None,
            observed: 0,
            evaluated_at: 0,
        }
    }

    pub fn from_config(initial_style: LearningStyle, config: &EngineConfig) -> Self {
        Self::new(
            initial_style,
            EffectivenessAnalyzer::new(config.adaptation_window),
            config.style_effectiveness_threshold,
        )
    }

    pub fn current_style(&self) -> LearningStyle {
        self.current_style
    }

    /// Most recent observations, at most one window's worth.
    pub fn history(&self) -> &[PerformanceObservation] {
        &self.history
    }

    /// Total observations received, including those already dropped from
    /// the window.
    pub fn observations_seen(&self) -> u64 {
        self.observed
    }

    /// Style scores from the latest full window; zeros until one exists.
    pub fn style_effectiveness(&self) -> StyleEffectivenessMap {
        self.style_effectiveness
    }

    pub fn adaptations(&self) -> &[AdaptationEvent] {
        &self.adaptations
    }

    pub fn last_session(&self) -> Option<&StyleEffectivenessSnapshot> {
        self.last_session.as_ref()
    }

    pub fn latest_report(&self) -> Option<EffectivenessReport> {
        self.analyzer.analyze(&self.history)
    }

    pub fn on_observation(&mut self, observation: PerformanceObservation) -> Option<AdaptationEvent> {
        self.on_observation_at(observation, Utc::now())
    }

    pub fn on_observation_at(
        &mut self,
        observation: PerformanceObservation,
        now: DateTime<Utc>,
    ) -> Option<AdaptationEvent> {
        self.history.push(observation);
        let retained = self.analyzer.window().max(1);
        if self.history.len() > retained {
            let extra = self.history.len() - retained;
            self.history.drain(0..extra);
        }
        self.observed += 1;
        self.evaluate(now)
    }

    pub fn on_session_end(&mut self, summary: &SessionSummary) -> Option<AdaptationEvent> {
        self.on_session_end_at(summary, Utc::now())
    }

    pub fn on_session_end_at(
        &mut self,
        summary: &SessionSummary,
        now: DateTime<Utc>,
    ) -> Option<AdaptationEvent> {
        tracing::debug!(
            style = %summary.style_effectiveness.style,
            rate = summary.style_effectiveness.rate,
            "session snapshot recorded"
        );
        self.last_session = Some(summary.style_effectiveness.clone());

        // nothing observed since the last evaluation
        if self.observed == self.evaluated_at {
            return None;
        }
        self.evaluate(now)
    }

    /// Explicit choice made by the learner; bypasses the analysis pipeline.
    pub fn select_style(&mut self, style: LearningStyle) -> Option<AdaptationEvent> {
        if style == self.current_style {
            return None;
        }
        Some(self.switch_to(style, AdaptationReason::LearnerSelection, Utc::now()))
    }

    fn evaluate(&mut self, now: DateTime<Utc>) -> Option<AdaptationEvent> {
        self.evaluated_at = self.observed;
        let Some(report) = self.analyzer.analyze(&self.history) else {
            tracing::debug!(
                observations = self.history.len(),
                window = self.analyzer.window(),
                "insufficient data for adaptation"
            );
            return None;
        };

        let scores = report.style_scores();
        self.style_effectiveness = scores;

        let selected = self
            .selector
            .select(&scores)
            .filter(|style| *style != self.current_style);
        let low_effectiveness = report
            .style_average(self.current_style)
            .is_some_and(|average| average < self.threshold);

        let (target, reason) = match (low_effectiveness, selected) {
            (true, Some(style)) => (style, AdaptationReason::LowEffectiveness),
            (true, None) => (
                self.selector.best_alternative(&scores, self.current_style),
                AdaptationReason::LowEffectiveness,
            ),
            (false, Some(style)) => (style, AdaptationReason::PerformancePattern),
            (false, None) => return None,
        };

        Some(self.switch_to(target, reason, now))
    }

    fn switch_to(
        &mut self,
        target: LearningStyle,
        reason: AdaptationReason,
        now: DateTime<Utc>,
    ) -> AdaptationEvent {
        let event = AdaptationEvent {
            timestamp: now,
            from_style: self.current_style,
            to_style: target,
            reason,
        };

        tracing::info!(
            from = %event.from_style,
            to = %event.to_style,
            reason = reason.as_str(),
            "learning style adapted"
        );

        self.current_style = target;
        self.adaptations.push(event.clone());
        if self.adaptations.len() > ADAPTATION_LOG_LIMIT {
            let extra = self.adaptations.len() - ADAPTATION_LOG_LIMIT;
            self.adaptations.drain(0..extra);
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(content_type: &str, correct: bool, time: f64, engagement: f64) -> PerformanceObservation {
        PerformanceObservation::new(content_type, correct, time, engagement).unwrap()
    }

    fn controller(initial: LearningStyle) -> AdaptationController {
        AdaptationController::from_config(initial, &EngineConfig::default())
    }

    #[test]
    fn test_no_evaluation_before_window_fills() {
        let mut controller = controller(LearningStyle::Visual);
        for _ in 0..4 {
            assert!(controller
                .on_observation(obs("auditory-clips", true, 0.0, 1.0))
                .is_none());
        }
        assert_eq!(controller.current_style(), LearningStyle::Visual);
        assert_eq!(controller.style_effectiveness(), StyleEffectivenessMap::default());
    }

    #[test]
    fn test_history_keeps_only_latest_window() {
        let mut controller = controller(LearningStyle::Kinesthetic);
        for i in 0..20 {
            controller.on_observation(obs("kinesthetic-drag-drop", i % 2 == 0, 1.0, 1.0));
        }
        assert_eq!(controller.history().len(), 5);
        assert_eq!(controller.observations_seen(), 20);
        // last observation (i = 19) was incorrect
        assert!(!controller.history()[4].correct());
        assert!(controller.latest_report().is_some());
    }

    #[test]
    fn test_adaptation_log_is_capped() {
        let mut controller = controller(LearningStyle::Visual);
        for i in 0..(ADAPTATION_LOG_LIMIT + 10) {
            let style = if i % 2 == 0 {
                LearningStyle::Auditory
            } else {
                LearningStyle::Visual
            };
            assert!(controller.select_style(style).is_some());
        }

        let log = controller.adaptations();
        assert_eq!(log.len(), ADAPTATION_LOG_LIMIT);
        // the newest event is kept: i = 109 selected visual
        assert_eq!(log[ADAPTATION_LOG_LIMIT - 1].to_style, LearningStyle::Visual);
        assert_eq!(controller.current_style(), LearningStyle::Visual);
    }

    #[test]
    fn test_pattern_adaptation_switches_to_best_style() {
        let mut controller = controller(LearningStyle::Visual);
        let mut events = Vec::new();
        for _ in 0..5 {
            events.extend(controller.on_observation(obs("auditory-clips", true, 0.0, 1.0)));
        }

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].from_style, LearningStyle::Visual);
        assert_eq!(events[0].to_style, LearningStyle::Auditory);
        assert_eq!(events[0].reason, AdaptationReason::PerformancePattern);
        assert_eq!(controller.current_style(), LearningStyle::Auditory);
        assert_eq!(controller.adaptations().len(), 1);

        // stable afterwards
        assert!(controller
            .on_observation(obs("auditory-clips", true, 0.0, 1.0))
            .is_none());
    }

    #[test]
    fn test_low_effectiveness_takes_priority() {
        let mut controller = controller(LearningStyle::Visual);
        // visual: 0.4*0 + 0.3*(1-1) + 0.3*0 = 0 < 0.7, kinesthetic 1.0
        controller.on_observation(obs("visual-diagrams", false, 100.0, 0.0));
        controller.on_observation(obs("visual-diagrams", false, 100.0, 0.0));
        controller.on_observation(obs("kinesthetic-drag-drop", true, 0.0, 1.0));
        controller.on_observation(obs("kinesthetic-drag-drop", true, 0.0, 1.0));
        let event = controller
            .on_observation(obs("kinesthetic-drag-drop", true, 0.0, 1.0))
            .unwrap();

        assert_eq!(event.to_style, LearningStyle::Kinesthetic);
        assert_eq!(event.reason, AdaptationReason::LowEffectiveness);
        assert_eq!(controller.adaptations().len(), 1);
    }

    #[test]
    fn test_low_effectiveness_forces_switch_when_current_is_best() {
        let mut controller = controller(LearningStyle::Visual);
        // visual is the only scored style, but its average sits below 0.7
        let mut last = None;
        for _ in 0..5 {
            last = controller.on_observation(obs("visual-charts", true, 50.0, 0.25));
        }
        // 0.4 + 0.15 + 0.075
        let average = controller
            .latest_report()
            .unwrap()
            .style_average(LearningStyle::Visual)
            .unwrap();
        assert!((average - 0.625).abs() < 1e-12);

        let event = last.unwrap();
        assert_eq!(event.reason, AdaptationReason::LowEffectiveness);
        assert_eq!(event.from_style, LearningStyle::Visual);
        assert_eq!(event.to_style, LearningStyle::Auditory);
    }

    #[test]
    fn test_high_effectiveness_current_style_is_kept() {
        let mut controller = controller(LearningStyle::Kinesthetic);
        for _ in 0..6 {
            assert!(controller
                .on_observation(obs("kinesthetic-simulation", true, 10.0, 0.9))
                .is_none());
        }
        assert!(controller.adaptations().is_empty());
        assert!(controller.style_effectiveness().kinesthetic > 0.9);
    }

    #[test]
    fn test_unattributed_content_never_triggers() {
        let mut controller = controller(LearningStyle::Visual);
        for _ in 0..5 {
            assert!(controller
                .on_observation(obs("reading-text", false, 300.0, 0.0))
                .is_none());
        }
        assert_eq!(controller.current_style(), LearningStyle::Visual);
    }

    fn sample_summary(style: LearningStyle, accuracy: f64) -> SessionSummary {
        use crate::assessment::StyleRecommendation;
        use crate::difficulty::PerformanceLevel;

        SessionSummary {
            subject: "math".into(),
            skill: "fractions".into(),
            starting_difficulty: 2,
            total_questions: 5,
            correct_count: (accuracy * 5.0).round() as usize,
            accuracy,
            average_hints: 0.0,
            performance_level: PerformanceLevel::classify(accuracy, 0.0),
            recommended_difficulty: 2,
            best_streak: 1,
            style_effectiveness: StyleEffectivenessSnapshot {
                style,
                rate: accuracy,
                recommendation: if accuracy < 0.6 {
                    StyleRecommendation::ConsiderAlternativeStyle
                } else {
                    StyleRecommendation::StyleEffective
                },
            },
        }
    }

    #[test]
    fn test_session_end_records_snapshot() {
        let mut controller = controller(LearningStyle::Visual);
        let summary = sample_summary(LearningStyle::Visual, 0.4);

        assert!(controller.on_session_end(&summary).is_none());
        assert_eq!(controller.last_session().unwrap().rate, 0.4);
    }

    #[test]
    fn test_session_end_without_new_data_keeps_forced_switch() {
        let mut controller = controller(LearningStyle::Visual);
        let mut forced = None;
        for _ in 0..5 {
            forced = controller.on_observation(obs("visual-charts", true, 50.0, 0.25));
        }
        assert_eq!(forced.unwrap().to_style, LearningStyle::Auditory);

        let summary = sample_summary(LearningStyle::Visual, 1.0);
        assert!(controller.on_session_end(&summary).is_none());
        assert_eq!(controller.current_style(), LearningStyle::Auditory);
    }

    #[test]
    fn test_manual_selection_is_logged() {
        let mut controller = controller(LearningStyle::Visual);
        assert!(controller.select_style(LearningStyle::Visual).is_none());
        let event = controller.select_style(LearningStyle::Auditory).unwrap();
        assert_eq!(event.reason, AdaptationReason::LearnerSelection);
        assert_eq!(controller.current_style(), LearningStyle::Auditory);
    }

    #[test]
    fn test_event_serializes_reason_text() {
        let mut controller = controller(LearningStyle::Visual);
        let event = controller.select_style(LearningStyle::Kinesthetic).unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["reason"], "learner selection");
        assert_eq!(json["fromStyle"], "visual");
        assert_eq!(json["toStyle"], "kinesthetic");
    }
}
