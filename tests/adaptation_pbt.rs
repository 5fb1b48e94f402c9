//! Property-based tests for the adaptation pipeline
//!
//! Invariants covered:
//! - Insufficient data: histories shorter than the window never produce a report
//! - Hard window: observations before the window have no influence
//! - Bounded difficulty: adjusted levels stay within [1, upper_bound]
//! - Tie-breaking: the selected style is the first style holding the maximum
//! - Streaks: the streak equals the number of trailing correct answers

use proptest::prelude::*;

use adaptive_learning_core::analysis::{EffectivenessAnalyzer, StyleSelector};
use adaptive_learning_core::assessment::{AssessmentSession, SessionRequest, TemplateQuestionBank};
use adaptive_learning_core::{
    DifficultyAdjuster, LearningStyle, PerformanceLevel, PerformanceObservation,
    StyleEffectivenessMap,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_content_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("visual-diagrams".to_string()),
        Just("visual-charts".to_string()),
        Just("auditory-audio-clips".to_string()),
        Just("kinesthetic-drag-drop".to_string()),
        Just("reading-text".to_string()),
    ]
}

fn arb_observation() -> impl Strategy<Value = PerformanceObservation> {
    (
        arb_content_type(),
        any::<bool>(),
        0.0f64..=500.0,
        0.0f64..=1.0,
    )
        .prop_map(|(content_type, correct, time, engagement)| {
            PerformanceObservation::new(content_type, correct, time, engagement)
                .expect("generated values are in range")
        })
}

fn arb_level() -> impl Strategy<Value = PerformanceLevel> {
    prop_oneof![
        Just(PerformanceLevel::Excellent),
        Just(PerformanceLevel::Good),
        Just(PerformanceLevel::Fair),
        Just(PerformanceLevel::NeedsImprovement),
    ]
}

fn arb_score() -> impl Strategy<Value = f64> {
    // coarse grid so ties actually occur
    (-4i32..=8i32).prop_map(|v| f64::from(v) / 4.0)
}

proptest! {
    #[test]
    fn undersized_history_is_absent(history in prop::collection::vec(arb_observation(), 0..5)) {
        let analyzer = EffectivenessAnalyzer::default();
        prop_assert!(analyzer.analyze(&history).is_none());
    }

    #[test]
    fn older_observations_have_no_influence(
        prefix in prop::collection::vec(arb_observation(), 0..20),
        window in prop::collection::vec(arb_observation(), 5),
    ) {
        let analyzer = EffectivenessAnalyzer::default();
        let mut history = prefix;
        history.extend(window.iter().cloned());

        prop_assert_eq!(analyzer.analyze(&history), analyzer.analyze(&window));
    }

    #[test]
    fn report_counts_are_consistent(history in prop::collection::vec(arb_observation(), 5..30)) {
        let report = EffectivenessAnalyzer::default().analyze(&history).unwrap();
        let attempts: u32 = report.content_types.values().map(|s| s.attempts).sum();
        prop_assert_eq!(attempts, 5);
        for stats in report.content_types.values() {
            prop_assert!(stats.attempts > 0);
            prop_assert!(stats.successes <= stats.attempts);
            prop_assert!(stats.effectiveness.is_finite());
        }
    }

    #[test]
    fn adjusted_difficulty_stays_in_bounds(
        upper in 1u8..=10,
        current in 0u8..=12,
        level in arb_level(),
    ) {
        let adjuster = DifficultyAdjuster::new(upper);
        let next = adjuster.adjust(current, level);
        prop_assert!(next >= 1 && next <= upper);
    }

    #[test]
    fn selected_style_is_first_maximum(
        visual in arb_score(),
        auditory in arb_score(),
        kinesthetic in arb_score(),
    ) {
        let scores = StyleEffectivenessMap::new(visual, auditory, kinesthetic);
        let best = visual.max(auditory).max(kinesthetic);

        match StyleSelector::new().select(&scores) {
            None => prop_assert!(best <= 0.0),
            Some(style) => {
                prop_assert!(best > 0.0);
                prop_assert_eq!(scores.get(style), best);
                let first = LearningStyle::ALL
                    .into_iter()
                    .find(|s| scores.get(*s) == best)
                    .unwrap();
                prop_assert_eq!(style, first);
            }
        }
    }

    #[test]
    fn streak_counts_trailing_correct_answers(answers in prop::collection::vec(any::<bool>(), 5)) {
        let mut session = AssessmentSession::new(DifficultyAdjuster::default(), 5);
        session
            .start(
                &TemplateQuestionBank,
                SessionRequest::new("math", "addition", LearningStyle::Visual, 1),
            )
            .unwrap();

        let options = ["a", "b", "c"];
        let mut expected = 0u32;
        for (i, correct) in answers.iter().enumerate() {
            let option = if *correct { options[i % 3] } else { options[(i + 1) % 3] };
            let feedback = session.answer(&format!("q-{i}"), option).unwrap();

            expected = if *correct { expected + 1 } else { 0 };
            prop_assert_eq!(feedback.streak, expected);
            if !*correct {
                prop_assert_eq!(feedback.streak, 0);
            }
        }

        let summary = session.summary().unwrap();
        let correct = answers.iter().filter(|c| **c).count();
        prop_assert_eq!(summary.correct_count, correct);
        prop_assert!(summary.recommended_difficulty >= 1 && summary.recommended_difficulty <= 5);
    }
}
