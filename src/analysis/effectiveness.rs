//! Sliding-window effectiveness analysis.
//!
//! Only the most recent `window` observations are considered; anything older
//! has no influence. Each content type seen in the window gets a weighted
//! score:
//!
//! - success rate, weight 0.4
//! - time efficiency `1 - avg_time / 100`, weight 0.3 (may go negative)
//! - mean engagement, weight 0.3
//!
//! Scores are not clamped to `[0, 1]`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{LearningStyle, PerformanceObservation, StyleEffectivenessMap};

pub const DEFAULT_WINDOW: usize = 5;

const SUCCESS_WEIGHT: f64 = 0.4;
const TIME_WEIGHT: f64 = 0.3;
const ENGAGEMENT_WEIGHT: f64 = 0.3;
const TIME_BASELINE: f64 = 100.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeStats {
    pub attempts: u32,
    pub successes: u32,
    pub total_time: f64,
    pub total_engagement: f64,
    pub effectiveness: f64,
}

impl ContentTypeStats {
    fn record(&mut self, obs: &PerformanceObservation) {
        self.attempts += 1;
        if obs.correct() {
            self.successes += 1;
        }
        self.total_time += obs.time_spent();
        self.total_engagement += obs.engagement_metric();
    }

    fn finalize(&mut self) {
        // attempts >= 1: a group is only created by recording an observation
        let attempts = f64::from(self.attempts);
        let success_rate = f64::from(self.successes) / attempts;
        let time_efficiency = 1.0 - self.total_time / (attempts * TIME_BASELINE);
        let engagement = self.total_engagement / attempts;

        self.effectiveness = SUCCESS_WEIGHT * success_rate
            + TIME_WEIGHT * time_efficiency
            + ENGAGEMENT_WEIGHT * engagement;
    }
}

/// Per-content-type statistics for one analysis window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivenessReport {
    pub content_types: BTreeMap<String, ContentTypeStats>,
}

impl EffectivenessReport {
    pub fn get(&self, content_type: &str) -> Option<&ContentTypeStats> {
        self.content_types.get(content_type)
    }

    pub fn effectiveness(&self, content_type: &str) -> Option<f64> {
        self.get(content_type).map(|stats| stats.effectiveness)
    }

    /// Sums content-type effectiveness into style buckets. Content types that
    /// name no style are left out.
    pub fn style_scores(&self) -> StyleEffectivenessMap {
        let mut scores = StyleEffectivenessMap::default();
        for (content_type, stats) in &self.content_types {
            if let Some(style) = LearningStyle::attribute(content_type) {
                scores.add(style, stats.effectiveness);
            }
        }
        scores
    }

    /// Attempt-weighted mean effectiveness of the content types attributed to
    /// `style`, or `None` if the window holds no observation for it.
    pub fn style_average(&self, style: LearningStyle) -> Option<f64> {
        let (weighted, attempts) = self
            .content_types
            .iter()
            .filter(|(content_type, _)| LearningStyle::attribute(content_type) == Some(style))
            .fold((0.0, 0u32), |(sum, n), (_, stats)| {
                (sum + stats.effectiveness * f64::from(stats.attempts), n + stats.attempts)
            });

        if attempts == 0 {
            None
        } else {
            Some(weighted / f64::from(attempts))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivenessAnalyzer {
    window: usize,
}

impl Default for EffectivenessAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl EffectivenessAnalyzer {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Returns `None` while the history is shorter than the window.
    pub fn analyze(&self, history: &[PerformanceObservation]) -> Option<EffectivenessReport> {
        if self.window == 0 || history.len() < self.window {
            return None;
        }

        let recent = &history[history.len() - self.window..];
        let mut content_types: BTreeMap<String, ContentTypeStats> = BTreeMap::new();
        for obs in recent {
            content_types
                .entry(obs.content_type().to_string())
                .or_default()
                .record(obs);
        }

        for stats in content_types.values_mut() {
            stats.finalize();
        }

        Some(EffectivenessReport { content_types })
    }
}
