use serde::{Deserialize, Serialize};

pub const MIN_LEVEL: u8 = 1;
pub const DEFAULT_UPPER_BOUND: u8 = 5;

const EXCELLENT_ACCURACY: f64 = 0.8;
const EXCELLENT_MAX_HINTS: f64 = 1.0;
const GOOD_ACCURACY: f64 = 0.6;
const FAIR_ACCURACY: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl PerformanceLevel {
    pub fn classify(accuracy: f64, avg_hints: f64) -> Self {
        if accuracy >= EXCELLENT_ACCURACY && avg_hints <= EXCELLENT_MAX_HINTS {
            Self::Excellent
        } else if accuracy >= GOOD_ACCURACY {
            Self::Good
        } else if accuracy >= FAIR_ACCURACY {
            Self::Fair
        } else {
            Self::NeedsImprovement
        }
    }

    pub const fn delta(&self) -> i32 {
        match self {
            Self::Excellent => 1,
            Self::Good | Self::Fair => 0,
            Self::NeedsImprovement => -1,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::NeedsImprovement => "needs_improvement",
        }
    }
}

/// Moves a skill level by one performance step, clamped to
/// `[MIN_LEVEL, upper_bound]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyAdjuster {
    upper_bound: u8,
}

impl DifficultyAdjuster {
    /// An `upper_bound` below `MIN_LEVEL` is raised to `MIN_LEVEL`.
    pub fn new(upper_bound: u8) -> Self {
        Self {
            upper_bound: upper_bound.max(MIN_LEVEL),
        }
    }

    pub fn upper_bound(&self) -> u8 {
        self.upper_bound
    }

    pub fn contains(&self, level: u8) -> bool {
        (MIN_LEVEL..=self.upper_bound).contains(&level)
    }

    pub fn adjust(&self, current: u8, level: PerformanceLevel) -> u8 {
        self.clamp(i32::from(current) + level.delta())
    }

    /// Profile-level rule driven by raw accuracy alone.
    pub fn adjust_by_accuracy(&self, current: u8, accuracy: f64) -> u8 {
        let delta = if accuracy > EXCELLENT_ACCURACY {
            1
        } else if accuracy < FAIR_ACCURACY {
            -1
        } else {
            0
        };
        self.clamp(i32::from(current) + delta)
    }

    fn clamp(&self, level: i32) -> u8 {
        level.clamp(i32::from(MIN_LEVEL), i32::from(self.upper_bound)) as u8
    }
}

impl Default for DifficultyAdjuster {
    fn default() -> Self {
        Self::new(DEFAULT_UPPER_BOUND)
    }
}
