use crate::types::{LearningStyle, StyleEffectivenessMap};

/// Picks a presentation style from aggregated style scores.
///
/// Ties are broken by declared style order: a later style only wins with a
/// strictly greater score.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleSelector;

impl StyleSelector {
    pub fn new() -> Self {
        Self
    }

    /// Best style, or `None` when no style has a net-positive score.
    pub fn select(&self, scores: &StyleEffectivenessMap) -> Option<LearningStyle> {
        let (style, best) = Self::best_of(scores.iter())?;
        if best > 0.0 {
            Some(style)
        } else {
            None
        }
    }

    /// Best style other than `current`, regardless of sign.
    pub fn best_alternative(
        &self,
        scores: &StyleEffectivenessMap,
        current: LearningStyle,
    ) -> LearningStyle {
        Self::best_of(scores.iter().filter(|(style, _)| *style != current))
            .map(|(style, _)| style)
            .unwrap_or(current)
    }

    fn best_of(
        candidates: impl Iterator<Item = (LearningStyle, f64)>,
    ) -> Option<(LearningStyle, f64)> {
        candidates.fold(None, |best, (style, score)| match best {
            Some((_, best_score)) if score <= best_score => best,
            _ => Some((style, score)),
        })
    }
}
