//! Content-mix recommendations derived from style scores.
//!
//! Every style scoring above the effectiveness threshold is a "hybrid" style.
//! With more than one hybrid style the learner gets a blended content mix,
//! weighted by each style's score.

use serde::Serialize;

use crate::types::{LearningStyle, StyleEffectivenessMap};

pub fn content_types_for_style(style: LearningStyle) -> &'static [&'static str] {
    match style {
        LearningStyle::Visual => &[
            "interactive-diagrams",
            "video-explanations",
            "mind-maps",
            "infographics",
        ],
        LearningStyle::Auditory => &[
            "audio-lessons",
            "discussion-based",
            "verbal-explanations",
            "music-based-learning",
        ],
        LearningStyle::Kinesthetic => &[
            "interactive-simulations",
            "hands-on-exercises",
            "role-playing",
            "physical-demonstrations",
        ],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleShare {
    pub style: LearningStyle,
    pub percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleContentTypes {
    pub style: LearningStyle,
    pub types: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecommendation {
    pub primary_style: LearningStyle,
    pub hybrid_styles: Vec<LearningStyle>,
    pub content_mix: Option<Vec<StyleShare>>,
    pub content_types: Vec<StyleContentTypes>,
}

pub fn recommend_content(scores: &StyleEffectivenessMap, threshold: f64) -> ContentRecommendation {
    let primary_style = strongest(scores);

    let hybrid_styles: Vec<LearningStyle> = scores
        .iter()
        .filter(|(_, score)| *score > threshold)
        .map(|(style, _)| style)
        .collect();

    let content_mix = (hybrid_styles.len() > 1).then(|| {
        hybrid_styles
            .iter()
            .map(|style| StyleShare {
                style: *style,
                percentage: (scores.get(*style) * 100.0).round() as i64,
            })
            .collect()
    });

    let content_types = hybrid_styles
        .iter()
        .map(|style| StyleContentTypes {
            style: *style,
            types: content_types_for_style(*style),
        })
        .collect();

    ContentRecommendation {
        primary_style,
        hybrid_styles,
        content_mix,
        content_types,
    }
}

// Same ordering as StyleSelector, but always yields a style.
fn strongest(scores: &StyleEffectivenessMap) -> LearningStyle {
    scores
        .iter()
        .fold((LearningStyle::Visual, f64::NEG_INFINITY), |best, (style, score)| {
            if score > best.1 {
                (style, score)
            } else {
                best
            }
        })
        .0
}
