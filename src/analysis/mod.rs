pub mod effectiveness;
pub mod recommendation;
pub mod selector;

pub use effectiveness::{ContentTypeStats, EffectivenessAnalyzer, EffectivenessReport};
pub use recommendation::{recommend_content, ContentRecommendation};
pub use selector::StyleSelector;
