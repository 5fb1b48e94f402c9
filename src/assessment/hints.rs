pub const GENERIC_HINT: &str = "Consider the relationship between the concepts...";

/// Hint template for a style identifier; unknown identifiers get the generic
/// hint.
pub fn hint_for_style(style: &str) -> &'static str {
    match style {
        "visual" => "Try visualizing the problem...",
        "auditory" => "Think about how this would sound...",
        "kinesthetic" => "Try working through this step by step...",
        _ => GENERIC_HINT,
    }
}
