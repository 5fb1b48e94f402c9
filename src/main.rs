use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use adaptive_learning_core::logging::{init_tracing, LogOptions};
use adaptive_learning_core::{EngineConfig, EngineError, LearnerEngine, LearningStyle};

const SUBJECT: &str = "math";
const SKILLS: [&str; 3] = ["addition", "fractions", "geometry"];

/// Chance of answering correctly at level 1, per presentation style.
fn aptitude(style: LearningStyle) -> f64 {
    match style {
        LearningStyle::Visual => 0.55,
        LearningStyle::Auditory => 0.45,
        LearningStyle::Kinesthetic => 0.9,
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn main() {
    let _ = dotenvy::dotenv();
    let config = EngineConfig::from_env();
    let _log_guard = init_tracing(&LogOptions::from_env(&config.log_level));

    if let Err(err) = run(config) {
        tracing::error!(error = %err, "simulation failed");
        std::process::exit(1);
    }
}

fn run(config: EngineConfig) -> Result<(), EngineError> {
    let sessions: usize = env_or("SIM_SESSIONS", 12);
    let seed: u64 = env_or("SIM_SEED", 7);
    let initial_style = std::env::var("SIM_INITIAL_STYLE")
        .ok()
        .and_then(|value| LearningStyle::parse(&value))
        .unwrap_or_default();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut engine = LearnerEngine::new(config, initial_style)?;
    tracing::info!(sessions, seed, style = %initial_style, "simulated learner started");

    for round in 0..sessions {
        let skill = SKILLS[round % SKILLS.len()];
        let handle = engine.start_adaptive_session(SUBJECT, skill)?;

        loop {
            let Some(session) = engine.session(handle) else {
                break;
            };
            let Some(question) = session.current_question() else {
                break;
            };

            let question_id = question.id.clone();
            let level_penalty = 0.08 * f64::from(question.difficulty.saturating_sub(1));
            let p_correct = (aptitude(question.style) - level_penalty).clamp(0.05, 0.95);
            let knows_answer = rng.random_bool(p_correct);
            let option_id = question
                .options
                .iter()
                .find(|option| option.is_correct == knows_answer)
                .map(|option| option.id.clone())
                .unwrap_or_default();

            if !knows_answer && rng.random_bool(0.3) {
                engine.request_hint(handle, &question_id)?;
            }

            let outcome = engine.submit_answer(handle, &question_id, &option_id)?;
            for change in &outcome.style_changes {
                tracing::info!(
                    round,
                    from = %change.from_style,
                    to = %change.to_style,
                    reason = change.reason.as_str(),
                    "style change notified"
                );
            }
            if outcome.completed {
                break;
            }
        }

        if let Some(summary) = engine.session_summary(handle)? {
            engine.update_progress(SUBJECT, skill, summary.accuracy);
        }
    }

    let report = json!({
        "profile": engine.profile(),
        "styleEffectiveness": engine.controller().style_effectiveness(),
        "adaptations": engine.controller().adaptations(),
        "recommendations": engine.content_recommendations(),
    });
    match serde_json::to_string_pretty(&report) {
        Ok(text) => println!("{text}"),
        Err(err) => tracing::error!(error = %err, "failed to render report"),
    }

    Ok(())
}
