//! Adaptive scoring and learning-style selection for assessment sessions.
//!
//! - [`assessment`] runs question sessions and tracks streaks and hints
//! - [`analysis`] scores recent observations per content type and style
//! - [`controller`] switches the learner's presentation style
//! - [`difficulty`] moves skill levels within configured bounds
//! - [`engine`] ties the pieces together behind one per-learner facade

pub mod analysis;
pub mod assessment;
pub mod config;
pub mod controller;
pub mod difficulty;
pub mod engine;
pub mod logging;
pub mod profile;
pub mod types;

pub use config::EngineConfig;
pub use controller::{AdaptationController, AdaptationEvent, AdaptationReason};
pub use difficulty::{DifficultyAdjuster, PerformanceLevel};
pub use engine::{AnswerOutcome, EngineError, LearnerEngine, SessionHandle};
pub use profile::LearnerProfile;
pub use types::{LearningStyle, ObservationError, PerformanceObservation, StyleEffectivenessMap};
