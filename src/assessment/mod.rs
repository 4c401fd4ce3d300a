// src/assessment/mod.rs

//! Scoring and completion tracking for the SRE maturity questionnaire.

pub mod answers;
pub mod definition;
pub mod engine;
pub mod error;
pub mod maturity;

pub use answers::{AnswerKey, AnswerSet};
pub use definition::{Panel, Question, Questionnaire};
pub use engine::{AssessmentEngine, AssessmentReport, OverallCompletion, PanelCompletion, PanelReport};
pub use error::AssessmentError;
pub use maturity::{Classification, MaturityLevel, classify_score};
