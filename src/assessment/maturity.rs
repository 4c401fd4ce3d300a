// src/assessment/maturity.rs

use serde::{Deserialize, Serialize};

/// Maturity band a 0..=100 score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaturityLevel {
    Initiation,
    Developing,
    Define,
    Advanced,
    Elite,
    Unknown,
}

impl MaturityLevel {
    pub fn color_tag(self) -> &'static str {
        match self {
            MaturityLevel::Initiation => "red",
            MaturityLevel::Developing => "orange",
            MaturityLevel::Define => "yellow",
            MaturityLevel::Advanced => "green",
            MaturityLevel::Elite => "blue",
            MaturityLevel::Unknown => "gray",
        }
    }
}

/// Result of [`classify_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub level: MaturityLevel,
    pub color_tag: &'static str,
}

/// Maps a score onto its maturity band.
///
/// Bands partition `[0, 100]` with inclusive lower edges:
/// 0-34 Initiation, 35-49 Developing, 50-79 Define, 80-89 Advanced, 90-100 Elite.
/// Anything outside that range is `Unknown`.
pub fn classify_score(score: i64) -> Classification {
    let level = match score {
        0..=34 => MaturityLevel::Initiation,
        35..=49 => MaturityLevel::Developing,
        50..=79 => MaturityLevel::Define,
        80..=89 => MaturityLevel::Advanced,
        90..=100 => MaturityLevel::Elite,
        _ => MaturityLevel::Unknown,
    };

    Classification {
        level,
        color_tag: level.color_tag(),
    }
}
