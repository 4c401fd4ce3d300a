// src/assessment/answers.rs

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::AssessmentError;

/// Identifies one question by its position in the questionnaire.
///
/// On the wire the key is rendered as `panel_<p>_question_<q>`, the format the
/// survey front end uses for its radio groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnswerKey {
    pub panel: usize,
    pub question: usize,
}

impl AnswerKey {
    pub fn new(panel: usize, question: usize) -> Self {
        Self { panel, question }
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panel_{}_question_{}", self.panel, self.question)
    }
}

impl FromStr for AnswerKey {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || AssessmentError::MalformedKey(s.to_string());

        let rest = s.strip_prefix("panel_").ok_or_else(malformed)?;
        let (panel, question) = rest.split_once("_question_").ok_or_else(malformed)?;

        let key = Self {
            panel: panel.parse().map_err(|_| malformed())?,
            question: question.parse().map_err(|_| malformed())?,
        };

        // `usize` parsing accepts `+1` and `01`; only the canonical spelling
        // may name a key, otherwise two wire keys collapse into one entry.
        if key.to_string() != s {
            return Err(malformed());
        }
        Ok(key)
    }
}

impl Serialize for AnswerKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AnswerKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The answers recorded for one survey instance.
///
/// Maps each answered question to the ordinal of the selected option.
/// Unanswered questions are absent from the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<AnswerKey, usize>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: AnswerKey) -> Option<usize> {
        self.0.get(&key).copied()
    }

    pub fn contains(&self, key: AnswerKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnswerKey, usize)> + '_ {
        self.0.iter().map(|(key, ordinal)| (*key, *ordinal))
    }

    /// Unchecked insert. Range checks belong to the engine.
    pub(crate) fn insert(&mut self, key: AnswerKey, ordinal: usize) {
        self.0.insert(key, ordinal);
    }
}
