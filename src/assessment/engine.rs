// src/assessment/engine.rs

use std::sync::Arc;

use serde::Serialize;

use super::answers::{AnswerKey, AnswerSet};
use super::definition::{Panel, Questionnaire};
use super::error::AssessmentError;
use super::maturity::{Classification, classify_score};

/// Answered/total counts for one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelCompletion {
    pub answered: usize,
    pub total: usize,
    pub is_complete: bool,
}

/// Answered/total counts across the whole questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverallCompletion {
    pub answered: usize,
    pub total: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelReport {
    pub title: String,
    #[serde(flatten)]
    pub completion: PanelCompletion,
    pub score: u32,
}

/// Everything the survey UI needs to render progress and the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentReport {
    pub panels: Vec<PanelReport>,
    pub completion: OverallCompletion,
    pub is_complete: bool,
    pub score: u32,
    pub classification: Classification,
}

/// Scores and tracks completion of answer sets against a shared questionnaire.
///
/// All operations are pure: answer sets are taken by reference and updates
/// return a new set.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    questionnaire: Arc<Questionnaire>,
}

impl AssessmentEngine {
    pub fn new(questionnaire: Questionnaire) -> Self {
        Self {
            questionnaire: Arc::new(questionnaire),
        }
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    /// Returns a copy of `answers` with `option` recorded for the given question.
    ///
    /// Re-answering overwrites the previous choice. Out-of-range input is
    /// rejected and `answers` is left as it was.
    pub fn record_answer(
        &self,
        answers: &AnswerSet,
        panel: usize,
        question: usize,
        option: usize,
    ) -> Result<AnswerSet, AssessmentError> {
        let key = AnswerKey::new(panel, question);
        self.check(key, option)?;

        let mut updated = answers.clone();
        updated.insert(key, option);
        Ok(updated)
    }

    /// Checks that every recorded answer references an existing question and option.
    pub fn validate(&self, answers: &AnswerSet) -> Result<(), AssessmentError> {
        answers
            .iter()
            .try_for_each(|(key, option)| self.check(key, option))
    }

    pub fn panel_completion(
        &self,
        panel: usize,
        answers: &AnswerSet,
    ) -> Result<PanelCompletion, AssessmentError> {
        Ok(completion_of(panel, self.panel(panel)?, answers))
    }

    pub fn overall_completion(&self, answers: &AnswerSet) -> OverallCompletion {
        let total = self.questionnaire.total_questions();
        let answered = answers
            .iter()
            .filter(|(key, _)| self.questionnaire.question(*key).is_some())
            .count();

        OverallCompletion {
            answered,
            total,
            percent: round_div(100 * answered as u64, total as u64),
        }
    }

    /// True once every question of every panel has an answer.
    pub fn is_complete(&self, answers: &AnswerSet) -> bool {
        let completion = self.overall_completion(answers);
        completion.answered == completion.total
    }

    pub fn panel_score(&self, panel: usize, answers: &AnswerSet) -> Result<u32, AssessmentError> {
        Ok(score_of(panel, self.panel(panel)?, answers))
    }

    /// Unweighted mean of the rounded panel scores, rounded again.
    pub fn total_score(&self, answers: &AnswerSet) -> u32 {
        let panels = self.questionnaire.panels();
        let sum: u64 = panels
            .iter()
            .enumerate()
            .map(|(index, panel)| u64::from(score_of(index, panel, answers)))
            .sum();

        round_div(sum, panels.len() as u64)
    }

    pub fn report(&self, answers: &AnswerSet) -> AssessmentReport {
        let panels = self
            .questionnaire
            .panels()
            .iter()
            .enumerate()
            .map(|(index, panel)| PanelReport {
                title: panel.title.clone(),
                completion: completion_of(index, panel, answers),
                score: score_of(index, panel, answers),
            })
            .collect();

        let completion = self.overall_completion(answers);
        let score = self.total_score(answers);

        AssessmentReport {
            panels,
            is_complete: completion.answered == completion.total,
            completion,
            score,
            classification: classify_score(i64::from(score)),
        }
    }

    fn panel(&self, index: usize) -> Result<&Panel, AssessmentError> {
        self.questionnaire
            .panel(index)
            .ok_or(AssessmentError::PanelOutOfRange { panel: index })
    }

    fn check(&self, key: AnswerKey, option: usize) -> Result<(), AssessmentError> {
        let panel = self.panel(key.panel)?;
        let question = panel
            .questions
            .get(key.question)
            .ok_or(AssessmentError::QuestionOutOfRange {
                panel: key.panel,
                question: key.question,
            })?;

        if option > question.max_weight() {
            return Err(AssessmentError::OptionOutOfRange {
                panel: key.panel,
                question: key.question,
                option,
            });
        }
        Ok(())
    }
}

fn completion_of(index: usize, panel: &Panel, answers: &AnswerSet) -> PanelCompletion {
    let total = panel.questions.len();
    let answered = (0..total)
        .filter(|question| answers.contains(AnswerKey::new(index, *question)))
        .count();

    PanelCompletion {
        answered,
        total,
        is_complete: answered == total,
    }
}

/// Percentage of the attainable weight reached by the panel's scored answers.
/// Exempt (ordinal 0) and unanswered questions are left out of both sides.
fn score_of(index: usize, panel: &Panel, answers: &AnswerSet) -> u32 {
    let mut sum = 0u64;
    let mut attainable = 0u64;

    for (position, question) in panel.questions.iter().enumerate() {
        match answers.get(AnswerKey::new(index, position)) {
            Some(weight) if weight > 0 => {
                sum += weight as u64;
                attainable += question.max_weight() as u64;
            }
            _ => {}
        }
    }

    if attainable == 0 {
        return 0;
    }
    round_div(100 * sum, attainable)
}

/// `Math.round(numerator / denominator)` for non-negative operands, without floats.
fn round_div(numerator: u64, denominator: u64) -> u32 {
    ((2 * numerator + denominator) / (2 * denominator)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::definition::Question;
    use crate::assessment::maturity::MaturityLevel;

    fn engine() -> AssessmentEngine {
        AssessmentEngine::new(Questionnaire::sre_maturity())
    }

    fn small_engine(panels: usize) -> AssessmentEngine {
        let panels = (0..panels)
            .map(|p| Panel {
                title: format!("Panel {p}"),
                questions: (0..3)
                    .map(|q| Question {
                        text: format!("Q{p}.{q}"),
                        options: ["N/A", "1", "2", "3", "4", "5"]
                            .iter()
                            .map(|o| o.to_string())
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        AssessmentEngine::new(Questionnaire::new(panels).unwrap())
    }

    fn answer_panel(
        engine: &AssessmentEngine,
        answers: AnswerSet,
        panel: usize,
        ordinals: &[usize],
    ) -> AnswerSet {
        ordinals
            .iter()
            .enumerate()
            .fold(answers, |acc, (question, ordinal)| {
                engine.record_answer(&acc, panel, question, *ordinal).unwrap()
            })
    }

    #[test]
    fn test_record_answer_marks_question_answered() {
        let engine = engine();
        for option in 0..=5 {
            let answers = engine.record_answer(&AnswerSet::new(), 2, 1, option).unwrap();
            assert!(answers.contains(AnswerKey::new(2, 1)));
            assert_eq!(engine.panel_completion(2, &answers).unwrap().answered, 1);
        }
    }

    #[test]
    fn test_record_answer_overwrites_and_is_idempotent() {
        let engine = engine();
        let once = engine.record_answer(&AnswerSet::new(), 0, 0, 3).unwrap();
        let twice = engine.record_answer(&once, 0, 0, 3).unwrap();
        assert_eq!(once, twice);

        let changed = engine.record_answer(&twice, 0, 0, 1).unwrap();
        assert_eq!(changed.get(AnswerKey::new(0, 0)), Some(1));
        assert_eq!(changed.len(), 1);
    }

    #[test]
    fn test_record_answer_rejects_out_of_range() {
        let engine = engine();
        let answers = engine.record_answer(&AnswerSet::new(), 0, 0, 2).unwrap();

        assert_eq!(
            engine.record_answer(&answers, 7, 0, 1),
            Err(AssessmentError::PanelOutOfRange { panel: 7 })
        );
        assert_eq!(
            engine.record_answer(&answers, 0, 3, 1),
            Err(AssessmentError::QuestionOutOfRange { panel: 0, question: 3 })
        );
        assert_eq!(
            engine.record_answer(&answers, 0, 1, 6),
            Err(AssessmentError::OptionOutOfRange { panel: 0, question: 1, option: 6 })
        );

        // The input set is untouched by the failed calls.
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get(AnswerKey::new(0, 0)), Some(2));
    }

    #[test]
    fn test_validate() {
        let engine = engine();
        let valid: AnswerSet =
            serde_json::from_str(r#"{"panel_0_question_0": 5, "panel_6_question_2": 0}"#).unwrap();
        assert!(engine.validate(&valid).is_ok());

        let bad_option: AnswerSet = serde_json::from_str(r#"{"panel_0_question_0": 9}"#).unwrap();
        assert!(engine.validate(&bad_option).is_err());

        let bad_panel: AnswerSet = serde_json::from_str(r#"{"panel_9_question_0": 1}"#).unwrap();
        assert!(engine.validate(&bad_panel).is_err());
    }

    #[test]
    fn test_panel_completion_counts_exempt_answers() {
        let engine = engine();
        let answers = answer_panel(&engine, AnswerSet::new(), 1, &[0, 0]);

        let status = engine.panel_completion(1, &answers).unwrap();
        assert_eq!(status, PanelCompletion { answered: 2, total: 3, is_complete: false });

        let answers = engine.record_answer(&answers, 1, 2, 0).unwrap();
        assert!(engine.panel_completion(1, &answers).unwrap().is_complete);
        assert!(!engine.panel_completion(0, &answers).unwrap().is_complete);
    }

    #[test]
    fn test_panel_completion_unknown_panel() {
        assert_eq!(
            engine().panel_completion(42, &AnswerSet::new()),
            Err(AssessmentError::PanelOutOfRange { panel: 42 })
        );
    }

    #[test]
    fn test_overall_completion_percent() {
        let engine = engine();
        let answers = (0..7).fold(AnswerSet::new(), |acc, panel| {
            engine.record_answer(&acc, panel, 0, 3).unwrap()
        });

        let completion = engine.overall_completion(&answers);
        assert_eq!(completion.total, 21);
        assert_eq!(completion.answered, 7);
        assert_eq!(completion.percent, 33);
        assert!(!engine.is_complete(&answers));
    }

    #[test]
    fn test_overall_completion_ignores_unknown_keys() {
        let engine = engine();
        let answers: AnswerSet =
            serde_json::from_str(r#"{"panel_0_question_0": 1, "panel_99_question_0": 1}"#).unwrap();
        assert_eq!(engine.overall_completion(&answers).answered, 1);
    }

    #[test]
    fn test_panel_score_all_max() {
        let engine = engine();
        let answers = answer_panel(&engine, AnswerSet::new(), 0, &[5, 5, 5]);
        assert_eq!(engine.panel_score(0, &answers).unwrap(), 100);
    }

    #[test]
    fn test_panel_score_excludes_exempt_answers() {
        let engine = engine();
        let answers = answer_panel(&engine, AnswerSet::new(), 0, &[0, 5, 5]);
        assert_eq!(engine.panel_score(0, &answers).unwrap(), 100);

        let answers = answer_panel(&engine, AnswerSet::new(), 0, &[0, 1, 4]);
        assert_eq!(engine.panel_score(0, &answers).unwrap(), 50);
    }

    #[test]
    fn test_panel_score_zero_when_nothing_scored() {
        let engine = engine();
        assert_eq!(engine.panel_score(3, &AnswerSet::new()).unwrap(), 0);

        let exempt = answer_panel(&engine, AnswerSet::new(), 3, &[0, 0, 0]);
        assert_eq!(engine.panel_score(3, &exempt).unwrap(), 0);
    }

    #[test]
    fn test_panel_score_rounds_half_up() {
        // 4 / 15 = 26.67%, 7 / 15 = 46.67%
        let engine = engine();
        let answers = answer_panel(&engine, AnswerSet::new(), 0, &[1, 1, 2]);
        assert_eq!(engine.panel_score(0, &answers).unwrap(), 27);

        let answers = answer_panel(&engine, AnswerSet::new(), 0, &[2, 2, 3]);
        assert_eq!(engine.panel_score(0, &answers).unwrap(), 47);
    }

    #[test]
    fn test_panel_score_with_mixed_option_counts() {
        let panels = vec![Panel {
            title: "Mixed".to_string(),
            questions: vec![
                Question {
                    text: "Three options".to_string(),
                    options: vec!["N/A".into(), "No".into(), "Yes".into()],
                },
                Question {
                    text: "Six options".to_string(),
                    options: ["N/A", "1", "2", "3", "4", "5"].iter().map(|o| o.to_string()).collect(),
                },
            ],
        }];
        let engine = AssessmentEngine::new(Questionnaire::new(panels).unwrap());
        let answers = answer_panel(&engine, AnswerSet::new(), 0, &[2, 5]);
        assert_eq!(engine.panel_score(0, &answers).unwrap(), 100);

        let answers = answer_panel(&engine, AnswerSet::new(), 0, &[1, 0]);
        assert_eq!(engine.panel_score(0, &answers).unwrap(), 50);
    }

    #[test]
    fn test_total_score_is_unweighted_mean() {
        let engine = small_engine(3);
        let answers = answer_panel(&engine, AnswerSet::new(), 0, &[5, 5, 5]);
        let answers = answer_panel(&engine, answers, 1, &[3, 2]);

        assert_eq!(engine.panel_score(0, &answers).unwrap(), 100);
        assert_eq!(engine.panel_score(1, &answers).unwrap(), 50);
        assert_eq!(engine.panel_score(2, &answers).unwrap(), 0);
        assert_eq!(engine.total_score(&answers), 50);
    }

    #[test]
    fn test_total_score_rounds_panels_before_mean() {
        // Panel scores 27, 47 and 0 average to 24.67 -> 25. Averaging the
        // unrounded 26.67 and 46.67 would give 24.44 -> 24.
        let engine = small_engine(3);
        let answers = answer_panel(&engine, AnswerSet::new(), 0, &[1, 1, 2]);
        let answers = answer_panel(&engine, answers, 1, &[2, 2, 3]);

        assert_eq!(engine.total_score(&answers), 25);
    }

    #[test]
    fn test_empty_answers_score_zero() {
        let engine = engine();
        let report = engine.report(&AnswerSet::new());
        assert_eq!(report.score, 0);
        assert_eq!(report.completion.percent, 0);
        assert_eq!(report.classification.level, MaturityLevel::Initiation);
        assert!(!report.is_complete);
    }

    #[test]
    fn test_report_for_complete_assessment() {
        let engine = engine();
        let answers = (0..7).fold(AnswerSet::new(), |acc, panel| {
            answer_panel(&engine, acc, panel, &[5, 4, 0])
        });

        let report = engine.report(&answers);
        assert!(report.is_complete);
        assert_eq!(report.completion.percent, 100);
        assert_eq!(report.panels.len(), 7);
        assert!(report.panels.iter().all(|p| p.score == 90 && p.completion.is_complete));
        assert_eq!(report.score, 90);
        assert_eq!(report.classification.level, MaturityLevel::Elite);
    }

    #[test]
    fn test_round_div_matches_math_round() {
        assert_eq!(round_div(1, 2), 1);
        assert_eq!(round_div(5, 2), 3);
        assert_eq!(round_div(1, 3), 0);
        assert_eq!(round_div(2, 3), 1);
        assert_eq!(round_div(0, 7), 0);
        assert_eq!(round_div(700, 21), 33);
    }
}
