// src/assessment/definition.rs

use serde::{Deserialize, Serialize};

use super::answers::AnswerKey;
use super::error::AssessmentError;

/// A single multiple-choice question.
///
/// The position of an option is its ordinal weight. Ordinal 0 is the exempt
/// ("N/A") option and never contributes to a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
}

impl Question {
    /// Highest ordinal weight a response to this question can carry.
    pub fn max_weight(&self) -> usize {
        self.options.len().saturating_sub(1)
    }
}

/// A titled group of related questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    pub questions: Vec<Question>,
}

/// The immutable panel table shared by every survey instance.
///
/// Can only be built through [`Questionnaire::new`] or [`Questionnaire::from_json`],
/// so a constructed value always has at least one panel, every panel has at
/// least one question and every question has at least two options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Questionnaire {
    panels: Vec<Panel>,
}

/// On-disk shape of a questionnaire file.
#[derive(Debug, Deserialize)]
struct QuestionnaireFile {
    panels: Vec<Panel>,
}

impl Questionnaire {
    pub fn new(panels: Vec<Panel>) -> Result<Self, AssessmentError> {
        if panels.is_empty() {
            return Err(AssessmentError::EmptyQuestionnaire);
        }

        for panel in &panels {
            if panel.questions.is_empty() {
                return Err(AssessmentError::EmptyPanel(panel.title.clone()));
            }
            if let Some(question) = panel.questions.iter().find(|q| q.options.len() < 2) {
                return Err(AssessmentError::TooFewOptions(question.text.clone()));
            }
        }

        Ok(Self { panels })
    }

    /// Parses a questionnaire from JSON of the form `{"panels": [...]}`.
    pub fn from_json(raw: &str) -> Result<Self, AssessmentError> {
        let file: QuestionnaireFile = serde_json::from_str(raw)
            .map_err(|e| AssessmentError::MalformedDefinition(e.to_string()))?;
        Self::new(file.panels)
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, index: usize) -> Option<&Panel> {
        self.panels.get(index)
    }

    pub fn question(&self, key: AnswerKey) -> Option<&Question> {
        self.panels.get(key.panel)?.questions.get(key.question)
    }

    /// Number of questions across all panels.
    pub fn total_questions(&self) -> usize {
        self.panels.iter().map(|p| p.questions.len()).sum()
    }

    /// The built-in SRE maturity questionnaire: 7 panels of 3 questions, each
    /// with 6 options numbered 0 (N/A) to 5.
    ///
    /// Option positions are the wire format of stored answers, so the order of
    /// existing options must never change. Re-ordered variants belong in a
    /// separate table loaded through `QUESTIONNAIRE_PATH`.
    pub fn sre_maturity() -> Self {
        let panels = SRE_MATURITY_PANELS
            .iter()
            .map(|(title, questions)| Panel {
                title: (*title).to_string(),
                questions: questions
                    .iter()
                    .map(|(text, options)| Question {
                        text: (*text).to_string(),
                        options: options.iter().map(|o| (*o).to_string()).collect(),
                    })
                    .collect(),
            })
            .collect();

        Self { panels }
    }
}

type QuestionRow = (&'static str, [&'static str; 6]);

const SRE_MATURITY_PANELS: [(&str, [QuestionRow; 3]); 7] = [
    (
        "Availability & SLOs",
        [
            (
                "What is your target availability percentage?",
                ["N/A", "98%", "99%", "99.9%", "99.95%", "99.99%"],
            ),
            (
                "How frequently do you review SLO compliance?",
                [
                    "N/A",
                    "Daily",
                    "Weekly",
                    "Bi-weekly",
                    "Monthly",
                    "Quarterly",
                ],
            ),
            (
                "Do you have error budgets defined?",
                [
                    "N/A",
                    "Fully Implemented",
                    "Mostly Implemented",
                    "Partially Implemented",
                    "Planned",
                    "Just Discussing",
                ],
            ),
        ],
    ),
    (
        "Monitoring & Observability",
        [
            (
                "What monitoring systems do you currently use?",
                [
                    "N/A",
                    "Single Comprehensive Tool",
                    "Multiple Integrated Tools",
                    "Basic Monitoring",
                    "Limited Visibility",
                    "Planning to Implement",
                ],
            ),
            (
                "What is your logging retention period?",
                ["N/A", "1 week", "30 days", "90 days", "6 months", "1 year"],
            ),
            (
                "Do you use distributed tracing?",
                [
                    "N/A",
                    "Full Coverage",
                    "Extensive Coverage",
                    "Partial Coverage",
                    "Limited Coverage",
                    "Planning",
                ],
            ),
        ],
    ),
    (
        "Incident Management",
        [
            (
                "How is on-call responsibility organized?",
                [
                    "N/A",
                    "No Formal Rotation",
                    "Informal Rotation",
                    "Scheduled Rotation",
                    "Rotation with Escalation Policy",
                    "Follow-the-Sun with Escalation",
                ],
            ),
            (
                "Do you run postmortems after incidents?",
                [
                    "N/A",
                    "Never",
                    "Major Incidents Only",
                    "Most Incidents",
                    "All Incidents",
                    "Blameless with Tracked Actions",
                ],
            ),
            (
                "What is your typical time to mitigate a major incident?",
                ["N/A", "Days", "Hours", "Under 4 hours", "Under 1 hour", "Under 15 minutes"],
            ),
        ],
    ),
    (
        "Automation & Toil Reduction",
        [
            (
                "How are deployments performed?",
                [
                    "N/A",
                    "Manual",
                    "Scripted",
                    "Partially Automated",
                    "Continuous Delivery",
                    "Continuous Deployment",
                ],
            ),
            (
                "Do you measure operational toil?",
                [
                    "N/A",
                    "Not Measured",
                    "Anecdotally",
                    "Occasionally",
                    "Regularly",
                    "Tracked with Reduction Targets",
                ],
            ),
            (
                "How is infrastructure provisioned?",
                [
                    "N/A",
                    "Manual",
                    "Ad-hoc Scripts",
                    "Partial Infrastructure as Code",
                    "Mostly Infrastructure as Code",
                    "Fully Declarative and Reviewed",
                ],
            ),
        ],
    ),
    (
        "Capacity Planning & Performance",
        [
            (
                "How do you forecast capacity needs?",
                [
                    "N/A",
                    "Reactive Only",
                    "Annual Estimates",
                    "Quarterly Reviews",
                    "Metric-driven Forecasts",
                    "Automated Forecasting",
                ],
            ),
            (
                "Do you run load or stress tests?",
                ["N/A", "Never", "Before Major Launches", "Quarterly", "Monthly", "Continuously"],
            ),
            (
                "How is autoscaling used?",
                [
                    "N/A",
                    "Not Used",
                    "Manual Scaling",
                    "Some Services",
                    "Most Services",
                    "All Services with Tuned Policies",
                ],
            ),
        ],
    ),
    (
        "Change Management & Release",
        [
            (
                "How are production changes reviewed?",
                [
                    "N/A",
                    "No Review",
                    "Ad-hoc Review",
                    "Peer Review",
                    "Peer Review with Automated Checks",
                    "Policy-enforced Review",
                ],
            ),
            (
                "Do you use progressive rollouts?",
                [
                    "N/A",
                    "Never",
                    "Rarely",
                    "Canary for Critical Services",
                    "Canary by Default",
                    "Automated Canary Analysis",
                ],
            ),
            (
                "How quickly can you roll back a bad release?",
                ["N/A", "Days", "Hours", "Under 1 hour", "Under 15 minutes", "Automatic"],
            ),
        ],
    ),
    (
        "Security & Compliance",
        [
            (
                "How often do you conduct security audits?",
                [
                    "N/A",
                    "Continuous Monitoring",
                    "Monthly",
                    "Quarterly",
                    "Bi-annually",
                    "Annually",
                ],
            ),
            (
                "What compliance frameworks do you follow?",
                [
                    "N/A",
                    "Multiple Advanced Frameworks",
                    "Comprehensive Compliance",
                    "Multiple Basic Frameworks",
                    "Single Framework",
                    "Limited Compliance",
                ],
            ),
            (
                "How do you manage vulnerabilities?",
                [
                    "N/A",
                    "Continuous Automated Scanning",
                    "Comprehensive Regular Reviews",
                    "Periodic Automated Scanning",
                    "Manual Reviews",
                    "Limited Process",
                ],
            ),
        ],
    ),
];
