use serde::Serialize;

use crate::nlu::{Intent, Language};

/// Which branch of the dialogue produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    Greeted,
    Farewell,
    /// Fewer than two symptoms known; asked for more.
    CollectingSymptoms,
    /// Weak match; asked about one more symptom.
    SuggestedSymptom,
    /// Diagnosis delivered and session cleared.
    Diagnosed,
    TopicTips,
    /// Diagnosis requested without enough symptoms.
    NeedSymptoms,
    FollowUp,
    Fallback,
}

/// Result of one dialogue turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReply {
    pub reply: String,
    pub language: Language,
    pub intent: Option<Intent>,
    pub outcome: TurnOutcome,
}
