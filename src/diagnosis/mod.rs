use serde::Serialize;

use crate::knowledge::KnowledgeBase;

/// Minimum overlap of the best candidate before a diagnosis is delivered unprompted.
pub const CONFIDENT_OVERLAP: usize = 2;

/// Minimum number of reported symptoms before any diagnosis is delivered.
pub const MIN_SYMPTOMS: usize = 2;

/// A condition sharing at least one symptom with the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub name: String,
    pub overlap: usize,
}

/// Rank conditions by how many of `symptoms` they list.
///
/// Conditions with no overlap are dropped. The sort is stable with no
/// secondary key, so equal overlaps keep knowledge-base order.
pub fn rank(symptoms: &[String], kb: &KnowledgeBase) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = kb
        .conditions()
        .filter_map(|condition| {
            let overlap = condition
                .symptoms
                .iter()
                .filter(|s| symptoms.contains(s))
                .count();
            (overlap > 0).then(|| Candidate {
                name: condition.name.clone(),
                overlap,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.overlap.cmp(&a.overlap));
    ranked
}

/// Whether `ranked` is strong enough to deliver without being asked.
pub fn is_confident(ranked: &[Candidate], total_symptoms: usize) -> bool {
    total_symptoms >= MIN_SYMPTOMS
        && ranked
            .first()
            .is_some_and(|top| top.overlap >= CONFIDENT_OVERLAP)
}
