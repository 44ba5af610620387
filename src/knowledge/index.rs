use std::collections::{BTreeSet, HashMap};

use super::KnowledgeBase;

/// Symptom keyword → conditions listing it, built once from the knowledge base.
///
/// The vocabulary keeps first-seen knowledge-base order so extraction and
/// suggestion are reproducible across runs.
#[derive(Debug, Clone, Default)]
pub struct SymptomIndex {
    conditions_by_symptom: HashMap<String, BTreeSet<String>>,
    vocabulary: Vec<String>,
    aliases: Vec<(String, String)>,
}

impl SymptomIndex {
    pub fn build(kb: &KnowledgeBase) -> Self {
        let mut index = Self::default();

        for entry in kb.conditions() {
            for symptom in &entry.symptoms {
                let names = index
                    .conditions_by_symptom
                    .entry(symptom.clone())
                    .or_insert_with(|| {
                        index.vocabulary.push(symptom.clone());
                        BTreeSet::new()
                    });
                names.insert(entry.name.clone());
            }
            for (alias, target) in &entry.aliases {
                // First definition of an alias wins.
                if !index.aliases.iter().any(|(a, _)| a == alias) {
                    index.aliases.push((alias.clone(), target.clone()));
                }
            }
        }

        index
    }

    /// Conditions whose symptom list contains `symptom`.
    pub fn conditions_for(&self, symptom: &str) -> Option<&BTreeSet<String>> {
        self.conditions_by_symptom.get(symptom)
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.conditions_by_symptom.contains_key(symptom)
    }

    /// Canonical symptoms mentioned in `text`, in vocabulary order, deduplicated.
    ///
    /// Plain substring match on the lowercased text; aliases resolve to their
    /// canonical keyword.
    pub fn match_symptoms(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut found: Vec<String> = self
            .vocabulary
            .iter()
            .filter(|keyword| lower.contains(keyword.as_str()))
            .cloned()
            .collect();

        for (alias, target) in &self.aliases {
            if lower.contains(alias.as_str()) && !found.contains(target) {
                found.push(target.clone());
            }
        }

        found
    }

    /// First alias recorded for a canonical keyword.
    pub fn alias_for(&self, symptom: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(_, target)| target == symptom)
            .map(|(alias, _)| alias.as_str())
    }

    /// Vocabulary keywords not present in `reported`.
    pub fn unreported<'a>(&'a self, reported: &'a [String]) -> impl Iterator<Item = &'a String> {
        self.vocabulary.iter().filter(move |s| !reported.contains(s))
    }
}
