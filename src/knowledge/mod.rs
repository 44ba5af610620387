pub mod index;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::nlu::language::Language;

pub use index::SymptomIndex;

/// Knowledge data compiled into the binary, used when no path is configured.
const BUILTIN_KNOWLEDGE: &str = include_str!("../../data/knowledge_base.json");

/// Failure to load the knowledge base. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("knowledge base not found at {path}")]
    Missing { path: String },
    #[error("cannot read knowledge base at {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed knowledge base: {reason}")]
    Malformed { reason: String },
}

impl KnowledgeError {
    fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

/// A value available in several languages, always including English.
#[derive(Debug, Clone, PartialEq)]
pub struct Localized<T> {
    english: T,
    others: BTreeMap<String, T>,
}

impl<T> Localized<T> {
    /// The variant for `language`, falling back to English.
    pub fn get(&self, language: Language) -> &T {
        match language {
            Language::English => &self.english,
            other => self.others.get(other.tag()).unwrap_or(&self.english),
        }
    }

    pub fn has(&self, language: Language) -> bool {
        language == Language::English || self.others.contains_key(language.tag())
    }

    fn english_only(english: T) -> Self {
        Self {
            english,
            others: BTreeMap::new(),
        }
    }

    fn from_variants(
        mut variants: BTreeMap<String, T>,
        field: &str,
        entry: &str,
    ) -> Result<Self, KnowledgeError> {
        let english = variants.remove(Language::English.tag()).ok_or_else(|| {
            KnowledgeError::malformed(format!("'{entry}'.{field} has no 'en' fallback"))
        })?;
        Ok(Self {
            english,
            others: variants,
        })
    }
}

/// Whether an entry is diagnosed from symptoms or addressed as a lifestyle topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Condition,
    Topic,
}

/// A condition or lifestyle topic from the knowledge base.
#[derive(Debug, Clone)]
pub struct KnowledgeEntry {
    pub name: String,
    pub kind: EntryKind,
    pub description: Option<Localized<String>>,
    /// Lowercase keywords in data-file order. Empty for topics.
    pub symptoms: Vec<String>,
    pub treatment: Localized<Vec<String>>,
    pub warning: Option<Localized<String>>,
    /// Alternative spelling → canonical symptom keyword of this entry.
    pub aliases: Vec<(String, String)>,
}

impl KnowledgeEntry {
    pub fn is_condition(&self) -> bool {
        self.kind == EntryKind::Condition
    }

    /// Display name: each word capitalized ("common cold" → "Common Cold").
    pub fn title(&self) -> String {
        title_case(&self.name)
    }
}

pub fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Plain(String),
    ByLanguage(BTreeMap<String, String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawList {
    Plain(Vec<String>),
    ByLanguage(BTreeMap<String, Vec<String>>),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    description: Option<RawText>,
    symptoms: Option<Vec<String>>,
    treatment: Option<RawList>,
    warning: Option<RawText>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

/// Immutable, process-wide store of conditions and topics.
///
/// Entries keep the order of the data file; ranking ties rely on it.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Load from a JSON file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            let path = path.display().to_string();
            match source.kind() {
                std::io::ErrorKind::NotFound => KnowledgeError::Missing { path },
                _ => KnowledgeError::Unreadable { path, source },
            }
        })?;
        let kb = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            conditions = kb.conditions().count(),
            topics = kb.topics().count(),
            "loaded knowledge base"
        );
        Ok(kb)
    }

    /// The knowledge base shipped with the binary.
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_json_str(BUILTIN_KNOWLEDGE)
    }

    /// Load from `path` when given, the builtin data otherwise.
    pub fn load_or_builtin(path: Option<&str>) -> Result<Self, KnowledgeError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let kb = Self::builtin()?;
                info!(conditions = kb.conditions().count(), "using builtin knowledge base");
                Ok(kb)
            }
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, KnowledgeError> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| KnowledgeError::malformed(format!("invalid JSON: {e}")))?;

        let mut entries: Vec<KnowledgeEntry> = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let name = key.trim().to_lowercase();
            if name.is_empty() {
                return Err(KnowledgeError::malformed("entry with an empty name"));
            }
            if entries.iter().any(|e| e.name == name) {
                return Err(KnowledgeError::malformed(format!(
                    "duplicate entry '{name}'"
                )));
            }
            let entry: RawEntry = serde_json::from_value(value)
                .map_err(|e| KnowledgeError::malformed(format!("'{name}': {e}")))?;
            entries.push(normalize_entry(name, entry)?);
        }

        if !entries.iter().any(KnowledgeEntry::is_condition) {
            return Err(KnowledgeError::malformed("no condition entries defined"));
        }

        Ok(Self { entries })
    }

    /// Case-insensitive lookup by name.
    pub fn get(&self, name: &str) -> Option<&KnowledgeEntry> {
        let name = name.trim().to_lowercase();
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn topic(&self, name: &str) -> Option<&KnowledgeEntry> {
        self.get(name).filter(|e| e.kind == EntryKind::Topic)
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn conditions(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.iter().filter(|e| e.is_condition())
    }

    pub fn topics(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.iter().filter(|e| !e.is_condition())
    }
}

fn normalize_entry(name: String, raw: RawEntry) -> Result<KnowledgeEntry, KnowledgeError> {
    let kind = if raw.symptoms.is_some() {
        EntryKind::Condition
    } else {
        EntryKind::Topic
    };

    let description = raw
        .description
        .map(|d| localize_text(d, "description", &name))
        .transpose()?;
    if kind == EntryKind::Condition && description.is_none() {
        return Err(KnowledgeError::malformed(format!(
            "condition '{name}' is missing a description"
        )));
    }

    let treatment = match raw.treatment {
        Some(RawList::Plain(steps)) => Localized::english_only(steps),
        Some(RawList::ByLanguage(map)) => Localized::from_variants(map, "treatment", &name)?,
        None => {
            return Err(KnowledgeError::malformed(format!(
                "'{name}' is missing a treatment list"
            )));
        }
    };

    let warning = raw
        .warning
        .map(|w| localize_text(w, "warning", &name))
        .transpose()?;

    let mut symptoms: Vec<String> = Vec::new();
    for symptom in raw.symptoms.unwrap_or_default() {
        let symptom = symptom.trim().to_lowercase();
        if !symptom.is_empty() && !symptoms.contains(&symptom) {
            symptoms.push(symptom);
        }
    }
    if kind == EntryKind::Condition && symptoms.is_empty() {
        return Err(KnowledgeError::malformed(format!(
            "condition '{name}' has an empty symptom list"
        )));
    }

    let mut aliases = Vec::with_capacity(raw.aliases.len());
    for (alias, target) in raw.aliases {
        let target = target.trim().to_lowercase();
        if !symptoms.contains(&target) {
            return Err(KnowledgeError::malformed(format!(
                "'{name}'.aliases.{alias} points to unknown symptom '{target}'"
            )));
        }
        aliases.push((alias.trim().to_lowercase(), target));
    }

    Ok(KnowledgeEntry {
        name,
        kind,
        description,
        symptoms,
        treatment,
        warning,
        aliases,
    })
}

fn localize_text(raw: RawText, field: &str, entry: &str) -> Result<Localized<String>, KnowledgeError> {
    match raw {
        RawText::Plain(text) => Ok(Localized::english_only(text)),
        RawText::ByLanguage(map) => Localized::from_variants(map, field, entry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("common cold"), "Common Cold");
        assert_eq!(title_case("covid-19"), "Covid-19");
    }

    #[test]
    fn plain_strings_become_english_variants() {
        let kb = KnowledgeBase::from_json_str(
            r#"{"Cold": {"description": "A cold.", "symptoms": ["Cough "], "treatment": ["Rest"]}}"#,
        )
        .unwrap();
        let entry = kb.get("cold").unwrap();
        assert_eq!(entry.name, "cold");
        assert_eq!(entry.symptoms, vec!["cough"]);
        assert_eq!(entry.treatment.get(Language::Hindi), &vec!["Rest".to_string()]);
        assert!(!entry.treatment.has(Language::Hindi));
    }
}
