//! Rendering of knowledge entries and diagnoses into reply text.

use crate::knowledge::{KnowledgeBase, KnowledgeEntry, title_case};
use crate::nlu::{Entities, EntityKind, Language};

use super::phrases::DISCLAIMER;

/// Symptoms listed per condition block unless configured otherwise.
pub const DEFAULT_SYMPTOM_CAP: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    /// Diagnosable illness: description, symptoms, treatment, warning.
    Condition,
    /// Lifestyle topic: tips only.
    Topic,
}

struct Labels {
    illness: &'static str,
    tips: &'static str,
    description: &'static str,
    symptoms: &'static str,
    treatment: &'static str,
    warning: &'static str,
    summary: &'static str,
    noted: &'static str,
    duration: &'static str,
    severity: &'static str,
    see_doctor: &'static str,
}

const ENGLISH: Labels = Labels {
    illness: "Illness",
    tips: "Wellness tips",
    description: "Description",
    symptoms: "Common symptoms",
    treatment: "Treatment",
    warning: "Warning",
    summary: "Based on your symptoms, possible conditions",
    noted: "You mentioned",
    duration: "duration",
    severity: "severity",
    see_doctor: "Your symptoms sound severe. Please see a doctor promptly.",
};

const HINDI: Labels = Labels {
    illness: "बीमारी",
    tips: "स्वास्थ्य सुझाव",
    description: "विवरण",
    symptoms: "सामान्य लक्षण",
    treatment: "उपचार",
    warning: "चेतावनी",
    summary: "आपके लक्षणों के आधार पर संभावित बीमारियाँ",
    noted: "आपने बताया",
    duration: "अवधि",
    severity: "गंभीरता",
    see_doctor: "आपके लक्षण गंभीर लगते हैं। कृपया जल्द डॉक्टर से मिलें।",
};

fn labels(language: Language) -> &'static Labels {
    match language {
        Language::English => &ENGLISH,
        Language::Hindi => &HINDI,
    }
}

/// Multi-line block for one knowledge entry.
pub fn format(entry: &KnowledgeEntry, language: Language, mode: FormatMode) -> String {
    format_capped(entry, language, mode, DEFAULT_SYMPTOM_CAP)
}

/// Like [`format`], listing at most `symptom_cap` symptoms.
pub fn format_capped(
    entry: &KnowledgeEntry,
    language: Language,
    mode: FormatMode,
    symptom_cap: usize,
) -> String {
    let l = labels(language);
    let mut lines: Vec<String> = Vec::new();

    match mode {
        FormatMode::Condition => {
            lines.push(format!("🩺 {}: {}", l.illness, entry.title()));
            if let Some(description) = &entry.description {
                lines.push(format!("📖 {}: {}", l.description, description.get(language)));
            }
            if !entry.symptoms.is_empty() {
                let listed: Vec<&str> = entry
                    .symptoms
                    .iter()
                    .take(symptom_cap)
                    .map(String::as_str)
                    .collect();
                lines.push(format!("🤒 {}: {}", l.symptoms, listed.join(", ")));
            }
            lines.push(format!("💊 {}:", l.treatment));
        }
        FormatMode::Topic => {
            lines.push(format!("💡 {}: {}", l.tips, entry.title()));
        }
    }

    for step in entry.treatment.get(language) {
        lines.push(format!("• {step}"));
    }

    if let Some(warning) = &entry.warning {
        lines.push(format!("⚠️ {}: {}", l.warning, warning.get(language)));
    }

    lines.join("\n")
}

/// Full diagnosis reply: disclaimer (English only), one block per candidate,
/// then a summary line naming all of them.
pub fn format_diagnosis(
    kb: &KnowledgeBase,
    candidates: &[&str],
    language: Language,
    entities: &Entities,
    symptom_cap: usize,
) -> String {
    let l = labels(language);
    let mut sections: Vec<String> = Vec::new();

    if language == Language::English {
        sections.push(DISCLAIMER.to_string());
    }

    for name in candidates {
        if let Some(entry) = kb.get(name) {
            sections.push(format_capped(entry, language, FormatMode::Condition, symptom_cap));
        }
    }

    let names: Vec<String> = candidates.iter().map(|n| title_case(n)).collect();
    let mut summary = format!("🔎 {}: {}.", l.summary, names.join(", "));

    if !entities.is_empty() {
        let noted: Vec<String> = entities
            .iter()
            .map(|(kind, value)| {
                let label = match kind {
                    EntityKind::Duration => l.duration,
                    EntityKind::Severity => l.severity,
                };
                format!("{label} {value}")
            })
            .collect();
        summary.push_str(&format!("\n📝 {}: {}.", l.noted, noted.join(", ")));
    }

    if entities.get(&EntityKind::Severity).is_some_and(|s| s == "severe") {
        summary.push_str(&format!("\n🚑 {}", l.see_doctor));
    }

    sections.push(summary);
    sections.join("\n\n")
}
