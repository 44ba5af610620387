use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfor\s+(\d+)\s+days?\b").expect("Invalid regex: duration pattern")
});

static SEVERITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(mild|moderate|severe)\b").expect("Invalid regex: severity pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Duration,
    Severity,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duration => f.write_str("duration"),
            Self::Severity => f.write_str("severity"),
        }
    }
}

/// Entities found in one message, at most one value per kind.
pub type Entities = BTreeMap<EntityKind, String>;

/// Extract duration ("N days") and severity (mild/moderate/severe) from free text.
pub fn extract(text: &str) -> Entities {
    let mut entities = Entities::new();

    if let Some(days) = DURATION.captures(text).and_then(|c| c.get(1)) {
        entities.insert(EntityKind::Duration, format!("{} days", days.as_str()));
    }

    if let Some(severity) = SEVERITY.captures(text).and_then(|c| c.get(1)) {
        entities.insert(EntityKind::Severity, severity.as_str().to_lowercase());
    }

    entities
}
