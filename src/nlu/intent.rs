//! Rule-based intent detection.
//!
//! Rules are evaluated in the order of [`INTENT_RULES`] and the first rule
//! with a matching keyword wins. The order is the precedence: earlier rules
//! shadow later ones when vocabularies overlap.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greet,
    Goodbye,
    Stress,
    Sleep,
    Exercise,
    DiagnosisQuery,
    FollowUp,
    Diet,
    Hydration,
    Mindfulness,
    Motivation,
    Loneliness,
    Crisis,
    Affirm,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Greet => "greet",
            Self::Goodbye => "goodbye",
            Self::Stress => "stress",
            Self::Sleep => "sleep",
            Self::Exercise => "exercise",
            Self::DiagnosisQuery => "diagnosis_query",
            Self::FollowUp => "follow_up",
            Self::Diet => "diet",
            Self::Hydration => "hydration",
            Self::Mindfulness => "mindfulness",
            Self::Motivation => "motivation",
            Self::Loneliness => "loneliness",
            Self::Crisis => "crisis",
            Self::Affirm => "affirm",
        }
    }

    /// Parse a label produced by an external classifier. Accepts `-` or `_`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase().replace('-', "_");
        ALL_INTENTS.iter().copied().find(|i| i.label() == label)
    }

    /// Knowledge-base topic rendered for this intent, if it is a lifestyle topic.
    pub fn topic(&self) -> Option<&'static str> {
        match self {
            Self::Stress
            | Self::Sleep
            | Self::Exercise
            | Self::Diet
            | Self::Hydration
            | Self::Mindfulness
            | Self::Motivation
            | Self::Loneliness
            | Self::Crisis => Some(self.label()),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const ALL_INTENTS: [Intent; 14] = [
    Intent::Greet,
    Intent::Goodbye,
    Intent::Stress,
    Intent::Sleep,
    Intent::Exercise,
    Intent::DiagnosisQuery,
    Intent::FollowUp,
    Intent::Diet,
    Intent::Hydration,
    Intent::Mindfulness,
    Intent::Motivation,
    Intent::Loneliness,
    Intent::Crisis,
    Intent::Affirm,
];

pub struct IntentRule {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
}

/// Ordered rule table. The first six entries are the core protocol and must
/// keep this relative order.
pub static INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Greet,
        keywords: &[
            "hello", "hi", "hey", "hiya", "namaste", "good morning", "good evening",
            "नमस्ते", "नमस्कार", "हैलो",
        ],
    },
    IntentRule {
        intent: Intent::Goodbye,
        keywords: &["bye", "goodbye", "see you", "good night", "अलविदा", "फिर मिलेंगे"],
    },
    IntentRule {
        intent: Intent::Stress,
        keywords: &[
            "stress", "stressed", "stressful", "anxious", "anxiety", "pressure", "tension",
            "तनाव", "चिंता",
        ],
    },
    IntentRule {
        intent: Intent::Sleep,
        keywords: &["sleep", "sleepy", "sleepless", "insomnia", "नींद", "अनिद्रा"],
    },
    IntentRule {
        intent: Intent::Exercise,
        keywords: &["exercise", "exercising", "workout", "gym", "fitness", "व्यायाम", "कसरत"],
    },
    IntentRule {
        intent: Intent::DiagnosisQuery,
        keywords: &[
            "what do i have",
            "what is wrong with me",
            "what's wrong with me",
            "diagnose",
            "diagnosis",
            "which disease",
            "what disease",
            "मुझे क्या हुआ",
            "क्या बीमारी",
        ],
    },
    IntentRule {
        intent: Intent::FollowUp,
        keywords: &["what should i do", "help me", "what now", "मैं क्या करूं", "मदद"],
    },
    IntentRule {
        intent: Intent::Diet,
        keywords: &["diet", "food", "nutrition", "meal", "आहार", "खाना"],
    },
    IntentRule {
        intent: Intent::Hydration,
        keywords: &["water", "hydrated", "hydration", "पानी"],
    },
    IntentRule {
        intent: Intent::Mindfulness,
        keywords: &["meditate", "meditation", "mindful", "mindfulness", "relax", "ध्यान"],
    },
    IntentRule {
        intent: Intent::Motivation,
        keywords: &["motivation", "motivated", "lazy", "प्रेरणा"],
    },
    IntentRule {
        intent: Intent::Loneliness,
        keywords: &["lonely", "alone", "isolated", "अकेला", "अकेली", "अकेलापन"],
    },
    IntentRule {
        intent: Intent::Crisis,
        keywords: &[
            "suicide", "kill myself", "end my life", "give up", "hopeless", "worthless",
            "आत्महत्या",
        ],
    },
];

/// Whole-message affirmations, matched by equality rather than containment.
pub const AFFIRMATIONS: &[&str] = &["yes", "yeah", "yep", "sure", "of course", "ok", "okay", "हाँ", "हां"];

/// Stateless, ordered keyword rule evaluator.
pub struct IntentDetector {
    rules: &'static [IntentRule],
}

impl Default for IntentDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentDetector {
    pub fn new() -> Self {
        Self {
            rules: INTENT_RULES,
        }
    }

    pub fn detect(&self, text: &str) -> Option<Intent> {
        let lower = text.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }

        let bare = lower.trim_end_matches(['!', '.', '?']);
        if AFFIRMATIONS.contains(&bare) {
            return Some(Intent::Affirm);
        }

        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|kw| contains_keyword(&lower, kw)))
            .map(|rule| rule.intent)
    }
}

/// Greeting tokens short enough to occur inside ordinary words ("this",
/// "they"). These must stand alone; every other keyword is a substring.
const STANDALONE_KEYWORDS: &[&str] = &["hi", "hey"];

/// Case-folded substring containment.
fn contains_keyword(lower: &str, keyword: &str) -> bool {
    if !STANDALONE_KEYWORDS.contains(&keyword) {
        return lower.contains(keyword);
    }

    lower.match_indices(keyword).any(|(start, matched)| {
        let end = start + matched.len();
        let before = lower[..start].chars().next_back();
        let after = lower[end..].chars().next();
        !before.is_some_and(|c| c.is_ascii_alphanumeric())
            && !after.is_some_and(|c| c.is_ascii_alphanumeric())
    })
}
