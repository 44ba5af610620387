use serde::{Deserialize, Serialize};
use std::fmt;

/// Reply language. Detected per message, never carried across turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
}

impl Language {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Hindi if any code point falls in the Devanagari block, English otherwise.
pub fn detect(text: &str) -> Language {
    if text.chars().any(is_devanagari) {
        Language::Hindi
    } else {
        Language::English
    }
}

fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}
