use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Mutex;

use crate::nlu::Language;

/// Families of interchangeable canned replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    Greeting,
    Farewell,
    /// Asked while fewer than two symptoms are known.
    TellMeMore,
    /// Diagnosis requested without enough symptoms.
    NeedSymptoms,
    /// Opening of the generic fallback.
    NeedMoreInfo,
    /// Closing of the generic fallback.
    Filler,
}

impl Phrase {
    pub fn variants(&self, language: Language) -> &'static [&'static str] {
        match (self, language) {
            (Self::Greeting, Language::English) => &[
                "👋 Hello! I'm WellBot. How are you feeling today?",
                "Hi there! 😊 I'm here to help. Tell me how you are feeling.",
                "Hey! I'm WellBot, your wellness companion. What's bothering you today?",
            ],
            (Self::Greeting, Language::Hindi) => &[
                "👋 नमस्ते! मैं वेलबॉट हूँ। आज आप कैसा महसूस कर रहे हैं?",
                "नमस्ते! 😊 मैं आपकी मदद के लिए यहाँ हूँ। बताइए आप कैसा महसूस कर रहे हैं।",
                "नमस्कार! मैं वेलबॉट हूँ। आज आपको क्या परेशानी है?",
            ],
            (Self::Farewell, Language::English) => &[
                "Goodbye! 👋 Take care of yourself.",
                "See you later! Stay healthy 🌟",
                "Bye for now! I'm here whenever you need me.",
            ],
            (Self::Farewell, Language::Hindi) => &[
                "अलविदा! 👋 अपना ख्याल रखें।",
                "फिर मिलेंगे! स्वस्थ रहें 🌟",
                "अभी के लिए अलविदा! जब भी ज़रूरत हो, मैं यहाँ हूँ।",
            ],
            (Self::TellMeMore, Language::English) => &[
                "🩺 Thanks for sharing. Can you tell me about any other symptoms?",
                "I see. Are you experiencing anything else?",
                "Got it. What other symptoms have you noticed?",
            ],
            (Self::TellMeMore, Language::Hindi) => &[
                "🩺 बताने के लिए धन्यवाद। क्या आपको कोई और लक्षण है?",
                "समझ गया। क्या आप कुछ और भी महसूस कर रहे हैं?",
                "ठीक है। आपने और कौन से लक्षण देखे हैं?",
            ],
            (Self::NeedSymptoms, Language::English) => &[
                "🤔 I need to know a few of your symptoms first. What are you feeling?",
                "Please tell me at least two symptoms so I can suggest possible conditions.",
            ],
            (Self::NeedSymptoms, Language::Hindi) => &[
                "🤔 पहले मुझे आपके कुछ लक्षण जानने होंगे। आप क्या महसूस कर रहे हैं?",
                "कृपया कम से कम दो लक्षण बताएं ताकि मैं संभावित बीमारियाँ बता सकूं।",
            ],
            (Self::NeedMoreInfo, Language::English) => &[
                "I need a bit more information to help you.",
            ],
            (Self::NeedMoreInfo, Language::Hindi) => &[
                "आपकी मदद के लिए मुझे थोड़ी और जानकारी चाहिए।",
            ],
            (Self::Filler, Language::English) => &[
                "Can you describe your symptoms?",
                "You can also ask me about stress, sleep or exercise.",
                "Tell me more about how you are feeling.",
            ],
            (Self::Filler, Language::Hindi) => &[
                "क्या आप अपने लक्षण बता सकते हैं?",
                "आप मुझसे तनाव, नींद या व्यायाम के बारे में भी पूछ सकते हैं।",
                "मुझे बताइए कि आप कैसा महसूस कर रहे हैं।",
            ],
        }
    }
}

pub fn suggest_symptom(symptom: &str, language: Language) -> String {
    match language {
        Language::English => format!("🤔 Do you also have {symptom}?"),
        Language::Hindi => format!("🤔 क्या आपको {symptom} भी है?"),
    }
}

pub fn follow_up_lead(topic: &str, language: Language) -> String {
    match language {
        Language::English => format!("Since you mentioned {topic} earlier, here is what can help:"),
        Language::Hindi => "आपने पहले जो बताया था, उसके लिए ये सुझाव मदद कर सकते हैं:".to_string(),
    }
}

pub const DISCLAIMER: &str = "⚕️ Disclaimer: I am not a doctor. This is general information, not a medical diagnosis. Please consult a healthcare professional.";

/// Uniform random choice among phrase variants.
///
/// Seed it for reproducible conversations; the default draws from OS entropy.
pub struct PhrasePicker {
    rng: Mutex<StdRng>,
}

impl PhrasePicker {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::seeded)
    }

    pub fn pick(&self, phrase: Phrase, language: Language) -> &'static str {
        self.choose(phrase.variants(language)).copied().unwrap_or_default()
    }

    pub fn choose<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        items.choose(&mut *rng)
    }
}

impl Default for PhrasePicker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_pickers_agree() {
        let a = PhrasePicker::seeded(7);
        let b = PhrasePicker::seeded(7);
        for _ in 0..10 {
            assert_eq!(
                a.pick(Phrase::Greeting, Language::English),
                b.pick(Phrase::Greeting, Language::English)
            );
        }
    }

    #[test]
    fn every_family_has_both_languages() {
        for phrase in [
            Phrase::Greeting,
            Phrase::Farewell,
            Phrase::TellMeMore,
            Phrase::NeedSymptoms,
            Phrase::NeedMoreInfo,
            Phrase::Filler,
        ] {
            assert!(!phrase.variants(Language::English).is_empty());
            assert!(!phrase.variants(Language::Hindi).is_empty());
        }
    }
}
