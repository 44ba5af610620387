//! Multi-turn symptom dialogue.
//!
//! A conversation moves EMPTY → GREETED → COLLECTING (one symptom) →
//! CONFIRMING (two or more, weak match) → DIAGNOSED, after which the session
//! is cleared. Goodbye clears it from any state.
//!
//! While CONFIRMING, the bot asks about one more symptom. A bare "yes" adds
//! it to the session; any other unmatched reply gets a different suggestion.

pub mod format;
pub mod phrases;

use std::sync::{Arc, MutexGuard};
use tracing::{debug, info};

use crate::config::DialogueConfig;
use crate::diagnosis;
use crate::knowledge::{KnowledgeBase, SymptomIndex};
use crate::nlu::{entities, language, Entities, Intent, IntentClassifier, IntentDetector, Language};
use crate::store::{SessionStore, SharedSessions};
use crate::types::{TurnOutcome, TurnReply};

use self::format::{FormatMode, DEFAULT_SYMPTOM_CAP};
use self::phrases::{Phrase, PhrasePicker};

/// Number of conditions named in a diagnosis unless configured otherwise.
pub const DEFAULT_MAX_CANDIDATES: usize = 3;

pub struct DialogueController {
    kb: Arc<KnowledgeBase>,
    index: Arc<SymptomIndex>,
    intents: IntentDetector,
    sessions: SharedSessions,
    phrases: PhrasePicker,
    classifier: Option<Box<dyn IntentClassifier>>,
    max_candidates: usize,
    symptom_list_cap: usize,
}

impl DialogueController {
    pub fn new(kb: Arc<KnowledgeBase>, sessions: SharedSessions) -> Self {
        let index = Arc::new(SymptomIndex::build(&kb));
        Self {
            kb,
            index,
            intents: IntentDetector::new(),
            sessions,
            phrases: PhrasePicker::new(),
            classifier: None,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            symptom_list_cap: DEFAULT_SYMPTOM_CAP,
        }
    }

    /// Apply `[dialogue]` settings, including the phrase seed.
    pub fn with_config(mut self, config: &DialogueConfig) -> Self {
        self.max_candidates = config.max_candidates;
        self.symptom_list_cap = config.symptom_list_cap;
        self.phrases = PhrasePicker::from_seed(config.rng_seed);
        self
    }

    pub fn with_phrases(mut self, phrases: PhrasePicker) -> Self {
        self.phrases = phrases;
        self
    }

    /// Fallback consulted only when no keyword rule matches.
    pub fn with_classifier(mut self, classifier: Box<dyn IntentClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn kb(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn index(&self) -> &SymptomIndex {
        &self.index
    }

    pub fn sessions(&self) -> &SharedSessions {
        &self.sessions
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.lock_sessions().count()
    }

    /// Drop a user's session. Returns whether one existed.
    pub fn reset(&self, user_id: &str) -> bool {
        self.lock_sessions().clear(user_id)
    }

    /// Reply text for one message.
    pub fn handle_turn(&self, user_id: &str, message: &str) -> String {
        self.handle(user_id, message).reply
    }

    /// Process one message and report how it was handled.
    ///
    /// The session lock is held for the whole turn, so turns of one user are
    /// applied one at a time. Never fails; callers reject empty messages.
    pub fn handle(&self, user_id: &str, message: &str) -> TurnReply {
        let language = language::detect(message);
        let intent = self.detect_intent(message);
        debug!(user_id, %language, intent = ?intent, "dialogue turn");

        let mut store = self.lock_sessions();
        let turn = Turn {
            user_id,
            language,
            intent,
        };

        match intent {
            Some(Intent::Greet) => {
                store.get_or_create(user_id);
                return turn.reply(self.phrases.pick(Phrase::Greeting, language), TurnOutcome::Greeted);
            }
            Some(Intent::Goodbye) => {
                let had_session = store.clear(user_id);
                info!(user_id, had_session, "session closed by user");
                return turn.reply(self.phrases.pick(Phrase::Farewell, language), TurnOutcome::Farewell);
            }
            _ => {}
        }

        let mut mentioned = self.index.match_symptoms(message);
        let mut pending = store.take_pending_suggestion(user_id);
        if intent == Some(Intent::Affirm) {
            if let Some(symptom) = pending.take() {
                debug!(user_id, symptom = %symptom, "suggestion confirmed");
                if !mentioned.contains(&symptom) {
                    mentioned.push(symptom);
                }
            }
        }
        let found = entities::extract(message);
        let previous_intent = store.get(user_id).and_then(|s| s.last_intent);
        let added = store.update(user_id, &mentioned, &found);
        store.set_last_intent(user_id, intent);

        let symptoms = store.symptoms_of(user_id);
        debug!(user_id, mentioned = mentioned.len(), added, total = symptoms.len(), "symptoms merged");

        if !mentioned.is_empty() {
            if symptoms.len() < diagnosis::MIN_SYMPTOMS {
                return turn.reply(self.phrases.pick(Phrase::TellMeMore, language), TurnOutcome::CollectingSymptoms);
            }

            let ranked = diagnosis::rank(&symptoms, &self.kb);
            if diagnosis::is_confident(&ranked, symptoms.len()) || intent == Some(Intent::DiagnosisQuery) {
                return self.diagnose(&mut store, &turn, &ranked);
            }

            return match self.suggest_symptom(&mut store, &turn, &symptoms, None) {
                Some(text) => turn.reply(text, TurnOutcome::SuggestedSymptom),
                None => turn.reply(self.phrases.pick(Phrase::TellMeMore, language), TurnOutcome::CollectingSymptoms),
            };
        }

        if let Some(reply) = intent.and_then(|i| self.topic_tips(i, language)) {
            return turn.reply(reply, TurnOutcome::TopicTips);
        }

        if intent == Some(Intent::DiagnosisQuery) {
            if symptoms.len() < diagnosis::MIN_SYMPTOMS {
                return turn.reply(self.phrases.pick(Phrase::NeedSymptoms, language), TurnOutcome::NeedSymptoms);
            }
            let ranked = diagnosis::rank(&symptoms, &self.kb);
            return self.diagnose(&mut store, &turn, &ranked);
        }

        if intent == Some(Intent::FollowUp) {
            let tips = previous_intent.and_then(|prev| {
                let topic = prev.topic()?;
                let block = self.topic_tips(prev, language)?;
                Some(format!("{}\n{block}", phrases::follow_up_lead(topic, language)))
            });
            if let Some(reply) = tips {
                return turn.reply(reply, TurnOutcome::FollowUp);
            }
        }

        if let Some(declined) = pending {
            if symptoms.len() >= diagnosis::MIN_SYMPTOMS {
                if let Some(text) = self.suggest_symptom(&mut store, &turn, &symptoms, Some(declined.as_str())) {
                    return turn.reply(text, TurnOutcome::SuggestedSymptom);
                }
            }
        }

        let reply = format!(
            "{} {}",
            self.phrases.pick(Phrase::NeedMoreInfo, language),
            self.phrases.pick(Phrase::Filler, language)
        );
        turn.reply(reply, TurnOutcome::Fallback)
    }

    fn detect_intent(&self, message: &str) -> Option<Intent> {
        self.intents.detect(message).or_else(|| {
            let label = self.classifier.as_ref()?.classify(message)?;
            let intent = Intent::from_label(&label);
            debug!(label = %label, resolved = ?intent, "classifier fallback");
            intent
        })
    }

    fn topic_tips(&self, intent: Intent, language: Language) -> Option<String> {
        let entry = self.kb.topic(intent.topic()?)?;
        Some(format::format_capped(entry, language, FormatMode::Topic, self.symptom_list_cap))
    }

    /// Ask about one unreported symptom, other than `skip`, and remember it
    /// so a "yes" on the next turn can confirm it.
    fn suggest_symptom(
        &self,
        store: &mut SessionStore,
        turn: &Turn<'_>,
        reported: &[String],
        skip: Option<&str>,
    ) -> Option<String> {
        let remaining: Vec<&String> = self
            .index
            .unreported(reported)
            .filter(|s| Some(s.as_str()) != skip)
            .collect();
        let symptom = self.phrases.choose(&remaining)?;
        let shown = match turn.language {
            Language::Hindi => self.index.alias_for(symptom).unwrap_or(symptom.as_str()),
            Language::English => symptom.as_str(),
        };
        let text = phrases::suggest_symptom(shown, turn.language);
        store.set_pending_suggestion(turn.user_id, Some(symptom.to_string()));
        Some(text)
    }

    /// Format the top candidates and close the session.
    fn diagnose(
        &self,
        store: &mut SessionStore,
        turn: &Turn<'_>,
        ranked: &[diagnosis::Candidate],
    ) -> TurnReply {
        if ranked.is_empty() {
            return turn.reply(self.phrases.pick(Phrase::NeedSymptoms, turn.language), TurnOutcome::NeedSymptoms);
        }

        let entities: Entities = store
            .get(turn.user_id)
            .map(|s| s.entities.clone())
            .unwrap_or_default();
        let names: Vec<&str> = ranked
            .iter()
            .take(self.max_candidates)
            .map(|c| c.name.as_str())
            .collect();

        let reply = format::format_diagnosis(&self.kb, &names, turn.language, &entities, self.symptom_list_cap);
        store.clear(turn.user_id);
        info!(
            user_id = turn.user_id,
            candidates = ?names,
            top_overlap = ranked[0].overlap,
            "diagnosis delivered"
        );
        turn.reply(reply, TurnOutcome::Diagnosed)
    }

    fn lock_sessions(&self) -> MutexGuard<'_, SessionStore> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct Turn<'a> {
    user_id: &'a str,
    language: Language,
    intent: Option<Intent>,
}

impl Turn<'_> {
    fn reply(&self, reply: impl Into<String>, outcome: TurnOutcome) -> TurnReply {
        TurnReply {
            reply: reply.into(),
            language: self.language,
            intent: self.intent,
            outcome,
        }
    }
}
