use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::nlu::{Entities, Intent};

/// Shared handle to a session store. One lock guards the whole map; a turn
/// holds it from start to finish so turns of one user never interleave.
pub type SharedSessions = Arc<Mutex<SessionStore>>;

/// In-memory per-user dialogue state. Sessions live until a diagnosis is
/// delivered or the user says goodbye; nothing expires them.
pub struct SessionStore {
    sessions: HashMap<String, Session>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user_id: String,
    /// Reported symptoms in insertion order, no duplicates.
    pub symptoms: Vec<String>,
    /// First value per kind wins.
    pub entities: Entities,
    pub last_intent: Option<Intent>,
    /// Symptom the bot last asked about, awaiting a yes.
    pub pending_suggestion: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub turn_count: u64,
}

impl Session {
    fn new(user_id: &str) -> Self {
        let now = chrono::Utc::now();
        Self {
            user_id: user_id.into(),
            symptoms: Vec::new(),
            entities: Entities::new(),
            last_intent: None,
            pending_suggestion: None,
            created_at: now,
            updated_at: now,
            turn_count: 0,
        }
    }

    /// No symptoms and no entities collected yet.
    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty() && self.entities.is_empty()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    pub fn shared() -> SharedSessions {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn get_or_create(&mut self, user_id: &str) -> &mut Session {
        self.sessions
            .entry(user_id.into())
            .or_insert_with(|| Session::new(user_id))
    }

    /// Merge symptoms (set semantics) and entities (kinds already set are kept).
    /// Returns how many symptoms were new.
    pub fn update(&mut self, user_id: &str, symptoms: &[String], entities: &Entities) -> usize {
        let session = self.get_or_create(user_id);
        let mut added = 0;

        for symptom in symptoms {
            let symptom = symptom.trim().to_lowercase();
            if !symptom.is_empty() && !session.symptoms.contains(&symptom) {
                session.symptoms.push(symptom);
                added += 1;
            }
        }

        for (kind, value) in entities {
            session.entities.entry(*kind).or_insert_with(|| value.clone());
        }

        session.turn_count += 1;
        session.updated_at = chrono::Utc::now();
        added
    }

    pub fn set_last_intent(&mut self, user_id: &str, intent: Option<Intent>) {
        if let Some(session) = self.sessions.get_mut(user_id) {
            session.last_intent = intent;
        }
    }

    pub fn set_pending_suggestion(&mut self, user_id: &str, symptom: Option<String>) {
        if let Some(session) = self.sessions.get_mut(user_id) {
            session.pending_suggestion = symptom;
        }
    }

    /// Remove and return the outstanding suggestion. A suggestion answers
    /// exactly one following turn.
    pub fn take_pending_suggestion(&mut self, user_id: &str) -> Option<String> {
        self.sessions
            .get_mut(user_id)
            .and_then(|s| s.pending_suggestion.take())
    }

    /// Forget a user's session. Clearing an unknown user is a no-op.
    pub fn clear(&mut self, user_id: &str) -> bool {
        self.sessions.remove(user_id).is_some()
    }

    pub fn symptoms_of(&self, user_id: &str) -> Vec<String> {
        self.sessions
            .get(user_id)
            .map(|s| s.symptoms.clone())
            .unwrap_or_default()
    }

    pub fn get(&self, user_id: &str) -> Option<&Session> {
        self.sessions.get(user_id)
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
