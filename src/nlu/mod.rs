//! Stateless text analysis: language, entities and intent.

pub mod classifier;
pub mod entities;
pub mod intent;
pub mod language;

pub use classifier::{IntentClassifier, NoopClassifier};
pub use entities::{Entities, EntityKind};
pub use intent::{Intent, IntentDetector};
pub use language::Language;
