/// A learned intent classifier consulted only when the keyword rules find nothing.
///
/// Implementations return a label understood by
/// [`Intent::from_label`](super::Intent::from_label); unknown labels are ignored.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Option<String>;
}

/// Default classifier: never produces a label.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClassifier;

impl IntentClassifier for NoopClassifier {
    fn classify(&self, _text: &str) -> Option<String> {
        None
    }
}
