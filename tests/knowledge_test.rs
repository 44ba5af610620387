use wellbot::knowledge::{EntryKind, KnowledgeBase, KnowledgeError, SymptomIndex};
use wellbot::nlu::Language;

#[test]
fn builtin_knowledge_base_loads() {
    let kb = KnowledgeBase::builtin().expect("builtin kb");
    assert!(kb.conditions().count() >= 10);
    for topic in ["stress", "sleep", "exercise"] {
        let entry = kb.topic(topic).expect("lifestyle topic present");
        assert_eq!(entry.kind, EntryKind::Topic);
        assert!(entry.symptoms.is_empty());
        assert!(entry.treatment.has(Language::Hindi));
    }
}

#[test]
fn builtin_conditions_keep_file_order() {
    let kb = KnowledgeBase::builtin().unwrap();
    let names: Vec<&str> = kb.conditions().take(3).map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["common cold", "flu", "migraine"]);
}

#[test]
fn lookup_is_case_insensitive() {
    let kb = KnowledgeBase::builtin().unwrap();
    assert!(kb.get("Common Cold").is_some());
    assert!(kb.get("  FLU ").is_some());
    assert!(kb.get("plague").is_none());
    assert!(kb.topic("flu").is_none());
}

#[test]
fn localized_fields_fall_back_to_english() {
    let kb = KnowledgeBase::from_json_str(
        r#"{
            "cold": {
                "description": {"en": "A mild viral infection.", "hi": "एक हल्का वायरल संक्रमण।"},
                "symptoms": ["cough", "sneezing"],
                "treatment": {"en": ["Rest"]},
                "warning": "See a doctor if it lasts."
            }
        }"#,
    )
    .unwrap();

    let cold = kb.get("cold").unwrap();
    let description = cold.description.as_ref().unwrap();
    assert_eq!(description.get(Language::Hindi), "एक हल्का वायरल संक्रमण।");
    assert_eq!(description.get(Language::English), "A mild viral infection.");
    assert_eq!(cold.treatment.get(Language::Hindi), &vec!["Rest".to_string()]);
    assert_eq!(
        cold.warning.as_ref().unwrap().get(Language::Hindi),
        "See a doctor if it lasts."
    );
}

#[test]
fn missing_file_is_reported() {
    let err = KnowledgeBase::load("/nonexistent/kb.json").unwrap_err();
    assert!(matches!(err, KnowledgeError::Missing { .. }));
    assert!(err.to_string().contains("/nonexistent/kb.json"));
}

#[test]
fn unreadable_file_is_not_reported_as_missing() {
    let path = std::env::temp_dir().join(format!("wellbot-kb-binary-{}.json", std::process::id()));
    std::fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();

    let err = KnowledgeBase::load(&path).unwrap_err();
    let _ = std::fs::remove_file(&path);
    assert!(matches!(err, KnowledgeError::Unreadable { .. }), "{err}");
    assert!(err.to_string().starts_with("cannot read knowledge base at"));
}

#[test]
fn load_reads_json_from_disk() {
    let path = std::env::temp_dir().join(format!("wellbot-kb-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"cold": {"description": "Cold.", "symptoms": ["cough"], "treatment": ["Rest"]}}"#,
    )
    .unwrap();

    let kb = KnowledgeBase::load(&path).unwrap();
    assert_eq!(kb.entries().len(), 1);
    let _ = std::fs::remove_file(path);
}

#[test]
fn malformed_documents_are_rejected() {
    let cases = [
        ("not json", "invalid JSON"),
        (r#"{"stress": {"treatment": ["Breathe"]}}"#, "no condition"),
        (r#"{"cold": {"symptoms": ["cough"], "treatment": ["Rest"]}}"#, "missing a description"),
        (r#"{"cold": {"description": "x", "symptoms": [], "treatment": ["Rest"]}}"#, "empty symptom list"),
        (r#"{"cold": {"description": "x", "symptoms": ["cough"]}}"#, "missing a treatment"),
        (
            r#"{"cold": {"description": {"hi": "x"}, "symptoms": ["cough"], "treatment": ["Rest"]}}"#,
            "no 'en' fallback",
        ),
        (
            r#"{"cold": {"description": "x", "symptoms": ["cough"], "treatment": ["Rest"], "aliases": {"खांसी": "fever"}}}"#,
            "unknown symptom",
        ),
        (
            r#"{"cold": {"description": "x", "symptoms": ["cough"], "treatment": ["Rest"], "cure": "none"}}"#,
            "unknown field",
        ),
        (
            r#"{"Cold": {"description": "x", "symptoms": ["cough"], "treatment": ["Rest"]},
                "cold": {"description": "y", "symptoms": ["fever"], "treatment": ["Rest"]}}"#,
            "duplicate",
        ),
    ];

    for (json, expected) in cases {
        let err = KnowledgeBase::from_json_str(json).unwrap_err();
        assert!(matches!(err, KnowledgeError::Malformed { .. }), "{json}");
        assert!(
            err.to_string().contains(expected),
            "expected '{expected}' in '{err}'"
        );
    }
}

#[test]
fn index_maps_symptoms_to_conditions() {
    let kb = KnowledgeBase::builtin().unwrap();
    let index = SymptomIndex::build(&kb);

    let fever = index.conditions_for("fever").expect("fever indexed");
    assert!(fever.contains("flu"));
    assert!(fever.contains("dengue"));
    assert!(!fever.contains("migraine"));
    assert!(index.conditions_for("stress").is_none());
}

#[test]
fn index_vocabulary_is_deduplicated_in_first_seen_order() {
    let kb = KnowledgeBase::builtin().unwrap();
    let index = SymptomIndex::build(&kb);
    let vocabulary = index.vocabulary();

    assert_eq!(vocabulary.first().map(String::as_str), Some("runny nose"));
    let headaches = vocabulary.iter().filter(|s| *s == "headache").count();
    assert_eq!(headaches, 1);
    assert!(index.contains("headache"));
}

#[test]
fn match_symptoms_uses_substrings_and_aliases() {
    let kb = KnowledgeBase::builtin().unwrap();
    let index = SymptomIndex::build(&kb);

    assert_eq!(index.match_symptoms("I have a HEADACHE"), vec!["headache"]);
    assert_eq!(
        index.match_symptoms("a cough and a sore throat"),
        vec!["sore throat", "cough"]
    );
    assert_eq!(index.match_symptoms("मुझे बुखार है"), vec!["fever"]);
    assert!(index.match_symptoms("I feel great").is_empty());
}

#[test]
fn match_symptoms_does_not_duplicate_alias_targets() {
    let kb = KnowledgeBase::builtin().unwrap();
    let index = SymptomIndex::build(&kb);
    assert_eq!(index.match_symptoms("fever, बुखार"), vec!["fever"]);
}

#[test]
fn unreported_skips_known_symptoms() {
    let kb = KnowledgeBase::builtin().unwrap();
    let index = SymptomIndex::build(&kb);
    let reported = vec!["headache".to_string(), "fever".to_string()];

    let remaining: Vec<&String> = index.unreported(&reported).collect();
    assert_eq!(remaining.len(), index.vocabulary().len() - 2);
    assert!(!remaining.iter().any(|s| reported.contains(s)));
    assert_eq!(index.alias_for("fever"), Some("बुखार"));
}

#[test]
fn every_builtin_symptom_has_a_hindi_name() {
    let kb = KnowledgeBase::builtin().unwrap();
    let index = SymptomIndex::build(&kb);
    for symptom in index.vocabulary() {
        let alias = index.alias_for(symptom).unwrap_or_else(|| panic!("no Hindi alias for {symptom}"));
        assert!(!alias.chars().any(|c| c.is_ascii_alphabetic()), "{symptom} -> {alias}");
        assert_eq!(index.match_symptoms(alias), vec![symptom.clone()], "{alias}");
    }
}
