//! Integration tests for the rule-based annotation engine

use deid::anonymization::config::{EngineConfig, PlaceholderStyle};
use deid::anonymization::models::{AnnotationRequest, EntityCategory, PatientMetadata};
use deid::anonymization::{AnnotationEngine, RuleBasedEngine};
use deid::domain::EngineError;
use std::fs;
use tempfile::tempdir;
use test_case::test_case;

fn engine() -> RuleBasedEngine {
    RuleBasedEngine::new(EngineConfig::default()).unwrap()
}

fn deidentify(text: &str) -> String {
    engine().annotate(&AnnotationRequest::new(text)).unwrap().text
}

#[test_case("Op 20 maart 2021 gezien", "Op [DATUM-1] gezien" ; "written date")]
#[test_case("Controle 2021-03-20.", "Controle [DATUM-1]." ; "iso date")]
#[test_case("Van 01-02-2020 tot 03-04-2021", "Van [DATUM-1] tot [DATUM-2]" ; "two dates")]
#[test_case("Patiënt is 64 jaar oud", "Patiënt is [LEEFTIJD-1] jaar oud" ; "age keeps unit")]
#[test_case("Bel 06-12345678", "Bel [TELEFOONNUMMER-1]" ; "mobile number")]
#[test_case("Mail naar info@example.com.", "Mail naar [EMAIL-1]." ; "email")]
#[test_case("Zie https://www.example.com/pagina.", "Zie [URL-1]." ; "url without trailing dot")]
#[test_case("BSN 111222333 bekend", "BSN [BSN-1] bekend" ; "valid bsn")]
#[test_case("Nummer 123456789 bekend", "Nummer 123456789 bekend" ; "bsn failing eleven check")]
#[test_case("Woont in 1234 AB Amsterdam", "Woont in [LOCATIE-1] Amsterdam" ; "postal code")]
#[test_case("Geen bijzonderheden.", "Geen bijzonderheden." ; "nothing to replace")]
fn test_pattern_categories(input: &str, expected: &str) {
    assert_eq!(deidentify(input), expected);
}

#[test]
fn test_same_value_keeps_number() {
    assert_eq!(
        deidentify("Gezien 20-03-2021, terug 21-03-2021, vervolg 20-03-2021"),
        "Gezien [DATUM-1], terug [DATUM-2], vervolg [DATUM-1]"
    );
}

#[test]
fn test_lowercase_surname_is_kept() {
    let request = AnnotationRequest::new("Mevrouw Jong voelt zich weer jong.")
        .with_patient(PatientMetadata::new().with_first_names("Anna Maria").with_surname("Jong"));

    let result = engine().annotate(&request).unwrap();

    assert_eq!(result.text, "Mevrouw [PATIENT] voelt zich weer jong.");
    assert_eq!(result.total_annotations(), 1);
}

#[test]
fn test_initial_and_surname_merge_into_one_placeholder() {
    let patient = PatientMetadata::new()
        .with_first_names("Jan")
        .with_initials("J.")
        .with_surname("Jansen");
    let request = AnnotationRequest::new("De heer J. Jansen is ontslagen.").with_patient(patient);

    let result = engine().annotate(&request).unwrap();

    assert_eq!(result.text, "De heer [PATIENT] is ontslagen.");
}

#[test]
fn test_surname_in_capitals() {
    let patient = PatientMetadata::new().with_surname("Hartsuiker");
    let request = AnnotationRequest::new("Brief aan HARTSUIKER verstuurd").with_patient(patient);

    let result = engine().annotate(&request).unwrap();

    assert_eq!(result.text, "Brief aan [PATIENT] verstuurd");
}

#[test_case("JANSEN", "De heer Jansen is ontslagen.", "De heer [PATIENT] is ontslagen." ; "stored in capitals")]
#[test_case("jansen", "De heer Jansen is ontslagen.", "De heer [PATIENT] is ontslagen." ; "stored in lower case")]
#[test_case("de Jong", "Mevrouw De Jong belde.", "Mevrouw [PATIENT] belde." ; "particle capitalised")]
#[test_case("Jong", "Mevrouw JONG voelt zich jong.", "Mevrouw [PATIENT] voelt zich jong." ; "lower case word kept")]
fn test_surname_casing(surname: &str, text: &str, expected: &str) {
    let request = AnnotationRequest::new(text).with_patient(PatientMetadata::new().with_surname(surname));

    assert_eq!(engine().annotate(&request).unwrap().text, expected);
}

#[test]
fn test_capitals_rendering_next_to_punctuation() {
    let patient = PatientMetadata::new()
        .with_first_names("Peter John")
        .with_initials("P.J.")
        .with_surname("Rabbit")
        .with_surname_capitals("RABBIT,P.");
    let request = AnnotationRequest::new(
        "Patient name: RABBIT,P. His compound uppercase name is RABBIT,P!",
    )
    .with_patient(patient);

    let result = engine().annotate(&request).unwrap();

    assert_eq!(
        result.text,
        "Patient name: [PATIENT]. His compound uppercase name is [PATIENT]!"
    );
}

#[test_case(&["dates"], "Jan Jansen, [LEEFTIJD-1] jaar, gezien op 20 maart 2021" ; "dates disabled")]
#[test_case(&["names"], "Jan Jansen, [LEEFTIJD-1] jaar, gezien op [DATUM-1]" ; "names disabled")]
#[test_case(&["names", "dates", "ages"], "Jan Jansen, 64 jaar, gezien op 20 maart 2021" ; "all present groups disabled")]
#[test_case(&["unknown_group"], "[PATIENT], [LEEFTIJD-1] jaar, gezien op [DATUM-1]" ; "unknown group ignored")]
fn test_disabled_groups(disabled: &[&str], expected: &str) {
    let request = AnnotationRequest::new("Jan Jansen, 64 jaar, gezien op 20 maart 2021")
        .with_patient(PatientMetadata::new().with_first_names("Jan").with_surname("Jansen"))
        .with_disabled(disabled.iter().copied());

    let result = engine().annotate(&request).unwrap();

    assert_eq!(result.text, expected);
}

#[test]
fn test_configured_disabled_groups_apply_to_every_request() {
    let config = EngineConfig {
        disabled: vec!["phone_numbers".to_string()],
        ..EngineConfig::default()
    };
    let engine = RuleBasedEngine::new(config).unwrap();

    let result = engine
        .annotate(&AnnotationRequest::new("Bel 06-12345678 op 20-03-2021"))
        .unwrap();

    assert_eq!(result.text, "Bel 06-12345678 op [DATUM-1]");
}

#[test]
fn test_unknown_configured_group_is_rejected() {
    let config = EngineConfig {
        disabled: vec!["birthdays".to_string()],
        ..EngineConfig::default()
    };
    assert!(RuleBasedEngine::new(config).is_err());
}

#[test]
fn test_redact_style_drops_numbers() {
    let config = EngineConfig {
        strategy: PlaceholderStyle::Redact,
        ..EngineConfig::default()
    };
    let engine = RuleBasedEngine::new(config).unwrap();

    let result = engine
        .annotate(&AnnotationRequest::new("Van 01-02-2020 tot 03-04-2021"))
        .unwrap();

    assert_eq!(result.text, "Van [DATUM] tot [DATUM]");
}

#[test]
fn test_custom_pattern_library_replaces_builtin() {
    let dir = tempdir().unwrap();
    let library = dir.path().join("cities.toml");
    fs::write(
        &library,
        r#"
[patterns.city]
category = "location"
patterns = ['\bAmsterdam\b']
"#,
    )
    .unwrap();

    let config = EngineConfig {
        pattern_library: Some(library),
        ..EngineConfig::default()
    };
    let engine = RuleBasedEngine::new(config).unwrap();

    let result = engine
        .annotate(&AnnotationRequest::new("Woont in Amsterdam sinds 20 maart 2021"))
        .unwrap();

    assert_eq!(result.text, "Woont in [LOCATIE-1] sinds 20 maart 2021");
}

#[test]
fn test_oversized_text_is_invalid_input() {
    let config = EngineConfig {
        max_text_bytes: 16,
        ..EngineConfig::default()
    };
    let engine = RuleBasedEngine::new(config).unwrap();

    let err = engine
        .annotate(&AnnotationRequest::new("Deze tekst is langer dan zestien bytes"))
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[test]
fn test_annotations_report_original_offsets() {
    let text = "Bel 06-12345678 vandaag";
    let result = engine().annotate(&AnnotationRequest::new(text)).unwrap();

    assert_eq!(result.annotations.len(), 1);
    let annotation = &result.annotations[0];
    assert_eq!(annotation.category, EntityCategory::PhoneNumber);
    assert_eq!(&text[annotation.start..annotation.end], "06-12345678");
}
