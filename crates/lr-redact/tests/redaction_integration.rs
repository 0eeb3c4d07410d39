//! Integration tests for lr-redact.
//!
//! These tests verify:
//! - Canary PII never leaks through the filter in any locale
//! - Reference scenarios produce the exact expected output
//! - Recognizer failures fall back to whole-message redaction
//! - A shared filter gives identical results across threads

use std::sync::Arc;
use std::thread;

use lr_redact::{
    Anonymizer, CustomPattern, DiagnosticEvent, EntityKind, FallbackCause, Locale, MemorySink,
    Recognizer, RecognizerFailure, RecognizerRegistry, RedactionFilter, RegistryConfig, Span,
    FALLBACK_PLACEHOLDER,
};

/// Messages with the PII that must never survive redaction, per locale.
const CANARIES: &[(Locale, &str, &[&str])] = &[
    (
        Locale::EnUs,
        "User Sarah Connor (ssn 123-45-6789) called from (555) 123-4567",
        &["Sarah", "Connor", "123-45-6789", "123-4567"],
    ),
    (
        Locale::EnUs,
        "Dr. Okonkwo paged +1 555.123.4567 about ticket 4411",
        &["Okonkwo", "555.123.4567"],
    ),
    (
        Locale::EnGb,
        "Ring Emily Parker on 020 7946 0958, NI number AB 12 34 56 C",
        &["Emily", "Parker", "7946", "AB 12 34 56 C"],
    ),
    (
        Locale::EnGb,
        "mobile +44 7700 900123 for jane@example.co.uk",
        &["7700", "jane@example.co.uk"],
    ),
    (
        Locale::DeDe,
        "Herr Jürgen Müller, Tel. 030 1234567, Steuer-ID 86095742719",
        &["Jürgen", "Müller", "1234567", "86095742719"],
    ),
    (
        Locale::DeDe,
        "Frau Schmidt erreichbar unter +49 171 1234567",
        &["Schmidt", "171 1234567"],
    ),
    (
        Locale::HeIl,
        "Yael Cohen, ת.ז. 123456782, נייד 050-123-4567",
        &["Yael", "Cohen", "123456782", "050-123-4567"],
    ),
];

fn filter_for(locale: Locale) -> RedactionFilter {
    RedactionFilter::from_config(&RegistryConfig::default().locale(locale)).unwrap()
}

#[test]
fn test_canaries_never_leak() {
    for (locale, message, secrets) in CANARIES {
        let out = filter_for(*locale).process(message);
        for secret in *secrets {
            assert!(
                !out.contains(secret),
                "{} leaked in {} output: {}",
                secret,
                locale,
                out
            );
        }
    }
}

#[test]
fn test_reference_scenario() {
    let filter = filter_for(Locale::EnUs);
    let result = filter.redact("Contact John Doe at john.doe@example.com or 555-123-4567");
    assert_eq!(
        result.text,
        "Contact <PERSON> at <EMAIL_ADDRESS> or <PHONE_NUMBER>"
    );
    let kinds: Vec<EntityKind> = result.applied.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![EntityKind::Person, EntityKind::Email, EntityKind::Phone]
    );
    assert!(!result.fallback);
}

#[test]
fn test_locale_outputs() {
    let cases = [
        (
            Locale::EnUs,
            "User Sarah Connor (ssn 123-45-6789) called from (555) 123-4567",
            "User <PERSON> (ssn <NATIONAL_ID>) called from <PHONE_NUMBER>",
        ),
        (
            Locale::EnGb,
            "Ring Emily Parker on 020 7946 0958, NI number AB 12 34 56 C",
            "Ring <PERSON> on <PHONE_NUMBER>, NI number <NATIONAL_ID>",
        ),
        (
            Locale::DeDe,
            "Herr Jürgen Müller, Tel. 030 1234567, Steuer-ID 86095742719",
            "Herr <PERSON>, Tel. <PHONE_NUMBER>, Steuer-ID <NATIONAL_ID>",
        ),
        (
            Locale::HeIl,
            "Yael Cohen, ת.ז. 123456782, נייד 050-123-4567",
            "<PERSON>, ת.ז. <NATIONAL_ID>, נייד <PHONE_NUMBER>",
        ),
    ];
    for (locale, input, expected) in cases {
        assert_eq!(filter_for(locale).process(input), expected, "locale {}", locale);
    }
}

#[test]
fn test_operational_text_untouched() {
    let filter = filter_for(Locale::EnUs);
    for message in [
        "build 2024-01-15 finished in 1234 ms",
        "IP 10.0.0.1 port 8080 pid 4242",
        "Will the job finish by May?",
        "Meeting with Mark at noon",
    ] {
        assert_eq!(filter.process(message), message);
    }
}

#[test]
fn test_national_id_grammar_is_locale_specific() {
    assert_eq!(
        filter_for(Locale::EnGb).process("ssn 123-45-6789"),
        "ssn 123-45-6789"
    );
    assert_eq!(
        filter_for(Locale::EnUs).process("NI AB 12 34 56 C"),
        "NI AB 12 34 56 C"
    );
}

#[test]
fn test_entity_kind_selection() {
    let filter =
        RedactionFilter::from_config(&RegistryConfig::with_kinds([EntityKind::Phone])).unwrap();
    assert_eq!(
        filter.process("contact john.doe@example.com or 555-123-4567"),
        "contact john.doe@example.com or <PHONE_NUMBER>"
    );
}

#[test]
fn test_extra_names_and_custom_patterns() {
    let mut config = RegistryConfig::default().custom_pattern(CustomPattern::new(
        "employee_id",
        EntityKind::NationalId,
        r"\bEMP-\d{6}\b",
        1.0,
    ));
    config.extra_names.push("Zoran".to_string());
    let filter = RedactionFilter::from_config(&config).unwrap();
    assert_eq!(
        filter.process("Zoran Petrovic badge EMP-004211 logged in"),
        "<PERSON> badge <NATIONAL_ID> logged in"
    );
}

#[test]
fn test_min_score_zero_keeps_weak_names() {
    let filter = RedactionFilter::from_config(&RegistryConfig::default().min_score(0.0)).unwrap();
    assert_eq!(filter.process("see you in May"), "see you in <PERSON>");
}

#[test]
fn test_empty_pattern_matches_are_ignored() {
    let sink = Arc::new(MemorySink::new());
    let config = RegistryConfig::default().custom_pattern(CustomPattern::new(
        "digit_lines",
        EntityKind::NationalId,
        r"(?m)^\d*$",
        1.0,
    ));
    let registry = RecognizerRegistry::from_config(&config).unwrap();
    let filter = RedactionFilter::new(Arc::new(registry), Anonymizer::default(), sink.clone())
        .unwrap();

    let result = filter.redact("call 555-123-4567\n\nthanks");
    assert!(!result.fallback);
    assert_eq!(result.text, "call <PHONE_NUMBER>\n\nthanks");
    assert!(sink.is_empty());
}

#[test]
fn test_overlapping_name_and_email_merge() {
    let filter = filter_for(Locale::EnUs);
    let result = filter.redact("Sarah Doe@example.com");
    assert_eq!(result.text, "<EMAIL_ADDRESS>");
    assert_eq!(result.applied.len(), 1);
    assert_eq!(result.applied.as_slice()[0].kind, EntityKind::Email);
}

#[test]
fn test_output_is_idempotent() {
    for (locale, message, _) in CANARIES {
        let filter = filter_for(*locale);
        let once = filter.process(message);
        assert_eq!(filter.process(&once), once, "locale {}", locale);
    }
}

#[test]
fn test_placeholders_never_match_builtins() {
    let anonymizer = Anonymizer::default();
    for locale in Locale::ALL {
        let registry = RecognizerRegistry::from_config(
            &RegistryConfig::default().locale(*locale).min_score(0.0),
        )
        .unwrap();
        for placeholder in anonymizer.all_placeholders() {
            let report = registry.scan(placeholder).unwrap();
            assert!(
                report.candidates.is_empty(),
                "{} matched in {}",
                placeholder,
                locale
            );
        }
    }
}

#[test]
fn test_output_ranges_point_at_placeholders() {
    let filter = filter_for(Locale::EnUs);
    let result = filter.redact("Contact John Doe at john.doe@example.com or 555-123-4567");
    let ranges = filter.anonymizer().output_ranges(&result);
    let found: Vec<&str> = ranges.iter().map(|r| &result.text[r.clone()]).collect();
    assert_eq!(found, vec!["<PERSON>", "<EMAIL_ADDRESS>", "<PHONE_NUMBER>"]);
}

/// Recognizer whose backend is unavailable for real messages.
struct Unavailable;

impl Recognizer for Unavailable {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Person
    }

    fn scan(&self, text: &str) -> Result<Vec<Span>, RecognizerFailure> {
        if text.starts_with('<') && text.ends_with('>') {
            return Ok(Vec::new());
        }
        Err(RecognizerFailure::new("unavailable", "backend offline"))
    }
}

#[test]
fn test_recognizer_failure_redacts_everything() {
    let sink = Arc::new(MemorySink::new());
    let registry = RecognizerRegistry::for_locale(Locale::EnUs)
        .unwrap()
        .with_recognizer(Arc::new(Unavailable));
    let filter = RedactionFilter::new(Arc::new(registry), Anonymizer::default(), sink.clone())
        .unwrap();

    let message = "Contact John Doe at john.doe@example.com";
    assert_eq!(filter.process(message), FALLBACK_PLACEHOLDER);
    assert_eq!(sink.len(), 1);

    match &sink.events()[0] {
        DiagnosticEvent::Fallback { cause, input_bytes } => {
            assert_eq!(*input_bytes, message.len());
            match cause {
                FallbackCause::RecognizerFailures(failures) => {
                    assert_eq!(failures.len(), 1);
                    assert_eq!(failures[0].recognizer, "unavailable");
                }
                other => panic!("unexpected cause: {:?}", other),
            }
        }
    }

    // the diagnostic never carries message text
    let json = format!("{:?}", sink.events());
    assert!(!json.contains("John"));
    assert!(!json.contains("example.com"));
}

#[test]
fn test_empty_message_skips_scanning() {
    let sink = Arc::new(MemorySink::new());
    let registry = RecognizerRegistry::empty(Locale::EnUs).with_recognizer(Arc::new(Unavailable));
    let filter = RedactionFilter::new(Arc::new(registry), Anonymizer::default(), sink.clone())
        .unwrap();
    let result = filter.redact("");
    assert_eq!(result.text, "");
    assert!(!result.fallback);
    assert!(sink.is_empty());
}

#[test]
fn test_concurrent_processing_is_consistent() {
    let filter = Arc::new(filter_for(Locale::EnUs));
    let message = "Contact John Doe at john.doe@example.com or 555-123-4567";
    let expected = filter.process(message);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let filter = Arc::clone(&filter);
            thread::spawn(move || (0..50).map(|_| filter.process(message)).collect::<Vec<_>>())
        })
        .collect();

    for handle in handles {
        for out in handle.join().unwrap() {
            assert_eq!(out, expected);
        }
    }
}
