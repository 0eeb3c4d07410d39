//! Fuzz target for the redaction filter.
//!
//! Arbitrary text in any locale must redact without panicking, redacting
//! the output again must change nothing, and the output may only grow by
//! the placeholders it substitutes.

#![no_main]

use std::sync::OnceLock;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lr_redact::{Locale, NoopSink, RedactionFilter, RegistryConfig};

#[derive(Debug, Arbitrary)]
struct Input {
    locale: u8,
    strict: bool,
    text: String,
}

static FILTERS: OnceLock<Vec<RedactionFilter>> = OnceLock::new();

fn filters() -> &'static [RedactionFilter] {
    FILTERS.get_or_init(|| {
        let mut filters = Vec::new();
        for &locale in Locale::ALL {
            for min_score in [lr_redact::DEFAULT_MIN_SCORE, 0.0] {
                let config = RegistryConfig::default().locale(locale).min_score(min_score);
                let filter = RedactionFilter::from_config(&config)
                    .expect("built-in configuration must build")
                    .with_diagnostics(std::sync::Arc::new(NoopSink));
                filters.push(filter);
            }
        }
        filters
    })
}

fuzz_target!(|input: Input| {
    let all = filters();
    let index = (input.locale as usize % Locale::ALL.len()) * 2 + usize::from(input.strict);
    let filter = &all[index];

    let result = filter.redact(&input.text);
    assert!(!result.fallback, "built-in recognizers fell back");

    let again = filter.process(&result.text);
    assert_eq!(again, result.text, "redaction is not idempotent");

    let longest = filter
        .anonymizer()
        .all_placeholders()
        .iter()
        .map(|p| p.len())
        .max()
        .unwrap_or(0);
    let removed: usize = result.applied.iter().map(|s| s.end - s.start).sum();
    assert!(
        result.text.len() <= input.text.len() - removed + result.applied.len() * longest,
        "output longer than input plus placeholders"
    );
});
