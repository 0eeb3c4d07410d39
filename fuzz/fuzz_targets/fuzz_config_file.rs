//! Fuzz target for config file parsing.
//!
//! Arbitrary TOML or JSON must parse or fail cleanly, and anything that
//! validates must build a filter without panicking.

#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use lr_config::{build_filter, validate_config, LogRedactConfig};
use lr_redact::NoopSink;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };

    let parsed = if selector % 2 == 0 {
        LogRedactConfig::parse_toml(text)
    } else {
        LogRedactConfig::parse_json(text)
    };

    if let Ok(config) = parsed {
        if validate_config(&config).is_ok() {
            let _ = build_filter(&config, Arc::new(NoopSink));
        }
    }
});
