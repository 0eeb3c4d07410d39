//! Built-in recognizers per entity kind and locale.
//!
//! Email is locale-independent. Phone numbers and national IDs follow the
//! locale's grammar; candidate IDs are checked with the issuing scheme's
//! checksum or reserved-range rules before a span is emitted.

use std::sync::Arc;

use super::{NameRecognizer, PatternRecognizer, Recognizer};
use crate::{EntityKind, Locale, Result};

const EMAIL: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";

const PHONE_US: &str = r"(?:\+1[ .-]?)?(?:\(\d{3}\)[ ]?|\b\d{3}[ .-])\d{3}[ .-]\d{4}\b";
const PHONE_UK: &str = r"(?:\+44[ ]?(?:\(0\)[ ]?)?|\b0)\d(?:[ -]?\d){8,9}\b";
const PHONE_DE: &str = r"(?:\+49[ -]?(?:\(0\)[ -]?)?|\b0)[1-9]\d(?:[ /-]?\d){4,10}\b";
const PHONE_IL: &str = r"(?:\+972[ -]?|\b0)(?:5\d|7\d|[2-489])[ -]?\d{3}[ -]?\d{4}\b";

const US_SSN: &str = r"\b\d{3}-\d{2}-\d{4}\b";
const US_SSN_SPACED: &str = r"\b\d{3} \d{2} \d{4}\b";
const UK_NINO: &str = r"\b[A-CEGHJ-PR-TW-Z][A-CEGHJ-NPR-TW-Z] ?\d{2} ?\d{2} ?\d{2} ?[A-D]\b";
const DE_STEUER_ID: &str = r"\b[1-9]\d{10}\b";
const DE_STEUER_ID_SPACED: &str = r"\b[1-9]\d \d{3} \d{3} \d{3}\b";
const IL_TEUDAT_ZEHUT: &str = r"\b\d{9}\b";

/// Recognizers for `kind` under `locale`, in registry order.
pub fn recognizers_for(
    kind: EntityKind,
    locale: Locale,
    extra_names: &[String],
) -> Result<Vec<Arc<dyn Recognizer>>> {
    let recognizer: Arc<dyn Recognizer> = match kind {
        EntityKind::Email => Arc::new(email()?),
        EntityKind::Phone => Arc::new(phone(locale)?),
        EntityKind::Person => Arc::new(NameRecognizer::with_extra_names(locale, extra_names)?),
        EntityKind::NationalId => Arc::new(national_id(locale)?),
    };
    Ok(vec![recognizer])
}

/// Email addresses.
pub fn email() -> Result<PatternRecognizer> {
    PatternRecognizer::new("email", EntityKind::Email).with_pattern(EMAIL, 1.0)
}

/// Phone numbers in the locale's national and international formats.
pub fn phone(locale: Locale) -> Result<PatternRecognizer> {
    let name = format!("phone_{}", locale.short());
    let r = PatternRecognizer::new(name, EntityKind::Phone);
    match locale {
        Locale::EnUs => r.with_pattern(PHONE_US, 1.0),
        Locale::EnGb => Ok(r.with_pattern(PHONE_UK, 1.0)?.with_validator(uk_phone)),
        Locale::DeDe => Ok(r.with_pattern(PHONE_DE, 1.0)?.with_validator(de_phone)),
        Locale::HeIl => r.with_pattern(PHONE_IL, 1.0),
    }
}

/// The locale's national identifier.
pub fn national_id(locale: Locale) -> Result<PatternRecognizer> {
    match locale {
        Locale::EnUs => Ok(PatternRecognizer::new("us_ssn", EntityKind::NationalId)
            .with_pattern(US_SSN, 1.0)?
            .with_pattern(US_SSN_SPACED, 0.85)?
            .with_validator(us_ssn)),
        Locale::EnGb => Ok(PatternRecognizer::new("uk_nino", EntityKind::NationalId)
            .with_pattern(UK_NINO, 1.0)?
            .with_validator(uk_nino)),
        Locale::DeDe => Ok(PatternRecognizer::new("de_steuer_id", EntityKind::NationalId)
            .with_pattern(DE_STEUER_ID, 1.0)?
            .with_pattern(DE_STEUER_ID_SPACED, 1.0)?
            .with_validator(de_steuer_id)),
        Locale::HeIl => Ok(PatternRecognizer::new("il_teudat_zehut", EntityKind::NationalId)
            .with_pattern(IL_TEUDAT_ZEHUT, 1.0)?
            .with_validator(il_teudat_zehut)),
    }
}

fn digits(s: &str) -> Vec<u32> {
    s.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// National significant digits: country code and trunk `0` removed.
fn national_digits(matched: &str, country: &[u32]) -> Vec<u32> {
    let mut d = digits(matched);
    if matched.starts_with('+') && d.starts_with(country) {
        d.drain(..country.len());
    }
    if d.first() == Some(&0) {
        d.remove(0);
    }
    d
}

fn uk_phone(matched: &str) -> bool {
    let d = national_digits(matched, &[4, 4]);
    (9..=10).contains(&d.len()) && d.first() != Some(&0)
}

fn de_phone(matched: &str) -> bool {
    let d = national_digits(matched, &[4, 9]);
    (7..=11).contains(&d.len()) && d.first() != Some(&0)
}

/// Area 000, 666 and 900-999, group 00 and serial 0000 are never issued.
pub fn us_ssn(matched: &str) -> bool {
    let d = digits(matched);
    if d.len() != 9 {
        return false;
    }
    let area = d[0] * 100 + d[1] * 10 + d[2];
    let group = d[3] * 10 + d[4];
    let serial = d[5] * 1000 + d[6] * 100 + d[7] * 10 + d[8];
    area != 0 && area != 666 && area < 900 && group != 0 && serial != 0
}

/// Prefixes BG, GB, NK, KN, TN, NT and ZZ are not allocated.
pub fn uk_nino(matched: &str) -> bool {
    const UNALLOCATED: &[&str] = &["BG", "GB", "NK", "KN", "TN", "NT", "ZZ"];
    let prefix: String = matched.chars().take(2).collect();
    !UNALLOCATED.contains(&prefix.as_str())
}

/// ISO 7064 MOD 11,10 check digit over the first ten digits.
pub fn de_steuer_id(matched: &str) -> bool {
    let d = digits(matched);
    if d.len() != 11 || d[0] == 0 {
        return false;
    }
    let mut product = 10;
    for &digit in &d[..10] {
        let mut sum = (digit + product) % 10;
        if sum == 0 {
            sum = 10;
        }
        product = (sum * 2) % 11;
    }
    let check = (11 - product) % 10;
    check == d[10]
}

/// Israeli ID: alternating weights 1,2 with digit-sum folding, total
/// divisible by 10.
pub fn il_teudat_zehut(matched: &str) -> bool {
    let d = digits(matched);
    if d.len() != 9 || d.iter().all(|&x| x == 0) {
        return false;
    }
    let total: u32 = d
        .iter()
        .enumerate()
        .map(|(i, &digit)| {
            let v = digit * if i % 2 == 0 { 1 } else { 2 };
            if v > 9 {
                v - 9
            } else {
                v
            }
        })
        .sum();
    total % 10 == 0
}
