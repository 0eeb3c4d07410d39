//! Person-name recognizer.
//!
//! Names have no fixed grammar, so this recognizer combines two weak
//! signals: an honorific followed by a capitalized word, and a known first
//! name optionally followed by a capitalized surname. Scores reflect how
//! much of each signal was present.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::Recognizer;
use crate::{EntityKind, Locale, RecognizerFailure, Result, Span};

/// Honorific plus capitalized surname.
pub const SCORE_HONORIFIC: f64 = 0.85;
/// Dictionary first name plus capitalized surname.
pub const SCORE_FULL_NAME: f64 = 0.85;
/// Full name whose first name is also a common word.
pub const SCORE_AMBIGUOUS_FULL_NAME: f64 = 0.7;
/// Dictionary first name on its own.
pub const SCORE_FIRST_NAME: f64 = 0.6;
/// Lone first name that is also a common word.
pub const SCORE_AMBIGUOUS_FIRST_NAME: f64 = 0.3;

const TOKEN_PATTERN: &str = r"\b\p{Lu}\p{Ll}+(?:-\p{Lu}\p{Ll}+)?\b";
const HONORIFIC_PATTERN: &str =
    r"\b(?:Mr|Mrs|Ms|Miss|Mx|Dr|Prof|Herr|Frau)\.?[ \t]+(\p{Lu}\p{Ll}+(?:-\p{Lu}\p{Ll}+)?)\b";

const COMMON_FIRST_NAMES: &[&str] = &[
    "Aaron", "Adam", "Alan", "Albert", "Alex", "Alexander", "Alice", "Amanda", "Amy", "Andrew",
    "Angela", "Anna", "Anne", "Anthony", "Barbara", "Benjamin", "Betty", "Brian", "Carl",
    "Carol", "Catherine", "Charles", "Charlotte", "Chris", "Christopher", "Claire", "Daniel",
    "David", "Deborah", "Dennis", "Diana", "Donald", "Donna", "Dorothy", "Edward", "Elizabeth",
    "Emily", "Emma", "Eric", "Ethan", "Frank", "Gary", "George", "Hannah", "Harry", "Helen",
    "Henry", "Isabella", "Jack", "James", "Jane", "Janet", "Jason", "Jeffrey", "Jennifer",
    "Jessica", "John", "Jonathan", "Joseph", "Joshua", "Julia", "Karen", "Katherine", "Kevin",
    "Laura", "Linda", "Lisa", "Liam", "Lucy", "Margaret", "Maria", "Mary", "Matthew",
    "Melissa", "Michael", "Michelle", "Nancy", "Nicholas", "Noah", "Oliver", "Olivia",
    "Patricia", "Paul", "Peter", "Rachel", "Rebecca", "Richard", "Robert", "Ronald", "Ryan",
    "Samuel", "Sandra", "Sarah", "Scott", "Sharon", "Sophia", "Stephen", "Steven", "Susan",
    "Thomas", "Timothy", "Victoria", "William",
];

/// First names that double as ordinary English words.
const AMBIGUOUS_FIRST_NAMES: &[&str] = &[
    "April", "Art", "August", "Bill", "Chase", "Dawn", "Faith", "Grace", "Hope", "Hunter",
    "Iris", "Joy", "June", "Mark", "Max", "May", "Pat", "Ray", "Rose", "Ruby", "Summer",
    "Will",
];

const GERMAN_FIRST_NAMES: &[&str] = &[
    "Andreas", "Anja", "Birgit", "Dieter", "Dirk", "Felix", "Florian", "Frieda", "Gerhard",
    "Greta", "Günter", "Hans", "Heike", "Heinz", "Helga", "Jan", "Jörg", "Jürgen", "Katrin",
    "Klaus", "Lena", "Lukas", "Manfred", "Matthias", "Monika", "Petra", "Ralf", "Sabine",
    "Sebastian", "Stefan", "Tobias", "Ursula", "Uwe", "Werner", "Wolfgang",
];

const HEBREW_FIRST_NAMES: &[&str] = &[
    "Amit", "Ariel", "Avi", "Avraham", "Dana", "Eitan", "Eli", "Gal", "Hila", "Ido", "Itai",
    "Moshe", "Nadav", "Noa", "Noam", "Omer", "Ori", "Rivka", "Ronit", "Shira", "Tal",
    "Tamar", "Uri", "Yael", "Yonatan", "Yosef", "Zeev",
];

/// Capitalized words that are never accepted as a surname.
const STOPWORDS: &[&str] = &[
    "A", "An", "And", "Are", "As", "At", "But", "By", "Dear", "For", "From", "Had", "Has",
    "He", "Hello", "Hi", "I", "If", "In", "Is", "It", "Of", "On", "Or", "Please", "Regards",
    "She", "Thanks", "That", "The", "They", "This", "To", "Was", "We", "Were", "With",
];

static AMBIGUOUS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| AMBIGUOUS_FIRST_NAMES.iter().copied().collect());

static STOPWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS.iter().copied().collect());

/// Dictionary-and-honorific name recognizer.
#[derive(Debug, Clone)]
pub struct NameRecognizer {
    name: String,
    token: Regex,
    honorific: Regex,
    first_names: HashSet<String>,
}

impl NameRecognizer {
    /// Recognizer with the shared English dictionary plus the locale's
    /// regional names.
    pub fn for_locale(locale: Locale) -> Result<Self> {
        Self::with_extra_names(locale, &[])
    }

    /// As [`NameRecognizer::for_locale`], adding `extra` first names.
    pub fn with_extra_names(locale: Locale, extra: &[String]) -> Result<Self> {
        let mut first_names: HashSet<String> = COMMON_FIRST_NAMES
            .iter()
            .chain(AMBIGUOUS_FIRST_NAMES)
            .map(|s| s.to_string())
            .collect();

        let regional: &[&str] = match locale {
            Locale::EnUs | Locale::EnGb => &[],
            Locale::DeDe => GERMAN_FIRST_NAMES,
            Locale::HeIl => HEBREW_FIRST_NAMES,
        };
        first_names.extend(regional.iter().map(|s| s.to_string()));
        first_names.extend(extra.iter().filter_map(|s| normalize_name(s)));

        Ok(Self {
            name: format!("person_{}", locale.short()),
            token: Regex::new(TOKEN_PATTERN)?,
            honorific: Regex::new(HONORIFIC_PATTERN)?,
            first_names,
        })
    }

    /// Whether `word` is in this recognizer's first-name dictionary.
    pub fn knows(&self, word: &str) -> bool {
        self.first_names.contains(word)
    }

    fn scan_dictionary(&self, text: &str, spans: &mut Vec<Span>) {
        let tokens: Vec<regex::Match<'_>> = self.token.find_iter(text).collect();

        for (i, tok) in tokens.iter().enumerate() {
            if !self.first_names.contains(tok.as_str()) {
                continue;
            }
            let ambiguous = AMBIGUOUS.contains(tok.as_str());

            let surname = tokens.get(i + 1).filter(|next| {
                is_name_gap(&text[tok.end()..next.start()])
                    && !STOPWORD_SET.contains(next.as_str())
            });

            match surname {
                Some(next) => {
                    let score = if ambiguous {
                        SCORE_AMBIGUOUS_FULL_NAME
                    } else {
                        SCORE_FULL_NAME
                    };
                    spans.push(Span::new(tok.start(), next.end(), EntityKind::Person, score));
                }
                None => {
                    let score = if ambiguous {
                        SCORE_AMBIGUOUS_FIRST_NAME
                    } else {
                        SCORE_FIRST_NAME
                    };
                    spans.push(Span::new(tok.start(), tok.end(), EntityKind::Person, score));
                }
            }
        }
    }

    fn scan_honorifics(&self, text: &str, spans: &mut Vec<Span>) {
        for caps in self.honorific.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                if STOPWORD_SET.contains(m.as_str()) {
                    continue;
                }
                spans.push(Span::new(
                    m.start(),
                    m.end(),
                    EntityKind::Person,
                    SCORE_HONORIFIC,
                ));
            }
        }
    }
}

impl Recognizer for NameRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Person
    }

    fn scan(&self, text: &str) -> std::result::Result<Vec<Span>, RecognizerFailure> {
        let mut spans = Vec::new();
        self.scan_honorifics(text, &mut spans);
        self.scan_dictionary(text, &mut spans);
        Ok(spans)
    }
}

/// Space or tab run between first name and surname, never a line break.
fn is_name_gap(gap: &str) -> bool {
    !gap.is_empty() && gap.chars().all(|c| c == ' ' || c == '\t')
}

/// `"jOHN "` becomes `"John"`. Empty input is dropped.
fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    let mut out: String = first.to_uppercase().collect();
    out.push_str(&chars.as_str().to_lowercase());
    Some(out)
}
