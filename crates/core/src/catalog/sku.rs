//! SKU auto-generation.
//!
//! SKUs look like `CAT-NAM-001`: up to three letters each from the
//! category and the name, then a zero-padded counter searched for the
//! first free slot. Past 999 the counter gives way to a timestamp tail so
//! generation never fails outright. Uniqueness is checked through an
//! injected closure so the caller decides what "taken" means (a database
//! lookup in production, a set in tests).

use chrono::{DateTime, Utc};

/// Counter ceiling before falling back to a timestamp tail.
const MAX_SKU_COUNTER: u32 = 999;

/// First three alphabetic characters of `text`, uppercased; `"GEN"` when
/// the text has none.
#[must_use]
pub fn abbreviate(text: &str) -> String {
    let letters: String = text
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(3)
        .collect::<String>()
        .to_uppercase();
    if letters.is_empty() {
        "GEN".to_string()
    } else {
        letters
    }
}

/// Composes a SKU from category/name abbreviations and a counter.
#[must_use]
pub fn compose(category: &str, name: &str, counter: u32) -> String {
    format!("{}-{}-{counter:03}", abbreviate(category), abbreviate(name))
}

/// Generates a SKU not yet known to `is_taken`.
///
/// Searches counters 001 through 999; if every slot is taken, appends the
/// `now` timestamp instead, which is treated as always free.
#[must_use]
pub fn generate_unique(
    category: &str,
    name: &str,
    now: DateTime<Utc>,
    mut is_taken: impl FnMut(&str) -> bool,
) -> String {
    for counter in 1..=MAX_SKU_COUNTER {
        let candidate = compose(category, name, counter);
        if !is_taken(&candidate) {
            return candidate;
        }
    }
    format!(
        "{}-{}-{}",
        abbreviate(category),
        abbreviate(name),
        now.timestamp()
    )
}
