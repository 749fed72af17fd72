//! Receipt number generation and reservation.
//!
//! Format: fixed prefix + `YYYYMMDD` + zero-padded random suffix 001-999.
//! The suffix space is small enough that collisions are expected at
//! moderate daily volume, so reservation regenerates on collision up to a
//! bounded number of attempts. The generator is a trait so tests can drive
//! it deterministically.

use chrono::NaiveDate;
use rand::Rng;

use super::error::CheckoutError;

/// Retry budget for collision regeneration.
pub const MAX_RECEIPT_NUMBER_ATTEMPTS: u32 = 5;

/// Produces candidate receipt numbers for a sale date.
pub trait ReceiptNumberGenerator {
    /// One candidate number; called again on collision.
    fn generate(&mut self, date: NaiveDate) -> String;
}

/// Default generator: prefix + date + random 3-digit suffix.
#[derive(Debug, Clone)]
pub struct RandomReceiptNumbers {
    prefix: String,
}

impl RandomReceiptNumbers {
    /// Creates a generator with the given prefix (typically `"RCP"`).
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for RandomReceiptNumbers {
    fn default() -> Self {
        Self::new("RCP")
    }
}

impl ReceiptNumberGenerator for RandomReceiptNumbers {
    fn generate(&mut self, date: NaiveDate) -> String {
        let suffix: u32 = rand::rng().random_range(1..=999);
        format!("{}{}{suffix:03}", self.prefix, date.format("%Y%m%d"))
    }
}

/// Reserves a receipt number that `is_taken` does not know yet.
///
/// Regenerates on collision up to [`MAX_RECEIPT_NUMBER_ATTEMPTS`] times.
///
/// # Errors
///
/// `ReceiptNumbersExhausted` when every attempt collided.
pub fn reserve_receipt_number(
    generator: &mut dyn ReceiptNumberGenerator,
    date: NaiveDate,
    mut is_taken: impl FnMut(&str) -> bool,
) -> Result<String, CheckoutError> {
    for _ in 0..MAX_RECEIPT_NUMBER_ATTEMPTS {
        let candidate = generator.generate(date);
        if !is_taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(CheckoutError::ReceiptNumbersExhausted {
        attempts: MAX_RECEIPT_NUMBER_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Replays a fixed list of suffixes, for deterministic collision tests.
    struct FixedSuffixes {
        suffixes: Vec<u32>,
        next: usize,
    }

    impl FixedSuffixes {
        fn new(suffixes: Vec<u32>) -> Self {
            Self { suffixes, next: 0 }
        }
    }

    impl ReceiptNumberGenerator for FixedSuffixes {
        fn generate(&mut self, date: NaiveDate) -> String {
            let suffix = self.suffixes[self.next % self.suffixes.len()];
            self.next += 1;
            format!("RCP{}{suffix:03}", date.format("%Y%m%d"))
        }
    }

    fn march_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    #[test]
    fn test_random_number_format() {
        let mut generator = RandomReceiptNumbers::default();
        let number = generator.generate(march_15());
        assert_eq!(number.len(), "RCP20250315".len() + 3);
        assert!(number.starts_with("RCP20250315"));
        let suffix: u32 = number["RCP20250315".len()..].parse().unwrap();
        assert!((1..=999).contains(&suffix));
    }

    #[test]
    fn test_custom_prefix() {
        let mut generator = RandomReceiptNumbers::new("TLL");
        assert!(generator.generate(march_15()).starts_with("TLL20250315"));
    }

    #[test]
    fn test_reserve_first_attempt_when_free() {
        let mut generator = FixedSuffixes::new(vec![42]);
        let number =
            reserve_receipt_number(&mut generator, march_15(), |_| false).unwrap();
        assert_eq!(number, "RCP20250315042");
    }

    #[test]
    fn test_reserve_regenerates_past_collision() {
        // First candidate collides, second must come back distinct.
        let mut generator = FixedSuffixes::new(vec![7, 7, 123]);
        let taken: HashSet<String> = ["RCP20250315007".to_string()].into();

        let number =
            reserve_receipt_number(&mut generator, march_15(), |n| taken.contains(n)).unwrap();
        assert_eq!(number, "RCP20250315123");
    }

    #[test]
    fn test_reserve_exhausts_after_bounded_attempts() {
        let mut generator = FixedSuffixes::new(vec![1]);
        let mut attempts = 0u32;

        let result = reserve_receipt_number(&mut generator, march_15(), |_| {
            attempts += 1;
            true
        });
        assert_eq!(
            result,
            Err(CheckoutError::ReceiptNumbersExhausted {
                attempts: MAX_RECEIPT_NUMBER_ATTEMPTS,
            })
        );
        assert_eq!(attempts, MAX_RECEIPT_NUMBER_ATTEMPTS);
    }
}

#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    struct CountingSuffixes(u32);

    impl ReceiptNumberGenerator for CountingSuffixes {
        fn generate(&mut self, date: NaiveDate) -> String {
            self.0 += 1;
            format!("RCP{}{:03}", date.format("%Y%m%d"), self.0 % 1000)
        }
    }

    proptest! {
        /// Reservation never returns a number the taken-set already holds,
        /// for any number of pre-existing receipts below the retry budget.
        #[test]
        fn prop_reserved_number_is_fresh(taken_count in 0u32..MAX_RECEIPT_NUMBER_ATTEMPTS) {
            let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
            let taken: HashSet<String> = (1..=taken_count)
                .map(|n| format!("RCP20250601{:03}", n % 1000))
                .collect();

            let mut generator = CountingSuffixes(0);
            let number =
                reserve_receipt_number(&mut generator, date, |n| taken.contains(n)).unwrap();
            prop_assert!(!taken.contains(&number));
        }
    }
}
