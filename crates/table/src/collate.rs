//! Cell comparison used by column sorting.
//!
//! Two cells compare numerically only when both trimmed values start with a
//! finite number; every other pair, mixed ones included, falls back to a
//! root-locale string collation.

use std::cmp::Ordering;

use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use once_cell::sync::Lazy;
use tracing::warn;

static COLLATOR: Lazy<Option<CollatorBorrowed<'static>>> = Lazy::new(|| {
    let mut options = CollatorOptions::default();
    options.strength = Some(Strength::Tertiary);
    match Collator::try_new(CollatorPreferences::default(), options) {
        Ok(collator) => Some(collator),
        Err(error) => {
            warn!(%error, "root collator unavailable; falling back to case-folded ordering");
            None
        }
    }
});

/// Reads the number a cell starts with, ignoring any trailing text.
///
/// `"9 days"` reads as 9 and `"12.5%"` as 12.5. Infinities, NaN and cells
/// with no leading digits yield `None`.
pub fn parse_finite(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let end = numeric_prefix_len(text.as_bytes());
    let value: f64 = text[..end].parse().ok()?;
    value.is_finite().then_some(value)
}

/// Byte length of the longest `[+-]digits[.digits][e[+-]digits]` prefix.
/// Returns 0 when no digit is present.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |start: usize| bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer = digits_from(end);
    end += integer;

    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if integer > 0 || fraction > 0 {
            end += 1 + fraction;
        }
    }
    if integer == 0 && fraction == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = digits_from(exponent);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }
    end
}

/// Root-locale collation with tertiary strength.
///
/// Accents and case only matter once the base letters tie, and a case-only
/// difference puts the lowercase form first. Strings the collator considers
/// equal are ordered by code point so the order stays total.
pub fn locale_compare(left: &str, right: &str) -> Ordering {
    let collated = match COLLATOR.as_ref() {
        Some(collator) => collator.compare(left, right),
        None => case_folded_compare(left, right),
    };
    collated.then_with(|| left.cmp(right))
}

fn case_folded_compare(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
        .then_with(|| left.chars().map(char::is_uppercase).cmp(right.chars().map(char::is_uppercase)))
}

/// Compares two cell texts the way a column sort does.
pub fn compare_cells(left: &str, right: &str) -> Ordering {
    let left = left.trim();
    let right = right.trim();
    match (parse_finite(left), parse_finite(right)) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => locale_compare(left, right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(compare_cells("2", "10"), Ordering::Less);
        assert_eq!(compare_cells(" -3.5 ", "1e-2"), Ordering::Less);
        assert_eq!(compare_cells("10.0", "10"), Ordering::Equal);
    }

    #[test]
    fn leading_numbers_are_read_like_parse_float() {
        assert_eq!(parse_finite("12abc"), Some(12.0));
        assert_eq!(parse_finite("12.5%"), Some(12.5));
        assert_eq!(parse_finite(" 0.25 "), Some(0.25));
        assert_eq!(parse_finite(".5"), Some(0.5));
        assert_eq!(parse_finite("5."), Some(5.0));
        assert_eq!(parse_finite("-4e"), Some(-4.0));
        assert_eq!(parse_finite("3e-2 AU"), Some(0.03));
        assert_eq!(parse_finite("1.2.3"), Some(1.2));
    }

    #[test]
    fn cells_without_a_finite_prefix_are_text() {
        assert_eq!(parse_finite("inf"), None);
        assert_eq!(parse_finite("NaN"), None);
        assert_eq!(parse_finite("-"), None);
        assert_eq!(parse_finite("."), None);
        assert_eq!(parse_finite("K00752.01"), None);
        assert_eq!(parse_finite("1e999"), None);
        assert_eq!(parse_finite(""), None);
    }

    #[test]
    fn units_after_a_number_still_sort_numerically() {
        assert_eq!(compare_cells("9 days", "10 days"), Ordering::Less);
        assert_eq!(compare_cells("10", "9b"), Ordering::Greater);
        assert_eq!(compare_cells("12.5%", "2%"), Ordering::Greater);
    }

    #[test]
    fn mixed_pairs_use_string_order() {
        assert_eq!(compare_cells("Candidate", "12"), Ordering::Greater);
        assert_eq!(compare_cells("K00753.01", "K00752.01"), Ordering::Greater);
    }

    #[test]
    fn collation_ignores_case_before_code_point() {
        assert_eq!(locale_compare("alpha", "Beta"), Ordering::Less);
        assert_eq!(locale_compare("Zeta", "alpha"), Ordering::Greater);
        assert_eq!(locale_compare("candidate", "Candidate"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn accented_letters_sort_with_their_base_letter() {
        assert_eq!(locale_compare("é", "f"), Ordering::Less);
        assert_eq!(locale_compare("Ångström", "Beta"), Ordering::Less);
        assert_eq!(locale_compare("e", "é"), Ordering::Less);
        assert_eq!(compare_cells("Éclipse", "Zenith"), Ordering::Less);
    }
}
