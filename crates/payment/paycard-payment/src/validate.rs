//! Validation predicates. None of these fail; an unparsable value is simply invalid.

use crate::expiry::YearMonth;
use crate::network::{network_spec, spec_for_digits, Network};

/// Mod-10 checksum over an all-digit string.
pub fn luhn_check(digits: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut d) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

/// Spaces and dashes are ignored; anything else non-numeric makes the number invalid.
pub fn validate_card_number(text: &str) -> bool {
    let num: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if num.is_empty() || !num.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let Some(spec) = spec_for_digits(&num) else {
        return false;
    };
    spec.lengths.contains(&num.len()) && (!spec.luhn || luhn_check(&num))
}

/// `true` when the card is still usable in the current month.
pub fn validate_expiry(month: u32, year: i32) -> bool {
    validate_expiry_at(month, year, YearMonth::now())
}

/// Two-digit years below 70 are 20xx, the rest 19xx; any other width but
/// four digits is rejected. A card expiring in `today`'s month is still valid.
pub fn validate_expiry_at(month: u32, year: i32, today: YearMonth) -> bool {
    if !(1..=12).contains(&month) || year <= 0 {
        return false;
    }
    let year = match year.to_string().len() {
        2 if year < 70 => 2000 + year,
        2 => 1900 + year,
        4 => year,
        _ => return false,
    };
    YearMonth::new(year, month) >= today
}

/// `Unknown` networks accept 3 or 4 digits; known networks use their table entry.
pub fn validate_cvc(text: &str, network: Network) -> bool {
    let cvc = text.trim();
    if cvc.is_empty() || !cvc.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match network_spec(network) {
        Some(spec) => spec.cvc_lengths.contains(&cvc.len()),
        None => (3..=4).contains(&cvc.len()),
    }
}
