//! Expiry parsing (`"MM/YY"`, `"MM / YYYY"`, ...) and the calendar month used as "now".

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// A calendar month, used as the reference point for expiry checks.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The current month in local time.
    pub fn now() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }
}

/// Month/year pair extracted from free text. Either half is `None` when the
/// corresponding segment does not start with digits.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Expiry {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl Expiry {
    /// Both halves present and not in the past.
    pub fn is_valid(&self) -> bool {
        match (self.month, self.year) {
            (Some(month), Some(year)) => crate::validate::validate_expiry(month, year),
            _ => false,
        }
    }

    pub fn is_valid_at(&self, today: YearMonth) -> bool {
        match (self.month, self.year) {
            (Some(month), Some(year)) => crate::validate::validate_expiry_at(month, year, today),
            _ => false,
        }
    }
}

/// Parse expiry text against the current month. See [`parse_expiry_at`].
pub fn parse_expiry(text: &str) -> Expiry {
    parse_expiry_at(text, YearMonth::now())
}

/// Split on runs of whitespace and `/`, keeping the first two segments.
/// A two-digit year is expanded with the century of `today`.
pub fn parse_expiry_at(text: &str, today: YearMonth) -> Expiry {
    let mut parts = split_on_runs(text, |c| c.is_whitespace() || c == '/');
    parts.truncate(2);
    let month_text = parts.first().map(String::as_str).unwrap_or("");
    let mut year_text = parts.get(1).cloned().unwrap_or_default();

    if year_text.len() == 2 && year_text.chars().all(|c| c.is_ascii_digit()) {
        let century = today.year.div_euclid(100);
        year_text = format!("{century}{year_text}");
    }

    Expiry {
        month: leading_int(month_text).and_then(|m| u32::try_from(m).ok()),
        year: leading_int(&year_text).and_then(|y| i32::try_from(y).ok()),
    }
}

/// Like splitting on a repeated separator class: consecutive separators
/// collapse, a leading separator yields an empty first segment.
fn split_on_runs(text: &str, is_sep: impl Fn(char) -> bool) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_sep = false;
    for c in text.chars() {
        if is_sep(c) {
            if !in_sep {
                parts.push(std::mem::take(&mut current));
                in_sep = true;
            }
        } else {
            in_sep = false;
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

/// Integer prefix of `s` (optional sign, then digits), ignoring leading whitespace.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}
