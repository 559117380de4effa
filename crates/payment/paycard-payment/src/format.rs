//! Input-side formatters: rewrite what the user typed into the canonical
//! on-screen form before the value is bound to the card display.

use crate::network::{digits_only, spec_for_digits, Grouping};

/// Keep only ASCII digits, at most `max` of them.
pub fn restrict_digits(text: &str, max: usize) -> String {
    text.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Group digits the way the detected network prints them, truncated to the
/// network's longest length. Unrecognized prefixes come back as bare digits.
pub fn format_card_number(text: &str) -> String {
    let digits = digits_only(text);
    let Some(spec) = spec_for_digits(&digits) else {
        return digits;
    };
    let digits: String = digits.chars().take(spec.max_length()).collect();

    let mut groups: Vec<&str> = Vec::new();
    match spec.grouping {
        Grouping::Fours => {
            let mut rest = digits.as_str();
            while !rest.is_empty() {
                let (head, tail) = rest.split_at(rest.len().min(4));
                groups.push(head);
                rest = tail;
            }
        }
        Grouping::Blocks(sizes) => {
            let mut rest = digits.as_str();
            for &size in sizes {
                if rest.is_empty() {
                    break;
                }
                let (head, tail) = rest.split_at(rest.len().min(size));
                groups.push(head);
                rest = tail;
            }
        }
    }
    groups.join(" ")
}

pub fn restrict_cvc(text: &str) -> String {
    restrict_digits(text, 4)
}

/// Normalize expiry text to `MM / YY[YY]` as the user types.
///
/// A single month digit above 1 is zero-padded, and the separator appears as
/// soon as the month is complete. Typing `" /"` after one digit (a backspace
/// over the separator) collapses back to the bare digit.
pub fn format_expiry(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut i = chars.iter().position(char::is_ascii_digit).unwrap_or(chars.len());

    let mut mon: String = chars[i..]
        .iter()
        .take(2)
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if mon.is_empty() {
        return String::new();
    }
    i += mon.len();

    let mut sep: String = chars[i..]
        .iter()
        .take_while(|c| !c.is_ascii_digit())
        .collect();
    i += sep.chars().count();

    let year: String = chars[i..]
        .iter()
        .take(4)
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if !year.is_empty() {
        sep = " / ".into();
    } else if sep == " /" {
        mon.truncate(1);
        sep.clear();
    } else if mon.len() == 2 || !sep.is_empty() {
        sep = " / ".into();
    } else if mon != "0" && mon != "1" {
        mon = format!("0{mon}");
        sep = " / ".into();
    }
    format!("{mon}{sep}{year}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_of_four_for_visa() {
        assert_eq!(format_card_number("4242424242424242"), "4242 4242 4242 4242");
        assert_eq!(format_card_number("42424"), "4242 4");
    }

    #[test]
    fn amex_and_diners_blocks() {
        assert_eq!(format_card_number("378282246310005"), "3782 822463 10005");
        assert_eq!(format_card_number("30569309025904"), "3056 930902 5904");
        assert_eq!(format_card_number("37828"), "3782 8");
    }

    #[test]
    fn truncates_to_network_max() {
        assert_eq!(format_card_number("3782822463100051234"), "3782 822463 10005");
    }

    #[test]
    fn unknown_prefix_is_left_as_digits() {
        assert_eq!(format_card_number("12-34 56"), "123456");
    }

    #[test]
    fn cvc_is_digits_only_and_short() {
        assert_eq!(restrict_cvc("1a2b3c45"), "1234");
    }

    #[test]
    fn expiry_progressive_typing() {
        assert_eq!(format_expiry(""), "");
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("0"), "0");
        assert_eq!(format_expiry("4"), "04 / ");
        assert_eq!(format_expiry("12"), "12 / ");
        assert_eq!(format_expiry("12 / 2"), "12 / 2");
        assert_eq!(format_expiry("1225"), "12 / 25");
        assert_eq!(format_expiry("12/2031"), "12 / 2031");
        assert_eq!(format_expiry("1 /"), "1");
    }
}
