//! Input-side formatters: rewrite an input's own value before it is bound.

use paycard_payment::{format_card_number, format_expiry, restrict_cvc, restrict_digits};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Formatter {
    /// Digits grouped per network, cut at the network's maximum length.
    CardNumber,
    Cvc,
    /// Single expiry input: `MM / YY`.
    Expiry,
    /// Month half of a split expiry.
    ExpiryMonth,
    /// Year half of a split expiry.
    ExpiryYear,
}

impl Formatter {
    /// Formatters for the expiry inputs: one combined input, or month + year parts.
    pub fn for_expiry_inputs(count: usize) -> Vec<Formatter> {
        match count {
            0 => Vec::new(),
            1 => vec![Formatter::Expiry],
            n => std::iter::once(Formatter::ExpiryMonth)
                .chain(std::iter::repeat(Formatter::ExpiryYear).take(n - 1))
                .collect(),
        }
    }

    pub fn apply(self, raw: &str) -> String {
        match self {
            Formatter::CardNumber => format_card_number(raw),
            Formatter::Cvc => restrict_cvc(raw),
            Formatter::Expiry => format_expiry(raw),
            Formatter::ExpiryMonth => restrict_digits(raw, 2),
            Formatter::ExpiryYear => restrict_digits(raw, 4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_expiry_gets_month_then_years() {
        assert_eq!(
            Formatter::for_expiry_inputs(2),
            vec![Formatter::ExpiryMonth, Formatter::ExpiryYear]
        );
        assert_eq!(Formatter::for_expiry_inputs(1), vec![Formatter::Expiry]);
        assert!(Formatter::for_expiry_inputs(0).is_empty());
    }

    #[test]
    fn applies_payment_formatters() {
        assert_eq!(Formatter::CardNumber.apply("4242424242"), "4242 4242 42");
        assert_eq!(Formatter::Cvc.apply("12x34"), "1234");
        assert_eq!(Formatter::Expiry.apply("1226"), "12 / 26");
        assert_eq!(Formatter::ExpiryMonth.apply("123"), "12");
        assert_eq!(Formatter::ExpiryYear.apply("2031x"), "2031");
    }
}
