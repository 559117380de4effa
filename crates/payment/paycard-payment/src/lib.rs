//! paycard-payment: card-network rules consumed by the binding engine.
//!
//! Everything here is a pure function over strings: network detection,
//! number/expiry/CVC validation, expiry parsing, and the input formatters the
//! engine applies to raw input values when formatting is enabled.

pub mod expiry;
pub mod format;
pub mod network;
pub mod validate;

pub use expiry::{parse_expiry, parse_expiry_at, Expiry, YearMonth};
pub use format::{format_card_number, format_expiry, restrict_cvc, restrict_digits};
pub use network::{detect_network, network_spec, Grouping, Network, NetworkSpec, NETWORKS};
pub use validate::{
    luhn_check, validate_card_number, validate_cvc, validate_expiry, validate_expiry_at,
};
