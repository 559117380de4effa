//! Card networks and the prefix table used to detect them.
//!
//! Detection walks [`NETWORKS`] in order and returns the first entry whose
//! prefixes match the digits typed so far, so more specific ranges (Visa
//! Electron, Elo) must precede the broad ones (Visa).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A card-issuing scheme, or `Unknown` when nothing matches yet.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    VisaElectron,
    Maestro,
    Forbrugsforeningen,
    Dankort,
    Elo,
    Visa,
    Mastercard,
    Amex,
    Hipercard,
    DinersClub,
    Discover,
    UnionPay,
    Jcb,
    Troy,
    #[default]
    Unknown,
}

impl Network {
    /// Every identified network, in detection order.
    pub const KNOWN: [Network; 14] = [
        Network::VisaElectron,
        Network::Maestro,
        Network::Forbrugsforeningen,
        Network::Dankort,
        Network::Elo,
        Network::Visa,
        Network::Mastercard,
        Network::Amex,
        Network::Hipercard,
        Network::DinersClub,
        Network::Discover,
        Network::UnionPay,
        Network::Jcb,
        Network::Troy,
    ];

    /// Stable lowercase identifier (`"visa"`, `"amex"`, ..., `"unknown"`).
    pub fn id(self) -> &'static str {
        match self {
            Network::VisaElectron => "visaelectron",
            Network::Maestro => "maestro",
            Network::Forbrugsforeningen => "forbrugsforeningen",
            Network::Dankort => "dankort",
            Network::Elo => "elo",
            Network::Visa => "visa",
            Network::Mastercard => "mastercard",
            Network::Amex => "amex",
            Network::Hipercard => "hipercard",
            Network::DinersClub => "dinersclub",
            Network::Discover => "discover",
            Network::UnionPay => "unionpay",
            Network::Jcb => "jcb",
            Network::Troy => "troy",
            Network::Unknown => "unknown",
        }
    }

    pub fn from_id(id: &str) -> Option<Network> {
        if id == "unknown" {
            return Some(Network::Unknown);
        }
        Network::KNOWN.iter().copied().find(|n| n.id() == id)
    }

    #[inline]
    pub fn is_known(self) -> bool {
        self != Network::Unknown
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// How digits are grouped for display.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Grouping {
    /// Blocks of four, last block may be shorter.
    Fours,
    /// Fixed block sizes (e.g. 4-6-5 for Amex).
    Blocks(&'static [usize]),
}

/// Static rules for one network.
#[derive(Clone, Debug)]
pub struct NetworkSpec {
    pub network: Network,
    prefixes: &'static [&'static str],
    excluded: &'static [&'static str],
    pub grouping: Grouping,
    /// Accepted full lengths, ascending.
    pub lengths: &'static [usize],
    pub cvc_lengths: &'static [usize],
    pub luhn: bool,
}

impl NetworkSpec {
    /// Whether `digits` (already stripped of non-digits) falls in this network's range.
    pub fn matches(&self, digits: &str) -> bool {
        self.prefixes.iter().any(|p| digits.starts_with(p))
            && !self.excluded.iter().any(|e| digits.starts_with(e))
    }

    pub fn max_length(&self) -> usize {
        self.lengths.last().copied().unwrap_or(16)
    }
}

const CVC_3: &[usize] = &[3];
const LEN_16: &[usize] = &[16];

pub static NETWORKS: [NetworkSpec; 14] = [
    NetworkSpec {
        network: Network::VisaElectron,
        prefixes: &["4026", "417500", "4405", "4508", "4844", "4913", "4917"],
        excluded: &[],
        grouping: Grouping::Fours,
        lengths: LEN_16,
        cvc_lengths: CVC_3,
        luhn: true,
    },
    NetworkSpec {
        network: Network::Maestro,
        prefixes: &["5018", "502", "503", "56", "58", "639", "67"],
        excluded: &[],
        grouping: Grouping::Fours,
        lengths: &[12, 13, 14, 15, 16, 17, 18, 19],
        cvc_lengths: CVC_3,
        luhn: true,
    },
    NetworkSpec {
        network: Network::Forbrugsforeningen,
        prefixes: &["600"],
        excluded: &[],
        grouping: Grouping::Fours,
        lengths: LEN_16,
        cvc_lengths: CVC_3,
        luhn: true,
    },
    NetworkSpec {
        network: Network::Dankort,
        prefixes: &["5019"],
        excluded: &[],
        grouping: Grouping::Fours,
        lengths: LEN_16,
        cvc_lengths: CVC_3,
        luhn: true,
    },
    NetworkSpec {
        network: Network::Elo,
        prefixes: &[
            "4011", "438935", "451416", "4576", "457393", "504175", "506699", "5067", "50904",
            "50905", "50906", "50907", "636297", "636368",
        ],
        excluded: &[],
        grouping: Grouping::Fours,
        lengths: LEN_16,
        cvc_lengths: CVC_3,
        luhn: true,
    },
    NetworkSpec {
        network: Network::Visa,
        prefixes: &["4"],
        excluded: &[],
        grouping: Grouping::Fours,
        lengths: &[13, 16, 19],
        cvc_lengths: CVC_3,
        luhn: true,
    },
    NetworkSpec {
        network: Network::Mastercard,
        prefixes: &["50", "51", "52", "53", "54", "55", "22", "23", "24", "25", "26", "27"],
        excluded: &[],
        grouping: Grouping::Fours,
        lengths: LEN_16,
        cvc_lengths: CVC_3,
        luhn: true,
    },
    NetworkSpec {
        network: Network::Amex,
        prefixes: &["34", "37"],
        excluded: &[],
        grouping: Grouping::Blocks(&[4, 6, 5]),
        lengths: &[15],
        cvc_lengths: &[4],
        luhn: true,
    },
    NetworkSpec {
        network: Network::Hipercard,
        prefixes: &["384100", "384140", "384160", "606282", "637095", "637568", "60"],
        excluded: &["6011"],
        grouping: Grouping::Fours,
        lengths: &[14, 15, 16, 17, 18, 19],
        cvc_lengths: CVC_3,
        luhn: true,
    },
    NetworkSpec {
        network: Network::DinersClub,
        prefixes: &["30", "36", "38", "39"],
        excluded: &[],
        grouping: Grouping::Blocks(&[4, 6, 4]),
        lengths: &[14],
        cvc_lengths: CVC_3,
        luhn: true,
    },
    NetworkSpec {
        network: Network::Discover,
        prefixes: &["60", "64", "65", "622"],
        excluded: &[],
        grouping: Grouping::Fours,
        lengths: LEN_16,
        cvc_lengths: CVC_3,
        luhn: true,
    },
    NetworkSpec {
        network: Network::UnionPay,
        prefixes: &["62", "88"],
        excluded: &[],
        grouping: Grouping::Fours,
        lengths: &[16, 17, 18, 19],
        cvc_lengths: CVC_3,
        luhn: false,
    },
    NetworkSpec {
        network: Network::Jcb,
        prefixes: &["35"],
        excluded: &[],
        grouping: Grouping::Fours,
        lengths: LEN_16,
        cvc_lengths: CVC_3,
        luhn: true,
    },
    NetworkSpec {
        network: Network::Troy,
        prefixes: &["9792"],
        excluded: &[],
        grouping: Grouping::Fours,
        lengths: LEN_16,
        cvc_lengths: CVC_3,
        luhn: true,
    },
];

pub(crate) fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Rules for a network; `None` for `Unknown`.
pub fn network_spec(network: Network) -> Option<&'static NetworkSpec> {
    NETWORKS.iter().find(|s| s.network == network)
}

pub(crate) fn spec_for_digits(digits: &str) -> Option<&'static NetworkSpec> {
    NETWORKS.iter().find(|s| s.matches(digits))
}

/// Classify a (possibly partial, possibly formatted) card number.
/// Non-digit characters are ignored.
pub fn detect_network(text: &str) -> Network {
    spec_for_digits(&digits_only(text))
        .map(|s| s.network)
        .unwrap_or(Network::Unknown)
}
