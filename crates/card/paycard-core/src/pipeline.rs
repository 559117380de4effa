//! Filter pipeline: ordered text stages run on every field update.
//!
//! Stages declare a [`Phase`] and the pipeline runs them phase by phase
//! (declaration order within a phase). Validation therefore always sees the
//! normalized but unmasked text, however the filter list was written.

use std::fmt;

use crate::ids::ElementId;
use crate::options::ValidityClasses;
use crate::surface::Surface;
use paycard_payment::{parse_expiry, validate_card_number, validate_cvc, Network};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Phase {
    /// Pure text rewrites (whitespace removal, ...).
    Normalize,
    /// Validity annotation; text passes through unchanged.
    Validate,
    /// Display-only rewrites that hide information.
    Mask,
}

/// Which rule a validity stage checks.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ValidityKind {
    Number,
    Expiry,
    Cvc,
    HolderName,
}

impl ValidityKind {
    /// CVC length depends on `network`; the other kinds ignore it.
    pub fn check(self, value: &str, network: Network) -> bool {
        match self {
            ValidityKind::Number => validate_card_number(value),
            ValidityKind::Expiry => parse_expiry(value).is_valid(),
            ValidityKind::Cvc => validate_cvc(value, network),
            ValidityKind::HolderName => !value.is_empty(),
        }
    }
}

pub type TransformFn = Box<dyn Fn(&str) -> String>;

/// One pipeline stage.
pub enum Filter {
    Normalize(TransformFn),
    Validity(ValidityKind),
    /// Replace digits with the given character (see [`mask_card_number`]).
    Mask(char),
}

impl Filter {
    pub fn normalize(f: impl Fn(&str) -> String + 'static) -> Self {
        Filter::Normalize(Box::new(f))
    }

    pub fn validity(kind: ValidityKind) -> Self {
        Filter::Validity(kind)
    }

    pub fn phase(&self) -> Phase {
        match self {
            Filter::Normalize(_) => Phase::Normalize,
            Filter::Validity(_) => Phase::Validate,
            Filter::Mask(_) => Phase::Mask,
        }
    }

    fn apply(&self, value: String, ctx: &mut StageCtx<'_>) -> String {
        match self {
            Filter::Normalize(f) => f(&value),
            Filter::Validity(kind) => {
                let ok = kind.check(&value, ctx.network);
                toggle_validity(ctx.surface, ctx.inputs, ok, ctx.classes);
                toggle_validity(ctx.surface, ctx.outputs, ok, ctx.classes);
                value
            }
            Filter::Mask(mask) => mask_card_number(&value, *mask),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Normalize(_) => f.write_str("Normalize(..)"),
            Filter::Validity(kind) => f.debug_tuple("Validity").field(kind).finish(),
            Filter::Mask(c) => f.debug_tuple("Mask").field(c).finish(),
        }
    }
}

/// What a stage may see and touch while running.
pub struct StageCtx<'a> {
    pub surface: &'a mut dyn Surface,
    pub inputs: &'a [ElementId],
    pub outputs: &'a [ElementId],
    pub network: Network,
    pub classes: &'a ValidityClasses,
}

#[derive(Debug, Default)]
pub struct FilterPipeline {
    stages: Vec<Filter>,
}

impl FilterPipeline {
    pub fn new(mut stages: Vec<Filter>) -> Self {
        // Stable: declaration order is kept within a phase.
        stages.sort_by_key(Filter::phase);
        Self { stages }
    }

    pub fn run(&self, value: String, ctx: &mut StageCtx<'_>) -> String {
        self.stages
            .iter()
            .fold(value, |value, stage| stage.apply(value, ctx))
    }

    pub fn phases(&self) -> impl Iterator<Item = Phase> + '_ {
        self.stages.iter().map(Filter::phase)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Add `valid` and drop `invalid` when `ok`, the reverse otherwise.
pub fn toggle_validity(
    surface: &mut dyn Surface,
    elements: &[ElementId],
    ok: bool,
    classes: &ValidityClasses,
) {
    let (add, remove) = if ok {
        (&classes.valid, &classes.invalid)
    } else {
        (&classes.invalid, &classes.valid)
    };
    for &el in elements {
        surface.remove_class(el, remove);
        surface.add_class(el, add);
    }
}

/// Mask every digit except those of the last space-separated group, once at
/// least three groups are present; before that every digit is masked.
pub fn mask_card_number(value: &str, mask: char) -> String {
    let mask_digits = |s: &str| -> String {
        s.chars()
            .map(|c| if c.is_ascii_digit() { mask } else { c })
            .collect()
    };
    let groups: Vec<&str> = value.split(' ').collect();
    if groups.len() < 3 {
        return mask_digits(value);
    }
    let last = groups.len() - 1;
    groups
        .iter()
        .enumerate()
        .map(|(i, g)| if i == last { g.to_string() } else { mask_digits(g) })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Expiry normalization: a lone leading `0` shows the placeholder, whitespace is dropped.
pub fn normalize_expiry(value: &str) -> String {
    if value == "0" {
        return String::new();
    }
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_sort_by_phase_stably() {
        let p = FilterPipeline::new(vec![
            Filter::Mask('*'),
            Filter::validity(ValidityKind::Number),
            Filter::normalize(|s| s.trim().to_string()),
            Filter::normalize(|s| s.to_uppercase()),
        ]);
        let phases: Vec<Phase> = p.phases().collect();
        assert_eq!(
            phases,
            vec![Phase::Normalize, Phase::Normalize, Phase::Validate, Phase::Mask]
        );
        assert_eq!(p.len(), 4);
    }

    #[test]
    fn mask_keeps_last_group_once_three_groups_exist() {
        assert_eq!(mask_card_number("4242 4242 4242 4242", '•'), "•••• •••• •••• 4242");
        assert_eq!(mask_card_number("4242 4242 42", '•'), "•••• •••• 42");
        assert_eq!(mask_card_number("4242 42", '*'), "**** **");
        assert_eq!(mask_card_number("", '*'), "");
    }

    #[test]
    fn expiry_normalization() {
        assert_eq!(normalize_expiry("0"), "");
        assert_eq!(normalize_expiry("01 / 2"), "01/2");
        assert_eq!(normalize_expiry(""), "");
    }

    #[test]
    fn holder_name_only_needs_text() {
        assert!(ValidityKind::HolderName.check("A", Network::Unknown));
        assert!(!ValidityKind::HolderName.check("", Network::Unknown));
    }
}
