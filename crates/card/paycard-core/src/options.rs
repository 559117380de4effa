//! Construction-time configuration.
//!
//! Every struct is `#[serde(default)]`, so a partial JSON/JS object merges
//! field-by-field over the defaults (nested sections included).

use serde::{Deserialize, Deserializer, Serialize};

use crate::binding::Field;
use crate::error::OptionsError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardOptions {
    /// Rewrite input values as the user types (digit grouping, `MM / YY`, CVC digits).
    pub formatting: bool,
    pub form_selectors: FormSelectors,
    pub card_selectors: CardSelectors,
    pub messages: Messages,
    pub placeholders: Placeholders,
    pub masks: Masks,
    pub classes: ValidityClasses,
    /// Log selector misses for optional card elements.
    pub debug: bool,
    /// Top-level shorthand for a `formSelectors` entry; wins when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvc_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_input: Option<String>,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            formatting: true,
            form_selectors: FormSelectors::default(),
            card_selectors: CardSelectors::default(),
            messages: Messages::default(),
            placeholders: Placeholders::default(),
            masks: Masks::default(),
            classes: ValidityClasses::default(),
            debug: false,
            number_input: None,
            expiry_input: None,
            cvc_input: None,
            name_input: None,
        }
    }
}

impl CardOptions {
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The selector used to find a field's inputs inside the form.
    pub fn input_selector(&self, field: Field) -> &str {
        let top_level = match field {
            Field::Number => &self.number_input,
            Field::Expiry => &self.expiry_input,
            Field::Cvc => &self.cvc_input,
            Field::Name => &self.name_input,
        };
        top_level
            .as_deref()
            .unwrap_or_else(|| self.form_selectors.for_field(field))
    }
}

/// Selectors for the form inputs, resolved inside the form element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormSelectors {
    pub number_input: String,
    pub expiry_input: String,
    pub cvc_input: String,
    pub name_input: String,
}

impl Default for FormSelectors {
    fn default() -> Self {
        Self {
            number_input: r#"input[name="number"]"#.into(),
            expiry_input: r#"input[name="expiry"]"#.into(),
            cvc_input: r#"input[name="cvc"]"#.into(),
            name_input: r#"input[name="name"]"#.into(),
        }
    }
}

impl FormSelectors {
    pub fn for_field(&self, field: Field) -> &str {
        match field {
            Field::Number => &self.number_input,
            Field::Expiry => &self.expiry_input,
            Field::Cvc => &self.cvc_input,
            Field::Name => &self.name_input,
        }
    }
}

/// Selectors for the rendered card, resolved inside the container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardSelectors {
    pub card: String,
    pub number_display: String,
    pub expiry_display: String,
    pub cvc_display_front: String,
    pub cvc_display_back: String,
    pub name_display: String,
}

impl Default for CardSelectors {
    fn default() -> Self {
        Self {
            card: ".jp-card".into(),
            number_display: ".jp-card-number".into(),
            expiry_display: ".jp-card-expiry".into(),
            cvc_display_front: ".jp-card-cvc-front".into(),
            cvc_display_back: ".jp-card-cvc-back".into(),
            name_display: ".jp-card-name".into(),
        }
    }
}

impl CardSelectors {
    /// Display selectors for a field, in output order (CVC shows front then back).
    pub fn displays_for(&self, field: Field) -> Vec<(&'static str, &str)> {
        match field {
            Field::Number => vec![("numberDisplay", self.number_display.as_str())],
            Field::Expiry => vec![("expiryDisplay", self.expiry_display.as_str())],
            Field::Cvc => vec![
                ("cvcDisplayFront", self.cvc_display_front.as_str()),
                ("cvcDisplayBack", self.cvc_display_back.as_str()),
            ],
            Field::Name => vec![("nameDisplay", self.name_display.as_str())],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Messages {
    pub valid_date: String,
    pub month_year: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            valid_date: "valid\nthru".into(),
            month_year: "month/year".into(),
        }
    }
}

/// Text shown on the card while a field is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub number: String,
    pub cvc: String,
    pub expiry: String,
    pub name: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            number: "•••• •••• •••• ••••".into(),
            cvc: "•••".into(),
            expiry: "••/••".into(),
            name: "Full Name".into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Masks {
    /// Character replacing masked digits on the card; `false`/`null` disables masking.
    #[serde(deserialize_with = "deserialize_mask")]
    pub card_number: Option<char>,
}

/// Marker names toggled on inputs and displays by validity stages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidityClasses {
    pub valid: String,
    pub invalid: String,
}

impl Default for ValidityClasses {
    fn default() -> Self {
        Self {
            valid: "jp-card-valid".into(),
            invalid: "jp-card-invalid".into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MaskSetting {
    Flag(bool),
    Text(String),
}

fn deserialize_mask<'de, D>(deserializer: D) -> Result<Option<char>, D::Error>
where
    D: Deserializer<'de>,
{
    let setting: Option<MaskSetting> = Option::deserialize(deserializer)?;
    Ok(match setting {
        Some(MaskSetting::Text(s)) => s.chars().next(),
        Some(MaskSetting::Flag(true)) => Some('•'),
        Some(MaskSetting::Flag(false)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_merges_over_defaults() {
        let opts = CardOptions::from_json(
            r#"{ "formatting": false, "placeholders": { "name": "Your Name" }, "classes": { "valid": "ok" } }"#,
        )
        .unwrap();
        assert!(!opts.formatting);
        assert_eq!(opts.placeholders.name, "Your Name");
        assert_eq!(opts.placeholders.cvc, "•••");
        assert_eq!(opts.classes.valid, "ok");
        assert_eq!(opts.classes.invalid, "jp-card-invalid");
        assert_eq!(opts.form_selectors, FormSelectors::default());
    }

    #[test]
    fn mask_accepts_false_string_or_true() {
        let off = CardOptions::from_json(r#"{ "masks": { "cardNumber": false } }"#).unwrap();
        assert_eq!(off.masks.card_number, None);
        let on = CardOptions::from_json(r#"{ "masks": { "cardNumber": "X" } }"#).unwrap();
        assert_eq!(on.masks.card_number, Some('X'));
        let default = CardOptions::from_json(r#"{ "masks": { "cardNumber": true } }"#).unwrap();
        assert_eq!(default.masks.card_number, Some('•'));
    }

    #[test]
    fn selector_overrides_are_per_field() {
        let opts = CardOptions::from_json(
            r##"{ "formSelectors": { "cvcInput": "#cvc" }, "cardSelectors": { "nameDisplay": ".holder" } }"##,
        )
        .unwrap();
        assert_eq!(opts.form_selectors.for_field(Field::Cvc), "#cvc");
        assert_eq!(
            opts.form_selectors.for_field(Field::Number),
            r#"input[name="number"]"#
        );
        assert_eq!(
            opts.card_selectors.displays_for(Field::Name),
            vec![("nameDisplay", ".holder")]
        );
    }

    #[test]
    fn top_level_input_selector_wins_over_form_selectors() {
        let opts = CardOptions::from_json(
            r##"{ "numberInput": "#cc", "formSelectors": { "numberInput": "#ignored", "nameInput": "#holder" } }"##,
        )
        .unwrap();
        assert_eq!(opts.input_selector(Field::Number), "#cc");
        assert_eq!(opts.input_selector(Field::Name), "#holder");
        assert_eq!(opts.input_selector(Field::Cvc), r#"input[name="cvc"]"#);
        let json = serde_json::to_string(&CardOptions::default()).unwrap();
        assert!(!json.contains("\"numberInput\":null"));
    }

    #[test]
    fn malformed_json_is_an_options_error() {
        let err = CardOptions::from_json("{ formatting: ").unwrap_err();
        assert!(err.to_string().contains("invalid card options"));
    }
}
