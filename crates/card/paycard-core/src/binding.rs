//! Field bindings: one logical form field fanned out to its card displays.
//!
//! A binding owns the ordered input elements, the ordered display elements,
//! the placeholder text each display had at bind time, a join rule for
//! multi-part fields and the filter pipeline. `sync` is the whole update:
//! read, join, filter, write.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::ElementId;
use crate::options::ValidityClasses;
use crate::pipeline::{Filter, FilterPipeline, StageCtx};
use crate::surface::{EventKind, Surface};
use paycard_payment::Network;

/// Marker added to every display of a field while one of its inputs has focus.
pub const FOCUSED_MARKER: &str = "jp-card-focused";

/// Logical form fields the card knows about.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Number,
    Expiry,
    Cvc,
    Name,
}

impl Field {
    /// Mount and replay order.
    pub const ALL: [Field; 4] = [Field::Number, Field::Expiry, Field::Cvc, Field::Name];

    pub fn name(self) -> &'static str {
        match self {
            Field::Number => "number",
            Field::Expiry => "expiry",
            Field::Cvc => "cvc",
            Field::Name => "name",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Separator placed between the values of a multi-input field.
pub enum JoinRule {
    Static(String),
    /// `delimiter` once the first part has `first_len` characters or the
    /// second part has any content; nothing before that.
    Progressive { delimiter: String, first_len: usize },
    Custom(Box<dyn Fn(&[String]) -> String>),
}

impl JoinRule {
    /// Month/year pair: `12` + `/` + `25`.
    pub fn expiry() -> Self {
        JoinRule::Progressive {
            delimiter: "/".into(),
            first_len: 2,
        }
    }

    pub fn separator(&self, values: &[String]) -> String {
        match self {
            JoinRule::Static(sep) => sep.clone(),
            JoinRule::Progressive {
                delimiter,
                first_len,
            } => {
                let first_done = values
                    .first()
                    .is_some_and(|v| v.chars().count() == *first_len);
                let second_started = values.get(1).is_some_and(|v| !v.is_empty());
                if first_done || second_started {
                    delimiter.clone()
                } else {
                    String::new()
                }
            }
            JoinRule::Custom(f) => f(values),
        }
    }
}

impl Default for JoinRule {
    fn default() -> Self {
        JoinRule::Static(String::new())
    }
}

impl fmt::Debug for JoinRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinRule::Static(sep) => f.debug_tuple("Static").field(sep).finish(),
            JoinRule::Progressive {
                delimiter,
                first_len,
            } => f
                .debug_struct("Progressive")
                .field("delimiter", delimiter)
                .field("first_len", first_len)
                .finish(),
            JoinRule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Default)]
pub struct BindConfig {
    /// Show the tail of the placeholder after the typed text.
    pub fill: bool,
    pub filters: Vec<Filter>,
    pub join: JoinRule,
}

#[derive(Debug)]
pub struct FieldBinding {
    field: Field,
    inputs: Vec<ElementId>,
    outputs: Vec<ElementId>,
    defaults: Vec<String>,
    pipeline: FilterPipeline,
    join: JoinRule,
    fill: bool,
}

impl FieldBinding {
    /// Capture display defaults, then run one sync so pre-filled inputs show immediately.
    pub fn bind(
        surface: &mut dyn Surface,
        field: Field,
        inputs: Vec<ElementId>,
        outputs: Vec<ElementId>,
        config: BindConfig,
        network: Network,
        classes: &ValidityClasses,
    ) -> Self {
        let defaults = outputs.iter().map(|&o| surface.text(o)).collect();
        let binding = Self {
            field,
            inputs,
            outputs,
            defaults,
            pipeline: FilterPipeline::new(config.filters),
            join: config.join,
            fill: config.fill,
        };
        binding.sync(surface, network, classes);
        binding
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn inputs(&self) -> &[ElementId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[ElementId] {
        &self.outputs
    }

    /// Display text captured at bind time, one per output.
    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    pub fn pipeline(&self) -> &FilterPipeline {
        &self.pipeline
    }

    pub fn listens_to(&self, el: ElementId) -> bool {
        self.inputs.contains(&el)
    }

    /// Read, join, filter and write. Returns the filtered value.
    pub fn sync(
        &self,
        surface: &mut dyn Surface,
        network: Network,
        classes: &ValidityClasses,
    ) -> String {
        let values: Vec<String> = self.inputs.iter().map(|&el| surface.value(el)).collect();
        let separator = self.join.separator(&values);
        let mut joined = values.join(separator.as_str());
        if joined == separator {
            joined.clear();
        }

        let mut ctx = StageCtx {
            surface: &mut *surface,
            inputs: &self.inputs,
            outputs: &self.outputs,
            network,
            classes,
        };
        let value = self.pipeline.run(joined, &mut ctx);

        for (&out, default) in self.outputs.iter().zip(&self.defaults) {
            let text = if self.fill {
                let tail: String = default.chars().skip(value.chars().count()).collect();
                format!("{value}{tail}")
            } else if value.is_empty() {
                default.clone()
            } else {
                value.clone()
            };
            surface.set_text(out, &text);
        }
        value
    }

    /// React to an event on one of this binding's inputs.
    pub fn handle(
        &self,
        surface: &mut dyn Surface,
        kind: EventKind,
        network: Network,
        classes: &ValidityClasses,
    ) {
        match kind {
            EventKind::Input | EventKind::Paste => {
                self.sync(surface, network, classes);
            }
            EventKind::Focus => {
                for &out in &self.outputs {
                    surface.add_class(out, FOCUSED_MARKER);
                }
            }
            EventKind::Blur => {
                for &out in &self.outputs {
                    surface.remove_class(out, FOCUSED_MARKER);
                }
            }
        }
    }
}
