//! Host seam: everything the engine reads from or writes to the page.
//!
//! Adapters (browser DOM, in-memory) implement [`Surface`] and translate
//! their native events into [`InputEvent`]s for [`Card::handle`](crate::Card::handle).

use serde::{Deserialize, Serialize};

use crate::ids::ElementId;
use crate::template::CardMarkup;
use paycard_payment::Network;

/// Element access used by bindings, trackers and the card facade.
pub trait Surface {
    /// Descendants of `scope` matching `selector`, in document order.
    fn query_all(&self, scope: ElementId, selector: &str) -> Vec<ElementId>;

    fn query_first(&self, scope: ElementId, selector: &str) -> Option<ElementId> {
        self.query_all(scope, selector).into_iter().next()
    }

    /// Current value of a form control (empty for non-controls).
    fn value(&self, el: ElementId) -> String;
    fn set_value(&mut self, el: ElementId, value: &str);

    fn text(&self, el: ElementId) -> String;
    fn set_text(&mut self, el: ElementId, text: &str);

    fn has_class(&self, el: ElementId, class: &str) -> bool;
    fn add_class(&mut self, el: ElementId, class: &str);
    fn remove_class(&mut self, el: ElementId, class: &str);

    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str);
    fn remove_attribute(&mut self, el: ElementId, name: &str);

    /// Append the card markup as the last child of `container`.
    fn render(&mut self, container: ElementId, markup: &CardMarkup);

    /// Remove what `render` appended to `container`; other children stay.
    fn remove_rendered(&mut self, container: ElementId, markup: &CardMarkup);

    /// Publish a page-level notification.
    fn emit(&mut self, event: CardEvent);
}

/// Kinds of input events the engine reacts to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Value changed (`keyup`, `change`, `input`).
    Input,
    Paste,
    Focus,
    Blur,
}

impl EventKind {
    /// Map a DOM event type name; `None` for events the engine ignores.
    pub fn from_dom_type(name: &str) -> Option<Self> {
        match name {
            "keyup" | "change" | "input" => Some(EventKind::Input),
            "paste" => Some(EventKind::Paste),
            "focus" => Some(EventKind::Focus),
            "blur" => Some(EventKind::Blur),
            _ => None,
        }
    }

    /// DOM event types an adapter should listen to on every bound input.
    pub const DOM_TYPES: [&'static str; 5] = ["keyup", "change", "paste", "focus", "blur"];
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub target: ElementId,
    pub kind: EventKind,
}

impl InputEvent {
    pub fn new(target: ElementId, kind: EventKind) -> Self {
        Self { target, kind }
    }
}

/// Notifications published to the page.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CardEvent {
    /// Fired on every number update, even when the network did not change.
    CardTypeChanged { network: Network },
}

impl CardEvent {
    /// DOM event name.
    pub fn name(&self) -> &'static str {
        match self {
            CardEvent::CardTypeChanged { .. } => "card-type-changed",
        }
    }

    /// Payload carried as the event detail.
    pub fn detail(&self) -> String {
        match self {
            CardEvent::CardTypeChanged { network } => network.id().to_string(),
        }
    }
}
