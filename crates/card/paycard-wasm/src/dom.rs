//! Browser [`Surface`]: element handles are indices into a table of interned DOM elements.

use std::cell::RefCell;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit, Document, Element, HtmlInputElement};

use paycard_core::{CardEvent, CardMarkup, ElementId, Surface};

pub struct DomSurface {
    document: Document,
    elements: RefCell<Vec<Element>>,
    pending: Vec<CardEvent>,
}

fn report(op: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::warn!("{op} failed: {err:?}");
    }
}

/// Dispatch `event` on `document` as a bubbling `CustomEvent`.
pub fn publish(document: &Document, event: &CardEvent) {
    let init = CustomEventInit::new();
    init.set_bubbles(true);
    init.set_detail(&JsValue::from_str(&event.detail()));
    match CustomEvent::new_with_event_init_dict(event.name(), &init) {
        Ok(ev) => {
            if let Err(err) = document.dispatch_event(&ev) {
                log::warn!("dispatching {} failed: {err:?}", event.name());
            }
        }
        Err(err) => log::warn!("creating {} failed: {err:?}", event.name()),
    }
}

impl DomSurface {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            elements: RefCell::new(Vec::new()),
            pending: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Events emitted since the last call. Page listeners may call back into
    /// the widget, so they are only published once the card is released.
    pub fn take_pending(&mut self) -> Vec<CardEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Handle for `el`; the same element always gets the same handle.
    pub fn intern(&self, el: &Element) -> ElementId {
        let mut table = self.elements.borrow_mut();
        if let Some(i) = table.iter().position(|known| known == el) {
            return ElementId::from_index(i);
        }
        table.push(el.clone());
        ElementId::from_index(table.len() - 1)
    }

    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.elements.borrow().get(id.index()).cloned()
    }

    /// A selector string (looked up in the document) or an `Element`.
    pub fn resolve(&self, target: &JsValue) -> Option<ElementId> {
        if let Some(selector) = target.as_string() {
            return match self.document.query_selector(&selector) {
                Ok(found) => found.map(|el| self.intern(&el)),
                Err(err) => {
                    log::warn!("bad selector `{selector}`: {err:?}");
                    None
                }
            };
        }
        target
            .dyn_ref::<Element>()
            .map(|el| self.intern(el))
    }
}

impl Surface for DomSurface {
    fn query_all(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        let Some(root) = self.element(scope) else {
            return Vec::new();
        };
        let list = match root.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("bad selector `{selector}`: {err:?}");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.intern(&el))
            .collect()
    }

    fn value(&self, el: ElementId) -> String {
        self.element(el)
            .and_then(|e| e.dyn_ref::<HtmlInputElement>().map(HtmlInputElement::value))
            .unwrap_or_default()
    }

    fn set_value(&mut self, el: ElementId, value: &str) {
        if let Some(input) = self
            .element(el)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(value);
        }
    }

    fn text(&self, el: ElementId) -> String {
        self.element(el)
            .and_then(|e| e.text_content())
            .unwrap_or_default()
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        if let Some(e) = self.element(el) {
            e.set_text_content(Some(text));
        }
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.element(el)
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.element(el) {
            report("classList.add", e.class_list().add_1(class));
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.element(el) {
            report("classList.remove", e.class_list().remove_1(class));
        }
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.element(el).and_then(|e| e.get_attribute(name))
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(e) = self.element(el) {
            report("setAttribute", e.set_attribute(name, value));
        }
    }

    fn remove_attribute(&mut self, el: ElementId, name: &str) {
        if let Some(e) = self.element(el) {
            report("removeAttribute", e.remove_attribute(name));
        }
    }

    fn render(&mut self, container: ElementId, markup: &CardMarkup) {
        if let Some(e) = self.element(container) {
            report(
                "insertAdjacentHTML",
                e.insert_adjacent_html("beforeend", &markup.to_html()),
            );
        }
    }

    fn remove_rendered(&mut self, container: ElementId, markup: &CardMarkup) {
        let Some(rendered) = self.element(container).and_then(|e| e.last_element_child()) else {
            return;
        };
        let root = &markup.root;
        let list = rendered.class_list();
        if rendered.tag_name().eq_ignore_ascii_case(root.tag)
            && root.classes.iter().all(|c| list.contains(c))
        {
            rendered.remove();
        }
    }

    fn emit(&mut self, event: CardEvent) {
        self.pending.push(event);
    }
}
