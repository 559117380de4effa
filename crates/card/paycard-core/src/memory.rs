//! In-memory [`Surface`]: a small element tree with classes, attributes,
//! values and text, plus a log of emitted events.
//!
//! Selectors are single compound selectors (`tag`, `.class`, `#id`,
//! `[attr]`, `[attr="value"]`, combined freely); combinators are not supported
//! and such selectors match nothing.

use std::iter::Peekable;
use std::str::Chars;

use hashbrown::HashMap;

use crate::card::MountTargets;
use crate::ids::ElementId;
use crate::surface::{CardEvent, Surface};
use crate::template::{CardMarkup, MarkupNode};

#[derive(Debug, Default)]
struct Node {
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    value: String,
    text: String,
}

#[derive(Debug)]
pub struct MemorySurface {
    nodes: Vec<Node>,
    events: Vec<CardEvent>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// An empty document (just the root element).
    pub fn new() -> Self {
        let root = Node {
            tag: "html".into(),
            ..Node::default()
        };
        Self {
            nodes: vec![root],
            events: Vec::new(),
        }
    }

    /// A document with `<form id="payment-form">` holding one named input per
    /// value (several values per name give several inputs) and an empty
    /// `<div id="card-container">`.
    pub fn with_form<I, K, V>(fields: I) -> (Self, MountTargets)
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut surface = Self::new();
        let doc = surface.document();
        let form = surface.create(doc, "form");
        surface.set_attribute(form, "id", "payment-form");
        for (name, values) in fields {
            for value in values {
                surface.input(form, name.as_ref(), value.as_ref());
            }
        }
        let container = surface.create(doc, "div");
        surface.set_attribute(container, "id", "card-container");
        let targets = MountTargets {
            form: Some(form),
            container: Some(container),
        };
        (surface, targets)
    }

    pub fn document(&self) -> ElementId {
        ElementId(0)
    }

    /// Append a new `tag` element under `parent`.
    pub fn create(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = ElementId::from_index(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_string(),
            parent: Some(parent),
            ..Node::default()
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Append `<input name="...">` with an initial value.
    pub fn input(&mut self, parent: ElementId, name: &str, value: &str) -> ElementId {
        let id = self.create(parent, "input");
        self.set_attribute(id, "name", name);
        self.set_value(id, value);
        id
    }

    pub fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.nodes.get(el.index()).and_then(|n| n.parent)
    }

    pub fn children(&self, el: ElementId) -> &[ElementId] {
        self.nodes
            .get(el.index())
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn classes(&self, el: ElementId) -> &[String] {
        self.nodes
            .get(el.index())
            .map(|n| n.classes.as_slice())
            .unwrap_or(&[])
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> &[CardEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<CardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Simulate typing: replace the value of `el`.
    pub fn type_into(&mut self, el: ElementId, value: &str) {
        self.set_value(el, value);
    }

    fn materialize(&mut self, parent: ElementId, node: &MarkupNode) {
        let id = self.create(parent, node.tag);
        for class in &node.classes {
            self.add_class(id, class);
        }
        for (name, value) in &node.attributes {
            self.set_attribute(id, name, value);
        }
        self.set_text(id, &node.text);
        for child in &node.children {
            self.materialize(id, child);
        }
    }

    fn descendants(&self, scope: ElementId, out: &mut Vec<ElementId>) {
        for &child in self.children(scope) {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn matches(&self, el: ElementId, sel: &Compound) -> bool {
        let Some(node) = self.nodes.get(el.index()) else {
            return false;
        };
        if sel.tag.as_ref().is_some_and(|t| !t.eq_ignore_ascii_case(&node.tag)) {
            return false;
        }
        if let Some(id) = &sel.id {
            if node.attributes.get("id") != Some(id) {
                return false;
            }
        }
        if !sel.classes.iter().all(|c| node.classes.contains(c)) {
            return false;
        }
        sel.attrs.iter().all(|(name, expected)| {
            match (node.attributes.get(name), expected) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            }
        })
    }
}

impl Surface for MemorySurface {
    fn query_all(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        let Some(sel) = Compound::parse(selector) else {
            log::warn!("unsupported selector `{selector}`");
            return Vec::new();
        };
        let mut all = Vec::new();
        self.descendants(scope, &mut all);
        all.into_iter().filter(|&el| self.matches(el, &sel)).collect()
    }

    fn value(&self, el: ElementId) -> String {
        self.nodes
            .get(el.index())
            .map(|n| n.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&mut self, el: ElementId, value: &str) {
        if let Some(n) = self.nodes.get_mut(el.index()) {
            n.value = value.to_string();
        }
    }

    fn text(&self, el: ElementId) -> String {
        self.nodes
            .get(el.index())
            .map(|n| n.text.clone())
            .unwrap_or_default()
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        if let Some(n) = self.nodes.get_mut(el.index()) {
            n.text = text.to_string();
        }
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.classes(el).iter().any(|c| c == class)
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(n) = self.nodes.get_mut(el.index()) {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(n) = self.nodes.get_mut(el.index()) {
            n.classes.retain(|c| c != class);
        }
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.nodes
            .get(el.index())
            .and_then(|n| n.attributes.get(name).cloned())
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(el.index()) {
            n.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, el: ElementId, name: &str) {
        if let Some(n) = self.nodes.get_mut(el.index()) {
            n.attributes.remove(name);
        }
    }

    fn render(&mut self, container: ElementId, markup: &CardMarkup) {
        self.materialize(container, &markup.root);
    }

    fn remove_rendered(&mut self, container: ElementId, markup: &CardMarkup) {
        let root = &markup.root;
        let rendered = self.children(container).iter().rev().copied().find(|&child| {
            self.nodes[child.index()].tag == root.tag
                && root.classes.iter().all(|c| self.has_class(child, c))
        });
        if let Some(child) = rendered {
            self.nodes[container.index()].children.retain(|&c| c != child);
            self.nodes[child.index()].parent = None;
        }
    }

    fn emit(&mut self, event: CardEvent) {
        self.events.push(event);
    }
}

/// One compound selector.
#[derive(Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    ident
}

impl Compound {
    fn parse(selector: &str) -> Option<Compound> {
        let s = selector.trim();
        if s.is_empty() {
            return None;
        }
        let mut out = Compound::default();
        let mut chars = s.chars().peekable();

        if chars.peek().is_some_and(|&c| is_ident(c) || c == '*') {
            if chars.peek() == Some(&'*') {
                chars.next();
            } else {
                out.tag = Some(take_ident(&mut chars));
            }
        }

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    let class = take_ident(&mut chars);
                    if class.is_empty() {
                        return None;
                    }
                    out.classes.push(class);
                }
                '#' => {
                    let id = take_ident(&mut chars);
                    if id.is_empty() {
                        return None;
                    }
                    out.id = Some(id);
                }
                '[' => {
                    let name = take_ident(&mut chars);
                    if name.is_empty() {
                        return None;
                    }
                    match chars.next()? {
                        ']' => out.attrs.push((name, None)),
                        '=' => {
                            let value = match chars.peek() {
                                Some(&q @ ('"' | '\'')) => {
                                    chars.next();
                                    let mut v = String::new();
                                    loop {
                                        match chars.next()? {
                                            c if c == q => break,
                                            c => v.push(c),
                                        }
                                    }
                                    v
                                }
                                _ => take_ident(&mut chars),
                            };
                            if chars.next()? != ']' {
                                return None;
                            }
                            out.attrs.push((name, Some(value)));
                        }
                        _ => return None,
                    }
                }
                _ => return None,
            }
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound_selectors() {
        let sel = Compound::parse(r#"input[name="number"]"#).unwrap();
        assert_eq!(sel.tag.as_deref(), Some("input"));
        assert_eq!(
            sel.attrs,
            vec![("name".to_string(), Some("number".to_string()))]
        );

        let sel = Compound::parse("div.jp-card.jp-card-visa#main").unwrap();
        assert_eq!(sel.classes, vec!["jp-card", "jp-card-visa"]);
        assert_eq!(sel.id.as_deref(), Some("main"));

        assert!(Compound::parse("form input").is_none());
        assert!(Compound::parse("").is_none());
        assert!(Compound::parse("[name=cvc]").is_some());
    }

    #[test]
    fn query_walks_descendants_in_document_order() {
        let (mut s, targets) = MemorySurface::with_form([("expiry", vec!["12", "25"])]);
        let form = targets.form.unwrap();
        let found = s.query_all(form, r#"input[name="expiry"]"#);
        assert_eq!(found.len(), 2);
        assert_eq!(s.value(found[0]), "12");
        assert_eq!(s.value(found[1]), "25");

        let doc = s.document();
        assert_eq!(s.query_all(doc, "#payment-form"), vec![form]);
        let extra = s.create(found[0], "span");
        s.add_class(extra, "x");
        assert_eq!(s.query_first(doc, ".x"), Some(extra));
        assert_eq!(s.parent(extra), Some(found[0]));
    }

    #[test]
    fn classes_are_a_set() {
        let mut s = MemorySurface::new();
        let doc = s.document();
        let el = s.create(doc, "div");
        s.add_class(el, "a");
        s.add_class(el, "a");
        s.add_class(el, "b");
        assert_eq!(s.classes(el), ["a", "b"]);
        s.remove_class(el, "a");
        assert!(!s.has_class(el, "a"));
    }

    #[test]
    fn render_materializes_markup() {
        let (mut s, targets) = MemorySurface::with_form(Vec::<(String, Vec<String>)>::new());
        let container = targets.container.unwrap();
        s.render(container, &CardMarkup::new(&Default::default()));
        let card = s.query_first(container, ".jp-card").unwrap();
        let backs = s.query_all(card, ".jp-card-cvc-back");
        assert_eq!(backs.len(), 1);
        assert_eq!(s.text(backs[0]), "•••");
        let expiry = s.query_first(container, ".jp-card-expiry").unwrap();
        assert_eq!(s.attribute(expiry, "data-after").as_deref(), Some("valid\nthru"));
    }

    #[test]
    fn remove_rendered_keeps_existing_children() {
        let (mut s, targets) = MemorySurface::with_form(Vec::<(String, Vec<String>)>::new());
        let container = targets.container.unwrap();
        let own = s.create(container, "span");
        let markup = CardMarkup::new(&Default::default());
        s.render(container, &markup);
        assert_eq!(s.children(container).len(), 2);

        s.remove_rendered(container, &markup);
        assert_eq!(s.children(container), [own]);
        assert_eq!(s.query_first(container, ".jp-card"), None);
    }
}
