//! Card markup: the display slots the bindings write into.
//!
//! The markup is built as a node tree so hosts can either materialize it
//! directly (in-memory surface) or serialize it with [`CardMarkup::to_html`].

use crate::options::CardOptions;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkupNode {
    pub tag: &'static str,
    pub classes: Vec<String>,
    pub text: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    /// `<div>` with space-separated `classes`.
    pub fn div(classes: &str) -> Self {
        Self {
            tag: "div",
            classes: classes.split_whitespace().map(str::to_string).collect(),
            text: String::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, node: MarkupNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = MarkupNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        if !self.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&escape(&self.classes.join(" ")));
            out.push('"');
        }
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        out.push('>');
        out.push_str(&escape(&self.text));
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn lettered(classes: &str, letters: &[&str]) -> MarkupNode {
    MarkupNode::div(classes).children(letters.iter().map(|l| MarkupNode::div(l).text(*l)))
}

fn logos() -> Vec<MarkupNode> {
    vec![
        lettered("jp-card-logo jp-card-elo", &["e", "l", "o"]),
        MarkupNode::div("jp-card-logo jp-card-visa").text("Visa"),
        MarkupNode::div("jp-card-logo jp-card-visaelectron")
            .text("Visa")
            .child(MarkupNode::div("elec").text("Electron")),
        MarkupNode::div("jp-card-logo jp-card-mastercard").text("Mastercard"),
        MarkupNode::div("jp-card-logo jp-card-maestro").text("Maestro"),
        MarkupNode::div("jp-card-logo jp-card-amex"),
        MarkupNode::div("jp-card-logo jp-card-discover").text("discover"),
        MarkupNode::div("jp-card-logo jp-card-unionpay").text("UnionPay"),
        MarkupNode::div("jp-card-logo jp-card-dinersclub"),
        MarkupNode::div("jp-card-logo jp-card-hipercard").text("Hipercard"),
        MarkupNode::div("jp-card-logo jp-card-troy").text("troy"),
        MarkupNode::div("jp-card-logo jp-card-dankort").child(
            MarkupNode::div("dk")
                .child(MarkupNode::div("d"))
                .child(MarkupNode::div("k")),
        ),
        lettered("jp-card-logo jp-card-jcb", &["j", "c", "b"]),
    ]
}

/// The full card, front and back, with placeholders and messages filled in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardMarkup {
    pub root: MarkupNode,
}

impl CardMarkup {
    pub fn new(options: &CardOptions) -> Self {
        let p = &options.placeholders;
        let m = &options.messages;

        let lower = MarkupNode::div("jp-card-lower").children([
            MarkupNode::div("jp-card-shiny"),
            MarkupNode::div("jp-card-cvc jp-card-display jp-card-cvc-front").text(&p.cvc),
            MarkupNode::div("jp-card-number jp-card-display").text(&p.number),
            MarkupNode::div("jp-card-name jp-card-display").text(&p.name),
            MarkupNode::div("jp-card-expiry jp-card-display")
                .attr("data-before", &m.month_year)
                .attr("data-after", &m.valid_date)
                .text(&p.expiry),
        ]);
        let front = MarkupNode::div("jp-card-front")
            .children(logos())
            .child(lower);
        let back = MarkupNode::div("jp-card-back").children([
            MarkupNode::div("jp-card-bar"),
            MarkupNode::div("jp-card-cvc jp-card-display jp-card-cvc-back").text(&p.cvc),
            MarkupNode::div("jp-card-shiny"),
        ]);
        let root = MarkupNode::div("jp-card-container")
            .child(MarkupNode::div("jp-card").child(front).child(back));
        Self { root }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.root.write_html(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_land_in_display_slots() {
        let opts = CardOptions::default();
        let html = CardMarkup::new(&opts).to_html();
        assert!(html.starts_with("<div class=\"jp-card-container\"><div class=\"jp-card\">"));
        assert!(html.contains(
            "<div class=\"jp-card-number jp-card-display\">•••• •••• •••• ••••</div>"
        ));
        assert!(html.contains("data-before=\"month/year\""));
        assert_eq!(html.matches("jp-card-cvc jp-card-display").count(), 2);
    }

    #[test]
    fn user_text_is_escaped() {
        let mut opts = CardOptions::default();
        opts.placeholders.name = "<b>\"x\"</b>".into();
        let html = CardMarkup::new(&opts).to_html();
        assert!(html.contains("&lt;b&gt;&quot;x&quot;&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }
}
