//! Owned element tree for island markup.
//!
//! Islands operate on a small owned node model, not a live document:
//! the excluded rendering pipeline has already produced the markup,
//! and hydration only decides when inert placeholder payloads join the
//! live children. `parse` lifts islands out of pre-rendered HTML and
//! `render` serializes them back.

pub mod parse;
pub mod render;

// ============================================================================
// Node
// ============================================================================

/// One node of island markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Box<Element>),
    Text(String),
    /// Inert placeholder payload. Not part of the live tree until the
    /// owning island is revealed.
    Placeholder(Vec<Node>),
}

// ============================================================================
// Element
// ============================================================================

/// An element with attributes and children, document order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Append an attribute (builder style).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Append a child (builder style).
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// True if any direct child is still an inert placeholder.
    pub fn has_placeholders(&self) -> bool {
        self.children
            .iter()
            .any(|n| matches!(n, Node::Placeholder(_)))
    }

    /// Replace every direct placeholder child with its payload,
    /// splicing in place so document order is preserved. Returns the
    /// number of placeholders revealed; revealing again is a no-op.
    pub fn reveal_placeholders(&mut self) -> usize {
        if !self.has_placeholders() {
            return 0;
        }

        let mut live = Vec::with_capacity(self.children.len());
        let mut revealed = 0;
        for node in self.children.drain(..) {
            match node {
                Node::Placeholder(payload) => {
                    revealed += 1;
                    live.extend(payload);
                }
                other => live.push(other),
            }
        }
        self.children = live;
        revealed
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    #[test]
    fn test_reveal_preserves_document_order() {
        let mut el = Element::new("div")
            .with_child(Node::Placeholder(vec![text("A")]))
            .with_child(Node::Placeholder(vec![text("B")]))
            .with_child(Node::Placeholder(vec![text("C")]));

        assert_eq!(el.reveal_placeholders(), 3);
        assert_eq!(el.children, vec![text("A"), text("B"), text("C")]);
    }

    #[test]
    fn test_reveal_splices_around_live_children() {
        let mut el = Element::new("div")
            .with_child(text("before"))
            .with_child(Node::Placeholder(vec![text("x"), text("y")]))
            .with_child(text("after"));

        assert_eq!(el.reveal_placeholders(), 1);
        assert_eq!(
            el.children,
            vec![text("before"), text("x"), text("y"), text("after")]
        );
    }

    #[test]
    fn test_reveal_twice_is_noop() {
        let mut el = Element::new("div").with_child(Node::Placeholder(vec![text("A")]));

        assert_eq!(el.reveal_placeholders(), 1);
        let live = el.children.clone();
        assert_eq!(el.reveal_placeholders(), 0);
        assert_eq!(el.children, live);
    }

    #[test]
    fn test_attr_lookup() {
        let el = Element::new("div").with_attr("client:media", "(max-width: 400px)");
        assert_eq!(el.attr("client:media"), Some("(max-width: 400px)"));
        assert_eq!(el.attr("client:idle"), None);
    }
}
