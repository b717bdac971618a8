//! Island scan over pre-rendered HTML.
//!
//! The build pipeline (an external collaborator) emits, for each
//! deferred region, an element carrying `client:*` condition
//! attributes and wrapping its withheld content in `<template>`
//! children. This module parses such a document with `tl` and lifts
//! every island subtree into the owned [`Element`] model, turning
//! `<template>` children into inert [`Node::Placeholder`]s.

use thiserror::Error;

use super::{Element, Node};

/// Tag whose content is the deferred-content container.
const PLACEHOLDER_TAG: &str = "template";

/// Markup-level errors.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("HTML parsing failed: {0}")]
    Parse(String),
}

/// Find every island in a pre-rendered document.
///
/// An island is any element carrying at least one attribute with the
/// given condition prefix. Islands are returned in document order; the
/// scan does not descend into an island once lifted, so nested
/// `client:*` markup stays part of the outer island's subtree.
pub fn find_islands(html: &str, prefix: &str) -> Result<Vec<Element>, MarkupError> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|e| MarkupError::Parse(e.to_string()))?;
    let parser = dom.parser();

    let mut islands = Vec::new();
    for handle in dom.children() {
        collect_islands(*handle, parser, prefix, &mut islands);
    }
    Ok(islands)
}

/// Depth-first island collection.
fn collect_islands(
    handle: tl::NodeHandle,
    parser: &tl::Parser,
    prefix: &str,
    out: &mut Vec<Element>,
) {
    let Some(node) = handle.get(parser) else {
        return;
    };
    let tl::Node::Tag(tag) = node else {
        return;
    };

    if has_condition_attr(tag, prefix) {
        out.push(lift_island(tag, parser));
        return;
    }

    for child in tag.children().top().iter() {
        collect_islands(*child, parser, prefix, out);
    }
}

/// True if the tag declares at least one condition attribute.
///
/// A bare prefix with no condition name does not count, matching the
/// hydration-time scan.
fn has_condition_attr(tag: &tl::HTMLTag, prefix: &str) -> bool {
    tag.attributes().iter().any(|(key, _)| {
        let key: &str = key.as_ref();
        key.strip_prefix(prefix).is_some_and(|name| !name.is_empty())
    })
}

/// Lift an island root, turning its direct `<template>` children into
/// inert placeholders.
///
/// Only direct children: that is exactly the set the reveal splice
/// replaces. A `<template>` nested deeper is ordinary markup and stays
/// an element, attributes and all (its content is inert by its own
/// nature, not by ours).
fn lift_island(tag: &tl::HTMLTag, parser: &tl::Parser) -> Element {
    let mut element = lift_element(tag, parser);
    element.children = element
        .children
        .into_iter()
        .map(|node| match node {
            Node::Element(el) if el.tag == PLACEHOLDER_TAG => Node::Placeholder(el.children),
            other => other,
        })
        .collect();
    element
}

/// Convert a tl tag subtree into an owned element.
fn lift_element(tag: &tl::HTMLTag, parser: &tl::Parser) -> Element {
    let mut element = Element::new(tag.name().as_utf8_str().to_lowercase());

    for (key, value) in tag.attributes().iter() {
        let key: &str = key.as_ref();
        let value = value.map(|v| v.to_string()).unwrap_or_default();
        element.attrs.push((key.to_string(), value));
    }

    for child in tag.children().top().iter() {
        if let Some(node) = lift_node(*child, parser) {
            element.children.push(node);
        }
    }
    element
}

/// Convert a tl node to an owned node.
fn lift_node(handle: tl::NodeHandle, parser: &tl::Parser) -> Option<Node> {
    let node = handle.get(parser)?;

    match node {
        tl::Node::Tag(tag) => Some(Node::Element(Box::new(lift_element(tag, parser)))),
        tl::Node::Raw(bytes) => {
            let text = bytes.as_utf8_str().to_string();
            // Skip whitespace-only text between markup
            if text.trim().is_empty() {
                None
            } else {
                Some(Node::Text(text))
            }
        }
        tl::Node::Comment(_) => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "client:";

    #[test]
    fn test_finds_islands_in_document_order() {
        let html = r#"
            <main>
                <div id="a" client:idle><template><p>one</p></template></div>
                <section>
                    <div id="b" client:visible><template><p>two</p></template></div>
                </section>
            </main>
        "#;
        let islands = find_islands(html, PREFIX).unwrap();
        assert_eq!(islands.len(), 2);
        assert_eq!(islands[0].attr("id"), Some("a"));
        assert_eq!(islands[1].attr("id"), Some("b"));
    }

    #[test]
    fn test_template_children_become_placeholders() {
        let html = r#"<div client:idle><template><p>hi</p></template><span>live</span></div>"#;
        let islands = find_islands(html, PREFIX).unwrap();
        assert_eq!(islands.len(), 1);

        let island = &islands[0];
        assert!(island.has_placeholders());
        assert!(matches!(island.children[0], Node::Placeholder(_)));
        assert!(matches!(island.children[1], Node::Element(_)));
    }

    #[test]
    fn test_condition_attributes_survive_lift() {
        let html = r#"<div client:media="(min-width: 800px)" client:idle=""></div>"#;
        let islands = find_islands(html, PREFIX).unwrap();
        assert_eq!(islands[0].attr("client:media"), Some("(min-width: 800px)"));
        assert_eq!(islands[0].attr("client:idle"), Some(""));
    }

    #[test]
    fn test_nested_template_stays_ordinary_markup() {
        // Only direct children of the island become placeholders; a
        // template one level deeper is plain markup with its
        // attributes intact.
        let html =
            r#"<div client:idle><section><template id="t"><p>x</p></template></section></div>"#;
        let mut island = find_islands(html, PREFIX).unwrap().pop().unwrap();

        assert!(!island.has_placeholders());
        assert_eq!(island.reveal_placeholders(), 0);
        let rendered = crate::dom::render::to_html(&island);
        assert!(
            rendered.contains(r#"<template id="t"><p>x</p></template>"#),
            "{rendered}"
        );
    }

    #[test]
    fn test_template_inside_placeholder_payload_survives() {
        let html = r#"<div client:idle><template><template id="inner">y</template></template></div>"#;
        let mut island = find_islands(html, PREFIX).unwrap().pop().unwrap();

        assert_eq!(island.reveal_placeholders(), 1);
        let rendered = crate::dom::render::to_html(&island);
        assert!(rendered.contains(r#"<template id="inner">y</template>"#));
    }

    #[test]
    fn test_bare_prefix_attribute_is_not_an_island() {
        // Matches the hydration-time scan, which rejects an empty
        // condition name.
        let html = r#"<div client:><template>x</template></div>"#;
        assert!(find_islands(html, PREFIX).unwrap().is_empty());
    }

    #[test]
    fn test_element_without_conditions_is_not_an_island() {
        let html = r#"<div><template><p>static</p></template></div>"#;
        let islands = find_islands(html, PREFIX).unwrap();
        assert!(islands.is_empty());
    }

    #[test]
    fn test_scan_does_not_descend_into_islands() {
        let html = r#"
            <div client:idle>
                <div client:visible><template>inner</template></div>
            </div>
        "#;
        let islands = find_islands(html, PREFIX).unwrap();
        assert_eq!(islands.len(), 1);
        assert_eq!(islands[0].attr("client:idle"), Some(""));
    }
}
