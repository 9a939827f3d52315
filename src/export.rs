//! Export formatting for rendered cards
//!
//! Takes a rendered card fragment and produces a paste-ready HTML string:
//! comment nodes dropped, framework marker attributes and framework-injected
//! classes stripped, and links inside review-body paragraphs restyled for the
//! paste target. The clean-up is a walk over the parsed tree, never textual
//! substitution.

use ego_tree::NodeRef;
use scraper::node::Element;
use scraper::{Html, Node};

/// Attribute prefixes injected by component frameworks; never content.
const MARKER_ATTR_PREFIXES: &[&str] = &["data-v-", "_ngcontent-", "_nghost-", "ng-"];

/// Class prefixes injected by component frameworks.
const MARKER_CLASS_PREFIXES: &[&str] = &["ng-", "v-"];

/// Class of the container wrapping the review body in the rendered card.
const BODY_CONTAINER_CLASS: &str = "review-text";

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Export configuration.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Inline style forced onto links inside review-body paragraphs. The
    /// default matches the paste target's link convention (muted color,
    /// dotted underline); override it when targeting somewhere else.
    pub body_link_style: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            body_link_style: "color:#a0a0a0;text-decoration:none;border-bottom:1px dotted #a0a0a0;"
                .to_string(),
        }
    }
}

/// Clean a rendered fragment for pasting into third-party rich-text surfaces.
pub fn export_fragment(html: &str, options: &ExportOptions) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();

    for child in fragment.root_element().children() {
        serialize_node(child, options, false, false, &mut out);
    }

    out
}

fn serialize_node(
    node: NodeRef<'_, Node>,
    options: &ExportOptions,
    in_body: bool,
    in_paragraph: bool,
    out: &mut String,
) {
    match node.value() {
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::Comment(_) => {}
        Node::Element(element) => {
            let name = element.name();
            let restyle = name == "a" && in_body && in_paragraph;

            out.push('<');
            out.push_str(name);

            for (attr, value) in element.attrs() {
                if is_marker_attr(attr) {
                    continue;
                }
                if attr == "style" && restyle {
                    continue;
                }
                if attr == "class" {
                    if let Some(kept) = cleaned_classes(value) {
                        out.push_str(" class=\"");
                        out.push_str(&escape_attr(&kept));
                        out.push('"');
                    }
                    continue;
                }
                out.push(' ');
                out.push_str(attr);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }

            if restyle {
                out.push_str(" style=\"");
                out.push_str(&escape_attr(&options.body_link_style));
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&name) {
                return;
            }

            let child_in_body = in_body || has_class(element, BODY_CONTAINER_CLASS);
            let child_in_paragraph = in_paragraph || name == "p";
            for child in node.children() {
                serialize_node(child, options, child_in_body, child_in_paragraph, out);
            }

            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        // Document/fragment/doctype wrappers carry no markup of their own.
        _ => {
            for child in node.children() {
                serialize_node(child, options, in_body, in_paragraph, out);
            }
        }
    }
}

fn is_marker_attr(name: &str) -> bool {
    MARKER_ATTR_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Drop framework-injected classes; `None` when nothing is left.
fn cleaned_classes(value: &str) -> Option<String> {
    let kept: Vec<&str> = value
        .split_whitespace()
        .filter(|class| {
            !MARKER_CLASS_PREFIXES
                .iter()
                .any(|prefix| class.starts_with(prefix))
        })
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}

fn has_class(element: &Element, class: &str) -> bool {
    element.classes().any(|candidate| candidate == class)
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
