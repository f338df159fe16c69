//! A small in-memory host document for widgets to render into.
//!
//! The countdown widget does not own the page it lives in. It is handed a
//! locator, resolves it against a [`Document`] and replaces the matched
//! element's children with its own structure. This module provides just
//! enough of a DOM for that: elements with a tag, id, classes, attributes,
//! inline style properties (including `--custom` variables), text and
//! children, simple compound selectors and markup serialization.
//!
//! # Basic Usage
//!
//! ```rust
//! use countdown_widget::document::{Document, ElementRef};
//!
//! let doc = Document::new();
//! doc.body().append_child(ElementRef::new("div").with_class("timer-container"));
//!
//! let mount = doc.query_selector(".timer-container").unwrap();
//! assert!(mount.is_some());
//! assert_eq!(doc.body().inner_html(), r#"<div class="timer-container"></div>"#);
//! ```
//!
//! Element handles are cheap to clone and share the underlying node, so a
//! widget holding a handle observes and mutates the same element the host
//! page sees.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

// Elements serialized as `<tag ... />` when they have no content.
const SELF_CLOSING: &[&str] = &["circle", "ellipse", "line", "path", "polygon", "rect"];

#[derive(Debug, Default)]
struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<ElementRef>,
}

/// Shared handle to an element of a [`Document`].
///
/// Cloning the handle does not clone the element: all clones point at the
/// same node. Attribute and style lists keep insertion order so serialized
/// markup is stable.
#[derive(Clone)]
pub struct ElementRef(Arc<Mutex<Element>>);

impl ElementRef {
    /// Creates a detached element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Arc::new(Mutex::new(Element {
            tag: tag.into(),
            ..Element::default()
        })))
    }

    // A panic while a node was locked leaves plain data behind, so the
    // poisoned guard is still usable.
    fn lock(&self) -> MutexGuard<'_, Element> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Builder form of [`ElementRef::set_id`].
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.set_id(id);
        self
    }

    /// Builder form of [`ElementRef::add_class`].
    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    /// Builder form of [`ElementRef::set_text`].
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Builder form of [`ElementRef::append_child`].
    pub fn with_child(self, child: ElementRef) -> Self {
        self.append_child(child);
        self
    }

    /// Tag name of the element.
    pub fn tag(&self) -> String {
        self.lock().tag.clone()
    }

    /// The element's id, if any.
    pub fn id(&self) -> Option<String> {
        self.lock().id.clone()
    }

    /// Sets the element's id.
    pub fn set_id(&self, id: impl Into<String>) {
        self.lock().id = Some(id.into());
    }

    /// Adds a class unless the element already carries it.
    pub fn add_class(&self, class: impl Into<String>) {
        let class = class.into();
        let mut el = self.lock();
        if !el.classes.contains(&class) {
            el.classes.push(class);
        }
    }

    /// Returns the value of attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.lock()
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Sets attribute `name`, replacing any previous value in place.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        set_pair(&mut self.lock().attributes, name.into(), value.into());
    }

    /// Returns the inline style property `name` (e.g. `transition` or `--size`).
    pub fn style(&self, name: &str) -> Option<String> {
        self.lock()
            .style
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Sets inline style property `name`, replacing any previous value in place.
    pub fn set_style(&self, name: impl Into<String>, value: impl Into<String>) {
        set_pair(&mut self.lock().style, name.into(), value.into());
    }

    /// Concatenated text of the element and all of its descendants.
    pub fn text_content(&self) -> String {
        let (own, children) = {
            let el = self.lock();
            (el.text.clone().unwrap_or_default(), el.children.clone())
        };
        children
            .iter()
            .fold(own, |acc, child| acc + &child.text_content())
    }

    /// Replaces the element's content with a single run of text.
    pub fn set_text(&self, text: impl Into<String>) {
        let mut el = self.lock();
        el.children.clear();
        el.text = Some(text.into());
    }

    /// Snapshot of the element's children.
    pub fn children(&self) -> Vec<ElementRef> {
        self.lock().children.clone()
    }

    /// Appends `child` as the last child.
    pub fn append_child(&self, child: ElementRef) {
        self.lock().children.push(child);
    }

    /// Replaces all content (text and children) with `children`.
    pub fn replace_children(&self, children: Vec<ElementRef>) {
        let mut el = self.lock();
        el.text = None;
        el.children = children;
    }

    /// Removes all content, the equivalent of assigning an empty `innerHTML`.
    pub fn clear(&self) {
        self.replace_children(Vec::new());
    }

    /// Whether the element has neither text nor children.
    pub fn is_empty(&self) -> bool {
        let el = self.lock();
        el.children.is_empty() && el.text.as_deref().map_or(true, str::is_empty)
    }

    /// Whether both handles point at the same node.
    pub fn ptr_eq(&self, other: &ElementRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Whether this element satisfies `selector`.
    pub fn matches(&self, selector: &Selector) -> bool {
        let el = self.lock();
        if let Some(tag) = &selector.tag {
            if !el.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &selector.id {
            if el.id.as_ref() != Some(id) {
                return false;
            }
        }
        selector
            .classes
            .iter()
            .all(|class| el.classes.contains(class))
    }

    /// First descendant (depth first, document order) matching `selector`.
    ///
    /// The element itself is not considered.
    pub fn query_selector(&self, selector: &Selector) -> Option<ElementRef> {
        for child in self.children() {
            if child.matches(selector) {
                return Some(child);
            }
            if let Some(found) = child.query_selector(selector) {
                return Some(found);
            }
        }
        None
    }

    /// Markup for the element's content, excluding the element's own tag.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        self.write_content(&mut out);
        out
    }

    /// Markup for the element including its own tag.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_content(&self, out: &mut String) {
        let (text, children) = {
            let el = self.lock();
            (el.text.clone(), el.children.clone())
        };
        if let Some(text) = text {
            out.push_str(&escape(&text));
        }
        for child in children {
            child.write_html(out);
        }
    }

    fn write_html(&self, out: &mut String) {
        let (tag, empty) = {
            let el = self.lock();
            out.push('<');
            out.push_str(&el.tag);
            if let Some(id) = &el.id {
                push_attr(out, "id", id);
            }
            if !el.classes.is_empty() {
                push_attr(out, "class", &el.classes.join(" "));
            }
            for (name, value) in &el.attributes {
                push_attr(out, name, value);
            }
            if !el.style.is_empty() {
                let style = el
                    .style
                    .iter()
                    .map(|(n, v)| format!("{n}: {v}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                push_attr(out, "style", &style);
            }
            let empty = el.children.is_empty() && el.text.is_none();
            (el.tag.clone(), empty)
        };

        if empty && SELF_CLOSING.contains(&tag.as_str()) {
            out.push_str(" />");
            return;
        }
        out.push('>');
        self.write_content(out);
        out.push_str("</");
        out.push_str(&tag);
        out.push('>');
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let el = self.lock();
        f.debug_struct("ElementRef")
            .field("tag", &el.tag)
            .field("id", &el.id)
            .field("classes", &el.classes)
            .field("children", &el.children.len())
            .finish()
    }
}

fn set_pair(pairs: &mut Vec<(String, String)>, name: String, value: String) {
    match pairs.iter_mut().find(|(n, _)| *n == name) {
        Some(pair) => pair.1 = value,
        None => pairs.push((name, value)),
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// A compound selector: optional tag, optional `#id`, any number of `.class`.
///
/// Combinators, attribute selectors and pseudo-classes are not supported.
///
/// ```rust
/// use countdown_widget::document::Selector;
///
/// let sel: Selector = "div#app.timer.large".parse().unwrap();
/// assert_eq!(sel.tag(), Some("div"));
/// assert_eq!(sel.id(), Some("app"));
/// assert_eq!(sel.classes(), ["timer", "large"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Tag name the selector requires, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Id the selector requires, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Classes the selector requires.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let source = s.trim();
        let invalid = |reason: &str| Error::InvalidSelector {
            selector: s.to_string(),
            reason: reason.to_string(),
        };
        if source.is_empty() {
            return Err(invalid("empty selector"));
        }

        let mut selector = Selector::default();
        let mut rest = source;

        let tag_len = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
        if tag_len > 0 {
            selector.tag = Some(rest[..tag_len].to_string());
            rest = &rest[tag_len..];
        } else if let Some(stripped) = rest.strip_prefix('*') {
            rest = stripped;
        }

        while let Some(marker) = rest.chars().next() {
            let body = &rest[marker.len_utf8()..];
            let len = body.find(|c: char| !is_ident_char(c)).unwrap_or(body.len());
            let name = &body[..len];
            match marker {
                '#' if name.is_empty() => return Err(invalid("empty id")),
                '#' if selector.id.is_some() => return Err(invalid("more than one id")),
                '#' => selector.id = Some(name.to_string()),
                '.' if name.is_empty() => return Err(invalid("empty class name")),
                '.' => selector.classes.push(name.to_string()),
                c if c.is_whitespace() || c == '>' || c == '+' || c == '~' => {
                    return Err(invalid("combinators are not supported"))
                }
                c => return Err(invalid(&format!("unexpected character `{c}`"))),
            }
            rest = &body[len..];
        }

        Ok(selector)
    }
}

/// The host page: a `<body>` element widgets can be mounted under.
#[derive(Debug, Clone)]
pub struct Document {
    body: ElementRef,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self {
            body: ElementRef::new("body"),
        }
    }

    /// The document's `<body>` element.
    pub fn body(&self) -> &ElementRef {
        &self.body
    }

    /// Resolves `locator` to the first matching element, the body included.
    ///
    /// Returns `Ok(None)` when the selector is valid but matches nothing.
    pub fn query_selector(&self, locator: &str) -> Result<Option<ElementRef>> {
        let selector: Selector = locator.parse()?;
        if self.body.matches(&selector) {
            return Ok(Some(self.body.clone()));
        }
        Ok(self.body.query_selector(&selector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let doc = Document::new();
        doc.body().append_child(
            ElementRef::new("div").with_id("app").with_child(
                ElementRef::new("section")
                    .with_class("timer-container")
                    .with_class("large"),
            ),
        );
        doc.body()
            .append_child(ElementRef::new("div").with_class("timer-container"));
        doc
    }

    #[test]
    fn test_selector_parsing() {
        let sel: Selector = "section.timer-container".parse().unwrap();
        assert_eq!(sel.tag(), Some("section"));
        assert_eq!(sel.id(), None);
        assert_eq!(sel.classes(), ["timer-container"]);

        let sel: Selector = "#app".parse().unwrap();
        assert_eq!(sel.tag(), None);
        assert_eq!(sel.id(), Some("app"));

        let sel: Selector = "*.a.b".parse().unwrap();
        assert_eq!(sel.tag(), None);
        assert_eq!(sel.classes(), ["a", "b"]);
    }

    #[test]
    fn test_selector_rejects_unsupported_syntax() {
        for bad in ["", "   ", "#", ".", "#a#b", "div .x", "a>b", "[data-x]", "p:hover"] {
            let result = bad.parse::<Selector>();
            assert!(
                matches!(result, Err(Error::InvalidSelector { .. })),
                "selector {:?} should be rejected, got {:?}",
                bad,
                result
            );
        }
    }

    #[test]
    fn test_query_selector_document_order() {
        let doc = sample();
        let found = doc.query_selector(".timer-container").unwrap().unwrap();
        assert_eq!(found.tag(), "section");

        let found = doc.query_selector("div.timer-container").unwrap().unwrap();
        assert_eq!(found.tag(), "div");
        assert!(found.id().is_none());

        assert!(doc.query_selector(".missing").unwrap().is_none());
        assert!(doc.query_selector("body").unwrap().unwrap().ptr_eq(doc.body()));
    }

    #[test]
    fn test_handles_share_the_node() {
        let doc = sample();
        let a = doc.query_selector("div#app").unwrap().unwrap();
        let b = doc.query_selector("#app").unwrap().unwrap();
        a.set_style("--size", "200px");
        assert_eq!(b.style("--size").as_deref(), Some("200px"));
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_style_and_attribute_replace_in_place() {
        let el = ElementRef::new("circle");
        el.set_attribute("r", "96");
        el.set_attribute("cx", "100");
        el.set_attribute("r", "90");
        el.set_style("transition", "none");
        el.set_style("stroke-dashoffset", "0");
        el.set_style("transition", "stroke-dashoffset 0.95s linear");

        assert_eq!(el.attribute("r").as_deref(), Some("90"));
        assert_eq!(
            el.outer_html(),
            r#"<circle r="90" cx="100" style="transition: stroke-dashoffset 0.95s linear; stroke-dashoffset: 0" />"#
        );
    }

    #[test]
    fn test_text_and_clear() {
        let el = ElementRef::new("div")
            .with_child(ElementRef::new("span").with_text("01:"))
            .with_child(ElementRef::new("span").with_text("05"));
        assert_eq!(el.text_content(), "01:05");
        assert!(!el.is_empty());

        el.set_text("a < b & \"c\"");
        assert_eq!(el.children().len(), 0);
        assert_eq!(el.inner_html(), "a &lt; b &amp; &quot;c&quot;");

        el.clear();
        assert!(el.is_empty());
        assert_eq!(el.outer_html(), "<div></div>");
    }
}
