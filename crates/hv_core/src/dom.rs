//! Thin query layer over the parsed HTML tree.
//!
//! Parsers only ever look up elements by id or CSS selector and read
//! attributes or trimmed text, so that is all this module exposes.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

#[derive(Debug)]
pub struct Document {
    html: Html,
}

#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl Document {
    /// Parse markup into a tree. html5ever recovers from any malformed input,
    /// so this never fails; missing structure shows up as failed lookups.
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    pub fn by_id(&self, id: &str) -> Option<Node<'_>> {
        self.select_one(&id_selector(id))
    }

    pub fn select_one(&self, css: &str) -> Option<Node<'_>> {
        let selector = compile(css)?;
        self.html.select(&selector).next().map(Node::new)
    }

    pub fn select_all(&self, css: &str) -> Vec<Node<'_>> {
        let Some(selector) = compile(css) else {
            return Vec::new();
        };
        self.html.select(&selector).map(Node::new).collect()
    }
}

impl<'a> Node<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    pub fn id(&self) -> Option<&'a str> {
        self.element.value().id()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.element.value().classes().any(|c| c == class)
    }

    /// Rendered text with runs of whitespace collapsed and the ends trimmed.
    pub fn text(&self) -> String {
        let raw: String = self.element.text().collect();
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn select_one(&self, css: &str) -> Option<Node<'a>> {
        let selector = compile(css)?;
        self.element.select(&selector).next().map(Node::new)
    }

    pub fn select_all(&self, css: &str) -> Vec<Node<'a>> {
        let Some(selector) = compile(css) else {
            return Vec::new();
        };
        self.element.select(&selector).map(Node::new).collect()
    }
}

fn id_selector(id: &str) -> String {
    format!("[id=\"{}\"]", id.replace('"', "\\\""))
}

fn compile(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            debug!("failed to compile selector '{css}': {e}");
            None
        }
    }
}
