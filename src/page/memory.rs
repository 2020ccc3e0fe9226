//! Memory Page - In-memory document with taffy block layout
//!
//! A small element tree (tag, attributes, classes, inline styles) laid out as
//! a flexbox column by taffy. Elements marked `fixed` are taken out of flow
//! and pinned to the viewport, like a sticky header.
//!
//! Layout is recomputed lazily after any structural or size change.
//!
//! # Example
//!
//! ```ignore
//! use spark_page::page::{ElementSpec, MemoryPage, Page};
//!
//! let page = MemoryPage::new(1280.0, 800.0);
//! let home = page.append_to_body(ElementSpec::new("section").id("home").height(800.0));
//! page.append(home, ElementSpec::new("div").class("research-card").height(200.0));
//! page.scroll_to(400.0, false);
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use taffy::{
    AvailableSpace, Dimension, Display, FlexDirection, LengthPercentageAuto, NodeId, Position,
    Rect as TaffyRect, Size, Style, TaffyTree,
};

use super::selector::{Selector, SelectorTarget};
use super::Page;
use crate::error::{PageError, Result};
use crate::types::{ElementId, Rect, Viewport};

// =============================================================================
// ELEMENT SPEC
// =============================================================================

/// Description of an element to append.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    height: Option<f64>,
    fixed: bool,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    /// Anchor pointing at `href`.
    pub fn link(class: &str, href: &str) -> Self {
        Self::new("a").class(class).attr("href", href)
    }

    /// Explicit block height. Without one the height follows the children.
    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Pin to the viewport, out of flow.
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

#[derive(Debug)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: String,
    height: Option<f64>,
    fixed: bool,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl Node {
    fn from_spec(spec: ElementSpec, parent: Option<usize>) -> Self {
        Self {
            tag: spec.tag,
            attrs: spec.attrs,
            classes: spec.classes,
            styles: BTreeMap::new(),
            text: String::new(),
            height: spec.height,
            fixed: spec.fixed,
            parent,
            children: Vec::new(),
        }
    }
}

impl SelectorTarget for Node {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Document-relative box for one node.
#[derive(Debug, Clone, Copy, Default)]
struct NodeBox {
    top: f64,
    left: f64,
    width: f64,
    height: f64,
    pinned: bool,
}

#[derive(Debug)]
struct Document {
    nodes: Vec<Node>,
    viewport: Viewport,
    scroll_y: f64,
    layout: Option<Vec<NodeBox>>,
    scroll_calls: Vec<(f64, bool)>,
    focused: Option<ElementId>,
}

impl Document {
    /// Preorder walk below `root`, excluding it.
    fn descendants(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[root].children.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            out.push(idx);
            stack.extend(self.nodes[idx].children.iter().rev().copied());
        }
        out
    }

    fn node(&self, element: ElementId) -> Option<&Node> {
        self.nodes.get(element.index())
    }

    fn node_mut(&mut self, element: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(element.index())
    }

    fn ensure_layout(&mut self) -> Result<&[NodeBox]> {
        if self.layout.is_none() {
            self.layout = Some(self.compute_layout()?);
        }
        Ok(self.layout.as_deref().unwrap_or_default())
    }

    fn compute_layout(&self) -> Result<Vec<NodeBox>> {
        let layout_err = |err: taffy::TaffyError| PageError::Layout(format!("{err:?}"));

        let mut tree: TaffyTree<()> = TaffyTree::new();
        let mut node_ids: Vec<NodeId> = Vec::with_capacity(self.nodes.len());

        for (idx, node) in self.nodes.iter().enumerate() {
            let mut style = Style {
                display: Display::Flex,
                flex_direction: FlexDirection::Column,
                flex_shrink: 0.0,
                size: Size {
                    width: Dimension::Auto,
                    height: node.height.map_or(Dimension::Auto, |h| Dimension::Length(h as f32)),
                },
                ..Default::default()
            };
            if idx == 0 {
                style.size.width = Dimension::Length(self.viewport.width as f32);
            }
            if node.fixed {
                style.position = Position::Absolute;
                style.size.width = Dimension::Percent(1.0);
                style.inset = TaffyRect {
                    top: LengthPercentageAuto::Length(0.0),
                    left: LengthPercentageAuto::Length(0.0),
                    right: LengthPercentageAuto::Auto,
                    bottom: LengthPercentageAuto::Auto,
                };
            }
            node_ids.push(tree.new_leaf(style).map_err(layout_err)?);
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                tree.add_child(node_ids[idx], node_ids[child])
                    .map_err(layout_err)?;
            }
        }

        let available = Size {
            width: AvailableSpace::Definite(self.viewport.width as f32),
            height: AvailableSpace::MaxContent,
        };
        tree.compute_layout(node_ids[0], available)
            .map_err(layout_err)?;

        // Taffy locations are parent-relative; accumulate in document order
        // so every parent is resolved before its children.
        let mut boxes = vec![NodeBox::default(); self.nodes.len()];
        let mut order = vec![0];
        order.extend(self.descendants(0));
        for idx in order {
            let layout = tree.layout(node_ids[idx]).map_err(layout_err)?;
            let (parent_top, parent_left, parent_pinned) = match self.nodes[idx].parent {
                Some(p) => (boxes[p].top, boxes[p].left, boxes[p].pinned),
                None => (0.0, 0.0, false),
            };
            boxes[idx] = NodeBox {
                top: parent_top + layout.location.y as f64,
                left: parent_left + layout.location.x as f64,
                width: layout.size.width as f64,
                height: layout.size.height as f64,
                pinned: parent_pinned || self.nodes[idx].fixed,
            };
        }

        Ok(boxes)
    }

    fn box_of(&mut self, element: ElementId) -> Option<NodeBox> {
        if element.index() >= self.nodes.len() {
            return None;
        }
        match self.ensure_layout() {
            Ok(boxes) => boxes.get(element.index()).copied(),
            Err(err) => {
                tracing::debug!(%err, "layout unavailable");
                None
            }
        }
    }

    fn max_scroll(&mut self) -> f64 {
        let doc_height = self.box_of(ElementId(0)).map_or(0.0, |b| b.height);
        (doc_height - self.viewport.height).max(0.0)
    }
}

// =============================================================================
// MEMORY PAGE
// =============================================================================

/// In-memory [`Page`].
#[derive(Debug)]
pub struct MemoryPage {
    doc: RefCell<Document>,
    selectors: RefCell<HashMap<String, Option<Selector>>>,
}

impl MemoryPage {
    /// Empty page with a `body` root and the given viewport size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            doc: RefCell::new(Document {
                nodes: vec![Node::from_spec(ElementSpec::new("body"), None)],
                viewport: Viewport::new(width, height),
                scroll_y: 0.0,
                layout: None,
                scroll_calls: Vec::new(),
                focused: None,
            }),
            selectors: RefCell::new(HashMap::new()),
        }
    }

    /// The `body` element.
    pub fn body(&self) -> ElementId {
        ElementId(0)
    }

    /// Append an element as the last child of `parent`.
    ///
    /// An unknown parent falls back to `body`.
    pub fn append(&self, parent: ElementId, spec: ElementSpec) -> ElementId {
        let mut doc = self.doc.borrow_mut();
        let parent = if parent.index() < doc.nodes.len() {
            parent.index()
        } else {
            0
        };
        let idx = doc.nodes.len();
        doc.nodes.push(Node::from_spec(spec, Some(parent)));
        doc.nodes[parent].children.push(idx);
        doc.layout = None;
        ElementId(idx)
    }

    pub fn append_to_body(&self, spec: ElementSpec) -> ElementId {
        self.append(self.body(), spec)
    }

    /// Change an element's explicit height, as content loading would.
    pub fn set_height(&self, element: ElementId, height: f64) {
        let mut doc = self.doc.borrow_mut();
        if let Some(node) = doc.node_mut(element) {
            node.height = Some(height);
            doc.layout = None;
        }
    }

    /// Resize the viewport.
    pub fn set_viewport(&self, width: f64, height: f64) {
        let mut doc = self.doc.borrow_mut();
        doc.viewport = Viewport::new(width, height);
        doc.layout = None;
    }

    pub fn set_attribute(&self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.doc.borrow_mut().node_mut(element) {
            node.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn text(&self, element: ElementId) -> Option<String> {
        self.doc.borrow().node(element).map(|n| n.text.clone())
    }

    /// Total document height.
    pub fn document_height(&self) -> f64 {
        self.doc.borrow_mut().box_of(ElementId(0)).map_or(0.0, |b| b.height)
    }

    /// Element holding keyboard focus.
    pub fn focused(&self) -> Option<ElementId> {
        self.doc.borrow().focused
    }

    /// Every `scroll_to` call so far, as `(requested top, smooth)`.
    pub fn scroll_calls(&self) -> Vec<(f64, bool)> {
        self.doc.borrow().scroll_calls.clone()
    }

    fn with_selector<R>(&self, source: &str, f: impl FnOnce(&Selector) -> R) -> Option<R> {
        let mut cache = self.selectors.borrow_mut();
        let entry = cache.entry(source.to_string()).or_insert_with(|| {
            Selector::parse(source)
                .map_err(|err| tracing::debug!(%err, "selector ignored"))
                .ok()
        });
        entry.as_ref().map(f)
    }

    fn matching(&self, candidates: Vec<usize>, selector: &str) -> Vec<ElementId> {
        let doc = self.doc.borrow();
        self.with_selector(selector, |sel| {
            candidates
                .into_iter()
                .filter(|&idx| sel.matches(&doc.nodes[idx]))
                .map(ElementId)
                .collect()
        })
        .unwrap_or_default()
    }
}

impl Page for MemoryPage {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let candidates = {
            let doc = self.doc.borrow();
            let mut all = vec![0];
            all.extend(doc.descendants(0));
            all
        };
        self.matching(candidates, selector)
    }

    fn query_within(&self, root: ElementId, selector: &str) -> Vec<ElementId> {
        let candidates = {
            let doc = self.doc.borrow();
            if root.index() >= doc.nodes.len() {
                return Vec::new();
            }
            doc.descendants(root.index())
        };
        self.matching(candidates, selector)
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        let doc = self.doc.borrow();
        let mut order = vec![0];
        order.extend(doc.descendants(0));
        order
            .into_iter()
            .find(|&idx| doc.nodes[idx].attr("id") == Some(id))
            .map(ElementId)
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let doc = self.doc.borrow();
        let node = doc.node(element)?;
        if name == "class" {
            return Some(node.classes.join(" "));
        }
        node.attrs.get(name).cloned()
    }

    fn offset_top(&self, element: ElementId) -> Option<f64> {
        self.doc.borrow_mut().box_of(element).map(|b| b.top)
    }

    fn offset_height(&self, element: ElementId) -> Option<f64> {
        self.doc.borrow_mut().box_of(element).map(|b| b.height)
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        let mut doc = self.doc.borrow_mut();
        let scroll_y = doc.scroll_y;
        let b = doc.box_of(element)?;
        let y = if b.pinned { b.top } else { b.top - scroll_y };
        Some(Rect::new(b.left, y, b.width, b.height))
    }

    fn viewport(&self) -> Viewport {
        self.doc.borrow().viewport
    }

    fn scroll_offset(&self) -> f64 {
        self.doc.borrow().scroll_y
    }

    fn scroll_to(&self, top: f64, smooth: bool) {
        let mut doc = self.doc.borrow_mut();
        doc.scroll_calls.push((top, smooth));
        let max = doc.max_scroll();
        doc.scroll_y = if top.is_finite() { top.clamp(0.0, max) } else { 0.0 };
    }

    fn style(&self, element: ElementId, property: &str) -> Option<String> {
        self.doc.borrow().node(element)?.styles.get(property).cloned()
    }

    fn set_style(&self, element: ElementId, property: &str, value: &str) {
        if let Some(node) = self.doc.borrow_mut().node_mut(element) {
            node.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.doc
            .borrow()
            .node(element)
            .is_some_and(|n| n.has_class(class))
    }

    fn set_class(&self, element: ElementId, class: &str, enabled: bool) {
        if let Some(node) = self.doc.borrow_mut().node_mut(element) {
            let present = node.classes.iter().any(|c| c == class);
            if enabled && !present {
                node.classes.push(class.to_string());
            } else if !enabled && present {
                node.classes.retain(|c| c != class);
            }
        }
    }

    fn set_text(&self, element: ElementId, text: &str) {
        if let Some(node) = self.doc.borrow_mut().node_mut(element) {
            node.text = text.to_string();
        }
    }

    fn focus(&self, element: ElementId) {
        let mut doc = self.doc.borrow_mut();
        if element.index() < doc.nodes.len() {
            doc.focused = Some(element);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn three_sections() -> (MemoryPage, Vec<ElementId>) {
        let page = MemoryPage::new(1280.0, 800.0);
        let ids = ["home", "about", "team"]
            .iter()
            .map(|id| page.append_to_body(ElementSpec::new("section").id(id).height(800.0)))
            .collect();
        (page, ids)
    }

    #[test]
    fn test_sections_stack_in_flow() {
        let (page, ids) = three_sections();
        assert_eq!(page.offset_top(ids[0]), Some(0.0));
        assert_eq!(page.offset_top(ids[1]), Some(800.0));
        assert_eq!(page.offset_top(ids[2]), Some(1600.0));
        assert_eq!(page.document_height(), 2400.0);
    }

    #[test]
    fn test_fixed_header_out_of_flow() {
        let page = MemoryPage::new(1280.0, 800.0);
        let header = page.append_to_body(ElementSpec::new("header").fixed().height(70.0));
        let home = page.append_to_body(ElementSpec::new("section").id("home").height(900.0));
        page.append_to_body(ElementSpec::new("section").id("about").height(900.0));

        assert_eq!(page.offset_top(home), Some(0.0));

        page.scroll_to(500.0, false);
        let rect = page.bounding_rect(header).unwrap();
        assert_eq!(rect.top(), 0.0);
        assert_eq!(rect.width, 1280.0);
    }

    #[test]
    fn test_nested_offsets_are_document_relative() {
        let page = MemoryPage::new(1000.0, 600.0);
        page.append_to_body(ElementSpec::new("section").id("home").height(500.0));
        let about = page.append_to_body(ElementSpec::new("section").id("about"));
        page.append(about, ElementSpec::new("div").height(100.0));
        let card = page.append(about, ElementSpec::new("div").class("member-card").height(150.0));

        assert_eq!(page.offset_top(card), Some(600.0));
        assert_eq!(page.offset_height(about), Some(250.0));

        page.scroll_to(200.0, false);
        assert_eq!(page.bounding_rect(card).unwrap().top(), 400.0);
    }

    #[test]
    fn test_layout_tracks_height_changes() {
        let (page, ids) = three_sections();
        page.set_height(ids[0], 1200.0);
        assert_eq!(page.offset_top(ids[1]), Some(1200.0));
    }

    #[test]
    fn test_scroll_clamps_to_document() {
        let (page, _) = three_sections();
        page.scroll_to(10_000.0, true);
        assert_eq!(page.scroll_offset(), 1600.0);
        page.scroll_to(-50.0, false);
        assert_eq!(page.scroll_offset(), 0.0);
        assert_eq!(page.scroll_calls(), vec![(10_000.0, true), (-50.0, false)]);
    }

    #[test]
    fn test_query_document_order() {
        let page = MemoryPage::new(800.0, 600.0);
        let first = page.append_to_body(ElementSpec::new("section").id("a"));
        let second = page.append_to_body(ElementSpec::new("section").id("b"));
        // Appended later but nested inside the first section.
        let nested = page.append(first, ElementSpec::new("section").id("a-1"));

        assert_eq!(page.query_all("section[id]"), vec![first, nested, second]);
        assert_eq!(page.query_within(first, "section"), vec![nested]);
        assert_eq!(page.element_by_id("b"), Some(second));
        assert_eq!(page.element_by_id("missing"), None);
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let (page, _) = three_sections();
        assert!(page.query_all("section > div").is_empty());
    }

    #[test]
    fn test_classes_and_styles() {
        let page = MemoryPage::new(800.0, 600.0);
        let el = page.append_to_body(ElementSpec::new("a").class("nav-link"));

        page.set_class(el, "active", true);
        page.set_class(el, "active", true);
        assert_eq!(page.attribute(el, "class").as_deref(), Some("nav-link active"));

        page.set_class(el, "active", false);
        assert!(!page.has_class(el, "active"));

        page.set_style(el, "opacity", "0");
        assert_eq!(page.style(el, "opacity").as_deref(), Some("0"));
    }

    #[test]
    fn test_stale_handles_are_ignored() {
        let page = MemoryPage::new(800.0, 600.0);
        let ghost = ElementId(42);
        assert_eq!(page.offset_top(ghost), None);
        assert_eq!(page.bounding_rect(ghost), None);
        page.set_style(ghost, "opacity", "1");
        page.set_class(ghost, "active", true);
        assert!(!page.has_class(ghost, "active"));
    }
}
