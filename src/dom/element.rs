use fxhash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

struct Node {
    tag: String,
    classes: Vec<String>,
    style: FxHashMap<String, String>,
    parent: Weak<RefCell<Node>>,
    children: Vec<Element>,
}

/// A shared handle to a node of the host's element tree.
///
/// Cloning the handle does not clone the node; two handles compare equal when
/// they point at the same node.
#[derive(Clone)]
pub struct Element {
    node: Rc<RefCell<Node>>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            node: Rc::new(RefCell::new(Node {
                tag: tag.to_string(),
                classes: Vec::new(),
                style: FxHashMap::default(),
                parent: Weak::new(),
                children: Vec::new(),
            })),
        }
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn tag(&self) -> String {
        self.node.borrow().tag.clone()
    }

    pub fn add_class(&self, class: &str) {
        let mut node = self.node.borrow_mut();
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.node.borrow().classes.iter().any(|c| c == class)
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.node.borrow().style.get(property).cloned()
    }

    pub fn set_style(&self, property: &str, value: impl Into<String>) {
        self.node
            .borrow_mut()
            .style
            .insert(property.to_string(), value.into());
    }

    pub fn remove_style(&self, property: &str) {
        self.node.borrow_mut().style.remove(property);
    }

    /// Applies a `prop:value;prop:value` declaration list
    pub fn set_css_text(&self, css: &str) {
        for declaration in css.split(';') {
            if let Some((property, value)) = declaration.split_once(':') {
                let property = property.trim();
                if !property.is_empty() {
                    self.set_style(property, value.trim());
                }
            }
        }
    }

    pub fn parent(&self) -> Option<Element> {
        self.node
            .borrow()
            .parent
            .upgrade()
            .map(|node| Element { node })
    }

    pub fn children(&self) -> Vec<Element> {
        self.node.borrow().children.clone()
    }

    /// Appends `child`, detaching it from its current parent first
    pub fn append_child(&self, child: &Element) {
        child.remove();
        child.node.borrow_mut().parent = Rc::downgrade(&self.node);
        self.node.borrow_mut().children.push(child.clone());
    }

    /// Detaches this node from its parent, if any
    pub fn remove(&self) {
        if let Some(parent) = self.parent() {
            parent
                .node
                .borrow_mut()
                .children
                .retain(|c| !Rc::ptr_eq(&c.node, &self.node));
        }
        self.node.borrow_mut().parent = Weak::new();
    }

    /// First descendant (depth first) carrying `class`
    pub fn query_class(&self, class: &str) -> Option<Element> {
        for child in self.children() {
            if child.has_class(class) {
                return Some(child);
            }
            if let Some(found) = child.query_class(class) {
                return Some(found);
            }
        }
        None
    }

    /// True when `other` is this node or one of its descendants
    pub fn contains(&self, other: &Element) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node == *self {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Ancestor `levels` steps up, `ancestor(1)` being the parent
    pub fn ancestor(&self, levels: usize) -> Option<Element> {
        let mut current = self.clone();
        for _ in 0..levels {
            current = current.parent()?;
        }
        Some(current)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node.borrow();
        f.debug_struct("Element")
            .field("tag", &node.tag)
            .field("classes", &node.classes)
            .field("children", &node.children.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_moves_child() {
        let a = Element::new("div");
        let b = Element::new("div");
        let child = Element::new("canvas");

        a.append_child(&child);
        assert_eq!(child.parent(), Some(a.clone()));

        b.append_child(&child);
        assert!(a.children().is_empty());
        assert_eq!(b.children(), vec![child.clone()]);
    }

    #[test]
    fn test_remove_detaches() {
        let root = Element::new("div");
        let child = Element::new("div");
        root.append_child(&child);
        child.remove();
        assert!(child.parent().is_none());
        assert!(root.children().is_empty());

        // Removing a detached node is a no-op
        child.remove();
    }

    #[test]
    fn test_query_and_contains() {
        let root = Element::new("div");
        let pane = Element::new("div").with_class("pane");
        let inner = Element::new("div").with_class("target");
        root.append_child(&pane);
        pane.append_child(&inner);

        assert_eq!(root.query_class("target"), Some(inner.clone()));
        assert!(root.query_class("missing").is_none());
        assert!(root.contains(&inner));
        assert!(!inner.contains(&root));
        assert_eq!(inner.ancestor(2), Some(root));
    }

    #[test]
    fn test_css_text() {
        let el = Element::new("div");
        el.set_css_text("width:100%; height: 100% ;");
        assert_eq!(el.style("width").as_deref(), Some("100%"));
        assert_eq!(el.style("height").as_deref(), Some("100%"));
    }
}
