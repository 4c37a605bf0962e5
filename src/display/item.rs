use std::cell::RefCell;
use std::rc::Rc;

use crate::controls::{Control, Element};
use crate::pipeline::{allocate_id, Node, NodeId, NodeKind};
use crate::state::Subscription;
use crate::types::Attr;

/// Titled wrapper around an optional body.
///
/// Cloning shares the item. Subscriptions passed to [`DisplayItem::hold`]
/// are released when the last handle is dropped, which is how a binding
/// built for this item goes away with it.
#[derive(Clone)]
pub struct DisplayItem {
    inner: Rc<ItemInner>,
}

struct ItemInner {
    id: NodeId,
    title_id: NodeId,
    title: String,
    body: Option<Element>,
    held: RefCell<Vec<Subscription>>,
}

impl Drop for ItemInner {
    fn drop(&mut self) {
        for subscription in self.held.get_mut().drain(..) {
            subscription.unsubscribe();
        }
    }
}

impl DisplayItem {
    pub fn new(title: impl Into<String>, body: Option<Element>) -> Self {
        Self {
            inner: Rc::new(ItemInner {
                id: allocate_id(),
                title_id: allocate_id(),
                title: title.into(),
                body,
                held: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Item with a body.
    pub fn with_body(title: impl Into<String>, body: impl Into<Element>) -> Self {
        Self::new(title, Some(body.into()))
    }

    /// Item with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new(title, None)
    }

    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    pub fn title(&self) -> &str {
        &self.inner.title
    }

    pub fn body(&self) -> Option<&Element> {
        self.inner.body.as_ref()
    }

    /// Keep a subscription alive for as long as this item.
    pub fn hold(&self, subscription: Subscription) {
        self.inner.held.borrow_mut().push(subscription);
    }

    pub fn held_count(&self) -> usize {
        self.inner.held.borrow().len()
    }

    /// Whether both handles refer to the same item.
    pub fn ptr_eq(&self, other: &DisplayItem) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Controls in the body, in document order.
    pub fn controls(&self) -> Vec<Rc<dyn Control>> {
        self.inner.body.as_ref().map(Element::controls).unwrap_or_default()
    }

    pub fn render(&self) -> Node {
        let title = Node::new(self.inner.title_id, NodeKind::Title)
            .with_text(self.inner.title.as_str())
            .with_attrs(Attr::BOLD);
        let mut node = Node::new(self.inner.id, NodeKind::Item).with_children(vec![title]);
        if let Some(body) = &self.inner.body {
            node.push(body.render());
        }
        node
    }
}

impl std::fmt::Debug for DisplayItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayItem")
            .field("id", &self.inner.id)
            .field("title", &self.inner.title)
            .field("has_body", &self.inner.body.is_some())
            .finish()
    }
}
