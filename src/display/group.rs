use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::controls::Control;
use crate::pipeline::{allocate_id, patch, Node, NodeId, NodeKind, Patch};

use super::DisplayItem;

/// Ordered, mutable stack of [`DisplayItem`]s.
///
/// Cloning shares the group, so a callback can hold a handle and add or
/// remove items while the surface owns the same group.
#[derive(Clone)]
pub struct DisplayGroup {
    id: NodeId,
    items: Rc<RefCell<Vec<DisplayItem>>>,
}

impl Default for DisplayGroup {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl DisplayGroup {
    pub fn new(items: Vec<DisplayItem>) -> Self {
        Self {
            id: allocate_id(),
            items: Rc::new(RefCell::new(items)),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Append an item at the end.
    pub fn add(&self, item: DisplayItem) {
        let node = item.render();
        self.items.borrow_mut().push(item);
        patch::queue(Patch::Append { parent: self.id, node });
    }

    /// Remove an item. Returns false (and queues nothing) when it is not
    /// in the group.
    pub fn remove(&self, item: &DisplayItem) -> bool {
        let removed = {
            let mut items = self.items.borrow_mut();
            match items.iter().position(|i| i.ptr_eq(item)) {
                Some(index) => items.remove(index),
                None => {
                    debug!(group = %self.id, item = %item.id(), "remove: item not in group");
                    return false;
                }
            }
        };
        patch::queue(Patch::Remove {
            parent: self.id,
            child: removed.id(),
        });
        true
    }

    /// Remove every item. No-op when already empty.
    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.items.borrow_mut());
        if removed.is_empty() {
            return;
        }
        patch::queue(Patch::Clear { parent: self.id });
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Handles to the items in order.
    pub fn items(&self) -> Vec<DisplayItem> {
        self.items.borrow().clone()
    }

    pub fn contains(&self, item: &DisplayItem) -> bool {
        self.items.borrow().iter().any(|i| i.ptr_eq(item))
    }

    /// Controls of every item, in order.
    pub fn controls(&self) -> Vec<Rc<dyn Control>> {
        self.items.borrow().iter().flat_map(DisplayItem::controls).collect()
    }

    pub fn render(&self) -> Node {
        Node::new(self.id, NodeKind::Group)
            .with_children(self.items.borrow().iter().map(DisplayItem::render).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::test_support::{setup, setup_mounted};
    use crate::state::BindableValue;

    fn titles(group: &DisplayGroup) -> Vec<String> {
        group.items().iter().map(|i| i.title().to_string()).collect()
    }

    #[test]
    fn test_add_keeps_order() {
        setup_mounted();
        let group = DisplayGroup::default();
        group.add(DisplayItem::titled("A"));
        group.add(DisplayItem::titled("B"));
        assert_eq!(titles(&group), vec!["A", "B"]);

        let patches = patch::take_pending();
        assert_eq!(patches.len(), 2);
        assert!(patches.iter().all(|p| p.target() == group.id()));
        assert_eq!(group.render().plain_text(), "A\nB");
    }

    #[test]
    fn test_remove_present_and_absent() {
        setup_mounted();
        let a = DisplayItem::titled("A");
        let b = DisplayItem::titled("B");
        let group = DisplayGroup::new(vec![a.clone(), b.clone()]);

        assert!(group.remove(&a));
        assert_eq!(patch::take_pending(), vec![Patch::Remove { parent: group.id(), child: a.id() }]);

        // A second remove of the same item changes nothing
        assert!(!group.remove(&a));
        assert_eq!(patch::pending_len(), 0);
        assert_eq!(titles(&group), vec!["B"]);
    }

    #[test]
    fn test_clear() {
        setup_mounted();
        let group = DisplayGroup::new(vec![DisplayItem::titled("A"), DisplayItem::titled("B")]);
        group.clear();
        assert!(group.is_empty());
        assert_eq!(patch::take_pending(), vec![Patch::Clear { parent: group.id() }]);

        group.clear();
        assert_eq!(patch::pending_len(), 0);
    }

    #[test]
    fn test_removed_item_releases_binding() {
        setup();
        let cell = BindableValue::new(0.0, 0.0, 1.0);
        let item = DisplayItem::titled("Bound");
        item.hold(cell.subscribe(|_| {}));
        let group = DisplayGroup::new(vec![item.clone()]);
        drop(item);

        assert_eq!(cell.subscriber_count(), 1);
        group.clear();
        assert_eq!(cell.subscriber_count(), 0);
    }

    #[test]
    fn test_unmounted_mutations_queue_nothing() {
        setup();
        let group = DisplayGroup::default();
        group.add(DisplayItem::titled("A"));
        assert_eq!(group.len(), 1);
        assert_eq!(patch::pending_len(), 0);
    }
}
