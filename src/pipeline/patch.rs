//! Patch queue.
//!
//! Controls and groups describe each presentation change as a [`Patch`]
//! scoped to the node that changed. Patches accumulate in a thread-local
//! queue while a surface is mounted and are drained by `Surface::flush`.
//! Before mount (or after unmount) nothing is queued: the next mount renders
//! the whole tree anyway.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use super::node::{Node, NodeId};

/// A scoped change to the presentation tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Re-rendered node replaces the node with the same id
    Replace(Node),
    /// Child appended to a container
    Append { parent: NodeId, node: Node },
    /// Child removed from a container
    Remove { parent: NodeId, child: NodeId },
    /// All children removed from a container
    Clear { parent: NodeId },
}

impl Patch {
    /// Id of the node whose region this patch redraws.
    pub fn target(&self) -> NodeId {
        match self {
            Patch::Replace(node) => node.id,
            Patch::Append { parent, .. } | Patch::Remove { parent, .. } | Patch::Clear { parent } => {
                *parent
            }
        }
    }
}

// =============================================================================
// Queue State
// =============================================================================

thread_local! {
    static MOUNTED: Cell<bool> = const { Cell::new(false) };
    static PENDING: RefCell<Vec<Patch>> = const { RefCell::new(Vec::new()) };
}

/// Whether patches are currently being collected.
pub fn is_mounted() -> bool {
    MOUNTED.with(|m| m.get())
}

/// Start or stop collecting patches. Stopping discards anything pending.
pub fn set_mounted(mounted: bool) {
    MOUNTED.with(|m| m.set(mounted));
    if !mounted {
        PENDING.with(|p| p.borrow_mut().clear());
    }
}

/// Queue a patch for the next flush.
pub fn queue(patch: Patch) {
    if !is_mounted() {
        return;
    }
    PENDING.with(|p| p.borrow_mut().push(patch));
}

/// Queue a re-render of one node.
pub fn queue_replace(node: Node) {
    queue(Patch::Replace(node));
}

/// Number of patches waiting.
pub fn pending_len() -> usize {
    PENDING.with(|p| p.borrow().len())
}

/// Drain pending patches in order.
///
/// When one node was re-rendered several times only its last rendering is
/// kept, at the position of that last rendering.
pub fn take_pending() -> Vec<Patch> {
    let drained = PENDING.with(|p| std::mem::take(&mut *p.borrow_mut()));

    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut kept: Vec<Patch> = drained
        .into_iter()
        .rev()
        .filter(|patch| match patch {
            Patch::Replace(node) => seen.insert(node.id),
            _ => true,
        })
        .collect();
    kept.reverse();
    kept
}

/// Reset queue state (for testing)
pub fn reset_patch_state() {
    set_mounted(false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::node::{allocate_id, NodeKind};

    fn setup() {
        reset_patch_state();
    }

    fn text(id: NodeId, content: &str) -> Node {
        Node::new(id, NodeKind::Text).with_text(content)
    }

    #[test]
    fn test_nothing_queued_before_mount() {
        setup();
        queue_replace(text(allocate_id(), "x"));
        assert_eq!(pending_len(), 0);
    }

    #[test]
    fn test_queue_in_order() {
        setup();
        set_mounted(true);
        let parent = allocate_id();
        let child = allocate_id();

        queue(Patch::Append { parent, node: text(child, "a") });
        queue(Patch::Remove { parent, child });

        let patches = take_pending();
        assert_eq!(patches.len(), 2);
        assert!(matches!(patches[0], Patch::Append { .. }));
        assert!(matches!(patches[1], Patch::Remove { .. }));
        assert_eq!(pending_len(), 0);
    }

    #[test]
    fn test_repeated_replace_coalesced() {
        setup();
        set_mounted(true);
        let a = allocate_id();
        let b = allocate_id();

        queue_replace(text(a, "1"));
        queue_replace(text(b, "x"));
        queue_replace(text(a, "2"));

        let patches = take_pending();
        assert_eq!(patches, vec![Patch::Replace(text(b, "x")), Patch::Replace(text(a, "2"))]);
    }

    #[test]
    fn test_unmount_discards() {
        setup();
        set_mounted(true);
        queue(Patch::Clear { parent: allocate_id() });
        set_mounted(false);
        assert_eq!(pending_len(), 0);
    }

    #[test]
    fn test_target() {
        let parent = NodeId::from_raw(7);
        assert_eq!(Patch::Clear { parent }.target(), parent);
        let node = text(NodeId::from_raw(3), "t");
        assert_eq!(Patch::Replace(node).target(), NodeId::from_raw(3));
    }
}
