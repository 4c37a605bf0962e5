//! Presentation tree.
//!
//! Every control, container and text renders to a [`Node`]. Nodes carry a
//! stable [`NodeId`] allocated when their owner is constructed, so a patch can
//! address exactly the region that changed.

use std::cell::Cell;

use crate::controls::ControlKind;
use crate::types::Attr;

use super::patch::Patch;

// =============================================================================
// Node Ids
// =============================================================================

/// Stable identity of a presentation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

thread_local! {
    static NEXT_NODE_ID: Cell<u64> = const { Cell::new(1) };
}

/// Allocate a fresh node id.
pub fn allocate_id() -> NodeId {
    NEXT_NODE_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        NodeId(id)
    })
}

/// Reset id allocation (for testing)
pub fn reset_node_ids() {
    NEXT_NODE_ID.with(|next| next.set(1));
}

// =============================================================================
// Node
// =============================================================================

/// What a node represents; layout and painting key off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Surface root
    Page,
    /// Title row at the top of the page
    Header,
    /// Horizontal strip holding the display groups
    Groups,
    /// One display group (vertical stack of items)
    Group,
    /// One display item (title + optional body)
    Item,
    /// Item title
    Title,
    /// Horizontal container
    Row,
    /// Vertical container
    Column,
    /// Static text
    Text,
    /// Part of a control addressed separately (radio option, trailing icon)
    Part,
    /// A control
    Control(ControlKind),
}

impl NodeKind {
    /// Containers stack their children horizontally.
    pub fn is_horizontal(&self) -> bool {
        matches!(
            self,
            NodeKind::Groups | NodeKind::Row | NodeKind::Control(ControlKind::TextField)
        )
    }
}

/// One node of the presentation tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Text painted for this node; may span several lines
    pub text: String,
    pub attrs: Attr,
    pub enabled: bool,
    pub focused: bool,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            text: String::new(),
            attrs: Attr::NONE,
            enabled: true,
            focused: false,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attrs(mut self, attrs: Attr) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        if !enabled {
            self.attrs |= Attr::DIM;
        }
        self
    }

    pub fn with_focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        if focused {
            self.attrs |= Attr::INVERSE;
        }
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Find a node by id (depth-first).
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Find a node by id for mutation.
    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Ids of the node and its ancestors, root first, or `None` if absent.
    pub fn path_to(&self, id: NodeId) -> Option<Vec<NodeId>> {
        if self.id == id {
            return Some(vec![self.id]);
        }
        for child in &self.children {
            if let Some(mut path) = child.path_to(id) {
                path.insert(0, self.id);
                return Some(path);
            }
        }
        None
    }

    /// Apply a patch in place. Returns false when its target is not in this tree.
    pub fn apply(&mut self, patch: &Patch) -> bool {
        match patch {
            Patch::Replace(node) => match self.find_mut(node.id) {
                Some(target) => {
                    *target = node.clone();
                    true
                }
                None => false,
            },
            Patch::Append { parent, node } => match self.find_mut(*parent) {
                Some(target) => {
                    target.children.push(node.clone());
                    true
                }
                None => false,
            },
            Patch::Remove { parent, child } => match self.find_mut(*parent) {
                Some(target) => {
                    target.children.retain(|c| c.id != *child);
                    true
                }
                None => false,
            },
            Patch::Clear { parent } => match self.find_mut(*parent) {
                Some(target) => {
                    target.children.clear();
                    true
                }
                None => false,
            },
        }
    }

    /// Visit every node depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Count nodes in the subtree (including self).
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// All text in the subtree, one line per text line, depth-first.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        self.walk(&mut |node| {
            if !node.text.is_empty() {
                lines.extend(node.text.lines().map(str::to_string));
            }
        });
        lines.join("\n")
    }
}
