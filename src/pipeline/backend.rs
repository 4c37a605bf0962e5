//! Render backend contract.
//!
//! The core never paints. It hands the backend the whole tree once at mount
//! and scoped [`Patch`]es afterwards. [`RecordingBackend`] keeps the tree in
//! memory and logs every call, which is what headless runs and tests use.

use tracing::debug;

use crate::error::Result;
use crate::types::Size;

use super::node::Node;
use super::patch::Patch;

/// Something that can present a presentation tree.
pub trait Backend {
    /// Receive the full tree. Called once per mount.
    fn mount(&mut self, tree: &Node) -> Result<()>;

    /// Apply one scoped change.
    fn patch(&mut self, patch: &Patch) -> Result<()>;

    /// A batch of patches is complete; repaint if needed.
    fn present(&mut self) -> Result<()> {
        Ok(())
    }

    /// The surface changed size.
    fn resize(&mut self, _size: Size) -> Result<()> {
        Ok(())
    }

    /// Release native resources.
    fn teardown(&mut self) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Recording Backend
// =============================================================================

/// In-memory backend: mirrors the tree and records every patch.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    tree: Option<Node>,
    patches: Vec<Patch>,
    mounts: usize,
    presents: usize,
    size: Size,
    torn_down: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tree as the backend currently sees it.
    pub fn tree(&self) -> Option<&Node> {
        self.tree.as_ref()
    }

    /// Every patch received since mount (or the last `take_patches`).
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn take_patches(&mut self) -> Vec<Patch> {
        std::mem::take(&mut self.patches)
    }

    pub fn mount_count(&self) -> usize {
        self.mounts
    }

    pub fn present_count(&self) -> usize {
        self.presents
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Plain text of the mirrored tree.
    pub fn text(&self) -> String {
        self.tree.as_ref().map(Node::plain_text).unwrap_or_default()
    }
}

impl Backend for RecordingBackend {
    fn mount(&mut self, tree: &Node) -> Result<()> {
        self.tree = Some(tree.clone());
        self.patches.clear();
        self.mounts += 1;
        Ok(())
    }

    fn patch(&mut self, patch: &Patch) -> Result<()> {
        if let Some(tree) = self.tree.as_mut() {
            if !tree.apply(patch) {
                debug!(target_id = %patch.target(), "patch target not in tree");
            }
        }
        self.patches.push(patch.clone());
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.presents += 1;
        Ok(())
    }

    fn resize(&mut self, size: Size) -> Result<()> {
        self.size = size;
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        self.torn_down = true;
        Ok(())
    }
}
