//! Surface - root owner of the gallery.
//!
//! The surface owns the display groups and the optional background,
//! dispatches window-level events (resize, drag-and-drop, keys, pointer)
//! and drives the backend:
//!
//! ```text
//! new(config, backend) → mount() → dispatch(event)* → unmount()
//!                                    │
//!                                    └─ control state changes queue patches,
//!                                       flush() hands them to the backend
//! ```
//!
//! Exactly one surface is live per thread; constructing a second one fails
//! with [`GalleryError::SurfaceExists`].
//!
//! # Example
//!
//! ```ignore
//! use spark_gallery::pipeline::{RecordingBackend, Surface};
//!
//! let mut surface = Surface::new(GalleryConfig::default(), RecordingBackend::new())?;
//! let _cleanup = surface.on_resize(|size| tracing::info!(?size, "resized"));
//! surface.add_group(gallery_group);
//! surface.mount()?;
//! surface.resize(Size::new(120, 40))?;
//! ```

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use spark_signals::{signal, Signal};
use tracing::{debug, warn};

use crate::config::GalleryConfig;
use crate::controls::{Background, Cleanup, Control, ControlEvent};
use crate::display::DisplayGroup;
use crate::error::{GalleryError, Result};
use crate::layout::compute_layout;
use crate::state::{focus, DragTracker, KeyboardEvent};
use crate::types::{Attr, Point, Size};

use super::backend::Backend;
use super::node::{allocate_id, Node, NodeId, NodeKind};
use super::patch::{self, Patch};

thread_local! {
    static LIVE: Cell<bool> = const { Cell::new(false) };
}

// =============================================================================
// Events
// =============================================================================

/// Input delivered to the surface by a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Resize(Size),
    Key(KeyboardEvent),
    /// Pointer pressed at a cell
    Click(Point),
    /// Pointer moved with the button held
    PointerDrag(Point),
    DragEnter(Point),
    DragOver(Point),
    DragLeave,
    FilesDropped(Vec<PathBuf>),
    /// Pasted text that is not a list of paths
    Paste(String),
}

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

// =============================================================================
// Listeners
// =============================================================================

bitflags! {
    /// Window-level events a listener wants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Interest: u8 {
        const RESIZE        = 1 << 0;
        const DRAG_ENTER    = 1 << 1;
        const DRAG_OVER     = 1 << 2;
        const DRAG_LEAVE    = 1 << 3;
        const FILES_DROPPED = 1 << 4;

        const DRAG = Self::DRAG_ENTER.bits()
            | Self::DRAG_OVER.bits()
            | Self::DRAG_LEAVE.bits()
            | Self::FILES_DROPPED.bits();
    }
}

/// Receiver of window-level events. Every method defaults to doing nothing;
/// only the kinds named in the registration's [`Interest`] are delivered.
pub trait SurfaceListener {
    fn on_resize(&self, _size: Size) {}
    fn on_drag_enter(&self, _point: Point) {}
    fn on_drag_over(&self, _point: Point) {}
    fn on_drag_leave(&self) {}
    fn on_files_dropped(&self, _files: &[PathBuf]) {}
}

/// Single-closure listener behind the `on_*` helpers.
enum Handler {
    Resize(Box<dyn Fn(Size)>),
    DragEnter(Box<dyn Fn(Point)>),
    DragOver(Box<dyn Fn(Point)>),
    DragLeave(Box<dyn Fn()>),
    FilesDropped(Box<dyn Fn(&[PathBuf])>),
}

impl SurfaceListener for Handler {
    fn on_resize(&self, size: Size) {
        if let Handler::Resize(f) = self {
            f(size);
        }
    }

    fn on_drag_enter(&self, point: Point) {
        if let Handler::DragEnter(f) = self {
            f(point);
        }
    }

    fn on_drag_over(&self, point: Point) {
        if let Handler::DragOver(f) = self {
            f(point);
        }
    }

    fn on_drag_leave(&self) {
        if let Handler::DragLeave(f) = self {
            f();
        }
    }

    fn on_files_dropped(&self, files: &[PathBuf]) {
        if let Handler::FilesDropped(f) = self {
            f(files);
        }
    }
}

struct Registration {
    id: u64,
    interest: Interest,
    listener: Rc<dyn SurfaceListener>,
}

type Registry = Rc<RefCell<Vec<Registration>>>;

// =============================================================================
// Surface
// =============================================================================

pub struct Surface<B: Backend> {
    config: GalleryConfig,
    backend: B,
    size: Signal<Size>,
    page_id: NodeId,
    header_id: NodeId,
    groups_id: NodeId,
    groups: Vec<DisplayGroup>,
    background: Option<(Background, Cleanup)>,
    listeners: Registry,
    next_listener: Cell<u64>,
    drag: DragTracker,
    mounted: bool,
}

impl<B: Backend> Surface<B> {
    /// Create the thread's surface. Fails if one is already live.
    pub fn new(config: GalleryConfig, backend: B) -> Result<Self> {
        if LIVE.with(|live| live.replace(true)) {
            return Err(GalleryError::SurfaceExists);
        }
        let size = config.size();
        Ok(Self {
            config,
            backend,
            size: signal(size),
            page_id: allocate_id(),
            header_id: allocate_id(),
            groups_id: allocate_id(),
            groups: Vec::new(),
            background: None,
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_listener: Cell::new(0),
            drag: DragTracker::new(),
            mounted: false,
        })
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn size(&self) -> Size {
        self.size.get()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Register a listener for the events in `interest`, delivered in
    /// registration order. The returned cleanup unregisters it.
    pub fn listen(&self, listener: Rc<dyn SurfaceListener>, interest: Interest) -> Cleanup {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push(Registration {
            id,
            interest,
            listener,
        });

        let registry: Weak<RefCell<Vec<Registration>>> = Rc::downgrade(&self.listeners);
        Box::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().retain(|r| r.id != id);
            }
        })
    }

    pub fn on_resize(&self, f: impl Fn(Size) + 'static) -> Cleanup {
        self.listen(Rc::new(Handler::Resize(Box::new(f))), Interest::RESIZE)
    }

    pub fn on_drag_enter(&self, f: impl Fn(Point) + 'static) -> Cleanup {
        self.listen(Rc::new(Handler::DragEnter(Box::new(f))), Interest::DRAG_ENTER)
    }

    pub fn on_drag_over(&self, f: impl Fn(Point) + 'static) -> Cleanup {
        self.listen(Rc::new(Handler::DragOver(Box::new(f))), Interest::DRAG_OVER)
    }

    pub fn on_drag_leave(&self, f: impl Fn() + 'static) -> Cleanup {
        self.listen(Rc::new(Handler::DragLeave(Box::new(f))), Interest::DRAG_LEAVE)
    }

    pub fn on_files_dropped(&self, f: impl Fn(&[PathBuf]) + 'static) -> Cleanup {
        self.listen(Rc::new(Handler::FilesDropped(Box::new(f))), Interest::FILES_DROPPED)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Call `deliver` on every listener interested in `kind`. Listeners
    /// removed by an earlier listener in the same broadcast are skipped.
    fn broadcast(&self, kind: Interest, deliver: impl Fn(&dyn SurfaceListener)) {
        let targets: Vec<(u64, Rc<dyn SurfaceListener>)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|r| r.interest.intersects(kind))
            .map(|r| (r.id, Rc::clone(&r.listener)))
            .collect();

        for (id, listener) in targets {
            let still_registered = self.listeners.borrow().iter().any(|r| r.id == id);
            if still_registered {
                deliver(listener.as_ref());
            }
        }
    }

    // -------------------------------------------------------------------------
    // Groups and background
    // -------------------------------------------------------------------------

    pub fn groups(&self) -> &[DisplayGroup] {
        &self.groups
    }

    pub fn add_group(&mut self, group: DisplayGroup) {
        let node = group.render();
        self.groups.push(group);
        patch::queue(Patch::Append {
            parent: self.groups_id,
            node,
        });
    }

    /// Remove a group. Returns false when it is not on this surface.
    pub fn remove_group(&mut self, group: &DisplayGroup) -> bool {
        let Some(index) = self.groups.iter().position(|g| g.id() == group.id()) else {
            return false;
        };
        self.groups.remove(index);
        patch::queue(Patch::Remove {
            parent: self.groups_id,
            child: group.id(),
        });
        true
    }

    /// Paint `background` behind everything and keep it sized to the surface.
    pub fn set_background(&mut self, background: Background) {
        if let Some((_, cleanup)) = self.background.take() {
            cleanup();
        }
        background.set_size(self.size.get());
        let follower = background.clone();
        let cleanup = self.on_resize(move |size| follower.set_size(size));
        self.background = Some((background, cleanup));
        patch::queue_replace(self.render());
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref().map(|(background, _)| background)
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Whole presentation tree: background, header, then the groups.
    pub fn render(&self) -> Node {
        let mut page = Node::new(self.page_id, NodeKind::Page);
        if let Some((background, _)) = &self.background {
            page.push(background.render());
        }
        page.push(
            Node::new(self.header_id, NodeKind::Header)
                .with_text(self.config.title.as_str())
                .with_attrs(Attr::BOLD),
        );
        page.push(
            Node::new(self.groups_id, NodeKind::Groups)
                .with_children(self.groups.iter().map(DisplayGroup::render).collect()),
        );
        page
    }

    /// Every control on the surface in document order.
    pub fn controls(&self) -> Vec<Rc<dyn Control>> {
        self.groups.iter().flat_map(DisplayGroup::controls).collect()
    }

    /// Ids that Tab cycles through.
    pub fn focus_order(&self) -> Vec<NodeId> {
        self.controls()
            .iter()
            .filter(|c| c.is_focusable())
            .map(|c| c.id())
            .collect()
    }

    fn control(&self, id: NodeId) -> Option<Rc<dyn Control>> {
        self.controls().into_iter().find(|c| c.id() == id)
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Hand the full tree to the backend and start collecting patches.
    pub fn mount(&mut self) -> Result<()> {
        // Anything queued before mount is covered by the full tree
        patch::set_mounted(false);
        let tree = self.render();
        self.backend.mount(&tree)?;
        patch::set_mounted(true);
        self.mounted = true;
        debug!(nodes = tree.count(), "surface mounted");
        self.backend.present()
    }

    /// Send pending patches to the backend. Returns how many were sent.
    pub fn flush(&mut self) -> Result<usize> {
        if !self.mounted {
            return Ok(0);
        }
        let patches = patch::take_pending();
        for patch in &patches {
            self.backend.patch(patch)?;
        }
        if !patches.is_empty() {
            self.backend.present()?;
        }
        Ok(patches.len())
    }

    /// Stop collecting patches and release the backend.
    pub fn unmount(&mut self) -> Result<()> {
        if !self.mounted {
            return Ok(());
        }
        patch::set_mounted(false);
        self.mounted = false;
        focus::blur();
        debug!("surface unmounted");
        self.backend.teardown()
    }

    // -------------------------------------------------------------------------
    // Window events
    // -------------------------------------------------------------------------

    /// Update the size, then tell every resize listener in registration order.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        self.size.set(size);
        // Listeners always hear about the new size, even if the backend fails
        self.broadcast(Interest::RESIZE, |l| l.on_resize(size));
        self.backend.resize(size)?;
        // The backend repaints at the new size even when nothing changed
        if self.flush()? == 0 && self.mounted {
            self.backend.present()?;
        }
        Ok(())
    }

    fn accepts(&self, event: &str) -> bool {
        if !self.config.accepts_drops {
            debug!(event, "drag event ignored: surface does not accept drops");
        }
        self.config.accepts_drops
    }

    /// Start a drag gesture. Returns whether the event was delivered.
    pub fn drag_enter(&mut self, point: Point) -> bool {
        if !self.accepts("drag_enter") {
            return false;
        }
        if !self.drag.enter(point) {
            debug!(?point, "drag_enter ignored: gesture already active");
            return false;
        }
        self.broadcast(Interest::DRAG_ENTER, |l| l.on_drag_enter(point));
        true
    }

    pub fn drag_over(&mut self, point: Point) -> bool {
        if !self.accepts("drag_over") {
            return false;
        }
        if !self.drag.over(point) {
            debug!(?point, "drag_over ignored: no active gesture");
            return false;
        }
        self.broadcast(Interest::DRAG_OVER, |l| l.on_drag_over(point));
        true
    }

    pub fn drag_leave(&mut self) -> bool {
        if !self.accepts("drag_leave") {
            return false;
        }
        if !self.drag.leave() {
            debug!("drag_leave ignored: no active gesture");
            return false;
        }
        self.broadcast(Interest::DRAG_LEAVE, |l| l.on_drag_leave());
        true
    }

    pub fn files_dropped(&mut self, files: Vec<PathBuf>) -> bool {
        if !self.accepts("files_dropped") {
            return false;
        }
        if !self.drag.drop_files() {
            debug!(count = files.len(), "files_dropped ignored: no active gesture");
            return false;
        }
        self.broadcast(Interest::FILES_DROPPED, |l| l.on_files_dropped(&files));
        true
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Route one event, then flush the patches it caused.
    pub fn dispatch(&mut self, event: SurfaceEvent) -> Result<Flow> {
        match event {
            SurfaceEvent::Resize(size) => self.resize(size)?,
            SurfaceEvent::Key(key) if key.is_quit() => return Ok(Flow::Quit),
            SurfaceEvent::Key(key) => self.key(&key),
            SurfaceEvent::Click(point) => self.click(point)?,
            SurfaceEvent::PointerDrag(point) => self.pointer_drag(point)?,
            SurfaceEvent::DragEnter(point) => {
                self.drag_enter(point);
            }
            SurfaceEvent::DragOver(point) => {
                self.drag_over(point);
            }
            SurfaceEvent::DragLeave => {
                self.drag_leave();
            }
            SurfaceEvent::FilesDropped(files) => {
                self.files_dropped(files);
            }
            SurfaceEvent::Paste(text) => self.paste(text),
        }
        self.flush()?;
        Ok(Flow::Continue)
    }

    /// Redraw the controls that gained or lost focus.
    fn refocus(&self, previous: Option<NodeId>, next: Option<NodeId>) {
        if previous == next {
            return;
        }
        for id in [previous, next].into_iter().flatten() {
            if let Some(control) = self.control(id) {
                control.refresh();
            }
        }
    }

    fn set_focus(&self, next: Option<NodeId>) {
        let previous = match next {
            Some(id) => focus::focus(id),
            None => focus::blur(),
        };
        self.refocus(previous, next);
    }

    fn key(&mut self, key: &KeyboardEvent) {
        if !key.is_press() {
            return;
        }
        let previous = focus::focused();
        let next = match key.key.as_str() {
            "Tab" if key.modifiers.shift => focus::focus_previous(&self.focus_order()),
            "Tab" => focus::focus_next(&self.focus_order()),
            "BackTab" => focus::focus_previous(&self.focus_order()),
            _ => {
                let handled = previous
                    .and_then(|id| self.control(id))
                    .is_some_and(|control| control.handle_input(&ControlEvent::Key(key.clone())));
                if !handled && key.key == "Escape" {
                    self.set_focus(None);
                }
                return;
            }
        };
        self.refocus(previous, next);
    }

    /// Pasted text goes to the focused control, if any.
    fn paste(&self, text: String) {
        let handled = focus::focused()
            .and_then(|id| self.control(id))
            .is_some_and(|control| control.handle_input(&ControlEvent::Paste(text)));
        if !handled {
            debug!("paste ignored: no focused control took it");
        }
    }

    /// Hit-test a point: the deepest node whose control claims it wins.
    fn hit(&self, point: Point) -> Result<Option<(Rc<dyn Control>, ControlEvent)>> {
        let tree = self.render();
        let layout = compute_layout(&tree, self.size.get())?;
        let path = layout.hit_path(&tree, point);
        let controls = self.controls();

        for id in path.iter().rev() {
            let Some(rect) = layout.rect(*id) else {
                continue;
            };
            let at = rect.fraction(point);
            for control in &controls {
                if let Some(event) = control.hit(*id, at) {
                    return Ok(Some((Rc::clone(control), event)));
                }
            }
        }
        Ok(None)
    }

    fn click(&mut self, point: Point) -> Result<()> {
        match self.hit(point)? {
            Some((control, event)) => {
                if control.is_focusable() {
                    self.set_focus(Some(control.id()));
                }
                control.handle_input(&event);
            }
            None => debug!(?point, "click hit no control"),
        }
        Ok(())
    }

    fn pointer_drag(&mut self, point: Point) -> Result<()> {
        if let Some((control, event @ ControlEvent::Drag { .. })) = self.hit(point)? {
            control.handle_input(&event);
        }
        Ok(())
    }
}

impl<B: Backend> Drop for Surface<B> {
    fn drop(&mut self) {
        if let Err(err) = self.unmount() {
            warn!(%err, "backend teardown failed");
        }
        if let Some((_, cleanup)) = self.background.take() {
            cleanup();
        }
        LIVE.with(|live| live.set(false));
    }
}
