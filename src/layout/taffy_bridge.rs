//! Taffy Bridge - flexbox layout of the presentation tree.
//!
//! Mirrors a [`Node`] tree into a Taffy tree, styling each node by its
//! kind, runs the layout with text leaves measured in cells, and flattens
//! the result into absolute rectangles keyed by [`NodeId`].

use std::collections::HashMap;

use taffy::{
    AlignItems, AlignSelf, AvailableSpace, Dimension, Display, FlexDirection, LengthPercentage,
    LengthPercentageAuto, Position, Rect as TaffyRect, Size as TaffySize, Style, TaffyError,
    TaffyTree,
};

use crate::controls::ControlKind;
use crate::error::{GalleryError, Result};
use crate::pipeline::{Node, NodeId, NodeKind};
use crate::types::{Point, Rect, Size};

use super::text_measure::text_size;

// =============================================================================
// LAYOUT MAP
// =============================================================================

/// Absolute rectangles of every laid-out node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutMap {
    rects: HashMap<NodeId, Rect>,
}

impl LayoutMap {
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.rects.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    fn contains(&self, id: NodeId, point: Point) -> bool {
        self.rect(id).is_some_and(|rect| rect.contains(point))
    }

    /// Ids from `root` down to the deepest node under `point`.
    ///
    /// Later siblings paint over earlier ones, so they are tried first.
    /// Empty when the point is outside the root.
    pub fn hit_path(&self, root: &Node, point: Point) -> Vec<NodeId> {
        let mut path = Vec::new();
        if !self.contains(root.id, point) {
            return path;
        }
        path.push(root.id);

        let mut current = root;
        while let Some(child) = current
            .children
            .iter()
            .rev()
            .find(|child| self.contains(child.id, point))
        {
            path.push(child.id);
            current = child;
        }
        path
    }
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

fn length(cells: f32) -> LengthPercentage {
    LengthPercentage::Length(cells)
}

fn padding(horizontal: f32, vertical: f32) -> TaffyRect<LengthPercentage> {
    TaffyRect {
        left: length(horizontal),
        right: length(horizontal),
        top: length(vertical),
        bottom: length(vertical),
    }
}

fn gap(columns: f32, rows: f32) -> TaffySize<LengthPercentage> {
    TaffySize {
        width: length(columns),
        height: length(rows),
    }
}

fn container(direction: FlexDirection) -> Style {
    Style {
        display: Display::Flex,
        flex_direction: direction,
        align_items: Some(AlignItems::FlexStart),
        ..Default::default()
    }
}

/// Style of a node with children. Rows inside controls are packed; rows
/// of independent elements get breathing room.
fn container_style(node: &Node, inside_control: bool, surface: Size) -> Style {
    match node.kind {
        NodeKind::Page => Style {
            size: TaffySize {
                width: Dimension::Length(f32::from(surface.width)),
                height: Dimension::Length(f32::from(surface.height)),
            },
            padding: padding(2.0, 1.0),
            gap: gap(0.0, 1.0),
            ..container(FlexDirection::Column)
        },
        NodeKind::Groups => Style {
            flex_grow: 1.0,
            align_self: Some(AlignSelf::Stretch),
            gap: gap(2.0, 0.0),
            align_items: None,
            ..container(FlexDirection::Row)
        },
        NodeKind::Group => Style {
            flex_grow: 1.0,
            flex_basis: Dimension::Length(0.0),
            min_size: TaffySize {
                width: Dimension::Length(0.0),
                height: Dimension::Auto,
            },
            gap: gap(0.0, 1.0),
            align_items: None,
            ..container(FlexDirection::Column)
        },
        NodeKind::Item => Style {
            padding: padding(1.0, 0.0),
            ..container(FlexDirection::Column)
        },
        NodeKind::Row if !inside_control => Style {
            gap: gap(2.0, 0.0),
            ..container(FlexDirection::Row)
        },
        NodeKind::Column if !inside_control => Style {
            gap: gap(0.0, 1.0),
            ..container(FlexDirection::Column)
        },
        kind if kind.is_horizontal() => container(FlexDirection::Row),
        _ => container(FlexDirection::Column),
    }
}

/// Background fills the page behind everything else.
fn background_style() -> Style {
    let zero = LengthPercentageAuto::Length(0.0);
    Style {
        position: Position::Absolute,
        inset: TaffyRect {
            left: zero,
            right: zero,
            top: zero,
            bottom: zero,
        },
        size: TaffySize {
            width: Dimension::Percent(1.0),
            height: Dimension::Percent(1.0),
        },
        ..Default::default()
    }
}

// =============================================================================
// TREE BUILDING
// =============================================================================

/// Taffy node ids mirroring the presentation tree.
struct Built {
    id: taffy::NodeId,
    children: Vec<Built>,
}

fn layout_error(err: TaffyError) -> GalleryError {
    GalleryError::Layout(err.to_string())
}

fn build(
    tree: &mut TaffyTree<TaffySize<f32>>,
    node: &Node,
    inside_control: bool,
    surface: Size,
) -> Result<Built> {
    if node.kind == NodeKind::Control(ControlKind::Background) {
        let id = tree.new_leaf(background_style()).map_err(layout_error)?;
        return Ok(Built { id, children: Vec::new() });
    }

    if node.children.is_empty() {
        let (width, height) = text_size(&node.text);
        let extent = TaffySize {
            width: f32::from(width),
            height: f32::from(height),
        };
        let style = match node.kind {
            NodeKind::Page => container_style(node, inside_control, surface),
            _ => Style::default(),
        };
        let id = tree.new_leaf_with_context(style, extent).map_err(layout_error)?;
        return Ok(Built { id, children: Vec::new() });
    }

    let child_inside = inside_control || matches!(node.kind, NodeKind::Control(_));
    let children = node
        .children
        .iter()
        .map(|child| build(tree, child, child_inside, surface))
        .collect::<Result<Vec<_>>>()?;
    let child_ids: Vec<taffy::NodeId> = children.iter().map(|c| c.id).collect();

    let id = tree
        .new_with_children(container_style(node, inside_control, surface), &child_ids)
        .map_err(layout_error)?;
    Ok(Built { id, children })
}

fn to_cells(value: f32) -> u16 {
    value.round().clamp(0.0, f32::from(u16::MAX)) as u16
}

fn collect(
    tree: &TaffyTree<TaffySize<f32>>,
    node: &Node,
    built: &Built,
    origin: (f32, f32),
    rects: &mut HashMap<NodeId, Rect>,
) -> Result<()> {
    let layout = tree.layout(built.id).map_err(layout_error)?;
    let x = origin.0 + layout.location.x;
    let y = origin.1 + layout.location.y;
    rects.insert(
        node.id,
        Rect::new(
            to_cells(x),
            to_cells(y),
            to_cells(layout.size.width),
            to_cells(layout.size.height),
        ),
    );
    for (child, built_child) in node.children.iter().zip(&built.children) {
        collect(tree, child, built_child, (x, y), rects)?;
    }
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Lay out `root` on a surface of `size` cells.
pub fn compute_layout(root: &Node, size: Size) -> Result<LayoutMap> {
    let mut tree: TaffyTree<TaffySize<f32>> = TaffyTree::new();
    let built = build(&mut tree, root, false, size)?;

    let available = TaffySize {
        width: AvailableSpace::Definite(f32::from(size.width)),
        height: AvailableSpace::Definite(f32::from(size.height)),
    };

    // Text leaves carry their measured extent as context
    let mut measure_fn = |known_dimensions: TaffySize<Option<f32>>,
                          _available_space: TaffySize<AvailableSpace>,
                          _node_id: taffy::NodeId,
                          context: Option<&mut TaffySize<f32>>,
                          _style: &Style| {
        let extent = context.map(|extent| *extent).unwrap_or(TaffySize::ZERO);
        TaffySize {
            width: known_dimensions.width.unwrap_or(extent.width),
            height: known_dimensions.height.unwrap_or(extent.height),
        }
    };
    tree.compute_layout_with_measure(built.id, available, &mut measure_fn)
        .map_err(layout_error)?;

    let mut rects = HashMap::new();
    collect(&tree, root, &built, (0.0, 0.0), &mut rects)?;
    Ok(LayoutMap { rects })
}
