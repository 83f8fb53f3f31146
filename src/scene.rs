//! In-memory scene graph of styled primitives
//!
//! This is the cell vocabulary the composer targets: vertices and edges
//! with serialized style strings, parent/child insertion, and a begin/end
//! transactional update so partially built trees are never observed by
//! consumers (the SVG exporter refuses to read a scene mid-update).

use crate::geometry::{Point, Rect};
use crate::style::Style;

/// Identifier of a cell within its scene
pub type CellId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Vertex,
    Edge,
}

/// Placement of a cell.
///
/// For absolute geometry, `rect` is expressed in the parent cell's frame.
/// For relative geometry (sub-unit markers), `rect.x`/`rect.y` are [0..1]
/// fractions of the parent's size and `offset` is an additional pixel
/// displacement; `rect.width`/`rect.height` stay in pixels either way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellGeometry {
    pub rect: Rect,
    pub relative: bool,
    pub offset: Point,
    /// Edge waypoints, absolute canvas coordinates
    pub points: Vec<Point>,
}

impl CellGeometry {
    pub fn absolute(rect: Rect) -> Self {
        Self {
            rect,
            ..Self::default()
        }
    }

    pub fn relative(fraction: Point, offset: Point, width: f64, height: f64) -> Self {
        Self {
            rect: Rect::new(fraction.x, fraction.y, width, height),
            relative: true,
            offset,
            points: Vec::new(),
        }
    }
}

/// One styled primitive in the scene
#[derive(Debug, Clone)]
pub struct Cell {
    pub id: CellId,
    pub kind: CellKind,
    /// Serialized `key=value;` style string
    pub style: String,
    pub geometry: CellGeometry,
    /// Display label, if any
    pub value: Option<String>,
    pub parent: Option<CellId>,
    pub children: Vec<CellId>,
    pub source: Option<CellId>,
    pub target: Option<CellId>,
}

impl Cell {
    /// Parsed view of the style string
    pub fn style(&self) -> Style {
        Style::parse(&self.style)
    }
}

/// A scene of cells under a single root vertex
#[derive(Debug)]
pub struct Scene {
    cells: Vec<Cell>,
    update_depth: usize,
}

impl Scene {
    /// Create a scene containing only the root cell
    pub fn new() -> Self {
        Self {
            cells: vec![Cell {
                id: 0,
                kind: CellKind::Vertex,
                style: String::new(),
                geometry: CellGeometry::default(),
                value: None,
                parent: None,
                children: Vec::new(),
                source: None,
                target: None,
            }],
            update_depth: 0,
        }
    }

    pub fn root(&self) -> CellId {
        0
    }

    /// Open a transactional update. Nestable; the scene is observable again
    /// once every `begin_update` has been matched by an `end_update`.
    pub fn begin_update(&mut self) {
        self.update_depth += 1;
    }

    pub fn end_update(&mut self) {
        debug_assert!(self.update_depth > 0, "end_update without begin_update");
        self.update_depth = self.update_depth.saturating_sub(1);
    }

    /// True while a transactional update is open
    pub fn in_update(&self) -> bool {
        self.update_depth > 0
    }

    /// Insert a vertex cell under `parent`
    pub fn insert_vertex(
        &mut self,
        parent: CellId,
        style: &Style,
        geometry: CellGeometry,
        value: Option<String>,
    ) -> CellId {
        self.insert(parent, CellKind::Vertex, style, geometry, value, None, None)
    }

    /// Insert an edge cell under `parent`, optionally bound to endpoint cells
    #[allow(clippy::too_many_arguments)]
    pub fn insert_edge(
        &mut self,
        parent: CellId,
        style: &Style,
        points: Vec<Point>,
        value: Option<String>,
        source: Option<CellId>,
        target: Option<CellId>,
    ) -> CellId {
        let geometry = CellGeometry {
            points,
            ..CellGeometry::default()
        };
        self.insert(parent, CellKind::Edge, style, geometry, value, source, target)
    }

    #[allow(clippy::too_many_arguments)]
    fn insert(
        &mut self,
        parent: CellId,
        kind: CellKind,
        style: &Style,
        geometry: CellGeometry,
        value: Option<String>,
        source: Option<CellId>,
        target: Option<CellId>,
    ) -> CellId {
        let id = self.cells.len();
        self.cells.push(Cell {
            id,
            kind,
            style: style.to_style_string(),
            geometry,
            value,
            parent: Some(parent),
            children: Vec::new(),
            source,
            target,
        });
        self.cells[parent].children.push(id);
        id
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id]
    }

    pub fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id]
    }

    pub fn set_style(&mut self, id: CellId, style: &Style) {
        self.cells[id].style = style.to_style_string();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.len() <= 1
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Walk from a cell up to (but not including) the root
    pub fn ancestors(&self, id: CellId) -> impl Iterator<Item = CellId> + '_ {
        let mut current = self.cells[id].parent;
        std::iter::from_fn(move || {
            let id = current?;
            if id == 0 {
                return None;
            }
            current = self.cells[id].parent;
            Some(id)
        })
    }

    /// Derive a group cell's bounds from its children, the way the
    /// underlying canvas library computes group extents.
    ///
    /// The group takes the union of its direct children's rectangles and the
    /// children are rebased into the group's new frame, leaving every
    /// absolute position unchanged.
    pub fn fit_group_to_children(&mut self, id: CellId) {
        let child_rects: Vec<Rect> = self.cells[id]
            .children
            .iter()
            .filter(|&&c| !self.cells[c].geometry.relative)
            .map(|&c| self.cells[c].geometry.rect)
            .collect();
        let Some(first) = child_rects.first().copied() else {
            return;
        };
        let bounds = child_rects.iter().fold(first, |acc, r| acc.union(r));
        let children = self.cells[id].children.clone();
        for c in children {
            if !self.cells[c].geometry.relative {
                let rect = self.cells[c].geometry.rect;
                self.cells[c].geometry.rect = rect.translate(-bounds.x, -bounds.y);
            }
        }
        self.cells[id].geometry.rect = bounds;
    }

    /// Absolute origin of a cell's frame: the accumulated offsets of its
    /// ancestor chain plus its own position. Relative-geometry cells resolve
    /// against the parent's size first.
    pub fn absolute_origin(&self, id: CellId) -> Point {
        let cell = &self.cells[id];
        let parent_origin = cell
            .parent
            .map(|p| self.absolute_origin(p))
            .unwrap_or_default();
        if cell.geometry.relative {
            let parent_rect = cell
                .parent
                .map(|p| self.cells[p].geometry.rect)
                .unwrap_or_default();
            Point::new(
                parent_origin.x
                    + cell.geometry.rect.x * parent_rect.width
                    + cell.geometry.offset.x,
                parent_origin.y
                    + cell.geometry.rect.y * parent_rect.height
                    + cell.geometry.offset.y,
            )
        } else {
            Point::new(
                parent_origin.x + cell.geometry.rect.x,
                parent_origin.y + cell.geometry.rect.y,
            )
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(shape: &str) -> Style {
        Style::new().with("shape", shape)
    }

    #[test]
    fn test_insert_vertex_parents_correctly() {
        let mut scene = Scene::new();
        let root = scene.root();
        let a = scene.insert_vertex(
            root,
            &style("rectangle"),
            CellGeometry::absolute(Rect::new(10.0, 10.0, 50.0, 30.0)),
            None,
        );
        let b = scene.insert_vertex(
            a,
            &style("ellipse"),
            CellGeometry::absolute(Rect::new(5.0, 5.0, 10.0, 10.0)),
            None,
        );
        assert_eq!(scene.cell(a).parent, Some(root));
        assert_eq!(scene.cell(a).children, vec![b]);
        assert_eq!(scene.cell(b).parent, Some(a));
    }

    #[test]
    fn test_update_depth_nesting() {
        let mut scene = Scene::new();
        scene.begin_update();
        scene.begin_update();
        assert!(scene.in_update());
        scene.end_update();
        assert!(scene.in_update());
        scene.end_update();
        assert!(!scene.in_update());
    }

    #[test]
    fn test_absolute_origin_accumulates_offsets() {
        let mut scene = Scene::new();
        let root = scene.root();
        let outer = scene.insert_vertex(
            root,
            &style("rectangle"),
            CellGeometry::absolute(Rect::new(100.0, 100.0, 200.0, 200.0)),
            None,
        );
        let inner = scene.insert_vertex(
            outer,
            &style("rectangle"),
            CellGeometry::absolute(Rect::new(20.0, 30.0, 50.0, 50.0)),
            None,
        );
        let origin = scene.absolute_origin(inner);
        assert_eq!(origin, Point::new(120.0, 130.0));
    }

    #[test]
    fn test_absolute_origin_relative_marker() {
        let mut scene = Scene::new();
        let root = scene.root();
        let task = scene.insert_vertex(
            root,
            &style("rectangle"),
            CellGeometry::absolute(Rect::new(0.0, 0.0, 100.0, 80.0)),
            None,
        );
        // Marker anchored at the bottom-center, 14px wide, pulled up by its height
        let marker = scene.insert_vertex(
            task,
            &style("loop"),
            CellGeometry::relative(Point::new(0.5, 1.0), Point::new(-7.0, -14.0), 14.0, 14.0),
            None,
        );
        let origin = scene.absolute_origin(marker);
        assert_eq!(origin, Point::new(43.0, 66.0));
    }

    #[test]
    fn test_style_round_trips_through_cell() {
        let mut scene = Scene::new();
        let root = scene.root();
        let s = Style::new().with("shape", "rhombus").with("fillColor", "#fff");
        let id = scene.insert_vertex(root, &s, CellGeometry::default(), None);
        assert_eq!(scene.cell(id).style(), s);
    }
}
