//! Diagram composition: model to scene graph, plus the selection model
//!
//! `DiagramView` owns one scene and rebuilds it from scratch on every
//! `draw_diagram` call. A draw pass runs `Idle -> BuildingHierarchy ->
//! PlacingShapes -> PlacingConnections -> Idle` synchronously inside one
//! scene transaction, so a consumer never observes a half-built tree.
//! Re-entrant draws on the same view are the caller's responsibility to
//! serialize.

use std::collections::{HashMap, HashSet};

use crate::geometry::{closest_anchors, Point, Rect, DEGENERATE_SEGMENT_NUDGE};
use crate::hierarchy::{ElementRef, Hierarchy, ROOT};
use crate::model::{Connection, DiagramModel, NotationType, Shape};
use crate::scene::{CellGeometry, CellId, Scene};
use crate::style::Style;
use crate::templates::{self, EdgeRouting, NotationTemplates, SubUnit};
use crate::theme::Theme;

/// Supplies notation-specific stencil markup (vector icon definitions)
pub trait StencilProvider {
    /// Markup for a notation's stencil set; `None` means nothing to register
    fn stencil(&self, notation: NotationType) -> Option<String>;
}

/// A provider with no stencils; shapes fall back to their base primitives
pub struct NoStencils;

impl StencilProvider for NoStencils {
    fn stencil(&self, _notation: NotationType) -> Option<String> {
        None
    }
}

/// Registered stencil markup, keyed by notation.
///
/// Owned by the composition root and injected into views; registration is
/// idempotent and entries are never unregistered.
#[derive(Debug, Default)]
pub struct StencilCache {
    entries: HashMap<NotationType, String>,
}

impl StencilCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, notation: NotationType) -> bool {
        self.entries.contains_key(&notation)
    }

    pub fn register(&mut self, notation: NotationType, markup: String) {
        self.entries.entry(notation).or_insert(markup);
    }

    pub fn get(&self, notation: NotationType) -> Option<&str> {
        self.entries.get(&notation).map(String::as_str)
    }

    /// Register a notation's stencils from a provider, once. A provider
    /// returning nothing leaves the cache untouched; later renders of that
    /// notation simply draw without custom icon shapes.
    pub fn register_from(&mut self, provider: &dyn StencilProvider, notation: NotationType) {
        if self.has(notation) {
            return;
        }
        if let Some(markup) = provider.stencil(notation) {
            self.register(notation, markup);
        }
    }
}

type SelectionListener = Box<dyn Fn(Option<u64>)>;

/// A rendered diagram: scene graph, vertex lookup, and selection state
pub struct DiagramView {
    theme: Theme,
    stencils: StencilCache,
    scene: Scene,
    /// Shape id -> primary cell, rebuilt per draw
    created_vertices: HashMap<u64, CellId>,
    vertex_shapes: HashMap<CellId, u64>,
    /// Accumulated ancestor frame origin per shape id
    ancestor_offsets: HashMap<u64, Point>,
    canvas: Rect,
    scale: f64,
    translate: Point,
    selection_enabled: bool,
    selection: Option<CellId>,
    listeners: Vec<SelectionListener>,
}

impl DiagramView {
    pub fn new(theme: Theme, stencils: StencilCache) -> Self {
        Self {
            theme,
            stencils,
            scene: Scene::new(),
            created_vertices: HashMap::new(),
            vertex_shapes: HashMap::new(),
            ancestor_offsets: HashMap::new(),
            canvas: Rect::zero(),
            scale: 1.0,
            translate: Point::default(),
            selection_enabled: true,
            selection: None,
            listeners: Vec::new(),
        }
    }

    /// Register stencils for a notation into this view's cache, once
    pub fn register_stencils(&mut self, provider: &dyn StencilProvider, notation: NotationType) {
        self.stencils.register_from(provider, notation);
    }

    pub fn stencil_cache(&self) -> &StencilCache {
        &self.stencils
    }

    /// Render a model into this view's scene.
    ///
    /// The previous scene and vertex lookup are discarded; shapes are placed
    /// depth-first, connections afterwards so their anchors can read the
    /// already-placed shapes. The whole mutation happens inside one scene
    /// transaction.
    pub fn draw_diagram(&mut self, model: &DiagramModel) {
        self.scene = Scene::new();
        self.created_vertices.clear();
        self.vertex_shapes.clear();
        self.ancestor_offsets.clear();
        self.selection = None;
        self.canvas = Rect::new(0.0, 0.0, model.width, model.height);

        let templates = templates::for_notation(model.notation_type);
        self.scene.begin_update();

        let hierarchy = Hierarchy::build(model, true);
        let mut connection_order: Vec<usize> = Vec::new();
        let root_cell = self.scene.root();
        for &child in hierarchy.children(ROOT) {
            match hierarchy.node(child).element {
                Some(ElementRef::Shape(_)) => {
                    self.place(model, &hierarchy, child, root_cell, Point::default(), templates);
                }
                Some(ElementRef::Connection(conn_idx)) => connection_order.push(conn_idx),
                None => {}
            }
        }
        for conn_idx in connection_order {
            self.draw_connection(model, &model.connections[conn_idx], templates);
        }

        self.scene.end_update();
    }

    /// Place one shape node and its subtree.
    ///
    /// `frame` is the absolute origin of the coordinate frame the cell is
    /// inserted into; authored coordinates are absolute, so the cell rect is
    /// the authored rect rebased by the frame origin.
    fn place(
        &mut self,
        model: &DiagramModel,
        hierarchy: &Hierarchy,
        node_idx: usize,
        parent_cell: CellId,
        frame: Point,
        templates: &dyn NotationTemplates,
    ) {
        let Some(ElementRef::Shape(shape_idx)) = hierarchy.node(node_idx).element else {
            return;
        };
        let shape = &model.shapes[shape_idx];
        let Some(unit) = templates.render_shape(shape, &self.theme) else {
            log::debug!(
                "shape {} has unknown type '{}'; skipped",
                shape.id,
                shape.shape_type
            );
            // The element contributes no frame; its children render in place
            for &child in hierarchy.children(node_idx) {
                self.place(model, hierarchy, child, parent_cell, frame, templates);
            }
            return;
        };

        self.ancestor_offsets.insert(shape.id, frame);

        if unit.is_group {
            // Group composition: children keep their coordinates and the
            // library derives the group bounds from them afterwards
            let cell = self.scene.insert_vertex(
                parent_cell,
                &unit.style,
                CellGeometry::absolute(Rect::zero()),
                unit.label.clone(),
            );
            self.created_vertices.insert(shape.id, cell);
            self.vertex_shapes.insert(cell, shape.id);
            for &child in hierarchy.children(node_idx) {
                self.place(model, hierarchy, child, cell, frame, templates);
            }
            self.scene.fit_group_to_children(cell);
        } else {
            let rect = shape.rect().translate(-frame.x, -frame.y);
            let cell = self.scene.insert_vertex(
                parent_cell,
                &unit.style,
                CellGeometry::absolute(rect),
                unit.label.clone(),
            );
            self.created_vertices.insert(shape.id, cell);
            self.vertex_shapes.insert(cell, shape.id);
            for sub in &unit.children {
                self.insert_sub_unit(cell, sub);
            }
            let child_frame = Point::new(shape.x, shape.y);
            for &child in hierarchy.children(node_idx) {
                self.place(model, hierarchy, child, cell, child_frame, templates);
            }
        }
    }

    fn insert_sub_unit(&mut self, parent: CellId, sub: &SubUnit) {
        self.scene.insert_vertex(
            parent,
            &sub.style,
            CellGeometry::relative(sub.fraction, sub.offset, sub.width, sub.height),
            sub.label.clone(),
        );
    }

    /// Draw one connection into the scene root.
    ///
    /// Explicit waypoints win over computed anchors: the first point is
    /// rebased by the source shape's accumulated ancestor offset and the
    /// last by the target's. Without waypoints, anchors come from the
    /// closest-edge computation over the endpoint rectangles; an endpoint
    /// whose shape was never placed contributes nothing.
    fn draw_connection(
        &mut self,
        model: &DiagramModel,
        conn: &Connection,
        templates: &dyn NotationTemplates,
    ) {
        let unit = templates.connector(conn, &self.theme);
        let source_cell = conn.source().and_then(|id| self.created_vertices.get(&id)).copied();
        let target_cell = conn.target().and_then(|id| self.created_vertices.get(&id)).copied();

        let mut points: Vec<Point> = if !conn.points.is_empty() {
            let mut pts: Vec<Point> = conn.points.iter().map(|p| Point::new(p.x, p.y)).collect();
            if let Some(offset) = conn.source().and_then(|id| self.ancestor_offsets.get(&id)) {
                pts[0] = pts[0].offset(-offset.x, -offset.y);
            }
            if let Some(offset) = conn.target().and_then(|id| self.ancestor_offsets.get(&id)) {
                let last = pts.len() - 1;
                pts[last] = pts[last].offset(-offset.x, -offset.y);
            }
            pts
        } else {
            let source_rect = conn
                .source()
                .and_then(|id| self.shape_rect(model, id));
            let target_rect = conn
                .target()
                .and_then(|id| self.shape_rect(model, id));
            match (source_rect, target_rect) {
                (Some(s), Some(t)) => {
                    let (a, b) = closest_anchors(&s, &t);
                    vec![a, b]
                }
                (Some(s), None) => vec![s.center()],
                (None, Some(t)) => vec![t.center()],
                (None, None) => Vec::new(),
            }
        };

        if points.len() < 2 {
            log::debug!("connection {} has no resolvable endpoints; skipped", conn.id);
            return;
        }

        match unit.routing {
            EdgeRouting::Straight => {
                if points.len() >= 2 {
                    let first = points[0];
                    let last = points[points.len() - 1];
                    points = vec![first, last];
                    if first == last {
                        points[1] = first
                            .offset(DEGENERATE_SEGMENT_NUDGE, DEGENERATE_SEGMENT_NUDGE);
                    }
                }
            }
            EdgeRouting::Curved => {
                if points.len() >= 2 {
                    let first = points[0];
                    let last = points[points.len() - 1];
                    let mid_x = (first.x + last.x) / 2.0;
                    points = vec![
                        first,
                        Point::new(mid_x, first.y),
                        Point::new(mid_x, last.y),
                        last,
                    ];
                }
            }
            // Right-angled paths pass explicit intermediate points verbatim
            EdgeRouting::RightAngled => {}
        }

        let root = self.scene.root();
        let edge = self.scene.insert_edge(
            root,
            &unit.style,
            points.clone(),
            conn.label.clone(),
            source_cell,
            target_cell,
        );
        self.insert_endpoint_label(edge, conn.source_label.as_deref(), points.first());
        self.insert_endpoint_label(edge, conn.target_label.as_deref(), points.last());
    }

    fn insert_endpoint_label(&mut self, edge: CellId, label: Option<&str>, at: Option<&Point>) {
        let (Some(text), Some(point)) = (label, at) else {
            return;
        };
        let style = Style::new()
            .with("shape", "text")
            .with("fontColor", self.theme.resolve("label-color"));
        self.scene.insert_vertex(
            edge,
            &style,
            CellGeometry::absolute(Rect::new(point.x, point.y, 0.0, 0.0)),
            Some(text.to_string()),
        );
    }

    /// Absolute rectangle of a placed shape, for anchor computation
    fn shape_rect(&self, model: &DiagramModel, shape_id: u64) -> Option<Rect> {
        self.created_vertices.get(&shape_id)?;
        model
            .shapes
            .iter()
            .find(|s| s.id == shape_id)
            .map(Shape::rect)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    /// Export the current scene as a standalone SVG document
    pub fn to_svg(&self) -> String {
        crate::svg::scene_to_svg(&self.scene, self.canvas)
    }

    /// Cell created for a shape id in the last draw, if any
    pub fn vertex_for(&self, shape_id: u64) -> Option<CellId> {
        self.created_vertices.get(&shape_id).copied()
    }

    // --- selection model ---

    /// Register a listener; listeners fire in registration order with the
    /// most recently selected shape id (or `None` on clear).
    pub fn add_selection_listener(&mut self, listener: impl Fn(Option<u64>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Entry point for external pick interaction on a primitive.
    ///
    /// The picked cell ascends to the nearest ancestor styled as a group;
    /// the walk short-circuits at the lowest common ancestor with the
    /// previous selection, so picking inside an already-selected boundary
    /// does not re-ascend past it.
    pub fn select_cell(&mut self, picked: CellId) {
        if !self.selection_enabled || picked >= self.scene.len() {
            return;
        }
        let target = self.ascend_selection(picked);
        self.selection = Some(target);
        self.notify();
    }

    fn ascend_selection(&self, picked: CellId) -> CellId {
        let previous_chain: HashSet<CellId> = match self.selection {
            Some(prev) => self.scene.ancestors(prev).chain(std::iter::once(prev)).collect(),
            None => HashSet::new(),
        };
        for ancestor in self.scene.ancestors(picked) {
            if previous_chain.contains(&ancestor) {
                break;
            }
            if self.scene.cell(ancestor).style().get("group") == Some("1") {
                return ancestor;
            }
        }
        picked
    }

    /// Select by shape id; unknown ids clear the selection
    pub fn set_selected_item(&mut self, shape_id: u64) {
        match self.created_vertices.get(&shape_id) {
            Some(&cell) => {
                self.selection = Some(cell);
                self.notify();
            }
            None => self.clear_selection(),
        }
    }

    /// Single-selection model: the first resolvable id wins
    pub fn set_selected_items(&mut self, shape_ids: &[u64]) {
        let first = shape_ids
            .iter()
            .find_map(|id| self.created_vertices.get(id).copied());
        match first {
            Some(cell) => {
                self.selection = Some(cell);
                self.notify();
            }
            None => self.clear_selection(),
        }
    }

    pub fn get_selected_items(&self) -> Vec<u64> {
        self.selection
            .and_then(|cell| self.vertex_shapes.get(&cell).copied())
            .into_iter()
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.notify();
    }

    fn notify(&self) {
        let selected = self
            .selection
            .and_then(|cell| self.vertex_shapes.get(&cell).copied());
        for listener in &self.listeners {
            listener(selected);
        }
    }

    // --- viewport ---

    /// Scale the viewport so the given rectangle fills the canvas
    pub fn zoom_to_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.scale = (self.canvas.width / width).min(self.canvas.height / height);
        self.translate = Point::new(-x, -y);
    }

    pub fn graph_scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> Point {
        self.translate
    }

    pub fn disable_user_selection(&mut self, disabled: bool) {
        self.selection_enabled = !disabled;
    }

    /// Tear the view down: scene, lookups, listeners, selection
    pub fn destroy(&mut self) {
        self.scene = Scene::new();
        self.created_vertices.clear();
        self.vertex_shapes.clear();
        self.ancestor_offsets.clear();
        self.selection = None;
        self.listeners.clear();
        self.scale = 1.0;
        self.translate = Point::default();
    }
}
