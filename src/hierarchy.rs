//! Hierarchy construction: flat shape/connection lists into a rooted tree
//!
//! Nodes live in an arena and address each other by index, so ancestor
//! walks never need owning back-references. The tree is rebuilt for every
//! render pass and discarded afterwards.

use std::collections::HashMap;

use crate::model::DiagramModel;

/// Which model element a hierarchy node decorates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRef {
    /// Index into `model.shapes`
    Shape(usize),
    /// Index into `model.connections`
    Connection(usize),
}

/// A node in the hierarchy arena
#[derive(Debug)]
pub struct HierarchyNode {
    /// `None` only for the synthetic root
    pub element: Option<ElementRef>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// Rooted element tree for one render pass
#[derive(Debug)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
}

/// Index of the synthetic root node
pub const ROOT: usize = 0;

impl Hierarchy {
    /// Build the tree from a flat model.
    ///
    /// Shapes resolve their parent through `parentId`; an id that matches no
    /// shape in the model makes the element a root child. Connections always
    /// attach to the synthetic root: they route between shapes rather than
    /// living inside a shape subtree. Sibling order follows `zIndex`, stable
    /// over input order.
    ///
    /// Nodes on a `parentId` cycle lose their parent link: they stay in the
    /// arena but are unreachable from the root, so renders skip them and
    /// ancestor walks starting anywhere terminate.
    pub fn build(model: &DiagramModel, include_connections: bool) -> Self {
        let mut nodes = vec![HierarchyNode {
            element: None,
            parent: None,
            children: Vec::new(),
        }];

        // Shape id -> arena index, for parent resolution
        let mut by_id: HashMap<u64, usize> = HashMap::with_capacity(model.shapes.len());
        for (shape_idx, shape) in model.shapes.iter().enumerate() {
            let node_idx = nodes.len();
            nodes.push(HierarchyNode {
                element: Some(ElementRef::Shape(shape_idx)),
                parent: None,
                children: Vec::new(),
            });
            by_id.insert(shape.id, node_idx);
        }

        for (shape_idx, shape) in model.shapes.iter().enumerate() {
            let node_idx = shape_idx + 1;
            let parent_idx = shape
                .parent()
                .and_then(|pid| by_id.get(&pid).copied())
                .unwrap_or(ROOT);
            nodes[node_idx].parent = Some(parent_idx);
        }
        break_cycles(&mut nodes, model);
        for node_idx in 1..=model.shapes.len() {
            if let Some(parent_idx) = nodes[node_idx].parent {
                nodes[parent_idx].children.push(node_idx);
            }
        }

        if include_connections {
            for conn_idx in 0..model.connections.len() {
                let node_idx = nodes.len();
                nodes.push(HierarchyNode {
                    element: Some(ElementRef::Connection(conn_idx)),
                    parent: Some(ROOT),
                    children: Vec::new(),
                });
                nodes[ROOT].children.push(node_idx);
            }
        }

        let mut hierarchy = Hierarchy { nodes };
        hierarchy.sort_siblings(model);
        hierarchy
    }

    /// Stable sort of every child list by z-index; input order breaks ties
    fn sort_siblings(&mut self, model: &DiagramModel) {
        let z_of = |element: Option<ElementRef>| match element {
            Some(ElementRef::Shape(i)) => model.shapes[i].z_index,
            Some(ElementRef::Connection(i)) => model.connections[i].z_index,
            None => 0,
        };
        let keys: Vec<i32> = self.nodes.iter().map(|n| z_of(n.element)).collect();
        for node in &mut self.nodes {
            node.children.sort_by_key(|&child| keys[child]);
        }
    }

    pub fn node(&self, idx: usize) -> &HierarchyNode {
        &self.nodes[idx]
    }

    pub fn children(&self, idx: usize) -> &[usize] {
        &self.nodes[idx].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Walk from a node up to (but not including) the root
    pub fn ancestors(&self, idx: usize) -> Ancestors<'_> {
        Ancestors {
            hierarchy: self,
            current: self.nodes[idx].parent,
        }
    }
}

/// Iterator over ancestor indices, nearest first
pub struct Ancestors<'a> {
    hierarchy: &'a Hierarchy,
    current: Option<usize>,
}

/// Clear the parent link of every node lying on a `parentId` cycle.
///
/// Chains hanging off a cycle keep their links; they end at the broken
/// member instead of looping. Covers self-referential parents too.
fn break_cycles(nodes: &mut [HierarchyNode], model: &DiagramModel) {
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;
    let mut state = vec![0u8; nodes.len()];
    state[ROOT] = DONE;

    for start in 1..nodes.len() {
        if state[start] != 0 {
            continue;
        }
        let mut path = Vec::new();
        let mut cur = start;
        loop {
            state[cur] = ON_PATH;
            path.push(cur);
            let Some(parent) = nodes[cur].parent else {
                break;
            };
            match state[parent] {
                ON_PATH => {
                    let from = path.iter().position(|&n| n == parent).unwrap_or(0);
                    for &member in &path[from..] {
                        nodes[member].parent = None;
                        log::debug!(
                            "shape {} is on a parentId cycle; dropped from render",
                            model.shapes[member - 1].id
                        );
                    }
                    break;
                }
                DONE => break,
                _ => cur = parent,
            }
        }
        for n in path {
            state[n] = DONE;
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let idx = self.current?;
        if idx == ROOT {
            return None;
        }
        self.current = self.hierarchy.nodes[idx].parent;
        Some(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiagramModel, NotationType};

    fn model_with_shapes(specs: &[(u64, u64, i32)]) -> DiagramModel {
        let shapes = specs
            .iter()
            .map(|&(id, parent_id, z_index)| {
                serde_json::from_value(serde_json::json!({
                    "id": id,
                    "parentId": parent_id,
                    "type": "Rectangle",
                    "zIndex": z_index
                }))
                .expect("shape json")
            })
            .collect();
        DiagramModel {
            id: 1,
            notation_type: NotationType::Generic,
            width: 800.0,
            height: 600.0,
            shapes,
            connections: vec![],
        }
    }

    fn shape_ids(h: &Hierarchy, model: &DiagramModel, parent: usize) -> Vec<u64> {
        h.children(parent)
            .iter()
            .filter_map(|&c| match h.node(c).element {
                Some(ElementRef::Shape(i)) => Some(model.shapes[i].id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_nesting_resolves_to_parent() {
        let model = model_with_shapes(&[(1, 0, 0), (2, 1, 0), (3, 2, 0)]);
        let h = Hierarchy::build(&model, false);
        assert_eq!(shape_ids(&h, &model, ROOT), vec![1]);
        let n1 = h.children(ROOT)[0];
        assert_eq!(shape_ids(&h, &model, n1), vec![2]);
    }

    #[test]
    fn test_orphaned_parent_goes_to_root() {
        let model = model_with_shapes(&[(1, 99, 0), (2, 0, 0)]);
        let h = Hierarchy::build(&model, false);
        assert_eq!(shape_ids(&h, &model, ROOT), vec![1, 2]);
    }

    #[test]
    fn test_sibling_order_stable_by_z_index() {
        // Same z keeps input order; higher z sorts later
        let model = model_with_shapes(&[(1, 0, 5), (2, 0, 0), (3, 0, 0), (4, 0, 5)]);
        let h = Hierarchy::build(&model, false);
        assert_eq!(shape_ids(&h, &model, ROOT), vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_cycle_is_unreachable_from_root() {
        // 2 and 3 reference each other; 1 stays at root
        let model = model_with_shapes(&[(1, 0, 0), (2, 3, 0), (3, 2, 0)]);
        let h = Hierarchy::build(&model, false);
        assert_eq!(shape_ids(&h, &model, ROOT), vec![1]);

        // The cyclic nodes exist but no walk from the root reaches them
        let mut reachable = vec![ROOT];
        let mut cursor = 0;
        while cursor < reachable.len() {
            reachable.extend_from_slice(h.children(reachable[cursor]));
            cursor += 1;
        }
        assert_eq!(reachable.len(), 2); // root + shape 1
    }

    #[test]
    fn test_connections_attach_to_root() {
        let mut model = model_with_shapes(&[(1, 0, 0), (2, 1, 0)]);
        model.connections = vec![serde_json::from_value(serde_json::json!({
            "id": 10, "sourceId": 1, "targetId": 2
        }))
        .expect("connection json")];

        let without = Hierarchy::build(&model, false);
        assert_eq!(without.children(ROOT).len(), 1);

        let with = Hierarchy::build(&model, true);
        assert_eq!(with.children(ROOT).len(), 2);
        let conn_node = with.children(ROOT)[1];
        assert_eq!(
            with.node(conn_node).element,
            Some(ElementRef::Connection(0))
        );
    }

    #[test]
    fn test_ancestors_terminates_inside_cycle() {
        // 2 and 3 reference each other; both lose their parent link
        let model = model_with_shapes(&[(1, 0, 0), (2, 3, 0), (3, 2, 0)]);
        let h = Hierarchy::build(&model, false);
        // Arena index is input position + 1
        let chain: Vec<usize> = h.ancestors(2).take(h.len() + 1).collect();
        assert!(chain.is_empty(), "cycle member walked {chain:?}");
        let chain: Vec<usize> = h.ancestors(3).take(h.len() + 1).collect();
        assert!(chain.is_empty(), "cycle member walked {chain:?}");
    }

    #[test]
    fn test_ancestors_terminates_hanging_off_cycle() {
        // 4 parents into the 2<->3 cycle without being on it
        let model = model_with_shapes(&[(1, 0, 0), (2, 3, 0), (3, 2, 0), (4, 2, 0)]);
        let h = Hierarchy::build(&model, false);
        let chain: Vec<usize> = h.ancestors(4).take(h.len() + 1).collect();
        assert_eq!(chain, vec![2]);
        // Still unreachable from the root
        let mut reachable = vec![ROOT];
        let mut cursor = 0;
        while cursor < reachable.len() {
            reachable.extend_from_slice(h.children(reachable[cursor]));
            cursor += 1;
        }
        assert_eq!(reachable.len(), 2); // root + shape 1
    }

    #[test]
    fn test_self_parent_is_broken() {
        let model = model_with_shapes(&[(1, 1, 0), (2, 0, 0)]);
        let h = Hierarchy::build(&model, false);
        assert_eq!(shape_ids(&h, &model, ROOT), vec![2]);
        assert!(h.ancestors(1).take(h.len() + 1).next().is_none());
    }

    #[test]
    fn test_ancestors_iterator() {
        let model = model_with_shapes(&[(1, 0, 0), (2, 1, 0), (3, 2, 0)]);
        let h = Hierarchy::build(&model, false);
        let n1 = h.children(ROOT)[0];
        let n2 = h.children(n1)[0];
        let n3 = h.children(n2)[0];
        let chain: Vec<usize> = h.ancestors(n3).collect();
        assert_eq!(chain, vec![n2, n1]);
    }
}
