//! Scene graph forest
//!
//! An arena-backed ownership tree: the arena owns every node, the root list
//! and per-node child lists define the forest shape, and parent
//! back-references are arena keys rather than owning handles. Nodes are
//! attached once at creation and never re-parented, so ownership stays
//! strictly top-down and cycles cannot be constructed.

use crate::foundation::math::Transform;
use crate::scene::object::SceneObject;
use crate::scene::SceneError;
use slotmap::{new_key_type, SlotMap};
use std::sync::Arc;

new_key_type! {
    /// Stable handle to a node in the scene graph arena
    pub struct NodeKey;
}

/// A single node of the scene graph
///
/// Holds an optional shared object payload, the local transform relative to
/// the parent, and the cached world transform. A node without an object is a
/// pure grouping node: it composes transforms but is never rendered.
pub struct SceneNode {
    object: Option<Arc<dyn SceneObject>>,
    children: Vec<NodeKey>,
    parent: Option<NodeKey>,
    local: Transform,
    world: Transform,
}

impl SceneNode {
    /// The object payload, if this node carries one
    pub fn object(&self) -> Option<&Arc<dyn SceneObject>> {
        self.object.as_ref()
    }

    /// Transform relative to the parent
    pub fn local_transform(&self) -> &Transform {
        &self.local
    }

    /// Cached transform in root coordinate space
    ///
    /// Always current: every mutating graph operation recomputes the
    /// affected subtree before returning.
    pub fn world_transform(&self) -> &Transform {
        &self.world
    }

    /// Child keys in insertion order (the rendering and persistence order)
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// The parent key, or `None` for a root
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }
}

/// Ordered forest of scene nodes
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    roots: Vec<NodeKey>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create an empty forest
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
        }
    }

    /// Append a new root node
    pub fn add_root(&mut self, object: Option<Arc<dyn SceneObject>>, local: Transform) -> NodeKey {
        let world = local.clone();
        let key = self.nodes.insert(SceneNode {
            object,
            children: Vec::new(),
            parent: None,
            local,
            world,
        });
        self.roots.push(key);
        key
    }

    /// Create a new node and attach it as the last child of `parent`
    ///
    /// The new subtree's world transforms are current when this returns.
    /// Fails with `InvalidOperation` if the parent key is stale.
    pub fn add_child(
        &mut self,
        parent: NodeKey,
        object: Option<Arc<dyn SceneObject>>,
        local: Transform,
    ) -> Result<NodeKey, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::InvalidOperation(
                "parent node no longer exists".to_string(),
            ));
        }
        let world = local.clone();
        let key = self.nodes.insert(SceneNode {
            object,
            children: Vec::new(),
            parent: Some(parent),
            local,
            world,
        });
        self.nodes[parent].children.push(key);
        self.refresh_world_transforms(key);
        Ok(key)
    }

    /// Replace a node's local transform and recompute world transforms for
    /// its whole subtree before returning
    pub fn set_local_transform(&mut self, key: NodeKey, local: Transform) -> Result<(), SceneError> {
        let node = self
            .nodes
            .get_mut(key)
            .ok_or_else(|| SceneError::InvalidOperation("node no longer exists".to_string()))?;
        node.local = local;
        self.refresh_world_transforms(key);
        Ok(())
    }

    /// Remove the child at `index` under `parent`, releasing its subtree
    ///
    /// Out-of-range indices are an error; the tree is left untouched.
    pub fn remove_child(&mut self, parent: NodeKey, index: usize) -> Result<(), SceneError> {
        let count = self
            .nodes
            .get(parent)
            .ok_or_else(|| SceneError::InvalidOperation("parent node no longer exists".to_string()))?
            .children
            .len();
        if index >= count {
            return Err(SceneError::IndexOutOfRange { index, count });
        }
        let child = self.nodes[parent].children.remove(index);
        self.release_subtree(child);
        Ok(())
    }

    /// Remove the root at `index`, releasing its subtree
    pub fn remove_root(&mut self, index: usize) -> Result<(), SceneError> {
        let count = self.roots.len();
        if index >= count {
            return Err(SceneError::IndexOutOfRange { index, count });
        }
        let root = self.roots.remove(index);
        self.release_subtree(root);
        Ok(())
    }

    /// Remove a node and its subtree wherever it sits in the forest
    pub fn remove_node(&mut self, key: NodeKey) -> Result<(), SceneError> {
        let parent = self
            .nodes
            .get(key)
            .ok_or_else(|| SceneError::InvalidOperation("node no longer exists".to_string()))?
            .parent;
        match parent {
            Some(parent) => {
                let index = self.nodes[parent]
                    .children
                    .iter()
                    .position(|&child| child == key)
                    .ok_or_else(|| {
                        SceneError::InvalidOperation("node detached from its parent".to_string())
                    })?;
                self.nodes[parent].children.remove(index);
            }
            None => {
                let index = self
                    .roots
                    .iter()
                    .position(|&root| root == key)
                    .ok_or_else(|| {
                        SceneError::InvalidOperation("root missing from the root list".to_string())
                    })?;
                self.roots.remove(index);
            }
        }
        self.release_subtree(key);
        Ok(())
    }

    /// Look up a node by key
    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Root keys in insertion order
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Key of the child at `index` under `parent`
    pub fn child(&self, parent: NodeKey, index: usize) -> Option<NodeKey> {
        self.nodes.get(parent)?.children.get(index).copied()
    }

    /// Number of direct children under `parent` (0 for stale keys)
    pub fn child_count(&self, parent: NodeKey) -> usize {
        self.nodes.get(parent).map_or(0, SceneNode::child_count)
    }

    /// The parent of a node, or `None` for roots and stale keys
    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key)?.parent
    }

    /// Total number of nodes in the forest
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the forest holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Release every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }

    /// Visit every node in preorder: parents before children, siblings in
    /// insertion order
    pub fn visit_preorder<F>(&self, mut visit: F)
    where
        F: FnMut(NodeKey, &SceneNode),
    {
        let mut pending: Vec<NodeKey> = self.roots.iter().rev().copied().collect();
        while let Some(key) = pending.pop() {
            let node = &self.nodes[key];
            visit(key, node);
            pending.extend(node.children.iter().rev().copied());
        }
    }

    /// Recompute world transforms for the subtree rooted at `start`
    ///
    /// Parents are visited before children so every node composes against an
    /// already-current parent world transform.
    fn refresh_world_transforms(&mut self, start: NodeKey) {
        let mut pending = vec![start];
        while let Some(key) = pending.pop() {
            let parent_world = self.nodes[key]
                .parent
                .map(|parent| self.nodes[parent].world.clone());
            let node = &mut self.nodes[key];
            node.world = match parent_world {
                Some(parent) => parent.combine(&node.local),
                None => node.local.clone(),
            };
            pending.extend(node.children.iter().copied());
        }
    }

    /// Drop a detached subtree from the arena
    fn release_subtree(&mut self, start: NodeKey) {
        let mut pending = vec![start];
        while let Some(key) = pending.pop() {
            if let Some(node) = self.nodes.remove(key) {
                pending.extend(node.children);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::object::Teapot;

    fn teapot() -> Option<Arc<dyn SceneObject>> {
        Some(Arc::new(Teapot::new("Teapot", None)))
    }

    #[test]
    fn test_root_world_equals_local() {
        let mut graph = SceneGraph::new();
        let local = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let root = graph.add_root(None, local.clone());

        assert_eq!(graph.node(root).unwrap().world_transform(), &local);
    }

    #[test]
    fn test_child_world_composes_parent() {
        let mut graph = SceneGraph::new();
        let parent = graph.add_root(
            None,
            Transform::new(
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::zeros(),
                Vec3::new(2.0, 2.0, 2.0),
            ),
        );
        let child = graph
            .add_child(
                parent,
                None,
                Transform::new(
                    Vec3::new(0.5, 0.0, 0.0),
                    Vec3::zeros(),
                    Vec3::new(2.0, 2.0, 2.0),
                ),
            )
            .unwrap();

        let world = graph.node(child).unwrap().world_transform().clone();
        assert_eq!(world.position, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(world.scale, Vec3::new(4.0, 4.0, 4.0));
    }

    #[test]
    fn test_set_local_transform_propagates_to_descendants() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(None, Transform::identity());
        let child = graph
            .add_child(root, None, Transform::from_position(Vec3::new(0.0, 1.0, 0.0)))
            .unwrap();
        let grandchild = graph
            .add_child(child, None, Transform::from_position(Vec3::new(0.0, 0.0, 1.0)))
            .unwrap();

        graph
            .set_local_transform(root, Transform::from_position(Vec3::new(5.0, 0.0, 0.0)))
            .unwrap();

        // The invariant holds at every level immediately after the call.
        let child_world = graph.node(child).unwrap().world_transform().clone();
        assert_eq!(child_world.position, Vec3::new(5.0, 1.0, 0.0));
        let grandchild_world = graph.node(grandchild).unwrap().world_transform().clone();
        assert_eq!(grandchild_world.position, Vec3::new(5.0, 1.0, 1.0));
    }

    #[test]
    fn test_preorder_respects_insertion_order() {
        let mut graph = SceneGraph::new();
        let a = graph.add_root(None, Transform::identity());
        let a1 = graph.add_child(a, None, Transform::identity()).unwrap();
        let a2 = graph.add_child(a, None, Transform::identity()).unwrap();
        let b = graph.add_root(None, Transform::identity());

        let mut order = Vec::new();
        graph.visit_preorder(|key, _| order.push(key));
        assert_eq!(order, vec![a, a1, a2, b]);
    }

    #[test]
    fn test_remove_child_releases_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(None, Transform::identity());
        let child = graph.add_child(root, teapot(), Transform::identity()).unwrap();
        graph.add_child(child, teapot(), Transform::identity()).unwrap();
        assert_eq!(graph.node_count(), 3);

        graph.remove_child(root, 0).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.child_count(root), 0);
    }

    #[test]
    fn test_remove_child_out_of_range_leaves_tree_untouched() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(None, Transform::identity());
        graph.add_child(root, teapot(), Transform::identity()).unwrap();

        let result = graph.remove_child(root, 5);
        assert!(matches!(
            result,
            Err(SceneError::IndexOutOfRange { index: 5, count: 1 })
        ));
        assert_eq!(graph.child_count(root), 1);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_remove_node_by_key() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(None, Transform::identity());
        let child = graph.add_child(root, teapot(), Transform::identity()).unwrap();

        graph.remove_node(child).unwrap();
        assert_eq!(graph.node_count(), 1);

        // A second removal through the now-stale key is rejected.
        assert!(graph.remove_node(child).is_err());

        graph.remove_node(root).unwrap();
        assert!(graph.is_empty());
        assert!(graph.roots().is_empty());
    }

    #[test]
    fn test_parent_child_links_are_consistent() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(None, Transform::identity());
        let child = graph.add_child(root, None, Transform::identity()).unwrap();

        assert_eq!(graph.parent(child), Some(root));
        assert_eq!(graph.child(root, 0), Some(child));
        assert_eq!(graph.parent(root), None);
    }
}
