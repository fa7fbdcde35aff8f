//! Scene tree arena and traversal algorithms
//!
//! Nodes are stored in a slotmap arena and refer to each other by
//! [`NodeKey`]. Parent links are plain keys, so the tree has no ownership
//! cycles and subtrees can be cloned or re-parented by rewriting keys.

use crate::foundation::math::{Mat4, MatrixStack};
use crate::render::{Light, Material, RenderError, ScenegraphRenderer};
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

new_key_type! {
    /// Arena key addressing a node in a [`SceneTree`]
    pub struct NodeKey;
}

/// Errors from scene tree and container operations
#[derive(Error, Debug)]
pub enum SceneError {
    /// An operation was applied to a node kind that does not support it
    #[error("node '{node}' does not support {operation}")]
    InvalidOperation {
        /// Name of the offending node
        node: String,
        /// The operation attempted
        operation: &'static str,
    },

    /// A transform node already has its single child
    #[error("transform node '{0}' already has a child")]
    ChildSlotOccupied(String),

    /// The child is already attached elsewhere in a tree
    #[error("node '{0}' already has a parent")]
    AlreadyAttached(String),

    /// No node with the given name exists
    #[error("no node named '{0}'")]
    NodeNotFound(String),

    /// A key referred to a node that was removed from the arena
    #[error("stale node key")]
    StaleKey,

    /// Renderer contract failure during traversal
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// The three node kinds of the scene graph
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Fans out to any number of children
    Group {
        /// Children in attachment order
        children: Vec<NodeKey>,
    },
    /// Applies a matrix to exactly one child
    Transform {
        /// The single child, if attached
        child: Option<NodeKey>,
        /// Static transform set at build time
        transform: Mat4,
        /// Animation transform, rewritten every frame
        animation: Mat4,
    },
    /// References a mesh instance with appearance data
    Leaf {
        /// Name of the mesh in the container's registry
        instance_of: String,
        /// Surface material
        material: Material,
        /// Texture name, or `None` for the default texture
        texture: Option<String>,
    },
}

/// One node of the scene tree
#[derive(Debug, Clone)]
pub struct Node {
    /// Node name, unique within a scene by builder convention
    pub name: String,
    /// Parent key, `None` for a root or detached node
    pub parent: Option<NodeKey>,
    /// Lights attached to this node, in its local coordinates
    pub lights: Vec<Light>,
    /// Kind-specific data
    pub kind: NodeKind,
}

/// Arena of scene nodes plus the traversal algorithms over them
#[derive(Debug, Clone, Default)]
pub struct SceneTree {
    nodes: SlotMap<NodeKey, Node>,
}

impl SceneTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a detached group node
    pub fn insert_group(&mut self, name: &str) -> NodeKey {
        self.insert(name, NodeKind::Group { children: Vec::new() })
    }

    /// Insert a detached transform node with identity matrices
    pub fn insert_transform(&mut self, name: &str) -> NodeKey {
        self.insert(
            name,
            NodeKind::Transform {
                child: None,
                transform: Mat4::identity(),
                animation: Mat4::identity(),
            },
        )
    }

    /// Insert a detached leaf node referencing a mesh by name
    pub fn insert_leaf(&mut self, name: &str, instance_of: &str) -> NodeKey {
        self.insert(
            name,
            NodeKind::Leaf {
                instance_of: instance_of.to_string(),
                material: Material::new(),
                texture: None,
            },
        )
    }

    fn insert(&mut self, name: &str, kind: NodeKind) -> NodeKey {
        self.nodes.insert(Node {
            name: name.to_string(),
            parent: None,
            lights: Vec::new(),
            kind,
        })
    }

    /// Borrow a node
    pub fn get(&self, key: NodeKey) -> Result<&Node, SceneError> {
        self.nodes.get(key).ok_or(SceneError::StaleKey)
    }

    /// Borrow a node mutably
    pub fn get_mut(&mut self, key: NodeKey) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(key).ok_or(SceneError::StaleKey)
    }

    /// Node name
    pub fn name(&self, key: NodeKey) -> Result<&str, SceneError> {
        Ok(&self.get(key)?.name)
    }

    /// Rename a node
    pub fn set_name(&mut self, key: NodeKey, name: &str) -> Result<(), SceneError> {
        self.get_mut(key)?.name = name.to_string();
        Ok(())
    }

    /// Attach `child` under `parent`.
    ///
    /// Groups take any number of children; a transform takes exactly one
    /// and a second attach fails with [`SceneError::ChildSlotOccupied`].
    /// Leaves take none. A child that already has a parent is rejected.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), SceneError> {
        if self.get(child)?.parent.is_some() {
            return Err(SceneError::AlreadyAttached(self.get(child)?.name.clone()));
        }

        let parent_node = self.get_mut(parent)?;
        match &mut parent_node.kind {
            NodeKind::Group { children } => children.push(child),
            NodeKind::Transform { child: slot, .. } => {
                if slot.is_some() {
                    return Err(SceneError::ChildSlotOccupied(parent_node.name.clone()));
                }
                *slot = Some(child);
            }
            NodeKind::Leaf { .. } => {
                return Err(SceneError::InvalidOperation {
                    node: parent_node.name.clone(),
                    operation: "children",
                });
            }
        }

        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Children of a node, in traversal order
    pub fn children(&self, key: NodeKey) -> Result<Vec<NodeKey>, SceneError> {
        Ok(match &self.get(key)?.kind {
            NodeKind::Group { children } => children.clone(),
            NodeKind::Transform { child, .. } => child.iter().copied().collect(),
            NodeKind::Leaf { .. } => Vec::new(),
        })
    }

    /// Set the static transform of a transform node
    pub fn set_transform(&mut self, key: NodeKey, m: Mat4) -> Result<(), SceneError> {
        let node = self.get_mut(key)?;
        match &mut node.kind {
            NodeKind::Transform { transform, .. } => {
                *transform = m;
                Ok(())
            }
            _ => Err(SceneError::InvalidOperation {
                node: node.name.clone(),
                operation: "set_transform",
            }),
        }
    }

    /// Set the animation transform of a transform node
    pub fn set_animation_transform(&mut self, key: NodeKey, m: Mat4) -> Result<(), SceneError> {
        let node = self.get_mut(key)?;
        match &mut node.kind {
            NodeKind::Transform { animation, .. } => {
                *animation = m;
                Ok(())
            }
            _ => Err(SceneError::InvalidOperation {
                node: node.name.clone(),
                operation: "set_animation_transform",
            }),
        }
    }

    /// Set the material of a leaf node
    pub fn set_material(&mut self, key: NodeKey, material: Material) -> Result<(), SceneError> {
        let node = self.get_mut(key)?;
        match &mut node.kind {
            NodeKind::Leaf { material: slot, .. } => {
                *slot = material;
                Ok(())
            }
            _ => Err(SceneError::InvalidOperation {
                node: node.name.clone(),
                operation: "set_material",
            }),
        }
    }

    /// Set the texture name of a leaf node
    pub fn set_texture(&mut self, key: NodeKey, texture: &str) -> Result<(), SceneError> {
        let node = self.get_mut(key)?;
        match &mut node.kind {
            NodeKind::Leaf { texture: slot, .. } => {
                *slot = Some(texture.to_string());
                Ok(())
            }
            _ => Err(SceneError::InvalidOperation {
                node: node.name.clone(),
                operation: "set_texture",
            }),
        }
    }

    /// Attach a light to any node, in the node's local coordinates
    pub fn add_light(&mut self, key: NodeKey, light: Light) -> Result<(), SceneError> {
        self.get_mut(key)?.lights.push(light);
        Ok(())
    }

    /// Find a node by name in the subtree under `from`, pre-order
    pub fn find_by_name(&self, from: NodeKey, name: &str) -> Option<NodeKey> {
        let mut worklist = vec![from];
        while let Some(key) = worklist.pop() {
            let node = self.nodes.get(key)?;
            if node.name == name {
                return Some(key);
            }
            let children = self.children(key).ok()?;
            worklist.extend(children.iter().rev());
        }
        None
    }

    /// All keys in the subtree under `from`, pre-order
    pub fn subtree_keys(&self, from: NodeKey) -> Vec<NodeKey> {
        let mut keys = Vec::new();
        let mut worklist = vec![from];
        while let Some(key) = worklist.pop() {
            if self.nodes.get(key).is_none() {
                continue;
            }
            keys.push(key);
            if let Ok(children) = self.children(key) {
                worklist.extend(children.iter().rev());
            }
        }
        keys
    }

    /// Deep-copy the subtree rooted at `from`. The copy's root is detached
    /// (no parent) and carries the same name as the original.
    pub fn clone_subtree(&mut self, from: NodeKey) -> Result<NodeKey, SceneError> {
        let source = self.get(from)?.clone();
        let copy = self.nodes.insert(Node {
            parent: None,
            ..source
        });

        // Children in the cloned kind still point at the originals; rebuild
        // them by cloning each child and re-linking.
        let child_keys = self.children(from)?;
        match &mut self.get_mut(copy)?.kind {
            NodeKind::Group { children } => children.clear(),
            NodeKind::Transform { child, .. } => *child = None,
            NodeKind::Leaf { .. } => {}
        }
        for child in child_keys {
            let child_copy = self.clone_subtree(child)?;
            self.add_child(copy, child_copy)?;
        }
        Ok(copy)
    }

    /// The modelview matrix mapping `key`'s local space to view space.
    ///
    /// Walks parent links to the root, accumulating each ancestor transform
    /// node's `animation * transform` on the left. The root node's own
    /// matrices are not applied; a root transform positions its child, not
    /// itself. The result is `world_to_view * accumulated`.
    pub fn object_to_view_transform(
        &self,
        key: NodeKey,
        world_to_view: &Mat4,
    ) -> Result<Mat4, SceneError> {
        let mut acc = Mat4::identity();
        let mut current = key;
        loop {
            let node = self.get(current)?;
            let Some(parent) = node.parent else {
                return Ok(world_to_view * acc);
            };
            if let NodeKind::Transform { transform, animation, .. } = &node.kind {
                acc = animation * transform * acc;
            }
            current = parent;
        }
    }

    /// Draw the subtree under `root`, issuing one renderer call per leaf.
    ///
    /// The stack top on entry is the modelview for `root`'s coordinate
    /// space; the stack is restored to its entry depth before returning.
    pub fn draw(
        &self,
        root: NodeKey,
        renderer: &mut dyn ScenegraphRenderer,
        stack: &mut MatrixStack,
    ) -> Result<(), SceneError> {
        let node = self.get(root)?;
        match &node.kind {
            NodeKind::Group { children } => {
                for &child in children {
                    self.draw(child, renderer, stack)?;
                }
            }
            NodeKind::Transform { child, transform, animation } => {
                stack.push_duplicate();
                stack.multiply_top(animation);
                stack.multiply_top(transform);
                // pop before propagating so the stack is balanced even
                // when a descendant fails
                let result = match child {
                    Some(child) => self.draw(*child, renderer, stack),
                    None => Ok(()),
                };
                stack.pop();
                result?;
            }
            NodeKind::Leaf { instance_of, material, texture } => {
                renderer.draw_mesh(instance_of, material, &stack.top(), texture.as_deref())?;
            }
        }
        Ok(())
    }

    /// Collect every light in the subtree under `root`, transformed into
    /// view space.
    ///
    /// Iterative pre-order traversal: the worklist is a stack and each
    /// node's children are pushed in reverse, so lights come out in the
    /// order a recursive left-to-right walk would visit them. A transform
    /// node's matrix applies to its own lights as well as its child's,
    /// except at a parentless node, whose matrices are excluded exactly as
    /// [`object_to_view_transform`](Self::object_to_view_transform)
    /// excludes them.
    pub fn collect_lights(
        &self,
        root: NodeKey,
        world_to_view: &Mat4,
    ) -> Result<Vec<Light>, SceneError> {
        let mut collected = Vec::new();
        let mut worklist = vec![(root, *world_to_view)];

        while let Some((key, incoming)) = worklist.pop() {
            let node = self.get(key)?;
            let effective = match &node.kind {
                NodeKind::Transform { transform, animation, .. }
                    if node.parent.is_some() =>
                {
                    incoming * animation * transform
                }
                _ => incoming,
            };

            for light in &node.lights {
                collected.push(light.transformed(&effective));
            }

            for &child in self.children(key)?.iter().rev() {
                worklist.push((child, effective));
            }
        }
        Ok(collected)
    }
}
