//! Scene container
//!
//! [`Scenegraph`] owns the node tree, the name registries (nodes, meshes,
//! textures), the registered animations, and at most one bound renderer.
//! Binding a renderer pushes every registered resource through the
//! contract; drawing before a renderer is bound is a no-op rather than an
//! error, so a scene can be built and animated headless.

use crate::assets::TextureImage;
use crate::foundation::math::{Mat4, MatrixStack};
use crate::render::{Light, Mesh, ScenegraphRenderer, DEFAULT_TEXTURE};
use crate::scene::animation::AnimationFn;
use crate::scene::node::{NodeKey, NodeKind, SceneError, SceneTree};
use std::collections::BTreeMap;

/// A complete scene: tree, registries, animations, and renderer binding
#[derive(Default)]
pub struct Scenegraph {
    tree: SceneTree,
    root: Option<NodeKey>,
    nodes: BTreeMap<String, NodeKey>,
    meshes: BTreeMap<String, Mesh>,
    textures: BTreeMap<String, TextureImage>,
    animations: BTreeMap<String, AnimationFn>,
    renderer: Option<Box<dyn ScenegraphRenderer>>,
}

impl Scenegraph {
    /// Create an empty scene. The texture registry is seeded with a solid
    /// white image under the default texture name, so untextured leaves
    /// always have something to bind.
    pub fn new() -> Self {
        let mut scene = Self {
            tree: SceneTree::new(),
            ..Self::default()
        };
        scene.add_texture(
            DEFAULT_TEXTURE,
            TextureImage::solid_color(1, 1, [255, 255, 255, 255]),
        );
        scene
    }

    /// Borrow the node tree
    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Borrow the node tree mutably
    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    /// The root node, if one has been set
    pub fn root(&self) -> Option<NodeKey> {
        self.root
    }

    /// Set the root node of the scene
    pub fn set_root(&mut self, key: NodeKey) {
        self.root = Some(key);
    }

    /// Register a node under a name. A repeated name replaces the earlier
    /// entry; the tree itself is untouched.
    pub fn register_node(&mut self, name: &str, key: NodeKey) {
        if self.nodes.insert(name.to_string(), key).is_some() {
            log::warn!("node name '{name}' registered twice, keeping the later one");
        }
    }

    /// Register a mesh under a name
    pub fn add_mesh(&mut self, name: &str, mesh: Mesh) {
        if self.meshes.insert(name.to_string(), mesh).is_some() {
            log::warn!("mesh '{name}' registered twice, keeping the later one");
        }
    }

    /// Register a texture under a name
    pub fn add_texture(&mut self, name: &str, texture: TextureImage) {
        if self.textures.insert(name.to_string(), texture).is_some() {
            log::warn!("texture '{name}' registered twice, keeping the later one");
        }
    }

    /// Look up a registered node by name
    pub fn node(&self, name: &str) -> Option<NodeKey> {
        self.nodes.get(name).copied()
    }

    /// Look up a registered mesh by name
    pub fn mesh(&self, name: &str) -> Option<&Mesh> {
        self.meshes.get(name)
    }

    /// Look up a registered texture by name
    pub fn texture(&self, name: &str) -> Option<&TextureImage> {
        self.textures.get(name)
    }

    /// Iterate registered meshes in name order
    pub fn meshes(&self) -> impl Iterator<Item = (&str, &Mesh)> {
        self.meshes.iter().map(|(name, mesh)| (name.as_str(), mesh))
    }

    /// Iterate registered textures in name order
    pub fn textures(&self) -> impl Iterator<Item = (&str, &TextureImage)> {
        self.textures.iter().map(|(name, texture)| (name.as_str(), texture))
    }

    /// Names of registered meshes, sorted
    pub fn mesh_names(&self) -> Vec<&str> {
        self.meshes.keys().map(String::as_str).collect()
    }

    /// Names of registered textures, sorted
    pub fn texture_names(&self) -> Vec<&str> {
        self.textures.keys().map(String::as_str).collect()
    }

    /// Names of registered nodes, sorted
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.keys().map(String::as_str).collect()
    }

    /// Bind a renderer, pushing every registered resource through it:
    /// lights first (in world coordinates), then meshes, then textures.
    ///
    /// Rebinding pushes everything again, so a renderer can be swapped
    /// mid-run without rebuilding the scene.
    pub fn set_renderer(
        &mut self,
        mut renderer: Box<dyn ScenegraphRenderer>,
    ) -> Result<(), SceneError> {
        let lights = self.world_lights()?;
        renderer.add_lights(&lights)?;
        for (name, mesh) in &self.meshes {
            renderer.add_mesh(name, mesh)?;
        }
        for (name, texture) in &self.textures {
            renderer.add_texture(name, texture)?;
        }
        self.renderer = Some(renderer);
        Ok(())
    }

    /// Whether a renderer is currently bound
    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// Draw one frame.
    ///
    /// The stack top is the world-to-view matrix for this frame. Lights
    /// are collected into view space and bound, then the tree is walked
    /// issuing one draw call per leaf. Without a bound renderer or a root
    /// this is a silent no-op.
    pub fn draw(&mut self, stack: &mut MatrixStack) -> Result<(), SceneError> {
        let (Some(renderer), Some(root)) = (self.renderer.as_deref_mut(), self.root) else {
            return Ok(());
        };

        let lights = self.tree.collect_lights(root, &stack.top())?;
        renderer.draw_lights(&lights)?;
        self.tree.draw(root, renderer, stack)
    }

    /// Register an animation behavior for a named transform node.
    ///
    /// Fails if no node is registered under `name` or the node is not a
    /// transform node.
    pub fn register_animation(
        &mut self,
        name: &str,
        animation: AnimationFn,
    ) -> Result<(), SceneError> {
        let key = self
            .node(name)
            .ok_or_else(|| SceneError::NodeNotFound(name.to_string()))?;
        match self.tree.get(key)?.kind {
            NodeKind::Transform { .. } => {
                self.animations.insert(name.to_string(), animation);
                Ok(())
            }
            _ => Err(SceneError::InvalidOperation {
                node: name.to_string(),
                operation: "animation",
            }),
        }
    }

    /// Advance every registered animation to time `t` seconds.
    ///
    /// A registered name whose node has disappeared from the registry is
    /// an error, not a skip; a silently dead animation is a bug.
    pub fn animate(&mut self, t: f32) -> Result<(), SceneError> {
        for (name, animation) in &mut self.animations {
            let key = self
                .nodes
                .get(name)
                .copied()
                .ok_or_else(|| SceneError::NodeNotFound(name.clone()))?;
            self.tree.set_animation_transform(key, animation(t))?;
        }
        Ok(())
    }

    /// Every light in the scene, transformed by `world_to_view`. An empty
    /// scene has no lights.
    pub fn all_lights(&self, world_to_view: &Mat4) -> Result<Vec<Light>, SceneError> {
        match self.root {
            Some(root) => self.tree.collect_lights(root, world_to_view),
            None => Ok(Vec::new()),
        }
    }

    fn world_lights(&self) -> Result<Vec<Light>, SceneError> {
        self.all_lights(&Mat4::identity())
    }

    /// Release the bound renderer's resources and unbind it
    pub fn dispose(&mut self) {
        if let Some(renderer) = self.renderer.as_deref_mut() {
            renderer.dispose();
        }
        self.renderer = None;
    }
}
