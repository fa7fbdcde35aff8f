//! Scene graph: node tree, container, animation, and declarative builder
//!
//! A scene is a tree of three node kinds. Group nodes fan out to any number
//! of children, transform nodes apply a matrix to exactly one child, and
//! leaf nodes reference a mesh by name together with a material and
//! optional texture. Nodes live in an arena ([`SceneTree`]) and are
//! addressed by [`NodeKey`], so parent links are plain keys rather than
//! shared ownership.
//!
//! The [`Scenegraph`] container owns the tree plus the name registries and
//! the bound renderer; [`SceneBuilder`] constructs all of it from a RON
//! scene description.

mod animation;
mod builder;
mod graph;
mod node;

pub use animation::{orbit, shuttle, swing, AnimationFn};
pub use builder::{
    BuildError, LightDescription, MaterialDescription, NodeDescription, SceneBuilder,
    SceneDescription, TransformStep,
};
pub use graph::Scenegraph;
pub use node::{NodeKey, NodeKind, SceneError, SceneTree};
