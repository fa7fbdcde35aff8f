//! Declarative scene construction from RON descriptions
//!
//! A scene file names its mesh instances and texture images, then gives a
//! tree of node descriptions. The builder loads the assets, constructs the
//! node tree under an implicit root group, and registers every named node
//! in the container.
//!
//! Groups support two forms of reuse: `copy_of` deep-copies a previously
//! built subtree under a new name, and `from` splices a whole other scene
//! file in as the group's child, with the included scene's node names
//! prefixed by the group name to keep the registry unambiguous.

use crate::assets::{AssetError, ImageData, ObjError, ObjLoader};
use crate::config::BuilderConfig;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::render::{Light, Material};
use crate::scene::graph::Scenegraph;
use crate::scene::node::{NodeKey, SceneError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from scene building
#[derive(Error, Debug)]
pub enum BuildError {
    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Scene description failed to parse
    #[error("Parse error: {0}")]
    Parse(#[from] ron::de::SpannedError),

    /// Texture image failed to load
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Mesh file failed to load
    #[error(transparent)]
    Obj(#[from] ObjError),

    /// Tree construction failure
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// `copy_of` named a node that has not been built yet
    #[error("copy_of source '{0}' does not exist")]
    UnknownCopySource(String),

    /// A light gave both a position and a direction
    #[error("light on node '{0}' has both a position and a direction")]
    ConflictingLight(String),
}

/// Top-level scene description as parsed from a scene file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SceneDescription {
    /// Mesh name to OBJ file path; a path without an extension gets
    /// `.obj` appended
    #[serde(default)]
    pub instances: BTreeMap<String, String>,

    /// Texture name to image file path
    #[serde(default)]
    pub images: BTreeMap<String, String>,

    /// Top-level nodes, attached under an implicit root group
    #[serde(default)]
    pub root: Vec<NodeDescription>,
}

/// One node of a scene description
#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum NodeDescription {
    /// Group node, optionally copied or included from elsewhere
    Group {
        /// Node name
        name: String,
        /// Deep-copy an earlier subtree instead of starting empty
        #[serde(default)]
        copy_of: Option<String>,
        /// Splice another scene file in as this group's child
        #[serde(default)]
        from: Option<String>,
        /// Lights attached to this node
        #[serde(default)]
        lights: Vec<LightDescription>,
        /// Child nodes
        #[serde(default)]
        children: Vec<NodeDescription>,
    },
    /// Transform node with an ordered list of steps
    Transform {
        /// Node name
        name: String,
        /// Steps composed left to right into the static transform
        #[serde(default)]
        steps: Vec<TransformStep>,
        /// Lights attached to this node
        #[serde(default)]
        lights: Vec<LightDescription>,
        /// Child nodes; a transform takes exactly one
        #[serde(default)]
        children: Vec<NodeDescription>,
    },
    /// Leaf node referencing a mesh instance
    Object {
        /// Node name
        name: String,
        /// Mesh name in the instance registry
        instance_of: String,
        /// Texture name, or the default texture when absent
        #[serde(default)]
        texture: Option<String>,
        /// Surface material
        #[serde(default)]
        material: Option<MaterialDescription>,
        /// Lights attached to this node
        #[serde(default)]
        lights: Vec<LightDescription>,
    },
}

/// One step of a transform node's matrix
#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum TransformStep {
    /// Scale by per-axis factors
    Scale([f32; 3]),
    /// Rotate about an axis, angle in degrees
    Rotate {
        /// Angle in degrees
        angle: f32,
        /// Rotation axis, normalized by the builder
        axis: [f32; 3],
    },
    /// Translate by an offset
    Translate([f32; 3]),
}

impl TransformStep {
    fn matrix(&self) -> Mat4 {
        match *self {
            Self::Scale([x, y, z]) => Mat4::scaling(x, y, z),
            Self::Rotate { angle, axis } => Mat4::rotation(
                crate::foundation::math::utils::deg_to_rad(angle),
                Vec3::new(axis[0], axis[1], axis[2]),
            ),
            Self::Translate([x, y, z]) => Mat4::translation(x, y, z),
        }
    }
}

/// Material fields; unset fields keep the material default
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MaterialDescription {
    /// Shorthand setting ambient, diffuse, and specular at once
    #[serde(default)]
    pub color: Option<[f32; 3]>,
    /// Ambient reflectance
    #[serde(default)]
    pub ambient: Option<[f32; 3]>,
    /// Diffuse reflectance
    #[serde(default)]
    pub diffuse: Option<[f32; 3]>,
    /// Specular reflectance
    #[serde(default)]
    pub specular: Option<[f32; 3]>,
    /// Emissive color
    #[serde(default)]
    pub emission: Option<[f32; 3]>,
    /// Specular exponent
    #[serde(default)]
    pub shininess: Option<f32>,
    /// Absorption coefficient
    #[serde(default)]
    pub absorption: Option<f32>,
    /// Reflection coefficient
    #[serde(default)]
    pub reflection: Option<f32>,
    /// Transparency coefficient
    #[serde(default)]
    pub transparency: Option<f32>,
    /// Refractive index
    #[serde(default)]
    pub refractive_index: Option<f32>,
}

impl MaterialDescription {
    fn to_material(&self) -> Material {
        let mut material = Material::new();
        if let Some([r, g, b]) = self.color {
            material = material.with_color(r, g, b);
        }
        if let Some([r, g, b]) = self.ambient {
            material.ambient = Vec3::new(r, g, b);
        }
        if let Some([r, g, b]) = self.diffuse {
            material.diffuse = Vec3::new(r, g, b);
        }
        if let Some([r, g, b]) = self.specular {
            material.specular = Vec3::new(r, g, b);
        }
        if let Some([r, g, b]) = self.emission {
            material.emission = Vec3::new(r, g, b);
        }
        if let Some(v) = self.shininess {
            material.shininess = v;
        }
        if let Some(v) = self.absorption {
            material.absorption = v;
        }
        if let Some(v) = self.reflection {
            material.reflection = v;
        }
        if let Some(v) = self.transparency {
            material.transparency = v;
        }
        if let Some(v) = self.refractive_index {
            material.refractive_index = v;
        }
        material
    }
}

/// Light fields; a light is positional or directional, never both
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LightDescription {
    /// Ambient color
    #[serde(default)]
    pub ambient: Option<[f32; 3]>,
    /// Diffuse color
    #[serde(default)]
    pub diffuse: Option<[f32; 3]>,
    /// Specular color
    #[serde(default)]
    pub specular: Option<[f32; 3]>,
    /// Point light position
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    /// Directional light direction
    #[serde(default)]
    pub direction: Option<[f32; 3]>,
    /// Spotlight direction
    #[serde(default)]
    pub spot_direction: Option<[f32; 3]>,
    /// Spotlight half-angle in degrees
    #[serde(default)]
    pub spot_angle: Option<f32>,
}

impl LightDescription {
    fn to_light(&self, node: &str) -> Result<Light, BuildError> {
        if self.position.is_some() && self.direction.is_some() {
            return Err(BuildError::ConflictingLight(node.to_string()));
        }
        let mut light = Light::new();
        if let Some([r, g, b]) = self.ambient {
            light.set_ambient(r, g, b);
        }
        if let Some([r, g, b]) = self.diffuse {
            light.set_diffuse(r, g, b);
        }
        if let Some([r, g, b]) = self.specular {
            light.set_specular(r, g, b);
        }
        if let Some([x, y, z]) = self.position {
            light.set_position(x, y, z);
        }
        if let Some([x, y, z]) = self.direction {
            light.set_direction(x, y, z);
        }
        if let Some([x, y, z]) = self.spot_direction {
            light.set_spot_direction(x, y, z);
        }
        if let Some(angle) = self.spot_angle {
            light.set_spot_angle(angle);
        }
        Ok(light)
    }
}

/// Scene files may write `Some(x)` as plain `x`
fn parse_description(text: &str) -> Result<SceneDescription, ron::de::SpannedError> {
    ron::Options::default()
        .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
        .from_str(text)
}

/// Builds a [`Scenegraph`] from a scene description
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    config: BuilderConfig,
}

impl SceneBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with an explicit configuration
    pub fn with_config(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// Load and build a scene file. Relative asset paths inside the file
    /// resolve against the file's own directory first, then the
    /// configured search paths.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Scenegraph, BuildError> {
        let path = self.resolve(Path::new("."), path.as_ref().to_string_lossy().as_ref());
        log::info!("loading scene from {}", path.display());
        let text = fs::read_to_string(&path)?;
        let description = parse_description(&text)?;
        let base = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        self.build(&description, &base)
    }

    /// Build a scene from an already-parsed description. `base` anchors
    /// relative asset and inclusion paths.
    pub fn build(
        &self,
        description: &SceneDescription,
        base: &Path,
    ) -> Result<Scenegraph, BuildError> {
        let mut scene = Scenegraph::new();
        self.load_resources(&mut scene, description, base)?;

        let root = scene.tree_mut().insert_group("root");
        scene.set_root(root);
        scene.register_node("root", root);

        for node in &description.root {
            let child = self.build_node(&mut scene, node, "", base)?;
            scene.tree_mut().add_child(root, child)?;
        }
        Ok(scene)
    }

    /// Load the instance meshes and texture images into the registries
    fn load_resources(
        &self,
        scene: &mut Scenegraph,
        description: &SceneDescription,
        base: &Path,
    ) -> Result<(), BuildError> {
        for (name, path) in &description.instances {
            let mut path = path.clone();
            if Path::new(&path).extension().is_none() {
                path.push_str(".obj");
            }
            let mesh = ObjLoader::load_obj(self.resolve(base, &path))?;
            scene.add_mesh(name, mesh);
        }
        for (name, path) in &description.images {
            let image = ImageData::from_file(self.resolve(base, path))?;
            scene.add_texture(name, image);
        }
        Ok(())
    }

    fn build_node(
        &self,
        scene: &mut Scenegraph,
        description: &NodeDescription,
        prefix: &str,
        base: &Path,
    ) -> Result<NodeKey, BuildError> {
        match description {
            NodeDescription::Group { name, copy_of, from, lights, children } => {
                let full_name = format!("{prefix}{name}");

                let key = if let Some(source) = copy_of {
                    // only built nodes can be copied, so a forward
                    // reference is an error
                    let source_key = scene
                        .node(&format!("{prefix}{source}"))
                        .or_else(|| scene.node(source))
                        .ok_or_else(|| BuildError::UnknownCopySource(source.clone()))?;
                    let copy = scene.tree_mut().clone_subtree(source_key)?;
                    scene.tree_mut().set_name(copy, &full_name)?;
                    copy
                } else {
                    scene.tree_mut().insert_group(&full_name)
                };

                if let Some(file) = from {
                    let child = self.include_scene(scene, &full_name, file, base)?;
                    scene.tree_mut().add_child(key, child)?;
                }

                for child in children {
                    let child_key = self.build_node(scene, child, prefix, base)?;
                    scene.tree_mut().add_child(key, child_key)?;
                }

                self.attach_lights(scene, key, &full_name, lights)?;
                scene.register_node(&full_name, key);
                Ok(key)
            }
            NodeDescription::Transform { name, steps, lights, children } => {
                let full_name = format!("{prefix}{name}");
                let key = scene.tree_mut().insert_transform(&full_name);

                let mut working = Mat4::identity();
                for step in steps {
                    working *= step.matrix();
                }
                scene.tree_mut().set_transform(key, working)?;

                for child in children {
                    let child_key = self.build_node(scene, child, prefix, base)?;
                    scene.tree_mut().add_child(key, child_key)?;
                }

                self.attach_lights(scene, key, &full_name, lights)?;
                scene.register_node(&full_name, key);
                Ok(key)
            }
            NodeDescription::Object { name, instance_of, texture, material, lights } => {
                let full_name = format!("{prefix}{name}");
                if scene.mesh(instance_of).is_none() {
                    log::warn!(
                        "object '{full_name}' references unknown instance '{instance_of}'"
                    );
                }
                let key = scene.tree_mut().insert_leaf(&full_name, instance_of);

                if let Some(material) = material {
                    scene.tree_mut().set_material(key, material.to_material())?;
                }
                if let Some(texture) = texture {
                    scene.tree_mut().set_texture(key, texture)?;
                }

                self.attach_lights(scene, key, &full_name, lights)?;
                scene.register_node(&full_name, key);
                Ok(key)
            }
        }
    }

    /// Splice another scene file in under `group_name`. The included
    /// scene's meshes and textures merge into the same registries; its
    /// node names get a `{group_name}-` prefix; its implicit root becomes
    /// the returned node.
    fn include_scene(
        &self,
        scene: &mut Scenegraph,
        group_name: &str,
        file: &str,
        base: &Path,
    ) -> Result<NodeKey, BuildError> {
        let path = self.resolve(base, file);
        log::debug!("including scene {} under '{group_name}'", path.display());
        let text = fs::read_to_string(&path)?;
        let description = parse_description(&text)?;
        let sub_base = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        self.load_resources(scene, &description, &sub_base)?;

        let sub_prefix = format!("{group_name}-");
        let sub_root_name = format!("{sub_prefix}root");
        let sub_root = scene.tree_mut().insert_group(&sub_root_name);
        for node in &description.root {
            let child = self.build_node(scene, node, &sub_prefix, &sub_base)?;
            scene.tree_mut().add_child(sub_root, child)?;
        }
        scene.register_node(&sub_root_name, sub_root);
        Ok(sub_root)
    }

    fn attach_lights(
        &self,
        scene: &mut Scenegraph,
        key: NodeKey,
        node_name: &str,
        lights: &[LightDescription],
    ) -> Result<(), BuildError> {
        for light in lights {
            scene.tree_mut().add_light(key, light.to_light(node_name)?)?;
        }
        Ok(())
    }

    /// Resolve a path: absolute paths pass through, relative paths try
    /// `base` then each configured search path, falling back to `base`
    fn resolve(&self, base: &Path, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            return p.to_path_buf();
        }
        let candidate = base.join(p);
        if candidate.exists() {
            return candidate;
        }
        for dir in &self.config.search_paths {
            let candidate = dir.join(p);
            if candidate.exists() {
                return candidate;
            }
        }
        base.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;
    use crate::scene::node::NodeKind;
    use approx::assert_relative_eq;
    use std::fs;
    use std::path::PathBuf;

    const TRIANGLE_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";

    /// Fresh directory under the system temp dir for file-based tests
    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("scenegraph-tests")
            .join(format!("{tag}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn parse(text: &str) -> SceneDescription {
        parse_description(text).unwrap()
    }

    #[test]
    fn test_build_simple_tree() {
        let description = parse(
            r#"(
                root: [
                    Transform(
                        name: "lift",
                        steps: [Translate((0.0, 2.0, 0.0))],
                        children: [Object(name: "box1", instance_of: "box")],
                    ),
                ],
            )"#,
        );
        let scene = SceneBuilder::new()
            .build(&description, Path::new("."))
            .unwrap();

        let root = scene.root().unwrap();
        assert_eq!(scene.tree().name(root).unwrap(), "root");
        let lift = scene.node("lift").unwrap();
        let box1 = scene.node("box1").unwrap();
        assert_eq!(scene.tree().children(lift).unwrap(), vec![box1]);

        let m = scene
            .tree()
            .object_to_view_transform(box1, &Mat4::identity())
            .unwrap();
        assert_relative_eq!(
            m * Vec4::new(0.0, 0.0, 0.0, 1.0),
            Vec4::new(0.0, 2.0, 0.0, 1.0)
        );
    }

    #[test]
    fn test_transform_steps_compose_in_order() {
        let description = parse(
            r#"(
                root: [
                    Transform(
                        name: "t",
                        steps: [
                            Translate((1.0, 0.0, 0.0)),
                            Scale((2.0, 2.0, 2.0)),
                        ],
                        children: [Object(name: "o", instance_of: "box")],
                    ),
                ],
            )"#,
        );
        let scene = SceneBuilder::new()
            .build(&description, Path::new("."))
            .unwrap();
        let t = scene.node("t").unwrap();

        // translate then scale: the origin lands at (1,0,0), not (2,0,0)
        if let NodeKind::Transform { transform, .. } = &scene.tree().get(t).unwrap().kind {
            assert_relative_eq!(
                transform * Vec4::new(0.0, 0.0, 0.0, 1.0),
                Vec4::new(1.0, 0.0, 0.0, 1.0)
            );
            assert_relative_eq!(
                transform * Vec4::new(1.0, 0.0, 0.0, 1.0),
                Vec4::new(3.0, 0.0, 0.0, 1.0)
            );
        } else {
            panic!("expected transform node");
        }
    }

    #[test]
    fn test_material_and_texture_applied() {
        let description = parse(
            r#"(
                root: [
                    Object(
                        name: "o",
                        instance_of: "box",
                        texture: "checker",
                        material: (color: (0.5, 0.25, 0.125), shininess: 32.0),
                    ),
                ],
            )"#,
        );
        let scene = SceneBuilder::new()
            .build(&description, Path::new("."))
            .unwrap();
        let o = scene.node("o").unwrap();
        if let NodeKind::Leaf { material, texture, .. } = &scene.tree().get(o).unwrap().kind {
            assert_relative_eq!(material.diffuse, Vec3::new(0.5, 0.25, 0.125));
            assert_relative_eq!(material.shininess, 32.0);
            assert_eq!(texture.as_deref(), Some("checker"));
        } else {
            panic!("expected leaf node");
        }
    }

    #[test]
    fn test_copy_of_clones_and_renames() {
        let description = parse(
            r#"(
                root: [
                    Group(
                        name: "original",
                        children: [Object(name: "part", instance_of: "box")],
                    ),
                    Group(name: "clone", copy_of: "original"),
                ],
            )"#,
        );
        let scene = SceneBuilder::new()
            .build(&description, Path::new("."))
            .unwrap();

        let original = scene.node("original").unwrap();
        let clone = scene.node("clone").unwrap();
        assert_ne!(original, clone);
        // descendants of the copy are in the tree but not the registry
        assert_eq!(scene.tree().children(clone).unwrap().len(), 1);
        assert_eq!(scene.node("part"), scene.tree().children(original).unwrap().first().copied());
    }

    #[test]
    fn test_copy_of_unknown_source_errors() {
        let description = parse(
            r#"(
                root: [Group(name: "clone", copy_of: "nothing")],
            )"#,
        );
        assert!(matches!(
            SceneBuilder::new().build(&description, Path::new(".")),
            Err(BuildError::UnknownCopySource(name)) if name == "nothing"
        ));
    }

    #[test]
    fn test_light_with_position_and_direction_errors() {
        let description = parse(
            r#"(
                root: [
                    Group(
                        name: "g",
                        lights: [(position: (0.0, 1.0, 0.0), direction: (0.0, -1.0, 0.0))],
                    ),
                ],
            )"#,
        );
        assert!(matches!(
            SceneBuilder::new().build(&description, Path::new(".")),
            Err(BuildError::ConflictingLight(node)) if node == "g"
        ));
    }

    #[test]
    fn test_instance_path_gets_obj_extension() {
        let dir = scratch_dir("obj-ext");
        fs::write(dir.join("tri.obj"), TRIANGLE_OBJ).unwrap();

        let description = parse(
            r#"(
                instances: {"tri": "tri"},
                root: [Object(name: "o", instance_of: "tri")],
            )"#,
        );
        let scene = SceneBuilder::new().build(&description, &dir).unwrap();
        assert_eq!(scene.mesh("tri").unwrap().triangle_count(), 1);
    }

    #[test]
    fn test_from_inclusion_prefixes_and_merges() {
        let dir = scratch_dir("from-inclusion");
        fs::write(dir.join("part.obj"), TRIANGLE_OBJ).unwrap();
        fs::write(
            dir.join("wheel.ron"),
            r#"(
                instances: {"rim": "part.obj"},
                root: [
                    Transform(
                        name: "spin",
                        children: [Object(name: "rim", instance_of: "rim")],
                    ),
                ],
            )"#,
        )
        .unwrap();

        let description = parse(
            r#"(
                root: [Group(name: "front", from: "wheel.ron")],
            )"#,
        );
        let scene = SceneBuilder::new().build(&description, &dir).unwrap();

        // included node names carry the group prefix
        let spin = scene.node("front-spin").unwrap();
        assert!(scene.node("front-rim").is_some());
        assert!(scene.node("spin").is_none());

        // the sub-scene's implicit root is the group's child
        let front = scene.node("front").unwrap();
        let sub_root = scene.node("front-root").unwrap();
        assert_eq!(scene.tree().children(front).unwrap(), vec![sub_root]);
        assert_eq!(scene.tree().children(sub_root).unwrap(), vec![spin]);

        // included meshes merge into the outer registry
        assert!(scene.mesh("rim").is_some());
    }

    #[test]
    fn test_load_from_file() {
        let dir = scratch_dir("load");
        fs::write(dir.join("tri.obj"), TRIANGLE_OBJ).unwrap();
        fs::write(
            dir.join("scene.ron"),
            r#"(
                instances: {"tri": "tri.obj"},
                root: [Object(name: "o", instance_of: "tri")],
            )"#,
        )
        .unwrap();

        let builder = SceneBuilder::new();
        let scene = builder.load(dir.join("scene.ron")).unwrap();
        assert!(scene.node("o").is_some());
        assert!(scene.mesh("tri").is_some());
    }
}
